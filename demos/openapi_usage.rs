//! Compile an OpenAPI definition and call it.
//!
//! With a `dynapi.toml` in the current directory (or a parent) the client is
//! built from it; otherwise the public Swagger petstore is used.
//!
//! ```toml
//! definition = "https://petstore3.swagger.io/api/v3/openapi.json"
//!
//! [auth]
//! type = "api_key"
//! location = "header"
//! name = "api_key"
//! key = "${PETSTORE_API_KEY}"
//! ```
//!
//! Run with:
//! ```bash
//! RUST_LOG=debug cargo run --example openapi_usage
//! ```

use dynapi_core::DynapiConfig;
use dynapi_openapi::OpenApiClient;
use dynapi_telemetry::init_telemetry_with;
use serde_json::json;

const PETSTORE: &str = "https://petstore3.swagger.io/api/v3/openapi.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = DynapiConfig::load().unwrap_or_else(|_| DynapiConfig {
        definition: Some(PETSTORE.to_string()),
        ..Default::default()
    });
    init_telemetry_with(&config.observability)?;

    let client = OpenApiClient::from_config(&config).await?;
    println!("✓ Compiled {} ({})", client.client_name(), client.base_url());

    println!("\nAvailable tools:");
    for tool in client.tool_descriptors() {
        println!("  - {}: {}", tool.name, tool.description);
    }

    if client.registry().contains("getPetById") {
        let response = client.invoke("getPetById", json!({"petId": 1})).await?;
        println!("\ngetPetById -> {}", response.status);
        println!("{}", serde_json::to_string_pretty(&response.data)?);
    }

    client.close().await;
    Ok(())
}
