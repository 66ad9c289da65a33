//! # Dynapi OpenAPI
//!
//! Compiles an OpenAPI 3.x document into a callable client at runtime.
//!
//! ## Features
//!
//! - Load definitions from a URL, a file, raw JSON/YAML text or a parsed value
//! - Inline `$ref`s in component schemas, terminating on cyclic schemas
//! - Invoke any operation by its `operationId` with a flat argument map
//! - Describe every operation as an LLM function-calling tool
//! - Common authentication methods (API Key, Bearer Token, Basic Auth)
//!
//! ## Example
//!
//! ```no_run
//! use dynapi_openapi::{AuthConfig, OpenApiClient};
//! use serde_json::json;
//! use std::env;
//!
//! # #[tokio::main]
//! # async fn main() -> anyhow::Result<()> {
//! let client = OpenApiClient::builder()
//!     .source("./api/openapi.yaml")
//!     .auth(AuthConfig::api_key_header("X-API-Key", env::var("API_KEY")?))
//!     .build()
//!     .await?;
//!
//! for tool in client.tool_descriptors() {
//!     println!("{}", serde_json::to_string(tool)?);
//! }
//!
//! let response = client.invoke("listPets", json!({"limit": 10})).await?;
//! println!("{}: {}", response.status, response.data);
//! # Ok(())
//! # }
//! ```

mod base_url;
mod client;
mod dispatch;
mod document;
mod error;
mod extractor;
mod loader;
mod planner;
mod registry;
mod resolver;
mod tools;
mod transport;
mod types;

pub use base_url::compute_base_url;
pub use client::{OpenApiClient, OpenApiClientBuilder};
pub use dispatch::{Dispatcher, OperationHandle};
pub use document::Document;
pub use error::{OpenApiError, Result, TransportError};
pub use extractor::extract_operations;
pub use loader::{DefinitionSource, LoadedDefinition, load, load_file, parse_str};
pub use planner::{PlannerOptions, RequestPlan, join_url, plan_request};
pub use registry::{CompiledOperation, OperationRegistry};
pub use resolver::{ReferenceResolver, ResolvedSchemaMap, resolve_all, schema_ref};
pub use tools::{ToolDescriptor, build_tool};
pub use transport::{ReqwestTransport, Transport, TransportResponse};
pub use types::{
    HttpMethod, InvocationResponse, Operation, Parameter, ParameterLocation, ParameterSchema,
    RequestBody,
};

pub use dynapi_core::{AuthConfig, AuthLocation, DynapiConfig, Tool, ToolResponse};
