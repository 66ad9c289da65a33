//! The compiled client.

use crate::base_url::compute_base_url;
use crate::dispatch::{Dispatcher, OperationHandle};
use crate::document::Document;
use crate::error::{OpenApiError, Result};
use crate::extractor::extract_operations;
use crate::loader::{DefinitionSource, load};
use crate::planner::PlannerOptions;
use crate::registry::OperationRegistry;
use crate::resolver::{ResolvedSchemaMap, resolve_all};
use crate::tools::ToolDescriptor;
use crate::transport::{ReqwestTransport, Transport};
use crate::types::InvocationResponse;
use dynapi_core::{AuthConfig, DynapiConfig, HttpConfig, Tool};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// A client compiled from one OpenAPI document.
///
/// Every operation with an `operationId` becomes callable by name and is
/// described as a function-calling tool.
///
/// # Example
///
/// ```no_run
/// use dynapi_openapi::OpenApiClient;
/// use serde_json::json;
///
/// # #[tokio::main]
/// # async fn main() -> dynapi_openapi::Result<()> {
/// let client = OpenApiClient::init("https://petstore3.swagger.io/api/v3/openapi.json").await?;
///
/// let response = client.invoke("getPetById", json!({"petId": 1})).await?;
/// println!("{} {}", response.status, response.data);
///
/// client.close().await;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OpenApiClient {
    source: DefinitionSource,
    document: Document,
    schemas: ResolvedSchemaMap,
    registry: OperationRegistry,
    dispatcher: Arc<Dispatcher>,
    name: Arc<str>,
}

impl OpenApiClient {
    /// Load `source` and compile it with default settings.
    pub async fn init(source: impl Into<DefinitionSource>) -> Result<Self> {
        Self::builder().source(source).build().await
    }

    pub fn builder() -> OpenApiClientBuilder {
        OpenApiClientBuilder::default()
    }

    /// Build a client from a loaded configuration file.
    pub async fn from_config(config: &DynapiConfig) -> Result<Self> {
        let definition = config
            .definition()
            .map_err(|e| OpenApiError::Config(e.to_string()))?;

        let mut builder = Self::builder()
            .source(definition)
            .http_config(config.http.clone())
            .auth(config.auth.clone())
            .fold_unmatched_args_into_body(config.dispatch.fold_unmatched_args_into_body);
        if let Some(base_url) = &config.base_url {
            builder = builder.base_url(base_url.clone());
        }
        builder.build().await
    }

    /// A callable handle on one operation.
    pub fn operation(&self, name: &str) -> Result<OperationHandle> {
        let compiled = self
            .registry
            .get(name)
            .ok_or_else(|| OpenApiError::UnknownOperation(name.to_string()))?;
        Ok(OperationHandle::new(
            name.to_string(),
            compiled.clone(),
            self.dispatcher.clone(),
            self.name.clone(),
        ))
    }

    /// Invoke an operation by name. Unknown names fail before any request.
    pub async fn invoke(&self, name: &str, args: Value) -> Result<InvocationResponse> {
        self.operation(name)?.call(args).await
    }

    pub fn registry(&self) -> &OperationRegistry {
        &self.registry
    }

    pub fn operation_names(&self) -> Vec<&str> {
        self.registry.operation_names()
    }

    pub fn path_templates(&self) -> &[String] {
        self.registry.path_templates()
    }

    pub fn tool_descriptors(&self) -> Vec<&ToolDescriptor> {
        self.registry.tool_descriptors()
    }

    /// Every registered operation as an executable tool.
    pub fn tools(&self) -> Vec<Arc<dyn Tool>> {
        self.registry
            .iter()
            .map(|(name, compiled)| {
                Arc::new(OperationHandle::new(
                    name.to_string(),
                    compiled.clone(),
                    self.dispatcher.clone(),
                    self.name.clone(),
                )) as Arc<dyn Tool>
            })
            .collect()
    }

    /// Name derived from the document's title and version.
    pub fn client_name(&self) -> &str {
        &self.name
    }

    pub fn base_url(&self) -> &str {
        self.dispatcher.base_url()
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn source(&self) -> &DefinitionSource {
        &self.source
    }

    /// Component schemas with every reference inlined.
    pub fn schemas(&self) -> &ResolvedSchemaMap {
        &self.schemas
    }

    /// Release the transport session. Handles obtained from this client
    /// keep their own reference to it.
    pub async fn close(self) {
        info!("Closing client {}", self.name);
        self.dispatcher.transport().close().await;
    }
}

/// Builder for [`OpenApiClient`].
#[derive(Default)]
pub struct OpenApiClientBuilder {
    source: Option<DefinitionSource>,
    transport: Option<Arc<dyn Transport>>,
    http: HttpConfig,
    auth: AuthConfig,
    base_url: Option<String>,
    options: PlannerOptions,
}

impl OpenApiClientBuilder {
    /// Where the definition comes from.
    pub fn source(mut self, source: impl Into<DefinitionSource>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Send requests through a custom transport instead of reqwest.
    ///
    /// Auth and HTTP settings then only apply to fetching the definition.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn http_config(mut self, http: HttpConfig) -> Self {
        self.http = http;
        self
    }

    /// Per-request timeout of the reqwest session.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.http.timeout_secs = Some(secs);
        self
    }

    pub fn auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// Use `base_url` instead of the one computed from `servers`.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn fold_unmatched_args_into_body(mut self, enabled: bool) -> Self {
        self.options.fold_unmatched_args_into_body = enabled;
        self
    }

    /// Load the definition and compile every operation.
    pub async fn build(self) -> Result<OpenApiClient> {
        let source = self
            .source
            .ok_or_else(|| OpenApiError::Config("no definition source given".to_string()))?;

        let session = ReqwestTransport::from_http_config(&self.http)
            .map_err(|e| OpenApiError::Config(format!("cannot build HTTP session: {}", e)))?;
        let loaded = load(&source, session.client()).await?;
        let document = loaded.document;

        let base_url = self
            .base_url
            .unwrap_or_else(|| compute_base_url(&document, loaded.source_url.as_ref()));

        let schemas = document
            .component_schemas()
            .map(resolve_all)
            .unwrap_or_default();
        let registry = OperationRegistry::compile(extract_operations(&document), &schemas);
        let name = client_name(&document);

        let transport: Arc<dyn Transport> = match self.transport {
            Some(custom) => {
                if !self.auth.is_none() {
                    warn!("Auth settings are not applied to a custom transport");
                }
                custom
            }
            None => Arc::new(session.with_auth(self.auth)),
        };

        info!(
            "Compiled {} with {} operations (base URL: {:?})",
            name,
            registry.len(),
            base_url
        );

        Ok(OpenApiClient {
            source,
            document,
            schemas,
            registry,
            dispatcher: Arc::new(Dispatcher::new(base_url, transport, self.options)),
            name: Arc::from(name),
        })
    }
}

/// `{title}Client{version}` with everything but alphanumerics removed, or
/// a random `DynamicClient…` name when the document has no title.
fn client_name(document: &Document) -> String {
    let raw = match document.title().filter(|t| !t.is_empty()) {
        Some(title) => format!("{}Client{}", title, document.version().unwrap_or_default()),
        None => format!("DynamicClient{}", &uuid::Uuid::new_v4().simple().to_string()[..8]),
    };
    raw.chars().filter(|c| c.is_alphanumeric()).collect()
}
