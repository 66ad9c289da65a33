//! Invocation: plan, send, normalize.

use crate::error::{OpenApiError, Result};
use crate::planner::{PlannerOptions, plan_request};
use crate::registry::CompiledOperation;
use crate::tools::ToolDescriptor;
use crate::transport::{Transport, TransportResponse, parse_json_body};
use crate::types::{InvocationResponse, Operation};
use async_trait::async_trait;
use dynapi_core::{Tool, ToolResponse};
use dynapi_telemetry::{OperationSpanAttributes, safe_serialize, trace_operation_call};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Shared invocation state: where requests go and how they are sent.
pub struct Dispatcher {
    base_url: String,
    transport: Arc<dyn Transport>,
    options: PlannerOptions,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Dispatcher {
    pub fn new(base_url: String, transport: Arc<dyn Transport>, options: PlannerOptions) -> Self {
        Self {
            base_url,
            transport,
            options,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Invoke `operation` with call arguments.
    ///
    /// `args` must be a JSON object or `null`. A non-2xx response is returned
    /// as-is.
    #[instrument(skip(self, operation, args), fields(method = %operation.method, path = %operation.path))]
    pub async fn dispatch(
        &self,
        name: &str,
        operation: &Operation,
        args: Value,
    ) -> Result<InvocationResponse> {
        let args = match args {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            _ => return Err(OpenApiError::InvalidArguments(name.to_string())),
        };

        let plan = plan_request(operation, &self.base_url, args, &self.options);
        debug!("Request: {} {}", plan.method, plan.url);

        let response = self.transport.send(&plan).await?;
        info!("{} {} -> {}", plan.method, plan.url, response.status);

        normalize_response(name, response)
    }
}

/// Decode a JSON response; anything else is kept as text.
fn normalize_response(name: &str, response: TransportResponse) -> Result<InvocationResponse> {
    let data = if response.is_json() {
        parse_json_body(&response.body).map_err(|source| OpenApiError::ResponseDecode {
            operation: name.to_string(),
            source,
        })?
    } else {
        Value::String(response.body)
    };

    Ok(InvocationResponse {
        data,
        status: response.status,
        headers: response.headers,
    })
}

/// A callable handle on one registered operation.
///
/// Cheap to clone; every clone shares the client's transport.
#[derive(Debug, Clone)]
pub struct OperationHandle {
    name: String,
    compiled: Arc<CompiledOperation>,
    dispatcher: Arc<Dispatcher>,
    client_name: Arc<str>,
}

impl OperationHandle {
    pub(crate) fn new(
        name: String,
        compiled: Arc<CompiledOperation>,
        dispatcher: Arc<Dispatcher>,
        client_name: Arc<str>,
    ) -> Self {
        Self {
            name,
            compiled,
            dispatcher,
            client_name,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn operation(&self) -> &Operation {
        &self.compiled.operation
    }

    pub fn tool(&self) -> &ToolDescriptor {
        &self.compiled.tool
    }

    /// Invoke the operation.
    pub async fn call(&self, args: Value) -> Result<InvocationResponse> {
        self.dispatcher
            .dispatch(&self.name, &self.compiled.operation, args)
            .await
    }
}

#[async_trait]
impl Tool for OperationHandle {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        &self.compiled.tool.description
    }

    fn schema(&self) -> Value {
        self.compiled.tool.parameters.clone()
    }

    async fn execute(&self, params: Value) -> dynapi_core::Result<ToolResponse> {
        let args_json = safe_serialize(&params);
        let result = self.call(params).await;

        let operation = &self.compiled.operation;
        trace_operation_call(OperationSpanAttributes {
            client_name: self.client_name.to_string(),
            operation_id: self.name.clone(),
            method: operation.method.to_string(),
            path_template: operation.path.clone(),
            args_json,
            status: result.as_ref().ok().map(|r| r.status),
        });

        let response = result.map_err(|e| dynapi_core::Error::tool_failed(&self.name, e))?;
        Ok(ToolResponse {
            result: serde_json::to_value(response)?,
        })
    }
}
