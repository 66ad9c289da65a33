//! # Dynapi Telemetry
//!
//! Structured logging and OpenTelemetry tracing for compiled API clients.
//!
//! Every operation invoked through the tool surface is recorded as an
//! `invoke_operation` span carrying the operation id, HTTP method, path
//! template, response status and the call arguments.

mod spans;
mod tracer;

pub use spans::{OperationSpanAttributes, safe_serialize, trace_operation_call};
pub use tracer::{init_telemetry, init_telemetry_with, register_span_processor, tracer_provider};

/// Span attribute names for API operation observability.
///
/// HTTP names follow the OpenTelemetry semantic conventions.
pub mod attributes {
    pub const HTTP_REQUEST_METHOD: &str = "http.request.method";
    pub const HTTP_RESPONSE_STATUS_CODE: &str = "http.response.status_code";
    pub const URL_TEMPLATE: &str = "url.template";

    pub const DYNAPI_OPERATION_ID: &str = "dynapi.operation.id";
    pub const DYNAPI_OPERATION_ARGS: &str = "dynapi.operation.args";
    pub const DYNAPI_CLIENT_NAME: &str = "dynapi.client.name";

    // System name constant
    pub const SYSTEM_NAME: &str = "dynapi";
}
