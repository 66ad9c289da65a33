//! Span creation helpers for operation invocations

use crate::attributes::*;

/// Attributes for tracing one operation invocation
#[derive(Debug, Clone)]
pub struct OperationSpanAttributes {
    pub client_name: String,
    pub operation_id: String,
    pub method: String,
    pub path_template: String,
    pub args_json: String,
    /// `None` when the call failed before a response arrived
    pub status: Option<u16>,
}

/// Create and record an OpenTelemetry span for an operation invocation.
pub fn trace_operation_call(attrs: OperationSpanAttributes) {
    let span = tracing::info_span!(
        "invoke_operation",
        { DYNAPI_CLIENT_NAME } = %attrs.client_name,
        { DYNAPI_OPERATION_ID } = %attrs.operation_id,
        { HTTP_REQUEST_METHOD } = %attrs.method,
        { URL_TEMPLATE } = %attrs.path_template,
        { DYNAPI_OPERATION_ARGS } = %attrs.args_json,
        { HTTP_RESPONSE_STATUS_CODE } = tracing::field::Empty,
    );

    if let Some(status) = attrs.status {
        span.record(HTTP_RESPONSE_STATUS_CODE, status);
    }

    // Enter and immediately exit the span (it's recorded)
    let _guard = span.enter();
}

/// Helper to safely serialize to JSON string
pub fn safe_serialize<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "<not serializable>".to_string())
}
