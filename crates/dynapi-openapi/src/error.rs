//! Error types for compiling and invoking OpenAPI operations.

use thiserror::Error;

/// Result type for OpenAPI operations.
pub type Result<T> = std::result::Result<T, OpenApiError>;

/// Errors that can occur while loading a definition or invoking an operation.
///
/// Malformed schemas never surface here: missing references and cycles
/// degrade to placeholder schemas during compilation.
#[derive(Error, Debug)]
pub enum OpenApiError {
    /// The definition could not be fetched or parsed
    #[error("Failed to load OpenAPI definition{}: {message}", status_suffix(.status))]
    Load {
        status: Option<u16>,
        message: String,
    },

    /// Operation not registered in the compiled client
    #[error("Operation '{0}' not found in OpenAPI spec")]
    UnknownOperation(String),

    /// Network or protocol failure reported by the transport
    #[error("HTTP request failed: {0}")]
    Transport(#[from] TransportError),

    /// Response declared JSON but the body does not parse
    #[error("Response of '{operation}' is not valid JSON: {source}")]
    ResponseDecode {
        operation: String,
        #[source]
        source: serde_json::Error,
    },

    /// Call arguments were not a JSON object
    #[error("Invalid arguments for '{0}': expected a JSON object")]
    InvalidArguments(String),

    /// Client construction was misconfigured
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures raised by a [`Transport`](crate::Transport) implementation.
#[derive(Error, Debug)]
pub enum TransportError {
    /// Failure from the reqwest session, passed through untouched
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// Failure from a custom transport
    #[error("{0}")]
    Other(String),
}

impl OpenApiError {
    pub(crate) fn load(message: impl Into<String>) -> Self {
        OpenApiError::Load {
            status: None,
            message: message.into(),
        }
    }
}

fn status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (status {s})")).unwrap_or_default()
}
