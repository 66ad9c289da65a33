//! Core traits and types for Dynapi
//!
//! This crate provides the shared foundations used by the OpenAPI compiler:
//! configuration, authentication settings, the tool abstraction and errors.

pub mod auth;
pub mod config;
pub mod error;
pub mod traits;

// Re-exports
pub use auth::{AuthConfig, AuthLocation};
pub use config::{DispatchConfig, DynapiConfig, HttpConfig, ObservabilityConfig};
pub use error::{Error, Result};
pub use traits::{Tool, ToolResponse};
