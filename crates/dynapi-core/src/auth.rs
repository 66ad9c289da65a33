//! Authentication settings for API sessions.
//!
//! Supported methods:
//! - API Key (in header or query parameter)
//! - Bearer Token (Authorization: Bearer <token>)
//! - Basic Auth (Authorization: Basic <base64>)
//!
//! The credentials are applied by the HTTP transport to every request it sends.
//!
//! # Examples
//!
//! ```toml
//! [auth]
//! type = "api_key"
//! location = "header"
//! name = "X-API-Key"
//! key = "${PETSTORE_API_KEY}"
//! ```

use serde::{Deserialize, Serialize};

/// Authentication configuration for API requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AuthConfig {
    /// No authentication
    #[default]
    None,

    /// API Key authentication
    ApiKey {
        /// Location of the API key
        location: AuthLocation,
        /// Name of the header or query parameter
        name: String,
        /// The API key value
        key: String,
    },

    /// Bearer token authentication (Authorization: Bearer <token>)
    Bearer {
        /// The bearer token
        token: String,
    },

    /// HTTP Basic authentication (Authorization: Basic <base64>)
    Basic {
        /// Username
        username: String,
        /// Password
        password: String,
    },
}

/// Location where authentication credentials are provided.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthLocation {
    /// In HTTP header
    Header,
    /// In URL query parameter
    Query,
}

impl AuthConfig {
    /// Create API key authentication in header.
    ///
    /// # Example
    ///
    /// ```
    /// use dynapi_core::AuthConfig;
    ///
    /// let auth = AuthConfig::api_key_header("X-API-Key", "my-secret-key");
    /// ```
    pub fn api_key_header(header_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            location: AuthLocation::Header,
            name: header_name.into(),
            key: key.into(),
        }
    }

    /// Create API key authentication in query parameter.
    pub fn api_key_query(param_name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::ApiKey {
            location: AuthLocation::Query,
            name: param_name.into(),
            key: key.into(),
        }
    }

    /// Create bearer token authentication.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    /// Create basic authentication.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Returns true when no credentials are configured.
    pub fn is_none(&self) -> bool {
        matches!(self, AuthConfig::None)
    }

    /// Secret-bearing fields, for `${VAR}` expansion by the config loader.
    pub(crate) fn secrets_mut(&mut self) -> Vec<&mut String> {
        match self {
            AuthConfig::None => Vec::new(),
            AuthConfig::ApiKey { key, .. } => vec![key],
            AuthConfig::Bearer { token } => vec![token],
            AuthConfig::Basic { username, password } => vec![username, password],
        }
    }
}
