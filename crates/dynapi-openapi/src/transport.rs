//! HTTP transport.
//!
//! The dispatcher hands a [`RequestPlan`] to a [`Transport`] and gets the raw
//! response back. [`ReqwestTransport`] is the production implementation; tests
//! substitute their own.

use crate::error::TransportError;
use crate::planner::RequestPlan;
use crate::types::HttpMethod;
use async_trait::async_trait;
use dynapi_core::{AuthConfig, AuthLocation, HttpConfig};
use indexmap::IndexMap;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Extra argument recognized by [`ReqwestTransport`]: request timeout in seconds.
pub const TIMEOUT_ARG: &str = "timeout";

/// Raw response as received from the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransportResponse {
    pub status: u16,
    /// Lower-cased header names; repeated headers joined with `", "`
    pub headers: IndexMap<String, String>,
    pub body: String,
}

impl TransportResponse {
    /// The `Content-Type` header, matched case-insensitively.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
    }

    /// Whether the content type names `application/json`.
    pub fn is_json(&self) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"))
    }
}

/// Sends planned requests.
///
/// Implementations own connection pooling and credentials. A non-2xx status
/// is a successful send.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, plan: &RequestPlan) -> Result<TransportResponse, TransportError>;

    /// Release pooled connections. Default is a no-op.
    async fn close(&self) {}
}

/// [`Transport`] backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    auth: AuthConfig,
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::with_client(reqwest::Client::new())
    }

    /// Wrap an existing session.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            auth: AuthConfig::None,
        }
    }

    /// Build a session from HTTP settings.
    pub fn from_http_config(config: &HttpConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        if let Some(user_agent) = &config.user_agent {
            builder = builder.user_agent(user_agent.clone());
        }
        Ok(Self::with_client(builder.build()?))
    }

    /// Credentials applied to every request.
    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    /// The underlying session, shared with definition loading.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    fn build_request(&self, plan: &RequestPlan) -> reqwest::RequestBuilder {
        let mut builder = self.client.request(to_reqwest_method(plan.method), &plan.url);

        if !plan.query.is_empty() {
            builder = builder.query(&plan.query);
        }
        for (name, value) in &plan.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = &plan.body {
            builder = builder.json(body);
        }

        for (key, value) in &plan.extra {
            match (key.as_str(), value.as_f64()) {
                (TIMEOUT_ARG, Some(secs)) if secs > 0.0 => match Duration::try_from_secs_f64(secs) {
                    Ok(timeout) => builder = builder.timeout(timeout),
                    Err(e) => warn!("Ignoring out-of-range timeout {}: {}", secs, e),
                },
                _ => debug!("Ignoring unrouted argument: {}", key),
            }
        }

        apply_auth(&self.auth, builder)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip_all, fields(method = %plan.method, url = %plan.url))]
    async fn send(&self, plan: &RequestPlan) -> Result<TransportResponse, TransportError> {
        let response = self.build_request(plan).send().await?;
        let status = response.status().as_u16();
        debug!("Response status: {}", status);

        let mut headers: IndexMap<String, String> = IndexMap::new();
        for (name, value) in response.headers() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers
                .entry(name.as_str().to_string())
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(&value);
                })
                .or_insert(value);
        }

        let body = response.text().await?;
        Ok(TransportResponse {
            status,
            headers,
            body,
        })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Head => reqwest::Method::HEAD,
    }
}

/// Apply credentials to a request.
fn apply_auth(auth: &AuthConfig, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match auth {
        AuthConfig::None => builder,
        AuthConfig::ApiKey {
            location,
            name,
            key,
        } => match location {
            AuthLocation::Header => builder.header(name.as_str(), key.as_str()),
            AuthLocation::Query => builder.query(&[(name, key)]),
        },
        AuthConfig::Bearer { token } => builder.bearer_auth(token),
        AuthConfig::Basic { username, password } => builder.basic_auth(username, Some(password)),
    }
}

/// Parse a JSON body; an empty body reads as `null`.
pub(crate) fn parse_json_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
}
