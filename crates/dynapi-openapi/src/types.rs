//! Data structures for compiled operations.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// HTTP methods that can carry an operation in a path item.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Options,
    Head,
}

impl HttpMethod {
    /// Methods in the order they are visited within one path item.
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
        HttpMethod::Options,
        HttpMethod::Head,
    ];

    /// The path-item key for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.as_str().to_ascii_uppercase())
    }
}

/// Location where a parameter appears in the request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    /// Path parameter (e.g., /users/{id})
    Path,
    /// Query parameter (e.g., ?search=value)
    Query,
    /// Header parameter (e.g., X-Custom-Header)
    Header,
    /// Cookie parameter
    Cookie,
}

impl std::fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

/// Narrow projection of a parameter's schema.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ParameterSchema {
    /// `type` keyword; a string, or a list of strings in OpenAPI 3.1
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,

    /// Set when the schema is a `$ref` into `components/schemas`
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// A parameter of an API operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub name: String,

    #[serde(rename = "in")]
    pub location: ParameterLocation,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default)]
    pub schema: ParameterSchema,
}

/// The JSON request body declared by an operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestBody {
    pub description: Option<String>,
    pub required: bool,
    /// `content` declares `application/json`
    pub accepts_json: bool,
    /// `content["application/json"].schema`
    pub json_schema: Option<Value>,
}

/// One (path, method) pair, normalized from the document.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub operation_id: Option<String>,
    /// Path template (e.g., "/users/{id}")
    pub path: String,
    pub method: HttpMethod,
    /// Operation-level parameters followed by path-item-level parameters
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    pub summary: String,
    pub description: String,
    pub tags: Vec<String>,
    pub deprecated: bool,
    /// Operation-level servers followed by path-item-level servers
    pub servers: Vec<Value>,
    /// Security requirements, inherited from the document when absent
    pub security: Option<Value>,
}

impl Operation {
    /// Schema of the JSON request body, if any.
    pub fn request_body_schema(&self) -> Option<&Value> {
        self.request_body.as_ref()?.json_schema.as_ref()
    }

    pub fn request_body_required(&self) -> bool {
        self.request_body.as_ref().is_some_and(|b| b.required)
    }

    /// Whether the operation declares an `application/json` request body.
    pub fn accepts_json_body(&self) -> bool {
        self.request_body.as_ref().is_some_and(|b| b.accepts_json)
    }

    /// Declared parameters at one location, in declaration order.
    pub fn parameters_in(&self, location: ParameterLocation) -> impl Iterator<Item = &Parameter> {
        self.parameters
            .iter()
            .filter(move |p| p.location == location)
    }
}

/// Normalized result of one invocation.
///
/// A non-2xx status is not an error; callers inspect `status`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InvocationResponse {
    /// Parsed JSON when the response is JSON, otherwise the raw text
    pub data: Value,
    pub status: u16,
    pub headers: IndexMap<String, String>,
}

impl InvocationResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
