//! Read-only view over a parsed OpenAPI document.

use crate::error::{OpenApiError, Result};
use serde_json::{Map, Value};

/// A parsed OpenAPI document.
///
/// The document is kept as a generic JSON tree; key order follows the
/// source so paths are visited in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    root: Map<String, Value>,
}

impl Document {
    /// Wrap a parsed tree. The root must be a mapping.
    pub fn new(root: Value) -> Result<Self> {
        match root {
            Value::Object(root) => Ok(Self { root }),
            other => Err(OpenApiError::load(format!(
                "document root must be a mapping, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    /// Path templates and their path items, in declaration order.
    pub fn paths(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flatten()
    }

    pub fn servers(&self) -> &[Value] {
        self.root
            .get("servers")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Document-wide default security requirement.
    pub fn security(&self) -> Option<&Value> {
        self.root.get("security")
    }

    /// `components.<section>` as a mapping.
    pub fn components(&self, section: &str) -> Option<&Map<String, Value>> {
        self.root
            .get("components")?
            .get(section)?
            .as_object()
    }

    /// `components.schemas`, the input of reference resolution.
    pub fn component_schemas(&self) -> Option<&Map<String, Value>> {
        self.components("schemas")
    }

    /// Look up a local reference such as `#/components/parameters/limit`.
    pub fn lookup_component(&self, reference: &str, section: &str) -> Option<&Value> {
        let name = reference
            .strip_prefix("#/components/")?
            .strip_prefix(section)?
            .strip_prefix('/')?;
        self.components(section)?.get(name)
    }

    pub fn title(&self) -> Option<&str> {
        self.info_field("title")
    }

    pub fn version(&self) -> Option<&str> {
        self.info_field("version")
    }

    fn info_field(&self, field: &str) -> Option<&str> {
        self.root.get("info")?.get(field)?.as_str()
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a sequence",
        Value::Object(_) => "a mapping",
    }
}
