//! `$ref` resolution for `components/schemas`.
//!
//! Only `$ref`, `object`/`properties` and `array`/`items` are interpreted;
//! every other keyword is carried through untouched. Resolution never
//! fails: a missing target becomes `{}` and a reference met again while it
//! is still being expanded becomes the placeholder `{"type": "object"}`.

use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Prefix of references into `components/schemas`.
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Reference path for a named component schema.
pub fn schema_ref(name: &str) -> String {
    format!("{}{}", SCHEMA_REF_PREFIX, name)
}

/// Schema substituted where expansion would re-enter a reference.
fn cycle_placeholder() -> Value {
    json!({"type": "object"})
}

/// Resolved component schemas, keyed by reference path.
///
/// Built once per client and read-only afterwards.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedSchemaMap {
    schemas: IndexMap<String, Value>,
}

impl ResolvedSchemaMap {
    /// Resolved schema for a reference path such as `#/components/schemas/Pet`.
    pub fn get(&self, reference: &str) -> Option<&Value> {
        self.schemas.get(reference)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.schemas.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// The resolved schemas keyed by plain component name, i.e. in the
    /// shape of `components.schemas`.
    pub fn to_components(&self) -> Map<String, Value> {
        self.schemas
            .iter()
            .map(|(reference, schema)| {
                let name = reference
                    .strip_prefix(SCHEMA_REF_PREFIX)
                    .unwrap_or(reference);
                (name.to_string(), schema.clone())
            })
            .collect()
    }

    /// Inline references in a schema that lives outside `components`,
    /// such as a request body schema.
    pub fn resolve_inline(&self, schema: &Value) -> Value {
        if let Some(reference) = ref_of(schema) {
            return match self.get(reference) {
                Some(resolved) => resolved.clone(),
                None => {
                    warn!("Unresolved schema reference: {}", reference);
                    json!({})
                }
            };
        }
        map_children(schema, |child| self.resolve_inline(child))
    }
}

/// Resolves `$ref` pointers against one `components.schemas` mapping.
pub struct ReferenceResolver<'a> {
    schemas: &'a Map<String, Value>,
    /// References on the active expansion stack
    visiting: HashSet<String>,
    /// Expansions that never hit a cycle and are therefore context-free
    cache: HashMap<String, Value>,
    /// Number of placeholders substituted so far
    cuts: usize,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(schemas: &'a Map<String, Value>) -> Self {
        Self {
            schemas,
            visiting: HashSet::new(),
            cache: HashMap::new(),
            cuts: 0,
        }
    }

    /// Resolve every component schema.
    pub fn resolve_all(mut self) -> ResolvedSchemaMap {
        let schemas = self.schemas;
        let mut resolved = IndexMap::with_capacity(schemas.len());
        for name in schemas.keys() {
            let reference = schema_ref(name);
            let schema = self.resolve_reference(&reference);
            resolved.insert(reference, schema);
        }

        debug!(
            "Resolved {} component schemas ({} cycle placeholders)",
            resolved.len(),
            self.cuts
        );
        ResolvedSchemaMap { schemas: resolved }
    }

    /// Resolve one schema, inlining every reachable reference.
    pub fn resolve_one(&mut self, schema: &Value) -> Value {
        match ref_of(schema) {
            Some(reference) => self.resolve_reference(reference),
            None => map_children(schema, |child| self.resolve_one(child)),
        }
    }

    fn resolve_reference(&mut self, reference: &str) -> Value {
        if self.visiting.contains(reference) {
            debug!("Cycle through {} replaced by placeholder", reference);
            self.cuts += 1;
            return cycle_placeholder();
        }
        if let Some(cached) = self.cache.get(reference) {
            return cached.clone();
        }

        let schemas = self.schemas;
        let target = reference
            .strip_prefix(SCHEMA_REF_PREFIX)
            .and_then(|name| schemas.get(name));
        let Some(target) = target else {
            warn!("Unresolved schema reference: {}", reference);
            return json!({});
        };

        let cuts_before = self.cuts;
        self.visiting.insert(reference.to_string());
        let resolved = self.resolve_one(target);
        self.visiting.remove(reference);

        if self.cuts == cuts_before {
            self.cache.insert(reference.to_string(), resolved.clone());
        }
        resolved
    }
}

/// Resolve all component schemas of a document.
pub fn resolve_all(schemas: &Map<String, Value>) -> ResolvedSchemaMap {
    ReferenceResolver::new(schemas).resolve_all()
}

fn ref_of(schema: &Value) -> Option<&str> {
    schema.get("$ref")?.as_str()
}

/// Rebuild `schema` with `f` applied to its `properties` (for objects) or
/// `items` (for arrays). Other schemas are returned unchanged.
fn map_children(schema: &Value, mut f: impl FnMut(&Value) -> Value) -> Value {
    let mut out = schema.clone();
    match schema.get("type").and_then(Value::as_str) {
        Some("object") => {
            if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
                let resolved: Map<String, Value> = properties
                    .iter()
                    .map(|(name, property)| (name.clone(), f(property)))
                    .collect();
                out["properties"] = Value::Object(resolved);
            }
        }
        Some("array") => {
            if let Some(items) = schema.get("items") {
                out["items"] = f(items);
            }
        }
        _ => {}
    }
    out
}
