//! Operation registry.
//!
//! Maps operation ids to their compiled form. Built once when the client is
//! constructed and never mutated afterwards.

use crate::resolver::ResolvedSchemaMap;
use crate::tools::{ToolDescriptor, build_tool};
use crate::types::Operation;
use indexmap::IndexMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// An operation paired with its tool descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledOperation {
    pub operation: Operation,
    pub tool: ToolDescriptor,
}

/// Registered operations in document order.
#[derive(Debug, Clone, Default)]
pub struct OperationRegistry {
    operations: IndexMap<String, Arc<CompiledOperation>>,
    /// One path template per extracted operation, named or not
    path_templates: Vec<String>,
}

impl OperationRegistry {
    /// Register every operation that has an `operationId`.
    ///
    /// On a duplicate id the later operation replaces the earlier one but
    /// keeps its position.
    pub fn compile(operations: Vec<Operation>, schemas: &ResolvedSchemaMap) -> Self {
        let mut registry = Self::default();

        for operation in operations {
            registry.path_templates.push(operation.path.clone());

            let Some(name) = operation.operation_id.clone() else {
                debug!(
                    "Skipping {} {}: no operationId",
                    operation.method, operation.path
                );
                continue;
            };

            let tool = build_tool(&name, &operation, schemas);
            let compiled = Arc::new(CompiledOperation { operation, tool });
            if let Some(previous) = registry.operations.insert(name.clone(), compiled) {
                warn!(
                    "Duplicate operationId '{}': {} {} replaced by a later declaration",
                    name, previous.operation.method, previous.operation.path
                );
            }
        }

        debug!("Registered {} operations", registry.operations.len());
        registry
    }

    pub fn get(&self, name: &str) -> Option<&Arc<CompiledOperation>> {
        self.operations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.operations.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Registered operation ids, in document order.
    pub fn operation_names(&self) -> Vec<&str> {
        self.operations.keys().map(String::as_str).collect()
    }

    /// Path template of every extracted operation, in extraction order.
    /// A path carrying several methods appears once per method.
    pub fn path_templates(&self) -> &[String] {
        &self.path_templates
    }

    /// One descriptor per registered operation, in document order.
    pub fn tool_descriptors(&self) -> Vec<&ToolDescriptor> {
        self.operations.values().map(|c| &c.tool).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<CompiledOperation>)> {
        self.operations.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<'a> IntoIterator for &'a OperationRegistry {
    type Item = (&'a String, &'a Arc<CompiledOperation>);
    type IntoIter = indexmap::map::Iter<'a, String, Arc<CompiledOperation>>;

    fn into_iter(self) -> Self::IntoIter {
        self.operations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::extractor::extract_operations;
    use crate::types::HttpMethod;
    use serde_json::{Value, json};

    fn registry(doc: Value) -> OperationRegistry {
        let doc = Document::new(doc).unwrap();
        OperationRegistry::compile(extract_operations(&doc), &ResolvedSchemaMap::default())
    }

    #[test]
    fn test_unnamed_operations_are_not_registered() {
        let registry = registry(json!({
            "paths": {
                "/health": {"get": {"summary": "Health"}},
                "/pets": {"get": {"operationId": "listPets"}}
            }
        }));

        assert_eq!(registry.operation_names(), ["listPets"]);
        assert_eq!(registry.path_templates(), ["/health", "/pets"]);
        assert_eq!(registry.tool_descriptors().len(), 1);
    }

    #[test]
    fn test_duplicate_operation_id_last_wins() {
        let registry = registry(json!({
            "paths": {
                "/a": {"get": {"operationId": "dup", "summary": "first"}},
                "/b": {"get": {"operationId": "other"}},
                "/c": {"post": {"operationId": "dup", "summary": "second"}}
            }
        }));

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.operation_names(), ["dup", "other"]);
        let dup = registry.get("dup").unwrap();
        assert_eq!(dup.operation.path, "/c");
        assert_eq!(dup.operation.method, HttpMethod::Post);
        assert_eq!(dup.tool.description, "second");
    }

    #[test]
    fn test_empty_document() {
        let registry = registry(json!({"openapi": "3.0.0"}));
        assert!(registry.is_empty());
        assert!(!registry.contains("anything"));
        assert!(registry.path_templates().is_empty());
    }

    #[test]
    fn test_iteration_order() {
        let registry = registry(json!({
            "paths": {
                "/pets": {
                    "get": {"operationId": "listPets"},
                    "post": {"operationId": "createPet"}
                }
            }
        }));

        let names: Vec<&String> = (&registry).into_iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["listPets", "createPet"]);
        assert_eq!(registry.path_templates(), ["/pets", "/pets"]);
        assert_eq!(registry.iter().count(), 2);
    }
}
