//! Tool descriptors for LLM function calling.

use crate::resolver::ResolvedSchemaMap;
use crate::types::{Operation, Parameter, ParameterLocation, ParameterSchema};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value, json};

/// Name, description and argument schema of one callable operation.
///
/// Serializes to the function-calling shape
/// `{"type": "function", "function": {"name", "description", "parameters"}}`.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    /// JSON Schema object describing the call arguments
    pub parameters: Value,
}

impl Serialize for ToolDescriptor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(serde::Serialize)]
        struct Function<'a> {
            name: &'a str,
            description: &'a str,
            parameters: &'a Value,
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", "function")?;
        map.serialize_entry(
            "function",
            &Function {
                name: &self.name,
                description: &self.description,
                parameters: &self.parameters,
            },
        )?;
        map.end()
    }
}

impl ToolDescriptor {
    /// The function-calling JSON form.
    pub fn to_json(&self) -> Value {
        json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

/// Build the tool descriptor for `operation`, registered under `name`.
///
/// The argument schema holds a `body` property (the resolved request body
/// schema, or `{}`) plus one property per path and query parameter.
pub fn build_tool(name: &str, operation: &Operation, schemas: &ResolvedSchemaMap) -> ToolDescriptor {
    let body = operation.request_body.as_ref();

    let mut required = Vec::new();
    if operation.request_body_required() {
        required.push(Value::from("body"));
    }

    let mut properties = Map::new();
    properties.insert(
        "body".to_string(),
        operation
            .request_body_schema()
            .map(|schema| schemas.resolve_inline(schema))
            .unwrap_or_else(|| json!({})),
    );

    for param in operation.parameters.iter().filter(|p| {
        matches!(p.location, ParameterLocation::Path | ParameterLocation::Query)
    }) {
        if param.required {
            required.push(Value::from(param.name.as_str()));
        }
        properties.insert(param.name.clone(), parameter_property(param, schemas));
    }

    let description = if operation.summary.is_empty() {
        operation.description.clone()
    } else {
        operation.summary.clone()
    };

    ToolDescriptor {
        name: name.to_string(),
        description,
        parameters: json!({
            "type": "object",
            "required": required,
            "description": body.and_then(|b| b.description.as_deref()).unwrap_or_default(),
            "properties": properties,
        }),
    }
}

fn parameter_property(param: &Parameter, schemas: &ResolvedSchemaMap) -> Value {
    let referenced;
    let schema = match param.schema.reference.as_deref().and_then(|r| schemas.get(r)) {
        Some(target) => {
            referenced = serde_json::from_value::<ParameterSchema>(target.clone()).unwrap_or_default();
            &referenced
        }
        None => &param.schema,
    };

    let mut item = Map::new();
    item.insert(
        "type".to_string(),
        schema.schema_type.clone().unwrap_or_else(|| json!("string")),
    );
    item.insert(
        "description".to_string(),
        json!(param.description.as_deref().unwrap_or_default()),
    );
    if let Some(format) = schema.format.as_deref().filter(|f| !f.is_empty()) {
        item.insert("format".to_string(), json!(format));
    }
    if let Some(values) = schema.enum_values.as_ref().filter(|v| !v.is_empty()) {
        item.insert("enum".to_string(), json!(values));
    }
    if let Some(example) = schema.example.as_ref().filter(|e| !e.is_null()) {
        item.insert("example".to_string(), example.clone());
    }
    Value::Object(item)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use crate::extractor::extract_operations;
    use crate::resolver::resolve_all;

    fn compile(doc: Value) -> (Vec<Operation>, ResolvedSchemaMap) {
        let doc = Document::new(doc).unwrap();
        let schemas = doc.component_schemas().map(resolve_all).unwrap_or_default();
        (extract_operations(&doc), schemas)
    }

    #[test]
    fn test_required_path_parameter_without_body() {
        let (ops, schemas) = compile(json!({
            "paths": {
                "/items/{id}": {
                    "get": {
                        "operationId": "getItem",
                        "summary": "Fetch one item",
                        "description": "Long form",
                        "parameters": [
                            {"name": "id", "in": "path", "required": true, "schema": {"type": "integer", "format": "int64"}},
                            {"name": "expand", "in": "query", "schema": {"type": "string", "enum": ["owner"]}},
                            {"name": "X-Trace", "in": "header", "schema": {"type": "string"}}
                        ]
                    }
                }
            }
        }));

        let tool = build_tool("getItem", &ops[0], &schemas);
        assert_eq!(tool.name, "getItem");
        assert_eq!(tool.description, "Fetch one item");
        assert_eq!(tool.parameters["required"], json!(["id"]));
        assert_eq!(tool.parameters["properties"]["id"]["type"], "integer");
        assert_eq!(tool.parameters["properties"]["id"]["format"], "int64");
        assert_eq!(tool.parameters["properties"]["expand"]["enum"], json!(["owner"]));
        assert_eq!(tool.parameters["properties"]["body"], json!({}));
        assert!(tool.parameters["properties"].get("X-Trace").is_none());
    }

    #[test]
    fn test_body_schema_is_resolved() {
        let (ops, schemas) = compile(json!({
            "components": {
                "schemas": {
                    "NewPet": {
                        "type": "object",
                        "properties": {"name": {"type": "string"}, "tag": {"$ref": "#/components/schemas/Tag"}}
                    },
                    "Tag": {"type": "string"}
                }
            },
            "paths": {
                "/pets": {
                    "post": {
                        "operationId": "createPet",
                        "description": "Creates a pet",
                        "requestBody": {
                            "description": "Pet to add",
                            "required": true,
                            "content": {"application/json": {"schema": {"$ref": "#/components/schemas/NewPet"}}}
                        }
                    }
                }
            }
        }));

        let tool = build_tool("createPet", &ops[0], &schemas);
        assert_eq!(tool.description, "Creates a pet");
        assert_eq!(tool.parameters["required"], json!(["body"]));
        assert_eq!(tool.parameters["description"], "Pet to add");
        assert_eq!(
            tool.parameters["properties"]["body"]["properties"]["tag"],
            json!({"type": "string"})
        );
    }

    #[test]
    fn test_parameter_defaults_and_references() {
        let (ops, schemas) = compile(json!({
            "components": {"schemas": {"Status": {"type": "string", "enum": ["open", "closed"]}}},
            "paths": {
                "/tickets": {
                    "get": {
                        "operationId": "listTickets",
                        "parameters": [
                            {"name": "q", "in": "query", "description": "Search text"},
                            {"name": "status", "in": "query", "schema": {"$ref": "#/components/schemas/Status"}}
                        ]
                    }
                }
            }
        }));

        let tool = build_tool("listTickets", &ops[0], &schemas);
        assert_eq!(
            tool.parameters["properties"]["q"],
            json!({"type": "string", "description": "Search text"})
        );
        assert_eq!(
            tool.parameters["properties"]["status"]["enum"],
            json!(["open", "closed"])
        );
        assert_eq!(tool.parameters["required"], json!([]));
    }

    #[test]
    fn test_serialized_shape() {
        let tool = ToolDescriptor {
            name: "ping".to_string(),
            description: "Ping".to_string(),
            parameters: json!({"type": "object", "properties": {}}),
        };

        let value = serde_json::to_value(&tool).unwrap();
        assert_eq!(value, tool.to_json());
        assert_eq!(value["type"], "function");
        assert_eq!(value["function"]["name"], "ping");
    }
}
