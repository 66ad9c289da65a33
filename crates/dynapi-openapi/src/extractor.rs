//! Operation extraction.
//!
//! Walks the document's `paths` table and normalizes every method entry into
//! an [`Operation`].

use crate::document::Document;
use crate::types::{HttpMethod, Operation, Parameter, RequestBody};
use serde_json::Value;
use tracing::{debug, warn};

const JSON_MEDIA_TYPE: &str = "application/json";

/// Extract all operations, in path declaration order and then method order.
///
/// Operations without an `operationId` are kept; registering them is the
/// registry's decision.
pub fn extract_operations(document: &Document) -> Vec<Operation> {
    let mut operations = Vec::new();

    for (path, path_item) in document.paths() {
        let Some(path_item) = path_item.as_object() else {
            warn!("Skipping path item that is not a mapping: {}", path);
            continue;
        };

        let path_parameters = path_item.get("parameters");
        let path_servers = path_item.get("servers");

        for method in HttpMethod::ALL {
            let Some(raw) = path_item.get(method.as_str()).and_then(Value::as_object) else {
                continue;
            };
            if raw.is_empty() {
                continue;
            }

            let mut parameters = parse_parameters(document, raw.get("parameters"), path, method);
            parameters.extend(parse_parameters(document, path_parameters, path, method));

            let mut servers = as_list(raw.get("servers"));
            servers.extend(as_list(path_servers));

            let security = raw
                .get("security")
                .or_else(|| document.security())
                .cloned();

            operations.push(Operation {
                operation_id: raw
                    .get("operationId")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                path: path.clone(),
                method,
                parameters,
                request_body: parse_request_body(document, raw.get("requestBody")),
                summary: string_field(raw.get("summary")),
                description: string_field(raw.get("description")),
                tags: raw
                    .get("tags")
                    .and_then(Value::as_array)
                    .map(|tags| {
                        tags.iter()
                            .filter_map(Value::as_str)
                            .map(str::to_string)
                            .collect()
                    })
                    .unwrap_or_default(),
                deprecated: raw
                    .get("deprecated")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
                servers,
                security,
            });
        }
    }

    debug!("Extracted {} operations", operations.len());
    operations
}

/// Parse a `parameters` list. Duplicate names are kept as declared.
fn parse_parameters(
    document: &Document,
    raw: Option<&Value>,
    path: &str,
    method: HttpMethod,
) -> Vec<Parameter> {
    let mut parameters = Vec::new();

    for entry in raw.and_then(Value::as_array).into_iter().flatten() {
        let entry = match entry.get("$ref").and_then(Value::as_str) {
            Some(reference) => match document.lookup_component(reference, "parameters") {
                Some(target) => target,
                None => {
                    warn!(
                        "Unresolved parameter reference {} in {} {}",
                        reference, method, path
                    );
                    continue;
                }
            },
            None => entry,
        };

        match serde_json::from_value::<Parameter>(entry.clone()) {
            Ok(parameter) => parameters.push(parameter),
            Err(e) => warn!("Skipping malformed parameter in {} {}: {}", method, path, e),
        }
    }

    parameters
}

fn parse_request_body(document: &Document, raw: Option<&Value>) -> Option<RequestBody> {
    let mut raw = raw?;
    if let Some(reference) = raw.get("$ref").and_then(Value::as_str) {
        raw = match document.lookup_component(reference, "requestBodies") {
            Some(target) => target,
            None => {
                warn!("Unresolved request body reference {}", reference);
                return None;
            }
        };
    }

    let json_content = raw.get("content").and_then(|c| c.get(JSON_MEDIA_TYPE));

    Some(RequestBody {
        description: raw
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string),
        required: raw.get("required").and_then(Value::as_bool).unwrap_or(false),
        accepts_json: json_content.is_some_and(|c| !c.is_null()),
        json_schema: json_content.and_then(|c| c.get("schema")).cloned(),
    })
}

fn as_list(raw: Option<&Value>) -> Vec<Value> {
    raw.and_then(Value::as_array).cloned().unwrap_or_default()
}

fn string_field(raw: Option<&Value>) -> String {
    raw.and_then(Value::as_str).unwrap_or_default().to_string()
}
