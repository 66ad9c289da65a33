//! Request planning.
//!
//! Routes call-time arguments into path, query, header and body slots and
//! renders the final URL. Nothing is validated against declared types.

use crate::types::{HttpMethod, Operation, ParameterLocation};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::{debug, instrument, warn};
use url::Url;

/// Argument key holding verbatim request headers.
pub const HEADERS_ARG: &str = "headers";
/// Argument keys holding an explicit request body, in priority order.
pub const BODY_ARGS: [&str; 2] = ["data", "body"];

/// Options controlling argument routing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerOptions {
    /// Fold leftover arguments into a JSON object body when no explicit body
    /// is given and the operation declares a JSON request body.
    pub fold_unmatched_args_into_body: bool,
}

impl Default for PlannerOptions {
    fn default() -> Self {
        Self {
            fold_unmatched_args_into_body: true,
        }
    }
}

/// A fully routed request, ready for the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestPlan {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
    pub headers: IndexMap<String, String>,
    /// Arguments no slot claimed; handed to the transport untouched
    pub extra: Map<String, Value>,
}

/// Partition `args` for `operation` and build the request URL.
#[instrument(skip_all, fields(method = %operation.method, path = %operation.path))]
pub fn plan_request(
    operation: &Operation,
    base_url: &str,
    mut args: Map<String, Value>,
    options: &PlannerOptions,
) -> RequestPlan {
    let mut path = operation.path.clone();
    for param in operation.parameters_in(ParameterLocation::Path) {
        if let Some(value) = args.remove(&param.name) {
            path = path.replace(&format!("{{{}}}", param.name), &value_to_string(&value));
        }
    }
    let url = join_url(base_url, &path);

    let mut query = Vec::new();
    for param in operation.parameters_in(ParameterLocation::Query) {
        if let Some(value) = args.remove(&param.name) {
            push_query_value(&mut query, &param.name, value);
        }
    }

    let mut headers = IndexMap::new();
    for param in operation.parameters_in(ParameterLocation::Header) {
        if let Some(value) = args.remove(&param.name) {
            headers.insert(param.name.clone(), value_to_string(&value));
        }
    }

    let cookies: Vec<String> = operation
        .parameters_in(ParameterLocation::Cookie)
        .filter_map(|param| {
            args.remove(&param.name)
                .map(|value| format!("{}={}", param.name, value_to_string(&value)))
        })
        .collect();
    if !cookies.is_empty() {
        headers.insert("Cookie".to_string(), cookies.join("; "));
    }

    match args.remove(HEADERS_ARG) {
        Some(Value::Object(explicit)) => {
            for (name, value) in explicit {
                headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
                headers.insert(name, value_to_string(&value));
            }
        }
        Some(Value::Null) | None => {}
        Some(other) => warn!("Ignoring non-object `headers` argument: {}", other),
    }

    let mut body = BODY_ARGS
        .iter()
        .find_map(|key| args.remove(*key).filter(|value| !value.is_null()));
    if body.is_none()
        && options.fold_unmatched_args_into_body
        && operation.accepts_json_body()
        && !args.is_empty()
    {
        debug!("Folding {} unmatched arguments into the JSON body", args.len());
        body = Some(Value::Object(std::mem::take(&mut args)));
    }

    RequestPlan {
        method: operation.method,
        url,
        query,
        body,
        headers,
        extra: args,
    }
}

/// Origin that relative bases are resolved under, then stripped again.
const RELATIVE_BASE_ORIGIN: &str = "http://relative.invalid";

/// Join `path` onto `base` with URL reference semantics: an absolute path
/// replaces the base's path, a relative one resolves against its directory.
///
/// A relative base resolves the same way and yields a relative URL.
pub fn join_url(base: &str, path: &str) -> String {
    if base.is_empty() {
        return path.to_string();
    }
    let joined = match Url::parse(base) {
        Ok(base_url) => base_url.join(path).map(String::from),
        Err(_) => Url::parse(RELATIVE_BASE_ORIGIN)
            .and_then(|origin| origin.join(base))
            .and_then(|base_url| base_url.join(path))
            .map(|url| url[url::Position::BeforePath..].to_string()),
    };
    joined.unwrap_or_else(|e| {
        warn!("Cannot join {} onto {}: {}", path, base, e);
        format!("{}{}", base, path)
    })
}

/// String form of an argument: strings unquoted, everything else as JSON.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn push_query_value(query: &mut Vec<(String, String)>, name: &str, value: Value) {
    match value {
        Value::Null => {}
        Value::Array(items) => {
            for item in items.iter().filter(|item| !item.is_null()) {
                query.push((name.to_string(), value_to_string(item)));
            }
        }
        other => query.push((name.to_string(), value_to_string(&other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Parameter, ParameterSchema, RequestBody};
    use serde_json::json;

    fn param(name: &str, location: ParameterLocation) -> Parameter {
        Parameter {
            name: name.to_string(),
            location,
            required: location == ParameterLocation::Path,
            description: None,
            schema: ParameterSchema::default(),
        }
    }

    fn operation(method: HttpMethod, path: &str, parameters: Vec<Parameter>) -> Operation {
        Operation {
            operation_id: Some("op".to_string()),
            path: path.to_string(),
            method,
            parameters,
            request_body: None,
            summary: String::new(),
            description: String::new(),
            tags: Vec::new(),
            deprecated: false,
            servers: Vec::new(),
            security: None,
        }
    }

    fn json_body_operation() -> Operation {
        let mut op = operation(HttpMethod::Post, "/pets", vec![param("dryRun", ParameterLocation::Query)]);
        op.request_body = Some(RequestBody {
            description: None,
            required: true,
            accepts_json: true,
            json_schema: Some(json!({"type": "object"})),
        });
        op
    }

    fn args(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_path_parameter_substitution() {
        let op = operation(
            HttpMethod::Get,
            "/pets/{petId}",
            vec![param("petId", ParameterLocation::Path)],
        );
        let plan = plan_request(
            &op,
            "https://api.example.com",
            args(json!({"petId": 1})),
            &PlannerOptions::default(),
        );

        assert_eq!(plan.url, "https://api.example.com/pets/1");
        assert!(plan.query.is_empty());
        assert!(plan.extra.is_empty());
        assert!(plan.body.is_none());
    }

    #[test]
    fn test_unmatched_placeholder_stays_literal() {
        let op = operation(
            HttpMethod::Get,
            "/owners/{ownerId}/pets/{petId}",
            vec![
                param("ownerId", ParameterLocation::Path),
                param("petId", ParameterLocation::Path),
            ],
        );
        let plan = plan_request(&op, "", args(json!({"ownerId": "ann"})), &PlannerOptions::default());
        assert_eq!(plan.url, "/owners/ann/pets/{petId}");
    }

    #[test]
    fn test_query_routing() {
        let op = operation(
            HttpMethod::Get,
            "/pets",
            vec![
                param("limit", ParameterLocation::Query),
                param("tags", ParameterLocation::Query),
                param("cursor", ParameterLocation::Query),
            ],
        );
        let plan = plan_request(
            &op,
            "https://api.example.com",
            args(json!({"limit": 10, "tags": ["a", "b"], "cursor": null, "timeout": 3})),
            &PlannerOptions::default(),
        );

        assert_eq!(
            plan.query,
            vec![
                ("limit".to_string(), "10".to_string()),
                ("tags".to_string(), "a".to_string()),
                ("tags".to_string(), "b".to_string()),
            ]
        );
        assert_eq!(plan.extra, args(json!({"timeout": 3})));
    }

    #[test]
    fn test_leftover_arguments_fold_into_body() {
        let plan = plan_request(
            &json_body_operation(),
            "https://api.example.com",
            args(json!({"name": "Rex"})),
            &PlannerOptions::default(),
        );

        assert_eq!(plan.body, Some(json!({"name": "Rex"})));
        assert!(plan.query.is_empty());
        assert!(plan.extra.is_empty());
    }

    #[test]
    fn test_folding_can_be_disabled() {
        let options = PlannerOptions {
            fold_unmatched_args_into_body: false,
        };
        let plan = plan_request(
            &json_body_operation(),
            "https://api.example.com",
            args(json!({"name": "Rex"})),
            &options,
        );

        assert!(plan.body.is_none());
        assert_eq!(plan.extra, args(json!({"name": "Rex"})));
    }

    #[test]
    fn test_explicit_body_wins_over_folding() {
        let plan = plan_request(
            &json_body_operation(),
            "https://api.example.com",
            args(json!({"data": {"name": "Rex"}, "body": {"name": "Max"}, "dryRun": true})),
            &PlannerOptions::default(),
        );

        assert_eq!(plan.body, Some(json!({"name": "Rex"})));
        assert_eq!(plan.query, vec![("dryRun".to_string(), "true".to_string())]);
        assert_eq!(plan.extra, args(json!({"body": {"name": "Max"}})));
    }

    #[test]
    fn test_null_explicit_body_is_absent() {
        let plan = plan_request(
            &json_body_operation(),
            "https://api.example.com",
            args(json!({"data": null, "name": "Rex"})),
            &PlannerOptions::default(),
        );
        assert_eq!(plan.body, Some(json!({"name": "Rex"})));
        assert!(plan.extra.is_empty());

        let plan = plan_request(
            &json_body_operation(),
            "https://api.example.com",
            args(json!({"data": null, "body": {"name": "Max"}})),
            &PlannerOptions::default(),
        );
        assert_eq!(plan.body, Some(json!({"name": "Max"})));
    }

    #[test]
    fn test_explicit_headers_override_case_insensitively() {
        let op = operation(
            HttpMethod::Get,
            "/pets",
            vec![param("X-Request-Id", ParameterLocation::Header)],
        );
        let plan = plan_request(
            &op,
            "https://api.example.com",
            args(json!({"X-Request-Id": "abc", "headers": {"x-request-id": "override"}})),
            &PlannerOptions::default(),
        );

        assert_eq!(plan.headers.len(), 1);
        assert_eq!(plan.headers["x-request-id"], "override");
    }

    #[test]
    fn test_no_folding_without_json_body() {
        let op = operation(HttpMethod::Delete, "/pets", Vec::new());
        let plan = plan_request(
            &op,
            "https://api.example.com",
            args(json!({"name": "Rex"})),
            &PlannerOptions::default(),
        );

        assert!(plan.body.is_none());
        assert_eq!(plan.extra, args(json!({"name": "Rex"})));
    }

    #[test]
    fn test_header_and_cookie_routing() {
        let op = operation(
            HttpMethod::Get,
            "/pets",
            vec![
                param("X-Request-Id", ParameterLocation::Header),
                param("session", ParameterLocation::Cookie),
                param("theme", ParameterLocation::Cookie),
            ],
        );
        let plan = plan_request(
            &op,
            "https://api.example.com",
            args(json!({
                "X-Request-Id": "abc",
                "session": "s1",
                "theme": "dark",
                "headers": {"X-Request-Id": "override", "Accept": "application/json"}
            })),
            &PlannerOptions::default(),
        );

        assert_eq!(plan.headers["X-Request-Id"], "override");
        assert_eq!(plan.headers["Accept"], "application/json");
        assert_eq!(plan.headers.len(), 3);
        assert_eq!(plan.headers["Cookie"], "session=s1; theme=dark");
        assert!(plan.extra.is_empty());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://api.example.com", "/pets"), "https://api.example.com/pets");
        assert_eq!(join_url("https://api.example.com/v1", "/pets"), "https://api.example.com/pets");
        assert_eq!(join_url("https://api.example.com/v1/", "pets"), "https://api.example.com/v1/pets");
        assert_eq!(join_url("/api/v3", "/pets"), "/pets");
        assert_eq!(join_url("/api/v3/", "pets"), "/api/v3/pets");
        assert_eq!(join_url("/api/v3", "pets?x=1"), "/api/pets?x=1");
        assert_eq!(join_url("", "/pets"), "/pets");
    }
}
