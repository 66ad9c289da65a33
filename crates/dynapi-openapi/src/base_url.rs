//! Base URL computation from the document's first server entry.

use crate::document::Document;
use serde_json::Value;
use tracing::debug;
use url::Url;

/// Compute the origin requests are sent to.
///
/// - an absolute first server URL is used verbatim;
/// - a relative one is joined onto the scheme and host of `source_url`;
/// - without a source URL the relative path is returned unchanged.
///
/// Only the first server entry is considered.
pub fn compute_base_url(document: &Document, source_url: Option<&Url>) -> String {
    let Some(server_url) = document.servers().first().and_then(expand_server_url) else {
        // No servers: fall back to the origin the document was fetched from.
        return source_url.and_then(origin_of).unwrap_or_default();
    };

    if Url::parse(&server_url).is_ok() {
        debug!("Base URL (absolute server): {}", server_url);
        return server_url;
    }

    let joined = source_url
        .and_then(origin_of)
        .and_then(|origin| Url::parse(&origin).ok())
        .and_then(|origin| origin.join(&server_url).ok())
        .map(String::from);

    match joined {
        Some(url) => {
            debug!("Base URL (server relative to source): {}", url);
            url
        }
        None => server_url,
    }
}

/// `url` with `{variable}` placeholders replaced by their declared defaults.
fn expand_server_url(server: &Value) -> Option<String> {
    let mut url = server.get("url")?.as_str()?.to_string();

    if let Some(variables) = server.get("variables").and_then(Value::as_object) {
        for (name, variable) in variables {
            if let Some(default) = variable.get("default").and_then(Value::as_str) {
                url = url.replace(&format!("{{{}}}", name), default);
            }
        }
    }

    Some(url)
}

/// `scheme://host[:port]`, or `None` for opaque origins such as `file:`.
fn origin_of(url: &Url) -> Option<String> {
    let origin = url.origin();
    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(servers: Value) -> Document {
        Document::new(json!({"openapi": "3.0.0", "servers": servers})).unwrap()
    }

    #[test]
    fn test_absolute_server_is_used_verbatim() {
        let doc = document(json!([
            {"url": "https://api.example.com/v1"},
            {"url": "https://staging.example.com/v1"}
        ]));
        let source = Url::parse("https://docs.example.org/openapi.json").unwrap();

        assert_eq!(
            compute_base_url(&doc, Some(&source)),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn test_relative_server_joins_source_origin() {
        let doc = document(json!([{"url": "/api/v3"}]));
        let source = Url::parse("http://localhost:8080/specs/openapi.yaml").unwrap();

        assert_eq!(
            compute_base_url(&doc, Some(&source)),
            "http://localhost:8080/api/v3"
        );
    }

    #[test]
    fn test_relative_server_without_source_is_unchanged() {
        let doc = document(json!([{"url": "/api/v3"}]));
        assert_eq!(compute_base_url(&doc, None), "/api/v3");
    }

    #[test]
    fn test_server_variables_use_defaults() {
        let doc = document(json!([{
            "url": "https://{region}.example.com/{version}",
            "variables": {
                "region": {"default": "eu", "enum": ["eu", "us"]},
                "version": {"default": "v2"}
            }
        }]));

        assert_eq!(compute_base_url(&doc, None), "https://eu.example.com/v2");
    }

    #[test]
    fn test_no_servers() {
        let doc = Document::new(json!({"openapi": "3.0.0"})).unwrap();
        let source = Url::parse("https://petstore.example.com/openapi.json").unwrap();

        assert_eq!(
            compute_base_url(&doc, Some(&source)),
            "https://petstore.example.com"
        );
        assert_eq!(compute_base_url(&doc, None), "");
    }
}
