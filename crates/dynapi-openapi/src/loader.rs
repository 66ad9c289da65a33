//! Definition loading.
//!
//! Turns a [`DefinitionSource`] into a [`Document`]. YAML is chosen by file
//! extension or `Content-Type`; everything else is read as JSON.

use crate::document::Document;
use crate::error::{OpenApiError, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

/// Where an OpenAPI definition comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DefinitionSource {
    /// Fetched over HTTP(S); also used to resolve relative server URLs
    Url(String),
    /// Read from the local filesystem
    File(PathBuf),
    /// Raw JSON or YAML text
    Text(String),
    /// An already-parsed document
    Document(Value),
}

impl DefinitionSource {
    /// A file source when `source` names an existing file, otherwise a URL.
    pub fn detect(source: &str) -> Self {
        if Path::new(source).is_file() {
            DefinitionSource::File(PathBuf::from(source))
        } else {
            DefinitionSource::Url(source.to_string())
        }
    }
}

impl From<&str> for DefinitionSource {
    fn from(source: &str) -> Self {
        Self::detect(source)
    }
}

impl From<String> for DefinitionSource {
    fn from(source: String) -> Self {
        Self::detect(&source)
    }
}

impl From<PathBuf> for DefinitionSource {
    fn from(path: PathBuf) -> Self {
        DefinitionSource::File(path)
    }
}

impl From<Value> for DefinitionSource {
    fn from(document: Value) -> Self {
        DefinitionSource::Document(document)
    }
}

/// A loaded document plus the URL it was fetched from, if any.
#[derive(Debug, Clone)]
pub struct LoadedDefinition {
    pub document: Document,
    pub source_url: Option<Url>,
}

/// Load a definition from any source.
pub async fn load(source: &DefinitionSource, http: &reqwest::Client) -> Result<LoadedDefinition> {
    match source {
        DefinitionSource::Document(value) => Ok(LoadedDefinition {
            document: Document::new(value.clone())?,
            source_url: None,
        }),
        DefinitionSource::File(path) => Ok(LoadedDefinition {
            document: load_file(path)?,
            source_url: None,
        }),
        DefinitionSource::Text(content) => Ok(LoadedDefinition {
            document: parse_str(content)?,
            source_url: None,
        }),
        DefinitionSource::Url(url) => load_url(url, http).await,
    }
}

/// Load and parse a definition file.
///
/// `.yaml`/`.yml` files are parsed as YAML, anything else as JSON.
pub fn load_file(path: &Path) -> Result<Document> {
    info!("Loading OpenAPI definition from file: {}", path.display());
    let content = std::fs::read_to_string(path)
        .map_err(|e| OpenApiError::load(format!("{}: {}", path.display(), e)))?;

    if has_yaml_extension(&path.to_string_lossy()) {
        parse_yaml(&content)
    } else {
        parse_json(&content)
    }
}

/// Fetch and parse a definition over HTTP.
pub async fn load_url(url: &str, http: &reqwest::Client) -> Result<LoadedDefinition> {
    info!("Loading OpenAPI definition from URL: {}", url);
    let source_url =
        Url::parse(url).map_err(|e| OpenApiError::load(format!("{}: {}", url, e)))?;

    let response = http
        .get(source_url.clone())
        .send()
        .await
        .map_err(|e| OpenApiError::load(format!("{}: {}", url, e)))?;

    let status = response.status();
    if status != reqwest::StatusCode::OK {
        return Err(OpenApiError::Load {
            status: Some(status.as_u16()),
            message: format!("unexpected response fetching {}", url),
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();
    let content = response
        .text()
        .await
        .map_err(|e| OpenApiError::load(format!("{}: {}", url, e)))?;

    debug!("Fetched {} bytes ({})", content.len(), content_type);

    let document = if content_type.contains("yaml")
        || content_type.contains("yml")
        || has_yaml_extension(source_url.path())
    {
        parse_yaml(&content)?
    } else {
        parse_json(&content)?
    };

    Ok(LoadedDefinition {
        document,
        source_url: Some(source_url),
    })
}

/// Parse definition text, trying JSON first and then YAML.
pub fn parse_str(content: &str) -> Result<Document> {
    match serde_json::from_str::<Value>(content) {
        Ok(value) => Document::new(value),
        Err(_) => parse_yaml(content),
    }
}

fn parse_json(content: &str) -> Result<Document> {
    let value: Value = serde_json::from_str(content)
        .map_err(|e| OpenApiError::load(format!("invalid JSON: {}", e)))?;
    Document::new(value)
}

fn parse_yaml(content: &str) -> Result<Document> {
    let value: Value = serde_yaml::from_str(content)
        .map_err(|e| OpenApiError::load(format!("invalid YAML: {}", e)))?;
    Document::new(value)
}

fn has_yaml_extension(path: &str) -> bool {
    path.ends_with(".yaml") || path.ends_with(".yml")
}
