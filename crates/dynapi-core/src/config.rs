//! Configuration management for Dynapi
//!
//! Loads configuration with priority:
//! 1. dynapi.toml (or specified config file)
//! 2. Environment variables referenced as `${VAR_NAME}`
//! 3. Defaults

use crate::auth::AuthConfig;
use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE_NAME: &str = "dynapi.toml";

/// Dynapi configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DynapiConfig {
    /// Where the API description comes from: a URL or a file path
    pub definition: Option<String>,

    /// Overrides the base URL computed from the document's servers
    pub base_url: Option<String>,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub dispatch: DispatchConfig,

    #[serde(default)]
    pub auth: AuthConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// HTTP transport configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Per-request timeout applied by the transport session
    pub timeout_secs: Option<u64>,

    pub user_agent: Option<String>,
}

/// Argument routing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Fold unmatched call arguments into the JSON body when no explicit
    /// `body`/`data` argument is given and the operation accepts JSON.
    #[serde(default = "default_fold_unmatched")]
    pub fold_unmatched_args_into_body: bool,
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub json_logs: bool,

    pub service_name: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            fold_unmatched_args_into_body: default_fold_unmatched(),
        }
    }
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            json_logs: false,
            service_name: None,
        }
    }
}

impl DynapiConfig {
    /// Load configuration from `dynapi.toml` in the current directory or
    /// one of its parents.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            Self::find_config_file()?
        };

        tracing::debug!("Loading configuration from: {:?}", config_path);

        let contents = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {:?}", config_path))
    }

    /// Parse configuration from TOML text and resolve `${VAR}` references.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: DynapiConfig = toml::from_str(contents)?;
        config.resolve_env_vars();
        Ok(config)
    }

    /// Find dynapi.toml by searching current directory and parents
    fn find_config_file() -> Result<PathBuf> {
        let mut current = env::current_dir()?;

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Ok(config_path);
            }

            if !current.pop() {
                break;
            }
        }

        Err(anyhow!(
            "{} not found. Create one with at least:\n\
            definition = \"https://api.example.com/openapi.json\"",
            CONFIG_FILE_NAME
        ))
    }

    /// Resolve ${VAR_NAME} references to environment variables
    fn resolve_env_vars(&mut self) {
        for field in [&mut self.definition, &mut self.base_url]
            .into_iter()
            .chain([&mut self.http.user_agent, &mut self.observability.service_name])
        {
            if let Some(value) = field.as_mut() {
                match Self::resolve_env_var(value) {
                    Some(resolved) => *value = resolved,
                    None => tracing::warn!("Unresolved environment reference in config: {}", value),
                }
            }
        }

        for secret in self.auth.secrets_mut() {
            if let Some(resolved) = Self::resolve_env_var(secret) {
                *secret = resolved;
            } else {
                tracing::warn!("Unresolved environment reference in auth config: {}", secret);
            }
        }
    }

    /// Resolve a single ${VAR_NAME} reference
    fn resolve_env_var(value: &str) -> Option<String> {
        if value.starts_with("${") && value.ends_with('}') {
            let var_name = &value[2..value.len() - 1];
            env::var(var_name).ok()
        } else {
            Some(value.to_string())
        }
    }

    /// The configured definition source, or a configuration error.
    pub fn definition(&self) -> crate::Result<&str> {
        self.definition
            .as_deref()
            .ok_or_else(|| crate::Error::config_error("no `definition` configured"))
    }

    /// Create test-friendly defaults (no file or network required)
    pub fn test_defaults() -> Self {
        Self {
            definition: None,
            base_url: Some("http://127.0.0.1:8080".to_string()),
            http: HttpConfig {
                timeout_secs: Some(5),
                user_agent: None,
            },
            dispatch: DispatchConfig::default(),
            auth: AuthConfig::None,
            observability: ObservabilityConfig::default(),
        }
    }
}

fn default_fold_unmatched() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}
