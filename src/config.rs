//! Configuration parsing and validation for catalyst.
//!
//! Values are layered: built-in defaults, then an optional TOML file, then
//! environment overrides (`UPSTREAM_URL`, `UPSTREAM_TIMEOUT_SECONDS`,
//! `DEFAULT_MODEL`, `CATALYST_LISTEN`).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

/// Config file picked up from the working directory when no path is given.
pub const DEFAULT_CONFIG_PATH: &str = "catalyst.toml";

/// Upstream chat endpoint used when nothing else is configured.
pub const DEFAULT_UPSTREAM_URL: &str =
    "https://hosted-by-harman2boss.onrender.com/u2052400282/multiaiapiv2/api/chat";

/// Bound on a single outbound call, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 25;

/// Fallback model for missing or unrecognized identifiers.
pub const DEFAULT_MODEL: &str = "gpt4";

/// Models accepted out of the box, in dashboard order.
pub const BUILTIN_MODELS: [&str; 7] = ["gpt4", "claude", "gemini", "copilot", "felo", "mk", "pakex"];

pub const ENV_UPSTREAM_URL: &str = "UPSTREAM_URL";
pub const ENV_UPSTREAM_TIMEOUT: &str = "UPSTREAM_TIMEOUT_SECONDS";
pub const ENV_DEFAULT_MODEL: &str = "DEFAULT_MODEL";
pub const ENV_LISTEN: &str = "CATALYST_LISTEN";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub models: ModelsConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

/// The single provider endpoint every prompt is forwarded to.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    /// Full URL of the provider endpoint; `${VAR}` references are expanded on load
    #[serde(default = "default_upstream_url")]
    pub url: String,
    /// Outbound call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_upstream_url() -> String {
    DEFAULT_UPSTREAM_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            url: default_upstream_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UpstreamConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// The enumerated model set and its routing overrides.
#[derive(Debug, Clone, Deserialize)]
pub struct ModelsConfig {
    /// Substituted for missing or unknown model identifiers
    #[serde(default = "default_model")]
    pub default: String,
    /// Accepted model identifiers, in display order
    #[serde(default = "default_available")]
    pub available: Vec<String>,
    /// Model id -> `model` parameter actually sent upstream (identity when absent)
    #[serde(default)]
    pub routes: BTreeMap<String, String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_available() -> Vec<String> {
    BUILTIN_MODELS.iter().map(|m| m.to_string()).collect()
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            default: default_model(),
            available: default_available(),
            routes: BTreeMap::new(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Configuration validation error: {0}")]
    Validation(String),

    #[error("Environment variable '{var}' not set for '{field}': {message}")]
    EnvVar {
        var: String,
        field: String,
        message: String,
    },

    #[error("Invalid value '{value}' in environment variable '{var}': {message}")]
    EnvOverride {
        var: String,
        value: String,
        message: String,
    },
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn parse_str(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(content).map_err(ConfigError::Parse)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Load the effective configuration using the process environment.
    ///
    /// With an explicit `path` the file must exist. Without one,
    /// [`DEFAULT_CONFIG_PATH`] is used if present and built-in defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        Self::load_with(path, |name| std::env::var(name).ok())
    }

    /// Same as [`Config::load`] but resolves variables through `lookup`.
    pub fn load_with<F>(path: Option<&Path>, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match path {
            Some(path) => {
                let content = read_config_file(path)?;
                toml::from_str(&content).map_err(ConfigError::Parse)?
            }
            None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                tracing::debug!(path = DEFAULT_CONFIG_PATH, "Using config file from working directory");
                let content = read_config_file(Path::new(DEFAULT_CONFIG_PATH))?;
                toml::from_str(&content).map_err(ConfigError::Parse)?
            }
            None => Config::default(),
        };

        config.upstream.url = expand_env_vars_with(&config.upstream.url, "upstream.url", &lookup)?;
        config.apply_env_overrides_with(&lookup)?;
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    /// Apply the recognized environment overrides on top of file values.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(ENV_UPSTREAM_URL) {
            self.upstream.url = url;
        }

        if let Some(raw) = lookup(ENV_UPSTREAM_TIMEOUT) {
            self.upstream.timeout_secs =
                raw.trim().parse().map_err(|e: std::num::ParseIntError| {
                    ConfigError::EnvOverride {
                        var: ENV_UPSTREAM_TIMEOUT.to_string(),
                        value: raw.clone(),
                        message: e.to_string(),
                    }
                })?;
        }

        if let Some(model) = lookup(ENV_DEFAULT_MODEL) {
            self.models.default = model;
        }

        if let Some(listen) = lookup(ENV_LISTEN) {
            self.server.listen = listen;
        }

        Ok(())
    }

    /// Lower-case and trim model identifiers, dropping duplicates.
    fn normalize(&mut self) {
        self.models.default = normalize_model_id(&self.models.default);

        let mut seen = std::collections::HashSet::new();
        self.models.available = self
            .models
            .available
            .iter()
            .map(|m| normalize_model_id(m))
            .filter(|m| seen.insert(m.clone()))
            .collect();

        self.models.routes = std::mem::take(&mut self.models.routes)
            .into_iter()
            .map(|(model, target)| (normalize_model_id(&model), target.trim().to_string()))
            .collect();
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.listen.trim().is_empty() {
            return Err(ConfigError::Validation(
                "server.listen must not be empty".to_string(),
            ));
        }

        if self.upstream.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "upstream.url must not be empty".to_string(),
            ));
        }

        let url = reqwest::Url::parse(&self.upstream.url).map_err(|e| {
            ConfigError::Validation(format!(
                "upstream.url '{}' is not a valid URL: {}",
                self.upstream.url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation(format!(
                "upstream.url must use http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.upstream.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "upstream.timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.models.available.is_empty() {
            return Err(ConfigError::Validation(
                "models.available must list at least one model".to_string(),
            ));
        }

        if let Some(empty) = self.models.available.iter().find(|m| m.is_empty()) {
            return Err(ConfigError::Validation(format!(
                "models.available contains an empty identifier ({:?})",
                empty
            )));
        }

        if !self.models.available.contains(&self.models.default) {
            return Err(ConfigError::Validation(format!(
                "Default model '{}' is not in models.available",
                self.models.default
            )));
        }

        for (model, target) in &self.models.routes {
            if !self.models.available.contains(model) {
                return Err(ConfigError::Validation(format!(
                    "Route for unknown model '{}'",
                    model
                )));
            }
            if target.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "Route for model '{}' has an empty upstream model",
                    model
                )));
            }
        }

        Ok(())
    }
}

/// Canonical form of a model identifier.
pub fn normalize_model_id(raw: &str) -> String {
    raw.trim().to_lowercase()
}

fn read_config_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

/// Expand all `${VAR}` references in a string using a custom lookup function.
///
/// Supports multiple `${VAR}` in one string (e.g., `${SCHEME}://${HOST}/chat`).
/// Fails on first missing variable, unclosed `${`, or empty variable name.
fn expand_env_vars_with<F>(input: &str, field: &str, lookup: F) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if !input.contains("${") {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];

        let end = after.find('}').ok_or_else(|| ConfigError::EnvVar {
            var: "<unclosed>".to_string(),
            field: field.to_string(),
            message: format!("Unclosed '${{' in config value: {}", input),
        })?;

        let var_name = &after[..end];
        if var_name.is_empty() {
            return Err(ConfigError::EnvVar {
                var: "".to_string(),
                field: field.to_string(),
                message: "Empty variable name in '${}' reference".to_string(),
            });
        }

        let value = lookup(var_name).ok_or_else(|| ConfigError::EnvVar {
            var: var_name.to_string(),
            field: field.to_string(),
            message: format!("Environment variable '{}' is not set", var_name),
        })?;

        result.push_str(&value);
        rest = &after[end + 1..];
    }

    result.push_str(rest);
    Ok(result)
}
