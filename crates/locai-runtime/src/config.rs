//! Runtime configuration.
//!
//! Loaded from an optional YAML file; every field has a default so an empty
//! file (or no file) is valid. Non-secret values from the file win over the
//! environment. Credentials come from `api_key` fields or the environment.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable that forces mock mode when set to `1` or `true`.
pub const FORCE_MOCK_ENV: &str = "LOCAI_FORCE_MOCK";

/// Watson NLU service URL.
pub const IBM_API_URL_ENV: &str = "IBM_API_URL";

/// Accepted alias of [`IBM_API_URL_ENV`].
pub const IBM_SERVICE_URL_ENV: &str = "IBM_SERVICE_URL";

/// Errors from configuration loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid value for {field}: {message}")]
    Invalid { field: &'static str, message: String },
}

/// Top-level runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Skip all provider calls and serve mock reports
    pub force_mock: bool,

    /// Per-provider call timeout ("8s", "1500ms")
    #[serde(with = "humantime_serde")]
    pub provider_timeout: Duration,

    /// Language hint passed to the sentiment provider
    pub language: String,

    pub watson: WatsonConfig,

    pub gemini: GeminiConfig,

    pub server: ServerConfig,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            force_mock: false,
            provider_timeout: Duration::from_secs(8),
            language: "en".to_string(),
            watson: WatsonConfig::default(),
            gemini: GeminiConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

impl RuntimeConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yaml rejects an empty document for a struct
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&content)
    }

    /// Fill unset values from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_env_lookup(|key| std::env::var(key).ok())
    }

    /// Fill unset values using the given variable lookup.
    pub fn with_env_lookup(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(value) = lookup(FORCE_MOCK_ENV) {
            if matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes") {
                self.force_mock = true;
            }
        }

        if self.watson.service_url.is_none() {
            self.watson.service_url = lookup(IBM_API_URL_ENV)
                .or_else(|| lookup(IBM_SERVICE_URL_ENV))
                .filter(|url| !url.trim().is_empty());
        }

        self
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.provider_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                field: "provider_timeout",
                message: "must be greater than zero".to_string(),
            });
        }

        for (field, url) in [
            ("watson.service_url", self.watson.service_url.as_deref()),
            ("watson.iam_url", Some(self.watson.iam_url.as_str())),
            ("gemini.base_url", Some(self.gemini.base_url.as_str())),
        ] {
            if let Some(url) = url {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    return Err(ConfigError::Invalid {
                        field,
                        message: "must start with http:// or https://".to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// IBM Watson Natural Language Understanding settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatsonConfig {
    /// API key; falls back to `IBM_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    /// Instance URL; falls back to `IBM_API_URL`
    pub service_url: Option<String>,

    /// IAM token endpoint host
    pub iam_url: String,

    /// API version date
    pub version: String,
}

impl Default for WatsonConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            service_url: None,
            iam_url: "https://iam.cloud.ibm.com".to_string(),
            version: "2022-04-07".to_string(),
        }
    }
}

impl fmt::Debug for WatsonConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WatsonConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("service_url", &self.service_url)
            .field("iam_url", &self.iam_url)
            .field("version", &self.version)
            .finish()
    }
}

/// Google Gemini settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; falls back to `GEMINI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,

    pub model: String,

    pub base_url: String,

    pub max_tokens: u32,

    pub temperature: f32,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: "gemini-flash-latest".to_string(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .finish()
    }
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
        }
    }
}
