use extract::llm::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use extract::AnthropicClient;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable consulted when no key is configured.
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Seconds to wait between two consecutive requests.
pub const DEFAULT_DELAY_SECS: f64 = 2.0;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("API key is required. Set ANTHROPIC_API_KEY or pass --api-key.")]
    MissingApiKey,

    #[error("Invalid delay between requests: {0} (must be a non-negative number of seconds)")]
    InvalidDelay(f64),

    #[error("Failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub request_timeout_secs: u64,
    pub delay_secs: f64,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            request_timeout_secs: 120,
            delay_secs: DEFAULT_DELAY_SECS,
        }
    }
}

impl fmt::Debug for ScraperConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScraperConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("delay_secs", &self.delay_secs)
            .finish()
    }
}

impl ScraperConfig {
    /// Defaults, overlaid with the TOML file when one is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml(&content).map_err(|source| ConfigError::Parse {
                    path: path.to_path_buf(),
                    source,
                })
            }
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Fill in the key from the environment value when none is configured.
    pub fn resolve_api_key(&mut self, from_env: Option<String>) {
        let configured = self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty());
        if !configured {
            self.api_key = from_env.filter(|key| !key.trim().is_empty());
        }
    }

    pub fn api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    /// Zero when the configured value is unusable; `validate` reports that case.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_secs).unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_key()?;
        if Duration::try_from_secs_f64(self.delay_secs).is_err() {
            return Err(ConfigError::InvalidDelay(self.delay_secs));
        }
        Ok(())
    }

    pub fn build_client(&self) -> Result<AnthropicClient, ConfigError> {
        self.validate()?;

        AnthropicClient::new(self.api_key()?.to_string(), self.model.clone())
            .with_base_url(self.base_url.clone())
            .with_max_tokens(self.max_tokens)
            .with_timeout(Duration::from_secs(self.request_timeout_secs))
            .map_err(|e| ConfigError::HttpClient(format!("{e:#}")))
    }
}
