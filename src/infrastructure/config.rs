//! API endpoint configuration

use crate::core::error::ConfigError;
use di::inject;
use di::injectable;
use log::warn;
use std::env;
use std::time::Duration;

pub const API_URL_VAR: &str = "CHALLENGE_HUB_API_URL";
pub const TIMEOUT_VAR: &str = "CHALLENGE_HUB_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, PartialEq)]
pub struct ApiConfig {
    base_url: String,
    timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig::new(DEFAULT_API_URL)
    }
}

#[injectable]
impl ApiConfig {
    /// Reads `.env` and the environment. A bad value falls back to the
    /// default for that field only.
    #[inject]
    pub fn create() -> ApiConfig {
        dotenvy::dotenv().ok();

        let mut config = ApiConfig::base_from_env();
        match timeout_from_env() {
            Ok(Some(secs)) => config.timeout_secs = secs,
            Ok(None) => {}
            Err(e) => warn!("{e}, using default timeout of {DEFAULT_TIMEOUT_SECS}s"),
        }
        config
    }
}

// An unset variable counts as absent.
fn timeout_from_env() -> Result<Option<u64>, ConfigError> {
    let Ok(raw) = env::var(TIMEOUT_VAR) else {
        return Ok(None);
    };

    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|secs| *secs > 0)
        .map(Some)
        .ok_or(ConfigError::InvalidValue {
            name: TIMEOUT_VAR,
            value: raw.clone(),
        })
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> ApiConfig {
        ApiConfig {
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    fn base_from_env() -> ApiConfig {
        match env::var(API_URL_VAR) {
            Ok(url) if !url.trim().is_empty() => ApiConfig::new(url.trim()),
            _ => ApiConfig::default(),
        }
    }

    /// Builds the config from process environment only.
    pub fn from_env() -> Result<ApiConfig, ConfigError> {
        let mut config = ApiConfig::base_from_env();
        if let Some(secs) = timeout_from_env()? {
            config.timeout_secs = secs;
        }
        Ok(config)
    }

    pub fn with_base_url(self, base_url: impl Into<String>) -> ApiConfig {
        ApiConfig {
            timeout_secs: self.timeout_secs,
            ..ApiConfig::new(base_url)
        }
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> ApiConfig {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins `path` (which must start with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}
