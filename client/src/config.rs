/// Client configuration, read from the environment
use std::env;
use thiserror::Error;

pub const BASE_URL_VAR: &str = "STASH_API_URL";
pub const LOG_FILTER_VAR: &str = "STASH_LOG";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/v1";
pub const DEFAULT_LOG_FILTER: &str = "stash_client=info";

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid base URL '{0}': must start with http:// or https://")]
    InvalidBaseUrl(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the product API, without a trailing slash
    pub base_url: String,
    /// tracing filter directive used by the command line front end
    pub log_filter: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ConfigError> {
        Ok(ClientConfig {
            base_url: normalize_base_url(base_url.into())?,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        })
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let log_filter =
            lookup(LOG_FILTER_VAR).unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

        Ok(ClientConfig {
            base_url: normalize_base_url(base_url)?,
            log_filter,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, ConfigError> {
        self.base_url = normalize_base_url(base_url.into())?;
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

fn normalize_base_url(url: String) -> Result<String, ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::InvalidBaseUrl(url));
    }
    Ok(url.trim_end_matches('/').to_string())
}
