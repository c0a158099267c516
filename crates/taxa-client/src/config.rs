//! Client configuration
//!
//! Resolved in increasing precedence: defaults, TOML file, environment,
//! explicit overrides applied by the caller.

use crate::error::ServiceError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Environment variable holding the service base URL
pub const ENV_BASE_URL: &str = "TAXA_API_URL";
/// Environment variable holding the bearer token
pub const ENV_TOKEN: &str = "TAXA_API_TOKEN";
/// Environment variable holding the request timeout in seconds
pub const ENV_TIMEOUT_SECS: &str = "TAXA_TIMEOUT_SECS";

/// Taxonomy client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Service root, e.g. `https://admin.example.com/api`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Bearer token sent with every request
    pub bearer_token: Option<String>,
    /// Lifetime of cached option lists in seconds (0 disables caching)
    pub cache_ttl_secs: u64,
    /// Maximum number of cached option lists
    pub cache_capacity: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".to_string(),
            timeout_secs: 30,
            bearer_token: None,
            cache_ttl_secs: 60,
            cache_capacity: 1_000,
        }
    }
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// With request timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With bearer token
    #[inline]
    #[must_use]
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    /// With cache TTL
    #[inline]
    #[must_use]
    pub fn with_cache_ttl_secs(mut self, secs: u64) -> Self {
        self.cache_ttl_secs = secs;
        self
    }

    /// Parse from TOML text; missing keys take their defaults
    ///
    /// # Errors
    /// - `ServiceError::Config` on malformed TOML
    pub fn from_toml_str(text: &str) -> Result<Self, ServiceError> {
        toml::from_str(text).map_err(|e| ServiceError::Config(e.to_string()))
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// - `ServiceError::Config` if the file cannot be read or parsed
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ServiceError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    /// Apply `TAXA_*` environment overrides
    ///
    /// # Errors
    /// - `ServiceError::Config` if `TAXA_TIMEOUT_SECS` is not a number
    pub fn with_env(self) -> Result<Self, ServiceError> {
        self.with_vars(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable source
    ///
    /// # Errors
    /// - `ServiceError::Config` if the timeout value is not a number
    pub fn with_vars(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ServiceError> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(token) = lookup(ENV_TOKEN) {
            self.bearer_token = Some(token);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = raw
                .trim()
                .parse()
                .map_err(|_| ServiceError::Config(format!("{ENV_TIMEOUT_SECS}: not a number: {raw}")))?;
        }
        Ok(self)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// - `ServiceError::Config` for an empty or non-http(s) base URL, or a zero timeout
    pub fn validate(&self) -> Result<(), ServiceError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ServiceError::Config("base_url is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ServiceError::Config(format!(
                "base_url must be http(s): {url}"
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ServiceError::Config("timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Request timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Cache lifetime, `None` when caching is disabled
    #[inline]
    #[must_use]
    pub fn cache_ttl(&self) -> Option<Duration> {
        (self.cache_ttl_secs > 0).then(|| Duration::from_secs(self.cache_ttl_secs))
    }
}
