//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_API_URL` - Backend base URL (default: `http://localhost:8080`)
//! - `SHOPFRONT_API_TIMEOUT_SECS` - Per-request timeout in seconds (default: 10)
//! - `SHOPFRONT_USER_ID` - Identity selected at startup (default: 1)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::time::Duration;

use shopfront_core::UserId;
use thiserror::Error;
use url::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Backend connection settings
    pub api: ApiConfig,
    /// Identity selected at startup
    pub default_user: UserId,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

/// Backend connection settings.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every resource path is resolved against
    pub base_url: Url,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ApiConfig {
    /// Settings for `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set but cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = parse_url(
            "SHOPFRONT_API_URL",
            &get_env_or_default("SHOPFRONT_API_URL", DEFAULT_API_URL),
        )?;
        let timeout_secs = get_env_or_default(
            "SHOPFRONT_API_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("SHOPFRONT_API_TIMEOUT_SECS".to_string(), e.to_string())
        })?;
        let default_user = get_optional_env("SHOPFRONT_USER_ID")
            .map_or(UserId::DEFAULT, |raw| UserId::parse_or_default(&raw));

        Ok(Self {
            api: ApiConfig {
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            default_user,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Configuration for a backend at `base_url` with every other setting
    /// at its default.
    #[must_use]
    pub fn for_api(base_url: Url) -> Self {
        Self {
            api: ApiConfig::new(base_url),
            default_user: UserId::DEFAULT,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    /// Replace the backend URL.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if `raw` is not an absolute URL.
    pub fn with_api_url(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api.base_url = parse_url("--api-url", raw)?;
        Ok(self)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Parse an absolute http(s) URL.
fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw.trim())
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_url_accepts_http() {
        let url = parse_url("TEST", "http://localhost:8080/api").unwrap();
        assert_eq!(url.path(), "/api");
    }

    #[test]
    fn test_parse_url_rejects_other_schemes() {
        let err = parse_url("TEST", "ftp://example.com").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
        assert!(parse_url("TEST", "not a url").is_err());
    }

    #[test]
    fn test_for_api_defaults() {
        let config = StorefrontConfig::for_api(Url::parse("http://127.0.0.1:9000").unwrap());
        assert_eq!(config.default_user, UserId::DEFAULT);
        assert_eq!(config.api.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(config.sentry_dsn.is_none());
    }

    #[test]
    fn test_with_api_url_override() {
        let config = StorefrontConfig::for_api(Url::parse("http://127.0.0.1:9000").unwrap())
            .with_api_url("https://shop.example.com")
            .unwrap();
        assert_eq!(config.api.base_url.host_str(), Some("shop.example.com"));
    }
}
