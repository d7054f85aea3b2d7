//! Application configuration loaded from environment variables.
//!
//! The variable names match the ones the storefront frontend already uses
//! (`NEXT_PUBLIC_API_URL`, `GOOGLE_CLIENT_ID`), so one `.env` serves both.

use std::env;
use std::time::Duration;

/// Upstream API used when no override is configured.
pub const DEFAULT_API_URL: &str = "https://api.sellpoint.pp.ua";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the upstream Sell Point REST API (no trailing slash)
    pub api_url: String,
    /// Google OAuth client ID forwarded to the google-login flow
    pub google_client_id: Option<String>,
    /// Frontend URL allowed by CORS
    pub frontend_url: String,
    /// Server port
    pub port: u16,
    /// How long the full category tree is served from cache
    pub category_tree_ttl: Duration,
    /// Per-request upstream timeout. `None` waits indefinitely.
    pub upstream_timeout: Option<Duration>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            api_url: "http://127.0.0.1:9".to_string(),
            google_client_id: Some("test-google-client".to_string()),
            frontend_url: "http://localhost:3000".to_string(),
            port: 8080,
            category_tree_ttl: Duration::from_secs(3600),
            upstream_timeout: None,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let api_url = env::var("NEXT_PUBLIC_API_URL")
            .or_else(|_| env::var("API_URL"))
            .unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        let api_url = normalize_base_url(&api_url)?;

        let google_client_id = env::var("GOOGLE_CLIENT_ID")
            .or_else(|_| env::var("NEXT_PUBLIC_GOOGLE_CLIENT_ID"))
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty());

        let category_tree_ttl = match env::var("CATEGORY_TREE_TTL_SECS") {
            Ok(raw) => Duration::from_secs(
                raw.parse()
                    .map_err(|_| ConfigError::Invalid("CATEGORY_TREE_TTL_SECS", raw))?,
            ),
            Err(_) => Duration::from_secs(3600),
        };

        let upstream_timeout = match env::var("UPSTREAM_TIMEOUT_SECS") {
            Ok(raw) => Some(Duration::from_secs(
                raw.parse()
                    .map_err(|_| ConfigError::Invalid("UPSTREAM_TIMEOUT_SECS", raw))?,
            )),
            Err(_) => None,
        };

        Ok(Self {
            api_url,
            google_client_id,
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            category_tree_ttl,
            upstream_timeout,
        })
    }
}

fn normalize_base_url(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ConfigError::Invalid("NEXT_PUBLIC_API_URL", raw.to_string()));
    }
    Ok(trimmed.to_string())
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("NEXT_PUBLIC_API_URL", "https://api.example.test/");
        env::set_var("GOOGLE_CLIENT_ID", " google-id ");
        env::set_var("CATEGORY_TREE_TTL_SECS", "60");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.api_url, "https://api.example.test");
        assert_eq!(config.google_client_id.as_deref(), Some("google-id"));
        assert_eq!(config.category_tree_ttl, Duration::from_secs(60));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_base_url_requires_scheme() {
        assert!(normalize_base_url("api.sellpoint.pp.ua").is_err());
        assert_eq!(
            normalize_base_url("https://api.sellpoint.pp.ua//").unwrap(),
            "https://api.sellpoint.pp.ua"
        );
    }
}
