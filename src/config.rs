//! Configuration loader for the `sf-microclimates` service.
//!
//! This module centralizes all runtime configuration values and their defaults,
//! loading from environment variables (with optional `.env` file support
//! provided by the caller). Nothing else in the crate reads `env::var`
//! directly.
use std::{env, time::Duration};

use anyhow::{anyhow, Result};

/// Parse an optional numeric environment variable with a default value.
macro_rules! parse_env {
    ($var_name:expr, $ty:ty, $default:expr) => {
        env::var($var_name)
            .ok()
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

/// Parse a required string environment variable.
macro_rules! require_env {
    ($var_name:expr) => {
        env::var($var_name)
            .map_err(|_| anyhow!("{} must be set in .env or environment", $var_name))?
    };
}

pub const DEFAULT_API_URL: &str = "https://api.purpleair.com/v1/sensors";

// ---

/// Strongly typed application configuration.
///
/// All fields are immutable after loading, ensuring a consistent configuration
/// snapshot for the lifetime of the application.
#[derive(Debug, Clone)]
pub struct Config {
    // ---
    /// PurpleAir read key, sent as `X-API-Key`.
    pub api_key: String,

    /// PurpleAir sensors endpoint.
    pub api_url: String,

    /// How long a computed snapshot is served before recomputing.
    pub cache_ttl_secs: u64,

    /// Requests allowed per client per minute. 0 disables limiting.
    pub rate_limit_per_minute: u32,

    /// TCP port to listen on.
    pub port: u16,

    /// Upper bound on a single upstream request.
    pub upstream_timeout_secs: u64,

    /// Key rate limiting on `CF-Connecting-IP` / `X-Forwarded-For`.
    /// Only safe behind a proxy that sets them.
    pub trust_proxy_headers: bool,
}

/// Load configuration from environment variables with defaults.
///
/// Required:
/// - `PURPLEAIR_API_KEY` – PurpleAir read key
///
/// Optional:
/// - `PURPLEAIR_API_URL` – sensors endpoint (default: PurpleAir v1)
/// - `CACHE_TTL_SECONDS` – snapshot lifetime (default: 900)
/// - `RATE_LIMIT_PER_MINUTE` – per-client request budget (default: 60)
/// - `PORT` – listen port (default: 8080)
/// - `UPSTREAM_TIMEOUT_SECONDS` – upstream request timeout (default: 10)
/// - `TRUST_PROXY_HEADERS` – `true` to rate limit by proxy headers (default: false)
///
/// Returns an error if any required variable is missing or invalid.
pub fn load_from_env() -> Result<Config> {
    // ---
    let api_key = require_env!("PURPLEAIR_API_KEY");
    let api_url = env::var("PURPLEAIR_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
    let cache_ttl_secs = parse_env!("CACHE_TTL_SECONDS", u64, 900);
    let rate_limit_per_minute = parse_env!("RATE_LIMIT_PER_MINUTE", u32, 60);
    let port = parse_env!("PORT", u16, 8080);
    let upstream_timeout_secs = parse_env!("UPSTREAM_TIMEOUT_SECONDS", u64, 10);
    let trust_proxy_headers = parse_env!("TRUST_PROXY_HEADERS", bool, false);

    if api_key.trim().is_empty() {
        return Err(anyhow!("PURPLEAIR_API_KEY must not be empty"));
    }

    Ok(Config {
        api_key,
        api_url,
        cache_ttl_secs,
        rate_limit_per_minute,
        port,
        upstream_timeout_secs,
        trust_proxy_headers,
    })
}

impl Config {
    // ---
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_secs)
    }

    /// Log the loaded configuration for debugging purposes.
    ///
    /// The API key is masked down to its last four characters.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  PURPLEAIR_API_KEY        : {}", mask_secret(&self.api_key));
        tracing::info!("  PURPLEAIR_API_URL        : {}", self.api_url);
        tracing::info!("  CACHE_TTL_SECONDS        : {}", self.cache_ttl_secs);
        tracing::info!("  RATE_LIMIT_PER_MINUTE    : {}", self.rate_limit_per_minute);
        tracing::info!("  PORT                     : {}", self.port);
        tracing::info!("  UPSTREAM_TIMEOUT_SECONDS : {}", self.upstream_timeout_secs);
        tracing::info!("  TRUST_PROXY_HEADERS      : {}", self.trust_proxy_headers);
    }
}

fn mask_secret(secret: &str) -> String {
    // ---
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    #[test]
    fn test_mask_secret() {
        // ---
        assert_eq!(mask_secret("ABCDEF-1234"), "****1234");
        assert_eq!(mask_secret("abc"), "****");
        assert_eq!(mask_secret(""), "****");
    }

    #[test]
    fn test_durations() {
        // ---
        let cfg = Config {
            api_key: "key".into(),
            api_url: DEFAULT_API_URL.into(),
            cache_ttl_secs: 900,
            rate_limit_per_minute: 60,
            port: 8080,
            upstream_timeout_secs: 10,
            trust_proxy_headers: false,
        };
        assert_eq!(cfg.cache_ttl(), Duration::from_secs(900));
        assert_eq!(cfg.upstream_timeout(), Duration::from_secs(10));
    }
}
