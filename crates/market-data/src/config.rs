//! Fetcher Configuration

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_USER_AGENT: &str = "CryptoAdvisor/1.0";

/// CoinGecko client settings
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetcherConfig {
    /// API root, without trailing slash
    pub base_url: String,

    pub user_agent: String,

    /// Per-request timeout
    pub timeout: Duration,

    /// Minimum spacing between outbound requests
    pub min_interval: Duration,

    /// TTL for endpoints without their own
    pub default_ttl: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            timeout: Duration::from_secs(15),
            min_interval: Duration::from_secs(1),
            default_ttl: Duration::from_secs(300),
        }
    }
}

impl FetcherConfig {
    /// Read `COINGECKO_*` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or unparsable values keep defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str| lookup(key).and_then(|v| v.trim().parse::<u64>().ok());

        Self {
            base_url: lookup("COINGECKO_BASE_URL")
                .map(|u| u.trim_end_matches('/').to_string())
                .filter(|u| !u.is_empty())
                .unwrap_or(defaults.base_url),
            user_agent: lookup("COINGECKO_USER_AGENT")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            timeout: number("COINGECKO_TIMEOUT_SECS")
                .map_or(defaults.timeout, Duration::from_secs),
            min_interval: number("COINGECKO_MIN_INTERVAL_MS")
                .map_or(defaults.min_interval, Duration::from_millis),
            default_ttl: number("COINGECKO_CACHE_TTL_SECS")
                .map_or(defaults.default_ttl, Duration::from_secs),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = FetcherConfig::from_lookup(|_| None);
        assert_eq!(config, FetcherConfig::default());
        assert_eq!(config.base_url, "https://api.coingecko.com/api/v3");
        assert_eq!(config.min_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("COINGECKO_BASE_URL", "http://localhost:8080/api/"),
            ("COINGECKO_TIMEOUT_SECS", "3"),
            ("COINGECKO_MIN_INTERVAL_MS", "250"),
            ("COINGECKO_CACHE_TTL_SECS", "not-a-number"),
        ]
        .into_iter()
        .collect();

        let config = FetcherConfig::from_lookup(|k| vars.get(k).map(ToString::to_string));
        assert_eq!(config.base_url, "http://localhost:8080/api");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.min_interval, Duration::from_millis(250));
        assert_eq!(config.default_ttl, Duration::from_secs(300));
    }
}
