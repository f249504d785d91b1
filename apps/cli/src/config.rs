use std::time::Duration;

use anyhow::{bail, Result};
use quotewall_aggregator::provider::favqs::DEFAULT_BASE_URL;

pub struct Config {
    pub api_url: String,
    pub api_key: String,
    pub batch_ttl: Duration,
    pub aggregate_ttl: Duration,
    pub cache_max_entries: usize,
    pub request_timeout: Duration,
    pub log_format: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable numbers fall back
    /// to their defaults; only a missing API key is an error.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("FAVQS_API_URL")
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let api_key = match lookup("FAVQS_API_KEY").map(|s| s.trim().to_string()) {
            Some(key) if !key.is_empty() => key,
            _ => bail!("FAVQS_API_KEY must be set"),
        };

        let number = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        let batch_ttl = Duration::from_secs(number("QUOTEWALL_BATCH_TTL_SECS", 3600));
        let aggregate_ttl =
            Duration::from_secs(number("QUOTEWALL_AGGREGATE_TTL_SECS", 3600)).min(batch_ttl);
        let cache_max_entries = number("QUOTEWALL_CACHE_MAX_ENTRIES", 100).max(1) as usize;
        let request_timeout = Duration::from_millis(number("QUOTEWALL_REQUEST_TIMEOUT_MS", 30000));
        let log_format = lookup("QUOTEWALL_LOG_FORMAT").unwrap_or_else(|| "text".into());

        Ok(Self {
            api_url,
            api_key,
            batch_ttl,
            aggregate_ttl,
            cache_max_entries,
            request_timeout,
            log_format,
        })
    }
}
