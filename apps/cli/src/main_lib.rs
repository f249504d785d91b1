use std::sync::Arc;

use quotewall_aggregator::{
    AggregatorConfig, FavqsProvider, MemoryCacheStore, QuoteAggregator, UpstreamClient,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;

/// Install the global subscriber. Logs go to stderr so stdout stays pure JSON.
pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format.eq_ignore_ascii_case("json") {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(false)
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}

pub fn build_aggregator(config: &Config) -> QuoteAggregator {
    let provider = Arc::new(FavqsProvider::with_timeout(
        config.api_url.as_str(),
        config.api_key.as_str(),
        config.request_timeout,
    ));
    let cache = Arc::new(MemoryCacheStore::with_capacity(config.cache_max_entries));
    tracing::info!(
        api_url = %config.api_url,
        cache_capacity = cache.capacity(),
        "Quote aggregator ready"
    );

    QuoteAggregator::new(
        cache,
        UpstreamClient::new(provider),
        AggregatorConfig {
            batch_ttl: config.batch_ttl,
            aggregate_ttl: config.aggregate_ttl,
            ..AggregatorConfig::default()
        },
    )
}
