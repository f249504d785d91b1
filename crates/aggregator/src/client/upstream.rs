//! Upstream client: one batch per call, with retry and exponential backoff.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::errors::{QuotesError, Result, RetryClass};
use crate::models::Quote;
use crate::provider::{BatchFilter, BatchRequest, QuoteProvider};

/// Default number of retries after the first attempt.
const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay before the first retry; doubles for each further retry.
const DEFAULT_BASE_DELAY: Duration = Duration::from_millis(1000);

/// Retry budget for retryable (429/503) upstream failures.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay: DEFAULT_BASE_DELAY,
        }
    }
}

impl RetryPolicy {
    /// No retries at all.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `retry` (0-based): `base * 2^retry`.
    pub fn delay_for(&self, retry: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(retry))
    }
}

/// Fetches single batches from a [`QuoteProvider`], applying [`RetryPolicy`].
///
/// Retries are invisible to callers except as added latency or, once the
/// budget is spent, a [`QuotesError::RetryExhausted`].
#[derive(Clone)]
pub struct UpstreamClient {
    provider: Arc<dyn QuoteProvider>,
    policy: RetryPolicy,
}

impl UpstreamClient {
    /// Create a client with the default retry policy (3 retries, 1s/2s/4s).
    pub fn new(provider: Arc<dyn QuoteProvider>) -> Self {
        Self::with_policy(provider, RetryPolicy::default())
    }

    pub fn with_policy(provider: Arc<dyn QuoteProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn provider_id(&self) -> &'static str {
        self.provider.id()
    }

    /// Upstream request for a batch.
    ///
    /// Without a tag the random listing is used and the upstream page is
    /// always 1; `page_or_index` only identifies the batch for caching.
    /// With a tag, `page_or_index` is the upstream page number.
    pub fn batch_request(page_or_index: u32, page_size: u32, tag: Option<&str>) -> BatchRequest {
        match tag {
            None => BatchRequest {
                page: 1,
                per_page: page_size,
                filter: BatchFilter::Random,
            },
            Some(tag) => BatchRequest {
                page: page_or_index,
                per_page: page_size,
                filter: BatchFilter::Tag(tag.to_string()),
            },
        }
    }

    /// Fetch one batch, retrying 429/503 responses with exponential backoff.
    pub async fn fetch_batch(
        &self,
        page_or_index: u32,
        page_size: u32,
        tag: Option<&str>,
    ) -> Result<Vec<Quote>> {
        let request = Self::batch_request(page_or_index, page_size, tag);
        let provider_id = self.provider.id();
        let mut retries = 0;

        loop {
            let error = match self.provider.fetch_batch(&request).await {
                Ok(quotes) => {
                    debug!(
                        provider = provider_id,
                        batch = page_or_index,
                        quotes = quotes.len(),
                        retries,
                        "Fetched batch"
                    );
                    return Ok(quotes);
                }
                Err(e) => e,
            };

            if error.retry_class() == RetryClass::Never {
                debug!(
                    provider = provider_id,
                    error = %error,
                    "Terminal upstream error, not retrying"
                );
                return Err(error);
            }

            if retries >= self.policy.max_retries {
                warn!(
                    provider = provider_id,
                    attempts = retries + 1,
                    error = %error,
                    "Retry budget exhausted"
                );
                return Err(QuotesError::RetryExhausted {
                    provider: provider_id.to_string(),
                    attempts: retries + 1,
                    last: Box::new(error),
                });
            }

            let delay = self.policy.delay_for(retries);
            warn!(
                provider = provider_id,
                retry = retries + 1,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retryable upstream error, backing off"
            );
            tokio::time::sleep(delay).await;
            retries += 1;
        }
    }
}
