//! Error types and retry classification for the quote aggregator.
//!
//! This module provides:
//! - [`QuotesError`]: The main error enum for all aggregation operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, QuotesError>;

/// Errors that can occur while aggregating quotes.
///
/// The type is `Clone` because a single in-flight fetch is shared between
/// every caller coalesced onto the same cache key, and each of them receives
/// its own copy of the outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QuotesError {
    /// The request shape is invalid (`count`, `page`, `page_size` or `tag`).
    /// Rejected before any cache or upstream access.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The provider answered with a non-2xx status.
    #[error("Upstream error: {provider} returned {status} - {message}")]
    Upstream {
        /// The provider that returned the error
        provider: String,
        /// HTTP status code
        status: u16,
        /// Status text or response body excerpt
        message: String,
    },

    /// The request never produced an HTTP response (DNS, TLS, timeout, reset).
    #[error("Network error: {provider} - {message}")]
    Network {
        /// The provider we were talking to
        provider: String,
        /// The transport error message
        message: String,
    },

    /// The provider answered 2xx but the body could not be decoded.
    #[error("Decode error: {provider} - {message}")]
    Decode {
        /// The provider that returned the payload
        provider: String,
        /// Description of the decoding failure
        message: String,
    },

    /// A retryable failure (429/503) persisted through the whole backoff budget.
    #[error("Retries exhausted: {provider} after {attempts} attempts - {last}")]
    RetryExhausted {
        /// The provider that kept failing
        provider: String,
        /// Total attempts made, including the first one
        attempts: u32,
        /// The error returned by the final attempt
        #[source]
        last: Box<QuotesError>,
    },

    /// The cache backend failed. Never surfaced by the aggregator, which
    /// degrades cache failures to misses.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl QuotesError {
    /// Returns the retry classification for this error.
    ///
    /// Only rate limiting (429) and temporary unavailability (503) are worth
    /// retrying; everything else propagates immediately.
    ///
    /// # Examples
    ///
    /// ```
    /// use quotewall_aggregator::errors::{QuotesError, RetryClass};
    ///
    /// let error = QuotesError::Upstream {
    ///     provider: "FAVQS".to_string(),
    ///     status: 429,
    ///     message: "Too Many Requests".to_string(),
    /// };
    /// assert_eq!(error.retry_class(), RetryClass::WithBackoff);
    ///
    /// let error = QuotesError::InvalidRequest("count must be at least 1".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            Self::Upstream {
                status: 429 | 503, ..
            } => RetryClass::WithBackoff,

            Self::InvalidRequest(_)
            | Self::Upstream { .. }
            | Self::Network { .. }
            | Self::Decode { .. }
            | Self::RetryExhausted { .. }
            | Self::Cache(_) => RetryClass::Never,
        }
    }

    /// Whether the caller, not the service, is at fault.
    ///
    /// An outer HTTP layer maps `true` to a 4xx and `false` to a 5xx.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidRequest(_))
    }

    /// HTTP status reported by the provider, if the failure came from one.
    ///
    /// For [`QuotesError::RetryExhausted`] this is the status of the last attempt.
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            Self::RetryExhausted { last, .. } => last.upstream_status(),
            _ => None,
        }
    }
}
