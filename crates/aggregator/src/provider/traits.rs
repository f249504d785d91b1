//! Quote provider trait definitions.

use std::fmt;

use async_trait::async_trait;

use crate::errors::QuotesError;
use crate::models::Quote;

/// Which listing a batch is drawn from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BatchFilter {
    /// The provider's random listing. It does not paginate, so every call
    /// is effectively page 1 and may overlap earlier calls.
    Random,
    /// Quotes carrying the given tag, with real pagination.
    Tag(String),
}

impl fmt::Display for BatchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Random => f.write_str("random"),
            Self::Tag(tag) => write!(f, "tag:{}", tag),
        }
    }
}

/// Parameters of a single upstream call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchRequest {
    /// Upstream page number (1-based).
    pub page: u32,
    /// Quotes per page.
    pub per_page: u32,
    pub filter: BatchFilter,
}

/// Trait for quote providers.
///
/// A provider performs exactly one upstream attempt per call. Retry and
/// backoff are layered on top by [`UpstreamClient`](crate::client::UpstreamClient).
///
/// # Example
///
/// ```ignore
/// use async_trait::async_trait;
/// use quotewall_aggregator::provider::{BatchRequest, QuoteProvider};
///
/// struct FixtureProvider(Vec<Quote>);
///
/// #[async_trait]
/// impl QuoteProvider for FixtureProvider {
///     fn id(&self) -> &'static str {
///         "FIXTURE"
///     }
///
///     async fn fetch_batch(&self, _request: &BatchRequest) -> Result<Vec<Quote>, QuotesError> {
///         Ok(self.0.clone())
///     }
/// }
/// ```
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Unique identifier for this provider, used in logs and errors.
    fn id(&self) -> &'static str;

    /// Fetch one batch of quotes, in the order the provider returned them.
    ///
    /// Non-2xx responses must be reported as [`QuotesError::Upstream`] with
    /// the HTTP status so the client can classify them for retry.
    async fn fetch_batch(&self, request: &BatchRequest) -> Result<Vec<Quote>, QuotesError>;
}
