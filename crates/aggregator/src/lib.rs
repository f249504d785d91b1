//! Quotewall Aggregator Crate
//!
//! Returns exactly N unique quotes from an upstream provider that only
//! serves fixed-size, possibly overlapping batches, and paginates the result.
//!
//! # Overview
//!
//! The aggregator crate supports:
//! - Parallel, staggered batch fan-out with index-ordered deduplication
//! - Two cache tiers: raw upstream batches and computed aggregates
//! - Request coalescing so concurrent misses share one upstream call
//! - Retry with exponential backoff for rate-limited (429) and unavailable (503) responses
//!
//! # Architecture
//!
//! ```text
//! +------------------+
//! |   QuoteRequest   |  (count, page, page_size, tag)
//! +------------------+
//!          |
//!          v
//! +------------------+     +------------------+
//! | QuoteAggregator  | <-> |   CacheStore     |  (aggregate + batch entries)
//! +------------------+     +------------------+
//!          |
//!          v
//! +------------------+
//! |  UpstreamClient  |  (retry / backoff)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |  QuoteProvider   |  (favqs.com)
//! +------------------+
//!          |
//!          v
//! +--------------------+
//! | PaginationEnvelope |  (items + pagination)
//! +--------------------+
//! ```
//!
//! # Core Types
//!
//! - [`QuoteAggregator`] - Entry point: `get_quotes` and `collect_all`
//! - [`QuoteRequest`] - Validated request shape
//! - [`Quote`] - Upstream quote record
//! - [`PaginationEnvelope`] - Response wrapper with [`PaginationInfo`]
//! - [`CacheKey`] - Structured cache key for batch and aggregate entries
//! - [`QuotesError`] - Error type with retry classification

pub mod cache;
pub mod client;
pub mod errors;
pub mod models;
pub mod provider;
pub mod service;

#[cfg(test)]
mod test_support;

// Re-export model types
pub use models::{
    PaginationEnvelope, PaginationInfo, Quote, QuoteRequest, DEFAULT_PAGE_SIZE, MAX_COUNT,
    MAX_PAGE_SIZE,
};

// Re-export error types
pub use errors::{QuotesError, Result, RetryClass};

// Re-export cache types
pub use cache::{CacheKey, CacheStore, InFlight, MemoryCacheStore, QuoteList};

// Re-export client and provider types
pub use client::{RetryPolicy, UpstreamClient};
pub use provider::favqs::FavqsProvider;
pub use provider::{BatchFilter, BatchRequest, QuoteProvider};

// Re-export service types
pub use service::{
    batches_needed, dedupe_batches, paginate, AggregatorConfig, QuoteAggregator,
};
