//! Caching for upstream batches and computed aggregates.
//!
//! This module provides:
//! - [`CacheStore`]: the TTL key-value contract the aggregator depends on
//! - [`CacheKey`]: structured keys for the two key families (batch, aggregate)
//! - [`MemoryCacheStore`]: a process-scoped, bounded, in-memory implementation
//! - [`InFlight`]: request coalescing so concurrent misses share one fetch
//!
//! The cache is an optimisation only. Callers must tolerate a miss at any
//! time, and a failing store is treated as a miss.

mod in_flight;
mod memory;

pub use in_flight::InFlight;
pub use memory::MemoryCacheStore;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::errors::Result;
use crate::models::Quote;

/// Cached value type: an immutable, shareable list of quotes.
pub type QuoteList = Arc<Vec<Quote>>;

/// Key for a cache entry.
///
/// Random batches are keyed by their batch index because every random call
/// hits upstream page 1. Tag batches are keyed by the real upstream page.
/// Keeping the variants apart means a random batch can never be served for
/// a tag request or vice versa.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// One random batch, distinguished only by its index in the fan-out.
    RandomBatch { index: u32, page_size: u32 },

    /// One page of a tag-filtered listing.
    TagBatch {
        tag: String,
        page: u32,
        page_size: u32,
    },

    /// A deduplicated, count-capped aggregate.
    Aggregate {
        count: u32,
        page_size: u32,
        tag: Option<String>,
    },
}

impl CacheKey {
    /// Key for batch `index` (0-based) of a fan-out.
    pub fn batch(index: u32, page_size: u32, tag: Option<&str>) -> Self {
        match tag {
            None => Self::RandomBatch { index, page_size },
            Some(tag) => Self::TagBatch {
                tag: tag.to_string(),
                page: index + 1,
                page_size,
            },
        }
    }

    /// Key for the aggregate of a `(count, page_size, tag)` request.
    pub fn aggregate(count: u32, page_size: u32, tag: Option<&str>) -> Self {
        Self::Aggregate {
            count,
            page_size,
            tag: tag.map(str::to_string),
        }
    }
}

/// Deterministic string form, for stores that only accept string keys.
impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RandomBatch { index, page_size } => {
                write!(f, "batch:random:i{}:s{}", index, page_size)
            }
            Self::TagBatch {
                tag,
                page,
                page_size,
            } => write!(f, "batch:tag:{}:p{}:s{}", tag, page, page_size),
            Self::Aggregate {
                count,
                page_size,
                tag: None,
            } => write!(f, "aggregate:random:c{}:s{}", count, page_size),
            Self::Aggregate {
                count,
                page_size,
                tag: Some(tag),
            } => write!(f, "aggregate:tag:{}:c{}:s{}", tag, count, page_size),
        }
    }
}

/// TTL key-value store for quote lists.
///
/// Implementations must be safe for concurrent use. Expired entries behave
/// exactly like absent ones. Concurrent writers to one key race with
/// last-write-wins semantics.
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// Look up a live entry.
    async fn get(&self, key: &CacheKey) -> Result<Option<QuoteList>>;

    /// Store `value` under `key` for `ttl`.
    async fn set(&self, key: CacheKey, value: QuoteList, ttl: Duration) -> Result<()>;
}
