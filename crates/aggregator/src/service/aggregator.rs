//! Quote aggregation: batch fan-out, deduplication, caching.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use super::paginate;
use crate::cache::{CacheKey, CacheStore, InFlight, QuoteList};
use crate::client::UpstreamClient;
use crate::errors::Result;
use crate::models::{PaginationEnvelope, Quote, QuoteRequest};

/// Default lifetime of a cached upstream batch.
pub const DEFAULT_BATCH_TTL: Duration = Duration::from_secs(3600);

/// Default lifetime of a cached aggregate.
pub const DEFAULT_AGGREGATE_TTL: Duration = Duration::from_secs(3600);

/// Default delay between the start of consecutive batch fetches.
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(300);

/// Tunables for [`QuoteAggregator`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatorConfig {
    /// TTL for per-batch entries. Batches are reused across different counts.
    pub batch_ttl: Duration,
    /// TTL for aggregate entries; never longer than `batch_ttl`.
    pub aggregate_ttl: Duration,
    /// Batch `i` waits `i * stagger` before calling upstream.
    pub stagger: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            batch_ttl: DEFAULT_BATCH_TTL,
            aggregate_ttl: DEFAULT_AGGREGATE_TTL,
            stagger: DEFAULT_STAGGER,
        }
    }
}

impl AggregatorConfig {
    /// Clamp the aggregate TTL so a derived entry never outlives its batches.
    fn normalized(mut self) -> Self {
        self.aggregate_ttl = self.aggregate_ttl.min(self.batch_ttl);
        self
    }
}

/// Number of upstream batches to fetch for `count` quotes.
///
/// One spare batch absorbs duplicates in random sampling; tag listings get
/// a second spare because per-tag inventory is small and repeats or runs
/// out sooner.
pub fn batches_needed(count: u32, page_size: u32, has_tag: bool) -> u32 {
    let margin = if has_tag { 2 } else { 1 };
    count.div_ceil(page_size.max(1)).saturating_add(margin)
}

/// Merge batches in the given order, keeping the first occurrence of each id
/// and stopping once `count` unique quotes are collected.
pub fn dedupe_batches<'a, I>(batches: I, count: usize) -> Vec<Quote>
where
    I: IntoIterator<Item = &'a [Quote]>,
    I::IntoIter: Clone,
{
    let batches = batches.into_iter();
    let fetched: usize = batches.clone().map(<[Quote]>::len).sum();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut unique = Vec::with_capacity(count.min(fetched));

    'batches: for batch in batches {
        for quote in batch {
            if unique.len() >= count {
                break 'batches;
            }
            if seen.insert(quote.id.as_str()) {
                unique.push(quote.clone());
            }
        }
    }

    unique
}

struct Inner {
    cache: Arc<dyn CacheStore>,
    upstream: UpstreamClient,
    config: AggregatorConfig,
    aggregates: InFlight<CacheKey, QuoteList>,
    batches: InFlight<CacheKey, QuoteList>,
}

/// Returns exactly `count` unique quotes (or as many as upstream has),
/// paginated.
///
/// Cheap to clone; clones share the cache, upstream client and in-flight
/// maps.
#[derive(Clone)]
pub struct QuoteAggregator {
    inner: Arc<Inner>,
}

impl QuoteAggregator {
    pub fn new(
        cache: Arc<dyn CacheStore>,
        upstream: UpstreamClient,
        config: AggregatorConfig,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                cache,
                upstream,
                config: config.normalized(),
                aggregates: InFlight::new(),
                batches: InFlight::new(),
            }),
        }
    }

    pub fn config(&self) -> &AggregatorConfig {
        &self.inner.config
    }

    /// Return the requested page of the `(count, page_size, tag)` aggregate.
    ///
    /// Fails with [`QuotesError::InvalidRequest`](crate::errors::QuotesError::InvalidRequest)
    /// before touching cache or upstream if the request is malformed, and
    /// with the upstream error if any batch fetch fails.
    pub async fn get_quotes(&self, request: QuoteRequest) -> Result<PaginationEnvelope<Quote>> {
        let request = request.validate()?;
        let aggregate = self
            .aggregate(request.count, request.page_size, request.tag.as_deref())
            .await?;

        Ok(paginate(
            &aggregate,
            request.page,
            request.page_size,
            request.count,
        ))
    }

    /// Walk every page from 1 until `has_more` is false and concatenate them.
    pub async fn collect_all(
        &self,
        count: u32,
        page_size: u32,
        tag: Option<&str>,
    ) -> Result<Vec<Quote>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let mut request = QuoteRequest::new(count).page(page).page_size(page_size);
            request.tag = tag.map(str::to_string);

            let envelope = self.get_quotes(request).await?;
            all.extend(envelope.items);
            if !envelope.pagination.has_more {
                return Ok(all);
            }
            page += 1;
        }
    }

    async fn aggregate(&self, count: u32, page_size: u32, tag: Option<&str>) -> Result<QuoteList> {
        let key = CacheKey::aggregate(count, page_size, tag);

        if let Some(hit) = self.inner.sufficient(&key, count).await {
            debug!(key = %key, "Aggregate cache hit");
            return Ok(hit);
        }

        let inner = self.inner.clone();
        let tag = tag.map(str::to_string);
        self.inner
            .aggregates
            .run(key.clone(), move || inner.build_aggregate(key, count, page_size, tag))
            .await
    }
}

impl Inner {
    /// Cache read that degrades failures to a miss.
    async fn cache_get(&self, key: &CacheKey) -> Option<QuoteList> {
        match self.cache.get(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                None
            }
        }
    }

    /// Cache write that logs and swallows failures.
    async fn cache_set(&self, key: CacheKey, value: QuoteList, ttl: Duration) {
        if let Err(e) = self.cache.set(key.clone(), value, ttl).await {
            warn!(key = %key, error = %e, "Cache write failed");
        }
    }

    /// Cached aggregate, only if it already holds `count` quotes.
    async fn sufficient(&self, key: &CacheKey, count: u32) -> Option<QuoteList> {
        self.cache_get(key)
            .await
            .filter(|list| list.len() >= count as usize)
    }

    async fn build_aggregate(
        self: Arc<Self>,
        key: CacheKey,
        count: u32,
        page_size: u32,
        tag: Option<String>,
    ) -> Result<QuoteList> {
        let previous = self.cache_get(&key).await;
        if let Some(hit) = previous.as_ref().filter(|list| list.len() >= count as usize) {
            return Ok(hit.clone());
        }

        let needed = batches_needed(count, page_size, tag.is_some());
        debug!(key = %key, batches = needed, "Aggregate cache miss, fetching batches");

        let fetches = (0..needed).map(|index| self.clone().batch(index, page_size, tag.clone()));
        let batches = join_all(fetches)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        let aggregate = Arc::new(dedupe_batches(
            batches.iter().map(|batch| batch.as_slice()),
            count as usize,
        ));

        // A longer live entry stays as is, with its original expiry.
        if let Some(previous) = previous.filter(|list| list.len() > aggregate.len()) {
            debug!(
                key = %key,
                cached = previous.len(),
                fresh = aggregate.len(),
                "Keeping longer cached aggregate"
            );
            return Ok(previous);
        }

        info!(
            key = %key,
            provider = self.upstream.provider_id(),
            requested = count,
            unique = aggregate.len(),
            "Aggregated quotes"
        );

        self.cache_set(key, aggregate.clone(), self.config.aggregate_ttl)
            .await;
        Ok(aggregate)
    }

    /// Batch `index` of a fan-out, from cache or upstream.
    async fn batch(
        self: Arc<Self>,
        index: u32,
        page_size: u32,
        tag: Option<String>,
    ) -> Result<QuoteList> {
        let key = CacheKey::batch(index, page_size, tag.as_deref());

        if let Some(hit) = self.cache_get(&key).await {
            debug!(key = %key, "Batch cache hit");
            return Ok(hit);
        }

        let inner = self.clone();
        self.batches
            .run(key.clone(), move || inner.fetch_batch(key, index, page_size, tag))
            .await
    }

    async fn fetch_batch(
        self: Arc<Self>,
        key: CacheKey,
        index: u32,
        page_size: u32,
        tag: Option<String>,
    ) -> Result<QuoteList> {
        if let Some(hit) = self.cache_get(&key).await {
            return Ok(hit);
        }

        let delay = self.config.stagger * index;
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        // Random batches all hit upstream page 1; tag batches page through.
        let page_or_index = if tag.is_some() { index + 1 } else { index };
        let quotes = Arc::new(
            self.upstream
                .fetch_batch(page_or_index, page_size, tag.as_deref())
                .await?,
        );

        self.cache_set(key, quotes.clone(), self.config.batch_ttl)
            .await;
        Ok(quotes)
    }
}
