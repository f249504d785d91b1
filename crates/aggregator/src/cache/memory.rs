//! In-memory TTL cache with a bounded, least-recently-used capacity.
//!
//! One instance is built at startup and shared by reference across all
//! requests. Expiry is checked on read using the tokio clock.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use tokio::time::Instant;

use super::{CacheKey, CacheStore, QuoteList};
use crate::errors::Result;

/// Default maximum number of entries.
pub const DEFAULT_MAX_ENTRIES: usize = 100;

#[derive(Debug)]
struct CacheEntry {
    value: QuoteList,
    expires_at: Instant,
    /// Logical access time for LRU ordering.
    last_access: u64,
}

impl CacheEntry {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<CacheKey, CacheEntry>,
    /// Monotonic access counter.
    clock: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.map.len();
        self.map.retain(|_, entry| !entry.is_expired(now));
        before - self.map.len()
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| key.clone());

        if let Some(key) = oldest {
            debug!("Cache: evicting least recently used '{}'", key);
            self.map.remove(&key);
        }
    }
}

/// Thread-safe in-memory [`CacheStore`].
pub struct MemoryCacheStore {
    entries: Mutex<Entries>,
    max_entries: usize,
}

impl MemoryCacheStore {
    /// Create a store holding at most [`DEFAULT_MAX_ENTRIES`] entries.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a store holding at most `max_entries` entries (minimum 1).
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            max_entries: max_entries.max(1),
        }
    }

    /// Lock the entries mutex, recovering from poison if necessary.
    fn lock_entries(&self) -> MutexGuard<'_, Entries> {
        self.entries.lock().unwrap_or_else(|poisoned| {
            warn!("Cache entries mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Number of entries currently held, including expired ones not yet purged.
    pub fn len(&self) -> usize {
        self.lock_entries().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every entry.
    pub fn clear(&self) {
        self.lock_entries().map.clear();
    }

    /// Drop expired entries and return how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.lock_entries().purge_expired(Instant::now())
    }

    /// Maximum number of entries.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }
}

impl Default for MemoryCacheStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get(&self, key: &CacheKey) -> Result<Option<QuoteList>> {
        let now = Instant::now();
        let mut entries = self.lock_entries();
        let access = entries.tick();

        let live = match entries.map.get_mut(key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired(now) => None,
            Some(entry) => {
                entry.last_access = access;
                Some(entry.value.clone())
            }
        };

        if live.is_none() {
            debug!("Cache: entry '{}' expired", key);
            entries.map.remove(key);
        }
        Ok(live)
    }

    async fn set(&self, key: CacheKey, value: QuoteList, ttl: Duration) -> Result<()> {
        let now = Instant::now();
        let mut entries = self.lock_entries();
        let access = entries.tick();

        if !entries.map.contains_key(&key) && entries.map.len() >= self.max_entries {
            entries.purge_expired(now);
            if entries.map.len() >= self.max_entries {
                entries.evict_least_recent();
            }
        }

        entries.map.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + ttl,
                last_access: access,
            },
        );
        Ok(())
    }
}
