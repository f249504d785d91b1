//! Request coalescing for cache misses.
//!
//! When several callers miss the same key at the same time, only the first
//! one starts the work. The others await a clone of the same shared future
//! and receive the same outcome, success or failure.
//!
//! The work is also driven by a spawned task, so it runs to completion and
//! its map entry is cleared even if every caller stops waiting.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use log::warn;

use crate::errors::Result;

type SharedFetch<V> = Shared<BoxFuture<'static, Result<V>>>;
type PendingMap<K, V> = Mutex<HashMap<K, SharedFetch<V>>>;

fn lock_map<K, V>(pending: &PendingMap<K, V>) -> MutexGuard<'_, HashMap<K, SharedFetch<V>>>
where
    V: Clone,
{
    pending.lock().unwrap_or_else(|poisoned| {
        warn!("In-flight map mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// Drop `key` from the map if it still points at `fetch`.
fn release<K, V>(pending: &PendingMap<K, V>, key: &K, fetch: &SharedFetch<V>)
where
    K: Eq + Hash,
    V: Clone,
{
    let mut pending = lock_map(pending);
    if pending
        .get(key)
        .is_some_and(|current| current.ptr_eq(fetch))
    {
        pending.remove(key);
    }
}

/// Map of key to in-progress fetch.
pub struct InFlight<K, V>
where
    V: Clone,
{
    pending: Arc<PendingMap<K, V>>,
}

impl<K, V> InFlight<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    fn lock_pending(&self) -> MutexGuard<'_, HashMap<K, SharedFetch<V>>> {
        lock_map(self.pending.as_ref())
    }

    /// Run `fetch` for `key`, or join the fetch already running for it.
    ///
    /// `fetch` is only invoked when no fetch for `key` is pending. The entry
    /// is removed once the shared future resolves, so a later call after
    /// completion starts fresh work (normally served by the cache by then).
    /// Must be called from within a tokio runtime.
    pub async fn run<F, Fut>(&self, key: K, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>> + Send + 'static,
    {
        let shared = {
            let mut pending = self.lock_pending();
            match pending.get(&key) {
                Some(existing) => existing.clone(),
                None => {
                    let created = fetch().boxed().shared();
                    pending.insert(key.clone(), created.clone());
                    self.drive(key.clone(), created.clone());
                    created
                }
            }
        };

        let result = shared.clone().await;
        release(self.pending.as_ref(), &key, &shared);
        result
    }

    /// Poll `fetch` to completion on its own task and clear its entry.
    fn drive(&self, key: K, fetch: SharedFetch<V>) {
        let pending = Arc::clone(&self.pending);
        tokio::spawn(async move {
            let _ = fetch.clone().await;
            release(pending.as_ref(), &key, &fetch);
        });
    }

    /// Number of keys with a fetch currently pending.
    pub fn len(&self) -> usize {
        self.lock_pending().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Default for InFlight<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}
