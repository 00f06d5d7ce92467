//! Time-bounded in-process cache.
//!
//! Entries older than the TTL are treated as absent: they are evicted when
//! read and by a periodic sweep. Clones share the same underlying map. Time
//! comes from `tokio::time::Instant`, so tests can pause and advance the clock.

use std::hash::Hash;
use std::sync::{Arc, Weak};
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Lower bound for the sweep period; `tokio::time::interval` rejects zero.
const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

/// Thread-safe key/value store with a fixed time-to-live.
#[derive(Debug)]
pub struct TtlCache<K, V>
where
    K: Eq + Hash,
{
    entries: Arc<DashMap<K, CacheEntry<V>>>,
    ttl: Duration,
}

impl<K: Eq + Hash, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
            ttl: self.ttl,
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            ttl,
        }
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Stores `value` stamped with the current time, replacing any previous entry.
    pub fn set(&self, key: K, value: V) {
        self.entries.insert(
            key,
            CacheEntry {
                value,
                inserted_at: Instant::now(),
            },
        );
    }

    /// Returns a copy of the value if it was stored no more than one TTL ago.
    /// An expired entry is evicted.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        {
            // The read guard must be released before `remove_if` touches the shard.
            let entry = self.entries.get(key)?;
            if now.duration_since(entry.inserted_at) <= self.ttl {
                return Some(entry.value.clone());
            }
        }
        self.entries
            .remove_if(key, |_, e| now.duration_since(e.inserted_at) > self.ttl);
        None
    }

    /// Evicts every expired entry and returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        purge(&self.entries, self.ttl)
    }

    /// Number of stored entries, expired ones included until they are purged.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    /// Starts a background task that purges expired entries once per TTL.
    ///
    /// The task holds only a weak reference and exits on the first tick after
    /// every clone of the cache has been dropped. Must be called from within a
    /// Tokio runtime.
    pub fn spawn_sweeper(&self, name: &'static str) -> JoinHandle<()> {
        let entries: Weak<DashMap<K, CacheEntry<V>>> = Arc::downgrade(&self.entries);
        let ttl = self.ttl;
        let period = ttl.max(MIN_SWEEP_INTERVAL);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            loop {
                ticker.tick().await;
                let Some(entries) = entries.upgrade() else {
                    tracing::debug!(cache = name, "cache dropped; sweeper exiting");
                    break;
                };
                let removed = purge(&entries, ttl);
                if removed > 0 {
                    tracing::debug!(cache = name, removed, remaining = entries.len(), "swept expired cache entries");
                }
            }
        })
    }
}

fn purge<K: Eq + Hash, V>(entries: &DashMap<K, CacheEntry<V>>, ttl: Duration) -> usize {
    let now = Instant::now();
    let before = entries.len();
    entries.retain(|_, e| now.duration_since(e.inserted_at) <= ttl);
    before.saturating_sub(entries.len())
}
