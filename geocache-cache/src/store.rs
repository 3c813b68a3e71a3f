//! In-memory LRU + TTL cache store.

use std::fmt;
use std::hash::Hash;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::config::CacheConfig;

/// Why an entry left the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EvictionCause {
    /// Evicted as least-recently-used to make room for a new key.
    Capacity,
    /// Reached its time-to-live.
    Expired,
}

impl fmt::Display for EvictionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictionCause::Capacity => f.write_str("capacity"),
            EvictionCause::Expired => f.write_str("expired"),
        }
    }
}

/// Observer invoked with the evicted key and the cause.
pub type EvictionListener<K> = Arc<dyn Fn(&K, EvictionCause) + Send + Sync>;

/// Cache entry with insertion time.
struct CacheEntry<V> {
    value: V,
    inserted_at: Instant,
}

impl<V> CacheEntry<V> {
    fn new(value: V) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.inserted_at.elapsed() >= ttl
    }
}

#[derive(Default)]
struct Counters {
    hits: u64,
    misses: u64,
    capacity_evictions: u64,
    expired_evictions: u64,
}

struct Inner<K: Hash + Eq, V> {
    entries: LruCache<K, CacheEntry<V>>,
    counters: Counters,
}

/// Capacity- and time-bounded key/value store.
///
/// - At most `capacity` entries are held; inserting a new key into a full
///   store evicts the least-recently-used entry first.
/// - An entry is never returned once `ttl` has elapsed since it was
///   written. Reads refresh recency but not the TTL clock.
/// - Expired entries are dropped lazily on access and by
///   [`sweep_expired`](Self::sweep_expired).
///
/// Thread-safe; all structural changes happen under one internal lock and
/// listeners are called after it is released.
pub struct CacheStore<K: Hash + Eq, V> {
    name: String,
    capacity: usize,
    ttl: Duration,
    inner: Mutex<Inner<K, V>>,
    listeners: RwLock<Vec<EvictionListener<K>>>,
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    /// Creates a store holding at most `capacity` entries for `ttl` each.
    pub fn new(name: impl Into<String>, capacity: usize, ttl: Duration) -> Self {
        Self {
            name: name.into(),
            capacity,
            ttl,
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                counters: Counters::default(),
            }),
            listeners: RwLock::new(Vec::new()),
        }
    }

    /// Creates a store from configuration.
    pub fn with_config(name: impl Into<String>, config: &CacheConfig) -> Self {
        Self::new(name, config.capacity, config.ttl())
    }

    /// Namespace this store serves.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a copy of the cached value, marking it most recently used.
    ///
    /// An expired entry is removed (cause `Expired`) and reported as a miss.
    pub fn get(&self, key: &K) -> Option<V> {
        let (value, expired) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            match inner.entries.peek(key).map(|e| e.is_expired(self.ttl)) {
                None => {
                    inner.counters.misses += 1;
                    (None, false)
                }
                Some(true) => {
                    inner.entries.pop(key);
                    inner.counters.misses += 1;
                    inner.counters.expired_evictions += 1;
                    (None, true)
                }
                Some(false) => {
                    inner.counters.hits += 1;
                    (inner.entries.get(key).map(|e| e.value.clone()), false)
                }
            }
        };

        if expired {
            self.notify(key, EvictionCause::Expired);
        }
        value
    }

    /// Returns a copy of a live value without touching recency or counters.
    pub fn peek(&self, key: &K) -> Option<V> {
        let inner = self.inner.lock();
        inner
            .entries
            .peek(key)
            .filter(|e| !e.is_expired(self.ttl))
            .map(|e| e.value.clone())
    }

    /// Inserts or overwrites a value, resetting its insertion time.
    ///
    /// When a new key would exceed capacity, expired entries are dropped
    /// first (cause `Expired`); if the store is still full the
    /// least-recently-used entry is evicted (cause `Capacity`). A
    /// zero-capacity store keeps nothing.
    pub fn put(&self, key: K, value: V) {
        if self.capacity == 0 {
            return;
        }

        let (expired, evicted) = {
            let mut guard = self.inner.lock();
            let inner = &mut *guard;

            let mut expired = Vec::new();
            let mut evicted = None;
            if !inner.entries.contains(&key) && inner.entries.len() >= self.capacity {
                expired = Self::drain_expired(inner, self.ttl);
                if inner.entries.len() >= self.capacity {
                    if let Some((lru_key, _)) = inner.entries.pop_lru() {
                        inner.counters.capacity_evictions += 1;
                        evicted = Some(lru_key);
                    }
                }
            }
            inner.entries.put(key, CacheEntry::new(value));
            (expired, evicted)
        };

        for key in &expired {
            self.notify(key, EvictionCause::Expired);
        }
        if let Some(lru_key) = evicted {
            self.notify(&lru_key, EvictionCause::Capacity);
        }
    }

    /// Removes every expired entry and returns how many were dropped.
    pub fn sweep_expired(&self) -> usize {
        let expired = {
            let mut guard = self.inner.lock();
            Self::drain_expired(&mut guard, self.ttl)
        };

        for key in &expired {
            self.notify(key, EvictionCause::Expired);
        }
        expired.len()
    }

    /// Registers an eviction observer.
    ///
    /// Listeners run synchronously on the evicting thread. A panicking
    /// listener is logged and otherwise ignored.
    pub fn on_evict<F>(&self, listener: F)
    where
        F: Fn(&K, EvictionCause) + Send + Sync + 'static,
    {
        self.listeners.write().push(Arc::new(listener));
    }

    /// Drops all entries without emitting eviction events.
    pub fn clear(&self) {
        self.inner.lock().entries.clear();
    }

    /// Number of stored entries, including expired ones not yet swept.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns cache statistics.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.lock();
        let expired = inner
            .entries
            .iter()
            .filter(|(_, e)| e.is_expired(self.ttl))
            .count();

        CacheStats {
            name: self.name.clone(),
            size: inner.entries.len(),
            expired_pending: expired,
            capacity: self.capacity,
            ttl_seconds: self.ttl.as_secs(),
            hits: inner.counters.hits,
            misses: inner.counters.misses,
            capacity_evictions: inner.counters.capacity_evictions,
            expired_evictions: inner.counters.expired_evictions,
        }
    }

    /// Pops every expired entry, oldest first, and counts them.
    fn drain_expired(inner: &mut Inner<K, V>, ttl: Duration) -> Vec<K> {
        let keys: Vec<K> = inner
            .entries
            .iter()
            .rev()
            .filter(|(_, e)| e.is_expired(ttl))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &keys {
            inner.entries.pop(key);
        }
        inner.counters.expired_evictions += keys.len() as u64;
        keys
    }

    fn notify(&self, key: &K, cause: EvictionCause) {
        let listeners = self.listeners.read().clone();
        for listener in &listeners {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| listener(key, cause)));
            if outcome.is_err() {
                warn!(cache = %self.name, %cause, "Eviction listener panicked");
            }
        }
    }
}

impl<K, V> CacheStore<K, V>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Starts a tokio task that calls [`sweep_expired`](Self::sweep_expired)
    /// every `every`.
    ///
    /// The task holds only a weak reference and exits once the store is
    /// dropped; abort the handle to stop it earlier.
    pub fn spawn_sweeper(self: &Arc<Self>, every: Duration) -> JoinHandle<()> {
        let weak: Weak<Self> = Arc::downgrade(self);
        let every = every.max(Duration::from_millis(1));

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(store) = weak.upgrade() else {
                    break;
                };
                let removed = store.sweep_expired();
                if removed > 0 {
                    debug!(cache = %store.name, removed, "Swept expired entries");
                }
            }
        })
    }
}

/// Cache statistics.
#[derive(Clone, Debug, Serialize)]
pub struct CacheStats {
    /// Namespace
    pub name: String,
    /// Entries currently stored (including expired, unswept)
    pub size: usize,
    /// Stored entries already past their TTL
    pub expired_pending: usize,
    /// Maximum capacity
    pub capacity: usize,
    /// Entry TTL in seconds
    pub ttl_seconds: u64,
    /// Successful lookups
    pub hits: u64,
    /// Lookups that found nothing live
    pub misses: u64,
    /// Entries evicted to make room
    pub capacity_evictions: u64,
    /// Entries removed after expiring
    pub expired_evictions: u64,
}

impl CacheStats {
    /// Fraction of lookups served from cache, 0.0 when nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
