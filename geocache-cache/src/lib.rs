//! # geocache cache
//!
//! Generic in-memory store bounded by capacity (LRU eviction) and by a
//! time-to-live measured from insertion. Every eviction is reported to
//! registered listeners together with its [`EvictionCause`].
//!
//! ```rust
//! use std::time::Duration;
//! use geocache_cache::CacheStore;
//!
//! let cache: CacheStore<String, u32> = CacheStore::new("demo", 2, Duration::from_secs(60));
//! cache.put("a".into(), 1);
//! cache.put("b".into(), 2);
//! cache.put("c".into(), 3);
//! assert!(cache.get(&"a".to_string()).is_none());
//! assert_eq!(cache.len(), 2);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod config;
mod store;

pub use config::CacheConfig;
pub use store::{CacheStats, CacheStore, EvictionCause, EvictionListener};
