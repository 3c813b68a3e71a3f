//! Per-key coalescing of concurrent asynchronous calls.

use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, error};

use geocache_core::error::{GeoError, Result};

type Call<T> = Shared<BoxFuture<'static, Result<T>>>;

/// Runs at most one call per key at a time.
///
/// Callers arriving while a call for their key is in flight wait for that
/// call and receive a clone of its outcome, success or failure. Each call
/// runs on its own tokio task, so it completes and releases its slot even
/// when every caller has gone away; the next caller then starts afresh.
pub struct SingleFlight<K, T> {
    calls: Arc<DashMap<K, Call<T>>>,
}

impl<K, T> SingleFlight<K, T>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    /// Creates an empty group.
    pub fn new() -> Self {
        Self {
            calls: Arc::new(DashMap::new()),
        }
    }

    /// Joins the in-flight call for `key`, or starts one with `call`.
    ///
    /// `call` is only invoked when no call for `key` is in flight. Must be
    /// called from within a tokio runtime.
    pub async fn run<F, Fut>(&self, key: K, call: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let shared = match self.calls.entry(key.clone()) {
            Entry::Occupied(entry) => {
                debug!("Joining in-flight lookup");
                entry.get().clone()
            }
            Entry::Vacant(entry) => {
                let release = Release {
                    calls: Arc::clone(&self.calls),
                    key,
                };
                let fut = call();
                let task = tokio::spawn(async move {
                    let _release = release;
                    fut.await
                });
                let shared = async move {
                    task.await.unwrap_or_else(|e| {
                        error!(error = %e, "In-flight lookup task failed");
                        Err(GeoError::upstream(format!("lookup task failed: {}", e)))
                    })
                }
                .boxed()
                .shared();
                entry.insert(shared.clone());
                shared
            }
        };

        shared.await
    }

    /// Number of keys with a call in flight.
    pub fn in_flight(&self) -> usize {
        self.calls.len()
    }
}

impl<K, T> Default for SingleFlight<K, T>
where
    K: Hash + Eq + Clone + Send + Sync + 'static,
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

/// Frees the slot when the call's task completes, fails or unwinds.
struct Release<K: Hash + Eq, T> {
    calls: Arc<DashMap<K, Call<T>>>,
    key: K,
}

impl<K: Hash + Eq, T> Drop for Release<K, T> {
    fn drop(&mut self) {
        self.calls.remove(&self.key);
    }
}
