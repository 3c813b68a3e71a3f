//! Cache-aside geocoding lookups.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use geocache_cache::{CacheStats, CacheStore};
use geocache_core::constants::{FORWARD_NAMESPACE, REVERSE_NAMESPACE};
use geocache_core::error::{GeoError, Result};
use geocache_core::traits::UpstreamClient;
use geocache_core::types::{AddressLabel, Coordinates, ForwardKey, GeoQuery, GeoResult, ReverseKey};
use geocache_core::validation::{validate_address, validate_coordinates};

use crate::config::LookupConfig;
use crate::single_flight::SingleFlight;

/// Geocoding service that fronts an [`UpstreamClient`] with two caches.
///
/// Each lookup runs:
/// 1. input validation
/// 2. a cache check in the query's namespace
/// 3. on a miss, one provider call shared by all concurrent callers of the same key
/// 4. cache population with the successful result
///
/// Forward lookups for the configured bypass address skip steps 2-4 and
/// always reach the provider.
pub struct GeoLookupService {
    upstream: Arc<dyn UpstreamClient>,
    forward_cache: Arc<CacheStore<ForwardKey, Coordinates>>,
    reverse_cache: Arc<CacheStore<ReverseKey, AddressLabel>>,
    forward_flights: SingleFlight<ForwardKey, Coordinates>,
    reverse_flights: SingleFlight<ReverseKey, AddressLabel>,
    bypass: Option<ForwardKey>,
    upstream_calls: Arc<AtomicU64>,
    config: LookupConfig,
}

impl GeoLookupService {
    /// Creates a service with default configuration.
    pub fn new(upstream: Arc<dyn UpstreamClient>) -> Self {
        Self::with_config(upstream, LookupConfig::default())
    }

    /// Creates a service with custom configuration.
    pub fn with_config(upstream: Arc<dyn UpstreamClient>, config: LookupConfig) -> Self {
        let forward_cache = Arc::new(CacheStore::with_config(FORWARD_NAMESPACE, &config.cache));
        let reverse_cache = Arc::new(CacheStore::with_config(REVERSE_NAMESPACE, &config.cache));

        forward_cache.on_evict(|key: &ForwardKey, cause| {
            info!(cache = FORWARD_NAMESPACE, %key, %cause, "Cache entry evicted");
        });
        reverse_cache.on_evict(|key: &ReverseKey, cause| {
            info!(cache = REVERSE_NAMESPACE, %key, %cause, "Cache entry evicted");
        });

        info!(
            provider = upstream.name(),
            capacity = config.cache.capacity,
            ttl_seconds = config.cache.ttl_seconds,
            bypass = ?config.bypass_address,
            "Lookup service configured"
        );

        Self {
            upstream,
            forward_cache,
            reverse_cache,
            forward_flights: SingleFlight::new(),
            reverse_flights: SingleFlight::new(),
            bypass: config.bypass_key(),
            upstream_calls: Arc::new(AtomicU64::new(0)),
            config,
        }
    }

    /// Resolves an address to coordinates.
    #[instrument(skip(self))]
    pub async fn lookup_forward(&self, address: &str) -> Result<Coordinates> {
        validate_address(address)?;
        let key = ForwardKey::from_address(address);

        if self.bypass.as_ref() == Some(&key) {
            debug!(%key, "Bypass address, skipping cache");
            self.upstream_calls.fetch_add(1, Ordering::Relaxed);
            return self
                .upstream
                .forward(address)
                .await
                .map_err(|e| upstream_failure(&key, e));
        }

        if let Some(coordinates) = self.forward_cache.get(&key) {
            debug!(%key, "Cache hit");
            return Ok(coordinates);
        }

        debug!(%key, "Cache miss, resolving");

        let upstream = Arc::clone(&self.upstream);
        let cache = Arc::clone(&self.forward_cache);
        let calls = Arc::clone(&self.upstream_calls);
        let address = address.to_string();
        let flight_key = key.clone();

        self.forward_flights
            .run(key, move || async move {
                // Filled by a flight that finished after our cache check.
                if let Some(coordinates) = cache.peek(&flight_key) {
                    return Ok(coordinates);
                }

                calls.fetch_add(1, Ordering::Relaxed);
                let coordinates = upstream
                    .forward(&address)
                    .await
                    .map_err(|e| upstream_failure(&flight_key, e))?;

                cache.put(flight_key, coordinates);
                Ok(coordinates)
            })
            .await
    }

    /// Resolves coordinates to an address label.
    ///
    /// The cache key is the exact coordinate pair; nearby but unequal
    /// coordinates are separate entries.
    #[instrument(skip(self))]
    pub async fn lookup_reverse(&self, latitude: f64, longitude: f64) -> Result<AddressLabel> {
        validate_coordinates(latitude, longitude)?;
        let key = ReverseKey::new(latitude, longitude);

        if let Some(label) = self.reverse_cache.get(&key) {
            debug!(%key, "Cache hit");
            return Ok(label);
        }

        debug!(%key, "Cache miss, resolving");

        let upstream = Arc::clone(&self.upstream);
        let cache = Arc::clone(&self.reverse_cache);
        let calls = Arc::clone(&self.upstream_calls);

        self.reverse_flights
            .run(key, move || async move {
                if let Some(label) = cache.peek(&key) {
                    return Ok(label);
                }

                calls.fetch_add(1, Ordering::Relaxed);
                let label = upstream
                    .reverse(latitude, longitude)
                    .await
                    .map_err(|e| upstream_failure(&key, e))?;

                cache.put(key, label.clone());
                Ok(label)
            })
            .await
    }

    /// Runs either kind of lookup.
    pub async fn lookup(&self, query: &GeoQuery) -> Result<GeoResult> {
        match query {
            GeoQuery::Forward { address } => self.lookup_forward(address).await.map(GeoResult::from),
            GeoQuery::Reverse { latitude, longitude } => self
                .lookup_reverse(*latitude, *longitude)
                .await
                .map(GeoResult::from),
        }
    }

    /// Starts the background expiry sweep for both namespaces.
    pub fn spawn_sweepers(&self) -> Vec<JoinHandle<()>> {
        let every = self.config.cache.sweep_interval();
        vec![
            self.forward_cache.spawn_sweeper(every),
            self.reverse_cache.spawn_sweeper(every),
        ]
    }

    /// Clears both namespaces.
    pub fn clear_caches(&self) {
        self.forward_cache.clear();
        self.reverse_cache.clear();
    }

    /// The forward (`geocoding`) cache.
    pub fn forward_cache(&self) -> &Arc<CacheStore<ForwardKey, Coordinates>> {
        &self.forward_cache
    }

    /// The reverse (`reverse-geocoding`) cache.
    pub fn reverse_cache(&self) -> &Arc<CacheStore<ReverseKey, AddressLabel>> {
        &self.reverse_cache
    }

    /// Returns cache and provider statistics.
    pub fn stats(&self) -> LookupStats {
        LookupStats {
            forward: self.forward_cache.stats(),
            reverse: self.reverse_cache.stats(),
            upstream_calls: self.upstream_calls.load(Ordering::Relaxed),
            in_flight: self.forward_flights.in_flight() + self.reverse_flights.in_flight(),
        }
    }
}

/// Wraps any provider error as an `UpstreamFailure`.
fn upstream_failure(key: &dyn std::fmt::Display, err: GeoError) -> GeoError {
    warn!(%key, error = %err, "Upstream lookup failed");
    match err {
        GeoError::UpstreamFailure(_) => err,
        other => GeoError::UpstreamFailure(other.to_string()),
    }
}

/// Lookup statistics.
#[derive(Clone, Debug, Serialize)]
pub struct LookupStats {
    /// `geocoding` namespace
    pub forward: CacheStats,
    /// `reverse-geocoding` namespace
    pub reverse: CacheStats,
    /// Provider calls made since startup
    pub upstream_calls: u64,
    /// Keys with a provider call currently in flight
    pub in_flight: usize,
}
