//! Service-wide constants and defaults.

// ═══════════════════════════════════════════════════════════════════════════════
// COORDINATE BOUNDS
// ═══════════════════════════════════════════════════════════════════════════════

/// Smallest valid latitude (inclusive).
pub const MIN_LATITUDE: f64 = -90.0;

/// Largest valid latitude (inclusive).
pub const MAX_LATITUDE: f64 = 90.0;

/// Smallest valid longitude (inclusive).
pub const MIN_LONGITUDE: f64 = -180.0;

/// Largest valid longitude (inclusive).
pub const MAX_LONGITUDE: f64 = 180.0;

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE NAMESPACES
// ═══════════════════════════════════════════════════════════════════════════════

/// Namespace of the forward (address → coordinates) cache.
pub const FORWARD_NAMESPACE: &str = "geocoding";

/// Namespace of the reverse (coordinates → address) cache.
pub const REVERSE_NAMESPACE: &str = "reverse-geocoding";

// ═══════════════════════════════════════════════════════════════════════════════
// DEFAULTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default maximum number of entries per cache namespace.
pub const DEFAULT_CACHE_CAPACITY: usize = 100;

/// Default time-to-live of a cache entry, measured from insertion (7 minutes).
pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 7 * 60;

/// Default interval between background sweeps of expired entries.
pub const DEFAULT_SWEEP_INTERVAL_SECONDS: u64 = 60;

/// Default forward address that always bypasses the cache.
pub const DEFAULT_BYPASS_ADDRESS: &str = "goa";

/// Default timeout for a single upstream provider call.
pub const DEFAULT_UPSTREAM_TIMEOUT_SECONDS: u64 = 5;

/// Default PositionStack API base URL.
pub const DEFAULT_POSITIONSTACK_URL: &str = "http://api.positionstack.com";
