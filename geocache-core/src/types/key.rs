//! Cache keys derived from queries.
//!
//! Forward and reverse keys are distinct types stored in distinct caches,
//! so a forward key can never collide with a reverse key.

use std::fmt;

use serde::Serialize;

// ═══════════════════════════════════════════════════════════════════════════════
// FORWARD KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Normalized address used as the forward cache key.
///
/// Normalization is `trim` followed by lowercasing, so `"Paris"`,
/// `"PARIS"` and `"  paris "` all share one entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ForwardKey(String);

impl ForwardKey {
    /// Derives the key for a raw, user-supplied address.
    pub fn from_address(address: &str) -> Self {
        Self(address.trim().to_lowercase())
    }

    /// Returns the normalized address.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ForwardKey {
    fn from(address: &str) -> Self {
        Self::from_address(address)
    }
}

impl fmt::Display for ForwardKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REVERSE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Exact coordinate pair used as the reverse cache key.
///
/// Coordinates are compared bit-for-bit with no rounding: two pairs that
/// differ in the last decimal place (or `0.0` vs `-0.0`) are different keys.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ReverseKey {
    lat_bits: u64,
    lon_bits: u64,
}

impl ReverseKey {
    /// Creates the key for an exact `(latitude, longitude)` pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            lat_bits: latitude.to_bits(),
            lon_bits: longitude.to_bits(),
        }
    }

    /// Latitude component.
    pub fn latitude(&self) -> f64 {
        f64::from_bits(self.lat_bits)
    }

    /// Longitude component.
    pub fn longitude(&self) -> f64 {
        f64::from_bits(self.lon_bits)
    }
}

impl fmt::Debug for ReverseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ReverseKey")
            .field(&self.latitude())
            .field(&self.longitude())
            .finish()
    }
}

impl fmt::Display for ReverseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.latitude(), self.longitude())
    }
}

impl Serialize for ReverseKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (self.latitude(), self.longitude()).serialize(serializer)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// CACHE KEY
// ═══════════════════════════════════════════════════════════════════════════════

/// Cache key of either namespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Key in the `geocoding` namespace.
    Forward(ForwardKey),
    /// Key in the `reverse-geocoding` namespace.
    Reverse(ReverseKey),
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Forward(key) => write!(f, "geocoding:{}", key),
            CacheKey::Reverse(key) => write!(f, "reverse-geocoding:{}", key),
        }
    }
}
