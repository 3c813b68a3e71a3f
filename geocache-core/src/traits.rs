//! Common traits for geocache.
//!
//! These traits define the seams between the lookup service and its
//! collaborators, so real implementations can be swapped for test doubles.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{AddressLabel, Coordinates};

// ═══════════════════════════════════════════════════════════════════════════════
// UPSTREAM TRAIT
// ═══════════════════════════════════════════════════════════════════════════════

/// Interface to the external mapping provider.
///
/// Implementations perform one network round trip per call and must fail
/// with [`GeoError::UpstreamFailure`](crate::GeoError::UpstreamFailure) on
/// transport errors, timeouts, malformed responses and empty result sets.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Resolves an address to the coordinates of the provider's first match.
    async fn forward(&self, address: &str) -> Result<Coordinates>;

    /// Resolves coordinates to the label of the provider's first match.
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<AddressLabel>;

    /// Short provider name used in logs.
    fn name(&self) -> &str {
        "upstream"
    }
}
