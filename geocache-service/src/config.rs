//! Lookup service configuration.

use serde::{Deserialize, Serialize};

use geocache_cache::CacheConfig;
use geocache_core::constants::DEFAULT_BYPASS_ADDRESS;
use geocache_core::types::ForwardKey;

/// Lookup service configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LookupConfig {
    /// Cache settings, applied to each namespace
    pub cache: CacheConfig,
    /// Forward address that always skips the cache
    pub bypass_address: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache: CacheConfig::default(),
            bypass_address: Some(DEFAULT_BYPASS_ADDRESS.into()),
        }
    }
}

impl LookupConfig {
    /// Replaces the cache settings.
    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the bypass address. A blank value disables bypass.
    pub fn with_bypass(mut self, address: impl Into<String>) -> Self {
        let address = address.into();
        self.bypass_address = if address.trim().is_empty() {
            None
        } else {
            Some(address)
        };
        self
    }

    /// Disables the bypass address.
    pub fn no_bypass(mut self) -> Self {
        self.bypass_address = None;
        self
    }

    /// Normalized bypass key, if any.
    pub(crate) fn bypass_key(&self) -> Option<ForwardKey> {
        self.bypass_address
            .as_deref()
            .map(ForwardKey::from_address)
            .filter(|key| !key.as_str().is_empty())
    }
}
