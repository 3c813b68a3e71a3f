//! App state: lookup service and config.

use std::str::FromStr;
use std::sync::Arc;

use tracing::warn;

use geocache_cache::CacheConfig;
use geocache_core::error::{GeoError, Result};
use geocache_core::traits::UpstreamClient;
use geocache_service::{GeoLookupService, LookupConfig};
use geocache_upstream::{PositionStackClient, UpstreamConfig};

/// Server configuration.
#[derive(Clone, Debug, Default)]
pub struct ApiConfig {
    /// PositionStack client settings
    pub upstream: UpstreamConfig,
    /// Cache and bypass settings
    pub lookup: LookupConfig,
}

impl ApiConfig {
    /// Reads configuration from the environment, loading `.env` first.
    ///
    /// Unset variables keep their defaults.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_vars(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `var`.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let upstream = UpstreamConfig {
            api_key: var("POSITIONSTACK_API_KEY").unwrap_or_default(),
            base_url: var("POSITIONSTACK_BASE_URL").unwrap_or(defaults.upstream.base_url),
            timeout_seconds: parse_var(
                &var,
                "GEOCACHE_UPSTREAM_TIMEOUT_SECONDS",
                defaults.upstream.timeout_seconds,
            ),
        };

        let cache = CacheConfig {
            capacity: parse_var(&var, "GEOCACHE_CAPACITY", defaults.lookup.cache.capacity),
            ttl_seconds: parse_var(&var, "GEOCACHE_TTL_SECONDS", defaults.lookup.cache.ttl_seconds),
            sweep_interval_seconds: parse_var(
                &var,
                "GEOCACHE_SWEEP_INTERVAL_SECONDS",
                defaults.lookup.cache.sweep_interval_seconds,
            ),
        };

        let mut lookup = defaults.lookup.with_cache(cache);
        if let Some(bypass) = var("GEOCACHE_BYPASS_ADDRESS") {
            lookup = lookup.with_bypass(bypass);
        }

        Self { upstream, lookup }
    }

    /// Checks values that would make the server unusable.
    pub fn validate(&self) -> Result<()> {
        if self.upstream.api_key.trim().is_empty() {
            return Err(GeoError::ConfigError(
                "POSITIONSTACK_API_KEY must be set".into(),
            ));
        }
        if self.lookup.cache.ttl_seconds == 0 {
            return Err(GeoError::ConfigError(
                "cache TTL must be at least one second".into(),
            ));
        }
        if self.upstream.timeout_seconds == 0 {
            return Err(GeoError::ConfigError(
                "upstream timeout must be at least one second".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T: FromStr + Copy>(
    var: &impl Fn(&str) -> Option<String>,
    name: &str,
    default: T,
) -> T {
    match var(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!(variable = name, value = %raw, "Ignoring unparseable value");
            default
        }),
        None => default,
    }
}

/// Shared state behind every handler.
pub struct AppState {
    /// Active configuration
    pub config: ApiConfig,
    /// Cache-aside lookup service
    pub service: GeoLookupService,
}

impl AppState {
    /// Validates `config` and wires a PositionStack-backed service.
    pub fn new(config: ApiConfig) -> Result<Self> {
        config.validate()?;
        let client = PositionStackClient::with_config(config.upstream.clone())?;
        Ok(Self::with_upstream(config, Arc::new(client)))
    }

    /// Wires the service to an arbitrary provider.
    pub fn with_upstream(config: ApiConfig, upstream: Arc<dyn UpstreamClient>) -> Self {
        let service = GeoLookupService::with_config(upstream, config.lookup.clone());
        Self { config, service }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_from_vars_defaults() {
        let config = ApiConfig::from_vars(vars(&[]));
        assert_eq!(config.upstream.base_url, "http://api.positionstack.com");
        assert_eq!(config.upstream.timeout_seconds, 5);
        assert_eq!(config.lookup.cache.capacity, 100);
        assert_eq!(config.lookup.cache.ttl_seconds, 420);
        assert_eq!(config.lookup.bypass_address.as_deref(), Some("goa"));
    }

    #[test]
    fn test_from_vars_overrides() {
        let config = ApiConfig::from_vars(vars(&[
            ("POSITIONSTACK_API_KEY", "secret"),
            ("POSITIONSTACK_BASE_URL", "http://localhost:9000"),
            ("GEOCACHE_CAPACITY", "10"),
            ("GEOCACHE_TTL_SECONDS", " 30 "),
            ("GEOCACHE_SWEEP_INTERVAL_SECONDS", "5"),
            ("GEOCACHE_UPSTREAM_TIMEOUT_SECONDS", "2"),
            ("GEOCACHE_BYPASS_ADDRESS", "Lisbon"),
        ]));
        assert_eq!(config.upstream.api_key, "secret");
        assert_eq!(config.upstream.base_url, "http://localhost:9000");
        assert_eq!(config.upstream.timeout_seconds, 2);
        assert_eq!(config.lookup.cache.capacity, 10);
        assert_eq!(config.lookup.cache.ttl_seconds, 30);
        assert_eq!(config.lookup.cache.sweep_interval_seconds, 5);
        assert_eq!(config.lookup.bypass_address.as_deref(), Some("Lisbon"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_bypass_disables_it() {
        let config = ApiConfig::from_vars(vars(&[("GEOCACHE_BYPASS_ADDRESS", "")]));
        assert_eq!(config.lookup.bypass_address, None);
    }

    #[test]
    fn test_unparseable_value_keeps_default() {
        let config = ApiConfig::from_vars(vars(&[("GEOCACHE_CAPACITY", "lots")]));
        assert_eq!(config.lookup.cache.capacity, 100);
    }

    #[test]
    fn test_validate() {
        let config = ApiConfig::default();
        assert!(matches!(config.validate(), Err(GeoError::ConfigError(_))));

        let mut config = ApiConfig::from_vars(vars(&[("POSITIONSTACK_API_KEY", "k")]));
        assert!(config.validate().is_ok());

        config.lookup.cache.ttl_seconds = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_new_requires_api_key() {
        assert!(AppState::new(ApiConfig::default()).is_err());
    }
}
