//! PositionStack client.
//!
//! Both endpoints answer with `{"data": [ {..}, .. ]}`; only the first
//! result is used. An empty batch is sometimes returned as `[[]]` or `{}`.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, instrument, warn};
use url::Url;

use geocache_core::constants::{DEFAULT_POSITIONSTACK_URL, DEFAULT_UPSTREAM_TIMEOUT_SECONDS};
use geocache_core::error::{GeoError, Result};
use geocache_core::traits::UpstreamClient;
use geocache_core::types::{AddressLabel, Coordinates};

/// PositionStack client configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// PositionStack access key
    pub api_key: String,
    /// API base URL, without the `/v1` suffix
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_POSITIONSTACK_URL.into(),
            timeout_seconds: DEFAULT_UPSTREAM_TIMEOUT_SECONDS,
        }
    }
}

impl UpstreamConfig {
    /// Creates a configuration with the given access key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Points the client at another base URL (e.g. a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}

/// Client for the PositionStack geocoding API.
pub struct PositionStackClient {
    config: UpstreamConfig,
    http_client: reqwest::Client,
}

impl PositionStackClient {
    /// Creates a client for the public API with the given access key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::with_config(UpstreamConfig::new(api_key))
    }

    /// Creates a client with custom configuration.
    pub fn with_config(config: UpstreamConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(GeoError::ConfigError("PositionStack API key is empty".into()));
        }

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("geocache/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GeoError::ConfigError(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &UpstreamConfig {
        &self.config
    }

    fn endpoint(&self, operation: &str, query: &str) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        Url::parse_with_params(
            &format!("{}/v1/{}", base, operation),
            &[("access_key", self.config.api_key.as_str()), ("query", query)],
        )
        .map_err(|e| GeoError::ConfigError(format!("invalid provider URL '{}': {}", base, e)))
    }

    /// Calls one endpoint and returns its first result object.
    async fn fetch_first(&self, operation: &str, query: &str) -> Result<Value> {
        let url = self.endpoint(operation, query)?;

        let response = self.http_client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                GeoError::upstream(format!(
                    "request timed out after {}s",
                    self.config.timeout_seconds
                ))
            } else {
                GeoError::upstream(format!("request failed: {}", e))
            }
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| GeoError::upstream(format!("failed to read response: {}", e)))?;
        let json: Option<Value> = serde_json::from_str(&body).ok();

        if let Some(error) = json.as_ref().and_then(|j| j.get("error")) {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            warn!(operation, %status, message, "Provider returned an error");
            return Err(GeoError::upstream(format!("provider error: {}", message)));
        }

        if !status.is_success() {
            return Err(GeoError::upstream(format!("provider returned status {}", status)));
        }

        let json = json.ok_or_else(|| GeoError::upstream("malformed provider response"))?;
        first_result(&json)
            .cloned()
            .ok_or_else(|| GeoError::upstream("provider returned no results"))
    }
}

#[async_trait]
impl UpstreamClient for PositionStackClient {
    #[instrument(skip(self))]
    async fn forward(&self, address: &str) -> Result<Coordinates> {
        let first = self.fetch_first("forward", address).await?;
        let coordinates = Coordinates::new(
            number_field(&first, "latitude")?,
            number_field(&first, "longitude")?,
        );

        info!(
            address,
            latitude = coordinates.latitude,
            longitude = coordinates.longitude,
            "Resolved address"
        );
        Ok(coordinates)
    }

    #[instrument(skip(self))]
    async fn reverse(&self, latitude: f64, longitude: f64) -> Result<AddressLabel> {
        let query = format!("{},{}", latitude, longitude);
        let first = self.fetch_first("reverse", &query).await?;

        let label = first
            .get("label")
            .and_then(Value::as_str)
            .filter(|l| !l.trim().is_empty())
            .ok_or_else(|| GeoError::upstream("result is missing label"))?;

        info!(latitude, longitude, label, "Resolved coordinates");
        Ok(AddressLabel::new(label))
    }

    fn name(&self) -> &str {
        "positionstack"
    }
}

/// First result object of a `data` list, unwrapping nested batches.
fn first_result(json: &Value) -> Option<&Value> {
    let mut first = json.get("data")?.as_array()?.first()?;
    while let Some(nested) = first.as_array() {
        first = nested.first()?;
    }
    if first.is_object() {
        Some(first)
    } else {
        debug!(result = %first, "Ignoring non-object result");
        None
    }
}

fn number_field(result: &Value, field: &str) -> Result<f64> {
    result
        .get(field)
        .and_then(Value::as_f64)
        .ok_or_else(|| GeoError::upstream(format!("result is missing {}", field)))
}
