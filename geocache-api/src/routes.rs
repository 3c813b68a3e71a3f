//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))

        // Lookups
        .route("/geocoding", get(handlers::geocode))
        .route("/reverse-geocoding", get(handlers::reverse_geocode))

        // Cache
        .route("/cache/stats", get(handlers::cache_stats))

        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use tower::ServiceExt;

    use geocache_core::error::{GeoError, Result};
    use geocache_core::traits::UpstreamClient;
    use geocache_core::types::{AddressLabel, Coordinates};

    use crate::state::ApiConfig;

    #[derive(Default)]
    struct FakeUpstream {
        calls: AtomicUsize,
        fail: AtomicBool,
    }

    #[async_trait]
    impl UpstreamClient for FakeUpstream {
        async fn forward(&self, _address: &str) -> Result<Coordinates> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(GeoError::upstream("provider returned status 503"));
            }
            Ok(Coordinates::new(48.8566, 2.3522))
        }

        async fn reverse(&self, _latitude: f64, _longitude: f64) -> Result<AddressLabel> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(GeoError::upstream("provider returned no results"));
            }
            Ok(AddressLabel::new("Paris, France"))
        }
    }

    fn test_app() -> (Router, Arc<FakeUpstream>) {
        let upstream = Arc::new(FakeUpstream::default());
        let state = Arc::new(AppState::with_upstream(ApiConfig::default(), upstream.clone()));
        (create_router(state), upstream)
    }

    async fn get(app: &Router, uri: &str) -> Response {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json(response: Response) -> Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let (app, _) = test_app();

        let response = get(&app, "/health").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn test_geocoding() {
        let (app, upstream) = test_app();

        let response = get(&app, "/geocoding?address=Paris").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["latitude"], 48.8566);
        assert_eq!(body["longitude"], 2.3522);

        let response = get(&app, "/geocoding?address=PARIS").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_geocoding_encoded_address() {
        let (app, _) = test_app();

        let response = get(&app, "/geocoding?address=New%20York").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_geocoding_missing_address() {
        let (app, upstream) = test_app();

        let response = get(&app, "/geocoding").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "BAD_REQUEST");
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_geocoding_blank_address() {
        let (app, upstream) = test_app();

        let response = get(&app, "/geocoding?address=%20%20").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reverse_geocoding_plain_text() {
        let (app, _) = test_app();

        let response = get(&app, "/reverse-geocoding?latitude=48.8566&longitude=2.3522").await;
        assert_eq!(response.status(), StatusCode::OK);

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(content_type.starts_with("text/plain"));
        assert_eq!(body_bytes(response).await, b"Paris, France");
    }

    #[tokio::test]
    async fn test_reverse_geocoding_out_of_range() {
        let (app, upstream) = test_app();

        let response = get(&app, "/reverse-geocoding?latitude=200&longitude=10").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "INVALID_INPUT");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("latitude"));
        assert!(message.contains("-90..90"));
        assert_eq!(upstream.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_reverse_geocoding_unparseable() {
        let (app, _) = test_app();

        let response = get(&app, "/reverse-geocoding?latitude=north&longitude=10").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = get(&app, "/reverse-geocoding?latitude=10").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_bad_gateway() {
        let (app, upstream) = test_app();
        upstream.fail.store(true, Ordering::SeqCst);

        let response = get(&app, "/geocoding?address=Paris").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "UPSTREAM_FAILURE");

        let response = get(&app, "/reverse-geocoding?latitude=1&longitude=1").await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let (app, _) = test_app();
        get(&app, "/geocoding?address=Paris").await;
        get(&app, "/geocoding?address=Paris").await;

        let response = get(&app, "/cache/stats").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["forward"]["name"], "geocoding");
        assert_eq!(body["forward"]["hits"], 1);
        assert_eq!(body["forward"]["size"], 1);
        assert_eq!(body["reverse"]["size"], 0);
        assert_eq!(body["upstream_calls"], 1);
    }
}
