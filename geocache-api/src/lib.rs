//! # geocache API Server
//!
//! HTTP front end for the caching geocoding service.
//!
//! ## Endpoints
//!
//! - `GET /geocoding?address=..` - Resolve an address to coordinates
//! - `GET /reverse-geocoding?latitude=..&longitude=..` - Resolve coordinates to a label
//! - `GET /cache/stats` - Cache and provider statistics
//! - `GET /health` - Liveness check
//!
//! ## Example
//!
//! ```rust,ignore
//! use geocache_api::{ApiConfig, ApiServer};
//!
//! let server = ApiServer::new(ApiConfig::from_env())?;
//! server.run(([0, 0, 0, 0], 8080)).await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod dto;
mod error;
mod handlers;
mod routes;
mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{ApiConfig, AppState};

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use geocache_core::error::Result;

/// API server for geocache.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a server backed by PositionStack.
    ///
    /// Fails if the configuration is invalid.
    pub fn new(config: ApiConfig) -> Result<Self> {
        Ok(Self::from_state(AppState::new(config)?))
    }

    /// Creates a server around prepared state.
    pub fn from_state(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Creates the router with all routes configured.
    pub fn router(&self) -> Router {
        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        create_router(self.state.clone())
            .layer(cors)
            .layer(TraceLayer::new_for_http())
    }

    /// Runs the server on the given address.
    ///
    /// Expiry sweepers run for as long as the server does.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;
        handlers::mark_started();
        let sweepers = self.state.service.spawn_sweepers();

        info!("geocache API server listening on {}", addr);

        let served = axum::serve(listener, self.router()).await;
        for sweeper in sweepers {
            sweeper.abort();
        }
        served
    }
}
