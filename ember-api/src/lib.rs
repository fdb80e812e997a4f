//! # Ember API Server
//!
//! REST surface over the ember feed service.
//!
//! ## Endpoints
//!
//! - `GET /health` - Service status and cache occupancy
//! - `GET /api/v1/stories?page=&pageSize=` - Paginated newest stories
//! - `GET /api/v1/stories/:id` - One story by id
//! - `GET /api/v1/search?q=&limit=` - Substring search over the newest stories
//!
//! ## Example
//!
//! ```rust,ignore
//! use ember_api::{ApiServer, ApiConfig};
//!
//! let config = ApiConfig::from_env();
//! let server = ApiServer::new(config);
//! server.run(([0, 0, 0, 0], 3001)).await?;
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
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

/// API server for ember.
pub struct ApiServer {
    state: Arc<AppState>,
}

impl ApiServer {
    /// Creates a new API server with the given configuration.
    pub fn new(config: ApiConfig) -> Self {
        Self {
            state: Arc::new(AppState::new(config)),
        }
    }

    /// Token that shuts the server down and cancels in-flight requests
    /// when fired. Wire this to Ctrl-C or an orchestrator signal.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.state.shutdown.clone()
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

    /// Runs the server on the given address until the shutdown token fires.
    pub async fn run(self, addr: impl Into<SocketAddr>) -> std::io::Result<()> {
        let addr = addr.into();
        let listener = tokio::net::TcpListener::bind(addr).await?;

        info!("ember API server listening on {}", addr);

        let shutdown = self.state.shutdown.clone();
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await
    }
}

/// Starts the API server with configuration read from the environment.
pub async fn start_server(port: u16) -> std::io::Result<()> {
    let config = ApiConfig::from_env();
    let server = ApiServer::new(config);
    server.run(([0, 0, 0, 0], port)).await
}
