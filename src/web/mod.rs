//! Web server module.

mod handlers;

pub use handlers::*;

use crate::config::ServerConfig;
use crate::source::SourceReader;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: ServerConfig,
    pub source: Arc<dyn SourceReader>,
}

/// Web server for devicewatch.
pub struct Server {
    state: AppState,
}

impl Server {
    /// Create a new server with the given dependencies.
    pub fn new(config: ServerConfig, source: Arc<dyn SourceReader>) -> Self {
        Self {
            state: AppState { config, source },
        }
    }

    /// Build the router with all routes.
    pub fn routes(&self) -> Router {
        let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any);

        let router = Router::new()
            // API endpoints
            .route("/api/devices", get(handlers::handle_get_devices))
            .route("/healthz", get(handlers::handle_healthz));

        // Dashboard assets
        let router = match &self.state.config.static_dir {
            Some(dir) => router.fallback_service(ServeDir::new(dir)),
            None => router,
        };

        router
            .layer(cors)
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Start the server on the configured port.
    pub async fn start(&self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.state.config.http_port));
        let router = self.routes();

        tracing::info!("Web server listening on {}", addr);

        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, router).await?;

        Ok(())
    }
}
