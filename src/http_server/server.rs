//! # HTTP Server
//!
//! Combines the catalog routers under `/api/v1`, with `/health` at the root.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::Method;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use super::catalog_routes::catalog_routes;
use super::config::HttpServerConfig;
use super::molecule_routes::molecule_routes;
use super::observability_routes::{health_routes, statistics_routes};
use super::state::ApiState;

/// Prefix of every catalog route
pub const API_PREFIX: &str = "/api/v1";

/// HTTP server for the marine natural products catalog
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    pub fn with_config(config: HttpServerConfig, state: ApiState) -> Self {
        let router = Self::build_router(&config, Arc::new(state));
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<ApiState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET])
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods([Method::GET])
                .allow_headers(Any)
        };

        let api = Router::new()
            .merge(statistics_routes(state.clone()))
            .merge(molecule_routes(state.clone()))
            .merge(catalog_routes(state));

        Router::new()
            .merge(health_routes())
            .nest(API_PREFIX, api)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(cors),
            )
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until the listener fails or the process is interrupted
    pub async fn start(self) -> Result<(), std::io::Error> {
        let addr: SocketAddr = self.config.socket_addr().parse().map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("invalid socket address {}: {}", self.config.socket_addr(), e),
            )
        })?;

        let listener = TcpListener::bind(addr).await?;
        info!(%addr, prefix = API_PREFIX, "marinenp HTTP server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::SqliteExecutor;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn state() -> ApiState {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        ApiState::new(SqliteExecutor::new(pool))
    }

    #[tokio::test]
    async fn test_server_with_custom_port() {
        let server = HttpServer::with_config(HttpServerConfig::with_port(9090), state().await);
        assert_eq!(server.socket_addr(), "0.0.0.0:9090");
    }

    #[tokio::test]
    async fn test_router_builds_with_origin_list() {
        let mut config = HttpServerConfig::default();
        config.set_cors_origins("https://marinenp.example");
        let _router = HttpServer::with_config(config, state().await).router();
    }
}
