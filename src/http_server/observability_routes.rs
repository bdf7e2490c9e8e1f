//! Observability HTTP Routes
//!
//! Liveness at `/health` and catalog-level counts at `/statistics`.

use std::sync::Arc;

use axum::extract::State;
use axum::{http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::Serialize;

use super::errors::ApiResult;
use super::state::ApiState;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Catalog statistics response
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub total_molecules: u64,
    pub total_organisms: u64,
    pub version: String,
    pub last_update: String,
}

/// Health check route, mounted at the root
pub fn health_routes() -> Router {
    Router::new().route("/health", get(health_handler))
}

pub fn statistics_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/statistics", get(statistics_handler))
        .with_state(state)
}

/// Health check handler
async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}

async fn statistics_handler(
    State(state): State<Arc<ApiState>>,
) -> ApiResult<Json<StatisticsResponse>> {
    let counts = state.executor.statistics().await?;
    Ok(Json(StatisticsResponse {
        total_molecules: counts.molecules,
        total_organisms: counts.organisms,
        version: state.release.version.clone(),
        last_update: state.release.last_update.clone(),
    }))
}
