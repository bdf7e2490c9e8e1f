//! Molecule HTTP Routes
//!
//! Filtered search, CSV export and the analyze endpoint all compile the
//! same `conditions[i][...]` / `keyword` parameters into one plan.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use tracing::info;

use crate::analytics::{AggregationEngine, AggregationResult, ChartType};
use crate::executor::{chunk_count, QueryExecutor, Record};
use crate::filter::{parse_conditions, PageParams};
use crate::planner::{compile, FilterPlan};

use super::errors::{ApiError, ApiResult};
use super::export::write_csv;
use super::response::{Envelope, SearchResponse};
use super::state::ApiState;

type Params = Query<HashMap<String, String>>;

// ==================
// Molecule Routes
// ==================

pub fn molecule_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/molecules/search", get(search_handler))
        .route("/molecules/export", get(export_handler))
        .route("/molecules/analyze", get(analyze_handler))
        .route("/molecules/properties/ranges", get(ranges_handler))
        .route("/molecules/:identifier", get(by_identifier_handler))
        .with_state(state)
}

fn plan_from(params: &HashMap<String, String>) -> FilterPlan {
    compile(&parse_conditions(params))
}

// ==================
// Handlers
// ==================

async fn search_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Params,
) -> ApiResult<Json<SearchResponse>> {
    let plan = plan_from(&params);
    let page = PageParams::parse(&params);

    let total = state.executor.count(&plan).await?;
    let molecules = if total == 0 {
        Vec::new()
    } else {
        state.executor.fetch_page(&plan, &page).await?
    };

    Ok(Json(SearchResponse { molecules, total }))
}

async fn export_handler(
    State(state): State<Arc<ApiState>>,
    RawQuery(raw): RawQuery,
    Query(params): Params,
) -> ApiResult<Response> {
    let plan = plan_from(&params);
    let requested = PageParams::parse(&params);
    let page_size = state.export_page_size.max(1);

    let total = state.executor.count(&plan).await?;
    let pages = chunk_count(total as usize, page_size as usize) as u64;
    info!(total, pages, "exporting molecules");

    let mut records: Vec<Record> = Vec::with_capacity(total as usize);
    for page in 1..=pages {
        let params = PageParams {
            page,
            per_page: page_size,
            ..requested.clone()
        };
        records.extend(state.executor.fetch_page(&plan, &params).await?);
    }

    let body = write_csv(&records, raw.as_deref().unwrap_or_default())?;
    let filename = format!("molecules_{}.csv", Utc::now().format("%Y%m%d_%H%M%S"));
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ),
    ];
    Ok((headers, body).into_response())
}

async fn analyze_handler(
    State(state): State<Arc<ApiState>>,
    Query(params): Params,
) -> ApiResult<Json<Envelope<AggregationResult>>> {
    let parameter = params
        .get("parameter")
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::MissingParam("parameter".to_string()))?;
    let chart = ChartType::parse(params.get("chart_type").map(String::as_str));
    let plan = plan_from(&params);

    let engine = AggregationEngine::new(&state.executor, state.executor.id_batch_size());
    let result = engine.aggregate(&plan, parameter, chart).await?;
    Ok(Json(Envelope::ok(result)))
}

async fn ranges_handler(State(state): State<Arc<ApiState>>) -> ApiResult<Json<Envelope<Record>>> {
    Ok(Json(Envelope::ok(state.executor.property_ranges().await?)))
}

async fn by_identifier_handler(
    State(state): State<Arc<ApiState>>,
    Path(identifier): Path<String>,
) -> ApiResult<Json<Envelope<Record>>> {
    state
        .executor
        .molecule_by_identifier(&identifier)
        .await?
        .map(|molecule| Json(Envelope::ok(molecule)))
        .ok_or_else(|| ApiError::not_found(format!("Molecule {}", identifier)))
}
