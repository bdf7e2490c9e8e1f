//! Catalog Entity HTTP Routes
//!
//! Organisms, collections, citations and locations share one contract:
//! a paged list searched by `query`, a by-ID lookup and, where the entity
//! links to molecules, the paged molecules of one entity.

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;

use crate::catalog::{
    Entity, CITATION_ENTITY, COLLECTION_ENTITY, LOCATION_ENTITY, ORGANISM_ENTITY,
};
use crate::executor::Record;
use crate::filter::PageParams;

use super::errors::{ApiError, ApiResult};
use super::response::{list_body, Envelope, LinkedMolecules};
use super::state::ApiState;

type Shared = State<Arc<ApiState>>;
type Params = Query<HashMap<String, String>>;

// ==================
// Catalog Routes
// ==================

pub fn catalog_routes(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/organisms/autocomplete", get(autocomplete_handler))
        .nest("/organisms", entity_routes(&ORGANISM_ENTITY))
        .nest("/collections", entity_routes(&COLLECTION_ENTITY))
        .nest("/citations", entity_routes(&CITATION_ENTITY))
        .nest("/locations", entity_routes(&LOCATION_ENTITY))
        .with_state(state)
}

/// List, by-ID and (when linked) molecules routes of one entity
fn entity_routes(entity: &'static Entity) -> Router<Arc<ApiState>> {
    let router = Router::new()
        .route(
            "/",
            get(move |State(state): Shared, Query(params): Params| {
                list_handler(entity, state, params)
            }),
        )
        .route(
            "/:id",
            get(move |State(state): Shared, Path(id): Path<String>| {
                by_id_handler(entity, state, id)
            }),
        );

    if entity.molecules.is_none() {
        return router;
    }
    router.route(
        "/:id/molecules",
        get(
            move |State(state): Shared, Path(id): Path<String>, Query(params): Params| {
                molecules_handler(entity, state, id, params)
            },
        ),
    )
}

fn parse_id(id: &str) -> ApiResult<i64> {
    id.trim()
        .parse::<i64>()
        .map_err(|_| ApiError::InvalidParam(format!("id '{}'", id)))
}

// ==================
// Handlers
// ==================

async fn list_handler(
    entity: &'static Entity,
    state: Arc<ApiState>,
    params: HashMap<String, String>,
) -> ApiResult<Json<Value>> {
    let page = PageParams::parse(&params);
    let result = state.executor.list_entities(entity, &page).await?;
    Ok(Json(list_body(entity.plural, result)))
}

async fn by_id_handler(
    entity: &'static Entity,
    state: Arc<ApiState>,
    id: String,
) -> ApiResult<Json<Envelope<Record>>> {
    let id = parse_id(&id)?;
    state
        .executor
        .entity_by_id(entity, id)
        .await?
        .map(|record| Json(Envelope::ok(record)))
        .ok_or_else(|| ApiError::not_found(format!("{} {}", entity.table.name, id)))
}

async fn molecules_handler(
    entity: &'static Entity,
    state: Arc<ApiState>,
    id: String,
    params: HashMap<String, String>,
) -> ApiResult<Json<LinkedMolecules>> {
    let id = parse_id(&id)?;
    let page = PageParams::parse(&params);
    let result = state.executor.entity_molecules(entity, id, &page).await?;
    Ok(Json(LinkedMolecules {
        data: result.records,
        total: result.total,
        page: page.page,
    }))
}

async fn autocomplete_handler(
    State(state): Shared,
    Query(params): Params,
) -> ApiResult<Json<Vec<Value>>> {
    let search = params.get("search").map(|s| s.trim()).unwrap_or_default();
    Ok(Json(state.executor.autocomplete_organisms(search).await?))
}
