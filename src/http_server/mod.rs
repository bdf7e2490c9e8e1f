//! # HTTP Server Module
//!
//! Read-only JSON API over the catalog, built on axum.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/api/v1/statistics` - Marine molecule and organism counts
//! - `/api/v1/molecules/*` - Search, export, analyze, ranges, by identifier
//! - `/api/v1/{organisms,collections,citations,locations}/*` - Entity lists
//!
//! # Design Principles
//!
//! - Handlers parse, compile and delegate; no SQL lives here
//! - Every error leaves as the `{status, msg, data}` envelope
//! - Handler state is read-only and shared through `Arc`

mod catalog_routes;
pub mod config;
mod errors;
pub mod export;
mod molecule_routes;
pub mod observability_routes;
mod response;
pub mod server;
mod state;

pub use config::{HttpServerConfig, ReleaseInfo};
pub use errors::{ApiError, ApiResult, ErrorBody};
pub use response::{list_body, Envelope, LinkedMolecules, SearchResponse};
pub use server::{HttpServer, API_PREFIX};
pub use state::{ApiState, DEFAULT_EXPORT_PAGE_SIZE};
