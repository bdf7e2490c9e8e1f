//! Query Executor subsystem
//!
//! Runs compiled filter plans against the relational store.
//!
//! # Execution modes
//!
//! - count: distinct matching molecules
//! - page: ordered offset/limit page, hydrated with properties, organisms
//!   and geo locations
//! - ids: bare matching IDs, feeding analytics and export
//! - aggregate: grouped counts and numeric values over one ID chunk of the
//!   unjoined properties table
//!
//! All `IN (...)` lists are bounded by the Batched ID Processor.

mod batch;
mod errors;
mod records;
mod sql;
mod store;

pub use batch::{chunk_count, process_in_chunks, DEFAULT_ID_BATCH_SIZE};
pub use errors::{ExecutorError, ExecutorResult};
pub use records::{decode_column, decode_record, plain_text, record_id, Record};
pub use store::{
    CatalogCounts, GroupCount, OrganismScope, PageResult, QueryExecutor, SqliteExecutor,
    AUTOCOMPLETE_LIMIT,
};
