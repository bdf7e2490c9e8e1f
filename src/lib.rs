//! marinenp - marine natural products catalog service
//!
//! Compiles request filter conditions into SQL plans over the catalog
//! schema, executes them against SQLite, aggregates matching molecules into
//! chart series and serves the result over HTTP.

pub mod analytics;
pub mod catalog;
pub mod cli;
pub mod executor;
pub mod filter;
pub mod http_server;
pub mod planner;
