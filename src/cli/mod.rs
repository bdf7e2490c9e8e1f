//! CLI module for marinenp
//!
//! Provides command-line interface for:
//! - serve: Load configuration, open the storage pool and serve HTTP
//! - explain: Compile filter conditions and print the plan as JSON

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{explain, explain_plan, run, run_command, serve, DEFAULT_LOG_FILTER};
pub use config::{AnalyticsConfig, Config, DatabaseConfig, ExportConfig};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{print_json, write_json};
