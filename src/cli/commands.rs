//! CLI command implementations
//!
//! `serve` owns the whole boot sequence: configuration, tracing, storage
//! pool, router. `explain` is pure and never opens storage.

use std::path::Path;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::executor::SqliteExecutor;
use crate::filter::{ConditionSet, FilterCondition};
use crate::http_server::{ApiState, HttpServer};
use crate::planner::{compile, ExplainPlan};

use super::args::{Cli, Command};
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::print_json;

/// Log filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "marinenp=info,tower_http=info";

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve { config } => serve(&config),
        Command::Explain {
            conditions,
            keyword,
        } => explain(&conditions, keyword.as_deref()),
    }
}

/// Serve the HTTP API until interrupted
pub fn serve(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    init_tracing();

    let runtime = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    runtime.block_on(async move {
        let executor =
            SqliteExecutor::connect(&config.database.path, config.database.max_connections)
                .await
                .map_err(|e| {
                    CliError::boot_failed(format!(
                        "Failed to open database {}: {}",
                        config.database.path, e
                    ))
                })?
                .with_id_batch_size(config.analytics.id_batch_size);
        info!(
            database = %config.database.path,
            max_connections = config.database.max_connections,
            id_batch_size = config.analytics.id_batch_size,
            "storage pool ready"
        );

        let state = ApiState::new(executor)
            .with_export_page_size(config.export.page_size)
            .with_release(config.release.clone());
        let server = HttpServer::with_config(config.server.clone(), state);

        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })
}

/// Print the compiled plan for the given conditions
pub fn explain(conditions: &[String], keyword: Option<&str>) -> CliResult<()> {
    let plan = explain_plan(conditions, keyword)?;
    print_json(&plan)
}

/// Build the plan `explain` prints
pub fn explain_plan(conditions: &[String], keyword: Option<&str>) -> CliResult<ExplainPlan> {
    let mut set = ConditionSet::new();
    for arg in conditions {
        let condition = FilterCondition::from_arg(arg).ok_or_else(|| {
            CliError::invalid_argument(format!(
                "condition '{}' is not FIELD:OPERATOR:VALUE",
                arg
            ))
        })?;
        set = set.and(condition);
    }
    if let Some(keyword) = keyword {
        set = set.with_keyword(keyword);
    }

    Ok(ExplainPlan::from_plan(&compile(&set)))
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // a subscriber installed by an embedding process wins
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explain_plan_properties_join() {
        let plan = explain_plan(&["properties.molecular_weight:gte:300".to_string()], None)
            .unwrap();
        assert_eq!(plan.joins, vec!["properties"]);
        assert!(!plan.requires_distinct);
        assert!(plan.sql.contains("CAST(properties.molecular_weight AS REAL) >= ?"));
    }

    #[test]
    fn test_explain_plan_keyword_only() {
        let plan = explain_plan(&[], Some("manzamine")).unwrap();
        assert!(plan.joins.is_empty());
        assert_eq!(plan.predicates.len(), 2);
    }

    #[test]
    fn test_explain_rejects_malformed_condition() {
        let err = explain_plan(&["organism".to_string()], None).unwrap_err();
        assert_eq!(err.code_str(), "MNP_CLI_INVALID_ARGUMENT");
    }
}
