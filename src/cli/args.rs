//! CLI argument definitions using clap
//!
//! Commands:
//! - marinenp serve --config <path>
//! - marinenp explain --condition <field:op:value>... --keyword <text>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// marinenp - marine natural products catalog service
#[derive(Parser, Debug)]
#[command(name = "marinenp")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Serve the catalog HTTP API
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./marinenp.json")]
        config: PathBuf,
    },

    /// Compile filter conditions and print the plan without touching storage
    Explain {
        /// Condition as FIELD:OPERATOR:VALUE (repeatable)
        #[arg(long = "condition", value_name = "FIELD:OP:VALUE")]
        conditions: Vec<String>,

        /// Free-text keyword matched across molecule text columns
        #[arg(long)]
        keyword: Option<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_default_config() {
        let cli = Cli::try_parse_from(["marinenp", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("./marinenp.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_explain_repeated_conditions() {
        let cli = Cli::try_parse_from([
            "marinenp",
            "explain",
            "--condition",
            "properties.alogp:gt:1.5",
            "--condition",
            "organism:contains:sponge",
            "--keyword",
            "manzamine",
        ])
        .unwrap();

        match cli.command {
            Command::Explain {
                conditions,
                keyword,
            } => {
                assert_eq!(conditions.len(), 2);
                assert_eq!(keyword.as_deref(), Some("manzamine"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }
}
