//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for the checker using clap.

pub mod commands;

use crate::config::{load_config, load_from_env, CheckerConfig};
use crate::domain::Result;
use clap::Parser;

/// MetaDB Checker - aggregates LimsRest deliveries into enriched requests
#[derive(Parser, Debug)]
#[command(name = "metadb-checker")]
#[command(version, about, long_about = None)]
#[command(author = "MetaDB Checker Contributors")]
pub struct Cli {
    /// Path to an optional configuration file
    #[arg(short, long, env = "METADB_CONFIG")]
    pub config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub log_level: Option<String>,

    #[command(flatten)]
    pub fetch: commands::fetch::FetchArgs,
}

impl Cli {
    /// Build the effective configuration
    ///
    /// Precedence, lowest first: defaults, configuration file, `METADB_*`
    /// environment overrides, command-line flags. The result is not
    /// validated.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed,
    /// or an environment override is malformed.
    pub fn resolve_config(&self) -> Result<CheckerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)?,
            None => load_from_env()?,
        };

        if let Some(level) = &self.log_level {
            config.application.log_level = level.to_lowercase();
        }

        self.fetch.apply_overrides(&mut config);

        Ok(config)
    }
}
