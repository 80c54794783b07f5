//! Core business logic for MetaDB Checker.
//!
//! # Modules
//!
//! - [`aggregate`] - Fan-out/fan-in aggregation over LimsRest
//! - [`output`] - JSON-lines rendering of the result set
//!
//! # Aggregation Workflow
//!
//! 1. **List**: Fetch deliveries at or after the cutoff
//! 2. **Resolve**: Fetch each delivery's request shell, one at a time
//! 3. **Enrich**: One task per request fetches its sample manifests
//! 4. **Collect**: Gather enriched requests in completion order
//! 5. **Emit**: Write one JSON document per request
//!
//! # Example
//!
//! ```rust,no_run
//! use metadb_checker::adapters::limsrest::LimsRestClient;
//! use metadb_checker::config::load_config;
//! use metadb_checker::core::aggregate::Aggregator;
//! use metadb_checker::core::output::write_json_lines;
//! use metadb_checker::domain::Cutoff;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("metadb-checker.toml")?;
//! let client = LimsRestClient::from_config(
//!     &config.limsrest,
//!     config.aggregation.manifest_selection,
//! )?;
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let aggregator = Aggregator::new(Arc::new(client), config.aggregation.clone(), shutdown_rx);
//!
//! let results = aggregator.aggregate(Cutoff::parse_delivery_date("2021/02/25")?).await?;
//! write_json_lines(&results, std::io::stdout().lock())?;
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod output;
