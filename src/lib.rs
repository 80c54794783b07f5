// MetaDB Checker - LimsRest delivery aggregation
// Copyright (c) 2025 MetaDB Checker Contributors
// Licensed under the MIT License

//! # MetaDB Checker - LimsRest delivery aggregation
//!
//! MetaDB Checker builds a consolidated view of recently delivered
//! sequencing requests from the IGO LimsRest service, for checking against
//! the MetaDB store.
//!
//! ## Overview
//!
//! For a delivery-date cutoff the checker:
//! - **Lists** the deliveries at or after the cutoff
//! - **Resolves** each delivery's request metadata and sample stubs
//! - **Enriches** every request with full sample manifests, one concurrent
//!   task per request
//! - **Emits** one JSON document per enriched request
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Aggregation orchestration and output
//! - [`adapters`] - LimsRest HTTP client
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use metadb_checker::adapters::limsrest::LimsRestClient;
//! use metadb_checker::config::load_config;
//! use metadb_checker::core::aggregate::Aggregator;
//! use metadb_checker::domain::Cutoff;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("metadb-checker.toml")?;
//!     let client = LimsRestClient::from_config(
//!         &config.limsrest,
//!         config.aggregation.manifest_selection,
//!     )?;
//!
//!     let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!     let aggregator = Aggregator::new(Arc::new(client), config.aggregation, shutdown_rx);
//!
//!     let results = aggregator.aggregate(Cutoff::parse_delivery_date("2021/02/25")?).await?;
//!     println!("Aggregated {} requests", results.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Every operation returns [`domain::Result`], whose error type is
//! [`domain::CheckerError`]. Any failure aborts the whole run; a partial
//! result set is never returned.
//!
//! ```rust,no_run
//! use metadb_checker::domain::CheckerError;
//!
//! fn example() -> Result<(), CheckerError> {
//!     let config = metadb_checker::config::load_config("metadb-checker.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! ## Logging
//!
//! Logging uses the `tracing` crate and always writes to stderr, leaving
//! stdout for result documents:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(requests = 12, "Aggregation completed");
//! warn!(sample_id = "06000_AB_1", candidates = 2, "Multiple manifests returned");
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
