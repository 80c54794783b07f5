//! Aggregation orchestration
//!
//! This module provides the fan-out/fan-in pipeline:
//! - Sequential delivery listing and shell resolution
//! - Concurrent per-request manifest enrichment
//! - Summary and reporting

pub mod coordinator;
pub mod summary;

pub use coordinator::Aggregator;
pub use summary::AggregationSummary;
