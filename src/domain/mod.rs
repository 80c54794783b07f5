//! Domain models and types for the checker.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed identifiers** ([`RequestId`], [`SampleId`])
//! - **The delivery cutoff** ([`Cutoff`])
//! - **LimsRest records** ([`Delivery`], [`RequestShell`], [`SampleManifest`])
//! - **Aggregation output** ([`EnrichedRequest`], [`ResultSet`])
//! - **Error types** ([`CheckerError`], [`LimsRestError`])
//! - **Result type alias** ([`Result`])
//!
//! Wire-facing records use the LimsRest `camelCase` field names so that an
//! [`EnrichedRequest`] serializes to the same JSON shape downstream tools
//! already consume.
//!
//! ```rust
//! use metadb_checker::domain::{RequestShell, EnrichedRequest};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let shell: RequestShell = serde_json::from_str(
//!     r#"{"requestId": "06000_AB", "samples": [{"igoSampleId": "06000_AB_1"}]}"#,
//! )?;
//! let (metadata, stubs) = shell.into_parts();
//! let enriched = EnrichedRequest::with_capacity(metadata, stubs.len());
//! assert_eq!(enriched.request_id(), "06000_AB");
//! # Ok(())
//! # }
//! ```

pub mod cutoff;
pub mod delivery;
pub mod errors;
pub mod ids;
pub mod manifest;
pub mod request;
pub mod result;

// Re-export commonly used types for convenience
pub use cutoff::Cutoff;
pub use delivery::Delivery;
pub use errors::{CheckerError, LimsRestError};
pub use ids::{RequestId, SampleId};
pub use manifest::{Library, QcReport, Run, SampleManifest};
pub use request::{EnrichedRequest, RequestMetadata, RequestShell, ResultSet, SampleStub};
pub use result::Result;
