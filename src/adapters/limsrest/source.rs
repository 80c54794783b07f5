//! LimsRest source trait
//!
//! `LimsSource` is the seam between the aggregation pipeline and the
//! service. The production implementation is [`LimsRestClient`]; tests drive
//! the orchestrator with in-memory sources.
//!
//! [`LimsRestClient`]: super::LimsRestClient

use crate::domain::{Cutoff, Delivery, RequestId, RequestShell, Result, SampleId, SampleManifest};
use async_trait::async_trait;

/// The three LimsRest lookups the pipeline needs
///
/// # Example
///
/// ```no_run
/// use metadb_checker::adapters::limsrest::LimsSource;
/// use metadb_checker::domain::Cutoff;
///
/// # async fn example(source: &dyn LimsSource) -> metadb_checker::domain::Result<()> {
/// let cutoff = Cutoff::parse_delivery_date("2021/02/25")?;
/// for delivery in source.list_deliveries(cutoff).await? {
///     let shell = source.resolve_shell(&delivery.request).await?;
///     println!("{} has {} samples", delivery.request, shell.sample_count());
/// }
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait LimsSource: Send + Sync {
    /// Deliveries at or after the cutoff, as reported by the service
    ///
    /// # Errors
    ///
    /// Request errors from the transport, parse errors if the body is not
    /// an array of deliveries.
    async fn list_deliveries(&self, cutoff: Cutoff) -> Result<Vec<Delivery>>;

    /// Request metadata plus lightweight sample stubs
    ///
    /// # Errors
    ///
    /// Request errors from the transport, parse errors if the body is not a
    /// single request object.
    async fn resolve_shell(&self, request_id: &RequestId) -> Result<RequestShell>;

    /// The selected manifest for one sample
    ///
    /// # Errors
    ///
    /// Request and parse errors as above, `EmptyResult` when the service
    /// returns no candidates, `AmbiguousResult` under strict selection when
    /// it returns several.
    async fn fetch_manifest(&self, sample_id: &SampleId) -> Result<SampleManifest>;
}
