//! LimsRest client
//!
//! Implements the delivery lister, request shell resolver and sample
//! manifest enricher on top of a [`Transport`]. Every operation is exactly
//! one GET followed by a JSON decode.

use super::endpoints::Endpoints;
use super::source::LimsSource;
use super::transport::{HttpTransport, Transport};
use crate::config::{LimsRestConfig, ManifestSelection};
use crate::domain::{
    CheckerError, Cutoff, Delivery, RequestId, RequestShell, Result, SampleId, SampleManifest,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Client for the LimsRest API
pub struct LimsRestClient {
    transport: Arc<dyn Transport>,
    endpoints: Endpoints,
    selection: ManifestSelection,
}

impl LimsRestClient {
    /// Create a client over an existing transport
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoints: Endpoints,
        selection: ManifestSelection,
    ) -> Self {
        Self {
            transport,
            endpoints,
            selection,
        }
    }

    /// Create an HTTP client from configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the base URL is invalid or the HTTP
    /// transport cannot be built.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use metadb_checker::adapters::limsrest::LimsRestClient;
    /// use metadb_checker::config::{LimsRestConfig, ManifestSelection};
    ///
    /// # fn example(config: &LimsRestConfig) -> metadb_checker::domain::Result<()> {
    /// let client = LimsRestClient::from_config(config, ManifestSelection::First)?;
    /// println!("Using {}", client.base_url());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_config(config: &LimsRestConfig, selection: ManifestSelection) -> Result<Self> {
        let endpoints = Endpoints::new(&config.base_url)?;
        let transport = HttpTransport::from_config(config)?;
        Ok(Self::new(Arc::new(transport), endpoints, selection))
    }

    /// Base URL requests are built from
    pub fn base_url(&self) -> &str {
        self.endpoints.base().as_str()
    }

    /// Manifest selection policy in use
    pub fn selection(&self) -> ManifestSelection {
        self.selection
    }

    /// Fetch the deliveries for a cutoff
    pub async fn list_deliveries(&self, cutoff: Cutoff) -> Result<Vec<Delivery>> {
        let url = self.endpoints.deliveries(cutoff)?;
        let body = self.transport.fetch(&url).await?;

        // A `null` body means no deliveries
        let deliveries = decode::<Option<Vec<Delivery>>>(&url, &body)?.unwrap_or_default();

        tracing::info!(
            cutoff = %cutoff,
            count = deliveries.len(),
            "Fetched deliveries from LimsRest"
        );

        Ok(deliveries)
    }

    /// Fetch a request's metadata and sample stubs
    pub async fn resolve_shell(&self, request_id: &RequestId) -> Result<RequestShell> {
        let url = self.endpoints.request_samples(request_id)?;
        let body = self.transport.fetch(&url).await?;
        let shell: RequestShell = decode(&url, &body)?;

        if shell.metadata.request_id != request_id.as_str() {
            tracing::warn!(
                request_id = %request_id,
                returned_request_id = %shell.metadata.request_id,
                "LimsRest returned a shell for a different request id"
            );
        }

        tracing::debug!(
            request_id = %request_id,
            samples = shell.sample_count(),
            "Resolved request shell"
        );

        Ok(shell)
    }

    /// Fetch the manifest for one sample
    pub async fn fetch_manifest(&self, sample_id: &SampleId) -> Result<SampleManifest> {
        let url = self.endpoints.sample_manifest(sample_id)?;
        let body = self.transport.fetch(&url).await?;
        let candidates = decode::<Option<Vec<SampleManifest>>>(&url, &body)?.unwrap_or_default();

        let manifest = select_manifest(sample_id, candidates, self.selection)?;

        tracing::debug!(
            sample_id = %sample_id,
            libraries = manifest.libraries.len(),
            runs = manifest.run_count(),
            "Fetched sample manifest"
        );

        Ok(manifest)
    }
}

#[async_trait]
impl LimsSource for LimsRestClient {
    async fn list_deliveries(&self, cutoff: Cutoff) -> Result<Vec<Delivery>> {
        LimsRestClient::list_deliveries(self, cutoff).await
    }

    async fn resolve_shell(&self, request_id: &RequestId) -> Result<RequestShell> {
        LimsRestClient::resolve_shell(self, request_id).await
    }

    async fn fetch_manifest(&self, sample_id: &SampleId) -> Result<SampleManifest> {
        LimsRestClient::fetch_manifest(self, sample_id).await
    }
}

/// Pick one manifest out of the candidates the service returned
///
/// # Errors
///
/// `EmptyResult` for zero candidates; `AmbiguousResult` for several under
/// [`ManifestSelection::Strict`].
pub fn select_manifest(
    sample_id: &SampleId,
    candidates: Vec<SampleManifest>,
    selection: ManifestSelection,
) -> Result<SampleManifest> {
    let count = candidates.len();

    if count > 1 {
        match selection {
            ManifestSelection::Strict => {
                return Err(CheckerError::AmbiguousResult {
                    sample_id: sample_id.to_string(),
                    candidates: count,
                });
            }
            ManifestSelection::First => {
                tracing::warn!(
                    sample_id = %sample_id,
                    candidates = count,
                    "Multiple manifests returned for sample, keeping the first"
                );
            }
        }
    }

    candidates
        .into_iter()
        .next()
        .ok_or_else(|| CheckerError::EmptyResult {
            sample_id: sample_id.to_string(),
        })
}

/// Decode a JSON body, treating `null` object fields as absent
fn decode<T: DeserializeOwned>(endpoint: &Url, body: &[u8]) -> Result<T> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| CheckerError::parse(endpoint.as_str(), e))?;
    T::deserialize(strip_null_fields(value)).map_err(|e| CheckerError::parse(endpoint.as_str(), e))
}

fn strip_null_fields(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k, strip_null_fields(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(strip_null_fields).collect()),
        other => other,
    }
}
