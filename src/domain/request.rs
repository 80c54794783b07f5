//! Requests before and after manifest enrichment
//!
//! A [`RequestShell`] is what `getRequestSamples` returns: request metadata
//! plus lightweight sample stubs. An [`EnrichedRequest`] carries the same
//! metadata with the stubs replaced by full [`SampleManifest`]s, and is the
//! unit of output.

use crate::domain::ids::SampleId;
use crate::domain::manifest::SampleManifest;
use serde::{Deserialize, Serialize};

/// Request-level metadata shared by shells and enriched requests
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestMetadata {
    pub bic_analysis: bool,
    pub cmo_request: bool,
    pub data_access_emails: String,
    pub data_analyst_email: String,
    pub data_analyst_name: String,
    pub investigator_email: String,
    pub investigator_name: String,
    pub is_cmo_request: bool,
    pub lab_head_email: String,
    pub lab_head_name: String,
    pub library_type: String,
    pub other_contact_emails: String,
    pub pi_email: String,
    pub pooled_normals: Vec<String>,
    pub project_manager_name: String,
    pub qc_access_emails: String,
    pub recipe: String,
    pub request_id: String,
    pub strand: String,
}

/// Lightweight sample reference inside a request shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SampleStub {
    #[serde(rename = "igoSampleId")]
    pub igo_sample_id: SampleId,

    #[serde(rename = "igocomplete", default)]
    pub igo_complete: bool,

    #[serde(rename = "investigatorSampleId", default)]
    pub investigator_sample_id: String,
}

/// Request metadata plus unresolved sample stubs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestShell {
    #[serde(flatten)]
    pub metadata: RequestMetadata,

    #[serde(default)]
    pub samples: Vec<SampleStub>,
}

impl RequestShell {
    /// Splits the shell into its metadata and its stubs
    pub fn into_parts(self) -> (RequestMetadata, Vec<SampleStub>) {
        (self.metadata, self.samples)
    }

    /// Number of sample stubs
    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }
}

/// Request metadata with fully resolved sample manifests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRequest {
    #[serde(flatten)]
    pub metadata: RequestMetadata,

    pub samples: Vec<SampleManifest>,
}

impl EnrichedRequest {
    /// Starts an enriched request from shell metadata, with room for
    /// `capacity` manifests
    pub fn with_capacity(metadata: RequestMetadata, capacity: usize) -> Self {
        Self {
            metadata,
            samples: Vec::with_capacity(capacity),
        }
    }

    /// Appends the next manifest; callers append in stub order
    pub fn push_sample(&mut self, manifest: SampleManifest) {
        self.samples.push(manifest);
    }

    /// The request identifier as reported by LimsRest
    pub fn request_id(&self) -> &str {
        &self.metadata.request_id
    }
}

/// Fan-in result of an aggregation run
///
/// Requests are stored in completion order, which is not deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    requests: Vec<EnrichedRequest>,
}

impl ResultSet {
    /// Create an empty result set sized for `capacity` requests
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            requests: Vec::with_capacity(capacity),
        }
    }

    /// Add a completed request
    pub fn push(&mut self, request: EnrichedRequest) {
        self.requests.push(request);
    }

    /// Number of requests
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Iterate in completion order
    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedRequest> {
        self.requests.iter()
    }

    /// Total number of sample manifests across all requests
    pub fn sample_count(&self) -> usize {
        self.requests.iter().map(|r| r.samples.len()).sum()
    }

    /// Requests sorted by request id, for order-insensitive comparison
    pub fn into_sorted(mut self) -> Vec<EnrichedRequest> {
        self.requests.sort_by(|a, b| a.metadata.request_id.cmp(&b.metadata.request_id));
        self.requests
    }
}

impl IntoIterator for ResultSet {
    type Item = EnrichedRequest;
    type IntoIter = std::vec::IntoIter<EnrichedRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a EnrichedRequest;
    type IntoIter = std::slice::Iter<'a, EnrichedRequest>;

    fn into_iter(self) -> Self::IntoIter {
        self.requests.iter()
    }
}
