//! LimsRest endpoint construction

use crate::domain::{CheckerError, Cutoff, RequestId, Result, SampleId};
use url::Url;

/// Path prefix of every LimsRest API call
pub const API_PREFIX: &str = "LimsRest/api";

/// Builds endpoint URLs from the configured base host URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the base host URL
    ///
    /// Any path on the base is kept as a prefix; query and fragment are
    /// dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use metadb_checker::adapters::limsrest::Endpoints;
    /// use metadb_checker::domain::RequestId;
    ///
    /// let endpoints = Endpoints::new("https://igolims.example.org:8443").unwrap();
    /// let url = endpoints.request_samples(&RequestId::new("06000_AB").unwrap()).unwrap();
    /// assert_eq!(
    ///     url.as_str(),
    ///     "https://igolims.example.org:8443/LimsRest/api/getRequestSamples?request=06000_AB"
    /// );
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let mut base = Url::parse(base_url).map_err(|e| {
            CheckerError::Configuration(format!("Invalid LimsRest URL '{base_url}': {e}"))
        })?;

        if !matches!(base.scheme(), "http" | "https") {
            return Err(CheckerError::Configuration(format!(
                "LimsRest URL must be http or https, got '{base_url}'"
            )));
        }

        base.set_query(None);
        base.set_fragment(None);
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self { base })
    }

    /// Base URL with a trailing slash
    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `getDeliveries?timestamp=<epoch millis>`
    pub fn deliveries(&self, cutoff: Cutoff) -> Result<Url> {
        self.build("getDeliveries", "timestamp", &cutoff.as_millis().to_string())
    }

    /// `getRequestSamples?request=<request id>`
    pub fn request_samples(&self, request_id: &RequestId) -> Result<Url> {
        self.build("getRequestSamples", "request", request_id.as_str())
    }

    /// `getSampleManifest?igoSampleId=<sample id>`
    pub fn sample_manifest(&self, sample_id: &SampleId) -> Result<Url> {
        self.build("getSampleManifest", "igoSampleId", sample_id.as_str())
    }

    fn build(&self, operation: &str, param: &str, value: &str) -> Result<Url> {
        let mut url = self
            .base
            .join(&format!("{API_PREFIX}/{operation}"))
            .map_err(|e| {
                CheckerError::Configuration(format!("Cannot build {operation} endpoint: {e}"))
            })?;
        url.query_pairs_mut().append_pair(param, value);
        Ok(url)
    }
}
