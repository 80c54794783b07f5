//! Aggregation summary and reporting

use crate::domain::Cutoff;
use std::time::Duration;

/// Counters for one aggregation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationSummary {
    /// Cutoff the run was started with
    pub cutoff: Cutoff,

    /// Deliveries reported by the service
    pub deliveries: usize,

    /// Sample stubs across all resolved shells
    pub sample_stubs: usize,

    /// Enriched requests produced
    pub requests: usize,

    /// Manifests attached across all requests
    pub samples: usize,

    /// Wall-clock duration of the run
    pub duration: Duration,
}

impl AggregationSummary {
    /// Create an empty summary for a run starting at `cutoff`
    pub fn new(cutoff: Cutoff) -> Self {
        Self {
            cutoff,
            deliveries: 0,
            sample_stubs: 0,
            requests: 0,
            samples: 0,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Average manifests per request, zero when there are no requests
    pub fn samples_per_request(&self) -> f64 {
        if self.requests == 0 {
            return 0.0;
        }
        self.samples as f64 / self.requests as f64
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            cutoff = %self.cutoff,
            deliveries = self.deliveries,
            requests = self.requests,
            samples = self.samples,
            duration_ms = self.duration.as_millis() as u64,
            samples_per_request = format!("{:.2}", self.samples_per_request()),
            "Aggregation completed"
        );

        if self.requests != self.deliveries || self.samples != self.sample_stubs {
            tracing::warn!(
                deliveries = self.deliveries,
                requests = self.requests,
                sample_stubs = self.sample_stubs,
                samples = self.samples,
                "Aggregation counts do not line up"
            );
        }
    }
}
