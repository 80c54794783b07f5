//! Fetch command implementation
//!
//! Runs one aggregation for a delivery-date cutoff and prints the enriched
//! requests as JSON lines on stdout.

use crate::adapters::limsrest::LimsRestClient;
use crate::config::{secret_string, CheckerConfig, ManifestSelection};
use crate::core::aggregate::Aggregator;
use crate::core::output::write_json_lines;
use crate::domain::{CheckerError, Cutoff};
use clap::Args;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::watch;

/// Successful run
pub const EXIT_SUCCESS: i32 = 0;
/// Missing or invalid configuration
pub const EXIT_CONFIG: i32 = 2;
/// LimsRest request, parse or manifest selection failure
pub const EXIT_REMOTE: i32 = 3;
/// Interrupted by SIGINT or SIGTERM
pub const EXIT_CANCELLED: i32 = 4;
/// Anything else
pub const EXIT_FATAL: i32 = 5;

/// Arguments for the fetch run
#[derive(Args, Debug)]
pub struct FetchArgs {
    /// LimsRest base URL, e.g. https://igolims.example.org:8443
    #[arg(long, value_name = "URL")]
    pub limsrest_url: Option<String>,

    /// LimsRest username
    #[arg(short, long)]
    pub username: Option<String>,

    /// LimsRest password
    #[arg(short, long)]
    pub password: Option<String>,

    /// Cutoff delivery date (YYYY/MM/DD)
    #[arg(short, long, value_name = "YYYY/MM/DD", env = "METADB_DELIVERY_DATE")]
    pub delivery_date: String,

    /// Maximum requests enriched at once (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub max_concurrent_requests: Option<usize>,

    /// Verify the LimsRest TLS certificate
    #[arg(long)]
    pub tls_verify: bool,

    /// Fail when a sample has more than one manifest
    #[arg(long)]
    pub strict_manifests: bool,
}

impl FetchArgs {
    /// Apply command-line overrides on top of file and environment settings
    pub fn apply_overrides(&self, config: &mut CheckerConfig) {
        if let Some(url) = &self.limsrest_url {
            config.limsrest.base_url = url.clone();
        }

        if let Some(username) = &self.username {
            config.limsrest.username = username.clone();
        }

        if let Some(password) = &self.password {
            config.limsrest.password = Some(secret_string(password.clone()));
        }

        if let Some(limit) = self.max_concurrent_requests {
            config.aggregation.max_concurrent_requests = limit;
        }

        if self.tls_verify {
            config.limsrest.tls_verify = true;
        }

        if self.strict_manifests {
            config.aggregation.manifest_selection = ManifestSelection::Strict;
        }
    }

    /// Execute the fetch
    ///
    /// Nothing is written to stdout unless the whole aggregation succeeds.
    pub async fn execute(
        &self,
        config: CheckerConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        self.execute_with_writer(config, shutdown_signal, std::io::stdout()).await
    }

    /// Execute the fetch, writing the JSON lines to `writer`
    pub async fn execute_with_writer<W: Write>(
        &self,
        config: CheckerConfig,
        shutdown_signal: watch::Receiver<bool>,
        writer: W,
    ) -> anyhow::Result<i32> {
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(EXIT_CONFIG);
        }

        let cutoff = match Cutoff::parse_delivery_date(&self.delivery_date) {
            Ok(cutoff) => cutoff,
            Err(e) => return Ok(report_failure(&e)),
        };

        let client =
            match LimsRestClient::from_config(&config.limsrest, config.aggregation.manifest_selection)
            {
                Ok(client) => client,
                Err(e) => return Ok(report_failure(&e)),
            };

        tracing::info!(
            limsrest_url = %client.base_url(),
            delivery_date = %self.delivery_date,
            cutoff = %cutoff,
            "Starting fetch"
        );

        let aggregator = Aggregator::new(Arc::new(client), config.aggregation, shutdown_signal);

        let results = match aggregator.aggregate(cutoff).await {
            Ok(results) => results,
            Err(e) => return Ok(report_failure(&e)),
        };

        match write_json_lines(&results, writer) {
            Ok(written) => {
                tracing::info!(lines = written, "Wrote enriched requests");
                Ok(EXIT_SUCCESS)
            }
            Err(e) => Ok(report_failure(&e)),
        }
    }
}

/// Exit code for a failed run
pub fn exit_code_for(error: &CheckerError) -> i32 {
    match error {
        CheckerError::Configuration(_) => EXIT_CONFIG,
        CheckerError::Cancelled(_) => EXIT_CANCELLED,
        e if e.is_remote() => EXIT_REMOTE,
        _ => EXIT_FATAL,
    }
}

fn report_failure(error: &CheckerError) -> i32 {
    let code = exit_code_for(error);
    tracing::error!(error = %error, exit_code = code, "Fetch failed");
    eprintln!("Error: {error}");
    code
}
