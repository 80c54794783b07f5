//! Aggregation coordinator - fan-out/fan-in over request shells
//!
//! The pipeline has two phases. Discovery is sequential: list deliveries,
//! then resolve one shell per delivery, in delivery order. Enrichment is
//! concurrent: one task per shell, each fetching its manifests one after the
//! other in stub order. Results are collected in completion order.
//!
//! The first failure anywhere aborts every outstanding task and is returned;
//! a partial result set is never produced.

use crate::adapters::limsrest::LimsSource;
use crate::config::AggregationConfig;
use crate::core::aggregate::summary::AggregationSummary;
use crate::domain::{
    CheckerError, Cutoff, Delivery, EnrichedRequest, RequestShell, Result, ResultSet,
};
use crate::{log_error_with_context, log_stage_complete};
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinSet;

/// Aggregation orchestrator
pub struct Aggregator {
    source: Arc<dyn LimsSource>,
    config: AggregationConfig,
    shutdown_signal: watch::Receiver<bool>,
}

impl Aggregator {
    /// Create a new aggregator
    ///
    /// `shutdown_signal` flips to `true` when the run should stop; it is
    /// checked before every fetch and raced against every in-flight fetch.
    pub fn new(
        source: Arc<dyn LimsSource>,
        config: AggregationConfig,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            source,
            config,
            shutdown_signal,
        }
    }

    /// Build one fully-populated request per delivery at or after `cutoff`
    ///
    /// # Errors
    ///
    /// Returns the first error raised by any fetch, parse or manifest
    /// selection, or `Cancelled` if the shutdown signal fires.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use metadb_checker::adapters::limsrest::LimsRestClient;
    /// use metadb_checker::config::{AggregationConfig, LimsRestConfig, ManifestSelection};
    /// use metadb_checker::core::aggregate::Aggregator;
    /// use metadb_checker::domain::Cutoff;
    /// use std::sync::Arc;
    ///
    /// # async fn example(config: LimsRestConfig) -> metadb_checker::domain::Result<()> {
    /// let client = LimsRestClient::from_config(&config, ManifestSelection::First)?;
    /// let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
    /// let aggregator = Aggregator::new(Arc::new(client), AggregationConfig::default(), shutdown_rx);
    ///
    /// let results = aggregator.aggregate(Cutoff::parse_delivery_date("2021/02/25")?).await?;
    /// println!("{} requests", results.len());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn aggregate(&self, cutoff: Cutoff) -> Result<ResultSet> {
        self.aggregate_with_summary(cutoff)
            .await
            .map(|(results, _)| results)
    }

    /// Same as [`aggregate`](Self::aggregate), also returning run counters
    pub async fn aggregate_with_summary(
        &self,
        cutoff: Cutoff,
    ) -> Result<(ResultSet, AggregationSummary)> {
        let start_time = Instant::now();
        let mut summary = AggregationSummary::new(cutoff);

        tracing::info!(
            cutoff = %cutoff,
            max_concurrent_requests = self.config.max_concurrent_requests,
            manifest_selection = %self.config.manifest_selection,
            "Starting aggregation"
        );

        self.ensure_running()?;
        let stage_start = Instant::now();
        let deliveries = self
            .until_shutdown("listing deliveries", self.source.list_deliveries(cutoff))
            .await?;
        summary.deliveries = deliveries.len();
        log_stage_complete!("deliveries", deliveries.len(), stage_start.elapsed());

        let stage_start = Instant::now();
        let shells = self.resolve_shells(&deliveries).await?;
        summary.sample_stubs = shells.iter().map(RequestShell::sample_count).sum();
        log_stage_complete!("shells", shells.len(), stage_start.elapsed());

        let stage_start = Instant::now();
        let results = self.enrich_all(shells).await?;
        summary.requests = results.len();
        summary.samples = results.sample_count();
        log_stage_complete!("enrichment", results.len(), stage_start.elapsed());

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();

        Ok((results, summary))
    }

    /// Resolve one shell per delivery, sequentially and in delivery order
    async fn resolve_shells(&self, deliveries: &[Delivery]) -> Result<Vec<RequestShell>> {
        let mut shells = Vec::with_capacity(deliveries.len());

        for delivery in deliveries {
            self.ensure_running()?;
            let shell = self
                .until_shutdown("resolving shells", self.source.resolve_shell(&delivery.request))
                .await
                .inspect_err(|e| {
                    log_error_with_context!(e, format!("resolving request {}", delivery.request));
                })?;
            shells.push(shell);
        }

        Ok(shells)
    }

    /// Spawn one enrichment task per shell and collect all of them
    async fn enrich_all(&self, shells: Vec<RequestShell>) -> Result<ResultSet> {
        let expected = shells.len();
        let permits = self
            .config
            .concurrency_limit()
            .map(|limit| Arc::new(Semaphore::new(limit)));

        let mut tasks = JoinSet::new();
        for shell in shells {
            tasks.spawn(enrich_request(
                Arc::clone(&self.source),
                shell,
                self.shutdown_signal.clone(),
                permits.clone(),
            ));
        }

        tracing::debug!(tasks = expected, "Spawned enrichment tasks");

        let mut results = ResultSet::with_capacity(expected);
        let mut shutdown_signal = self.shutdown_signal.clone();

        while results.len() < expected {
            let joined = tokio::select! {
                joined = tasks.join_next() => joined,
                _ = shutdown_requested(&mut shutdown_signal) => {
                    tracing::warn!(
                        completed = results.len(),
                        outstanding = tasks.len(),
                        "Shutdown requested, aborting enrichment tasks"
                    );
                    tasks.shutdown().await;
                    return Err(CheckerError::Cancelled(
                        "shutdown requested during enrichment".to_string(),
                    ));
                }
            };

            let outcome = match joined {
                Some(Ok(outcome)) => outcome,
                Some(Err(join_error)) => Err(CheckerError::from(join_error)),
                None => Err(CheckerError::Task(format!(
                    "enrichment finished with {} of {} requests",
                    results.len(),
                    expected
                ))),
            };

            match outcome {
                Ok(request) => {
                    tracing::debug!(
                        request_id = %request.request_id(),
                        samples = request.samples.len(),
                        completed = results.len() + 1,
                        total = expected,
                        "Request enriched"
                    );
                    results.push(request);
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        outstanding = tasks.len(),
                        "Enrichment failed, aborting outstanding tasks"
                    );
                    tasks.shutdown().await;
                    return Err(e);
                }
            }
        }

        Ok(results)
    }

    /// Await a discovery fetch, giving up as soon as shutdown is requested
    async fn until_shutdown<T>(
        &self,
        stage: &str,
        fetch: impl Future<Output = Result<T>>,
    ) -> Result<T> {
        let mut shutdown_signal = self.shutdown_signal.clone();
        tokio::select! {
            result = fetch => result,
            _ = shutdown_requested(&mut shutdown_signal) => {
                tracing::warn!(stage, "Shutdown requested, abandoning in-flight fetch");
                Err(CheckerError::Cancelled(format!("shutdown requested while {stage}")))
            }
        }
    }

    fn ensure_running(&self) -> Result<()> {
        ensure_running(&self.shutdown_signal)
    }
}

/// Fetch every manifest of one shell, in stub order
async fn enrich_request(
    source: Arc<dyn LimsSource>,
    shell: RequestShell,
    shutdown_signal: watch::Receiver<bool>,
    permits: Option<Arc<Semaphore>>,
) -> Result<EnrichedRequest> {
    let _permit = match permits {
        Some(semaphore) => Some(semaphore.acquire_owned().await.map_err(|_| {
            CheckerError::Cancelled("enrichment permits closed".to_string())
        })?),
        None => None,
    };

    let (metadata, stubs) = shell.into_parts();
    let request_id = metadata.request_id.clone();
    let mut enriched = EnrichedRequest::with_capacity(metadata, stubs.len());

    for stub in &stubs {
        ensure_running(&shutdown_signal)?;
        let manifest = source
            .fetch_manifest(&stub.igo_sample_id)
            .await
            .inspect_err(|e| {
                log_error_with_context!(
                    e,
                    format!(
                        "fetching manifest {} for request {}",
                        stub.igo_sample_id, request_id
                    )
                );
            })?;
        enriched.push_sample(manifest);
    }

    Ok(enriched)
}

fn ensure_running(shutdown_signal: &watch::Receiver<bool>) -> Result<()> {
    if *shutdown_signal.borrow() {
        return Err(CheckerError::Cancelled("shutdown requested".to_string()));
    }
    Ok(())
}

/// Resolves once the shutdown flag is set; never resolves if the sender is
/// gone without having set it
async fn shutdown_requested(shutdown_signal: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown_signal.borrow_and_update() {
            return;
        }
        if shutdown_signal.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
