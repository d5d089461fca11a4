use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::ScanConfig;
use crate::errors::ScanError;
use crate::fetch::{Fetch, HttpFetcher};
use crate::scan::findings::{Finding, FindingStore};
use crate::scan::partition::{partition, Job};
use crate::signatures::Signatures;

/// Outcome of one scan: sorted findings plus wall-clock duration.
#[derive(Debug)]
pub struct ScanReport {
    pub findings: Vec<Finding>,
    pub elapsed: Duration,
}

/// Drives a scan: partitions the workload, spawns one worker task per
/// partition and collects findings into a shared store.
///
/// Two fetchers are held because the redirect policy is fixed when the HTTP
/// client is built, not per request; `plugin.follow_redirects` picks one.
pub struct Scanner {
    signatures: Arc<Signatures>,
    fetcher: Arc<dyn Fetch>,
    no_redirect_fetcher: Arc<dyn Fetch>,
    workers: usize,
}

impl Scanner {
    pub fn new(
        signatures: Signatures,
        fetcher: Arc<dyn Fetch>,
        no_redirect_fetcher: Arc<dyn Fetch>,
        workers: usize,
    ) -> Self {
        Self {
            signatures: Arc::new(signatures),
            fetcher,
            no_redirect_fetcher,
            workers,
        }
    }

    /// Builds a scanner with reqwest-backed fetchers configured from `config`.
    pub fn from_config(config: &ScanConfig, signatures: Signatures) -> Self {
        let insecure = config.insecure || signatures.insecure;
        let timeout = Duration::from_secs(config.timeout_secs);
        Self::new(
            signatures,
            Arc::new(HttpFetcher::new(insecure, timeout)),
            Arc::new(HttpFetcher::no_redirect(insecure, timeout)),
            config.workers,
        )
    }

    /// Runs the scan to completion or until `cancel` fires.
    ///
    /// Only configuration problems surface as errors, before any worker
    /// starts. Fetch failures abandon their job, evaluation failures skip
    /// their check; neither aborts the scan. Cancellation is cooperative:
    /// workers stop before the next job or check, in-flight requests finish,
    /// and whatever was collected so far is returned without error.
    pub async fn run(
        &self,
        urls: &[String],
        cancel: CancellationToken,
    ) -> Result<ScanReport, ScanError> {
        if urls.is_empty() {
            return Err(ScanError::NoUrls);
        }
        if self.workers == 0 {
            return Err(ScanError::InvalidWorkerCount(self.workers));
        }

        let begin = Instant::now();
        let partitions = partition(urls, &self.signatures.plugins, self.workers);
        let total_jobs: usize = partitions.iter().map(|p| p.len()).sum();
        info!(
            urls = urls.len(),
            jobs = total_jobs,
            workers = partitions.len(),
            "starting scan"
        );

        let store = Arc::new(FindingStore::new());
        let mut workers = FuturesUnordered::new();
        for jobs in partitions {
            let signatures = Arc::clone(&self.signatures);
            let fetcher = Arc::clone(&self.fetcher);
            let no_redirect_fetcher = Arc::clone(&self.no_redirect_fetcher);
            let store = Arc::clone(&store);
            let cancel = cancel.clone();
            workers.push(tokio::spawn(async move {
                run_worker(jobs, signatures, fetcher, no_redirect_fetcher, store, cancel).await;
            }));
        }

        // Graceful drain: wait for every worker even when cancelled.
        while let Some(joined) = workers.next().await {
            if let Err(err) = joined {
                warn!(error = %err, "scan worker panicked");
            }
        }

        let findings = store.sorted();
        let elapsed = begin.elapsed();
        info!(findings = findings.len(), ?elapsed, "scan finished");
        Ok(ScanReport { findings, elapsed })
    }
}

async fn run_worker(
    jobs: Vec<Job>,
    signatures: Arc<Signatures>,
    fetcher: Arc<dyn Fetch>,
    no_redirect_fetcher: Arc<dyn Fetch>,
    store: Arc<FindingStore>,
    cancel: CancellationToken,
) {
    for job in jobs {
        if cancel.is_cancelled() {
            debug!("cancellation observed, worker stopping");
            return;
        }

        let plugin = &signatures.plugins[job.plugin];
        let fetcher = if plugin.follow_redirects {
            &fetcher
        } else {
            &no_redirect_fetcher
        };

        debug!(url = %job.full_url, "testing url");
        let resp = match fetcher.fetch(&job.full_url).await {
            Ok(resp) => resp,
            Err(err) => {
                // One failed fetch must not take the worker down.
                warn!(url = %job.full_url, error = %err, "fetch failed, skipping job");
                continue;
            }
        };

        for check in &plugin.checks {
            if cancel.is_cancelled() {
                return;
            }
            match check.evaluate(&resp) {
                Ok(true) => store.add(Finding {
                    url: job.full_url.clone(),
                    endpoint: job.endpoint.clone(),
                    check_name: check.name.clone(),
                    severity: check.severity,
                    remediation: check.remediation.clone(),
                }),
                Ok(false) => {}
                Err(err) => {
                    warn!(check = %check.name, error = %err, "invalid check, skipping");
                }
            }
        }
    }
}
