//! Bounded-concurrency batch driver.
//!
//! Resolves a selection of records into archive jobs, runs them in
//! fixed-size concurrent batches, and aggregates outcomes. Counters
//! are mutated only here; workers report a single result per job.

use std::sync::Arc;

use log::{debug, info, warn};

use crate::pipeline::PipelineConfig;
use crate::store::{RecordId, RecordStore};
use crate::worker::{Job, WorkerPool};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchStatus {
    AllSucceeded,
    PartialSuccess,
    TotalFailure,
}

#[derive(Debug, Clone)]
pub struct BatchFailure {
    pub record: RecordId,
    pub reason: String,
}

#[derive(Debug)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn status(&self) -> BatchStatus {
        if self.failed == 0 {
            BatchStatus::AllSucceeded
        } else if self.succeeded > 0 {
            BatchStatus::PartialSuccess
        } else {
            BatchStatus::TotalFailure
        }
    }
}

/// Coarse progress, reported after each batch settles.
#[derive(Debug, Clone, Copy)]
pub enum BatchEvent {
    Started { total: usize },
    Progress { processed: usize, total: usize },
}

pub trait BatchReporter: Send + Sync {
    fn report(&self, event: BatchEvent);
}

pub struct NoopBatchReporter;

impl BatchReporter for NoopBatchReporter {
    fn report(&self, _event: BatchEvent) {}
}

/// Reporter that forwards batch progress to the log.
pub struct LogBatchReporter;

impl BatchReporter for LogBatchReporter {
    fn report(&self, event: BatchEvent) {
        match event {
            BatchEvent::Started { total } => {
                info!("Processing {} records", total);
            }
            BatchEvent::Progress { processed, total } => {
                info!("Progress: {}/{}", processed, total);
            }
        }
    }
}

pub struct BatchCoordinator {
    config: Arc<PipelineConfig>,
    store: Arc<dyn RecordStore>,
    batch_size: usize,
}

impl BatchCoordinator {
    /// # Panics
    /// Panics if `batch_size` is 0.
    pub fn new(
        config: Arc<PipelineConfig>,
        store: Arc<dyn RecordStore>,
        batch_size: usize,
    ) -> Self {
        assert!(batch_size > 0, "batch_size must be > 0");
        Self {
            config,
            store,
            batch_size,
        }
    }

    /// Resolves one selected record into at most one job.
    ///
    /// A zip attachment whose title contains the archive marker is
    /// used directly; a container is searched for the first such
    /// child. Anything else resolves to an error reason.
    fn resolve(&self, record_id: &RecordId) -> Result<Job, String> {
        let record = self
            .store
            .get(record_id)
            .map_err(|e| format!("lookup failed: {}", e))?;

        if let Some(path) = record.matching_archive(&self.config.archive_marker) {
            return Ok(Job::new(record_id.clone(), path.to_path_buf()));
        }

        if record.is_container() {
            for child in self.store.children(record_id) {
                if let Some(path) = child.matching_archive(&self.config.archive_marker) {
                    return Ok(Job::new(child.id.clone(), path.to_path_buf()));
                }
            }
            return Err(format!(
                "no child attachment matching '{}'",
                self.config.archive_marker
            ));
        }

        Err(format!(
            "record is not a '{}' archive",
            self.config.archive_marker
        ))
    }

    /// Runs the full selection to completion and returns the
    /// aggregate summary. Batches are strictly sequential; jobs
    /// within a batch run concurrently on the worker pool.
    pub fn run(&self, selection: &[RecordId], reporter: &dyn BatchReporter) -> BatchSummary {
        let total = selection.len();
        reporter.report(BatchEvent::Started { total });

        let mut summary = BatchSummary {
            total,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
        };

        let mut jobs = Vec::new();
        for record_id in selection {
            match self.resolve(record_id) {
                Ok(job) => jobs.push(job),
                Err(reason) => {
                    warn!("Skipping record {}: {}", record_id, reason);
                    summary.failed += 1;
                    summary.failures.push(BatchFailure {
                        record: record_id.clone(),
                        reason,
                    });
                }
            }
        }

        if jobs.is_empty() {
            reporter.report(BatchEvent::Progress {
                processed: summary.failed,
                total,
            });
            return summary;
        }

        let pool = WorkerPool::new(
            Arc::clone(&self.config),
            Arc::clone(&self.store),
            self.batch_size.min(jobs.len()),
        );

        // Unresolved records are already settled
        let mut processed = summary.failed;

        for batch in jobs.chunks(self.batch_size) {
            debug!("Dispatching batch of {} jobs", batch.len());
            let mut in_flight = 0usize;
            for job in batch {
                match pool.submit(job.clone()) {
                    Ok(()) => in_flight += 1,
                    Err(e) => {
                        summary.failed += 1;
                        processed += 1;
                        summary.failures.push(BatchFailure {
                            record: job.record_id.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }

            // Batch k+1 never starts before batch k fully settles
            for _ in 0..in_flight {
                match pool.recv_result() {
                    Some(result) => {
                        processed += 1;
                        if result.success {
                            summary.succeeded += 1;
                        } else {
                            summary.failed += 1;
                            summary.failures.push(BatchFailure {
                                record: result.record_id.clone(),
                                reason: result
                                    .error
                                    .unwrap_or_else(|| "unknown failure".to_string()),
                            });
                        }
                    }
                    None => {
                        processed += 1;
                        summary.failed += 1;
                        summary.failures.push(BatchFailure {
                            record: RecordId::new("unknown"),
                            reason: "worker pool closed unexpectedly".to_string(),
                        });
                    }
                }
            }

            reporter.report(BatchEvent::Progress { processed, total });
        }

        pool.shutdown();
        pool.wait();

        info!(
            "Batch finished: {} succeeded, {} failed of {}",
            summary.succeeded, summary.failed, summary.total
        );
        summary
    }
}
