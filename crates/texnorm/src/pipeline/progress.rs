use log::{debug, error, info};

/// Per-item processing phase. `Failed` and `Done` are terminal; a
/// retry re-enters at `Pending` and repeats extraction from scratch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    Pending,
    Extracting,
    Classifying,
    AlreadyNormalized,
    Renaming,
    Packaging,
    BackingUp,
    Replacing,
    Tagging,
    Done,
    Failed,
}

/// Events emitted by the pipeline during processing.
pub enum ProgressEvent {
    Phase {
        phase: JobPhase,
        message: String,
    },
    Completed {
        archive_path: String,
        backup_path: String,
        renamed: usize,
        already_normalized: bool,
    },
    Failed {
        error: String,
    },
}

pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// No-op reporter for unit tests.
pub struct NoopProgress;

impl ProgressReporter for NoopProgress {
    fn report(&self, _event: ProgressEvent) {}
}

/// Reporter that forwards pipeline events to the log.
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::Phase { phase, message } => {
                debug!("[{:?}] {}", phase, message);
            }
            ProgressEvent::Completed {
                archive_path,
                backup_path,
                renamed,
                already_normalized,
            } => {
                if already_normalized {
                    info!(
                        "Repackaged already-normalized {} (backup at {})",
                        archive_path, backup_path
                    );
                } else {
                    info!(
                        "Normalized {} ({} files renamed, backup at {})",
                        archive_path, renamed, backup_path
                    );
                }
            }
            ProgressEvent::Failed { error } => {
                error!("Pipeline failed: {}", error);
            }
        }
    }
}
