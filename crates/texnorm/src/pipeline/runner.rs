use std::sync::Arc;

use tracing::{info_span, warn};
use uuid::Uuid;

use crate::archive::{ArchiveBuilder, ArchiveExtractor, WorkingTree};
use crate::classify::TexClassifier;
use crate::rename::RenamePlanner;
use crate::store::RecordStore;
use crate::transaction::ReplacementTransaction;
use crate::worker::job::JobResult;

use super::config::PipelineConfig;
use super::context::PipelineContext;
use super::error::{PipelineError, PipelineWarning};
use super::progress::{JobPhase, ProgressEvent, ProgressReporter};

pub struct Pipeline {
    config: Arc<PipelineConfig>,
    extractor: ArchiveExtractor,
    classifier: TexClassifier,
    planner: RenamePlanner,
    builder: ArchiveBuilder,
    transaction: ReplacementTransaction,
    store: Arc<dyn RecordStore>,
}

impl Pipeline {
    pub fn new(config: Arc<PipelineConfig>, store: Arc<dyn RecordStore>) -> Self {
        Self {
            config,
            extractor: ArchiveExtractor::new(),
            classifier: TexClassifier::new(),
            planner: RenamePlanner::new(),
            builder: ArchiveBuilder::new(),
            transaction: ReplacementTransaction::new(),
            store,
        }
    }

    /// Run the full pipeline for a single archive.
    /// Returns a (JobResult, PipelineContext) pair.
    pub fn run(
        &self,
        mut ctx: PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> (JobResult, PipelineContext) {
        let _pipeline_span = info_span!("pipeline",
            job_id = %ctx.job.id,
            archive = %ctx.job.archive_path.display(),
        )
        .entered();

        let outcome = self.run_steps(&mut ctx, progress);

        // Ephemeral state is removed on every exit path; failures here
        // are warnings and never change the outcome
        self.cleanup(&mut ctx);

        match outcome {
            Ok(()) => {
                let backup_path = ctx
                    .backup_path
                    .clone()
                    .expect("backup path set in replace step");
                progress.report(ProgressEvent::Completed {
                    archive_path: ctx.job.archive_path.display().to_string(),
                    backup_path: backup_path.display().to_string(),
                    renamed: ctx.renamed,
                    already_normalized: ctx.already_normalized(),
                });
                let result = JobResult::success(
                    &ctx.job,
                    backup_path,
                    ctx.renamed,
                    ctx.already_normalized(),
                );
                (result, ctx)
            }
            Err(e) => {
                let err_msg = e.to_string();
                progress.report(ProgressEvent::Failed {
                    error: err_msg.clone(),
                });
                (JobResult::failure(&ctx.job, err_msg), ctx)
            }
        }
    }

    fn run_steps(
        &self,
        ctx: &mut PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> Result<(), PipelineError> {
        {
            let _step = info_span!("validate_input").entered();
            self.step_validate_input(ctx)?;
        }

        {
            let _step = info_span!("extract").entered();
            progress.report(ProgressEvent::Phase {
                phase: JobPhase::Extracting,
                message: "Extracting archive into working tree...".to_string(),
            });
            self.step_extract(ctx)?;
        }

        {
            let _step = info_span!("classify").entered();
            progress.report(ProgressEvent::Phase {
                phase: JobPhase::Classifying,
                message: "Scanning for .tex files...".to_string(),
            });
            self.step_classify(ctx)?;
        }

        if ctx.already_normalized() {
            progress.report(ProgressEvent::Phase {
                phase: JobPhase::AlreadyNormalized,
                message: "Files already carry canonical names; skipping renames".to_string(),
            });
        } else {
            let _step = info_span!("rename").entered();
            progress.report(ProgressEvent::Phase {
                phase: JobPhase::Renaming,
                message: "Applying canonical naming scheme...".to_string(),
            });
            self.step_rename(ctx)?;
        }

        {
            let _step = info_span!("package").entered();
            progress.report(ProgressEvent::Phase {
                phase: JobPhase::Packaging,
                message: "Repackaging working tree...".to_string(),
            });
            self.step_package(ctx)?;
        }

        {
            let _step = info_span!("replace").entered();
            self.step_replace(ctx, progress)?;
        }

        {
            let _step = info_span!("tag").entered();
            progress.report(ProgressEvent::Phase {
                phase: JobPhase::Tagging,
                message: "Tagging record...".to_string(),
            });
            self.step_tag(ctx);
        }

        Ok(())
    }

    fn step_validate_input(&self, ctx: &PipelineContext) -> Result<(), PipelineError> {
        let path = &ctx.job.archive_path;
        if !path.is_file() {
            return Err(PipelineError::InvalidInput(format!(
                "'{}' does not exist",
                path.display()
            )));
        }
        let is_zip = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("zip"));
        if !is_zip {
            return Err(PipelineError::InvalidInput(format!(
                "'{}' is not a .zip archive",
                path.display()
            )));
        }
        Ok(())
    }

    fn step_extract(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let tree = WorkingTree::create(&self.config.temp_directory, ctx.job.key())?;
        // Registered before extraction so a partially written tree is
        // still cleaned up
        ctx.working_tree = Some(tree);
        let root = ctx.working_tree.as_ref().expect("just set").root();
        self.extractor.extract(&ctx.job.archive_path, root)?;
        Ok(())
    }

    fn step_classify(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let root = ctx
            .working_tree
            .as_ref()
            .expect("extract step completed")
            .root();
        let classification = self.classifier.classify(root)?;
        if classification.is_empty() {
            return Err(PipelineError::NoTexFiles);
        }
        ctx.classification = Some(classification);
        Ok(())
    }

    fn step_rename(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let classification = ctx.classification.as_ref().expect("classify step completed");
        let mapping = self.planner.plan(classification);
        ctx.renamed = self.planner.apply(&mapping)?;
        ctx.mapping = Some(mapping);
        Ok(())
    }

    fn step_package(&self, ctx: &mut PipelineContext) -> Result<(), PipelineError> {
        let candidate = self
            .config
            .temp_directory
            .join(format!("{}.zip", Uuid::new_v4()));
        // Registered before building so a half-written candidate is
        // still cleaned up
        ctx.candidate_path = Some(candidate.clone());
        let root = ctx
            .working_tree
            .as_ref()
            .expect("extract step completed")
            .root();
        self.builder.build(root, &candidate)?;
        Ok(())
    }

    fn step_replace(
        &self,
        ctx: &mut PipelineContext,
        progress: &dyn ProgressReporter,
    ) -> Result<(), PipelineError> {
        let candidate = ctx
            .candidate_path
            .clone()
            .expect("package step completed");

        progress.report(ProgressEvent::Phase {
            phase: JobPhase::BackingUp,
            message: "Backing up original archive...".to_string(),
        });
        let backup = self.transaction.backup(&ctx.job.archive_path)?;

        progress.report(ProgressEvent::Phase {
            phase: JobPhase::Replacing,
            message: "Replacing original archive...".to_string(),
        });
        self.transaction
            .commit(&ctx.job.archive_path, &candidate, &backup)?;

        ctx.backup_path = Some(backup);
        Ok(())
    }

    // Tag failure never changes the reported outcome; the replaced
    // archive is the primary contract
    fn step_tag(&self, ctx: &mut PipelineContext) {
        let record = &ctx.job.record_id;
        let result = self
            .store
            .add_tag(record, &self.config.tag)
            .and_then(|_| self.store.save(record));

        if let Err(e) = result {
            warn!("Failed to tag record {}: {}", record, e);
            ctx.warnings.push(PipelineWarning::TagFailed {
                record: record.to_string(),
                error: e.to_string(),
            });
        }
    }

    fn cleanup(&self, ctx: &mut PipelineContext) {
        if let Some(tree) = ctx.working_tree.take() {
            if let Err(e) = tree.cleanup() {
                warn!(
                    "Failed to remove working tree {}: {}",
                    tree.root().display(),
                    e
                );
                ctx.warnings.push(PipelineWarning::CleanupFailed {
                    path: tree.root().to_path_buf(),
                    error: e.to_string(),
                });
            }
        }

        if let Some(candidate) = ctx.candidate_path.take() {
            if candidate.exists() {
                if let Err(e) = std::fs::remove_file(&candidate) {
                    warn!(
                        "Failed to remove candidate archive {}: {}",
                        candidate.display(),
                        e
                    );
                    ctx.warnings.push(PipelineWarning::CleanupFailed {
                        path: candidate,
                        error: e.to_string(),
                    });
                }
            }
        }
    }
}
