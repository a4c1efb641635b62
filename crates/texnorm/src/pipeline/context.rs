use std::path::PathBuf;

use crate::archive::WorkingTree;
use crate::classify::ClassificationResult;
use crate::rename::RenameMapping;
use crate::worker::job::Job;

use super::error::PipelineWarning;

pub struct PipelineContext {
    // Input
    pub job: Job,

    // Extracting result, guaranteed Some after step_extract
    pub working_tree: Option<WorkingTree>,

    // Classifying result, guaranteed Some after step_classify
    pub classification: Option<ClassificationResult>,

    // Renaming results
    pub mapping: Option<RenameMapping>,
    pub renamed: usize,

    // Packaging result: the candidate archive awaiting replacement
    pub candidate_path: Option<PathBuf>,

    // Replacing result
    pub backup_path: Option<PathBuf>,

    // Non-fatal warnings
    pub warnings: Vec<PipelineWarning>,
}

impl PipelineContext {
    pub fn new(job: Job) -> Self {
        Self {
            job,
            working_tree: None,
            classification: None,
            mapping: None,
            renamed: 0,
            candidate_path: None,
            backup_path: None,
            warnings: Vec::new(),
        }
    }

    pub fn already_normalized(&self) -> bool {
        self.classification
            .as_ref()
            .is_some_and(|c| c.already_normalized)
    }
}
