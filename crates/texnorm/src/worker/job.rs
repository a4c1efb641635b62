use std::path::PathBuf;

use crate::store::RecordId;

/// One archive-processing work item. The record id is the handle the
/// tag is appended to after a successful replacement.
#[derive(Debug, Clone)]
pub struct Job {
    pub id: String,
    pub record_id: RecordId,
    pub archive_path: PathBuf,
}

impl Job {
    pub fn new(record_id: RecordId, archive_path: PathBuf) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            record_id,
            archive_path,
        }
    }

    /// Short key used to label ephemeral state on disk.
    pub fn key(&self) -> &str {
        &self.id[..8]
    }
}

#[derive(Debug)]
pub struct JobResult {
    pub job_id: String,
    pub record_id: RecordId,
    pub archive_path: PathBuf,
    pub success: bool,
    pub backup_path: Option<PathBuf>,
    pub renamed: usize,
    pub already_normalized: bool,
    pub error: Option<String>,
}

impl JobResult {
    pub fn success(
        job: &Job,
        backup_path: PathBuf,
        renamed: usize,
        already_normalized: bool,
    ) -> Self {
        Self {
            job_id: job.id.clone(),
            record_id: job.record_id.clone(),
            archive_path: job.archive_path.clone(),
            success: true,
            backup_path: Some(backup_path),
            renamed,
            already_normalized,
            error: None,
        }
    }

    pub fn failure(job: &Job, error: String) -> Self {
        Self {
            job_id: job.id.clone(),
            record_id: job.record_id.clone(),
            archive_path: job.archive_path.clone(),
            success: false,
            backup_path: None,
            renamed: 0,
            already_normalized: false,
            error: Some(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_ids_are_unique() {
        let a = Job::new(RecordId::new("r1"), PathBuf::from("/data/a.zip"));
        let b = Job::new(RecordId::new("r1"), PathBuf::from("/data/a.zip"));
        assert_ne!(a.id, b.id);
        assert_eq!(a.key().len(), 8);
    }

    #[test]
    fn test_job_result_success() {
        let job = Job::new(RecordId::new("r1"), PathBuf::from("/data/a.zip"));
        let result = JobResult::success(&job, PathBuf::from("/data/a.zip.bak"), 3, false);

        assert!(result.success);
        assert_eq!(result.job_id, job.id);
        assert_eq!(result.renamed, 3);
        assert!(result.error.is_none());
    }

    #[test]
    fn test_job_result_failure() {
        let job = Job::new(RecordId::new("r1"), PathBuf::from("/data/a.zip"));
        let result = JobResult::failure(&job, "boom".to_string());

        assert!(!result.success);
        assert!(result.backup_path.is_none());
        assert_eq!(result.error, Some("boom".to_string()));
    }
}
