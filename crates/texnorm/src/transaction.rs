use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::TransactionError;

/// Sibling path holding the pre-run bytes of `original`
/// (`archive.zip` -> `archive.zip.bak`).
pub fn backup_path(original: &Path) -> PathBuf {
    let mut name = original
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".bak");
    original.with_file_name(name)
}

/// Backs up the original archive, then swaps in the candidate.
///
/// The ordering is the whole point: the original is never overwritten
/// before a verified backup exists, so its prior content is
/// recoverable from the `.bak` sibling on any later fault.
pub struct ReplacementTransaction;

impl ReplacementTransaction {
    pub fn new() -> Self {
        Self
    }

    /// Copies `original` to its `.bak` sibling, overwriting any stale
    /// backup, and verifies the written length. The original is not
    /// modified. Returns the backup path.
    pub fn backup(&self, original: &Path) -> Result<PathBuf, TransactionError> {
        let backup = backup_path(original);

        let expected = std::fs::metadata(original)
            .map_err(|e| TransactionError::Backup {
                path: original.to_path_buf(),
                source: e,
            })?
            .len();

        std::fs::copy(original, &backup).map_err(|e| TransactionError::Backup {
            path: original.to_path_buf(),
            source: e,
        })?;

        let actual = std::fs::metadata(&backup)
            .map_err(|e| TransactionError::Backup {
                path: backup.clone(),
                source: e,
            })?
            .len();
        if actual != expected {
            return Err(TransactionError::BackupVerify {
                path: backup,
                expected,
                actual,
            });
        }

        Ok(backup)
    }

    /// Copies `candidate` over `original`. Must only be called after
    /// [`backup`](Self::backup) succeeded; the error carries the
    /// preserved backup path so callers can report it.
    pub fn commit(
        &self,
        original: &Path,
        candidate: &Path,
        backup: &Path,
    ) -> Result<(), TransactionError> {
        std::fs::copy(candidate, original).map_err(|e| TransactionError::Replace {
            path: original.to_path_buf(),
            backup: backup.to_path_buf(),
            source: e,
        })?;

        debug!(
            "Replaced {} (backup at {})",
            original.display(),
            backup.display()
        );
        Ok(())
    }

    /// Backup, then commit. Returns the backup path.
    pub fn replace(&self, original: &Path, candidate: &Path) -> Result<PathBuf, TransactionError> {
        let backup = self.backup(original)?;
        self.commit(original, candidate, &backup)?;
        Ok(backup)
    }
}

impl Default for ReplacementTransaction {
    fn default() -> Self {
        Self::new()
    }
}
