use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::ExtractError;

/// Ephemeral extraction directory, exclusively owned by one pipeline
/// run. Cleanup is explicit and best-effort; the pipeline downgrades a
/// failed cleanup to a warning.
#[derive(Debug)]
pub struct WorkingTree {
    root: PathBuf,
}

impl WorkingTree {
    /// Creates a fresh unique directory under `parent`. The `key` is
    /// appended for debuggability when inspecting leftover trees.
    pub fn create(parent: &Path, key: &str) -> Result<Self, ExtractError> {
        let root = parent.join(format!("{}-{}", Uuid::new_v4(), key));
        std::fs::create_dir_all(&root).map_err(|e| ExtractError::CreateDirectory {
            path: root.clone(),
            source: e,
        })?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cleanup(&self) -> std::io::Result<()> {
        std::fs::remove_dir_all(&self.root)
    }
}
