use std::fs::File;
use std::path::Path;

use tracing::debug;

use crate::error::ExtractError;

/// Unpacks a zip archive into a working tree, preserving relative
/// paths. Directory entries are skipped; intermediate directories are
/// created lazily as files demand them.
pub struct ArchiveExtractor;

impl ArchiveExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extracts every file entry of `archive_path` under `dest_root`.
    /// Returns the number of files written. The source archive is
    /// never modified.
    pub fn extract(&self, archive_path: &Path, dest_root: &Path) -> Result<usize, ExtractError> {
        let file = File::open(archive_path).map_err(|e| ExtractError::Open {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

        let mut archive = zip::ZipArchive::new(file).map_err(|e| ExtractError::Format {
            path: archive_path.to_path_buf(),
            source: e,
        })?;

        let mut written = 0usize;
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|e| ExtractError::Entry {
                name: format!("#{}", index),
                source: e,
            })?;

            if entry.is_dir() {
                continue;
            }

            // enclosed_name rejects absolute paths and `..` components
            let relative = entry
                .enclosed_name()
                .ok_or_else(|| ExtractError::UnsafeEntryPath {
                    name: entry.name().to_string(),
                })?;

            let target = dest_root.join(relative);
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(|e| ExtractError::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }

            let mut out = File::create(&target).map_err(|e| ExtractError::WriteEntry {
                path: target.clone(),
                source: e,
            })?;
            std::io::copy(&mut entry, &mut out).map_err(|e| ExtractError::WriteEntry {
                path: target.clone(),
                source: e,
            })?;
            written += 1;
        }

        debug!("Extracted {} files from {}", written, archive_path.display());
        Ok(written)
    }
}

impl Default for ArchiveExtractor {
    fn default() -> Self {
        Self::new()
    }
}
