use std::fs::File;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;

use crate::error::PackageError;

/// Repackages a working tree into a fresh zip archive with default
/// compression. Entry order is deterministic (lexicographic at each
/// level) so repeated runs over identical trees produce structurally
/// comparable archives.
pub struct ArchiveBuilder;

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Writes every file under `tree_root` into a new archive at
    /// `out_path`, keyed by its relative path. Returns the entry
    /// count.
    pub fn build(&self, tree_root: &Path, out_path: &Path) -> Result<usize, PackageError> {
        let file = File::create(out_path).map_err(|e| PackageError::Create {
            path: out_path.to_path_buf(),
            source: e,
        })?;
        let mut writer = zip::ZipWriter::new(file);
        let options = SimpleFileOptions::default();

        let mut count = 0usize;
        // follow_links(false): a symlink cycle surfaces as a scan error
        // instead of looping
        for entry in WalkDir::new(tree_root)
            .min_depth(1)
            .follow_links(false)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| PackageError::Scan {
                path: tree_root.to_path_buf(),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(tree_root)
                .expect("walk stays under tree root");
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            writer
                .start_file(name.clone(), options)
                .map_err(|e| PackageError::AddEntry {
                    name: name.clone(),
                    source: e,
                })?;
            let mut src = File::open(entry.path()).map_err(|e| PackageError::WriteEntry {
                name: name.clone(),
                source: e,
            })?;
            std::io::copy(&mut src, &mut writer).map_err(|e| PackageError::WriteEntry {
                name: name.clone(),
                source: e,
            })?;
            count += 1;
        }

        writer.finish().map_err(PackageError::Finish)?;
        debug!("Packaged {} files into {}", count, out_path.display());
        Ok(count)
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
