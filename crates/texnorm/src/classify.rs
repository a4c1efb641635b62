use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::ExtractError;
use crate::scheme;

/// A normalizable file discovered in a working tree.
#[derive(Debug, Clone)]
pub struct FileEntry {
    /// Absolute path inside the working tree.
    pub path: PathBuf,
    /// Leaf file name, used for sorting and idempotence checks.
    pub leaf: String,
}

/// Outcome of classifying a working tree.
///
/// `entries` is sorted by leaf name (plain lexicographic comparison;
/// entries from different directories with identical leaf names stay
/// distinct and are ordered only by that comparison).
#[derive(Debug)]
pub struct ClassificationResult {
    pub entries: Vec<FileEntry>,
    /// Exactly one `Main_En.tex` exists and every other entry already
    /// carries a supplement name.
    pub already_normalized: bool,
    /// Exactly one of the two normalization conditions holds. Logged
    /// as a warning only; the planner still produces a full mapping.
    pub partially_normalized: bool,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Walks a working tree and classifies its `.tex` files against the
/// canonical naming scheme.
pub struct TexClassifier;

impl TexClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, tree_root: &Path) -> Result<ClassificationResult, ExtractError> {
        let mut entries = Vec::new();

        // follow_links(false): symlink cycles surface as scan errors
        for entry in WalkDir::new(tree_root).min_depth(1).follow_links(false) {
            let entry = entry.map_err(|e| ExtractError::Scan {
                path: tree_root.to_path_buf(),
                source: e,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }

            let leaf = entry.file_name().to_string_lossy().to_string();
            if scheme::is_normalizable(&leaf) {
                entries.push(FileEntry {
                    path: entry.into_path(),
                    leaf,
                });
            }
        }

        entries.sort_by(|a, b| a.leaf.cmp(&b.leaf));
        debug!("Found {} .tex files under {}", entries.len(), tree_root.display());

        let (already_normalized, partially_normalized) = if entries.is_empty() {
            (false, false)
        } else {
            let single_main = entries
                .iter()
                .filter(|e| e.leaf == scheme::MAIN_NAME)
                .count()
                == 1;
            let supplements_conform = entries
                .iter()
                .filter(|e| e.leaf != scheme::MAIN_NAME)
                .all(|e| scheme::is_supplement_name(&e.leaf));
            (single_main && supplements_conform, single_main != supplements_conform)
        };

        if partially_normalized {
            warn!(
                "Working tree {} is only partially normalized; full renaming will proceed",
                tree_root.display()
            );
        }

        Ok(ClassificationResult {
            entries,
            already_normalized,
            partially_normalized,
        })
    }
}

impl Default for TexClassifier {
    fn default() -> Self {
        Self::new()
    }
}
