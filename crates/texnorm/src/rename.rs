use std::path::{Path, PathBuf};

use tracing::debug;
use uuid::Uuid;

use crate::classify::ClassificationResult;
use crate::error::RenameError;
use crate::scheme;

/// One planned rename: `source` is moved to `target` in the same
/// directory.
#[derive(Debug, Clone)]
pub struct RenamePair {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Ordered rename mapping. Empty when the tree is already normalized.
#[derive(Debug, Default)]
pub struct RenameMapping {
    pub pairs: Vec<RenamePair>,
}

impl RenameMapping {
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

/// Computes and applies the canonical rename mapping: the first entry
/// in sorted order becomes `Main_En.tex`, the rest become
/// `SM1_En.tex` … `SMk_En.tex`.
pub struct RenamePlanner;

impl RenamePlanner {
    pub fn new() -> Self {
        Self
    }

    pub fn plan(&self, classification: &ClassificationResult) -> RenameMapping {
        if classification.already_normalized {
            return RenameMapping::default();
        }

        let mut pairs = Vec::new();
        for (index, entry) in classification.entries.iter().enumerate() {
            let target_name = if index == 0 {
                scheme::MAIN_NAME.to_string()
            } else {
                scheme::supplement_name(index)
            };

            // No-op optimization: already carries its target name
            if entry.leaf == target_name {
                continue;
            }

            pairs.push(RenamePair {
                source: entry.path.clone(),
                target: entry.path.with_file_name(target_name),
            });
        }

        RenameMapping { pairs }
    }

    /// Applies the mapping. Each rename is copy-to-target then
    /// remove-source, so a fault between the two steps leaves both
    /// files present rather than neither. A pre-existing target is
    /// removed first; when that target is itself the source of a
    /// pending rename, the pending rename runs first so its content
    /// is not lost. When the pending renames form a cycle the
    /// occupant is parked under a unique temporary name instead, and
    /// its own rename later reads from the parked location.
    pub fn apply(&self, mapping: &RenameMapping) -> Result<usize, RenameError> {
        let mut sources: Vec<PathBuf> =
            mapping.pairs.iter().map(|p| p.source.clone()).collect();
        let mut started = vec![false; mapping.pairs.len()];
        for index in 0..mapping.pairs.len() {
            self.apply_one(mapping, index, &mut started, &mut sources)?;
        }
        Ok(mapping.pairs.len())
    }

    fn apply_one(
        &self,
        mapping: &RenameMapping,
        index: usize,
        started: &mut [bool],
        sources: &mut [PathBuf],
    ) -> Result<(), RenameError> {
        if started[index] {
            return Ok(());
        }
        started[index] = true;

        let target = mapping.pairs[index].target.clone();

        if let Some(blocking) = (0..mapping.pairs.len()).find(|&i| sources[i] == target) {
            if !started[blocking] {
                self.apply_one(mapping, blocking, started, sources)?;
            } else if target.exists() {
                // Rename cycle: the occupant is higher up the call
                // stack, so park its bytes under a temporary name and
                // let its pending copy read from there. A blocking
                // pair that already finished left nothing to park.
                let parked = target.with_file_name(format!("{}.tmp", Uuid::new_v4()));
                let occupant = sources[blocking].clone();
                self.move_file(&occupant, &parked)?;
                sources[blocking] = parked;
            }
        }

        if target.exists() {
            std::fs::remove_file(&target).map_err(|e| RenameError::RemoveExisting {
                path: target.clone(),
                source: e,
            })?;
        }

        let source = sources[index].clone();
        self.move_file(&source, &target)?;

        debug!("Renamed {} -> {}", source.display(), target.display());
        Ok(())
    }

    fn move_file(&self, from: &Path, to: &Path) -> Result<(), RenameError> {
        std::fs::copy(from, to).map_err(|e| RenameError::Copy {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source: e,
        })?;

        std::fs::remove_file(from).map_err(|e| RenameError::RemoveSource {
            path: from.to_path_buf(),
            source: e,
        })?;
        Ok(())
    }
}

impl Default for RenamePlanner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::TexClassifier;
    use std::path::Path;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, content.as_bytes()).unwrap();
    }

    fn plan_for(root: &Path) -> RenameMapping {
        let classification = TexClassifier::new().classify(root).unwrap();
        RenamePlanner::new().plan(&classification)
    }

    #[test]
    fn test_plan_flat_tree() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.tex", "A");
        touch(tmp.path(), "b.tex", "B");
        touch(tmp.path(), "c.tex", "C");

        let mapping = plan_for(tmp.path());
        assert_eq!(mapping.len(), 3);
        assert_eq!(mapping.pairs[0].target, tmp.path().join("Main_En.tex"));
        assert_eq!(mapping.pairs[1].target, tmp.path().join("SM1_En.tex"));
        assert_eq!(mapping.pairs[2].target, tmp.path().join("SM2_En.tex"));
    }

    #[test]
    fn test_plan_empty_when_already_normalized() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Main_En.tex", "M");
        touch(tmp.path(), "SM1_En.tex", "S");

        assert!(plan_for(tmp.path()).is_empty());
    }

    #[test]
    fn test_plan_targets_stay_in_source_directory() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "docs/appendix.tex", "A");
        touch(tmp.path(), "docs/intro.tex", "I");

        let mapping = plan_for(tmp.path());
        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.pairs[0].target, tmp.path().join("docs/Main_En.tex"));
        assert_eq!(mapping.pairs[1].target, tmp.path().join("docs/SM1_En.tex"));
    }

    #[test]
    fn test_plan_omits_noop_pairs() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "Main_En.tex", "M");
        touch(tmp.path(), "b.tex", "B");

        // Partially normalized: Main keeps its name, b.tex becomes SM1
        let mapping = plan_for(tmp.path());
        assert_eq!(mapping.len(), 1);
        assert_eq!(mapping.pairs[0].source, tmp.path().join("b.tex"));
        assert_eq!(mapping.pairs[0].target, tmp.path().join("SM1_En.tex"));
    }

    #[test]
    fn test_apply_moves_content() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "a.tex", "alpha");
        touch(tmp.path(), "b.tex", "beta");

        let mapping = plan_for(tmp.path());
        let renamed = RenamePlanner::new().apply(&mapping).unwrap();

        assert_eq!(renamed, 2);
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("Main_En.tex")).unwrap(),
            "alpha"
        );
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("SM1_En.tex")).unwrap(),
            "beta"
        );
        assert!(!tmp.path().join("a.tex").exists());
        assert!(!tmp.path().join("b.tex").exists());
    }

    #[test]
    fn test_apply_displaced_main_keeps_its_content() {
        let tmp = TempDir::new().unwrap();
        // "B.tex" sorts before "Main_En.tex", so the old main is
        // displaced to SM1 and must not be clobbered in the process
        touch(tmp.path(), "B.tex", "new main");
        touch(tmp.path(), "Main_En.tex", "old main");

        let mapping = plan_for(tmp.path());
        RenamePlanner::new().apply(&mapping).unwrap();

        assert_eq!(
            std::fs::read_to_string(tmp.path().join("Main_En.tex")).unwrap(),
            "new main"
        );
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("SM1_En.tex")).unwrap(),
            "old main"
        );
        assert!(!tmp.path().join("B.tex").exists());
    }

    #[test]
    fn test_apply_rename_cycle_preserves_all_content() {
        let tmp = TempDir::new().unwrap();
        // SM10 and SM2 must swap places: each pending rename targets
        // the other's current name
        touch(tmp.path(), "A.tex", "a");
        touch(tmp.path(), "B.tex", "b");
        touch(tmp.path(), "SM10_En.tex", "ten");
        for i in 11..=17 {
            touch(tmp.path(), &format!("SM{}_En.tex", i), &format!("s{}", i));
        }
        touch(tmp.path(), "SM2_En.tex", "two");

        let mapping = plan_for(tmp.path());
        RenamePlanner::new().apply(&mapping).unwrap();

        let read = |name: &str| std::fs::read_to_string(tmp.path().join(name)).unwrap();
        assert_eq!(read("Main_En.tex"), "a");
        assert_eq!(read("SM1_En.tex"), "b");
        assert_eq!(read("SM2_En.tex"), "ten");
        assert_eq!(read("SM10_En.tex"), "two");
        for i in 11..=17 {
            assert_eq!(read(&format!("SM{}_En.tex", i - 8)), format!("s{}", i));
        }
        // no parked temporaries left behind
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 11);
    }

    #[test]
    fn test_apply_shifts_supplements_when_main_missing() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "SM1_En.tex", "one");
        touch(tmp.path(), "SM2_En.tex", "two");

        // SM1 moves to Main first, then SM2 slides into the freed slot
        let mapping = plan_for(tmp.path());
        RenamePlanner::new().apply(&mapping).unwrap();

        assert_eq!(
            std::fs::read_to_string(tmp.path().join("Main_En.tex")).unwrap(),
            "one"
        );
        assert_eq!(
            std::fs::read_to_string(tmp.path().join("SM1_En.tex")).unwrap(),
            "two"
        );
        assert!(!tmp.path().join("SM2_En.tex").exists());
        assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 2);
    }

    #[test]
    fn test_apply_twice_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "b.tex", "beta");
        touch(tmp.path(), "a.tex", "alpha");

        let mapping = plan_for(tmp.path());
        RenamePlanner::new().apply(&mapping).unwrap();

        // second classification sees a normalized tree
        let second = plan_for(tmp.path());
        assert!(second.is_empty());
    }
}
