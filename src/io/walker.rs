use crate::detection::FileClassifier;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Recursive discovery of candidate archives under a root directory.
///
/// The walk is eager: the full candidate list is collected before any
/// pipeline runs, so artifacts created during the batch are never picked up.
pub struct FileWalker<'a, C: FileClassifier> {
    root: PathBuf,
    classifier: &'a C,
    excluded_dirs: Vec<PathBuf>,
}

impl<'a, C: FileClassifier> FileWalker<'a, C> {
    pub fn new(root: PathBuf, classifier: &'a C) -> Self {
        Self {
            root,
            classifier,
            excluded_dirs: vec![],
        }
    }

    /// Skip a directory subtree (e.g. the quarantine directory).
    pub fn with_excluded_dir(mut self, dir: &Path) -> Self {
        // Only existing directories can appear in the walk
        if let Ok(canonical) = dir.canonicalize() {
            self.excluded_dirs.push(canonical);
        }
        self
    }

    pub fn walk(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            anyhow::bail!("{} is not a directory", self.root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded(entry.path(), entry.file_type().is_dir()));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if e.depth() == 0 {
                        return Err(e).with_context(|| {
                            format!("Failed to read directory {}", self.root.display())
                        });
                    }
                    log::warn!("Skipping unreadable entry during walk: {}", e);
                    continue;
                }
            };

            if is_regular_file(&entry) && self.classifier.is_candidate(entry.path()) {
                files.push(entry.into_path());
            }
        }

        Ok(files)
    }

    fn is_excluded(&self, path: &Path, is_dir: bool) -> bool {
        if !is_dir || self.excluded_dirs.is_empty() {
            return false;
        }
        path.canonicalize()
            .map(|canonical| self.excluded_dirs.contains(&canonical))
            .unwrap_or(false)
    }
}

/// Symlinks are not descended into, but a link that resolves to a regular
/// file is a candidate like any other.
fn is_regular_file(entry: &walkdir::DirEntry) -> bool {
    let file_type = entry.file_type();
    file_type.is_file() || (file_type.is_symlink() && entry.path().is_file())
}

pub fn find_candidate_files<C: FileClassifier>(
    root: &Path,
    classifier: &C,
) -> Result<Vec<PathBuf>> {
    FileWalker::new(root.to_path_buf(), classifier).walk()
}
