//! Batch bookkeeping: temporary artifacts and failed inputs.
//!
//! `BatchState` is an explicit value threaded through every stage call. It is
//! append-only while scanning and drained by the two finalize phases, both of
//! which are best-effort: individual failures are logged and collected, never
//! propagated.

use crate::io;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct BatchState {
    pending_cleanup: Vec<PathBuf>,
    failed_paths: Vec<PathBuf>,
}

impl BatchState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a temporary artifact for removal. Registering a path that is
    /// already pending is a no-op.
    pub fn register_artifact(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.pending_cleanup.contains(&path) {
            log::debug!("Registered artifact {}", path.display());
            self.pending_cleanup.push(path);
        }
    }

    /// Record a failed input. A path is recorded at most once per run.
    pub fn register_failure(&mut self, path: impl Into<PathBuf>) {
        let path = path.into();
        if !self.failed_paths.contains(&path) {
            self.failed_paths.push(path);
        }
    }

    /// Take every pending artifact, leaving the queue empty.
    pub fn drain_cleanup(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.pending_cleanup)
    }

    /// Snapshot of the failed paths.
    ///
    /// Unlike [`drain_cleanup`](Self::drain_cleanup) this does not clear the
    /// list: failures stay readable for the final report after quarantine.
    pub fn drain_failures(&self) -> Vec<PathBuf> {
        self.failed_paths.clone()
    }

    pub fn pending_cleanup(&self) -> &[PathBuf] {
        &self.pending_cleanup
    }

    pub fn failed_paths(&self) -> &[PathBuf] {
        &self.failed_paths
    }

    pub fn has_failures(&self) -> bool {
        !self.failed_paths.is_empty()
    }

    /// Remove every pending artifact from disk.
    ///
    /// Regular files are deleted, directories removed recursively. Paths that
    /// no longer exist are counted as already gone.
    pub fn finalize_cleanup(&mut self) -> CleanupReport {
        let mut report = CleanupReport::default();

        for path in self.drain_cleanup() {
            match remove_artifact(&path) {
                Ok(true) => {
                    log::info!("Removed temporary artifact: {}", path.display());
                    report.removed.push(path);
                }
                Ok(false) => report.already_absent += 1,
                Err(e) => {
                    log::error!("Error removing {}: {}", path.display(), e);
                    report.errors.push(FinalizeError::new(path, &e));
                }
            }
        }

        report
    }

    /// Move every failed path that still exists as a regular file into
    /// `target`, creating it if needed.
    pub fn finalize_quarantine(&self, target: &Path) -> QuarantineReport {
        let mut report = QuarantineReport {
            directory: target.to_path_buf(),
            ..QuarantineReport::default()
        };

        if let Err(e) = io::ensure_dir(target) {
            log::error!(
                "Error creating quarantine directory {}: {}",
                target.display(),
                e
            );
            report.errors.push(FinalizeError::new(target.to_path_buf(), &e));
            return report;
        }

        for path in self.drain_failures() {
            if !io::file_exists(&path) {
                log::debug!("Skipping quarantine of {}: no longer a file", path.display());
                report.skipped.push(path);
                continue;
            }

            match io::move_into_dir(&path, target) {
                Ok(destination) => {
                    log::info!("Moved corrupted file to: {}", destination.display());
                    report.moved.push(MovedFile {
                        from: path,
                        to: destination,
                    });
                }
                Err(e) => {
                    log::error!(
                        "Error moving file {} to quarantine directory: {}",
                        path.display(),
                        e
                    );
                    report.errors.push(FinalizeError::new(path, &e));
                }
            }
        }

        report
    }
}

/// Returns `Ok(false)` when the path was already gone.
fn remove_artifact(path: &Path) -> std::io::Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
        Err(e) => return Err(e),
    };

    if metadata.is_dir() {
        fs::remove_dir_all(path)?;
    } else {
        fs::remove_file(path)?;
    }
    Ok(true)
}

/// A finalize step that failed for one path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalizeError {
    pub path: PathBuf,
    pub message: String,
}

impl FinalizeError {
    fn new(path: PathBuf, error: &std::io::Error) -> Self {
        Self {
            path,
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    pub already_absent: usize,
    pub errors: Vec<FinalizeError>,
}

impl CleanupReport {
    /// Fold a later report (from interim cleanup) into this one.
    pub fn merge(&mut self, other: CleanupReport) {
        self.removed.extend(other.removed);
        self.already_absent += other.already_absent;
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MovedFile {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct QuarantineReport {
    pub directory: PathBuf,
    pub moved: Vec<MovedFile>,
    pub skipped: Vec<PathBuf>,
    pub errors: Vec<FinalizeError>,
}
