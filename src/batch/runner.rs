use super::report::BatchSummary;
use super::tracker::{BatchState, CleanupReport};
use crate::config::CleanupMode;
use crate::detection::{FileClassifier, SuffixClassifier};
use crate::io::FileWalker;
use crate::observability::{increment_processed, set_phase, set_progress, ValidationPhase};
use crate::pipeline::{Pipeline, PipelineReport};
use crate::progress::{ProgressConfig, ProgressManager, TEMPLATE_SCAN};
use anyhow::Result;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerOptions {
    pub cleanup_mode: CleanupMode,
    /// `None` disables quarantine
    pub quarantine_dir: Option<PathBuf>,
}

/// Result of the scan phase, before finalization.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub reports: Vec<PipelineReport>,
    /// Populated only under [`CleanupMode::Immediate`]
    pub interim_cleanup: CleanupReport,
}

/// Walks a root, validates every candidate in sequence, then cleans up and
/// quarantines.
pub struct BatchRunner<C: FileClassifier = SuffixClassifier> {
    pipeline: Pipeline<C>,
    options: RunnerOptions,
    progress: ProgressManager,
}

impl<C: FileClassifier> BatchRunner<C> {
    pub fn new(pipeline: Pipeline<C>, options: RunnerOptions) -> Self {
        Self {
            pipeline,
            options,
            progress: ProgressManager::new(ProgressConfig {
                quiet_mode: true,
                verbosity: 0,
            }),
        }
    }

    /// Progress is hidden unless a manager is supplied here.
    pub fn with_progress(mut self, progress: ProgressManager) -> Self {
        self.progress = progress;
        self
    }

    pub fn run(&self, root: &Path) -> Result<BatchSummary> {
        let candidates = self.discover(root)?;
        let mut state = BatchState::new();
        let scanned = self.scan(&candidates, &mut state);
        Ok(self.finalize(root, &mut state, scanned))
    }

    /// Candidate files under `root`, excluding the quarantine directory.
    pub fn discover(&self, root: &Path) -> Result<Vec<PathBuf>> {
        let _phase = set_phase(ValidationPhase::Discovery);
        let mut walker = FileWalker::new(root.to_path_buf(), self.pipeline.classifier());
        if let Some(dir) = &self.options.quarantine_dir {
            walker = walker.with_excluded_dir(dir);
        }
        let candidates = walker.walk()?;
        log::info!(
            "Found {} candidate file(s) under {}",
            candidates.len(),
            root.display()
        );
        Ok(candidates)
    }

    /// Run the pipeline over every candidate, one at a time.
    pub fn scan(&self, candidates: &[PathBuf], state: &mut BatchState) -> ScanOutput {
        let mut output = ScanOutput::default();
        let bar = self.progress.create_bar(candidates.len() as u64, TEMPLATE_SCAN);
        bar.set_message("Validating");
        set_progress(0, candidates.len());

        for candidate in candidates {
            let report = self.pipeline.run(candidate, state);
            output.reports.push(report);

            if self.options.cleanup_mode == CleanupMode::Immediate {
                let _phase = set_phase(ValidationPhase::Cleanup);
                output.interim_cleanup.merge(state.finalize_cleanup());
            }

            increment_processed();
            bar.inc(1);
        }

        bar.finish_and_clear();
        output
    }

    /// Remove remaining artifacts, quarantine failures, build the summary.
    pub fn finalize(
        &self,
        root: &Path,
        state: &mut BatchState,
        scanned: ScanOutput,
    ) -> BatchSummary {
        let mut cleanup = scanned.interim_cleanup;
        {
            let _phase = set_phase(ValidationPhase::Cleanup);
            cleanup.merge(state.finalize_cleanup());
        }

        let quarantine = match &self.options.quarantine_dir {
            Some(dir) if state.has_failures() => {
                let _phase = set_phase(ValidationPhase::Quarantine);
                Some(state.finalize_quarantine(dir))
            }
            _ => None,
        };

        let _phase = set_phase(ValidationPhase::Reporting);
        BatchSummary::new(
            root.to_path_buf(),
            &scanned.reports,
            state.drain_failures(),
            cleanup,
            quarantine,
        )
    }
}
