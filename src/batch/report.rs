//! End-of-batch summary and its renderings.

use super::tracker::{CleanupReport, QuarantineReport};
use crate::errors::{Stage, ValidationError};
use crate::formatting::{FormattingConfig, Styler};
use crate::pipeline::{PayloadCheck, PipelineReport, ValidationOutcome};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::PathBuf;

/// One failed candidate, with the entry-level failures behind it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureDetail {
    pub candidate: PathBuf,
    pub stage: Stage,
    pub reason: ValidationError,
    pub failed_entries: Vec<PayloadCheck>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub root: PathBuf,
    pub scanned: usize,
    pub valid: usize,
    pub failed: usize,
    pub failures_by_stage: BTreeMap<Stage, usize>,
    pub failed_paths: Vec<PathBuf>,
    pub failures: Vec<FailureDetail>,
    pub cleanup: CleanupReport,
    pub quarantine: Option<QuarantineReport>,
}

impl BatchSummary {
    pub fn new(
        root: PathBuf,
        reports: &[PipelineReport],
        failed_paths: Vec<PathBuf>,
        cleanup: CleanupReport,
        quarantine: Option<QuarantineReport>,
    ) -> Self {
        let failures: Vec<FailureDetail> = reports
            .iter()
            .filter_map(|report| match &report.outcome {
                ValidationOutcome::Valid => None,
                ValidationOutcome::Failed { stage, reason } => Some(FailureDetail {
                    candidate: report.candidate.clone(),
                    stage: *stage,
                    reason: reason.clone(),
                    failed_entries: report.failed_payloads().cloned().collect(),
                }),
            })
            .collect();

        let mut failures_by_stage = BTreeMap::new();
        for failure in &failures {
            *failures_by_stage.entry(failure.stage).or_insert(0) += 1;
        }

        Self {
            root,
            scanned: reports.len(),
            valid: reports.len() - failures.len(),
            failed: failures.len(),
            failures_by_stage,
            failed_paths,
            failures,
            cleanup,
            quarantine,
        }
    }

    pub fn is_clean(&self) -> bool {
        self.failed_paths.is_empty()
    }
}

pub fn render_json(summary: &BatchSummary) -> serde_json::Result<String> {
    serde_json::to_string_pretty(summary)
}

pub fn render_terminal(summary: &BatchSummary, formatting: FormattingConfig) -> String {
    let styler = Styler::new(formatting);
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(out, "{}", styler.header("--- Validation Summary ---"));
    let _ = writeln!(out, "Root:    {}", summary.root.display());
    let _ = writeln!(out, "Scanned: {}", summary.scanned);
    let _ = writeln!(out, "Valid:   {}", styler.success(&summary.valid.to_string()));
    let failed = summary.failed.to_string();
    let _ = writeln!(
        out,
        "Failed:  {}",
        if summary.failed > 0 {
            styler.error(&failed)
        } else {
            failed
        }
    );

    if !summary.failures_by_stage.is_empty() {
        let _ = writeln!(out, "\nFailures by stage:");
        for (stage, count) in &summary.failures_by_stage {
            let _ = writeln!(out, "  {}: {} file(s)", stage, count);
        }
    }

    if summary.failures.is_empty() {
        let _ = writeln!(out, "\n{}", styler.success("No errors found!"));
    } else {
        let _ = writeln!(out, "\n{}", styler.header("--- Error Report ---"));
        for failure in &summary.failures {
            let _ = writeln!(
                out,
                "{} [{}] {}",
                styler.error("Error with:"),
                failure.stage,
                failure.candidate.display()
            );
            let _ = writeln!(out, "    {}", styler.dim(&failure.reason.to_string()));
            for entry in failure.failed_entries.iter().skip(1) {
                if let Some(error) = &entry.error {
                    let _ = writeln!(out, "    {}", styler.dim(&error.to_string()));
                }
            }
        }
    }

    render_cleanup(&mut out, &summary.cleanup, &styler);
    if let Some(quarantine) = &summary.quarantine {
        render_quarantine(&mut out, quarantine, &styler);
    }

    out
}

fn render_cleanup(out: &mut String, cleanup: &CleanupReport, styler: &Styler) {
    let _ = writeln!(
        out,
        "\nCleanup: removed {} temporary artifact(s)",
        cleanup.removed.len()
    );
    for error in &cleanup.errors {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            styler.warning("could not remove"),
            error.path.display(),
            error.message
        );
    }
}

fn render_quarantine(out: &mut String, quarantine: &QuarantineReport, styler: &Styler) {
    let _ = writeln!(
        out,
        "Quarantine: moved {} file(s) to {}",
        quarantine.moved.len(),
        quarantine.directory.display()
    );
    for error in &quarantine.errors {
        let _ = writeln!(
            out,
            "  {} {}: {}",
            styler.warning("could not move"),
            error.path.display(),
            error.message
        );
    }
}
