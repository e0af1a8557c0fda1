//! Batch-level orchestration: bookkeeping across many pipeline runs, the
//! sequential runner, and the final summary.

pub mod report;
pub mod runner;
pub mod tracker;

pub use report::{render_json, render_terminal, BatchSummary, FailureDetail};
pub use runner::{BatchRunner, RunnerOptions, ScanOutput};
pub use tracker::{BatchState, CleanupReport, FinalizeError, MovedFile, QuarantineReport};
