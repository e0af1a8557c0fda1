//! Pipeline orchestration for a single candidate.
//!
//! ```text
//! Start → Decompressed → ContainerChecked ─┬─ container ──→ Unpacked ───────┬→ Done
//!                                          └─ not a tar ──→ PayloadChecked ─┘
//! ```
//!
//! A missing input fails with stage `missing` before any stage runs; a
//! decompression failure stops the run before the container probe.

mod orchestrator;
mod outcome;

pub use orchestrator::Pipeline;
pub use outcome::{PayloadCheck, PipelineReport, PipelineState, ValidationOutcome};
