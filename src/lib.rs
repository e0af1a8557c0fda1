// Export modules for library usage
pub mod batch;
pub mod cli;
pub mod commands;
pub mod config;
pub mod detection;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod observability;
pub mod pipeline;
pub mod progress;
pub mod signature;
pub mod stages;

// Re-export commonly used types
pub use crate::batch::{
    BatchRunner, BatchState, BatchSummary, CleanupReport, QuarantineReport, RunnerOptions,
};

pub use crate::config::{load_config, CleanupMode, UnitycheckConfig};

pub use crate::detection::{FileClassifier, SuffixClassifier, DEFAULT_SUFFIX};

pub use crate::errors::{Stage, ValidationError};

pub use crate::pipeline::{Pipeline, PipelineReport, PipelineState, ValidationOutcome};

pub use crate::signature::{check_file_signature, matches_signature, UNITY_PACKAGE_MAGIC};
