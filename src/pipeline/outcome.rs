use crate::errors::{Stage, ValidationError};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// States a single candidate moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    Start,
    Decompressed,
    ContainerChecked,
    Unpacked,
    PayloadChecked,
    Done,
}

/// Terminal result for one candidate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ValidationOutcome {
    Valid,
    Failed { stage: Stage, reason: ValidationError },
}

impl ValidationOutcome {
    pub fn failed(stage: Stage, reason: ValidationError) -> Self {
        Self::Failed { stage, reason }
    }

    /// Valid only if every checked payload passed. The first failing payload
    /// becomes the reported reason; the rest stay in the per-entry checks.
    pub fn from_payloads(payloads: &[PayloadCheck]) -> Self {
        payloads
            .iter()
            .find_map(|check| check.error.clone())
            .map(|reason| Self::failed(Stage::Signature, reason))
            .unwrap_or(Self::Valid)
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn failed_stage(&self) -> Option<Stage> {
        match self {
            Self::Valid => None,
            Self::Failed { stage, .. } => Some(*stage),
        }
    }

    pub fn reason(&self) -> Option<&ValidationError> {
        match self {
            Self::Valid => None,
            Self::Failed { reason, .. } => Some(reason),
        }
    }
}

/// Signature result for one payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PayloadCheck {
    pub path: PathBuf,
    pub error: Option<ValidationError>,
}

impl PayloadCheck {
    pub fn passed(&self) -> bool {
        self.error.is_none()
    }
}

/// Everything recorded about one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub candidate: PathBuf,
    pub outcome: ValidationOutcome,
    /// Result of the container probe; `None` if it never ran
    pub container: Option<bool>,
    pub payloads: Vec<PayloadCheck>,
    /// Artifacts registered for cleanup during this run
    pub artifacts: Vec<PathBuf>,
    pub states: Vec<PipelineState>,
}

impl PipelineReport {
    pub(crate) fn start(candidate: &Path) -> Self {
        Self {
            candidate: candidate.to_path_buf(),
            outcome: ValidationOutcome::Valid,
            container: None,
            payloads: Vec::new(),
            artifacts: Vec::new(),
            states: vec![PipelineState::Start],
        }
    }

    pub(crate) fn advance(&mut self, state: PipelineState) {
        log::debug!("{}: {:?}", self.candidate.display(), state);
        self.states.push(state);
    }

    pub fn reached(&self, state: PipelineState) -> bool {
        self.states.contains(&state)
    }

    pub fn failed_payloads(&self) -> impl Iterator<Item = &PayloadCheck> {
        self.payloads.iter().filter(|check| !check.passed())
    }
}
