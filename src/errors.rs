//! Failure taxonomy for the validation pipeline.
//!
//! Every stage converts its failure into a [`ValidationError`] at the stage
//! boundary. Nothing below the batch runner propagates a fault upward: the
//! orchestrator turns the error into a recorded outcome and the batch moves
//! on to the next candidate.
//!
//! # Categories
//!
//! - `Io`: a path could not be opened, read or written
//! - `Decode`: bad compressed stream, bad container, entry extraction failure
//! - `SignatureMismatch`: the payload does not start with the expected magic
//! - `MissingInput`: the candidate vanished between discovery and processing
//!
//! # Example
//!
//! ```rust
//! use unitycheck::errors::{Stage, ValidationError};
//!
//! let err = ValidationError::decode(Stage::Decompress, "a.unitypackage", "invalid gzip header");
//! assert_eq!(err.reason_code(), "decode");
//! assert_eq!(err.path().to_str(), Some("a.unitypackage"));
//! ```

use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Pipeline stage a failure is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Input was missing or unreadable before any stage ran
    Missing,
    /// Gzip decompression of the candidate
    Decompress,
    /// Extraction of the tar container
    Unpack,
    /// Payload signature verification
    Signature,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::Missing,
        Stage::Decompress,
        Stage::Unpack,
        Stage::Signature,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Decompress => "decompress",
            Self::Unpack => "unpack",
            Self::Signature => "signature",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single recorded failure.
///
/// Messages are kept as strings so the error stays `Clone` and can be
/// serialized into the batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValidationError {
    #[error("I/O failure on {}: {message}", .path.display())]
    Io { path: PathBuf, message: String },

    #[error("{stage} failed for {}: {message}", .path.display())]
    Decode {
        stage: Stage,
        path: PathBuf,
        message: String,
    },

    #[error(
        "{} does not start with the expected header (expected {}, found {})",
        .path.display(),
        format_hex(.expected),
        format_hex(.found)
    )]
    SignatureMismatch {
        path: PathBuf,
        expected: Vec<u8>,
        found: Vec<u8>,
    },

    #[error("{} does not exist", .path.display())]
    MissingInput { path: PathBuf },
}

impl ValidationError {
    pub fn io(path: impl Into<PathBuf>, error: &io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }

    pub fn decode(stage: Stage, path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            stage,
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn signature_mismatch(
        path: impl Into<PathBuf>,
        expected: &[u8],
        found: impl Into<Vec<u8>>,
    ) -> Self {
        Self::SignatureMismatch {
            path: path.into(),
            expected: expected.to_vec(),
            found: found.into(),
        }
    }

    pub fn missing(path: impl Into<PathBuf>) -> Self {
        Self::MissingInput { path: path.into() }
    }

    /// Path the failure was observed on.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. }
            | Self::Decode { path, .. }
            | Self::SignatureMismatch { path, .. }
            | Self::MissingInput { path } => path,
        }
    }

    /// Stable machine-readable reason code.
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "io",
            Self::Decode { .. } => "decode",
            Self::SignatureMismatch { .. } => "signature_mismatch",
            Self::MissingInput { .. } => "missing_input",
        }
    }
}

fn format_hex(bytes: &[u8]) -> String {
    if bytes.is_empty() {
        return "<empty>".to_string();
    }
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(" ")
}
