//! Archive stage decoders.
//!
//! Decoding is staged rather than monolithic so a failure can be attributed
//! to the step that produced it: bad compression, bad container, or bad
//! payload. Each stage that materializes an artifact registers it with the
//! [`BatchState`](crate::batch::BatchState) before creating it, so partially
//! written artifacts are still reclaimed.

pub mod container;
pub mod decompress;
pub mod unpack;

pub use container::{is_archive_container, BLOCK_SIZE};
pub use decompress::{decompress, DecompressedArtifact};
pub use unpack::{unpack, UnpackedContainer};

use std::path::{Path, PathBuf};

/// Suffix appended to a candidate for its decompressed sibling.
pub const UNZIPPED_SUFFIX: &str = ".unzipped";

/// Suffix appended to a decompressed artifact for its unpack directory.
pub const EXTRACTED_SUFFIX: &str = ".extracted";

/// Sibling path formed by appending `suffix` to the full file name.
pub fn artifact_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}
