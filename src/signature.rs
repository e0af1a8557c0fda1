//! Binary signature checks for payload files.
//!
//! A Unity asset package payload is ZIP structured, so the only check made
//! here is that the first four bytes carry the ZIP local-file-header magic.
//! Deeper structural parsing is deliberately not attempted.

use crate::errors::ValidationError;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Number of leading bytes compared against the magic.
pub const SIGNATURE_LEN: usize = 4;

/// ZIP local-file-header magic (`PK\x03\x04`).
pub const UNITY_PACKAGE_MAGIC: [u8; SIGNATURE_LEN] = *b"PK\x03\x04";

/// Pure predicate: does `bytes` start with `expected`?
///
/// Buffers shorter than the magic never match.
pub fn matches_signature(bytes: &[u8], expected: &[u8]) -> bool {
    bytes.len() >= expected.len() && &bytes[..expected.len()] == expected
}

/// Result of checking a file's leading bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureCheck {
    Match,
    /// File was read but its prefix differs (or it is shorter than the magic)
    Mismatch { found: Vec<u8> },
    /// File could not be opened or read
    Unreadable { message: String },
}

impl SignatureCheck {
    pub fn is_match(&self) -> bool {
        matches!(self, Self::Match)
    }

    /// Convert into the pipeline's error taxonomy, keeping I/O and content
    /// failures apart.
    pub fn into_result(self, path: &Path, expected: &[u8]) -> Result<(), ValidationError> {
        match self {
            Self::Match => Ok(()),
            Self::Mismatch { found } => Err(ValidationError::signature_mismatch(
                path, expected, found,
            )),
            Self::Unreadable { message } => Err(ValidationError::Io {
                path: path.to_path_buf(),
                message,
            }),
        }
    }
}

/// Read at most `len` bytes from the start of `path`.
pub fn read_prefix(path: &Path, len: usize) -> io::Result<Vec<u8>> {
    let file = File::open(path)?;
    let mut buf = Vec::with_capacity(len);
    file.take(len as u64).read_to_end(&mut buf)?;
    Ok(buf)
}

/// Check whether the file at `path` starts with `expected`.
pub fn check_file_signature(path: &Path, expected: &[u8]) -> SignatureCheck {
    match read_prefix(path, expected.len()) {
        Ok(prefix) if matches_signature(&prefix, expected) => {
            log::info!("{} is a valid unitypackage file.", path.display());
            SignatureCheck::Match
        }
        Ok(prefix) => {
            log::warn!(
                "{} does not start with the expected header.",
                path.display()
            );
            SignatureCheck::Mismatch { found: prefix }
        }
        Err(e) => {
            log::warn!("Error checking {}: {}", path.display(), e);
            SignatureCheck::Unreadable {
                message: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    #[test]
    fn test_exact_magic_matches() {
        assert!(matches_signature(b"PK\x03\x04", &UNITY_PACKAGE_MAGIC));
    }

    #[test]
    fn test_magic_followed_by_data_matches() {
        assert!(matches_signature(b"PK\x03\x04rest-of-zip", &UNITY_PACKAGE_MAGIC));
    }

    #[test]
    fn test_short_buffer_does_not_match() {
        assert!(!matches_signature(b"PK\x03", &UNITY_PACKAGE_MAGIC));
        assert!(!matches_signature(b"", &UNITY_PACKAGE_MAGIC));
    }

    #[test]
    fn test_gzip_magic_does_not_match() {
        assert!(!matches_signature(&[0x1F, 0x8B, 0x08, 0x00], &UNITY_PACKAGE_MAGIC));
    }

    #[test]
    fn test_check_file_distinguishes_unreadable_from_mismatch() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.unitypackage");
        let wrong = dir.path().join("wrong.unitypackage");
        std::fs::write(&wrong, b"NOTZIP").unwrap();

        assert!(matches!(
            check_file_signature(&missing, &UNITY_PACKAGE_MAGIC),
            SignatureCheck::Unreadable { .. }
        ));
        assert_eq!(
            check_file_signature(&wrong, &UNITY_PACKAGE_MAGIC),
            SignatureCheck::Mismatch {
                found: b"NOTZ".to_vec()
            }
        );
    }

    #[test]
    fn test_short_file_is_mismatch_not_io() {
        let dir = TempDir::new().unwrap();
        let short = dir.path().join("short.unitypackage");
        std::fs::write(&short, b"PK").unwrap();

        let check = check_file_signature(&short, &UNITY_PACKAGE_MAGIC);
        let err = check.into_result(&short, &UNITY_PACKAGE_MAGIC).unwrap_err();
        assert_eq!(err.reason_code(), "signature_mismatch");
    }

    #[test]
    fn test_into_result_for_match() {
        let path = Path::new("ok.unitypackage");
        assert!(SignatureCheck::Match
            .into_result(path, &UNITY_PACKAGE_MAGIC)
            .is_ok());
    }

    proptest! {
        #[test]
        fn prop_magic_prefix_always_matches(tail in proptest::collection::vec(any::<u8>(), 0..64)) {
            let mut bytes = UNITY_PACKAGE_MAGIC.to_vec();
            bytes.extend(tail);
            prop_assert!(matches_signature(&bytes, &UNITY_PACKAGE_MAGIC));
        }

        #[test]
        fn prop_match_implies_equal_prefix(bytes in proptest::collection::vec(any::<u8>(), 0..16)) {
            let matched = matches_signature(&bytes, &UNITY_PACKAGE_MAGIC);
            let expected =
                bytes.len() >= SIGNATURE_LEN && bytes[..SIGNATURE_LEN] == UNITY_PACKAGE_MAGIC;
            prop_assert_eq!(matched, expected);
        }
    }
}
