//! File classification by name.
//!
//! The pipeline never inspects extensions directly; it asks a
//! [`FileClassifier`], so the detection rule can be swapped without touching
//! the stages.

use std::path::Path;

/// Suffix of Unity asset packages, used for both candidates and payload entries.
pub const DEFAULT_SUFFIX: &str = ".unitypackage";

pub trait FileClassifier {
    /// Is this file an archive that should be run through the pipeline?
    fn is_candidate(&self, path: &Path) -> bool;

    /// Is this unpacked entry a payload whose signature must be checked?
    fn is_payload(&self, path: &Path) -> bool;
}

/// Classifies files by the ending of their file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuffixClassifier {
    candidate_suffix: String,
    payload_suffix: String,
}

impl Default for SuffixClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SUFFIX, DEFAULT_SUFFIX)
    }
}

impl SuffixClassifier {
    pub fn new(candidate_suffix: impl Into<String>, payload_suffix: impl Into<String>) -> Self {
        Self {
            candidate_suffix: candidate_suffix.into(),
            payload_suffix: payload_suffix.into(),
        }
    }

    pub fn candidate_suffix(&self) -> &str {
        &self.candidate_suffix
    }

    pub fn payload_suffix(&self) -> &str {
        &self.payload_suffix
    }
}

impl FileClassifier for SuffixClassifier {
    fn is_candidate(&self, path: &Path) -> bool {
        name_ends_with(path, &self.candidate_suffix)
    }

    fn is_payload(&self, path: &Path) -> bool {
        name_ends_with(path, &self.payload_suffix)
    }
}

fn name_ends_with(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(suffix))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_unitypackage() {
        let classifier = SuffixClassifier::default();
        assert!(classifier.is_candidate(Path::new("assets/Tree.unitypackage")));
        assert!(classifier.is_payload(Path::new("x/Inner.unitypackage")));
    }

    #[test]
    fn test_derived_artifacts_are_not_candidates() {
        let classifier = SuffixClassifier::default();
        assert!(!classifier.is_candidate(Path::new("Tree.unitypackage.unzipped")));
        assert!(!classifier.is_candidate(Path::new("Tree.unitypackage.unzipped.extracted")));
    }

    #[test]
    fn test_suffix_checks_file_name_only() {
        let classifier = SuffixClassifier::default();
        assert!(!classifier.is_candidate(Path::new("dir.unitypackage/readme.txt")));
        assert!(!classifier.is_candidate(Path::new("/")));
    }

    #[test]
    fn test_custom_suffixes() {
        let classifier = SuffixClassifier::new(".gz", ".zip");
        assert!(classifier.is_candidate(Path::new("a.gz")));
        assert!(!classifier.is_payload(Path::new("a.gz")));
        assert!(classifier.is_payload(Path::new("inner/b.zip")));
    }
}
