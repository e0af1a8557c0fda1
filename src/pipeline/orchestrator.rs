use super::outcome::{PayloadCheck, PipelineReport, PipelineState, ValidationOutcome};
use crate::batch::BatchState;
use crate::detection::{FileClassifier, SuffixClassifier};
use crate::errors::{Stage, ValidationError};
use crate::observability::{set_current_file, set_phase, ValidationPhase};
use crate::signature::{check_file_signature, UNITY_PACKAGE_MAGIC};
use crate::stages;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Runs one candidate through decompress → container probe → unpack or
/// direct payload check, short-circuiting on the first stage failure.
///
/// Payload entries inside a container are checked independently: one bad
/// entry fails the candidate but never stops its siblings from being checked.
#[derive(Debug, Clone)]
pub struct Pipeline<C: FileClassifier = SuffixClassifier> {
    classifier: C,
    magic: Vec<u8>,
}

impl Default for Pipeline<SuffixClassifier> {
    fn default() -> Self {
        Self::new(SuffixClassifier::default())
    }
}

impl<C: FileClassifier> Pipeline<C> {
    pub fn new(classifier: C) -> Self {
        Self {
            classifier,
            magic: UNITY_PACKAGE_MAGIC.to_vec(),
        }
    }

    pub fn with_magic(mut self, magic: impl Into<Vec<u8>>) -> Self {
        self.magic = magic.into();
        self
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Validate `candidate`, recording artifacts and failures in `state`.
    pub fn run(&self, candidate: &Path, state: &mut BatchState) -> PipelineReport {
        let _file = set_current_file(candidate);
        log::info!("Checking file: {}", candidate.display());

        let first_artifact = state.pending_cleanup().len();
        let mut report = PipelineReport::start(candidate);

        let outcome = self.drive(candidate, state, &mut report);
        if let ValidationOutcome::Failed { stage, reason } = &outcome {
            log::warn!("{} failed at {} stage: {}", candidate.display(), stage, reason);
            state.register_failure(candidate);
        }

        report.artifacts = state
            .pending_cleanup()
            .get(first_artifact..)
            .map(<[PathBuf]>::to_vec)
            .unwrap_or_default();
        report.outcome = outcome;
        report.advance(PipelineState::Done);
        report
    }

    fn drive(
        &self,
        candidate: &Path,
        state: &mut BatchState,
        report: &mut PipelineReport,
    ) -> ValidationOutcome {
        if let Err(reason) = check_input(candidate) {
            return ValidationOutcome::failed(Stage::Missing, reason);
        }

        let decompressed = {
            let _phase = set_phase(ValidationPhase::Decompress);
            match stages::decompress(candidate, state) {
                Ok(artifact) => artifact.path,
                Err(reason) => return ValidationOutcome::failed(Stage::Decompress, reason),
            }
        };
        report.advance(PipelineState::Decompressed);

        let is_container = {
            let _phase = set_phase(ValidationPhase::ContainerProbe);
            stages::is_archive_container(&decompressed)
        };
        report.container = Some(is_container);
        report.advance(PipelineState::ContainerChecked);

        if is_container {
            self.check_container(&decompressed, state, report)
        } else {
            self.check_single_payload(&decompressed, report)
        }
    }

    fn check_container(
        &self,
        decompressed: &Path,
        state: &mut BatchState,
        report: &mut PipelineReport,
    ) -> ValidationOutcome {
        let unpacked = {
            let _phase = set_phase(ValidationPhase::Unpack);
            match stages::unpack(decompressed, state) {
                Ok(unpacked) => unpacked,
                Err(reason) => return ValidationOutcome::failed(Stage::Unpack, reason),
            }
        };
        report.advance(PipelineState::Unpacked);

        let _phase = set_phase(ValidationPhase::SignatureCheck);
        report.payloads = self.check_payload_entries(&unpacked.directory);

        if report.payloads.is_empty() {
            log::warn!(
                "No payload entries among {} unpacked from {}; nothing to verify",
                unpacked.entries,
                unpacked.directory.display()
            );
        }

        ValidationOutcome::from_payloads(&report.payloads)
    }

    fn check_single_payload(
        &self,
        decompressed: &Path,
        report: &mut PipelineReport,
    ) -> ValidationOutcome {
        let _phase = set_phase(ValidationPhase::SignatureCheck);
        report.payloads.push(self.check_payload(decompressed));
        report.advance(PipelineState::PayloadChecked);
        ValidationOutcome::from_payloads(&report.payloads)
    }

    fn check_payload_entries(&self, directory: &Path) -> Vec<PayloadCheck> {
        let mut checks = Vec::new();

        for entry in WalkDir::new(directory).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    if entry.file_type().is_file() && self.classifier.is_payload(entry.path()) {
                        checks.push(self.check_payload(entry.path()));
                    }
                }
                Err(e) => {
                    log::warn!("Error walking {}: {}", directory.display(), e);
                    if let Some(path) = e.path() {
                        checks.push(PayloadCheck {
                            path: path.to_path_buf(),
                            error: Some(ValidationError::Io {
                                path: path.to_path_buf(),
                                message: e.to_string(),
                            }),
                        });
                    }
                }
            }
        }

        checks
    }

    fn check_payload(&self, path: &Path) -> PayloadCheck {
        let result = check_file_signature(path, &self.magic).into_result(path, &self.magic);
        PayloadCheck {
            path: path.to_path_buf(),
            error: result.err(),
        }
    }
}

/// A candidate must be a regular file this process can open.
fn check_input(candidate: &Path) -> Result<(), ValidationError> {
    match fs::metadata(candidate) {
        Ok(metadata) if metadata.is_file() => {
            File::open(candidate).map(drop).map_err(|e| {
                log::warn!("File {} cannot be opened: {}", candidate.display(), e);
                ValidationError::io(candidate, &e)
            })
        }
        Ok(_) => {
            log::warn!("{} is not a regular file.", candidate.display());
            Err(ValidationError::missing(candidate))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::warn!("File {} does not exist.", candidate.display());
            Err(ValidationError::missing(candidate))
        }
        Err(e) => Err(ValidationError::io(candidate, &e)),
    }
}
