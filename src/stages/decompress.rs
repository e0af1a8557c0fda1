use super::{artifact_path, UNZIPPED_SUFFIX};
use crate::batch::BatchState;
use crate::errors::{Stage, ValidationError};
use flate2::bufread::MultiGzDecoder;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Decompressed sibling of a candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompressedArtifact {
    pub path: PathBuf,
    pub bytes_written: u64,
}

/// Stream `path` through a gzip decoder into `<path>.unzipped`.
///
/// Concatenated gzip members are decoded as one stream. A bad header, a
/// truncated body or a checksum mismatch all fail the stage. A zero-byte
/// input decodes to an empty artifact, leaving the verdict to the signature
/// check.
pub fn decompress(
    path: &Path,
    state: &mut BatchState,
) -> Result<DecompressedArtifact, ValidationError> {
    let output = artifact_path(path, UNZIPPED_SUFFIX);

    let input = File::open(path).map_err(|e| {
        log::warn!("Error extracting {}: {}", path.display(), e);
        ValidationError::io(path, &e)
    })?;
    let is_empty = input.metadata().map(|m| m.len() == 0).unwrap_or(false);

    state.register_artifact(&output);
    let out_file = File::create(&output).map_err(|e| {
        log::warn!("Error creating {}: {}", output.display(), e);
        ValidationError::io(&output, &e)
    })?;

    let bytes_written = if is_empty {
        log::debug!("{} is empty, nothing to decode", path.display());
        0
    } else {
        let mut decoder = MultiGzDecoder::new(BufReader::new(input));
        let mut writer = BufWriter::new(out_file);
        io::copy(&mut decoder, &mut writer)
            .and_then(|n| writer.flush().map(|_| n))
            .map_err(|e| {
                log::warn!("Error extracting {}: {}", path.display(), e);
                ValidationError::decode(Stage::Decompress, path, e.to_string())
            })?
    };

    log::info!(
        "Successfully extracted GZIP: {} -> {} ({} bytes)",
        path.display(),
        output.display(),
        bytes_written
    );

    Ok(DecompressedArtifact {
        path: output,
        bytes_written,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use tempfile::TempDir;

    fn gzip(bytes: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(bytes).unwrap();
        encoder.finish().unwrap()
    }

    #[test]
    fn test_decompress_writes_sibling() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("a.unitypackage");
        std::fs::write(&input, gzip(b"PK\x03\x04payload")).unwrap();

        let mut state = BatchState::new();
        let artifact = decompress(&input, &mut state).unwrap();

        assert_eq!(artifact.path, temp.path().join("a.unitypackage.unzipped"));
        assert_eq!(artifact.bytes_written, 11);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"PK\x03\x04payload");
        assert_eq!(state.pending_cleanup(), &[artifact.path.clone()]);
    }

    #[test]
    fn test_decompress_concatenated_members() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("multi.unitypackage");
        let mut bytes = gzip(b"first-");
        bytes.extend(gzip(b"second"));
        std::fs::write(&input, bytes).unwrap();

        let mut state = BatchState::new();
        let artifact = decompress(&input, &mut state).unwrap();
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"first-second");
    }

    #[test]
    fn test_decompress_rejects_plain_bytes() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("plain.unitypackage");
        std::fs::write(&input, b"this is not gzip data at all").unwrap();

        let mut state = BatchState::new();
        let err = decompress(&input, &mut state).unwrap_err();

        assert!(matches!(
            err,
            ValidationError::Decode {
                stage: Stage::Decompress,
                ..
            }
        ));
        // The partial output is still queued for cleanup
        assert_eq!(state.pending_cleanup().len(), 1);
    }

    #[test]
    fn test_empty_input_decodes_to_empty_artifact() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("e.unitypackage");
        std::fs::write(&input, b"").unwrap();

        let mut state = BatchState::new();
        let artifact = decompress(&input, &mut state).unwrap();

        assert_eq!(artifact.bytes_written, 0);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), b"");
        assert_eq!(state.pending_cleanup(), &[artifact.path.clone()]);
    }

    #[test]
    fn test_decompress_rejects_truncated_stream() {
        let temp = TempDir::new().unwrap();
        let input = temp.path().join("cut.unitypackage");
        let full = gzip(&[7u8; 4096]);
        std::fs::write(&input, &full[..full.len() / 2]).unwrap();

        let mut state = BatchState::new();
        assert!(decompress(&input, &mut state).is_err());
    }

    #[test]
    fn test_decompress_missing_input_is_io_and_registers_nothing() {
        let temp = TempDir::new().unwrap();
        let mut state = BatchState::new();

        let err = decompress(&temp.path().join("absent"), &mut state).unwrap_err();

        assert_eq!(err.reason_code(), "io");
        assert!(state.pending_cleanup().is_empty());
    }
}
