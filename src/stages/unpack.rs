use super::{artifact_path, EXTRACTED_SUFFIX};
use crate::batch::BatchState;
use crate::errors::{Stage, ValidationError};
use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Directory produced by unpacking a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedContainer {
    pub directory: PathBuf,
    pub entries: usize,
}

/// Extract every entry of the tar at `path` into `<path>.extracted`.
///
/// Any entry that cannot be read or written fails the whole stage.
pub fn unpack(path: &Path, state: &mut BatchState) -> Result<UnpackedContainer, ValidationError> {
    let target = artifact_path(path, EXTRACTED_SUFFIX);
    let fail = |message: String| {
        log::warn!("Error extracting TAR: {}: {}", path.display(), message);
        ValidationError::decode(Stage::Unpack, path, message)
    };

    let file = File::open(path).map_err(|e| fail(e.to_string()))?;

    state.register_artifact(&target);
    fs::create_dir_all(&target).map_err(|e| fail(format!("{}: {}", target.display(), e)))?;

    let mut archive = tar::Archive::new(BufReader::new(file));
    let mut entries = 0;
    let mut skipped = 0;

    for entry in archive.entries().map_err(|e| fail(e.to_string()))? {
        let mut entry = entry.map_err(|e| fail(e.to_string()))?;
        let name = entry
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|_| "<unreadable name>".to_string());

        let unpacked = entry
            .unpack_in(&target)
            .map_err(|e| fail(format!("entry {}: {}", name, e)))?;

        if unpacked {
            entries += 1;
        } else {
            log::warn!("Skipped entry {} outside of {}", name, target.display());
            skipped += 1;
        }
    }

    log::info!(
        "Successfully extracted TAR: {} ({} entries, {} skipped)",
        path.display(),
        entries,
        skipped
    );

    Ok(UnpackedContainer {
        directory: target,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn tar_bytes(entries: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_unpack_extracts_entries() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("a.unitypackage.unzipped");
        std::fs::write(
            &path,
            tar_bytes(&[("g1/asset", b"one"), ("g2/Inner.unitypackage", b"PK\x03\x04")]),
        )
        .unwrap();

        let mut state = BatchState::new();
        let unpacked = unpack(&path, &mut state).unwrap();

        assert_eq!(
            unpacked.directory,
            temp.path().join("a.unitypackage.unzipped.extracted")
        );
        assert_eq!(unpacked.entries, 2);
        assert_eq!(
            std::fs::read(unpacked.directory.join("g2/Inner.unitypackage")).unwrap(),
            b"PK\x03\x04"
        );
        assert_eq!(state.pending_cleanup(), &[unpacked.directory.clone()]);
    }

    #[test]
    fn test_unpack_truncated_container_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("cut.unzipped");
        let bytes = tar_bytes(&[("big", &[1u8; 4096])]);
        // Header intact, body cut short
        std::fs::write(&path, &bytes[..1024]).unwrap();

        let mut state = BatchState::new();
        let err = unpack(&path, &mut state).unwrap_err();

        assert!(matches!(
            err,
            ValidationError::Decode {
                stage: Stage::Unpack,
                ..
            }
        ));
        // Directory was created before the failure and must still be reclaimed
        assert_eq!(state.pending_cleanup().len(), 1);
    }
}
