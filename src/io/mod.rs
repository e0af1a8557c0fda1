pub mod walker;

pub use walker::{find_candidate_files, FileWalker};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn write_file(path: &Path, content: &str) -> io::Result<()> {
    fs::write(path, content)
}

pub fn ensure_dir(path: &Path) -> io::Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

pub fn file_exists(path: &Path) -> bool {
    path.exists() && path.is_file()
}

/// Move `path` into `dir`, keeping its file name.
///
/// An existing file of the same name is never overwritten; a numeric suffix
/// is appended instead. Falls back to copy + remove when the rename crosses
/// filesystems.
pub fn move_into_dir(path: &Path, dir: &Path) -> io::Result<PathBuf> {
    let name = path.file_name().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{} has no file name", path.display()),
        )
    })?;
    let destination = unique_destination(&dir.join(name));

    match fs::rename(path, &destination) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            fs::copy(path, &destination)?;
            fs::remove_file(path)?;
        }
        Err(e) => return Err(e),
    }

    Ok(destination)
}

fn unique_destination(preferred: &Path) -> PathBuf {
    if !preferred.exists() {
        return preferred.to_path_buf();
    }

    (1..)
        .map(|n| {
            let mut name = preferred.as_os_str().to_owned();
            name.push(format!(".{}", n));
            PathBuf::from(name)
        })
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| preferred.to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_move_into_dir_keeps_name() {
        let temp = TempDir::new().unwrap();
        let src = temp.path().join("a.unitypackage");
        let dest_dir = temp.path().join("out");
        fs::write(&src, b"x").unwrap();
        fs::create_dir(&dest_dir).unwrap();

        let moved = move_into_dir(&src, &dest_dir).unwrap();

        assert_eq!(moved, dest_dir.join("a.unitypackage"));
        assert!(!src.exists());
        assert!(moved.is_file());
    }

    #[test]
    fn test_move_into_dir_does_not_overwrite() {
        let temp = TempDir::new().unwrap();
        let dest_dir = temp.path().join("out");
        fs::create_dir(&dest_dir).unwrap();
        fs::write(dest_dir.join("a.unitypackage"), b"first").unwrap();

        let src = temp.path().join("a.unitypackage");
        fs::write(&src, b"second").unwrap();

        let moved = move_into_dir(&src, &dest_dir).unwrap();

        assert_eq!(moved, dest_dir.join("a.unitypackage.1"));
        assert_eq!(fs::read(dest_dir.join("a.unitypackage")).unwrap(), b"first");
        assert_eq!(fs::read(&moved).unwrap(), b"second");
    }

    #[test]
    fn test_ensure_dir_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("a/b");
        ensure_dir(&dir).unwrap();
        ensure_dir(&dir).unwrap();
        assert!(dir.is_dir());
    }
}
