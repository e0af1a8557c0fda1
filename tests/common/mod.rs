// Package fixtures shared by the unitycheck integration tests
#![allow(dead_code)]

use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Bytes that start with the ZIP local-file-header magic.
pub const GOOD_PAYLOAD: &[u8] = b"PK\x03\x04 unity asset payload";

/// Bytes with no recognizable signature.
pub const BAD_PAYLOAD: &[u8] = b"NOPE this is not a zip archive";

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data).expect("Failed to gzip fixture");
    encoder.finish().expect("Failed to finish gzip fixture")
}

/// An uncompressed tar container holding `entries` as regular files.
pub fn tar(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (name, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, *data)
            .expect("Failed to append tar entry");
    }
    builder.into_inner().expect("Failed to finish tar fixture")
}

/// A gzip stream cut off inside its header.
pub fn truncated_gzip() -> Vec<u8> {
    let mut bytes = gzip(GOOD_PAYLOAD);
    bytes.truncate(5);
    bytes
}

pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Gzipped package whose decompressed bytes are not a container.
pub fn write_raw_package(dir: &Path, name: &str, payload: &[u8]) -> PathBuf {
    write_fixture(dir, name, &gzip(payload))
}

/// Gzipped tar package holding the given entries.
pub fn write_container_package(dir: &Path, name: &str, entries: &[(&str, &[u8])]) -> PathBuf {
    write_fixture(dir, name, &gzip(&tar(entries)))
}

/// A scan root with one valid, one mis-signed and one truncated package.
pub fn mixed_tree() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp dir");
    write_raw_package(temp.path(), "a.unitypackage", GOOD_PAYLOAD);
    write_raw_package(temp.path(), "b.unitypackage", BAD_PAYLOAD);
    write_fixture(temp.path(), "nested/c.unitypackage", &truncated_gzip());
    write_fixture(temp.path(), "notes.txt", b"not a candidate");
    temp
}

/// Every path below `root`, relative to it.
pub fn list_tree(root: &Path) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .filter_map(Result::ok)
        .map(|entry| {
            entry
                .path()
                .strip_prefix(root)
                .map(Path::to_path_buf)
                .unwrap_or_else(|_| entry.path().to_path_buf())
        })
        .collect();
    paths.sort();
    paths
}
