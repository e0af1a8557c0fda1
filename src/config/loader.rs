use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::core::UnitycheckConfig;

pub const CONFIG_FILE_NAME: &str = ".unitycheck.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

pub(crate) fn read_config_file(path: &Path) -> Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string.
pub fn parse_and_validate_config(contents: &str) -> Result<UnitycheckConfig, String> {
    let config = toml::from_str::<UnitycheckConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if let Some(scan) = &config.scan {
        if scan.candidate_suffix.is_empty() || scan.payload_suffix.is_empty() {
            return Err("scan suffixes must not be empty".to_string());
        }
    }

    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<UnitycheckConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_and_validate_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Only log actual errors, not "file not found"
pub(crate) fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// `start` followed by its ancestors, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search `start` and its ancestors for `.unitycheck.toml`.
pub fn load_config_from_dir(start: &Path) -> UnitycheckConfig {
    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            log::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            UnitycheckConfig::default()
        })
}

/// Search from the current directory upward.
pub fn load_config() -> UnitycheckConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from_dir(&dir),
        Err(e) => {
            log::warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            UnitycheckConfig::default()
        }
    }
}

/// Load an explicitly requested config file. Unlike discovery, a missing or
/// invalid file is an error here.
pub fn load_config_file(path: &Path) -> Result<UnitycheckConfig> {
    let contents = read_config_file(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse_and_validate_config(&contents).map_err(anyhow::Error::msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CleanupMode, ScanConfig};
    use indoc::indoc;
    use tempfile::TempDir;

    #[test]
    fn test_parse_full_config() {
        let config = parse_and_validate_config(indoc! {r#"
            [scan]
            candidate_suffix = ".gz"
            payload_suffix = ".zip"

            [cleanup]
            mode = "immediate"

            [quarantine]
            enabled = false
            directory = "bad"
        "#})
        .unwrap();

        assert_eq!(
            config.scan,
            Some(ScanConfig {
                candidate_suffix: ".gz".into(),
                payload_suffix: ".zip".into()
            })
        );
        assert_eq!(config.cleanup.unwrap().mode, CleanupMode::Immediate);
        let quarantine = config.quarantine.unwrap();
        assert!(!quarantine.enabled);
        assert_eq!(quarantine.directory, PathBuf::from("bad"));
    }

    #[test]
    fn test_partial_sections_use_defaults() {
        let config = parse_and_validate_config(indoc! {r#"
            [quarantine]
            directory = "elsewhere"
        "#})
        .unwrap();

        let quarantine = config.quarantine.unwrap();
        assert!(quarantine.enabled);
        assert!(config.scan.is_none());
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let result = parse_and_validate_config(indoc! {r#"
            [scan]
            candidate_suffix = ""
        "#});
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(parse_and_validate_config("[scan").is_err());
    }

    #[test]
    fn test_directory_ancestors_depth_limit() {
        let dirs: Vec<_> = directory_ancestors(PathBuf::from("/a/b/c/d"), 3).collect();
        assert_eq!(
            dirs,
            vec![
                PathBuf::from("/a/b/c/d"),
                PathBuf::from("/a/b/c"),
                PathBuf::from("/a/b")
            ]
        );
    }

    #[test]
    fn test_load_config_from_parent_directory() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("x/y");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[cleanup]\nmode = \"immediate\"\n",
        )
        .unwrap();

        let config = load_config_from_dir(&nested);
        assert_eq!(config.cleanup.unwrap().mode, CleanupMode::Immediate);
    }

    #[test]
    fn test_invalid_config_falls_back_to_default() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join(CONFIG_FILE_NAME), "not = [valid").unwrap();

        // Parent directories of a temp dir are not expected to carry a config
        let config = try_load_config_from_path(&temp.path().join(CONFIG_FILE_NAME));
        assert!(config.is_none());
    }

    #[test]
    fn test_explicit_missing_config_is_error() {
        let temp = TempDir::new().unwrap();
        assert!(load_config_file(&temp.path().join("absent.toml")).is_err());
    }
}
