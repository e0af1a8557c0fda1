// Core configuration types
mod core;
mod loader;

pub use self::core::{
    CleanupConfig, CleanupMode, QuarantineConfig, ScanConfig, UnitycheckConfig,
    DEFAULT_QUARANTINE_DIR,
};
pub use loader::{
    directory_ancestors, load_config, load_config_file, load_config_from_dir,
    parse_and_validate_config, CONFIG_FILE_NAME,
};

impl UnitycheckConfig {
    pub fn scan_or_default(&self) -> ScanConfig {
        self.scan.clone().unwrap_or_default()
    }

    pub fn cleanup_mode(&self) -> CleanupMode {
        self.cleanup
            .as_ref()
            .map(|cleanup| cleanup.mode)
            .unwrap_or_default()
    }

    pub fn quarantine_or_default(&self) -> QuarantineConfig {
        self.quarantine.clone().unwrap_or_default()
    }
}

/// Template written by `unitycheck init`.
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# unitycheck configuration

[scan]
candidate_suffix = ".unitypackage"
payload_suffix = ".unitypackage"

[cleanup]
# "deferred" removes temporary artifacts once the batch completes,
# "immediate" removes them after every file
mode = "deferred"

[quarantine]
enabled = true
directory = "corrupted"
"#;
