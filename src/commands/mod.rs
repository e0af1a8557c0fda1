//! CLI command implementations.
//!
//! Available commands:
//! - **scan**: Validate every package under a directory
//! - **init**: Initialize a new `.unitycheck.toml` configuration file

pub mod init;
pub mod scan;

pub use init::init_config;
pub use scan::{
    exit_code, handle_scan, resolve_runner_settings, ScanOptions, EXIT_FAILURES, EXIT_FATAL,
    EXIT_OK,
};
