//! Progress feedback for batch scans, using `indicatif`.
//!
//! - **Quiet Mode**: no progress output (`UNITYCHECK_QUIET` env var or `--quiet`)
//! - **Non-TTY**: progress bars are hidden in CI and piped output

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_SCAN: &str = "📦 {msg} {pos}/{len} packages ({percent}%) - {eta}";

#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
    /// 0 = basic, 1 = detailed, 2+ = very detailed
    pub verbosity: u8,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool, verbosity: u8) -> Self {
        let env_quiet = std::env::var("UNITYCHECK_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
            verbosity,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        // Log lines and a live bar interleave badly; verbose runs skip the bar
        if self.verbosity > 0 {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProgressManager {
    config: ProgressConfig,
}

impl ProgressManager {
    pub fn new(config: ProgressConfig) -> Self {
        Self { config }
    }

    /// Returns a hidden bar if progress should not be shown.
    pub fn create_bar(&self, len: u64, template: &str) -> ProgressBar {
        if !self.config.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        match ProgressStyle::default_bar().template(template) {
            Ok(style) => pb.set_style(style.progress_chars("█▓▒░  ")),
            Err(e) => log::debug!("Invalid progress bar template: {}", e),
        }
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_quiet_flag() {
        let config = ProgressConfig::from_env(true, 0);
        assert!(!config.should_show_progress());
    }

    #[test]
    fn test_verbose_disables_bar() {
        let config = ProgressConfig {
            quiet_mode: false,
            verbosity: 1,
        };
        assert!(!config.should_show_progress());
    }

    #[test]
    fn test_manager_creates_hidden_bar_in_quiet_mode() {
        let manager = ProgressManager::new(ProgressConfig {
            quiet_mode: true,
            verbosity: 0,
        });
        assert!(manager.create_bar(10, TEMPLATE_SCAN).is_hidden());
    }
}
