use colored::*;
use std::env;
use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    Auto,   // Detect based on terminal
    Always, // Force colors on
    Never,  // Force colors off
}

impl ColorMode {
    pub fn should_use_color(&self) -> bool {
        match self {
            Self::Always => true,
            Self::Never => false,
            Self::Auto => detect_color_support(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FormattingConfig {
    pub color: ColorMode,
}

impl Default for FormattingConfig {
    fn default() -> Self {
        Self {
            color: ColorMode::Auto,
        }
    }
}

impl FormattingConfig {
    pub fn new(color: ColorMode) -> Self {
        Self { color }
    }

    /// Honors `NO_COLOR`, `CLICOLOR=0` and `CLICOLOR_FORCE=1`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if env::var("NO_COLOR").is_ok() {
            config.color = ColorMode::Never;
        }

        if let Ok(val) = env::var("CLICOLOR") {
            if val == "0" {
                config.color = ColorMode::Never;
            }
        }

        if let Ok(val) = env::var("CLICOLOR_FORCE") {
            if val == "1" {
                config.color = ColorMode::Always;
            }
        }

        config
    }

    pub fn plain() -> Self {
        Self::new(ColorMode::Never)
    }
}

/// Applies terminal styling when color is enabled, passes text through otherwise.
#[derive(Debug, Clone, Copy)]
pub struct Styler {
    enabled: bool,
}

impl Styler {
    pub fn new(config: FormattingConfig) -> Self {
        let enabled = config.color.should_use_color();
        if enabled {
            // Styling was requested explicitly or a TTY was detected
            colored::control::set_override(true);
        }
        Self { enabled }
    }

    pub fn success(&self, text: &str) -> String {
        self.paint(text, |s| s.green())
    }

    pub fn error(&self, text: &str) -> String {
        self.paint(text, |s| s.red())
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint(text, |s| s.yellow())
    }

    pub fn header(&self, text: &str) -> String {
        self.paint(text, |s| s.blue().bold())
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint(text, |s| s.dimmed())
    }

    fn paint(&self, text: &str, style: impl FnOnce(&str) -> ColoredString) -> String {
        if self.enabled {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}

fn detect_color_support() -> bool {
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    std::io::stdout().is_terminal()
}
