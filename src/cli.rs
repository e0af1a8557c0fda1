use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Terminal,
    /// Machine-readable summary
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "unitycheck")]
#[command(about = "Staged integrity checker for Unity asset packages", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate every package under a directory
    Scan {
        /// Directory to scan (defaults to the current directory)
        path: Option<PathBuf>,

        /// Configuration file (defaults to the nearest .unitycheck.toml)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file for the summary (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// File name suffix of packages to validate
        #[arg(long = "candidate-suffix")]
        candidate_suffix: Option<String>,

        /// File name suffix of payload entries inside a container
        #[arg(long = "payload-suffix")]
        payload_suffix: Option<String>,

        /// Remove temporary artifacts after each package instead of at the end
        #[arg(long = "immediate-cleanup")]
        immediate_cleanup: bool,

        /// Report failures without moving them
        #[arg(long = "no-quarantine")]
        no_quarantine: bool,

        /// Where corrupted packages are moved
        #[arg(long = "quarantine-dir", env = "UNITYCHECK_QUARANTINE_DIR")]
        quarantine_dir: Option<PathBuf>,

        /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
        /// -v: Show every pipeline event
        /// -vv: Show state transitions and artifact bookkeeping
        /// -vvv: Show all trace information
        #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
        verbosity: u8,

        /// Suppress progress output and warnings
        #[arg(short, long)]
        quiet: bool,

        /// Plain output without colors
        #[arg(long)]
        plain: bool,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}

impl Commands {
    pub fn verbosity(&self) -> u8 {
        match self {
            Self::Scan { verbosity, .. } => *verbosity,
            Self::Init { .. } => 0,
        }
    }

    pub fn is_quiet(&self) -> bool {
        matches!(self, Self::Scan { quiet: true, .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["unitycheck", "scan"]).unwrap();
        match cli.command {
            Commands::Scan {
                path,
                format,
                immediate_cleanup,
                no_quarantine,
                verbosity,
                ..
            } => {
                assert!(path.is_none());
                assert_eq!(format, OutputFormat::Terminal);
                assert!(!immediate_cleanup);
                assert!(!no_quarantine);
                assert_eq!(verbosity, 0);
            }
            Commands::Init { .. } => panic!("expected scan"),
        }
    }

    #[test]
    fn test_scan_flags() {
        let cli = Cli::try_parse_from([
            "unitycheck",
            "scan",
            "assets",
            "--format",
            "json",
            "--immediate-cleanup",
            "--no-quarantine",
            "-vv",
        ])
        .unwrap();
        assert_eq!(cli.command.verbosity(), 2);
        match cli.command {
            Commands::Scan { path, format, .. } => {
                assert_eq!(path, Some(PathBuf::from("assets")));
                assert_eq!(format, OutputFormat::Json);
            }
            Commands::Init { .. } => panic!("expected scan"),
        }
    }

    #[test]
    fn test_init_force() {
        let cli = Cli::try_parse_from(["unitycheck", "init", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Init { force: true }));
    }
}
