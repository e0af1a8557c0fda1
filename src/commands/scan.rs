use crate::batch::{render_json, render_terminal, BatchRunner, BatchSummary, RunnerOptions};
use crate::cli::OutputFormat;
use crate::config::{load_config, load_config_file, CleanupMode, UnitycheckConfig};
use crate::detection::SuffixClassifier;
use crate::formatting::FormattingConfig;
use crate::io;
use crate::pipeline::Pipeline;
use crate::progress::{ProgressConfig, ProgressManager};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Every candidate passed.
pub const EXIT_OK: u8 = 0;
/// At least one candidate failed validation.
pub const EXIT_FAILURES: u8 = 1;
/// The batch could not run (bad root, unreadable config).
pub const EXIT_FATAL: u8 = 2;

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub path: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub output: Option<PathBuf>,
    pub candidate_suffix: Option<String>,
    pub payload_suffix: Option<String>,
    pub immediate_cleanup: bool,
    pub no_quarantine: bool,
    pub quarantine_dir: Option<PathBuf>,
    pub verbosity: u8,
    pub quiet: bool,
    pub plain: bool,
}

/// CLI flags layered over the config file.
///
/// Relative quarantine directories resolve against `working_dir`.
pub fn resolve_runner_settings(
    options: &ScanOptions,
    config: &UnitycheckConfig,
    working_dir: &Path,
) -> (SuffixClassifier, RunnerOptions) {
    let scan = config.scan_or_default();
    let classifier = SuffixClassifier::new(
        options
            .candidate_suffix
            .clone()
            .unwrap_or(scan.candidate_suffix),
        options.payload_suffix.clone().unwrap_or(scan.payload_suffix),
    );

    let cleanup_mode = if options.immediate_cleanup {
        CleanupMode::Immediate
    } else {
        config.cleanup_mode()
    };

    let quarantine = config.quarantine_or_default();
    let quarantine_dir = if options.no_quarantine || !quarantine.enabled {
        None
    } else {
        let dir = options
            .quarantine_dir
            .clone()
            .unwrap_or(quarantine.directory);
        Some(working_dir.join(dir))
    };

    (
        classifier,
        RunnerOptions {
            cleanup_mode,
            quarantine_dir,
        },
    )
}

pub fn handle_scan(options: ScanOptions) -> Result<BatchSummary> {
    let config = match &options.config {
        Some(path) => load_config_file(path)?,
        None => load_config(),
    };

    let working_dir = std::env::current_dir().context("Failed to get current directory")?;
    let root = options.path.clone().unwrap_or_else(|| working_dir.clone());
    let (classifier, runner_options) = resolve_runner_settings(&options, &config, &working_dir);

    let progress = ProgressManager::new(ProgressConfig::from_env(options.quiet, options.verbosity));
    let runner =
        BatchRunner::new(Pipeline::new(classifier), runner_options).with_progress(progress);

    let summary = runner
        .run(&root)
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    let formatting = if options.plain {
        FormattingConfig::plain()
    } else {
        FormattingConfig::from_env()
    };

    let rendered = match options.format {
        OutputFormat::Terminal => render_terminal(&summary, formatting),
        OutputFormat::Json => render_json(&summary)?,
    };

    match &options.output {
        Some(path) => io::write_file(path, &rendered)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?,
        None => println!("{}", rendered),
    }

    Ok(summary)
}

pub fn exit_code(summary: &BatchSummary) -> u8 {
    if summary.is_clean() {
        EXIT_OK
    } else {
        EXIT_FAILURES
    }
}
