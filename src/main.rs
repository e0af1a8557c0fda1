use clap::Parser;
use log::LevelFilter;
use std::process::ExitCode;
use unitycheck::cli::{Cli, Commands};
use unitycheck::commands::{self, ScanOptions, EXIT_FATAL, EXIT_OK};
use unitycheck::observability::install_panic_hook;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.command.verbosity(), cli.command.is_quiet());
    install_panic_hook();

    match run(cli.command) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(EXIT_FATAL)
        }
    }
}

fn run(command: Commands) -> anyhow::Result<u8> {
    match command {
        Commands::Init { force } => {
            commands::init_config(force)?;
            Ok(EXIT_OK)
        }
        Commands::Scan {
            path,
            config,
            format,
            output,
            candidate_suffix,
            payload_suffix,
            immediate_cleanup,
            no_quarantine,
            quarantine_dir,
            verbosity,
            quiet,
            plain,
        } => {
            let options = ScanOptions {
                path,
                config,
                format,
                output,
                candidate_suffix,
                payload_suffix,
                immediate_cleanup,
                no_quarantine,
                quarantine_dir,
                verbosity,
                quiet,
                plain,
            };
            let summary = commands::handle_scan(options)?;
            Ok(commands::exit_code(&summary))
        }
    }
}

// RUST_LOG, when set, takes precedence over the flags
fn init_logging(verbosity: u8, quiet: bool) {
    let level = match (quiet, verbosity) {
        (true, _) => LevelFilter::Error,
        (false, 0) => LevelFilter::Warn,
        (false, 1) => LevelFilter::Info,
        (false, 2) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .parse_default_env()
        .init();
}
