use anyhow::Result;
use clap::Parser;
use sqlscan::cli::{Cli, Commands};
use sqlscan::commands::{handle_scan, ScanConfig};
use sqlscan::config::load_config;
use sqlscan::core::{Confidence, FormatTag};
use sqlscan::observability::{init_tracing, install_panic_hook};
use std::path::PathBuf;

fn main() -> Result<()> {
    install_panic_hook();
    let cli = Cli::parse();

    match cli.command {
        command @ Commands::Scan { .. } => handle_scan_command(command),
        Commands::Init { force } => {
            init_tracing(0);
            sqlscan::commands::init::init_config(force)
        }
    }
}

// Merge CLI flags over the configuration file, then run the scan
fn handle_scan_command(command: Commands) -> Result<()> {
    let Commands::Scan {
        path,
        repo,
        output,
        format,
        min_confidence,
        formats,
        ignore,
        no_parallel,
        jobs,
        verbose,
        no_summary,
        quiet,
    } = command
    else {
        return Ok(());
    };

    init_tracing(verbose);
    let config = load_config();

    let mut ignore_patterns = config.get_ignore_patterns();
    ignore_patterns.extend(ignore);

    let scan = ScanConfig {
        path: path.unwrap_or_else(|| PathBuf::from(".")),
        repo,
        output,
        format: format.or(config.output_format()).unwrap_or_default(),
        min_confidence: min_confidence
            .map(Confidence::from)
            .or(config.min_confidence())
            .unwrap_or(Confidence::Probable),
        formats: formats.unwrap_or_else(|| FormatTag::ALL.to_vec()),
        ignore_patterns,
        parallel: !no_parallel,
        jobs,
        show_summary: !no_summary,
        quiet,
    };

    handle_scan(scan, &config)?;
    Ok(())
}
