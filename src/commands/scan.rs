use crate::config::SqlscanConfig;
use crate::core::{Confidence, FormatTag};
use crate::io;
use crate::io::output::{create_writer, write_summary, OutputFormat};
use crate::io::walker::FileWalker;
use crate::observability::{set_phase, ScanPhase};
use crate::pipeline::{scan_files, ScanOptions, ScanSummary};
use crate::progress::ProgressConfig;
use crate::recognizer::Recognizer;
use crate::source;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Everything `sqlscan scan` needs, after CLI flags were merged with the
/// configuration file.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub path: PathBuf,
    pub repo: Option<String>,
    pub output: Option<PathBuf>,
    pub format: OutputFormat,
    pub min_confidence: Confidence,
    pub formats: Vec<FormatTag>,
    pub ignore_patterns: Vec<String>,
    pub parallel: bool,
    pub jobs: usize,
    pub show_summary: bool,
    pub quiet: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            repo: None,
            output: None,
            format: OutputFormat::default(),
            min_confidence: Confidence::Probable,
            formats: FormatTag::ALL.to_vec(),
            ignore_patterns: Vec::new(),
            parallel: true,
            jobs: 0,
            show_summary: true,
            quiet: false,
        }
    }
}

/// Configure rayon global thread pool once at startup
pub fn configure_thread_pool(jobs: usize) {
    let mut builder = rayon::ThreadPoolBuilder::new();
    if jobs > 0 {
        builder = builder.num_threads(jobs);
    }
    if let Err(e) = builder.build_global() {
        tracing::debug!("Thread pool already configured: {}", e);
    }
}

pub fn handle_scan(scan: ScanConfig, file_config: &SqlscanConfig) -> Result<ScanSummary> {
    if scan.parallel {
        configure_thread_pool(scan.jobs);
    }

    let recognizer = Recognizer::from_config(&file_config.recognizer_config())
        .context("Invalid recognizer configuration")?;

    let cloned = match &scan.repo {
        Some(url) => {
            let _phase = set_phase(ScanPhase::Acquisition);
            Some(source::clone_repo(url)?)
        }
        None => None,
    };
    let root = cloned
        .as_ref()
        .map(|repo| repo.path().to_path_buf())
        .unwrap_or_else(|| scan.path.clone());
    let output = scan.output.clone().or_else(|| {
        cloned
            .as_ref()
            .map(|repo| PathBuf::from(repo.spec.default_output_name()))
    });

    let mut walked = {
        let _phase = set_phase(ScanPhase::FileDiscovery);
        FileWalker::new(root.clone())
            .with_formats(scan.formats.clone())
            .with_ignore_patterns(scan.ignore_patterns.clone())
            .with_extension_overrides(file_config.extension_overrides())
            .walk()
            .with_context(|| format!("Failed to walk {}", root.display()))?
    };
    tracing::info!(files = walked.success_count(), root = %root.display(), "discovered files");

    let options = ScanOptions {
        recognizer,
        parallel: scan.parallel,
    };
    let progress = ProgressConfig::from_env(scan.quiet).file_bar(walked.successes.len() as u64);
    let mut results = scan_files(&walked.successes, &options, &progress);
    results.failures.append(&mut walked.failures);

    let _phase = set_phase(ScanPhase::OutputGeneration);
    let sink = io::open_output(output.as_deref())?;
    let mut writer = create_writer(scan.format, sink, scan.min_confidence);
    for report in &results.successes {
        writer.write_report(report)?;
    }
    writer.finish()?;

    let summary = ScanSummary::from_results(&results, scan.min_confidence);
    if scan.show_summary {
        write_summary(&mut std::io::stderr(), &summary, &results.failures)?;
        if let Some(output) = &output {
            eprintln!("  Output: {}", output.display());
        }
    }
    Ok(summary)
}
