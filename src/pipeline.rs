//! Wires segmenter, recognizer and normalizer together.
//!
//! [`extract`] is a pure function of one [`SourceFile`]. Batch scans run it
//! per file, optionally in parallel, and collect per-file failures instead of
//! stopping.

use crate::core::{
    Confidence, FormatTag, LineIndex, Result, SourceFile, Statement, StatementKind,
};
use crate::errors::{ScanFailure, ScanResults};
use crate::io::walker::WalkedFile;
use crate::normalizer::normalize;
use crate::observability::{set_current_file, set_phase, ScanPhase};
use crate::recognizer::{default_recognizer, Recognizer};
use crate::segmenter::segment;
use indicatif::{ParallelProgressIterator, ProgressBar, ProgressIterator};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, debug_span, info_span, warn};

/// Statements of one file with the built-in recognizer settings.
pub fn extract(file: &SourceFile) -> Vec<Statement> {
    extract_with(file, default_recognizer())
}

/// Statements of one file, in file-content order.
pub fn extract_with(file: &SourceFile, recognizer: &Recognizer) -> Vec<Statement> {
    let _span = debug_span!("extract", path = %file.path.display(), format = %file.format).entered();

    let lines = LineIndex::new(&file.content);
    let mut candidates = 0usize;
    let statements: Vec<Statement> = segment(&file.content, file.format)
        .inspect(|_| candidates += 1)
        .filter_map(|span| {
            let m = recognizer.recognize(&span)?;
            let line = lines.line_of(m.start);
            Some(normalize(m, line).with_file(&file.path))
        })
        .collect();

    debug!(candidates, statements = statements.len(), "extracted");
    statements
}

/// Decode `bytes` as a file of the given wire tag and extract from it.
///
/// Fails with `UnsupportedFormat` for an unknown tag and `Decode` for
/// content that is not UTF-8.
pub fn extract_tagged(path: impl Into<PathBuf>, tag: &str, bytes: Vec<u8>) -> Result<Vec<Statement>> {
    let file = SourceFile::from_tagged(path, tag, bytes)?;
    Ok(extract(&file))
}

/// Everything found in one scanned file.
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// Path as reported, relative to the scan root
    pub path: PathBuf,
    pub format: FormatTag,
    pub statements: Vec<Statement>,
}

impl FileReport {
    /// Statements at or above `min` confidence.
    pub fn statements_at_least(&self, min: Confidence) -> impl Iterator<Item = &Statement> {
        self.statements.iter().filter(move |s| s.confidence >= min)
    }
}

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub recognizer: Recognizer,
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recognizer: default_recognizer().clone(),
            parallel: true,
        }
    }
}

/// Read and extract one walked file.
pub fn scan_file(file: &WalkedFile, recognizer: &Recognizer) -> std::result::Result<FileReport, ScanFailure> {
    let _file_guard = set_current_file(&file.path);

    let source = SourceFile::read(&file.path, file.format).map_err(|e| {
        warn!(path = %file.path.display(), error = %e, "skipping file");
        ScanFailure::from_error(file.relative.clone(), &e)
    })?;

    let statements = extract_with(&source, recognizer)
        .into_iter()
        .map(|s| s.with_file(&file.relative))
        .collect();

    Ok(FileReport {
        path: file.relative.clone(),
        format: file.format,
        statements,
    })
}

/// Scan every file, keeping input order in the results.
pub fn scan_files(
    files: &[WalkedFile],
    options: &ScanOptions,
    progress: &ProgressBar,
) -> ScanResults<FileReport> {
    let _span = info_span!("scan", files = files.len(), parallel = options.parallel).entered();

    let run = |file: &WalkedFile| {
        let _phase = set_phase(ScanPhase::Extraction);
        scan_file(file, &options.recognizer)
    };

    let outcomes: Vec<_> = if options.parallel {
        files
            .par_iter()
            .progress_with(progress.clone())
            .map(run)
            .collect()
    } else {
        files
            .iter()
            .progress_with(progress.clone())
            .map(run)
            .collect()
    };
    progress.finish_and_clear();

    ScanResults::from_outcomes(outcomes)
}

/// Convenience for callers holding plain paths: format from extension,
/// reported path as given.
pub fn scan_paths(paths: &[PathBuf], options: &ScanOptions) -> ScanResults<FileReport> {
    let mut results = ScanResults::default();
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        match FormatTag::from_path(path) {
            Some(format) => files.push(WalkedFile {
                path: path.clone(),
                relative: path.clone(),
                format,
            }),
            None => results.failures.push(ScanFailure::from_error(
                path.clone(),
                &crate::core::Error::unsupported_format(extension_of(path)),
            )),
        }
    }

    let scanned = scan_files(&files, options, &ProgressBar::hidden());
    results.successes = scanned.successes;
    results.failures.extend(scanned.failures);
    results
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Counts reported at the end of a scan. Every statement found is counted,
/// including those filtered out by the confidence threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub files_scanned: usize,
    pub files_with_sql: usize,
    pub failures: usize,
    pub statements_written: usize,
    pub statements_filtered: usize,
    pub by_kind: BTreeMap<StatementKind, usize>,
    pub by_confidence: BTreeMap<Confidence, usize>,
}

impl ScanSummary {
    pub fn from_results(results: &ScanResults<FileReport>, min_confidence: Confidence) -> Self {
        let mut summary = Self {
            files_scanned: results.success_count(),
            failures: results.failure_count(),
            ..Self::default()
        };

        for report in &results.successes {
            if !report.statements.is_empty() {
                summary.files_with_sql += 1;
            }
            for statement in &report.statements {
                *summary.by_kind.entry(statement.kind).or_insert(0) += 1;
                *summary.by_confidence.entry(statement.confidence).or_insert(0) += 1;
                if statement.confidence >= min_confidence {
                    summary.statements_written += 1;
                } else {
                    summary.statements_filtered += 1;
                }
            }
        }
        summary
    }

    pub fn total_statements(&self) -> usize {
        self.statements_written + self.statements_filtered
    }
}
