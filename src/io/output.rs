use crate::core::{Confidence, StatementKind};
use crate::errors::{ErrorSummary, ScanFailure};
use crate::pipeline::{FileReport, ScanSummary};
use colored::*;
use serde::{Deserialize, Serialize};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One JSON object per statement: `{file, line, kind, sql, raw}`
    #[default]
    Statements,
    /// One JSON object per scanned file: `{file_path, sql_statements, scanned}`
    Files,
}

pub trait OutputWriter {
    fn write_report(&mut self, report: &FileReport) -> anyhow::Result<()>;

    fn finish(&mut self) -> anyhow::Result<()>;
}

/// The wire record for one statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    pub file: String,
    pub line: usize,
    pub kind: StatementKind,
    pub sql: String,
    pub raw: String,
}

/// The per-file record of the original repository-analysis format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_path: String,
    pub sql_statements: Vec<String>,
    pub scanned: bool,
}

/// Appends one JSON object per statement, one per line.
pub struct JsonLinesWriter<W: Write> {
    writer: W,
    min_confidence: Confidence,
}

impl<W: Write> JsonLinesWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            min_confidence: Confidence::Probable,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: Confidence) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputWriter for JsonLinesWriter<W> {
    fn write_report(&mut self, report: &FileReport) -> anyhow::Result<()> {
        for statement in report.statements_at_least(self.min_confidence) {
            let record = StatementRecord {
                file: statement.file.display().to_string(),
                line: statement.line,
                kind: statement.kind,
                sql: statement.sql.clone(),
                raw: statement.raw.clone(),
            };
            serde_json::to_writer(&mut self.writer, &record)?;
            self.writer.write_all(b"\n")?;
        }
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Writes one record per scanned file, including files without SQL.
pub struct FileRecordWriter<W: Write> {
    writer: W,
    min_confidence: Confidence,
}

impl<W: Write> FileRecordWriter<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            min_confidence: Confidence::Probable,
        }
    }

    pub fn with_min_confidence(mut self, min_confidence: Confidence) -> Self {
        self.min_confidence = min_confidence;
        self
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputWriter for FileRecordWriter<W> {
    fn write_report(&mut self, report: &FileReport) -> anyhow::Result<()> {
        let record = FileRecord {
            file_path: report.path.display().to_string(),
            sql_statements: report
                .statements_at_least(self.min_confidence)
                .map(|s| s.sql.clone())
                .collect(),
            scanned: true,
        };
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn finish(&mut self) -> anyhow::Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

pub fn create_writer<'w>(
    format: OutputFormat,
    writer: Box<dyn Write + 'w>,
    min_confidence: Confidence,
) -> Box<dyn OutputWriter + 'w> {
    match format {
        OutputFormat::Statements => {
            Box::new(JsonLinesWriter::new(writer).with_min_confidence(min_confidence))
        }
        OutputFormat::Files => {
            Box::new(FileRecordWriter::new(writer).with_min_confidence(min_confidence))
        }
    }
}

/// Human-readable end-of-scan summary, meant for stderr.
pub fn write_summary<W: Write>(
    out: &mut W,
    summary: &ScanSummary,
    failures: &[ScanFailure],
) -> std::io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", "SQL Scan Summary".bold().blue())?;
    writeln!(out, "{}", "================".blue())?;
    writeln!(out, "  Files scanned: {}", summary.files_scanned)?;
    writeln!(out, "  Files with SQL: {}", summary.files_with_sql)?;

    let failures_display = if summary.failures == 0 {
        summary.failures.to_string().green()
    } else {
        summary.failures.to_string().red()
    };
    writeln!(out, "  Failed files: {failures_display}")?;

    writeln!(
        out,
        "  Statements: {} ({} written, {} below confidence threshold)",
        summary.total_statements().to_string().bold(),
        summary.statements_written,
        summary.statements_filtered
    )?;

    if !summary.by_kind.is_empty() {
        writeln!(out, "  By kind:")?;
        for (kind, count) in &summary.by_kind {
            writeln!(out, "    {:<8} {}", kind.as_str(), count)?;
        }
    }

    if !summary.by_confidence.is_empty() {
        writeln!(out, "  By confidence:")?;
        for (confidence, count) in &summary.by_confidence {
            let label = match confidence {
                Confidence::Certain => confidence.to_string().green(),
                Confidence::Probable => confidence.to_string().yellow(),
            };
            writeln!(out, "    {:<8} {}", label, count)?;
        }
    }

    if !failures.is_empty() {
        write!(out, "{}", ErrorSummary::from_failures(failures).report())?;
    }
    Ok(())
}
