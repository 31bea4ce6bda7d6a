//! Error summary generation for batch scans.

use super::collection::{OperationType, ScanFailure};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Summary of the failures of one scan.
#[derive(Debug)]
pub struct ErrorSummary {
    pub total: usize,
    pub by_operation: BTreeMap<OperationType, usize>,
    pub by_error_kind: BTreeMap<String, Vec<PathBuf>>,
    pub sample_errors: Vec<ScanFailure>,
}

impl ErrorSummary {
    pub fn from_failures(failures: &[ScanFailure]) -> Self {
        let mut by_operation: BTreeMap<OperationType, usize> = BTreeMap::new();
        let mut by_error_kind: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for failure in failures {
            *by_operation.entry(failure.operation).or_insert(0) += 1;
            by_error_kind
                .entry(extract_error_kind(&failure.error))
                .or_default()
                .push(failure.path.clone());
        }

        Self {
            total: failures.len(),
            by_operation,
            by_error_kind,
            sample_errors: failures.iter().take(10).cloned().collect(),
        }
    }

    pub fn report(&self) -> String {
        let mut report = String::new();

        report.push_str("\nFailure breakdown:\n");
        for (op_type, count) in &self.by_operation {
            report.push_str(&format!("  {}: {} file(s)\n", op_type.as_str(), count));
        }

        report.push_str("\nError categories:\n");
        for (error_kind, paths) in &self.by_error_kind {
            report.push_str(&format!("  {}: {} file(s)\n", error_kind, paths.len()));

            for path in paths.iter().take(3) {
                report.push_str(&format!("    - {}\n", path.display()));
            }

            if paths.len() > 3 {
                report.push_str(&format!("    ... and {} more\n", paths.len() - 3));
            }
        }

        report
    }
}

/// Coarse category of an error message.
fn extract_error_kind(error: &str) -> String {
    if error.contains("Permission denied") {
        "Permission denied".to_string()
    } else if error.contains("No such file") {
        "File not found".to_string()
    } else if error.contains("UTF-8") {
        "Not UTF-8".to_string()
    } else if error.contains("Unsupported format") {
        "Unsupported format".to_string()
    } else {
        error.lines().next().unwrap_or("Unknown error").to_string()
    }
}
