//! Error collection data structures for batch scans.
//!
//! Each file is scanned independently. Instead of stopping at the first
//! error, a scan returns BOTH the files that succeeded and every failure.

use crate::core::Error;
use serde::Serialize;
use std::path::PathBuf;

/// Results from a batch scan.
#[derive(Debug, Clone)]
pub struct ScanResults<T> {
    pub successes: Vec<T>,
    pub failures: Vec<ScanFailure>,
}

impl<T> Default for ScanResults<T> {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

impl<T> ScanResults<T> {
    pub fn new(successes: Vec<T>, failures: Vec<ScanFailure>) -> Self {
        Self {
            successes,
            failures,
        }
    }

    /// Split per-file outcomes into successes and failures, keeping order.
    pub fn from_outcomes(outcomes: impl IntoIterator<Item = Result<T, ScanFailure>>) -> Self {
        let mut results = Self::default();
        for outcome in outcomes {
            match outcome {
                Ok(item) => results.successes.push(item),
                Err(failure) => results.failures.push(failure),
            }
        }
        results
    }

    pub fn success_count(&self) -> usize {
        self.successes.len()
    }

    pub fn failure_count(&self) -> usize {
        self.failures.len()
    }

    pub fn total_count(&self) -> usize {
        self.success_count() + self.failure_count()
    }

    pub fn is_complete_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn success_rate(&self) -> f64 {
        if self.total_count() == 0 {
            return 1.0;
        }
        self.success_count() as f64 / self.total_count() as f64
    }
}

/// A file the scan could not process.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub path: PathBuf,
    pub operation: OperationType,
    pub error: String,
}

impl ScanFailure {
    pub fn new(path: PathBuf, operation: OperationType, error: impl std::fmt::Display) -> Self {
        Self {
            path,
            operation,
            error: error.to_string(),
        }
    }

    /// Classify a library error raised while scanning `path`.
    pub fn from_error(path: PathBuf, error: &Error) -> Self {
        let operation = match error {
            Error::UnsupportedFormat { .. } => OperationType::UnsupportedFormat,
            Error::Decode { .. } => OperationType::Decode,
            Error::FileSystem { .. } | Error::Io(_) => OperationType::FileRead,
            _ => OperationType::Other,
        };
        Self::new(path, operation, error)
    }

    pub fn directory_access(path: PathBuf, error: impl std::fmt::Display) -> Self {
        Self::new(path, OperationType::DirectoryAccess, error)
    }
}

/// Type of operation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OperationType {
    FileRead,
    Decode,
    UnsupportedFormat,
    DirectoryAccess,
    Other,
}

impl OperationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FileRead => "File read",
            Self::Decode => "Decode",
            Self::UnsupportedFormat => "Unsupported format",
            Self::DirectoryAccess => "Directory access",
            Self::Other => "Other",
        }
    }
}
