//! Failure collection for batch scans.
//!
//! Library errors live in [`crate::core::errors`]; this module gathers the
//! per-file failures of a scan so one unreadable file never aborts the rest.

pub mod collection;
pub mod summary;

pub use collection::{OperationType, ScanFailure, ScanResults};
pub use summary::ErrorSummary;
