// Export modules for library usage
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod errors;
pub mod io;
pub mod normalizer;
pub mod observability;
pub mod pipeline;
pub mod progress;
pub mod recognizer;
pub mod segmenter;
pub mod source;

// Re-export commonly used types
pub use crate::core::{
    Confidence, Error, FormatTag, RawMatch, Result, SourceFile, Span, SpanContext, Statement,
    StatementKind,
};

pub use crate::segmenter::segment;

pub use crate::recognizer::{recognize, Recognizer};

pub use crate::normalizer::{canonical_text, classify, normalize};

pub use crate::pipeline::{extract, extract_tagged, extract_with, FileReport, ScanSummary};

pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
