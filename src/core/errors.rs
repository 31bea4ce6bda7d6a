//! Shared error types for the application

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for sqlscan operations
#[derive(Debug, Error)]
pub enum Error {
    /// The declared host format is not one the segmenter knows about
    #[error("Unsupported format tag '{tag}'")]
    UnsupportedFormat { tag: String },

    /// File content is not valid UTF-8
    #[error("Cannot decode {path} as UTF-8: {message}")]
    Decode { path: PathBuf, message: String },

    /// File system related errors
    #[error("File system error: {message}")]
    FileSystem {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Repository acquisition errors
    #[error("Repository error: {0}")]
    Repository(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Pattern errors
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Git errors
    #[error(transparent)]
    Git(#[from] git2::Error),
}

impl Error {
    pub fn unsupported_format(tag: impl Into<String>) -> Self {
        Self::UnsupportedFormat { tag: tag.into() }
    }

    pub fn decode(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a file system error with path context
    pub fn file_system(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::FileSystem {
            message: message.into(),
            path: Some(path.into()),
            source: Some(source),
        }
    }

    /// Whether the error only affects a single file and the scan may continue
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedFormat { .. } | Self::Decode { .. } | Self::FileSystem { .. }
        )
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;
