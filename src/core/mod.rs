pub mod errors;
pub mod lines;
pub mod types;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use errors::{Error, Result};
pub use lines::LineIndex;
pub use types::{Confidence, RawMatch, Span, SpanContext, Statement, StatementKind};

/// Host file formats the segmenter understands.
///
/// `Java` and `Python` are the two general-purpose host languages and go by
/// the wire tags `lang-a` and `lang-b`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Copy)]
pub enum FormatTag {
    Properties,
    Markup,
    Script,
    Java,
    Python,
}

static TAG_MAP: &[(&[&str], FormatTag)] = &[
    (&["properties"], FormatTag::Properties),
    (&["markup", "xml"], FormatTag::Markup),
    (&["script", "sql"], FormatTag::Script),
    (&["lang-a", "java"], FormatTag::Java),
    (&["lang-b", "python"], FormatTag::Python),
];

static EXTENSION_MAP: &[(&[&str], FormatTag)] = &[
    (&["properties"], FormatTag::Properties),
    (&["xml", "config", "hbm"], FormatTag::Markup),
    (
        &["sql", "ddl", "dml", "pls", "pks", "pkb", "prc", "fnc", "trg"],
        FormatTag::Script,
    ),
    (&["java"], FormatTag::Java),
    (&["py", "pyw"], FormatTag::Python),
];

impl FormatTag {
    pub const ALL: [FormatTag; 5] = [
        FormatTag::Properties,
        FormatTag::Markup,
        FormatTag::Script,
        FormatTag::Java,
        FormatTag::Python,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.to_ascii_lowercase();
        EXTENSION_MAP
            .iter()
            .find(|(exts, _)| exts.contains(&ext.as_str()))
            .map(|(_, tag)| *tag)
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical wire tag.
    pub fn as_tag(&self) -> &'static str {
        TAG_MAP
            .iter()
            .find(|(_, tag)| tag == self)
            .and_then(|(names, _)| names.first().copied())
            .unwrap_or("unknown")
    }
}

impl FromStr for FormatTag {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let needle = s.trim().to_ascii_lowercase();
        TAG_MAP
            .iter()
            .find(|(names, _)| names.contains(&needle.as_str()))
            .map(|(_, tag)| *tag)
            .ok_or_else(|| Error::unsupported_format(s))
    }
}

impl std::fmt::Display for FormatTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// One file handed to the extractor. Immutable once read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub format: FormatTag,
    pub content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, format: FormatTag, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            format,
            content: content.into(),
        }
    }

    /// Build a source file from undecoded bytes.
    pub fn from_bytes(path: impl Into<PathBuf>, format: FormatTag, bytes: Vec<u8>) -> Result<Self> {
        let path = path.into();
        let content = String::from_utf8(bytes)
            .map_err(|e| Error::decode(path.clone(), e.utf8_error().to_string()))?;
        Ok(Self {
            path,
            format,
            content,
        })
    }

    /// Build a source file from a format tag string as supplied by a caller.
    pub fn from_tagged(path: impl Into<PathBuf>, tag: &str, bytes: Vec<u8>) -> Result<Self> {
        let format = tag.parse::<FormatTag>()?;
        Self::from_bytes(path, format, bytes)
    }

    pub fn read(path: &Path, format: FormatTag) -> Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| Error::file_system("Failed to read file", path, e))?;
        Self::from_bytes(path, format, bytes)
    }
}
