use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Syntactic context a candidate span was cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SpanContext {
    StringLiteral,
    XmlText,
    PropertiesValue,
    RawLine,
}

impl std::fmt::Display for SpanContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SpanContext::StringLiteral => "string-literal",
            SpanContext::XmlText => "xml-text",
            SpanContext::PropertiesValue => "properties-value",
            SpanContext::RawLine => "raw-line",
        };
        write!(f, "{name}")
    }
}

/// A candidate region of a file that may hold a SQL statement.
///
/// `start..end` are byte offsets into the file content. `text` is the
/// candidate text itself, which differs from `content[start..end]` when the
/// segmenter merged concatenated literals or continuation lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub context: SpanContext,
    pub text: String,
    /// Enclosing (text nodes) or owning (attribute values) markup element.
    pub element: Option<String>,
    /// Attribute name for markup attribute values, key for properties values.
    pub attribute: Option<String>,
    /// The span ran into end-of-file before its closing delimiter.
    pub truncated: bool,
    /// `text` still carries the host format's escapes (`\n`, `&lt;`).
    /// Cleared for text that was already normalized once.
    pub host_escaped: bool,
}

impl Span {
    pub fn new(start: usize, end: usize, context: SpanContext, text: impl Into<String>) -> Self {
        Self {
            start,
            end: end.max(start),
            context,
            text: text.into(),
            element: None,
            attribute: None,
            truncated: false,
            host_escaped: true,
        }
    }

    pub fn with_element(mut self, element: impl Into<String>) -> Self {
        self.element = Some(element.into());
        self
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }

    pub fn with_truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    pub fn with_host_escaped(mut self, host_escaped: bool) -> Self {
        self.host_escaped = host_escaped;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Inferred only from the enclosing markup element
    Probable,
    /// A leading SQL keyword was detected
    Certain,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::Probable => write!(f, "probable"),
            Confidence::Certain => write!(f, "certain"),
        }
    }
}

/// A span confirmed to contain SQL, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch<'s> {
    pub span: &'s Span,
    /// Byte offset of the first character of the match
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub confidence: Confidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatementKind {
    #[serde(rename = "SELECT")]
    Select,
    #[serde(rename = "INSERT")]
    Insert,
    #[serde(rename = "UPDATE")]
    Update,
    #[serde(rename = "DELETE")]
    Delete,
    #[serde(rename = "DDL")]
    Ddl,
    #[serde(rename = "other")]
    Other,
}

impl StatementKind {
    pub const ALL: [StatementKind; 6] = [
        StatementKind::Select,
        StatementKind::Insert,
        StatementKind::Update,
        StatementKind::Delete,
        StatementKind::Ddl,
        StatementKind::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatementKind::Select => "SELECT",
            StatementKind::Insert => "INSERT",
            StatementKind::Update => "UPDATE",
            StatementKind::Delete => "DELETE",
            StatementKind::Ddl => "DDL",
            StatementKind::Other => "other",
        }
    }
}

impl std::fmt::Display for StatementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The reported record: one extracted SQL statement and where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    pub file: PathBuf,
    /// 1-based line of the match's first character
    pub line: usize,
    pub sql: String,
    pub kind: StatementKind,
    pub raw: String,
    pub confidence: Confidence,
    pub context: SpanContext,
}

impl Statement {
    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = file.into();
        self
    }
}
