//! Decides whether a candidate span holds a SQL statement.
//!
//! A span is accepted when it opens with a SQL keyword (`certain`), or when it
//! is the text of a known mapper-statement markup element (`probable`).
//! Boilerplate such as URLs, log formats and keyword-led prose is excluded
//! first. Rejection is the common, expected outcome and is not an error.

pub mod patterns;

use crate::config::RecognizerConfig;
use crate::core::{Confidence, Error, RawMatch, Result, Span, SpanContext};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

pub use patterns::{DEFAULT_MAPPER_ELEMENTS, LEADING_KEYWORDS};

pub const DEFAULT_MIN_LENGTH: usize = 4;

static DEFAULT_RECOGNIZER: Lazy<Recognizer> = Lazy::new(Recognizer::new);

/// Recognize `span` with the built-in allow-list and exclude-list.
pub fn recognize(span: &Span) -> Option<RawMatch<'_>> {
    DEFAULT_RECOGNIZER.recognize(span)
}

/// Shared recognizer with the built-in settings.
pub fn default_recognizer() -> &'static Recognizer {
    &DEFAULT_RECOGNIZER
}

#[derive(Debug, Clone)]
pub struct Recognizer {
    min_length: usize,
    mapper_elements: HashSet<String>,
    extra_excludes: Vec<Regex>,
}

impl Default for Recognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Recognizer {
    pub fn new() -> Self {
        Self {
            min_length: DEFAULT_MIN_LENGTH,
            mapper_elements: DEFAULT_MAPPER_ELEMENTS
                .iter()
                .map(|e| e.to_ascii_lowercase())
                .collect(),
            extra_excludes: Vec::new(),
        }
    }

    pub fn from_config(config: &RecognizerConfig) -> Result<Self> {
        let mut recognizer = Self::new();
        recognizer.min_length = config.min_length;
        if let Some(elements) = &config.mapper_elements {
            recognizer.mapper_elements = elements.iter().map(|e| e.to_ascii_lowercase()).collect();
        }
        recognizer.extra_excludes = config
            .extra_exclude_patterns
            .iter()
            .map(|p| {
                Regex::new(p).map_err(|e| {
                    Error::Configuration(format!("invalid exclude pattern '{p}': {e}"))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(recognizer)
    }

    pub fn is_mapper_element(&self, element: &str) -> bool {
        self.mapper_elements.contains(&element.to_ascii_lowercase())
    }

    pub fn recognize<'s>(&self, span: &'s Span) -> Option<RawMatch<'s>> {
        let trimmed = span.text.trim();
        if trimmed.chars().count() < self.min_length || self.is_excluded(trimmed) {
            return None;
        }

        let body = patterns::strip_leading_parens(trimmed);
        let confidence = if patterns::leading_keyword(body).is_some() {
            Confidence::Certain
        } else if self.in_mapper_statement(span) {
            Confidence::Probable
        } else {
            return None;
        };

        let leading = span.text.len() - span.text.trim_start().len();
        let start = (span.start + leading).min(span.end);
        Some(RawMatch {
            span,
            start,
            end: span.end,
            text: trimmed.to_string(),
            confidence: if span.truncated {
                Confidence::Probable
            } else {
                confidence
            },
        })
    }

    fn is_excluded(&self, text: &str) -> bool {
        patterns::boilerplate_rule(&patterns::mask_placeholders(text)).is_some()
            || self.extra_excludes.iter().any(|re| re.is_match(text))
    }

    /// Text node (not attribute value) of an allow-listed markup element.
    fn in_mapper_statement(&self, span: &Span) -> bool {
        span.context == SpanContext::XmlText
            && span.attribute.is_none()
            && span
                .element
                .as_deref()
                .is_some_and(|element| self.is_mapper_element(element))
    }
}
