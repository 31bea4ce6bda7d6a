//! Segmentation of host files into candidate SQL spans.
//!
//! Each [`FormatTag`] maps to one segmentation function through
//! `SEGMENTER_MAP`. Segmentation is lazy: spans are produced on demand in file
//! order, and calling [`segment`] again restarts from the top of the content.
//! Properties, markup and script files are scanned lexically; Java and Python
//! sources are parsed with tree-sitter on the first request for a span.

mod java;
mod markup;
mod properties;
mod python;
mod script;
mod syntax;

use crate::core::{FormatTag, Span};

pub use java::JavaSegments;
pub use markup::MarkupSegments;
pub use properties::PropertiesSegments;
pub use python::PythonSegments;
pub use script::ScriptSegments;

/// Lazy, file-ordered sequence of candidate spans.
pub type Segments<'a> = Box<dyn Iterator<Item = Span> + 'a>;

type SegmentFn = for<'a> fn(&'a str) -> Segments<'a>;

static SEGMENTER_MAP: &[(FormatTag, SegmentFn)] = &[
    (FormatTag::Properties, segment_properties),
    (FormatTag::Markup, segment_markup),
    (FormatTag::Script, segment_script),
    (FormatTag::Java, segment_java),
    (FormatTag::Python, segment_python),
];

/// Split `content` into candidate spans according to its host format.
pub fn segment(content: &str, format: FormatTag) -> Segments<'_> {
    SEGMENTER_MAP
        .iter()
        .find(|(tag, _)| *tag == format)
        .map(|(_, segmenter)| segmenter(content))
        .unwrap_or_else(|| Box::new(std::iter::empty()))
}

fn segment_properties(content: &str) -> Segments<'_> {
    Box::new(PropertiesSegments::new(content))
}

fn segment_markup(content: &str) -> Segments<'_> {
    Box::new(MarkupSegments::new(content))
}

fn segment_script(content: &str) -> Segments<'_> {
    Box::new(ScriptSegments::new(content))
}

fn segment_java(content: &str) -> Segments<'_> {
    Box::new(JavaSegments::new(content))
}

fn segment_python(content: &str) -> Segments<'_> {
    Box::new(PythonSegments::new(content))
}

// Byte-level helpers shared by the segmenters. Every delimiter they look for
// is ASCII, so the offsets they return are always char boundaries.

/// Offset of the next `needle` at or after `from`, if any.
fn find_from(content: &str, from: usize, needle: &str) -> Option<usize> {
    content.get(from..)?.find(needle).map(|i| from + i)
}

/// Offset of the next line terminator at or after `from` (or EOF).
fn line_end(bytes: &[u8], from: usize) -> usize {
    bytes[from.min(bytes.len())..]
        .iter()
        .position(|&b| b == b'\n' || b == b'\r')
        .map_or(bytes.len(), |i| from + i)
}

/// Offset just past the line terminator starting at `at` (handles `\r\n`).
fn skip_newline(bytes: &[u8], at: usize) -> usize {
    match bytes.get(at) {
        Some(b'\r') if bytes.get(at + 1) == Some(&b'\n') => at + 2,
        Some(b'\r') | Some(b'\n') => at + 1,
        _ => at,
    }
}
