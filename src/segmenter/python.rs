use super::line_end;
use super::syntax::{collect_literals, Body, LiteralSyntax};
use crate::core::Span;
use tree_sitter::{Language, Node};

/// Yields Python string literals, merging literals joined by `+` or by
/// implicit adjacency (`concatenated_string`).
///
/// Python's own line joining applies: adjacent literals may sit on different
/// lines only inside brackets or after a backslash continuation.
pub struct PythonSegments<'a> {
    content: &'a str,
    spans: Option<std::vec::IntoIter<Span>>,
}

impl<'a> PythonSegments<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            spans: None,
        }
    }
}

impl Iterator for PythonSegments<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let content = self.content;
        self.spans
            .get_or_insert_with(|| collect_literals(content, &PythonSyntax).into_iter())
            .next()
    }
}

struct PythonSyntax;

impl LiteralSyntax for PythonSyntax {
    fn language(&self) -> Language {
        tree_sitter_python::LANGUAGE.into()
    }

    fn is_literal(&self, kind: &str) -> bool {
        kind == "string"
    }

    fn is_adjacent_run(&self, kind: &str) -> bool {
        kind == "concatenated_string"
    }

    fn is_open_quote(&self, kind: &str) -> bool {
        kind == "string_start"
    }

    fn is_close_quote(&self, kind: &str) -> bool {
        kind == "string_end"
    }

    /// `string_start` carries the prefix and opening quotes, so the body is
    /// everything between it and `string_end`.
    fn literal_body(&self, _content: &str, node: &Node) -> Body {
        let mut cursor = node.walk();
        let children: Vec<Node> = node.children(&mut cursor).collect();
        let start = children
            .iter()
            .find(|child| child.kind() == "string_start")
            .map_or(node.start_byte(), Node::end_byte);
        match children
            .iter()
            .rev()
            .find(|child| child.kind() == "string_end" && !child.is_missing())
        {
            Some(close) => Body {
                start,
                end: close.start_byte().max(start),
                truncated: false,
            },
            None => Body {
                start,
                end: node.end_byte().max(start),
                truncated: true,
            },
        }
    }

    fn unterminated_end(&self, content: &str, quote: &Node) -> usize {
        let opener = content
            .get(quote.start_byte()..quote.end_byte())
            .unwrap_or_default();
        if opener.ends_with("\"\"\"") || opener.ends_with("'''") {
            content.len()
        } else {
            line_end(content.as_bytes(), quote.end_byte())
        }
    }
}
