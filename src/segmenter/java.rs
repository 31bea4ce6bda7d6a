use super::syntax::{collect_literals, has_missing_child, Body, LiteralSyntax};
use super::{line_end, skip_newline};
use crate::core::Span;
use tree_sitter::{Language, Node};

const QUOTE: &str = "\"";
const TEXT_BLOCK: &str = "\"\"\"";

/// Yields Java string literals, merging literals chained with `+`.
///
/// Handles `"..."` literals and `"""` text blocks; char literals and comments
/// never produce spans. The file is parsed on the first call to `next`.
pub struct JavaSegments<'a> {
    content: &'a str,
    spans: Option<std::vec::IntoIter<Span>>,
}

impl<'a> JavaSegments<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            spans: None,
        }
    }
}

impl Iterator for JavaSegments<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let content = self.content;
        self.spans
            .get_or_insert_with(|| collect_literals(content, &JavaSyntax).into_iter())
            .next()
    }
}

struct JavaSyntax;

impl LiteralSyntax for JavaSyntax {
    fn language(&self) -> Language {
        tree_sitter_java::LANGUAGE.into()
    }

    fn is_literal(&self, kind: &str) -> bool {
        matches!(kind, "string_literal" | "text_block")
    }

    fn is_open_quote(&self, kind: &str) -> bool {
        kind == QUOTE || kind == TEXT_BLOCK
    }

    fn is_close_quote(&self, kind: &str) -> bool {
        self.is_open_quote(kind)
    }

    fn literal_body(&self, content: &str, node: &Node) -> Body {
        let (start, end) = (node.start_byte(), node.end_byte());
        let raw = content.get(start..end).unwrap_or_default();
        let delimiter = if raw.starts_with(TEXT_BLOCK) { TEXT_BLOCK } else { QUOTE };
        let after_open = if delimiter == TEXT_BLOCK {
            text_block_body(content, start + TEXT_BLOCK.len())
        } else {
            start + QUOTE.len()
        };
        let body_start = after_open.min(end);

        let closed = raw.len() >= 2 * delimiter.len()
            && raw.ends_with(delimiter)
            && !has_missing_child(node);
        let body_end = if closed { end - delimiter.len() } else { end };
        Body {
            start: body_start,
            end: body_end.max(body_start),
            truncated: !closed,
        }
    }

    fn body_start_after(&self, content: &str, quote: &Node) -> usize {
        if quote.kind() == TEXT_BLOCK {
            text_block_body(content, quote.end_byte())
        } else {
            quote.end_byte()
        }
    }

    fn unterminated_end(&self, content: &str, quote: &Node) -> usize {
        if quote.kind() == TEXT_BLOCK {
            content.len()
        } else {
            line_end(content.as_bytes(), quote.end_byte())
        }
    }
}

/// Text block content starts on the line after the opening delimiter.
fn text_block_body(content: &str, after_open: usize) -> usize {
    let bytes = content.as_bytes();
    skip_newline(bytes, line_end(bytes, after_open))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SpanContext;
    use indoc::indoc;

    fn spans(content: &str) -> Vec<Span> {
        JavaSegments::new(content).collect()
    }

    #[test]
    fn test_concatenated_literals_merge() {
        let content = r#"String q = "SELECT * " + "FROM users";"#;
        let spans = spans(content);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "SELECT * FROM users");
        assert_eq!(spans[0].context, SpanContext::StringLiteral);
        assert_eq!(&content[spans[0].start..spans[0].start + 6], "SELECT");
    }

    #[test]
    fn test_multi_line_concatenation_with_comments() {
        let content = indoc! {r#"
            String sql = "SELECT id, name "   // columns
                       + "FROM users "
                       /* filter */ + "WHERE id = ?";
        "#};
        let spans = spans(content);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "SELECT id, name FROM users WHERE id = ?");
    }

    #[test]
    fn test_variable_breaks_the_chain() {
        let content = r#"String q = "SELECT * FROM t WHERE id = " + id + " AND x = 1";"#;
        let texts: Vec<String> = spans(content).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["SELECT * FROM t WHERE id = ", " AND x = 1"]);
    }

    #[test]
    fn test_escaped_quotes_do_not_terminate() {
        let spans = spans(r#"s = "SELECT \"Name\" FROM t";"#);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, r#"SELECT \"Name\" FROM t"#);
    }

    #[test]
    fn test_comments_are_not_candidates() {
        let content = indoc! {r#"
            // String old = "SELECT * FROM legacy";
            /* "DELETE FROM audit" */
            char c = '"';
            String live = "SELECT 1 FROM dual";
        "#};
        let texts: Vec<String> = spans(content).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["SELECT 1 FROM dual"]);
    }

    #[test]
    fn test_text_block() {
        let content = "String q = \"\"\"\n    SELECT *\n      FROM t\n    \"\"\";\n";
        let spans = spans(content);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].text.trim_start().starts_with("SELECT *"));
        assert!(spans[0].text.contains("FROM t"));
        assert!(!spans[0].truncated);
    }

    #[test]
    fn test_unterminated_literal_at_eof() {
        let content = "String q = \"SELECT * FROM t";
        let spans = spans(content);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].truncated);
        assert_eq!(spans[0].end, content.len());
        assert_eq!(spans[0].text, "SELECT * FROM t");
    }

    #[test]
    fn test_trailing_plus_without_literal() {
        let spans = spans(r#"String q = "SELECT a FROM t" + suffix;"#);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].text, "SELECT a FROM t");
    }

    #[test]
    fn test_keyword_fragment_before_variable() {
        let content = indoc! {r#"
            class Report {
                String q = "SELECT " + cols + " FROM t";
                void run() { jdbc.query("DELETE FROM t WHERE id = " + id); }
            }
        "#};
        let texts: Vec<String> = spans(content).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["SELECT ", " FROM t", "DELETE FROM t WHERE id = "]);
    }

    #[test]
    fn test_literals_inside_call_operands_are_found() {
        let content = r#"String q = "SELECT * FROM t WHERE a = " + quote("x") + " ORDER BY a";"#;
        let texts: Vec<String> = spans(content).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["SELECT * FROM t WHERE a = ", "x", " ORDER BY a"]);
    }

    #[test]
    fn test_non_ascii_source() {
        let spans = spans("String s = \"héllo\"; // ünïcode\nString q = \"SELECT 1\";");
        let texts: Vec<String> = spans.into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["héllo", "SELECT 1"]);
    }
}
