use super::find_from;
use crate::core::{Span, SpanContext};
use std::collections::VecDeque;

const CDATA_OPEN: &str = "<![CDATA[";
const CDATA_CLOSE: &str = "]]>";

/// Yields text nodes and attribute values of XML-like markup.
///
/// A text node is the character data between two tags with CDATA sections
/// unwrapped in place and comments dropped, so `a <![CDATA[ < ]]> b` is one
/// node. Whitespace-only nodes are not yielded. The scanner is tolerant: an
/// unterminated construct simply runs to EOF.
pub struct MarkupSegments<'a> {
    content: &'a str,
    pos: usize,
    open_elements: Vec<String>,
    pending: VecDeque<Span>,
}

impl<'a> MarkupSegments<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            content,
            pos: 0,
            open_elements: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    fn rest(&self) -> &'a str {
        &self.content[self.pos.min(self.content.len())..]
    }

    /// Moves past the next `close` delimiter, or to EOF.
    fn skip_past(&mut self, from: usize, close: &str) {
        self.pos = find_from(self.content, from, close).map_or(self.content.len(), |i| i + close.len());
    }

    /// Collects one text node starting at `pos`.
    fn text_node(&mut self) -> Option<Span> {
        let mut text = String::new();
        let mut first: Option<usize> = None;
        let mut end = self.pos;
        let mut truncated = false;

        while self.pos < self.content.len() {
            let rest = self.rest();
            if rest.starts_with(CDATA_OPEN) {
                let body_start = self.pos + CDATA_OPEN.len();
                let (body_end, next) = match find_from(self.content, body_start, CDATA_CLOSE) {
                    Some(i) => (i, i + CDATA_CLOSE.len()),
                    None => {
                        truncated = true;
                        (self.content.len(), self.content.len())
                    }
                };
                self.append(&mut text, &mut first, body_start, body_end);
                end = body_end;
                self.pos = next;
            } else if rest.starts_with("<!--") {
                self.skip_past(self.pos + 4, "-->");
            } else if rest.starts_with('<') {
                break;
            } else {
                let run_end = find_from(self.content, self.pos, "<").unwrap_or(self.content.len());
                self.append(&mut text, &mut first, self.pos, run_end);
                end = run_end;
                self.pos = run_end;
            }
        }

        let start = first?;
        let text = text.trim_end();
        let mut span = Span::new(start, end, SpanContext::XmlText, text).with_truncated(truncated);
        if let Some(element) = self.open_elements.last() {
            span = span.with_element(element.clone());
        }
        Some(span)
    }

    /// Appends `content[from..to]` to `text`, dropping leading whitespace of
    /// the node and remembering where its first real character is.
    fn append(&self, text: &mut String, first: &mut Option<usize>, from: usize, to: usize) {
        let piece = &self.content[from..to];
        if first.is_none() {
            let trimmed = piece.trim_start();
            if trimmed.is_empty() {
                return;
            }
            *first = Some(from + (piece.len() - trimmed.len()));
            text.push_str(trimmed);
        } else {
            text.push_str(piece);
        }
    }

    /// Parses the start tag at `pos`, queueing a span per attribute value.
    fn start_tag(&mut self) {
        let bytes = self.content.as_bytes();
        let name_start = self.pos + 1;
        let mut i = name_start;
        while i < bytes.len() && !is_tag_delimiter(bytes[i]) {
            i += 1;
        }
        let name = local_name(&self.content[name_start..i]).to_string();

        loop {
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            match bytes.get(i) {
                None => break,
                Some(b'>') => {
                    i += 1;
                    self.open_elements.push(name.clone());
                    break;
                }
                Some(b'/') if bytes.get(i + 1) == Some(&b'>') => {
                    i += 2;
                    break;
                }
                Some(b'/') => i += 1,
                Some(_) => i = self.attribute(&name, i),
            }
        }
        self.pos = i;
    }

    /// Parses one attribute at `at`; returns the offset after it.
    fn attribute(&mut self, element: &str, at: usize) -> usize {
        let bytes = self.content.as_bytes();
        let mut i = at;
        while i < bytes.len() && !is_tag_delimiter(bytes[i]) && bytes[i] != b'=' {
            i += 1;
        }
        let attr = self.content[at..i].to_string();
        if i == at {
            // Stray character such as a lone quote.
            return i + 1;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            return i;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let (value_start, value_end, next, truncated) = match bytes.get(i) {
            Some(&q) if q == b'"' || q == b'\'' => {
                match self.content[i + 1..].find(q as char) {
                    Some(off) => (i + 1, i + 1 + off, i + 2 + off, false),
                    None => (i + 1, bytes.len(), bytes.len(), true),
                }
            }
            _ => {
                let mut j = i;
                while j < bytes.len() && !is_tag_delimiter(bytes[j]) {
                    j += 1;
                }
                (i, j, j, false)
            }
        };

        let value = &self.content[value_start..value_end];
        if !value.trim().is_empty() {
            self.pending.push_back(
                Span::new(value_start, value_end, SpanContext::XmlText, value)
                    .with_element(element)
                    .with_attribute(attr)
                    .with_truncated(truncated),
            );
        }
        next
    }

    fn end_tag(&mut self) {
        let name_start = self.pos + 2;
        self.skip_past(name_start, ">");
        let raw = self.content[name_start..self.pos].trim_end_matches('>').trim();
        let name = local_name(raw);
        if let Some(idx) = self.open_elements.iter().rposition(|open| open == name) {
            self.open_elements.truncate(idx);
        }
    }
}

impl Iterator for MarkupSegments<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        loop {
            if let Some(span) = self.pending.pop_front() {
                return Some(span);
            }
            if self.pos >= self.content.len() {
                return None;
            }

            let rest = self.rest();
            if rest.starts_with("<!--") {
                self.skip_past(self.pos + 4, "-->");
            } else if rest.starts_with(CDATA_OPEN) {
                if let Some(span) = self.text_node() {
                    return Some(span);
                }
            } else if rest.starts_with("<?") {
                self.skip_past(self.pos + 2, "?>");
            } else if rest.starts_with("<!") {
                self.skip_past(self.pos + 2, ">");
            } else if rest.starts_with("</") {
                self.end_tag();
            } else if rest.starts_with('<') {
                self.start_tag();
            } else if let Some(span) = self.text_node() {
                return Some(span);
            }
        }
    }
}

fn is_tag_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || b == b'>' || b == b'/'
}

/// Strips a namespace prefix: `mybatis:select` -> `select`.
fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn spans(content: &str) -> Vec<Span> {
        MarkupSegments::new(content).collect()
    }

    #[test]
    fn test_text_node_and_attribute() {
        let content = r#"<select id="x">SELECT ${col} FROM t</select>"#;
        let spans = spans(content);
        assert_eq!(spans.len(), 2);

        assert_eq!(spans[0].text, "x");
        assert_eq!(spans[0].attribute.as_deref(), Some("id"));
        assert_eq!(spans[0].element.as_deref(), Some("select"));

        assert_eq!(spans[1].text, "SELECT ${col} FROM t");
        assert_eq!(spans[1].element.as_deref(), Some("select"));
        assert!(spans[1].attribute.is_none());
        assert_eq!(&content[spans[1].start..spans[1].end], "SELECT ${col} FROM t");
    }

    #[test]
    fn test_cdata_is_unwrapped_into_its_text_node() {
        let content = indoc! {r#"
            <mapper>
              <select id="byAge">
                SELECT * FROM person WHERE age <![CDATA[ < ]]> #{age}
              </select>
            </mapper>
        "#};
        let text_nodes: Vec<Span> = spans(content)
            .into_iter()
            .filter(|s| s.attribute.is_none())
            .collect();
        assert_eq!(text_nodes.len(), 1);
        assert_eq!(text_nodes[0].text, "SELECT * FROM person WHERE age  <  #{age}");
        assert_eq!(text_nodes[0].element.as_deref(), Some("select"));
    }

    #[test]
    fn test_comments_doctype_and_pi_are_skipped() {
        let content = indoc! {r#"
            <?xml version="1.0"?>
            <!DOCTYPE mapper PUBLIC "-//mybatis.org//DTD Mapper 3.0//EN" "x.dtd">
            <!-- <select>SELECT * FROM hidden</select> -->
            <sql id="cols">a, b</sql>
        "#};
        let texts: Vec<String> = spans(content).into_iter().map(|s| s.text).collect();
        assert_eq!(texts, vec!["cols", "a, b"]);
    }

    #[test]
    fn test_nested_elements_track_enclosing_name() {
        let content = "<a><b>one</b>two<c/>three</a>";
        let spans = spans(content);
        let pairs: Vec<(String, Option<String>)> =
            spans.into_iter().map(|s| (s.text, s.element)).collect();
        assert_eq!(
            pairs,
            vec![
                ("one".to_string(), Some("b".to_string())),
                ("two".to_string(), Some("a".to_string())),
                ("three".to_string(), Some("a".to_string())),
            ]
        );
    }

    #[test]
    fn test_namespaced_element_uses_local_name() {
        let spans = spans("<orm:named-query name=\"q\"><orm:query>SELECT u FROM User u</orm:query></orm:named-query>");
        let body = spans.last().unwrap();
        assert_eq!(body.element.as_deref(), Some("query"));
    }

    #[test]
    fn test_unterminated_cdata_truncates_at_eof() {
        let content = "<select><![CDATA[SELECT * FROM t";
        let spans = spans(content);
        assert_eq!(spans.len(), 1);
        assert!(spans[0].truncated);
        assert_eq!(spans[0].end, content.len());
    }

    #[test]
    fn test_unterminated_attribute_value() {
        let spans = spans("<bean value=\"SELECT 1");
        assert_eq!(spans.len(), 1);
        assert!(spans[0].truncated);
        assert_eq!(spans[0].text, "SELECT 1");
    }

    #[test]
    fn test_whitespace_only_nodes_are_dropped() {
        assert!(spans("<a>\n   \n</a>").is_empty());
    }

    #[test]
    fn test_single_quoted_and_unquoted_attributes() {
        let texts: Vec<String> = spans("<p q='SELECT 1 FROM dual' n=5 flag>")
            .into_iter()
            .map(|s| s.text)
            .collect();
        assert_eq!(texts, vec!["SELECT 1 FROM dual", "5"]);
    }
}
