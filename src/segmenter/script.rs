use super::{find_from, line_end, skip_newline};
use crate::core::{Span, SpanContext};

/// Splits a SQL script at statement terminators.
///
/// A `;` outside quotes and comments ends a statement, as does a line holding
/// only `/` (SQL*Plus block terminator). A script without terminators is one
/// span. Leading whitespace and comments are trimmed off every span.
pub struct ScriptSegments<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> ScriptSegments<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content, pos: 0 }
    }

    fn skip_preamble(&mut self) {
        let bytes = self.content.as_bytes();
        loop {
            while self.pos < bytes.len() && bytes[self.pos].is_ascii_whitespace() {
                self.pos += 1;
            }
            if self.pos >= bytes.len() {
                return;
            }
            if self.content[self.pos..].starts_with("--") {
                self.pos = line_end(bytes, self.pos);
            } else if self.content[self.pos..].starts_with("/*") {
                self.pos = find_from(self.content, self.pos + 2, "*/").map_or(bytes.len(), |i| i + 2);
            } else if self.is_slash_line(self.pos) {
                self.pos = line_end(bytes, self.pos);
            } else {
                return;
            }
        }
    }

    /// Whether the line starting at or containing `at` is a lone `/`.
    fn is_slash_line(&self, at: usize) -> bool {
        let bytes = self.content.as_bytes();
        let line_start = self.content[..at].rfind(['\n', '\r']).map_or(0, |i| i + 1);
        let stop = line_end(bytes, at);
        self.content[line_start..stop].trim() == "/"
    }
}

impl Iterator for ScriptSegments<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        let bytes = self.content.as_bytes();
        loop {
            self.skip_preamble();
            if self.pos >= bytes.len() {
                return None;
            }

            let start = self.pos;
            let mut quote: Option<u8> = None;
            let mut stop = None;
            let mut i = start;
            while i < bytes.len() {
                let b = bytes[i];
                if let Some(q) = quote {
                    if b == q {
                        quote = None;
                    }
                    i += 1;
                    continue;
                }
                match b {
                    b'\'' | b'"' => {
                        quote = Some(b);
                        i += 1;
                    }
                    b'-' if bytes.get(i + 1) == Some(&b'-') => i = line_end(bytes, i),
                    b'/' if bytes.get(i + 1) == Some(&b'*') => {
                        i = find_from(self.content, i + 2, "*/").map_or(bytes.len(), |j| j + 2);
                    }
                    b';' => {
                        stop = Some((i, i + 1));
                        break;
                    }
                    b'\n' | b'\r' => {
                        let next_line = skip_newline(bytes, i);
                        if next_line < bytes.len() && self.is_slash_line(next_line) {
                            stop = Some((i, line_end(bytes, next_line)));
                            break;
                        }
                        i = next_line;
                    }
                    _ => i += 1,
                }
            }

            let (end, resume) = stop.unwrap_or((bytes.len(), bytes.len()));
            self.pos = resume;

            let text = self.content[start..end].trim_end();
            if text.is_empty() {
                continue;
            }
            return Some(
                Span::new(start, start + text.len(), SpanContext::RawLine, text)
                    .with_truncated(quote.is_some()),
            );
        }
    }
}
