use super::{line_end, skip_newline};
use crate::core::{Span, SpanContext};

/// Yields one span per `key=value` entry of a `.properties` file.
///
/// Follows `java.util.Properties` line rules: `#`/`!` comments, `=`, `:` or
/// whitespace as separator, and a trailing odd run of backslashes continuing
/// the value on the next line (with that line's leading whitespace dropped).
pub struct PropertiesSegments<'a> {
    content: &'a str,
    pos: usize,
}

impl<'a> PropertiesSegments<'a> {
    pub fn new(content: &'a str) -> Self {
        Self { content, pos: 0 }
    }

    /// Reads the physical line at `pos`, returning `(start, end)` and advancing.
    fn next_line(&mut self) -> (usize, usize) {
        let bytes = self.content.as_bytes();
        let start = self.pos;
        let end = line_end(bytes, start);
        self.pos = skip_newline(bytes, end);
        (start, end)
    }
}

impl Iterator for PropertiesSegments<'_> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        while self.pos < self.content.len() {
            let (line_start, line_stop) = self.next_line();
            let line = &self.content[line_start..line_stop];
            let trimmed = line.trim_start();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                continue;
            }

            let key_start = line_start + (line.len() - trimmed.len());
            let (key, value_start) = split_entry(self.content, key_start, line_stop);

            let mut text = self.content[value_start..line_stop].to_string();
            let mut start = value_start;
            let mut end = line_stop;
            while ends_with_continuation(&text) {
                text.pop();
                if self.pos >= self.content.len() {
                    break;
                }
                let (next_start, next_stop) = self.next_line();
                let piece = self.content[next_start..next_stop].trim_start();
                // A value that only begins on a continuation line starts there
                if text.trim().is_empty() && !piece.is_empty() {
                    text.clear();
                    start = next_stop - piece.len();
                }
                text.push_str(piece);
                end = next_stop;
            }

            return Some(
                Span::new(start, end, SpanContext::PropertiesValue, text)
                    .with_attribute(unescape_key(key)),
            );
        }
        None
    }
}

/// Splits an entry at its key/value separator. Returns the raw key and the
/// offset where the value starts.
fn split_entry(content: &str, start: usize, stop: usize) -> (&str, usize) {
    let bytes = content.as_bytes();
    let mut i = start;
    while i < stop {
        match bytes[i] {
            b'\\' => i += 2,
            b'=' | b':' | b' ' | b'\t' | b'\x0c' => break,
            _ => i += 1,
        }
    }
    let key_end = i.min(stop);

    let mut j = key_end;
    while j < stop && matches!(bytes[j], b' ' | b'\t' | b'\x0c') {
        j += 1;
    }
    if j < stop && matches!(bytes[j], b'=' | b':') {
        j += 1;
        while j < stop && matches!(bytes[j], b' ' | b'\t' | b'\x0c') {
            j += 1;
        }
    }
    (&content[start..key_end], j)
}

fn ends_with_continuation(text: &str) -> bool {
    text.bytes().rev().take_while(|&b| b == b'\\').count() % 2 == 1
}

fn unescape_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut chars = key.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}
