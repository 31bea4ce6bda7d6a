use super::lexer::{pieces, Piece};
use crate::core::StatementKind;

/// Canonical text of unescaped SQL of the given kind.
///
/// DDL keeps its line layout; every other kind is folded onto one line.
/// Quoted regions are never altered. Applying this to its own output is a
/// no-op.
pub fn canonical_text(sql: &str, kind: StatementKind) -> String {
    let text = match kind {
        StatementKind::Ddl => ddl_layout(sql),
        _ => single_line(sql),
    };
    strip_terminator(&text).to_string()
}

fn strip_terminator(text: &str) -> &str {
    text.trim_end_matches(|c: char| c == ';' || c.is_whitespace())
}

fn ddl_layout(sql: &str) -> String {
    let lines: Vec<&str> = sql.lines().map(str::trim_end).collect();
    let first = lines.iter().position(|l| !l.is_empty());
    let last = lines.iter().rposition(|l| !l.is_empty());
    match (first, last) {
        (Some(first), Some(last)) => lines[first..=last].join("\n").trim_start().to_string(),
        _ => String::new(),
    }
}

/// Whitespace runs outside quotes become one space and `-- x` line comments
/// become `/* x */`, since a line comment cannot survive on a single line.
fn single_line(sql: &str) -> String {
    let mut out = Folded::default();
    for piece in pieces(sql) {
        match piece {
            Piece::Code(code) => out.push_folding(code),
            Piece::Quoted(quoted) => out.push_verbatim(quoted),
            Piece::BlockComment(comment) => out.push_folding(comment),
            Piece::LineComment(body) => {
                let body = body
                    .split_whitespace()
                    .collect::<Vec<_>>()
                    .join(" ")
                    .replace("*/", "* /");
                if body.is_empty() {
                    out.push_verbatim("/* */");
                } else {
                    out.push_verbatim(&format!("/* {body} */"));
                }
            }
        }
    }
    out.text
}

#[derive(Default)]
struct Folded {
    text: String,
    pending_space: bool,
}

impl Folded {
    fn push_folding(&mut self, s: &str) {
        for c in s.chars() {
            if c.is_whitespace() {
                self.pending_space = !self.text.is_empty();
            } else {
                self.flush();
                self.text.push(c);
            }
        }
    }

    fn push_verbatim(&mut self, s: &str) {
        self.flush();
        self.text.push_str(s);
    }

    fn flush(&mut self) {
        if self.pending_space {
            self.text.push(' ');
            self.pending_space = false;
        }
    }
}
