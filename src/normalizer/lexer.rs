//! Just enough SQL lexing to tell code from quoted text and comments.

/// A region of SQL text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece<'a> {
    /// Unquoted SQL
    Code(&'a str),
    /// A `'..'`, `".."` or `` `..` `` region including its quotes. May be
    /// unterminated at the end of the text.
    Quoted(&'a str),
    /// Body of a `--` comment, without the marker and the line break
    LineComment(&'a str),
    /// A `/* .. */` comment including its delimiters
    BlockComment(&'a str),
}

pub struct Pieces<'a> {
    sql: &'a str,
    pos: usize,
}

pub fn pieces(sql: &str) -> Pieces<'_> {
    Pieces { sql, pos: 0 }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = Piece<'a>;

    fn next(&mut self) -> Option<Piece<'a>> {
        let bytes = self.sql.as_bytes();
        let start = self.pos;
        if start >= bytes.len() {
            return None;
        }

        let piece = match bytes[start] {
            q @ (b'\'' | b'"' | b'`') => {
                let end = self.sql[start + 1..]
                    .find(q as char)
                    .map_or(bytes.len(), |off| start + 1 + off + 1);
                self.pos = end;
                Piece::Quoted(&self.sql[start..end])
            }
            b'-' if bytes.get(start + 1) == Some(&b'-') => {
                let end = self.sql[start..]
                    .find(['\n', '\r'])
                    .map_or(bytes.len(), |off| start + off);
                self.pos = end;
                Piece::LineComment(&self.sql[start + 2..end])
            }
            b'/' if bytes.get(start + 1) == Some(&b'*') => {
                let end = self.sql[start + 2..]
                    .find("*/")
                    .map_or(bytes.len(), |off| start + 2 + off + 2);
                self.pos = end;
                Piece::BlockComment(&self.sql[start..end])
            }
            _ => {
                let mut end = start + 1;
                while end < bytes.len() && !opens_piece(bytes, end) {
                    end += 1;
                }
                self.pos = end;
                Piece::Code(&self.sql[start..end])
            }
        };
        Some(piece)
    }
}

fn opens_piece(bytes: &[u8], at: usize) -> bool {
    match bytes[at] {
        b'\'' | b'"' | b'`' => true,
        b'-' => bytes.get(at + 1) == Some(&b'-'),
        b'/' => bytes.get(at + 1) == Some(&b'*'),
        _ => false,
    }
}

/// A significant token of unquoted SQL, with its parenthesis depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Word(&'a str),
    Other,
}

/// Tokens outside quotes and comments. Parentheses are not tokens; they only
/// change the reported depth. `#{..}` and `${..}` placeholders are one
/// `Other` token.
pub fn tokens(sql: &str) -> Vec<(usize, Token<'_>)> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    for piece in pieces(sql) {
        match piece {
            Piece::Code(code) => code_tokens(code, &mut depth, &mut out),
            Piece::Quoted(_) => out.push((depth, Token::Other)),
            Piece::LineComment(_) | Piece::BlockComment(_) => {}
        }
    }
    out
}

fn code_tokens<'a>(code: &'a str, depth: &mut usize, out: &mut Vec<(usize, Token<'a>)>) {
    let bytes = code.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'(' => {
                *depth += 1;
                i += 1;
            }
            b')' => {
                *depth = depth.saturating_sub(1);
                i += 1;
            }
            b'#' | b'$' if bytes.get(i + 1) == Some(&b'{') => {
                i = code[i..].find('}').map_or(bytes.len(), |off| i + off + 1);
                out.push((*depth, Token::Other));
            }
            _ if b.is_ascii_alphabetic() || b == b'_' => {
                let start = i;
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                out.push((*depth, Token::Word(&code[start..i])));
            }
            _ if b.is_ascii_whitespace() => i += 1,
            _ => {
                let width = code[i..].chars().next().map_or(1, char::len_utf8);
                i += width;
                out.push((*depth, Token::Other));
            }
        }
    }
}
