//! Removal of escaping the host format put around embedded SQL.

use crate::core::SpanContext;
use std::borrow::Cow;

/// Undo the host format's escaping for text cut from `context`.
///
/// SQL's own doubled-quote escape (`''`) is never touched.
pub fn strip_host_escapes(text: &str, context: SpanContext) -> Cow<'_, str> {
    match context {
        SpanContext::StringLiteral if text.contains('\\') => Cow::Owned(unescape_literal(text)),
        SpanContext::XmlText if text.contains('&') => Cow::Owned(decode_entities(text)),
        SpanContext::PropertiesValue if text.contains('\\') => Cow::Owned(unescape_properties(text)),
        _ => Cow::Borrowed(text),
    }
}

/// Backslash escapes of Java and Python string literals. Unknown escapes such
/// as `\d` are kept as written.
fn unescape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.peek().copied() {
            Some(e @ ('"' | '\'' | '\\')) => {
                out.push(e);
                chars.next();
            }
            Some('n') => {
                out.push('\n');
                chars.next();
            }
            Some('r') => {
                out.push('\r');
                chars.next();
            }
            Some('t') => {
                out.push('\t');
                chars.next();
            }
            // Line continuation inside a text block or triple-quoted string.
            Some('\n') => {
                chars.next();
            }
            _ => out.push('\\'),
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        let decoded = rest
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&rest[1..semi]).map(|c| (c, semi)));
        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = if let Some(hex) = name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()?
            } else {
                name.strip_prefix('#')?.parse::<u32>().ok()?
            };
            char::from_u32(code)
        }
    }
}

/// `java.util.Properties` escapes, including `\uXXXX`.
fn unescape_properties(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_escapes() {
        let text = r#"SELECT \"Name\" FROM t WHERE a = 'x\'y'\n  AND b ~ '\d'"#;
        assert_eq!(
            strip_host_escapes(text, SpanContext::StringLiteral),
            "SELECT \"Name\" FROM t WHERE a = 'x'y'\n  AND b ~ '\\d'"
        );
    }

    #[test]
    fn test_doubled_quotes_are_sql_and_kept() {
        let text = "INSERT INTO t VALUES ('it''s')";
        for context in [
            SpanContext::StringLiteral,
            SpanContext::XmlText,
            SpanContext::PropertiesValue,
            SpanContext::RawLine,
        ] {
            assert_eq!(strip_host_escapes(text, context), text);
        }
    }

    #[test]
    fn test_xml_entities() {
        assert_eq!(
            strip_host_escapes("a &lt; 5 AND b &gt;= &#49; AND c = &quot;x&quot; &amp; &#x41;", SpanContext::XmlText),
            "a < 5 AND b >= 1 AND c = \"x\" & A"
        );
        assert_eq!(
            strip_host_escapes("a && b &unknown; c", SpanContext::XmlText),
            "a && b &unknown; c"
        );
    }

    #[test]
    fn test_properties_escapes() {
        assert_eq!(
            strip_host_escapes(r"SELECT a\=1 FROM t WHERE n A \: x\\y", SpanContext::PropertiesValue),
            "SELECT a=1 FROM t WHERE n A : x\\y"
        );
    }

    #[test]
    fn test_raw_lines_untouched() {
        let text = r"SELECT '\n' FROM t WHERE a &lt; 1";
        assert_eq!(strip_host_escapes(text, SpanContext::RawLine), text);
    }
}
