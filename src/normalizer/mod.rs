//! Turns a recognized match into the reported [`Statement`].
//!
//! Normalization never fails: text that opens with no known keyword is kept
//! with kind `other`.

pub mod canonical;
pub mod lexer;
pub mod unescape;

use crate::core::{RawMatch, Statement, StatementKind};
use lexer::Token;
use std::borrow::Cow;
use std::path::PathBuf;

pub use canonical::canonical_text;
pub use unescape::strip_host_escapes;

static KIND_MAP: &[(&[&str], StatementKind)] = &[
    (&["SELECT"], StatementKind::Select),
    (&["INSERT"], StatementKind::Insert),
    (&["UPDATE", "MERGE"], StatementKind::Update),
    (&["DELETE"], StatementKind::Delete),
    (
        &[
            "CREATE", "ALTER", "DROP", "TRUNCATE", "RENAME", "COMMENT", "GRANT", "REVOKE",
        ],
        StatementKind::Ddl,
    ),
];

/// Keywords that can open the main clause after a `WITH` list.
const MAIN_CLAUSE_KEYWORDS: &[&str] = &["SELECT", "INSERT", "UPDATE", "DELETE", "MERGE"];

fn kind_of_keyword(word: &str) -> Option<StatementKind> {
    KIND_MAP
        .iter()
        .find(|(words, _)| words.iter().any(|w| w.eq_ignore_ascii_case(word)))
        .map(|(_, kind)| *kind)
}

/// Statement kind from the first keyword, skipping whitespace, opening
/// parentheses and comments.
///
/// `WITH` takes the kind of the first main-clause keyword at its own nesting
/// level, defaulting to SELECT.
pub fn classify(sql: &str) -> StatementKind {
    let tokens = lexer::tokens(sql);
    let Some(&(depth, Token::Word(first))) = tokens.first() else {
        return StatementKind::Other;
    };
    if !first.eq_ignore_ascii_case("WITH") {
        return kind_of_keyword(first).unwrap_or(StatementKind::Other);
    }

    tokens[1..]
        .iter()
        .filter(|(d, _)| *d == depth)
        .find_map(|(_, token)| match token {
            Token::Word(w) if MAIN_CLAUSE_KEYWORDS.iter().any(|k| k.eq_ignore_ascii_case(w)) => {
                kind_of_keyword(w)
            }
            _ => None,
        })
        .unwrap_or(StatementKind::Select)
}

/// Build the reported statement for `m`, found on `source_line`.
///
/// The file path is left empty for the caller to fill in.
///
/// Host escapes are stripped only while the span still carries them, so
/// canonical text re-normalized in its original context is a fixed point.
pub fn normalize(m: RawMatch<'_>, source_line: usize) -> Statement {
    let unescaped = if m.span.host_escaped {
        strip_host_escapes(&m.text, m.span.context)
    } else {
        Cow::Borrowed(m.text.as_str())
    };
    let kind = classify(&unescaped);
    let sql = canonical_text(&unescaped, kind);
    Statement {
        file: PathBuf::new(),
        line: source_line,
        sql,
        kind,
        context: m.span.context,
        confidence: m.confidence,
        raw: m.text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Confidence, Span, SpanContext};
    use pretty_assertions::assert_eq;

    fn raw_match(span: &Span) -> RawMatch<'_> {
        RawMatch {
            span,
            start: span.start,
            end: span.end,
            text: span.text.trim().to_string(),
            confidence: Confidence::Certain,
        }
    }

    #[test]
    fn test_classify_by_first_keyword() {
        assert_eq!(classify("select 1 from dual"), StatementKind::Select);
        assert_eq!(classify("  ((SELECT a FROM t))"), StatementKind::Select);
        assert_eq!(classify("Insert into t values (1)"), StatementKind::Insert);
        assert_eq!(classify("MERGE INTO t USING s ON (1=1)"), StatementKind::Update);
        assert_eq!(classify("-- lead\n/* c */ DELETE FROM t"), StatementKind::Delete);
        assert_eq!(classify("truncate table t"), StatementKind::Ddl);
        assert_eq!(classify("GRANT SELECT ON t TO u"), StatementKind::Ddl);
        assert_eq!(classify("${dynamic}"), StatementKind::Other);
        assert_eq!(classify("seq.nextval"), StatementKind::Other);
        assert_eq!(classify(""), StatementKind::Other);
    }

    #[test]
    fn test_classify_with_resolves_main_clause() {
        assert_eq!(
            classify("WITH a AS (SELECT 1 FROM t) SELECT * FROM a"),
            StatementKind::Select
        );
        assert_eq!(
            classify("with recursive r(n) as (select 1) insert into t select n from r"),
            StatementKind::Insert
        );
        assert_eq!(
            classify("WITH a AS (DELETE FROM t RETURNING *) UPDATE s SET x = 1"),
            StatementKind::Update
        );
        assert_eq!(classify("WITH a AS (SELECT 1)"), StatementKind::Select);
        assert_eq!(
            classify("(WITH a AS (SELECT 1) DELETE FROM t)"),
            StatementKind::Delete
        );
    }

    #[test]
    fn test_normalize_string_literal() {
        let span = Span::new(
            10,
            60,
            SpanContext::StringLiteral,
            r#"SELECT \"Id\",\n       name\n  FROM users;"#,
        );
        let statement = normalize(raw_match(&span), 3);
        assert_eq!(statement.sql, r#"SELECT "Id", name FROM users"#);
        assert_eq!(statement.kind, StatementKind::Select);
        assert_eq!(statement.raw, span.text);
        assert_eq!(statement.line, 3);
        assert_eq!(statement.context, SpanContext::StringLiteral);
    }

    #[test]
    fn test_normalize_xml_text_keeps_placeholders() {
        let span = Span::new(0, 40, SpanContext::XmlText, "SELECT ${col} FROM t WHERE a &lt; #{a}")
            .with_element("select");
        let statement = normalize(raw_match(&span), 1);
        assert_eq!(statement.sql, "SELECT ${col} FROM t WHERE a < #{a}");
        assert!(statement.raw.contains("${col}"));
    }

    #[test]
    fn test_normalize_ddl_preserves_lines() {
        let span = Span::new(
            0,
            0,
            SpanContext::RawLine,
            "CREATE TABLE t (\n  id INT,   \n  name TEXT\n)",
        );
        let statement = normalize(raw_match(&span), 1);
        assert_eq!(statement.kind, StatementKind::Ddl);
        assert_eq!(statement.sql, "CREATE TABLE t (\n  id INT,\n  name TEXT\n)");
    }

    #[test]
    fn test_normalize_unknown_keyword_is_other() {
        let span = Span::new(0, 0, SpanContext::XmlText, "  seq_orders.nextval ").with_element("selectKey");
        let statement = normalize(raw_match(&span), 7);
        assert_eq!(statement.kind, StatementKind::Other);
        assert_eq!(statement.sql, "seq_orders.nextval");
    }

    #[test]
    fn test_normalize_is_idempotent_on_its_output() {
        let span = Span::new(0, 0, SpanContext::StringLiteral, "UPDATE t\\n SET a = 'x  y' -- why\\n WHERE id = ?;");
        let first = normalize(raw_match(&span), 1);
        let again_span = Span::new(0, 0, SpanContext::RawLine, first.sql.clone());
        let second = normalize(raw_match(&again_span), 1);
        assert_eq!(second.sql, first.sql);
        assert_eq!(second.kind, first.kind);
    }

    #[test]
    fn test_normalized_text_is_stable_in_its_host_context() {
        let cases = [
            (SpanContext::XmlText, "SELECT '&amp;lt;' FROM t WHERE a &lt; 1"),
            (SpanContext::StringLiteral, r"SELECT 'a\\nb' FROM t"),
            (SpanContext::PropertiesValue, r"SELECT 'a\\tb' FROM t"),
        ];
        for (context, text) in cases {
            let span = Span::new(0, text.len(), context, text);
            let first = normalize(raw_match(&span), 1);
            let again_span = Span::new(0, first.sql.len(), context, first.sql.clone())
                .with_host_escaped(false);
            let second = normalize(raw_match(&again_span), 1);
            assert_eq!(second.sql, first.sql, "{context:?}");
        }

        let span = Span::new(0, 0, SpanContext::XmlText, "SELECT '&amp;lt;' FROM t");
        assert_eq!(normalize(raw_match(&span), 1).sql, "SELECT '&lt;' FROM t");
    }
}
