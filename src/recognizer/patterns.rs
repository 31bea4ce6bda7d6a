//! Keyword, placeholder and boilerplate tables used by the recognizer.

use once_cell::sync::Lazy;
use regex::Regex;

/// Keywords that may open an embedded SQL statement.
pub const LEADING_KEYWORDS: &[&str] = &[
    "SELECT", "INSERT", "UPDATE", "DELETE", "CREATE", "ALTER", "DROP", "MERGE", "WITH",
];

/// Markup elements whose text is a SQL statement even without a leading
/// keyword (MyBatis, iBATIS, JPA `orm.xml`, Hibernate mappings).
pub const DEFAULT_MAPPER_ELEMENTS: &[&str] = &[
    "select",
    "insert",
    "update",
    "delete",
    "sql",
    "statement",
    "procedure",
    "selectKey",
    "query",
    "named-query",
    "named-native-query",
    "native-query",
    "sql-query",
];

/// Words that mark a title-case keyword sentence as SQL rather than prose.
const CLAUSE_WORDS: &[&str] = &[
    "from", "into", "set", "where", "values", "table", "view", "index", "sequence", "synonym",
    "trigger", "procedure", "function", "package", "schema", "join", "dual", "distinct", "union",
    "having", "select", "materialized", "returning",
];

/// Host-side bind placeholders that contain arbitrary text: `#{..}` and `${..}`.
/// `:name` and `?` are already opaque tokens and need no masking.
static BRACED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| compile(r"[#$]\{[^}]*\}"));

/// Known non-SQL boilerplate, checked before any keyword test.
static BOILERPLATE: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    [
        ("url", r"(?i)^[a-z][a-z0-9+.\-]*://\S*"),
        ("jdbc-url", r"(?i)^jdbc:"),
        ("log-format", r"\{\}"),
        ("log-level-prefix", r"(?i)^\[?(trace|debug|info|warn|warning|error|fatal)\]?[:\s]"),
        ("sentence", r"^[A-Z][a-z]+\b[^;=*()]*[a-z]\.$"),
    ]
    .into_iter()
    .map(|(name, pattern)| (name, compile(pattern)))
    .collect()
});

fn compile(pattern: &str) -> Regex {
    // Patterns are compile-time constants covered by the unit tests below.
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid built-in pattern {pattern}: {e}"))
}

/// Replaces `#{..}`/`${..}` with `?` so their contents cannot fake keywords.
pub fn mask_placeholders(text: &str) -> std::borrow::Cow<'_, str> {
    BRACED_PLACEHOLDER.replace_all(text, "?")
}

/// Skips leading whitespace and opening parentheses.
pub fn strip_leading_parens(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || c == '(')
}

/// Leading SQL keyword of `text`, matched case-insensitively on a word boundary.
pub fn leading_keyword(text: &str) -> Option<&'static str> {
    LEADING_KEYWORDS.iter().copied().find(|keyword| {
        text.get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
            && !text[keyword.len()..]
                .chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
    })
}

/// Title-case word followed only by plain words, none of them a SQL clause
/// word: `Select an option`, `Update failed, please retry`.
fn looks_like_prose(text: &str) -> bool {
    let mut words = text.split_whitespace();
    let title_case = words.next().is_some_and(|first| {
        let mut chars = first.chars();
        chars.next().is_some_and(|c| c.is_ascii_uppercase())
            && chars.all(|c| c.is_ascii_lowercase())
    });
    if !title_case {
        return false;
    }

    let mut rest = words.peekable();
    rest.peek().is_some()
        && rest.all(|word| {
            let word = word.trim_end_matches(['.', ',', '!', '?', ':']);
            !word.is_empty()
                && word.chars().all(|c| c.is_ascii_alphabetic() || c == '\'')
                && !CLAUSE_WORDS
                    .iter()
                    .any(|clause| word.eq_ignore_ascii_case(clause))
        })
}

/// Name of the boilerplate rule `text` matches, if any.
pub fn boilerplate_rule(text: &str) -> Option<&'static str> {
    BOILERPLATE
        .iter()
        .find(|(_, pattern)| pattern.is_match(text))
        .map(|(name, _)| *name)
        .or_else(|| looks_like_prose(text).then_some("prose"))
}
