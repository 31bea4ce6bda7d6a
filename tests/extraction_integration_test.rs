//! End-to-end extraction over each host format through the public API.

use indoc::indoc;
use pretty_assertions::assert_eq;
use sqlscan::{
    extract, extract_tagged, normalize, recognize, segment, Confidence, Error, FormatTag,
    SourceFile, Span, SpanContext, StatementKind,
};

fn extract_one(path: &str, format: FormatTag, content: &str) -> Vec<sqlscan::Statement> {
    extract(&SourceFile::new(path, format, content))
}

#[test]
fn test_properties_continuation_is_one_statement() {
    let content = "key=SELECT * \\\nFROM t\n";

    let spans: Vec<_> = segment(content, FormatTag::Properties).collect();
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].text, "SELECT * FROM t");
    assert_eq!(spans[0].context, SpanContext::PropertiesValue);

    let statements = extract_one("q.properties", FormatTag::Properties, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "SELECT * FROM t");
    assert_eq!(statements[0].line, 1);
}

#[test]
fn test_java_concatenation_is_merged() {
    let content = indoc! {r#"
        public class Repo {
            private static final String Q = "SELECT * " + "FROM users";
        }
    "#};

    let statements = extract_one("Repo.java", FormatTag::Java, content);
    assert_eq!(statements.len(), 1);
    let statement = &statements[0];
    assert_eq!(statement.sql, "SELECT * FROM users");
    assert_eq!(statement.kind, StatementKind::Select);
    assert_eq!(statement.confidence, Confidence::Certain);
    assert_eq!(statement.line, 2);
}

#[test]
fn test_markup_placeholder_is_preserved() {
    let content = r#"<select id="x">SELECT ${col} FROM t</select>"#;

    let statements = extract_one("mapper.xml", FormatTag::Markup, content);
    assert_eq!(statements.len(), 1);
    let statement = &statements[0];
    assert_eq!(statement.confidence, Confidence::Certain);
    assert_eq!(statement.raw, "SELECT ${col} FROM t");
    assert_eq!(statement.sql, "SELECT ${col} FROM t");
}

#[test]
fn test_mapper_element_without_keyword_is_probable() {
    let content = indoc! {r#"
        <mapper namespace="users">
          <update id="touch">
            ${dynamicStatement}
          </update>
        </mapper>
    "#};

    let statements = extract_one("mapper.xml", FormatTag::Markup, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].confidence, Confidence::Probable);
    assert_eq!(statements[0].kind, StatementKind::Other);
    assert_eq!(statements[0].sql, "${dynamicStatement}");
    assert_eq!(statements[0].line, 3);
}

#[test]
fn test_script_without_terminator_is_one_update() {
    let content = "UPDATE accounts\n   SET balance = 0\n WHERE id = 7\n";

    let statements = extract_one("fix.sql", FormatTag::Script, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].kind, StatementKind::Update);
    assert_eq!(statements[0].sql, "UPDATE accounts SET balance = 0 WHERE id = 7");
}

#[test]
fn test_script_ddl_keeps_its_layout() {
    let content = indoc! {"
        CREATE TABLE users (
            id INT,
            name VARCHAR(20)
        );
        INSERT INTO users VALUES (1, 'a;b');
    "};

    let statements = extract_one("schema.sql", FormatTag::Script, content);
    assert_eq!(statements.len(), 2);
    assert_eq!(statements[0].kind, StatementKind::Ddl);
    assert_eq!(
        statements[0].sql,
        "CREATE TABLE users (\n    id INT,\n    name VARCHAR(20)\n)"
    );
    assert_eq!(statements[1].kind, StatementKind::Insert);
    assert_eq!(statements[1].sql, "INSERT INTO users VALUES (1, 'a;b')");
    assert_eq!(statements[1].line, 5);
}

#[test]
fn test_unterminated_literal_at_eof_is_probable() {
    let content = "String q = \"DELETE FROM sessions WHERE expired = 1";

    let statements = extract_one("Cleanup.java", FormatTag::Java, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].confidence, Confidence::Probable);
    assert_eq!(statements[0].kind, StatementKind::Delete);
}

#[test]
fn test_python_adjacent_literals_and_comments() {
    let content = indoc! {r#"
        # "SELECT 1 FROM commented_out"
        QUERY = (
            "SELECT id "
            "FROM orders "
            "WHERE total > :min"
        )
        URL = "https://example.com/select"
    "#};

    let statements = extract_one("orders.py", FormatTag::Python, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "SELECT id FROM orders WHERE total > :min");
    assert_eq!(statements[0].line, 3);
}

#[test]
fn test_with_clause_takes_main_statement_kind() {
    let content = "WITH stale AS (SELECT id FROM jobs) DELETE FROM jobs WHERE id IN (SELECT id FROM stale);";

    let statements = extract_one("purge.sql", FormatTag::Script, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].kind, StatementKind::Delete);
}

#[test]
fn test_extract_tagged_accepts_wire_tags() {
    let statements =
        extract_tagged("Dao.java", "lang-a", b"String q = \"SELECT a FROM b\";".to_vec()).unwrap();
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].file.to_str(), Some("Dao.java"));
}

#[test]
fn test_extract_tagged_rejects_unknown_tag_and_bad_encoding() {
    assert!(matches!(
        extract_tagged("x.cob", "cobol", b"SELECT 1".to_vec()),
        Err(Error::UnsupportedFormat { .. })
    ));
    assert!(matches!(
        extract_tagged("x.sql", "script", vec![0xff, 0xfe, 0x00]),
        Err(Error::Decode { .. })
    ));
}

#[test]
fn test_files_without_sql_yield_nothing() {
    let content = indoc! {r#"
        greeting=Hello there
        url=http://localhost:8080/select
    "#};
    assert!(extract_one("app.properties", FormatTag::Properties, content).is_empty());
}

#[test]
fn test_short_statements_in_properties() {
    let content = indoc! {"
        validationQuery=select 1
        seq=select nextval('order_seq')
    "};

    let statements = extract_one("pool.properties", FormatTag::Properties, content);
    let sql: Vec<&str> = statements.iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(sql, vec!["select 1", "select nextval('order_seq')"]);
    assert!(statements.iter().all(|s| s.kind == StatementKind::Select));
    assert_eq!(statements[1].line, 2);
}

#[test]
fn test_keyword_fragment_before_a_variable() {
    let content = indoc! {r#"
        class Report {
            String q = "SELECT " + cols + " FROM t";
        }
    "#};

    let statements = extract_one("Report.java", FormatTag::Java, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "SELECT");
    assert_eq!(statements[0].kind, StatementKind::Select);
    assert_eq!(statements[0].line, 2);
}

#[test]
fn test_python_aggregate_without_from() {
    let statements = extract_one("stats.py", FormatTag::Python, "q = 'select count(*) as n'\n");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "select count(*) as n");
    assert_eq!(statements[0].confidence, Confidence::Certain);
}

#[test]
fn test_properties_value_on_continuation_line_reports_that_line() {
    let content = "users.all=\\\n    SELECT * FROM users\n";

    let statements = extract_one("q.properties", FormatTag::Properties, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "SELECT * FROM users");
    assert_eq!(statements[0].line, 2);
}

#[test]
fn test_prose_is_not_extracted() {
    let content = indoc! {"
        prompt=Select an option
        error=Update failed, please retry
    "};
    assert!(extract_one("messages.properties", FormatTag::Properties, content).is_empty());
}

#[test]
fn test_canonical_sql_is_stable_in_its_host_context() {
    let content = r#"<select id="x">SELECT '&amp;lt;' FROM t WHERE a &lt; 2</select>"#;
    let statements = extract_one("mapper.xml", FormatTag::Markup, content);
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].sql, "SELECT '&lt;' FROM t WHERE a < 2");

    let literal = r#"String q = "SELECT 'a\\nb'\nFROM t";"#;
    let from_java = extract_one("Dao.java", FormatTag::Java, literal);
    assert_eq!(from_java.len(), 1);
    assert_eq!(from_java[0].sql, r"SELECT 'a\nb' FROM t");

    for statement in statements.iter().chain(&from_java) {
        let span = Span::new(0, statement.sql.len(), statement.context, statement.sql.clone())
            .with_host_escaped(false);
        let again = normalize(recognize(&span).unwrap(), statement.line);
        assert_eq!(again.sql, statement.sql);
        assert_eq!(again.kind, statement.kind);
    }
}
