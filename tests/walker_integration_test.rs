//! File discovery over real directory trees.

use sqlscan::core::FormatTag;
use sqlscan::io::walker::{find_source_files, FileWalker};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn relatives(walker: &FileWalker) -> Vec<PathBuf> {
    walker
        .walk()
        .unwrap()
        .successes
        .into_iter()
        .map(|f| f.relative)
        .collect()
}

fn project() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "app.properties", "q=SELECT 1\n");
    write(root, "db/schema.sql", "CREATE TABLE t (a INT);\n");
    write(root, "src/Dao.java", "class Dao {}\n");
    write(root, "src/dao.py", "Q = ''\n");
    write(root, "mappers/users.xml", "<mapper/>\n");
    write(root, "README.md", "# nothing\n");
    write(root, "legacy/old.sql", "DELETE FROM t;\n");
    temp_dir
}

#[test]
fn test_walk_finds_every_known_format_in_order() {
    let temp_dir = project();
    let files = FileWalker::new(temp_dir.path().to_path_buf()).walk().unwrap();

    assert!(files.failures.is_empty());
    let found: Vec<(PathBuf, FormatTag)> = files
        .successes
        .into_iter()
        .map(|f| (f.relative, f.format))
        .collect();
    assert_eq!(
        found,
        vec![
            (PathBuf::from("app.properties"), FormatTag::Properties),
            (PathBuf::from("db/schema.sql"), FormatTag::Script),
            (PathBuf::from("legacy/old.sql"), FormatTag::Script),
            (PathBuf::from("mappers/users.xml"), FormatTag::Markup),
            (PathBuf::from("src/Dao.java"), FormatTag::Java),
            (PathBuf::from("src/dao.py"), FormatTag::Python),
        ]
    );
}

#[test]
fn test_walk_honours_gitignore_and_skips_git_dir() {
    let temp_dir = project();
    write(temp_dir.path(), ".gitignore", "legacy/\n");
    write(temp_dir.path(), ".git/hooks/pre-commit.sql", "DROP TABLE t;\n");

    let found = relatives(&FileWalker::new(temp_dir.path().to_path_buf()));
    assert!(!found.contains(&PathBuf::from("legacy/old.sql")));
    assert!(found.iter().all(|p| !p.starts_with(".git")));
    assert_eq!(found.len(), 5);
}

#[test]
fn test_ignore_patterns_match_relative_paths() {
    let temp_dir = project();
    let walker = FileWalker::new(temp_dir.path().to_path_buf())
        .with_ignore_patterns(vec!["legacy/*".to_string(), "**/*.py".to_string()]);

    let found = relatives(&walker);
    assert!(!found.contains(&PathBuf::from("legacy/old.sql")));
    assert!(!found.contains(&PathBuf::from("src/dao.py")));
    assert_eq!(found.len(), 4);
}

#[test]
fn test_invalid_ignore_pattern_is_an_error() {
    let temp_dir = project();
    let walker = FileWalker::new(temp_dir.path().to_path_buf())
        .with_ignore_patterns(vec!["[unclosed".to_string()]);
    assert!(walker.walk().is_err());
}

#[test]
fn test_extension_overrides_take_precedence() {
    let temp_dir = project();
    write(temp_dir.path(), "jobs/nightly.job", "DELETE FROM staging;\n");
    write(temp_dir.path(), "conf/app.config", "<add key=\"q\"/>\n");

    let walker = FileWalker::new(temp_dir.path().to_path_buf()).with_extension_overrides(vec![
        ("job".to_string(), FormatTag::Script),
        ("config".to_string(), FormatTag::Properties),
    ]);
    let files = walker.walk().unwrap().successes;

    let format_of = |name: &str| {
        files
            .iter()
            .find(|f| f.relative == Path::new(name))
            .map(|f| f.format)
    };
    assert_eq!(format_of("jobs/nightly.job"), Some(FormatTag::Script));
    assert_eq!(format_of("conf/app.config"), Some(FormatTag::Properties));
}

#[test]
fn test_format_filter() {
    let temp_dir = project();
    let files = find_source_files(temp_dir.path(), vec![FormatTag::Java, FormatTag::Python]).unwrap();
    let formats: Vec<FormatTag> = files.iter().map(|f| f.format).collect();
    assert_eq!(formats, vec![FormatTag::Java, FormatTag::Python]);
}

#[test]
fn test_single_file_root_reports_its_name() {
    let temp_dir = project();
    let root = temp_dir.path().join("db/schema.sql");
    let found = relatives(&FileWalker::new(root));
    assert_eq!(found, vec![PathBuf::from("schema.sql")]);
}
