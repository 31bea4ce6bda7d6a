use crate::core::{FormatTag, Result};
use crate::errors::{ScanFailure, ScanResults};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// A file selected for scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    pub path: PathBuf,
    /// Path relative to the walk root, used in reports
    pub relative: PathBuf,
    pub format: FormatTag,
}

pub struct FileWalker {
    root: PathBuf,
    formats: Vec<FormatTag>,
    ignore_patterns: Vec<String>,
    extension_overrides: Vec<(String, FormatTag)>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            formats: FormatTag::ALL.to_vec(),
            ignore_patterns: vec![],
            extension_overrides: vec![],
        }
    }

    pub fn with_formats(mut self, formats: Vec<FormatTag>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_ignore_patterns(mut self, patterns: Vec<String>) -> Self {
        self.ignore_patterns = patterns;
        self
    }

    /// Extension to format mappings consulted before the built-in table.
    pub fn with_extension_overrides(mut self, overrides: Vec<(String, FormatTag)>) -> Self {
        self.extension_overrides = overrides;
        self
    }

    /// Walk the tree, honouring `.gitignore` and skipping `.git`.
    ///
    /// Unreadable directories are collected as failures; only an invalid
    /// ignore pattern aborts the walk.
    pub fn walk(&self) -> Result<ScanResults<WalkedFile>> {
        let patterns = self
            .ignore_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;

        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .require_git(false)
            .filter_entry(|entry| entry.file_name() != ".git")
            .sort_by_file_name(|a, b| a.cmp(b))
            .build();

        let mut results = ScanResults::default();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    log::warn!("Skipping unreadable entry: {}", err);
                    let path = error_path(&err).unwrap_or_else(|| self.root.clone());
                    results.failures.push(ScanFailure::directory_access(path, err));
                    continue;
                }
            };

            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let relative = relative_path(&self.root, path);
            if is_ignored(&patterns, path, &relative) {
                continue;
            }
            if let Some(format) = self.format_for(path) {
                results.successes.push(WalkedFile {
                    path: path.to_path_buf(),
                    relative,
                    format,
                });
            }
        }

        Ok(results)
    }

    fn format_for(&self, path: &Path) -> Option<FormatTag> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        self.extension_overrides
            .iter()
            .find(|(e, _)| *e == ext)
            .map(|(_, tag)| *tag)
            .or_else(|| FormatTag::from_extension(&ext))
            .filter(|format| self.formats.contains(format))
    }
}

fn is_ignored(patterns: &[glob::Pattern], path: &Path, relative: &Path) -> bool {
    patterns
        .iter()
        .any(|p| p.matches_path(path) || p.matches_path(relative))
}

/// `path` relative to `root`; a root that is itself a file reports its name.
fn relative_path(root: &Path, path: &Path) -> PathBuf {
    match path.strip_prefix(root) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path
            .file_name()
            .map(PathBuf::from)
            .unwrap_or_else(|| path.to_path_buf()),
    }
}

fn error_path(err: &ignore::Error) -> Option<PathBuf> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.clone()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        _ => None,
    }
}

pub fn find_source_files(root: &Path, formats: Vec<FormatTag>) -> Result<Vec<WalkedFile>> {
    Ok(FileWalker::new(root.to_path_buf())
        .with_formats(formats)
        .walk()?
        .successes)
}
