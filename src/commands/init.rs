use crate::config::CONFIG_FILE_NAME;
use crate::io;
use anyhow::Result;
use std::path::Path;

pub const DEFAULT_CONFIG: &str = r#"# sqlscan configuration

[ignore]
patterns = [
    "**/target/**",
    "**/node_modules/**",
    "**/build/**",
]

[recognizer]
# Spans shorter than this (after trimming) are never reported
min_length = 4
# Markup elements whose text is SQL even without a leading keyword.
# Setting this replaces the built-in list.
# mapper_elements = ["select", "insert", "update", "delete", "sql"]
# Extra regexes for strings that are never SQL
extra_exclude_patterns = []

[output]
# "certain" keeps only statements that open with a SQL keyword
min_confidence = "probable"
# "statements" (one record per statement) or "files" (one per file)
format = "statements"

[formats.extensions]
# Map additional file extensions to a format tag
# (properties, markup, script, lang-a, lang-b)
# pkg = "script"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_in(Path::new("."), force)
}

pub fn init_config_in(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE_NAME);

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", CONFIG_FILE_NAME);

    Ok(())
}
