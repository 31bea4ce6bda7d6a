use crate::core::{Confidence, FormatTag};
use crate::io::output::OutputFormat;
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sqlscan")]
#[command(about = "Finds embedded SQL statements in source trees", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Confidence threshold as accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfidenceArg {
    /// Only statements that open with a SQL keyword
    Certain,
    /// Also statements inferred from their mapper element
    Probable,
}

impl From<ConfidenceArg> for Confidence {
    fn from(arg: ConfidenceArg) -> Self {
        match arg {
            ConfidenceArg::Certain => Confidence::Certain,
            ConfidenceArg::Probable => Confidence::Probable,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan a directory, file or repository for embedded SQL
    Scan {
        /// Path to scan (defaults to the current directory)
        #[arg(conflicts_with = "repo")]
        path: Option<PathBuf>,

        /// Clone this git URL (git@host:owner/repo.git or https) and scan it
        #[arg(long)]
        repo: Option<String>,

        /// Output file, appended to (defaults to stdout, or
        /// <repo_name>_analysis.jsonl with --repo)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output record layout
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Drop statements below this confidence from the output
        #[arg(long, value_enum)]
        min_confidence: Option<ConfidenceArg>,

        /// Host formats to scan (properties, markup, script, lang-a, lang-b)
        #[arg(long, value_delimiter = ',', value_parser = parse_format_tag)]
        formats: Option<Vec<FormatTag>>,

        /// Glob patterns to exclude, added to the configured ones
        #[arg(long, value_delimiter = ',')]
        ignore: Vec<String>,

        /// Scan files one at a time
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Number of worker threads (0 = one per core)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,

        /// Increase log verbosity (-v info, -vv debug, -vvv trace)
        #[arg(short, long, action = ArgAction::Count)]
        verbose: u8,

        /// Do not print the summary to stderr
        #[arg(long = "no-summary")]
        no_summary: bool,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Write a default .sqlscan.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_format_tag(s: &str) -> Result<FormatTag, String> {
    s.parse::<FormatTag>().map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_scan_arguments() {
        let cli = Cli::try_parse_from([
            "sqlscan",
            "scan",
            "src",
            "--formats",
            "markup,lang-a",
            "--min-confidence",
            "certain",
            "-f",
            "files",
            "-vv",
            "--ignore",
            "**/gen/**,*.hbm",
        ])
        .unwrap();

        match cli.command {
            Commands::Scan {
                path,
                formats,
                min_confidence,
                format,
                verbose,
                ignore,
                ..
            } => {
                assert_eq!(path, Some(PathBuf::from("src")));
                assert_eq!(formats, Some(vec![FormatTag::Markup, FormatTag::Java]));
                assert_eq!(min_confidence, Some(ConfidenceArg::Certain));
                assert_eq!(format, Some(OutputFormat::Files));
                assert_eq!(verbose, 2);
                assert_eq!(ignore, vec!["**/gen/**", "*.hbm"]);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_unknown_format_tag_rejected() {
        let err = Cli::try_parse_from(["sqlscan", "scan", "--formats", "cobol"]).unwrap_err();
        assert!(err.to_string().contains("cobol"));
    }

    #[test]
    fn test_path_and_repo_conflict() {
        assert!(Cli::try_parse_from(["sqlscan", "scan", ".", "--repo", "git@h:o/r.git"]).is_err());
    }
}
