//! Progress feedback for scans.
//!
//! - **Quiet Mode**: No progress output (`--quiet` flag or `SQLSCAN_QUIET`)
//! - **Non-TTY**: Progress bars are hidden in CI and piped output

use indicatif::{ProgressBar, ProgressStyle};

pub const TEMPLATE_FILE_SCAN: &str = "📁 {msg} {pos}/{len} files ({percent}%) - {eta}";

/// Configuration for progress display behavior
#[derive(Debug, Clone, Default)]
pub struct ProgressConfig {
    pub quiet_mode: bool,
}

impl ProgressConfig {
    pub fn from_env(quiet: bool) -> Self {
        let env_quiet = std::env::var("SQLSCAN_QUIET").is_ok();
        Self {
            quiet_mode: quiet || env_quiet,
        }
    }

    pub fn should_show_progress(&self) -> bool {
        if self.quiet_mode {
            return false;
        }

        use std::io::IsTerminal;
        std::io::stderr().is_terminal()
    }

    /// Bar over `len` files; hidden when progress should not be shown.
    pub fn file_bar(&self, len: u64) -> ProgressBar {
        if !self.should_show_progress() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar().template(TEMPLATE_FILE_SCAN) {
            pb.set_style(style.progress_chars("█▓▒░  "));
        }
        pb.set_message("Scanning");
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_quiet_flag() {
        let config = ProgressConfig::from_env(true);
        assert!(!config.should_show_progress());
        assert!(config.file_bar(10).is_hidden());
    }

    #[test]
    fn test_template_is_valid() {
        assert!(ProgressStyle::default_bar().template(TEMPLATE_FILE_SCAN).is_ok());
    }
}
