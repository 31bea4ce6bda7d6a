use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::recognizer::RecognizerConfig;
use crate::core::{Confidence, FormatTag};
use crate::io::output::OutputFormat;

/// Root configuration structure for sqlscan
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SqlscanConfig {
    /// Ignore patterns
    #[serde(default)]
    pub ignore: Option<IgnoreConfig>,

    /// Recognizer tuning
    #[serde(default)]
    pub recognizer: Option<RecognizerConfig>,

    /// Output configuration
    #[serde(default)]
    pub output: Option<OutputConfig>,

    /// Extension to format tag overrides
    #[serde(default)]
    pub formats: Option<FormatsConfig>,
}

impl SqlscanConfig {
    /// Get ignore patterns from configuration
    ///
    /// Returns the glob patterns that should be excluded from the scan, or an
    /// empty vector when none are configured.
    ///
    /// # Examples
    ///
    /// ```
    /// use sqlscan::config::SqlscanConfig;
    /// let config = SqlscanConfig::default();
    /// assert!(config.get_ignore_patterns().is_empty());
    /// ```
    pub fn get_ignore_patterns(&self) -> Vec<String> {
        self.ignore
            .as_ref()
            .map(|ig| ig.patterns.clone())
            .unwrap_or_default()
    }

    pub fn recognizer_config(&self) -> RecognizerConfig {
        self.recognizer.clone().unwrap_or_default()
    }

    pub fn min_confidence(&self) -> Option<Confidence> {
        self.output.as_ref().and_then(|o| o.min_confidence)
    }

    pub fn output_format(&self) -> Option<OutputFormat> {
        self.output.as_ref().and_then(|o| o.format)
    }

    /// Extension overrides with tags already resolved.
    ///
    /// Entries whose tag is unknown are skipped; the loader has already
    /// warned about them.
    pub fn extension_overrides(&self) -> Vec<(String, FormatTag)> {
        self.formats
            .as_ref()
            .map(|formats| {
                formats
                    .extensions
                    .iter()
                    .filter_map(|(ext, tag)| {
                        tag.parse::<FormatTag>()
                            .ok()
                            .map(|tag| (normalize_extension(ext), tag))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_ascii_lowercase()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreConfig {
    pub patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Statements below this confidence are counted but not written
    #[serde(default)]
    pub min_confidence: Option<Confidence>,

    #[serde(default)]
    pub format: Option<OutputFormat>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormatsConfig {
    /// File extension (without the dot) to format tag
    #[serde(default)]
    pub extensions: BTreeMap<String, String>,
}

impl FormatsConfig {
    pub fn validate(&self) -> Result<(), String> {
        for (ext, tag) in &self.extensions {
            tag.parse::<FormatTag>()
                .map_err(|e| format!("extension '{}': {}", ext, e))?;
        }
        Ok(())
    }
}
