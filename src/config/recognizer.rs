use serde::{Deserialize, Serialize};

/// `[recognizer]` section: tunes which spans count as SQL.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecognizerConfig {
    /// Spans shorter than this many characters after trimming are rejected
    #[serde(default = "default_min_length")]
    pub min_length: usize,

    /// Replaces the built-in list of mapper-statement markup elements
    #[serde(default)]
    pub mapper_elements: Option<Vec<String>>,

    /// Regexes added to the built-in exclude-list
    #[serde(default)]
    pub extra_exclude_patterns: Vec<String>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            min_length: default_min_length(),
            mapper_elements: None,
            extra_exclude_patterns: Vec::new(),
        }
    }
}

pub fn default_min_length() -> usize {
    crate::recognizer::DEFAULT_MIN_LENGTH
}

impl RecognizerConfig {
    /// Checks that every exclude pattern compiles.
    pub fn validate(&self) -> Result<(), String> {
        if self.min_length == 0 {
            return Err("min_length must be at least 1".to_string());
        }
        for pattern in &self.extra_exclude_patterns {
            regex::Regex::new(pattern)
                .map_err(|e| format!("invalid exclude pattern '{}': {}", pattern, e))?;
        }
        Ok(())
    }
}
