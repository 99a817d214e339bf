//! Tunables for announcement extraction, loadable from TOML.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Default exclusive lower bound on company name length (characters).
pub const DEFAULT_MIN_COMPANY_LEN: usize = 3;
/// Default exclusive upper bound on company name length (characters).
pub const DEFAULT_MAX_COMPANY_LEN: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Company candidates must be longer than this.
    pub min_company_len: usize,
    /// Company candidates must be shorter than this.
    pub max_company_len: usize,
    /// Fewest leading words the fallback heuristic will take.
    pub fallback_min_words: usize,
    /// Most leading words the fallback heuristic will take.
    pub fallback_max_words: usize,
    /// When non-empty, blocks whose text mentions none of these
    /// (case-insensitive) are skipped before extraction, e.g. `["ipo", "share"]`.
    pub relevance_keywords: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_company_len:    DEFAULT_MIN_COMPANY_LEN,
            max_company_len:    DEFAULT_MAX_COMPANY_LEN,
            fallback_min_words: 3,
            fallback_max_words: 7,
            relevance_keywords: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path:   String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ExtractorConfig {
    /// Parses a TOML document; missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns `ConfigError` for malformed TOML or inconsistent bounds.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads a TOML config file.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_company_len >= self.max_company_len {
            return Err(ConfigError::Invalid(format!(
                "min_company_len ({}) must be below max_company_len ({})",
                self.min_company_len, self.max_company_len
            )));
        }
        if self.fallback_min_words == 0 || self.fallback_min_words > self.fallback_max_words {
            return Err(ConfigError::Invalid(format!(
                "fallback word window {}..={} is empty",
                self.fallback_min_words, self.fallback_max_words
            )));
        }
        Ok(())
    }

    /// Whether a company candidate's length is within bounds.
    pub fn accepts_company(&self, candidate: &str) -> bool {
        let len = candidate.chars().count();
        len > self.min_company_len && len < self.max_company_len
    }

    /// Whether a block should be considered at all.
    pub fn is_relevant(&self, text: &str) -> bool {
        if self.relevance_keywords.is_empty() {
            return true;
        }
        let lower = text.to_lowercase();
        self.relevance_keywords
            .iter()
            .any(|keyword| lower.contains(&keyword.to_lowercase()))
    }
}
