//! Moderation configuration
//!
//! Configuration is read from JSON and turned into an immutable
//! [`ContentFilter`]. Every field is optional; an empty object yields the
//! built-in behaviour.

use crate::filtering::{ContentFilter, VulgarTextAction};
use crate::words::{VulgarWordList, WordListError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file could not be read
    #[error("Failed to read config {path}: {source}")]
    Io {
        /// File that was being read
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Configuration is not valid JSON for this schema
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    /// Word list entries were rejected
    #[error("Invalid word list: {0}")]
    Words(#[from] WordListError),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Moderation settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModerationConfig {
    /// Words masked in addition to the built-in list
    #[serde(default)]
    pub extra_words: Vec<String>,
    /// Use only `extra_words`, ignoring the built-in list
    #[serde(default)]
    pub replace_builtin_words: bool,
    /// Single-text behaviour for viewers under 13 or of unknown age
    #[serde(default)]
    pub minor_vulgar_text: VulgarTextAction,
}

impl ModerationConfig {
    /// Create a config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON text
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read a config from a JSON file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        tracing::info!(
            "Loaded moderation config from {} ({} extra words)",
            path.display(),
            config.extra_words.len()
        );
        Ok(config)
    }

    /// Build the word list described by this config
    pub fn word_list(&self) -> Result<VulgarWordList> {
        if self.replace_builtin_words {
            return Ok(VulgarWordList::new(&self.extra_words)?);
        }
        if self.extra_words.is_empty() {
            return Ok(VulgarWordList::builtin().clone());
        }
        Ok(VulgarWordList::builtin_with(&self.extra_words)?)
    }

    /// Build a content filter from this config
    pub fn build_filter(&self) -> Result<ContentFilter> {
        let words = self.word_list()?;
        if self.replace_builtin_words && words.is_empty() {
            tracing::warn!("Moderation config replaces the built-in word list with an empty one");
        }
        tracing::debug!("Built content filter with {} words", words.len());
        Ok(ContentFilter::new(words).with_vulgar_text_action(self.minor_vulgar_text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::age::AgeGroup;
    use crate::words::VULGAR_WORDS;
    use std::io::Write;

    #[test]
    fn test_empty_config_is_default() {
        let config = ModerationConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ModerationConfig::new());
        assert_eq!(config.minor_vulgar_text, VulgarTextAction::Sanitize);

        let filter = config.build_filter().unwrap();
        assert_eq!(filter.words().len(), VULGAR_WORDS.len());
    }

    #[test]
    fn test_extra_words_extend_builtin() {
        let config =
            ModerationConfig::from_json_str(r#"{"extraWords": ["frak", "Gorram"]}"#).unwrap();
        let filter = config.build_filter().unwrap();

        assert_eq!(filter.sanitize_text("frak and damn"), "**** and ****");
        assert!(filter.words().contains_word("gorram"));
    }

    #[test]
    fn test_replace_builtin_words() {
        let config = ModerationConfig::from_json_str(
            r#"{"extraWords": ["frak"], "replaceBuiltinWords": true}"#,
        )
        .unwrap();
        let filter = config.build_filter().unwrap();

        assert_eq!(filter.sanitize_text("frak and damn"), "**** and damn");
    }

    #[test]
    fn test_reject_mode() {
        let config = ModerationConfig::from_json_str(r#"{"minorVulgarText": "reject"}"#).unwrap();
        let filter = config.build_filter().unwrap();

        assert_eq!(filter.vulgar_text_action(), VulgarTextAction::Reject);
        assert!(!filter.filter_text("damn", AgeGroup::Unknown).is_allowed());
    }

    #[test]
    fn test_invalid_config() {
        assert!(matches!(
            ModerationConfig::from_json_str(r#"{"minorVulgarText": "shout"}"#),
            Err(ConfigError::Parse(_))
        ));

        let config = ModerationConfig::from_json_str(r#"{"extraWords": ["two words"]}"#).unwrap();
        assert!(matches!(config.build_filter(), Err(ConfigError::Words(_))));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"extraWords": ["frak"]}}"#).unwrap();

        let config = ModerationConfig::from_path(file.path()).unwrap();
        assert_eq!(config.extra_words, vec!["frak".to_string()]);
    }

    #[test]
    fn test_from_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = ModerationConfig::from_path(dir.path().join("missing.json"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_serialization_round_trip_uses_camel_case() {
        let config = ModerationConfig {
            extra_words: vec!["frak".to_string()],
            replace_builtin_words: true,
            minor_vulgar_text: VulgarTextAction::Reject,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("extraWords"));
        assert!(json.contains("replaceBuiltinWords"));
        assert!(json.contains("\"reject\""));
    }
}
