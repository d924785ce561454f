//! Configuration for intent detection
//!
//! Settings are read from `cursor-intent.toml` once at start-up (see
//! [`loader::ConfigManager`]) and handed to the detector by value.
//!
//! ```toml
//! enabled = true
//! small_file_line_threshold = 5
//! empty_comment_max_alphanumerics = 2
//! disabled_languages = ["yaml"]
//!
//! [grammar_overrides]
//! rust = "/opt/grammars/tree-sitter-rust.so"
//! ```

pub mod constants;
pub mod loader;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use constants::intent;

pub use loader::ConfigManager;

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct IntentConfig {
    /// Master switch; when off every request resolves to no signal
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Effective line count below which a file counts as small
    #[serde(default = "default_small_file_line_threshold")]
    pub small_file_line_threshold: usize,

    /// Alphanumeric characters a comment may hold and still count as empty
    #[serde(default = "default_empty_comment_max_alphanumerics")]
    pub empty_comment_max_alphanumerics: usize,

    /// Language names (`rust`, `c_sharp`, ...) to skip entirely
    #[serde(default)]
    pub disabled_languages: Vec<String>,

    /// Language name to grammar artifact path
    #[serde(default)]
    pub grammar_overrides: BTreeMap<String, String>,
}

fn default_enabled() -> bool {
    intent::DEFAULT_ENABLED
}
fn default_small_file_line_threshold() -> usize {
    intent::DEFAULT_SMALL_FILE_LINE_THRESHOLD
}
fn default_empty_comment_max_alphanumerics() -> usize {
    intent::DEFAULT_EMPTY_COMMENT_MAX_ALPHANUMERICS
}

impl Default for IntentConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            small_file_line_threshold: default_small_file_line_threshold(),
            empty_comment_max_alphanumerics: default_empty_comment_max_alphanumerics(),
            disabled_languages: Vec::new(),
            grammar_overrides: BTreeMap::new(),
        }
    }
}

impl IntentConfig {
    pub fn is_language_disabled(&self, language: &str) -> bool {
        self.disabled_languages
            .iter()
            .any(|disabled| disabled.eq_ignore_ascii_case(language))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: IntentConfig = toml::from_str("").expect("empty config parses");
        assert_eq!(config, IntentConfig::default());
        assert!(config.enabled);
        assert_eq!(config.small_file_line_threshold, 5);
        assert_eq!(config.empty_comment_max_alphanumerics, 2);
    }

    #[test]
    fn test_partial_document() {
        let config: IntentConfig = toml::from_str(
            r#"
small_file_line_threshold = 8
disabled_languages = ["YAML"]

[grammar_overrides]
go = "/tmp/tree-sitter-go.so"
"#,
        )
        .expect("config parses");

        assert!(config.enabled);
        assert_eq!(config.small_file_line_threshold, 8);
        assert!(config.is_language_disabled("yaml"));
        assert!(!config.is_language_disabled("rust"));
        assert_eq!(
            config.grammar_overrides.get("go").map(String::as_str),
            Some("/tmp/tree-sitter-go.so")
        );
    }
}
