//! End-to-end intent detection for editor documents

use std::sync::Arc;
use tracing::debug;

use super::resolver::{IntentRequest, IntentResolution, IntentResolver};
use crate::config::IntentConfig;
use crate::tree_sitter::{
    BundledGrammarLoader, DocumentContext, GrammarLoader, LanguageName, LanguageRegistry,
    TreeSitterParser,
};
use crate::utils::extract_script;

/// Owns the registry, parser cache and resolvers for the process lifetime.
///
/// Construct once at start-up and share by reference (or `Arc`); every
/// cache inside fills lazily on first use per language.
pub struct IntentDetector {
    parser: Arc<TreeSitterParser>,
    resolver: IntentResolver,
}

impl IntentDetector {
    /// Detector backed by the grammars bundled with this crate
    pub fn new(config: IntentConfig) -> Self {
        Self::with_loader(config, Arc::new(BundledGrammarLoader))
    }

    pub fn with_loader(config: IntentConfig, loader: Arc<dyn GrammarLoader>) -> Self {
        let registry = LanguageRegistry::common().with_grammar_overrides(&config.grammar_overrides);
        let parser = Arc::new(TreeSitterParser::new(Arc::new(registry), loader));
        Self::with_parser(config, parser)
    }

    /// Reuse an existing parser cache
    pub fn with_parser(config: IntentConfig, parser: Arc<TreeSitterParser>) -> Self {
        Self {
            parser,
            resolver: IntentResolver::new(config),
        }
    }

    pub fn parser(&self) -> &Arc<TreeSitterParser> {
        &self.parser
    }

    pub fn config(&self) -> &IntentConfig {
        self.resolver.config()
    }

    pub fn resolver(&self) -> &IntentResolver {
        &self.resolver
    }

    /// Intent for the cursor in `context`, `None` when there is no signal to give
    pub async fn detect(&self, context: &DocumentContext) -> Option<IntentResolution> {
        let config = self.resolver.config();
        if !config.enabled {
            debug!("IntentDetector: Intent detection disabled");
            return None;
        }

        let language = self
            .parser
            .registry()
            .language_info_for_file(&context.file_relative_path, context.language_id.as_deref())
            .map(|descriptor| descriptor.name);

        if let Some(language) = language {
            if config.is_language_disabled(language.as_str()) {
                debug!(%language, "IntentDetector: Intent detection disabled for language");
                return None;
            }
        }

        if language == Some(LanguageName::Vue) {
            return self.detect_vue(context).await;
        }

        let document = self.parser.parse_file(context).await?;
        Some(self.resolver.get_intent(&IntentRequest {
            document: &document,
            position: context.position,
            prefix: &context.prefix,
            suffix: &context.suffix,
        }))
    }

    async fn detect_vue(&self, context: &DocumentContext) -> Option<IntentResolution> {
        let full_text = format!("{}{}", context.prefix, context.suffix);
        let Some(script) = extract_script(&full_text) else {
            debug!("IntentDetector: No script block in Vue document");
            return None;
        };

        let script_language = script.language.language_name();
        if self
            .resolver
            .config()
            .is_language_disabled(script_language.as_str())
        {
            debug!(language = %script_language, "IntentDetector: Intent detection disabled for language");
            return None;
        }

        let Some(position) = script.map_position(context.position) else {
            debug!("IntentDetector: Cursor is outside the Vue script block");
            return None;
        };

        let document = self
            .parser
            .parse_content(&script.content, script.language.as_str())
            .await?;

        let split = crate::utils::offset_at_position(&script.content, position);
        let (prefix, suffix) = script.content.split_at(split);

        Some(self.resolver.get_intent(&IntentRequest {
            document: &document,
            position,
            prefix,
            suffix,
        }))
    }
}

impl std::fmt::Debug for IntentDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentDetector")
            .field("load_state", &self.parser.load_state())
            .field("config", self.resolver.config())
            .finish()
    }
}

impl Default for IntentDetector {
    fn default() -> Self {
        Self::new(IntentConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intent::{GenerationType, Intent};
    use crate::tree_sitter::Position;

    fn context(path: &str, prefix: &str, suffix: &str, position: Position) -> DocumentContext {
        DocumentContext {
            file_relative_path: path.to_string(),
            prefix: prefix.to_string(),
            suffix: suffix.to_string(),
            position,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_detects_comment_generation() {
        let detector = IntentDetector::default();
        let ctx = context("src/fib.ts", "// calculate the fibonacci sequence\n", "", Position::new(1, 0));

        let resolution = detector.detect(&ctx).await.expect("typescript is supported");
        assert_eq!(resolution.intent, Intent::Generation);
        assert_eq!(resolution.generation_type, Some(GenerationType::Comment));
    }

    #[tokio::test]
    async fn test_disabled_detection() {
        let detector = IntentDetector::new(IntentConfig {
            enabled: false,
            ..IntentConfig::default()
        });
        let ctx = context("a.py", "x = 1\n", "", Position::new(1, 0));
        assert_eq!(detector.detect(&ctx).await, None);
    }

    #[tokio::test]
    async fn test_disabled_language() {
        let detector = IntentDetector::new(IntentConfig {
            disabled_languages: vec!["python".to_string()],
            ..IntentConfig::default()
        });
        let ctx = context("a.py", "x = 1\n", "", Position::new(1, 0));
        assert_eq!(detector.detect(&ctx).await, None);

        let ctx = context("a.rb", "x = 1\n", "", Position::new(1, 0));
        assert!(detector.detect(&ctx).await.is_some());
    }

    #[tokio::test]
    async fn test_unsupported_and_unloadable_languages() {
        let detector = IntentDetector::default();
        let ctx = context("notes.txt", "hello", "", Position::new(0, 5));
        assert_eq!(detector.detect(&ctx).await, None);

        let ctx = context("build.ps1", "Write-Host 'hi'", "", Position::new(0, 5));
        assert_eq!(detector.detect(&ctx).await, None);
    }

    #[tokio::test]
    async fn test_vue_script_is_analyzed() {
        let detector = IntentDetector::default();
        let prefix = "<template>\n  <div/>\n</template>\n<script lang=\"ts\">\n// sum two numbers\n";
        let suffix = "</script>\n";
        let ctx = DocumentContext {
            language_id: Some("vue".to_string()),
            ..context("App.vue", prefix, suffix, Position::new(5, 0))
        };

        let resolution = detector.detect(&ctx).await.expect("script block parsed");
        assert_eq!(resolution.intent, Intent::Generation);
        assert_eq!(resolution.generation_type, Some(GenerationType::Comment));
        let comment = resolution.comment_for_cursor.expect("comment");
        assert_eq!(comment.content, "// sum two numbers");
    }

    #[tokio::test]
    async fn test_vue_without_script() {
        let detector = IntentDetector::default();
        let ctx = context("App.vue", "<template>\n</template>\n", "", Position::new(1, 0));
        assert_eq!(detector.detect(&ctx).await, None);
    }
}
