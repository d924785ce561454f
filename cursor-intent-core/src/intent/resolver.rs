//! Intent Resolver: the ordered decision chain

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::comments::{Comment, CommentResolution, CommentResolver};
use super::empty_function::EmptyFunctionResolver;
use super::small_file::is_small_file_with_threshold;
use crate::config::IntentConfig;
use crate::tree_sitter::{ParsedDocument, Point, Position};

/// Whether to continue existing code or synthesize new code
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Completion,
    Generation,
    /// No signal; the caller applies its default behavior
    #[default]
    None,
}

/// What triggered a generation intent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum GenerationType {
    Comment,
    SmallFile,
    EmptyFunction,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IntentResolution {
    pub intent: Intent,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generation_type: Option<GenerationType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment_for_cursor: Option<Comment>,
}

impl IntentResolution {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn completion() -> Self {
        Self {
            intent: Intent::Completion,
            ..Self::default()
        }
    }

    pub fn generation(generation_type: GenerationType) -> Self {
        Self {
            intent: Intent::Generation,
            generation_type: Some(generation_type),
            comment_for_cursor: None,
        }
    }
}

/// Inputs for one resolution; `prefix` and `suffix` exclude suggestion text
#[derive(Debug, Clone, Copy)]
pub struct IntentRequest<'a> {
    pub document: &'a ParsedDocument,
    pub position: Position,
    pub prefix: &'a str,
    pub suffix: &'a str,
}

#[derive(Debug, Default)]
pub struct IntentResolver {
    comments: CommentResolver,
    empty_functions: EmptyFunctionResolver,
    config: IntentConfig,
}

impl IntentResolver {
    pub fn new(config: IntentConfig) -> Self {
        Self {
            comments: CommentResolver::new(),
            empty_functions: EmptyFunctionResolver::new(),
            config,
        }
    }

    pub fn comments(&self) -> &CommentResolver {
        &self.comments
    }

    pub fn empty_functions(&self) -> &EmptyFunctionResolver {
        &self.empty_functions
    }

    pub fn config(&self) -> &IntentConfig {
        &self.config
    }

    /// Determine the intent for a cursor position.
    ///
    /// Rules, first match wins:
    /// - cursor on a comment, or right after an empty one: completion
    /// - cursor right after a non-empty comment: comment generation
    /// - small file: small-file generation
    /// - cursor inside an empty body: empty-function generation
    /// - otherwise no signal
    pub fn get_intent(&self, request: &IntentRequest<'_>) -> IntentResolution {
        let document = request.document;
        let cursor = Point::from(request.position);

        match self.comments.get_comment_for_cursor(document, cursor) {
            Some(CommentResolution::AtCursor(_)) => {
                debug!("IntentResolver: Cursor is directly on a comment, sending intent: completion");
                return IntentResolution::completion();
            }
            Some(CommentResolution::AboveCursor(comment)) => {
                if CommentResolver::is_comment_empty_with_limit(
                    &comment,
                    self.config.empty_comment_max_alphanumerics,
                ) {
                    debug!("IntentResolver: Cursor is after an empty comment, sending intent: completion");
                    return IntentResolution::completion();
                }

                debug!("IntentResolver: Cursor is after a non-empty comment, sending intent: generation");
                return IntentResolution {
                    intent: Intent::Generation,
                    generation_type: Some(GenerationType::Comment),
                    comment_for_cursor: Some(comment),
                };
            }
            None => {}
        }

        let text_content = format!("{}{}", request.prefix, request.suffix);
        let total_comment_lines = self.comments.get_total_comment_lines(document);
        if is_small_file_with_threshold(
            &text_content,
            total_comment_lines,
            self.config.small_file_line_threshold,
        ) {
            debug!("IntentResolver: Small file detected, sending intent: generation");
            return IntentResolution::generation(GenerationType::SmallFile);
        }

        if self
            .empty_functions
            .is_cursor_in_empty_function(document, cursor)
        {
            debug!("IntentResolver: Cursor is in an empty function, sending intent: generation");
            return IntentResolution::generation(GenerationType::EmptyFunction);
        }

        debug!(
            "IntentResolver: No comment, small file or empty function at cursor, not sending intent"
        );
        IntentResolution::none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::parse;
    use crate::tree_sitter::LanguageName;

    fn resolve(
        resolver: &IntentResolver,
        language: LanguageName,
        prefix: &str,
        suffix: &str,
        position: Position,
    ) -> IntentResolution {
        let source = format!("{prefix}{suffix}");
        let document = parse(language, &source);
        resolver.get_intent(&IntentRequest {
            document: &document,
            position,
            prefix,
            suffix,
        })
    }

    const PADDING: &str = "const a = 1;\nconst b = 2;\nconst c = 3;\nconst d = 4;\nconst e = 5;\n";

    #[test]
    fn test_comment_generation() {
        let resolver = IntentResolver::default();
        let resolution = resolve(
            &resolver,
            LanguageName::JavaScript,
            "// calculate the fibonacci sequence\n",
            "",
            Position::new(1, 0),
        );

        assert_eq!(resolution.intent, Intent::Generation);
        assert_eq!(resolution.generation_type, Some(GenerationType::Comment));
        let comment = resolution.comment_for_cursor.expect("comment attached");
        assert_eq!(comment.content, "// calculate the fibonacci sequence");
    }

    #[test]
    fn test_empty_comment_is_completion() {
        let resolver = IntentResolver::default();
        let prefix = format!("{PADDING}//  \n");
        let resolution = resolve(&resolver, LanguageName::JavaScript, &prefix, "", Position::new(6, 0));
        assert_eq!(resolution, IntentResolution::completion());
    }

    #[test]
    fn test_cursor_on_comment_is_completion() {
        let resolver = IntentResolver::default();
        let prefix = format!("{PADDING}// sum the");
        let resolution = resolve(&resolver, LanguageName::JavaScript, &prefix, "\n", Position::new(5, 10));
        assert_eq!(resolution, IntentResolution::completion());
    }

    #[test]
    fn test_small_file_generation() {
        let resolver = IntentResolver::default();
        let resolution = resolve(
            &resolver,
            LanguageName::Python,
            "import os\nx = 1\n",
            "y = 2\n",
            Position::new(2, 0),
        );
        assert_eq!(resolution, IntentResolution::generation(GenerationType::SmallFile));
    }

    #[test]
    fn test_empty_function_generation() {
        let resolver = IntentResolver::default();
        let prefix = format!("{PADDING}function f() {{");
        let resolution = resolve(&resolver, LanguageName::JavaScript, &prefix, "\n}", Position::new(5, 14));
        assert_eq!(resolution, IntentResolution::generation(GenerationType::EmptyFunction));
    }

    #[test]
    fn test_no_signal() {
        let resolver = IntentResolver::default();
        let prefix = format!("{PADDING}function f() {{\n  return 1;\n}}\n");
        let resolution = resolve(&resolver, LanguageName::JavaScript, &prefix, "", Position::new(8, 0));
        assert_eq!(resolution, IntentResolution::none());
    }

    #[test]
    fn test_thresholds_come_from_config() {
        let resolver = IntentResolver::new(IntentConfig {
            small_file_line_threshold: 1,
            empty_comment_max_alphanumerics: 10,
            ..IntentConfig::default()
        });

        let resolution = resolve(&resolver, LanguageName::Python, "import os\nx = 1\n", "", Position::new(2, 0));
        assert_eq!(resolution, IntentResolution::none());

        let resolution = resolve(&resolver, LanguageName::JavaScript, "// fix this\n", "", Position::new(1, 0));
        assert_eq!(resolution, IntentResolution::completion());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(IntentResolution::generation(GenerationType::SmallFile))
            .expect("serializes");
        assert_eq!(json, serde_json::json!({"intent": "generation", "generation_type": "small_file"}));

        let json = serde_json::to_value(IntentResolution::none()).expect("serializes");
        assert_eq!(json, serde_json::json!({"intent": "none"}));
    }
}
