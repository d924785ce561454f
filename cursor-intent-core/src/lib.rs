//! # cursor-intent-core - completion or generation?
//!
//! `cursor-intent-core` decides, for a cursor inside a source file, whether an
//! assistant should continue the code under the cursor (*completion*),
//! synthesize new code from what the user wrote (*generation*), or stay out of
//! the way. The decision is syntax-aware across twenty tree-sitter grammars.
//!
//! ## Highlights
//!
//! - **Comment Resolution**: finds the comment at or directly above the
//!   cursor, rejecting it when code sits in between.
//! - **Empty Bodies**: detects a cursor inside an empty function, class or
//!   lambda body, for brace-delimited and indentation-based languages alike.
//! - **Small Files**: favors generation when a file has too little code.
//! - **Failure-Silent**: missing grammars or broken queries degrade to "no
//!   signal" and are memoized, never retried per keystroke.
//!
//! ## Architecture Overview
//!
//! - `tree_sitter/`: grammar registry, grammar loading, parser cache, query tables.
//! - `intent/`: resolvers, the decision chain and the end-to-end detector.
//! - `config/`: `cursor-intent.toml` loading and defaults.
//! - `utils/`: prefix/suffix splitting and Vue script extraction.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use cursor_intent_core::{DocumentContext, IntentDetector, IntentConfig, Position};
//!
//! #[tokio::main]
//! async fn main() {
//!     let detector = IntentDetector::new(IntentConfig::default());
//!     let context = DocumentContext {
//!         file_relative_path: "src/fib.rs".into(),
//!         prefix: "// calculate the fibonacci sequence\n".into(),
//!         position: Position::new(1, 0),
//!         ..Default::default()
//!     };
//!
//!     if let Some(resolution) = detector.detect(&context).await {
//!         println!("{}", serde_json::to_string(&resolution).unwrap_or_default());
//!     }
//! }
//! ```

pub mod config;
pub mod intent;
pub mod tree_sitter;
pub mod utils;

pub use crate::config::{ConfigManager, IntentConfig};
pub use crate::intent::{
    Comment, CommentResolution, CommentResolver, EmptyFunctionResolver, GenerationType, Intent,
    IntentDetector, IntentRequest, IntentResolution, IntentResolver,
};
pub use crate::tree_sitter::{
    BundledGrammarLoader, DocumentContext, GrammarLoader, LanguageDescriptor, LanguageName,
    LanguageRegistry, ParsedDocument, ParserLoadState, Point, Position, TreeSitterError,
    TreeSitterParser,
};
pub use crate::utils::{ScriptBlock, extract_script, split_text_at_position};

#[cfg(test)]
pub(crate) mod test_support {
    use crate::tree_sitter::{
        BundledGrammarLoader, LanguageName, LanguageRegistry, LoadedParser, ParsedDocument,
    };

    /// Parse with a bundled grammar, bypassing the async parser cache
    pub fn parse(language: LanguageName, source: &str) -> ParsedDocument {
        let grammar = BundledGrammarLoader::bundled(language).expect("bundled grammar");
        let parser = LoadedParser::new(language, grammar.clone()).expect("grammar binds");
        let tree = parser.parse(source.to_string()).expect("source parses");
        let language_info = LanguageRegistry::common()
            .descriptor(language)
            .cloned()
            .expect("language registered");

        ParsedDocument {
            tree,
            language_info,
            language: grammar,
        }
    }
}
