//! Parser cache: one lazily loaded parser per language, plus the document
//! and syntax tree types that flow through intent resolution.

use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};
use tree_sitter::{Language, Node, Parser, Tree};

use super::error::TreeSitterError;
use super::grammar::GrammarLoader;
use super::languages::{LanguageDescriptor, LanguageName, LanguageRegistry};

/// Zero-based row and column inside a syntax tree
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl From<tree_sitter::Point> for Point {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            row: point.row,
            column: point.column,
        }
    }
}

/// Editor cursor position (line / character)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, PartialEq, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

impl From<Position> for Point {
    fn from(position: Position) -> Self {
        Self {
            row: position.line,
            column: position.character,
        }
    }
}

/// What the editor integration hands over for one suggestion request
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DocumentContext {
    pub file_relative_path: String,
    #[serde(default)]
    pub language_id: Option<String>,
    pub prefix: String,
    pub suffix: String,
    pub position: Position,
    /// In-flight suggestion text, spliced between prefix and suffix before parsing
    #[serde(default)]
    pub suggestion_text: Option<String>,
}

impl DocumentContext {
    /// `prefix + suggestion_text + suffix`
    pub fn full_text(&self) -> String {
        let suggestion = self.suggestion_text.as_deref().unwrap_or_default();
        let mut text =
            String::with_capacity(self.prefix.len() + suggestion.len() + self.suffix.len());
        text.push_str(&self.prefix);
        text.push_str(suggestion);
        text.push_str(&self.suffix);
        text
    }
}

/// A parsed document together with the exact text it was parsed from.
///
/// Nodes handed out by [`SyntaxTree::root_node`] borrow the tree, so parent
/// and sibling navigation is bounded by this value's lifetime.
pub struct SyntaxTree {
    tree: Tree,
    source: String,
}

impl SyntaxTree {
    pub fn new(tree: Tree, source: String) -> Self {
        Self { tree, source }
    }

    pub fn root_node(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn text_of(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.source.as_bytes()).unwrap_or_default()
    }
}

impl std::fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.tree.root_node().kind())
            .field("source_len", &self.source.len())
            .finish()
    }
}

/// Result of a successful parse request
#[derive(Debug)]
pub struct ParsedDocument {
    pub tree: SyntaxTree,
    pub language_info: LanguageDescriptor,
    pub language: Language,
}

impl ParsedDocument {
    pub fn language_name(&self) -> LanguageName {
        self.language_info.name
    }
}

/// A parser bound to one grammar
pub struct LoadedParser {
    name: LanguageName,
    language: Language,
    parser: Mutex<Parser>,
}

impl LoadedParser {
    pub fn new(name: LanguageName, language: Language) -> Result<Self, TreeSitterError> {
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|err| TreeSitterError::GrammarLoad {
                language: name.to_string(),
                path: String::new(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            name,
            language,
            parser: Mutex::new(parser),
        })
    }

    pub fn name(&self) -> LanguageName {
        self.name
    }

    pub fn language(&self) -> &Language {
        &self.language
    }

    pub fn parse(&self, source: String) -> Result<SyntaxTree, TreeSitterError> {
        let tree = self.parser.lock().parse(&source, None).ok_or_else(|| {
            TreeSitterError::Parse(format!("{} parser returned no tree", self.name))
        })?;
        Ok(SyntaxTree::new(tree, source))
    }
}

impl std::fmt::Debug for LoadedParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedParser")
            .field("name", &self.name)
            .finish()
    }
}

/// Aggregate health of grammar loading
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ParserLoadState {
    Init,
    Ready,
    Errored,
    Unimplemented,
}

type ParserSlot = OnceCell<Option<Arc<LoadedParser>>>;

/// Lazily loads and memoizes one parser per language.
///
/// Concurrent first requests for the same language await a single in-flight
/// load. Both outcomes are kept for the lifetime of the cache, so a broken
/// grammar costs one load attempt, not one per keystroke.
pub struct TreeSitterParser {
    registry: Arc<LanguageRegistry>,
    loader: Arc<dyn GrammarLoader>,
    parsers: [ParserSlot; LanguageName::COUNT],
    load_state: RwLock<ParserLoadState>,
}

impl TreeSitterParser {
    pub fn new(registry: Arc<LanguageRegistry>, loader: Arc<dyn GrammarLoader>) -> Self {
        Self {
            registry,
            loader,
            parsers: std::array::from_fn(|_| OnceCell::new()),
            load_state: RwLock::new(ParserLoadState::Init),
        }
    }

    pub fn registry(&self) -> &LanguageRegistry {
        &self.registry
    }

    pub fn load_state(&self) -> ParserLoadState {
        *self.load_state.read()
    }

    /// Number of languages whose load attempt has completed, successfully or not
    pub fn loaded_languages(&self) -> usize {
        self.parsers.iter().filter(|slot| slot.initialized()).count()
    }

    /// Get the cached parser for a language, loading it on first use.
    pub async fn get_parser(&self, descriptor: &LanguageDescriptor) -> Option<Arc<LoadedParser>> {
        self.parsers[descriptor.name.index()]
            .get_or_init(|| self.load_parser(descriptor))
            .await
            .clone()
    }

    async fn load_parser(&self, descriptor: &LanguageDescriptor) -> Option<Arc<LoadedParser>> {
        let loaded = match self.loader.load(&descriptor.grammar_path).await {
            Ok(language) => LoadedParser::new(descriptor.name, language),
            Err(err) => Err(err),
        };

        match loaded {
            Ok(parser) => {
                debug!(
                    language = %descriptor.name,
                    "TreeSitterParser: Loaded tree-sitter parser"
                );
                let mut state = self.load_state.write();
                if *state == ParserLoadState::Init {
                    *state = ParserLoadState::Ready;
                }
                Some(Arc::new(parser))
            }
            Err(err) => {
                *self.load_state.write() = ParserLoadState::Errored;
                warn!(
                    language = %descriptor.name,
                    path = %descriptor.grammar_path,
                    error = %err,
                    "TreeSitterParser: Unable to load tree-sitter parser"
                );
                None
            }
        }
    }

    /// Parse `prefix + suggestion_text + suffix` of an editor document
    pub async fn parse_file(&self, context: &DocumentContext) -> Option<ParsedDocument> {
        let descriptor = self.registry.language_info_for_file(
            &context.file_relative_path,
            context.language_id.as_deref(),
        );
        let Some(descriptor) = descriptor else {
            debug!(
                path = %context.file_relative_path,
                "TreeSitterParser: No grammar registered for document"
            );
            return None;
        };

        self.parse_text(descriptor, context.full_text()).await
    }

    /// Parse content not yet associated with a document.
    ///
    /// `language` may be an editor language id, a file name or a bare
    /// extension such as `"ts"`.
    pub async fn parse_content(&self, content: &str, language: &str) -> Option<ParsedDocument> {
        match self.try_parse_content(content, language).await {
            Ok(document) => Some(document),
            Err(err) => {
                debug!(error = %err, "TreeSitterParser: Skipping content parse");
                None
            }
        }
    }

    async fn try_parse_content(
        &self,
        content: &str,
        language: &str,
    ) -> Result<ParsedDocument, TreeSitterError> {
        let descriptor = self
            .registry
            .language_info_for_file(language, Some(language))
            .ok_or_else(|| TreeSitterError::UnsupportedLanguage(language.to_string()))?;
        self.try_parse_text(descriptor, content.to_string()).await
    }

    /// Parse text with an already resolved grammar
    pub async fn parse_text(
        &self,
        descriptor: &LanguageDescriptor,
        text: String,
    ) -> Option<ParsedDocument> {
        match self.try_parse_text(descriptor, text).await {
            Ok(document) => Some(document),
            Err(err) => {
                debug!(
                    error = %err,
                    "TreeSitterParser: Skipping intent detection using tree-sitter"
                );
                None
            }
        }
    }

    async fn try_parse_text(
        &self,
        descriptor: &LanguageDescriptor,
        text: String,
    ) -> Result<ParsedDocument, TreeSitterError> {
        let parser = self
            .get_parser(descriptor)
            .await
            .ok_or(TreeSitterError::ParserUnavailable(descriptor.name))?;
        let tree = parser.parse(text)?;

        Ok(ParsedDocument {
            tree,
            language_info: descriptor.clone(),
            language: parser.language().clone(),
        })
    }
}
