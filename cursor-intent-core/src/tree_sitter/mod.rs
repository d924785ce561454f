//! Tree-sitter integration for intent detection
//!
//! This module owns everything that touches grammars directly:
//!
//! - **Grammar Registry**: language names, extensions, editor ids and artifact paths
//! - **Grammar Loading**: injected capability turning an artifact path into a grammar
//! - **Parser Cache**: one lazily loaded parser per language, memoized for good
//! - **Query Tables**: per-language comment and empty-body queries, compiled once

pub mod error;
pub mod grammar;
pub mod languages;
pub mod parser;
pub mod queries;

pub use error::TreeSitterError;
pub use grammar::{BundledGrammarLoader, GrammarLoader};
pub use languages::{LanguageDescriptor, LanguageName, LanguageRegistry};
pub use parser::{
    DocumentContext, LoadedParser, ParsedDocument, ParserLoadState, Point, Position, SyntaxTree,
    TreeSitterParser,
};
pub use queries::{QueryCache, QueryKind};
