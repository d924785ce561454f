//! Grammar loading capability injected into the parser cache

use async_trait::async_trait;
use tree_sitter::Language;

use super::error::TreeSitterError;
use super::languages::LanguageName;
use crate::config::constants::grammars::{ARTIFACT_PREFIX, ARTIFACT_SUFFIXES};

/// Loads a compiled grammar from its artifact location.
///
/// The parser cache calls this at most once per language for the lifetime of
/// the cache, so implementations are free to do slow I/O here.
#[async_trait]
pub trait GrammarLoader: Send + Sync {
    async fn load(&self, grammar_path: &str) -> Result<Language, TreeSitterError>;
}

/// Resolves artifact locations to grammars linked into the binary.
///
/// Only the artifact's file name matters: `grammars/tree-sitter-rust`,
/// `vendor/tree-sitter-rust.wasm` and `tree-sitter-rust.so` all resolve to
/// the bundled Rust grammar.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundledGrammarLoader;

impl BundledGrammarLoader {
    /// Map an artifact location back to the language it provides
    pub fn artifact_language(grammar_path: &str) -> Option<LanguageName> {
        let file_name = grammar_path
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(grammar_path);
        let stem = ARTIFACT_SUFFIXES
            .iter()
            .find_map(|suffix| file_name.strip_suffix(suffix))
            .unwrap_or(file_name);
        let name = stem.strip_prefix(ARTIFACT_PREFIX)?.replace('-', "_");
        name.parse().ok()
    }

    /// The statically linked grammar for a language, if one ships with the crate
    pub fn bundled(language: LanguageName) -> Option<Language> {
        let grammar: Language = match language {
            LanguageName::Bash => tree_sitter_bash::LANGUAGE.into(),
            LanguageName::C => tree_sitter_c::LANGUAGE.into(),
            LanguageName::Cpp => tree_sitter_cpp::LANGUAGE.into(),
            LanguageName::CSharp => tree_sitter_c_sharp::LANGUAGE.into(),
            LanguageName::Css => tree_sitter_css::LANGUAGE.into(),
            LanguageName::Go => tree_sitter_go::LANGUAGE.into(),
            LanguageName::Html => tree_sitter_html::LANGUAGE.into(),
            LanguageName::Java => tree_sitter_java::LANGUAGE.into(),
            LanguageName::JavaScript => tree_sitter_javascript::LANGUAGE.into(),
            LanguageName::Json => tree_sitter_json::LANGUAGE.into(),
            LanguageName::Kotlin => tree_sitter_kotlin_ng::LANGUAGE.into(),
            LanguageName::Python => tree_sitter_python::LANGUAGE.into(),
            LanguageName::Ruby => tree_sitter_ruby::LANGUAGE.into(),
            LanguageName::Rust => tree_sitter_rust::LANGUAGE.into(),
            LanguageName::Scala => tree_sitter_scala::LANGUAGE.into(),
            LanguageName::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            LanguageName::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
            LanguageName::Yaml => tree_sitter_yaml::LANGUAGE.into(),
            LanguageName::Powershell | LanguageName::Vue => return None,
        };
        Some(grammar)
    }

    pub fn is_bundled(language: LanguageName) -> bool {
        Self::bundled(language).is_some()
    }
}

#[async_trait]
impl GrammarLoader for BundledGrammarLoader {
    async fn load(&self, grammar_path: &str) -> Result<Language, TreeSitterError> {
        let language = Self::artifact_language(grammar_path).ok_or_else(|| {
            TreeSitterError::GrammarLoad {
                language: "unknown".to_string(),
                path: grammar_path.to_string(),
                reason: "artifact name does not identify a tree-sitter grammar".to_string(),
            }
        })?;

        Self::bundled(language).ok_or_else(|| TreeSitterError::GrammarLoad {
            language: language.to_string(),
            path: grammar_path.to_string(),
            reason: "no bundled grammar for this language".to_string(),
        })
    }
}
