//! Per-language structural queries and the compile-once query cache

use once_cell::sync::OnceCell;
use std::fmt;
use tracing::warn;
use tree_sitter::{Language, Query};

use super::error::TreeSitterError;
use super::languages::LanguageName;

/// Which resolver a query belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    Comments,
    EmptyFunction,
    PythonDefinitions,
}

impl QueryKind {
    /// Query source for a language, `None` when the resolver does not apply to it
    pub fn source(self, language: LanguageName) -> Option<&'static str> {
        match self {
            QueryKind::Comments => comment_query(language),
            QueryKind::EmptyFunction => empty_function_query(language),
            QueryKind::PythonDefinitions => {
                (language == LanguageName::Python).then_some(PYTHON_DEFINITIONS_QUERY)
            }
        }
    }
}

impl fmt::Display for QueryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            QueryKind::Comments => "comment",
            QueryKind::EmptyFunction => "empty function",
            QueryKind::PythonDefinitions => "python definitions",
        })
    }
}

const COMMENT: &str = "(comment) @comment";
const LINE_AND_BLOCK_COMMENT: &str = "[(line_comment) (block_comment)] @comment";
const SCALA_COMMENT: &str = "[(comment) (block_comment)] @comment";
const PYTHON_COMMENT: &str = r#"
(comment) @comment
(expression_statement
  (string) @comment.documentation
  (#match? @comment.documentation "^(\"\"\"|''')"))
"#;

/// Comment captures per language
pub fn comment_query(language: LanguageName) -> Option<&'static str> {
    let query = match language {
        LanguageName::Bash
        | LanguageName::C
        | LanguageName::Cpp
        | LanguageName::CSharp
        | LanguageName::Css
        | LanguageName::Go
        | LanguageName::Html
        | LanguageName::JavaScript
        | LanguageName::Json
        | LanguageName::Powershell
        | LanguageName::Ruby
        | LanguageName::TypeScript
        | LanguageName::Tsx
        | LanguageName::Vue
        | LanguageName::Yaml => COMMENT,
        LanguageName::Java | LanguageName::Kotlin | LanguageName::Rust => LINE_AND_BLOCK_COMMENT,
        LanguageName::Scala => SCALA_COMMENT,
        LanguageName::Python => PYTHON_COMMENT,
    };
    Some(query)
}

const C_EMPTY_FUNCTION: &str = r#"(
  (function_definition
    body: (compound_statement) @empty_body)
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const CPP_EMPTY_FUNCTION: &str = r#"(
  [
    (function_definition
      body: (compound_statement) @empty_body)
    (lambda_expression
      body: (compound_statement) @empty_body)
    (class_specifier
      body: (field_declaration_list) @empty_body)
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const C_SHARP_EMPTY_FUNCTION: &str = r#"(
  [
    (class_declaration
      body: (declaration_list) @empty_body)
    (constructor_declaration
      body: (block) @empty_body)
    (method_declaration
      body: (block) @empty_body)
    (lambda_expression
      body: (block) @empty_body)
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const ECMASCRIPT_EMPTY_FUNCTION: &str = r#"(
  [
    (function_declaration
      body: (statement_block) @empty_body)
    (arrow_function
      body: (statement_block) @empty_body)
    (function_expression
      body: (statement_block) @empty_body)
    (class_declaration
      body: (class_body) @empty_body)
    (method_definition
      body: (statement_block) @empty_body)
    (generator_function_declaration
      body: (statement_block) @empty_body)
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const JAVA_EMPTY_FUNCTION: &str = r#"(
  [
    (method_declaration
      body: (block) @empty_body)
    (lambda_expression
      body: (block) @empty_body)
    (class_declaration
      body: (class_body) @empty_body)
    (constructor_declaration
      body: (constructor_body) @empty_body)
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const GO_EMPTY_FUNCTION: &str = r#"(
  [
    (method_declaration
      body: (block) @empty_body)
    (function_declaration
      body: (block) @empty_body)
    (func_literal
      body: (block) @empty_body)
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const SCALA_EMPTY_FUNCTION: &str = r#"(
  [
    (function_definition
      body: (block) @empty_body)
    (class_definition
      body: (template_body) @empty_body)
    (lambda_expression
      (block) @empty_body)
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const KOTLIN_EMPTY_FUNCTION: &str = r#"(
  [
    (function_declaration
      (function_body
        (block) @empty_body))
    (class_declaration
      (class_body) @empty_body)
    (secondary_constructor
      (block) @empty_body)
    (anonymous_initializer
      (block) @empty_body)
    (lambda_literal) @empty_body
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const RUST_EMPTY_FUNCTION: &str = r#"(
  [
    (function_item
      body: (block) @empty_body)
    (impl_item
      body: (declaration_list) @empty_body)
    (closure_expression
      body: (block) @empty_body)
    (macro_definition
      (macro_rule
        right: (token_tree) @empty_body))
    (token_tree) @empty_body
  ]
  (#match? @empty_body "^\\s*\\{\\s*\\}\\s*$")
)"#;

const RUBY_EMPTY_FUNCTION: &str = r#"(
  [
    (method !body)
    (class !body)
    (block !body)
  ] @empty_function
)"#;

// Bodies holding only `pass` or `...`
const PYTHON_EMPTY_FUNCTION: &str = r#"(
  [
    (function_definition
      body: (block . (pass_statement)))
    (class_definition
      body: (block . (pass_statement)))
    (function_definition
      body: (block . (expression_statement . (ellipsis))))
    (class_definition
      body: (block . (expression_statement . (ellipsis))))
  ]
) @empty_function"#;

/// Every `def`/`class`, used to find definitions without any body yet
pub const PYTHON_DEFINITIONS_QUERY: &str = "[(function_definition) (class_definition)] @function";

/// Empty-body captures per language
pub fn empty_function_query(language: LanguageName) -> Option<&'static str> {
    match language {
        LanguageName::Bash | LanguageName::C => Some(C_EMPTY_FUNCTION),
        LanguageName::Cpp => Some(CPP_EMPTY_FUNCTION),
        LanguageName::CSharp => Some(C_SHARP_EMPTY_FUNCTION),
        LanguageName::Go => Some(GO_EMPTY_FUNCTION),
        LanguageName::Java => Some(JAVA_EMPTY_FUNCTION),
        LanguageName::JavaScript | LanguageName::TypeScript | LanguageName::Tsx => {
            Some(ECMASCRIPT_EMPTY_FUNCTION)
        }
        LanguageName::Kotlin => Some(KOTLIN_EMPTY_FUNCTION),
        LanguageName::Python => Some(PYTHON_EMPTY_FUNCTION),
        LanguageName::Ruby => Some(RUBY_EMPTY_FUNCTION),
        LanguageName::Rust => Some(RUST_EMPTY_FUNCTION),
        LanguageName::Scala => Some(SCALA_EMPTY_FUNCTION),
        // PowerShell and Vue bodies need dedicated handling; the rest have no functions
        LanguageName::Powershell
        | LanguageName::Vue
        | LanguageName::Css
        | LanguageName::Html
        | LanguageName::Json
        | LanguageName::Yaml => None,
    }
}

/// Compiled queries of one kind, one write-once slot per language.
///
/// A slot holds `None` when the language has no query of this kind or the
/// query failed to compile; either way the outcome is final.
pub struct QueryCache {
    kind: QueryKind,
    slots: [OnceCell<Option<Query>>; LanguageName::COUNT],
}

impl QueryCache {
    pub fn new(kind: QueryKind) -> Self {
        Self {
            kind,
            slots: std::array::from_fn(|_| OnceCell::new()),
        }
    }

    pub fn kind(&self) -> QueryKind {
        self.kind
    }

    /// Compiled query for `name`, compiling against `language` on first use
    pub fn get(&self, name: LanguageName, language: &Language) -> Option<&Query> {
        self.slots[name.index()]
            .get_or_init(|| self.compile(name, language))
            .as_ref()
    }

    fn compile(&self, name: LanguageName, language: &Language) -> Option<Query> {
        let source = self.kind.source(name)?;
        match Query::new(language, source) {
            Ok(query) => Some(query),
            Err(err) => {
                let err = TreeSitterError::QueryCompile {
                    language: name,
                    kind: self.kind,
                    reason: err.to_string(),
                };
                warn!(error = %err, "Disabling query for language");
                None
            }
        }
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let compiled = self
            .slots
            .iter()
            .filter(|slot| matches!(slot.get(), Some(Some(_))))
            .count();
        f.debug_struct("QueryCache")
            .field("kind", &self.kind)
            .field("compiled", &compiled)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree_sitter::grammar::BundledGrammarLoader;

    #[test]
    fn test_queries_compile_for_every_bundled_grammar() {
        for name in LanguageName::ALL {
            let Some(language) = BundledGrammarLoader::bundled(name) else {
                continue;
            };
            for kind in [
                QueryKind::Comments,
                QueryKind::EmptyFunction,
                QueryKind::PythonDefinitions,
            ] {
                let Some(source) = kind.source(name) else {
                    continue;
                };
                let compiled = Query::new(&language, source);
                assert!(compiled.is_ok(), "{kind} query for {name}: {:?}", compiled.err());
            }
        }
    }

    #[test]
    fn test_data_only_languages_have_no_empty_function_query() {
        for name in [
            LanguageName::Css,
            LanguageName::Html,
            LanguageName::Json,
            LanguageName::Yaml,
        ] {
            assert!(empty_function_query(name).is_none());
            assert!(comment_query(name).is_some());
        }
    }

    #[test]
    fn test_python_definitions_only_for_python() {
        assert!(QueryKind::PythonDefinitions.source(LanguageName::Python).is_some());
        assert!(QueryKind::PythonDefinitions.source(LanguageName::Ruby).is_none());
    }

    #[test]
    fn test_cache_memoizes_compiled_query() {
        let cache = QueryCache::new(QueryKind::Comments);
        let language = BundledGrammarLoader::bundled(LanguageName::Go).expect("go is bundled");

        let first = cache.get(LanguageName::Go, &language).map(|q| q as *const Query);
        let second = cache.get(LanguageName::Go, &language).map(|q| q as *const Query);
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_cache_memoizes_compile_failure() {
        let cache = QueryCache::new(QueryKind::EmptyFunction);
        // A JSON grammar cannot compile the Rust query; the slot stays empty for good
        let json = BundledGrammarLoader::bundled(LanguageName::Json).expect("json is bundled");
        assert!(cache.get(LanguageName::Rust, &json).is_none());

        let rust = BundledGrammarLoader::bundled(LanguageName::Rust).expect("rust is bundled");
        assert!(cache.get(LanguageName::Rust, &rust).is_none());
        assert!(cache.get(LanguageName::Go, &rust).is_none());
    }
}
