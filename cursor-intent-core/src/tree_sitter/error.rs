use super::languages::LanguageName;
use super::queries::QueryKind;

/// Tree-sitter intent error
///
/// These never cross the public hot-path APIs: every resolver converts them
/// into a "no signal" value at the point where they occur.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TreeSitterError {
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("Failed to load grammar for {language} from '{path}': {reason}")]
    GrammarLoad {
        language: String,
        path: String,
        reason: String,
    },

    #[error("Failed to compile {kind} query for {language}: {reason}")]
    QueryCompile {
        language: LanguageName,
        kind: QueryKind,
        reason: String,
    },

    #[error("No parser available for {0}")]
    ParserUnavailable(LanguageName),

    #[error("Parse error: {0}")]
    Parse(String),
}
