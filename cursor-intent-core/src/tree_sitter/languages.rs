//! Grammar registry: language names, file extensions, editor language ids and
//! grammar artifact locations.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::error::TreeSitterError;
use crate::config::constants::grammars::{ARTIFACT_PREFIX, DEFAULT_GRAMMAR_DIR};

/// Every language the intent layer knows about.
///
/// Per-language tables (`queries::comment_query`, `queries::empty_function_query`,
/// `grammar::BundledGrammarLoader::bundled`) match on this enum without a
/// wildcard arm, so adding a variant forces each table to take a position on it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Eq, Hash, PartialEq, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum LanguageName {
    Bash,
    C,
    Cpp,
    CSharp,
    Css,
    Go,
    Html,
    Java,
    #[serde(rename = "javascript")]
    JavaScript,
    Json,
    Kotlin,
    Powershell,
    Python,
    Ruby,
    Rust,
    Scala,
    #[serde(rename = "typescript")]
    TypeScript,
    Tsx,
    Vue,
    Yaml,
}

impl LanguageName {
    pub const COUNT: usize = 20;

    pub const ALL: [LanguageName; Self::COUNT] = [
        LanguageName::Bash,
        LanguageName::C,
        LanguageName::Cpp,
        LanguageName::CSharp,
        LanguageName::Css,
        LanguageName::Go,
        LanguageName::Html,
        LanguageName::Java,
        LanguageName::JavaScript,
        LanguageName::Json,
        LanguageName::Kotlin,
        LanguageName::Powershell,
        LanguageName::Python,
        LanguageName::Ruby,
        LanguageName::Rust,
        LanguageName::Scala,
        LanguageName::TypeScript,
        LanguageName::Tsx,
        LanguageName::Vue,
        LanguageName::Yaml,
    ];

    /// Dense slot used by the array-backed parser and query caches.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageName::Bash => "bash",
            LanguageName::C => "c",
            LanguageName::Cpp => "cpp",
            LanguageName::CSharp => "c_sharp",
            LanguageName::Css => "css",
            LanguageName::Go => "go",
            LanguageName::Html => "html",
            LanguageName::Java => "java",
            LanguageName::JavaScript => "javascript",
            LanguageName::Json => "json",
            LanguageName::Kotlin => "kotlin",
            LanguageName::Powershell => "powershell",
            LanguageName::Python => "python",
            LanguageName::Ruby => "ruby",
            LanguageName::Rust => "rust",
            LanguageName::Scala => "scala",
            LanguageName::TypeScript => "typescript",
            LanguageName::Tsx => "tsx",
            LanguageName::Vue => "vue",
            LanguageName::Yaml => "yaml",
        }
    }
}

impl fmt::Display for LanguageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LanguageName {
    type Err = TreeSitterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LanguageName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| TreeSitterError::UnsupportedLanguage(s.to_string()))
    }
}

/// Static description of one supported grammar
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LanguageDescriptor {
    pub name: LanguageName,
    /// Associated extensions, including the leading dot
    pub extensions: Vec<String>,
    pub editor_language_ids: Vec<String>,
    /// Location of the compiled grammar artifact, handed to the grammar loader
    pub grammar_path: String,
}

impl LanguageDescriptor {
    fn new(name: LanguageName, extensions: &[&str], editor_language_ids: &[&str]) -> Self {
        Self {
            name,
            extensions: extensions.iter().map(|ext| ext.to_string()).collect(),
            editor_language_ids: editor_language_ids.iter().map(|id| id.to_string()).collect(),
            grammar_path: default_grammar_path(name),
        }
    }
}

/// Default artifact location for a language: `grammars/tree-sitter-<name>`
pub fn default_grammar_path(name: LanguageName) -> String {
    format!("{DEFAULT_GRAMMAR_DIR}/{ARTIFACT_PREFIX}{name}")
}

/// Immutable lookup table built once at start-up
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    descriptors: Vec<LanguageDescriptor>,
    by_extension: HashMap<String, usize>,
    by_language_id: HashMap<String, usize>,
}

impl LanguageRegistry {
    pub fn new(descriptors: Vec<LanguageDescriptor>) -> Self {
        let mut by_extension = HashMap::new();
        let mut by_language_id = HashMap::new();

        for (slot, descriptor) in descriptors.iter().enumerate() {
            for ext in &descriptor.extensions {
                by_extension.insert(ext.to_ascii_lowercase(), slot);
            }
            for id in &descriptor.editor_language_ids {
                by_language_id.insert(id.clone(), slot);
            }
        }

        Self {
            descriptors,
            by_extension,
            by_language_id,
        }
    }

    /// The registry shipped with the crate
    pub fn common() -> Self {
        use LanguageName::*;

        Self::new(vec![
            LanguageDescriptor::new(C, &[".c"], &["c"]),
            LanguageDescriptor::new(Cpp, &[".cpp"], &["cpp"]),
            LanguageDescriptor::new(CSharp, &[".cs"], &["csharp"]),
            LanguageDescriptor::new(Css, &[".css"], &["css"]),
            LanguageDescriptor::new(Go, &[".go"], &["go"]),
            LanguageDescriptor::new(Java, &[".java"], &["java"]),
            LanguageDescriptor::new(JavaScript, &[".js"], &["javascript"]),
            LanguageDescriptor::new(Python, &[".py"], &["python"]),
            LanguageDescriptor::new(Ruby, &[".rb"], &["ruby"]),
            LanguageDescriptor::new(Scala, &[".scala"], &["scala"]),
            LanguageDescriptor::new(TypeScript, &[".ts"], &["typescript"]),
            LanguageDescriptor::new(
                Tsx,
                &[".tsx", ".jsx"],
                &["typescriptreact", "javascriptreact"],
            ),
            LanguageDescriptor::new(Kotlin, &[".kt"], &["kotlin"]),
            LanguageDescriptor::new(Powershell, &[".ps1"], &["powershell"]),
            LanguageDescriptor::new(Rust, &[".rs"], &["rust"]),
            LanguageDescriptor::new(Yaml, &[".yaml", ".yml"], &["yaml"]),
            LanguageDescriptor::new(Html, &[".html"], &["html"]),
            LanguageDescriptor::new(
                Bash,
                &[".sh", ".bash", ".bashrc", ".bash_profile"],
                &["shellscript"],
            ),
            LanguageDescriptor::new(Json, &[".json"], &["json"]),
            LanguageDescriptor::new(Vue, &[".vue"], &["vue"]),
        ])
    }

    /// Replace the grammar location of individual languages.
    ///
    /// Keys that do not name a known language are skipped with a warning.
    pub fn with_grammar_overrides(mut self, overrides: &BTreeMap<String, String>) -> Self {
        for (language, path) in overrides {
            match language.parse::<LanguageName>() {
                Ok(name) => {
                    if let Some(descriptor) =
                        self.descriptors.iter_mut().find(|d| d.name == name)
                    {
                        descriptor.grammar_path = path.clone();
                    }
                }
                Err(err) => {
                    tracing::warn!(%err, "Ignoring grammar override");
                }
            }
        }
        self
    }

    pub fn descriptors(&self) -> &[LanguageDescriptor] {
        &self.descriptors
    }

    pub fn descriptor(&self, name: LanguageName) -> Option<&LanguageDescriptor> {
        self.descriptors.iter().find(|d| d.name == name)
    }

    /// Resolve the grammar for a document.
    ///
    /// An exact editor language id wins; otherwise the last `.`-separated
    /// suffix of the file name is matched against the registered extensions.
    /// A bare name without a dot (`"ts"`) is treated as the extension itself.
    pub fn language_info_for_file(
        &self,
        path: &str,
        language_id: Option<&str>,
    ) -> Option<&LanguageDescriptor> {
        if let Some(slot) = language_id.and_then(|id| self.by_language_id.get(id)) {
            return self.descriptors.get(*slot);
        }

        let file_name = path.rsplit(['/', '\\']).next().unwrap_or(path);
        let ext = file_name.rsplit('.').next().unwrap_or(file_name);
        let key = format!(".{}", ext.to_ascii_lowercase());
        self.by_extension
            .get(&key)
            .and_then(|slot| self.descriptors.get(*slot))
    }
}

impl Default for LanguageRegistry {
    fn default() -> Self {
        Self::common()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_covers_every_language() {
        let registry = LanguageRegistry::common();
        for name in LanguageName::ALL {
            assert!(registry.descriptor(name).is_some(), "{name} is not registered");
        }
        assert_eq!(registry.descriptors().len(), LanguageName::COUNT);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (slot, name) in LanguageName::ALL.into_iter().enumerate() {
            assert_eq!(name.index(), slot);
        }
    }

    #[test]
    fn test_language_name_round_trips_through_str() {
        assert_eq!("c_sharp".parse::<LanguageName>().ok(), Some(LanguageName::CSharp));
        assert_eq!(LanguageName::JavaScript.to_string(), "javascript");
        assert!("cobol".parse::<LanguageName>().is_err());
        assert_eq!(
            serde_json::to_string(&LanguageName::TypeScript).ok().as_deref(),
            Some("\"typescript\"")
        );
    }

    #[test]
    fn test_editor_language_id_wins_over_extension() {
        let registry = LanguageRegistry::common();
        let info = registry
            .language_info_for_file("src/app.js", Some("typescriptreact"))
            .map(|d| d.name);
        assert_eq!(info, Some(LanguageName::Tsx));
    }

    #[test]
    fn test_falls_back_to_extension() {
        let registry = LanguageRegistry::common();
        let lookup = |path: &str, id: Option<&str>| {
            registry.language_info_for_file(path, id).map(|d| d.name)
        };

        assert_eq!(lookup("main.rs", None), Some(LanguageName::Rust));
        assert_eq!(lookup("src/lib/Widget.JSX", None), Some(LanguageName::Tsx));
        assert_eq!(lookup("config.yml", Some("unknown-id")), Some(LanguageName::Yaml));
        assert_eq!(lookup("/home/me/.bashrc", None), Some(LanguageName::Bash));
        assert_eq!(lookup("ts", None), Some(LanguageName::TypeScript));
        assert_eq!(lookup("notes.txt", None), None);
        assert_eq!(lookup("Makefile", None), None);
    }

    #[test]
    fn test_grammar_overrides() {
        let mut overrides = BTreeMap::new();
        overrides.insert("rust".to_string(), "/opt/grammars/rust.so".to_string());
        overrides.insert("klingon".to_string(), "/dev/null".to_string());

        let registry = LanguageRegistry::common().with_grammar_overrides(&overrides);
        assert_eq!(
            registry
                .descriptor(LanguageName::Rust)
                .map(|d| d.grammar_path.as_str()),
            Some("/opt/grammars/rust.so")
        );
        assert_eq!(
            registry
                .descriptor(LanguageName::Go)
                .map(|d| d.grammar_path.clone()),
            Some(default_grammar_path(LanguageName::Go))
        );
    }
}
