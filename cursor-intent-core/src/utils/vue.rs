use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::tree_sitter::{LanguageName, Position};

static SCRIPT_BLOCK: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r"(?s)<script\b([^>]*)>(.*?)</script>").ok());
static TS_LANG_ATTR: Lazy<Option<Regex>> =
    Lazy::new(|| Regex::new(r#"\blang\s*=\s*["']ts["']"#).ok());

/// Language of a component's script block
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScriptLanguage {
    Js,
    Ts,
}

impl ScriptLanguage {
    /// Extension understood by the grammar registry
    pub fn as_str(self) -> &'static str {
        match self {
            ScriptLanguage::Js => "js",
            ScriptLanguage::Ts => "ts",
        }
    }

    pub fn language_name(self) -> LanguageName {
        match self {
            ScriptLanguage::Js => LanguageName::JavaScript,
            ScriptLanguage::Ts => LanguageName::TypeScript,
        }
    }
}

/// The `<script>` block of a Vue single-file component
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScriptBlock {
    /// Text between the opening and closing tags
    pub content: String,
    /// Line of the first content character in the whole file
    pub start_line: usize,
    /// Column (in characters) of the first content character on `start_line`
    pub start_column: usize,
    /// Byte offset of the first content character
    pub start_offset: usize,
    pub language: ScriptLanguage,
}

impl ScriptBlock {
    /// Translate a position in the component into script coordinates.
    ///
    /// Only the first script line is shifted horizontally. Positions before
    /// the script content have no counterpart.
    pub fn map_position(&self, position: Position) -> Option<Position> {
        if position.line < self.start_line {
            return None;
        }
        if position.line == self.start_line {
            let character = position.character.checked_sub(self.start_column)?;
            return Some(Position::new(0, character));
        }
        Some(Position::new(position.line - self.start_line, position.character))
    }
}

/// First `<script ...>...</script>` block of a component
pub fn extract_script(content: &str) -> Option<ScriptBlock> {
    let captures = SCRIPT_BLOCK.as_ref()?.captures(content)?;
    let attributes = captures.get(1).map_or("", |m| m.as_str());
    let body = captures.get(2)?;

    let before = &content[..body.start()];
    let start_line = before.matches('\n').count();
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    let start_column = before[line_start..].chars().count();

    let is_ts = TS_LANG_ATTR
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(attributes));

    Some(ScriptBlock {
        content: body.as_str().to_string(),
        start_line,
        start_column,
        start_offset: body.start(),
        language: if is_ts {
            ScriptLanguage::Ts
        } else {
            ScriptLanguage::Js
        },
    })
}
