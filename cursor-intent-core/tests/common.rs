#![allow(dead_code)]

use cursor_intent_core::{DocumentContext, IntentConfig, IntentDetector, Position};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Cursor marker used in test sources
pub const CURSOR: &str = "<|>";

/// Build a document context from source containing exactly one [`CURSOR`] marker
pub fn document(path: &str, marked_source: &str) -> DocumentContext {
    let (prefix, suffix) = marked_source
        .split_once(CURSOR)
        .expect("source contains a cursor marker");

    let line = prefix.matches('\n').count();
    let character = prefix.rsplit('\n').next().unwrap_or(prefix).chars().count();

    DocumentContext {
        file_relative_path: path.to_string(),
        language_id: None,
        prefix: prefix.to_string(),
        suffix: suffix.to_string(),
        position: Position::new(line, character),
        suggestion_text: None,
    }
}

pub fn detector() -> IntentDetector {
    IntentDetector::new(IntentConfig::default())
}

/// Five statements so that files built on top are never "small"
pub fn js_padding() -> &'static str {
    "const a = 1;\nconst b = 2;\nconst c = 3;\nconst d = 4;\nconst e = 5;\n"
}

/// Test environment with a scratch workspace
pub struct TestEnv {
    pub temp_dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn create_test_file(&self, name: &str, content: &str) -> PathBuf {
        let file_path = self.temp_dir.path().join(name);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to create test file");
        file_path
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
