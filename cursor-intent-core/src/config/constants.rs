/// Intent detection defaults
pub mod intent {
    pub const DEFAULT_ENABLED: bool = true;
    /// Files with fewer effective lines than this favor full generation
    pub const DEFAULT_SMALL_FILE_LINE_THRESHOLD: usize = 5;
    /// Comments with at most this many ASCII alphanumerics count as empty
    pub const DEFAULT_EMPTY_COMMENT_MAX_ALPHANUMERICS: usize = 2;
}

/// Configuration file locations
pub mod files {
    pub const CONFIG_FILE_NAME: &str = "cursor-intent.toml";
    pub const CONFIG_DIR_NAME: &str = ".cursor-intent";
}

/// Grammar artifact naming
pub mod grammars {
    pub const DEFAULT_GRAMMAR_DIR: &str = "grammars";
    pub const ARTIFACT_PREFIX: &str = "tree-sitter-";
    pub const ARTIFACT_SUFFIXES: [&str; 4] = [".wasm", ".so", ".dylib", ".dll"];
}
