use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cursor_intent_core::{
    BundledGrammarLoader, ConfigManager, DocumentContext, IntentConfig, IntentDetector,
    IntentResolution, LanguageName, LanguageRegistry, Position, split_text_at_position,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "cursor-intent",
    version,
    about = "Decide between completion, generation or no signal for a cursor in a source file"
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Workspace root used to find cursor-intent.toml; defaults to current directory
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the intent for a cursor position and print it as JSON
    Detect {
        /// Source file to analyze
        file: PathBuf,

        /// Zero-based cursor line
        #[arg(long)]
        line: usize,

        /// Zero-based cursor column, in characters
        #[arg(long)]
        character: usize,

        /// Editor language id, e.g. `typescriptreact`
        #[arg(long)]
        language_id: Option<String>,

        /// In-flight suggestion text inserted at the cursor before parsing
        #[arg(long)]
        suggestion: Option<String>,

        /// Explicit configuration file, bypassing the workspace search
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the grammar registry as JSON
    Languages,
}

#[derive(Serialize)]
struct LanguageEntry<'a> {
    name: LanguageName,
    extensions: &'a [String],
    editor_language_ids: &'a [String],
    grammar_path: &'a str,
    bundled: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let workspace = match args.workspace {
        Some(workspace) => workspace,
        None => std::env::current_dir().context("cannot determine current dir")?,
    };

    match args.command {
        Commands::Detect {
            file,
            line,
            character,
            language_id,
            suggestion,
            config,
        } => {
            let config = load_config(&workspace, config.as_deref())?;
            let position = Position::new(line, character);
            let context =
                build_context(&workspace, &file, position, language_id, suggestion).await?;
            let resolution = IntentDetector::new(config)
                .detect(&context)
                .await
                .unwrap_or_else(IntentResolution::none);
            print_json(&resolution)
        }
        Commands::Languages => {
            let config = load_config(&workspace, None)?;
            let registry =
                LanguageRegistry::common().with_grammar_overrides(&config.grammar_overrides);
            let entries: Vec<LanguageEntry<'_>> = registry
                .descriptors()
                .iter()
                .map(|descriptor| LanguageEntry {
                    name: descriptor.name,
                    extensions: &descriptor.extensions,
                    editor_language_ids: &descriptor.editor_language_ids,
                    grammar_path: &descriptor.grammar_path,
                    bundled: BundledGrammarLoader::is_bundled(descriptor.name),
                })
                .collect();
            print_json(&entries)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(workspace: &Path, explicit: Option<&Path>) -> Result<IntentConfig> {
    let manager = match explicit {
        Some(path) => ConfigManager::load_from_file(path)?,
        None => ConfigManager::load_from_workspace(workspace)?,
    };
    if let Some(path) = manager.config_path() {
        tracing::debug!(path = %path.display(), "Loaded configuration");
    }
    Ok(manager.into_config())
}

async fn build_context(
    workspace: &Path,
    file: &Path,
    position: Position,
    language_id: Option<String>,
    suggestion: Option<String>,
) -> Result<DocumentContext> {
    let text = tokio::fs::read_to_string(file)
        .await
        .with_context(|| format!("Failed to read source file: {}", file.display()))?;
    let (prefix, suffix) = split_text_at_position(&text, position);

    let relative = file.strip_prefix(workspace).unwrap_or(file);

    Ok(DocumentContext {
        file_relative_path: relative.to_string_lossy().into_owned(),
        language_id,
        prefix,
        suffix,
        position,
        suggestion_text: suggestion,
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{json}");
    Ok(())
}
