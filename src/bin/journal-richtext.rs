use clap::{Parser, Subcommand};
use journal_richtext::config::{ConfigError, EditorConfig};
use journal_richtext::engine::{Engine, SerializedResult};
use journal_richtext::keymap::{self, EditorAction, KeyChord, ParseKeyChordError};
use journal_richtext::palette;
use journal_richtext::richtext::selection::{ParseSelectionError, Selection};
use journal_richtext::richtext::structured_editor::EditCommand;
use journal_richtext::richtext::theme::ThemeMode;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "journal-richtext")]
#[command(about = "Inspect and maintain rich-text journal entries", long_about = None)]
struct Args {
    /// Editor settings to use instead of the user's editor.toml
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the canonical markup of an entry
    Normalize {
        /// Entry to read
        file: PathBuf,
    },
    /// Replay a JSON script of selections and commands against an entry
    Apply {
        /// Entry to read
        file: PathBuf,
        /// JSON array of steps
        #[arg(short, long)]
        script: PathBuf,
        /// light or dark
        #[arg(short, long)]
        theme: Option<ThemeMode>,
    },
    /// Print the active formatting at a selection
    State {
        /// Entry to read
        file: PathBuf,
        /// block:run:offset, or a range block:run:offset..block:run:offset
        #[arg(long)]
        at: Selection,
        #[arg(short, long)]
        theme: Option<ThemeMode>,
    },
    /// Sanitize every .html entry below a directory
    Sanitize {
        dir: PathBuf,
        #[arg(short, long, default_value = "dark")]
        theme: ThemeMode,
        /// Rewrite changed entries instead of only listing them
        #[arg(long)]
        write: bool,
    },
    /// List the toolbar colors, font sizes and emoji
    Palette {
        /// Only show emoji categories matching this name
        #[arg(long)]
        search: Option<String>,
    },
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("failed to read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("invalid script '{}': {source}", path.display())]
    Script {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error(transparent)]
    Selection(#[from] ParseSelectionError),
    #[error(transparent)]
    KeyChord(#[from] ParseKeyChordError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Walk(#[from] walkdir::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// One step of an `apply` script
#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum ScriptStep {
    Select { select: String },
    Key { key: String },
    Theme { theme: ThemeMode },
    Command(EditCommand),
}

fn read_entry(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig, CliError> {
    match path {
        Some(path) => Ok(EditorConfig::load_from(path)?),
        None => Ok(EditorConfig::load()),
    }
}

fn cmd_normalize(file: &Path, config: EditorConfig) -> Result<(), CliError> {
    let markup = read_entry(file)?;
    let engine = Engine::with_config(&markup, ThemeMode::Light, config);
    println!("{}", engine.markup());
    Ok(())
}

fn run_step(engine: &mut Engine, step: ScriptStep) -> Result<Option<SerializedResult>, CliError> {
    match step {
        ScriptStep::Select { select } => {
            engine.set_selection(select.parse()?);
            Ok(None)
        }
        ScriptStep::Key { key } => {
            let chord: KeyChord = key.parse()?;
            match keymap::action_for(&chord) {
                Some(EditorAction::Command(command)) => Ok(Some(engine.dispatch(&command))),
                Some(action) => {
                    tracing::warn!(%chord, ?action, "shortcut needs the host, skipped");
                    Ok(None)
                }
                None => {
                    tracing::debug!(%chord, "unbound shortcut");
                    Ok(None)
                }
            }
        }
        ScriptStep::Theme { theme } => Ok(Some(engine.set_theme(theme))),
        ScriptStep::Command(command) => Ok(Some(engine.dispatch(&command))),
    }
}

fn cmd_apply(
    file: &Path,
    script: &Path,
    theme: ThemeMode,
    config: EditorConfig,
) -> Result<(), CliError> {
    let markup = read_entry(file)?;
    let steps: Vec<ScriptStep> =
        serde_json::from_str(&read_entry(script)?).map_err(|source| CliError::Script {
            path: script.to_path_buf(),
            source,
        })?;

    let mut engine = Engine::with_config(&markup, theme, config);
    let mut last = None;
    for step in steps {
        if let Some(result) = run_step(&mut engine, step)? {
            last = Some(result);
        }
    }
    let result = last.unwrap_or_else(|| engine.snapshot());
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

fn cmd_state(
    file: &Path,
    at: Selection,
    theme: ThemeMode,
    config: EditorConfig,
) -> Result<(), CliError> {
    let markup = read_entry(file)?;
    let mut engine = Engine::with_config(&markup, theme, config);
    let state = engine.set_selection(at);
    println!("{}", serde_json::to_string_pretty(&state)?);
    Ok(())
}

fn cmd_sanitize(
    dir: &Path,
    theme: ThemeMode,
    write: bool,
    config: EditorConfig,
) -> Result<(), CliError> {
    let mut total = 0;
    let mut changed = 0;

    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || path.extension().and_then(|s| s.to_str()) != Some("html")
        {
            continue;
        }
        total += 1;

        let original = read_entry(path)?;
        let sanitized = Engine::with_config(&original, theme, config.clone()).markup();
        if sanitized == original {
            continue;
        }
        changed += 1;
        println!("{}", path.display());
        if write {
            fs::write(path, &sanitized).map_err(|source| CliError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
    }

    let verb = if write { "rewrote" } else { "would rewrite" };
    eprintln!("{verb} {changed} of {total} entries");
    Ok(())
}

fn cmd_palette(search: Option<&str>) {
    println!("Colors:");
    for chunk in palette::COLOR_PALETTE.chunks(10) {
        println!("  {}", chunk.join(" "));
    }
    println!();
    let sizes: Vec<String> = palette::FONT_SIZES.iter().map(|px| format!("{px}px")).collect();
    println!("Font sizes: {}", sizes.join(" "));
    println!();

    let categories = match search {
        Some(query) => palette::search_emoji(query),
        None => palette::EMOJI_CATEGORIES.iter().collect(),
    };
    if categories.is_empty() {
        println!("No emoji found");
    }
    for category in categories {
        println!("{}: {}", category.name, category.emojis.join(" "));
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let result = load_config(args.config.as_deref()).and_then(|config| {
        let default_theme = config.default_theme;
        match args.command {
            Commands::Normalize { file } => cmd_normalize(&file, config),
            Commands::Apply {
                file,
                script,
                theme,
            } => cmd_apply(&file, &script, theme.unwrap_or(default_theme), config),
            Commands::State { file, at, theme } => {
                cmd_state(&file, at, theme.unwrap_or(default_theme), config)
            }
            Commands::Sanitize { dir, theme, write } => cmd_sanitize(&dir, theme, write, config),
            Commands::Palette { search } => {
                cmd_palette(search.as_deref());
                Ok(())
            }
        }
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
