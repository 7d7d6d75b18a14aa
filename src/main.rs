//! Livemark - edit a note in the terminal with live Markdown conversion.
//!
//! # Usage
//!
//! ```bash
//! livemark note.html
//! livemark --markdown todo.md
//! livemark --print markdown note.html
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use livemark::app::{App, NoteFormat};
use livemark::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use livemark::editor::Editor;

/// A terminal note editor that turns Markdown into structure as you type
#[derive(Parser, Debug)]
#[command(name = "livemark", version, about, long_about = None)]
struct Cli {
    /// Note to edit (created on first save if missing)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Read and save the note as Markdown instead of HTML
    #[arg(long)]
    markdown: bool,

    /// Open the note locked; Ctrl+L unlocks
    #[arg(long)]
    read_only: bool,

    /// Color theme for the terminal background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the note in this format and exit without opening the editor
    #[arg(long, value_enum, value_name = "FORMAT")]
    print: Option<PrintFormat>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum PrintFormat {
    Html,
    Markdown,
    Json,
}

/// The terminal owns stdout, so logs go to a file or nowhere.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::WARN.into());
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_ansi(false);
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            builder.with_writer(Mutex::new(file)).init();
        }
        None => builder.with_writer(std::io::sink).init(),
    }
    Ok(())
}

fn load_editor(path: &Path, format: NoteFormat) -> Result<Editor> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(match format {
        NoteFormat::Html => Editor::from_html(&content),
        NoteFormat::Markdown => Editor::from_markdown(&content),
    })
}

fn print_note(path: &Path, format: NoteFormat, print: PrintFormat) -> Result<()> {
    let editor = load_editor(path, format)?;
    let output = match print {
        PrintFormat::Html => editor.html(),
        PrintFormat::Markdown => editor.markdown(),
        PrintFormat::Json => editor.snapshot().to_json()?,
    };
    println!("{}", output.trim_end_matches('\n'));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        markdown: cli.markdown,
        read_only: cli.read_only,
        theme: cli.theme,
        log_file: cli.log_file.clone(),
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    let format = NoteFormat::detect(cli.file.as_deref(), effective.markdown);

    if let Some(print) = cli.print {
        let path = cli
            .file
            .as_deref()
            .context("--print needs a FILE to read")?;
        return print_note(path, format, print);
    }

    let app = App::new(cli.file)
        .with_markdown(effective.markdown)
        .with_read_only(effective.read_only)
        .with_theme(effective.theme.unwrap_or(ThemeMode::Auto));

    app.run().context("Application error")
}
