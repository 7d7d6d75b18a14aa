use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::editor::Editor;
use crate::mention::{MentionRegistry, NoteTarget};
use crate::ui::style::Theme;
use crate::ui::viewport::Viewport;

/// How long a toast stays in the status bar.
const TOAST_DURATION: Duration = Duration::from_secs(3);

/// File extensions recognised as notes when collecting mention targets.
const NOTE_EXTENSIONS: [&str; 4] = ["html", "htm", "md", "markdown"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// On-disk format of the open note.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NoteFormat {
    /// The HTML content string.
    #[default]
    Html,
    Markdown,
}

impl NoteFormat {
    /// Markdown when forced or when the extension says so.
    pub fn detect(path: Option<&Path>, force_markdown: bool) -> Self {
        let markdown_ext = path
            .and_then(Path::extension)
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext.to_ascii_lowercase().as_str(), "md" | "markdown"));
        if force_markdown || markdown_ext {
            Self::Markdown
        } else {
            Self::Html
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
        }
    }
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug, Default)]
pub struct Model {
    pub editor: Editor,
    /// Where the note is saved; `None` for a scratch note.
    pub file_path: Option<PathBuf>,
    pub format: NoteFormat,
    pub theme: Theme,
    pub viewport: Viewport,
    /// Notes that can be mentioned with `@`.
    pub mentions: MentionRegistry,
    /// A quit was requested with unsaved changes; the next one goes through.
    pub quit_armed: bool,
    pub should_quit: bool,
    toast: Option<Toast>,
}

impl Model {
    /// Create a model around an editing session.
    pub fn new(editor: Editor, file_path: Option<PathBuf>, format: NoteFormat, size: (u16, u16)) -> Self {
        Self {
            editor,
            file_path,
            format,
            viewport: Viewport::new(size.1.saturating_sub(1), 0),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Load the note at `path`, or start an empty one if it does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn open(path: &Path, format: NoteFormat, size: (u16, u16)) -> Result<Self> {
        let editor = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            match format {
                NoteFormat::Html => Editor::from_html(&content),
                NoteFormat::Markdown => Editor::from_markdown(&content),
            }
        } else {
            debug!(path = %path.display(), "starting new note");
            Editor::new()
        };
        Ok(Self::new(editor, Some(path.to_path_buf()), format, size))
    }

    /// The note serialized in its on-disk format.
    pub fn serialized(&self) -> String {
        match self.format {
            NoteFormat::Html => self.editor.html(),
            NoteFormat::Markdown => self.editor.markdown(),
        }
    }

    /// Write the note to its file and mark the session clean.
    ///
    /// # Errors
    ///
    /// Returns an error for a scratch note or when the write fails.
    pub fn save(&mut self) -> Result<()> {
        let path = self
            .file_path
            .as_deref()
            .context("No file to save to; start livemark with a FILE argument")?;
        std::fs::write(path, self.serialized())
            .with_context(|| format!("Failed to write {}", path.display()))?;
        debug!(path = %path.display(), format = self.format.label(), "saved note");
        self.editor.mark_clean();
        Ok(())
    }

    /// Register every note file next to the open one as a mention target.
    ///
    /// The file name is the target id and the file stem its title.
    pub fn load_sibling_mentions(&mut self) {
        let Some(path) = self.file_path.as_deref() else {
            return;
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let entries = match std::fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(dir = %dir.display(), %err, "could not list notes for mentions");
                return;
            }
        };
        let own_name = path.file_name();
        for entry in entries.filter_map(std::result::Result::ok) {
            let entry_path = entry.path();
            let is_note = entry_path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| NOTE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()));
            if !is_note || entry_path.file_name() == own_name {
                continue;
            }
            let (Some(name), Some(stem)) = (
                entry_path.file_name().and_then(|n| n.to_str()),
                entry_path.file_stem().and_then(|s| s.to_str()),
            ) else {
                continue;
            };
            self.mentions.register(NoteTarget::new(name, stem));
        }
        debug!(count = self.mentions.len(), "registered mention targets");
    }

    /// Targets matching the `@query` under the caret.
    pub fn mention_suggestions(&self) -> Vec<&NoteTarget> {
        self.editor
            .mention_query()
            .map(|query| self.mentions.suggest(query))
            .unwrap_or_default()
    }

    pub fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }

    /// Drop an expired toast; returns true when one was dropped.
    pub fn expire_toast(&mut self, now: Instant) -> bool {
        if self.toast.as_ref().is_some_and(|toast| toast.expires_at <= now) {
            self.toast = None;
            return true;
        }
        false
    }

    /// File name shown in the status bar.
    pub fn display_name(&self) -> String {
        self.file_path
            .as_deref()
            .and_then(Path::file_name)
            .map_or_else(|| "untitled".to_string(), |name| name.to_string_lossy().to_string())
    }
}
