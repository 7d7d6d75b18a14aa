//! Theming and color definitions.
//!
//! Uses ANSI colors that adapt to the terminal's palette. The light/dark
//! choice is made once, from `--theme` or from `COLORFGBG` when the mode
//! is `auto`.

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeMode;
use crate::document::{BlockKind, InlineKind};

/// Resolved styles for one background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    light: bool,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    pub const fn dark() -> Self {
        Self { light: false }
    }

    pub const fn light() -> Self {
        Self { light: true }
    }

    /// Pick a theme for `mode`, reading the terminal background for `auto`.
    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self::light(),
            ThemeMode::Dark => Self::dark(),
            ThemeMode::Auto => Self {
                light: background_is_light(std::env::var("COLORFGBG").ok().as_deref()),
            },
        }
    }

    pub const fn is_light(self) -> bool {
        self.light
    }

    const fn pick(self, light: Color, dark: Color) -> Color {
        if self.light { light } else { dark }
    }

    /// Base style for the text of a block.
    pub fn block(self, kind: BlockKind) -> Style {
        match kind {
            BlockKind::Heading(1) => Style::default()
                .fg(self.pick(Color::Indexed(24), Color::Cyan))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            BlockKind::Heading(2) => Style::default()
                .fg(self.pick(Color::Indexed(22), Color::Green))
                .add_modifier(Modifier::BOLD),
            BlockKind::Heading(3) => Style::default()
                .fg(self.pick(Color::Indexed(58), Color::Yellow))
                .add_modifier(Modifier::BOLD),
            BlockKind::Heading(_) => Style::default()
                .fg(self.pick(Color::Indexed(54), Color::Magenta))
                .add_modifier(Modifier::BOLD),
            BlockKind::CodeBlock => Style::default()
                .fg(self.pick(Color::Indexed(238), Color::Indexed(250)))
                .bg(self.pick(Color::Indexed(254), Color::Indexed(236))),
            BlockKind::Blockquote => Style::default()
                .fg(self.pick(Color::Indexed(24), Color::Blue))
                .add_modifier(Modifier::ITALIC),
            BlockKind::ThematicBreak => Style::default()
                .fg(self.pick(Color::Indexed(241), Color::Indexed(240)))
                .add_modifier(Modifier::DIM),
            BlockKind::Paragraph | BlockKind::ListItem(_) => Style::default(),
        }
    }

    /// Style for a block's prefix (list bullet, quote bar, heading hashes).
    pub fn marker(self) -> Style {
        Style::default().fg(self.pick(Color::Indexed(243), Color::Indexed(244)))
    }

    /// `base` with the look of an inline run layered on top.
    pub fn inline(self, base: Style, kind: &InlineKind) -> Style {
        match kind {
            InlineKind::Plain => base,
            InlineKind::Bold => base.add_modifier(Modifier::BOLD),
            InlineKind::Italic => base.add_modifier(Modifier::ITALIC),
            InlineKind::Strikethrough => base.add_modifier(Modifier::CROSSED_OUT),
            InlineKind::Code => base
                .fg(self.pick(Color::Indexed(88), Color::Red))
                .add_modifier(Modifier::BOLD),
            InlineKind::Mention { .. } => base
                .fg(self.pick(Color::Blue, Color::LightBlue))
                .add_modifier(Modifier::UNDERLINED),
        }
    }

    pub fn status(self) -> Style {
        Style::default().bg(Color::DarkGray).fg(Color::White)
    }

    pub fn status_locked(self) -> Style {
        Style::default().bg(Color::Yellow).fg(Color::Black)
    }

    pub fn status_error(self) -> Style {
        Style::default().bg(Color::Red).fg(Color::White)
    }
}

/// `COLORFGBG` is `fg;bg` (sometimes `fg;default;bg`); background 7 and up
/// are the light palette entries.
fn background_is_light(colorfgbg: Option<&str>) -> bool {
    let Some(value) = colorfgbg else {
        return false;
    };
    let bg = value.rsplit(';').next().unwrap_or(value);
    bg.parse::<u8>().is_ok_and(|bg| bg >= 7)
}
