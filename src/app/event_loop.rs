use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use ratatui::DefaultTerminal;
use tracing::info;

use crate::app::{App, Model, NoteFormat, update};
use crate::editor::Editor;
use crate::ui::style::Theme;

/// Poll timeout while idle; toasts expire on this tick.
const IDLE_POLL: Duration = Duration::from_millis(250);

impl App {
    /// Run the application.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal cannot be initialized, the note
    /// cannot be read, or drawing fails.
    pub fn run(&self) -> Result<()> {
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; livemark requires an interactive terminal")?;
        let result = self.init_model(&terminal).and_then(|mut model| {
            info!(file = %model.display_name(), format = model.format.label(), "editor started");
            Self::event_loop(&mut terminal, &mut model)
        });
        ratatui::restore();
        result
    }

    fn init_model(&self, terminal: &DefaultTerminal) -> Result<Model> {
        let size = terminal.size()?;
        let size = (size.width, size.height);
        let format = NoteFormat::detect(self.file_path.as_deref(), self.markdown);
        let mut model = match &self.file_path {
            Some(path) => Model::open(path, format, size)?,
            None => Model::new(Editor::new(), None, format, size),
        };
        model.editor.set_locked(self.read_only);
        model.load_sibling_mentions();
        Ok(model.with_theme(Theme::from_mode(self.theme)))
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let mut needs_render = true;
        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }
            if needs_render {
                terminal.draw(|frame| Self::view(model, frame))?;
                needs_render = false;
            }

            if event::poll(IDLE_POLL)? {
                // Drain key repeat bursts before the next draw.
                loop {
                    if let Some(msg) = Self::handle_event(&event::read()?, model) {
                        let side_msg = msg.clone();
                        *model = update(std::mem::take(model), msg);
                        Self::handle_message_side_effects(model, &side_msg);
                        needs_render = true;
                    }
                    if model.should_quit || !event::poll(Duration::from_millis(0))? {
                        break;
                    }
                }
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
