use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::cursor::Direction;
use crate::editor::Intent;
use crate::mention::MAX_SUGGESTIONS;

impl App {
    pub(super) fn handle_event(event: &Event, model: &Model) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Paste(text) => Some(Message::Edit(Intent::InsertText(text.clone()))),
            Event::Resize(w, h) => Some(Message::Resize(*w, *h)),
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        let alt = key.modifiers.contains(KeyModifiers::ALT);

        if ctrl {
            return match key.code {
                KeyCode::Char('s') => Some(Message::Save),
                KeyCode::Char('l') => Some(Message::ToggleLock),
                KeyCode::Char('q' | 'c') => Some(Message::Quit),
                KeyCode::Home => Some(Message::Edit(Intent::Home)),
                KeyCode::End => Some(Message::Edit(Intent::End)),
                _ => None,
            };
        }

        if alt {
            return match key.code {
                KeyCode::Char(c @ '1'..='8') => {
                    let index = c.to_digit(10).map(|d| d as usize - 1)?;
                    (index < MAX_SUGGESTIONS && index < model.mention_suggestions().len())
                        .then_some(Message::AcceptMention(index))
                }
                _ => None,
            };
        }

        let intent = match key.code {
            KeyCode::Char(c) => Intent::InsertText(c.to_string()),
            KeyCode::Enter => Intent::Enter,
            KeyCode::Backspace => Intent::Backspace,
            KeyCode::Delete => Intent::DeleteForward,
            KeyCode::Tab => Intent::Tab,
            KeyCode::BackTab => Intent::ShiftTab,
            KeyCode::Left => Intent::Move(Direction::Left),
            KeyCode::Right => Intent::Move(Direction::Right),
            KeyCode::Up => Intent::Move(Direction::Up),
            KeyCode::Down => Intent::Move(Direction::Down),
            KeyCode::Home => Intent::Home,
            KeyCode::End => Intent::End,
            KeyCode::PageUp => return Some(Message::PageUp),
            KeyCode::PageDown => return Some(Message::PageDown),
            KeyCode::Esc => return Some(Message::Quit),
            _ => return None,
        };
        Some(Message::Edit(intent))
    }

    pub(super) fn view(model: &mut Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}
