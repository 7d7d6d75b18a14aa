//! Cross-references to other notes.
//!
//! The host registers the notes a mention may point at. The engine itself
//! only stores the id and label it is given; lookup and suggestion live
//! here so a host can offer completions while the user types `@query`.

use tracing::trace;

use crate::editor::Intent;

/// Most suggestions returned for one query.
pub const MAX_SUGGESTIONS: usize = 8;

/// Character that starts a mention query.
pub const TRIGGER: char = '@';

/// A note that can be mentioned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteTarget {
    pub id: String,
    pub title: String,
}

impl NoteTarget {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }

    /// Text shown inline for a mention of this note.
    pub fn label(&self) -> String {
        format!("{TRIGGER}{}", self.title)
    }

    /// Intent that inserts a mention of this note at the cursor.
    pub fn intent(&self) -> Intent {
        Intent::InsertMention {
            id: self.id.clone(),
            label: self.label(),
        }
    }
}

/// Registered mention targets, in registration order.
#[derive(Debug, Clone, Default)]
pub struct MentionRegistry {
    targets: Vec<NoteTarget>,
}

impl MentionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a target, replacing any earlier one with the same id.
    pub fn register(&mut self, target: NoteTarget) {
        match self.targets.iter_mut().find(|t| t.id == target.id) {
            Some(existing) => *existing = target,
            None => self.targets.push(target),
        }
    }

    pub fn unregister(&mut self, id: &str) -> Option<NoteTarget> {
        let index = self.targets.iter().position(|t| t.id == id)?;
        Some(self.targets.remove(index))
    }

    pub fn get(&self, id: &str) -> Option<&NoteTarget> {
        self.targets.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Targets whose title contains `query`, ignoring case.
    pub fn suggest(&self, query: &str) -> Vec<&NoteTarget> {
        let query = query.to_lowercase();
        let found: Vec<&NoteTarget> = self
            .targets
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&query))
            .take(MAX_SUGGESTIONS)
            .collect();
        trace!(%query, count = found.len(), "mention suggestions");
        found
    }
}

/// The `@query` being typed just before `offset`, as `(trigger offset, query)`.
///
/// The trigger must start the text or follow whitespace, and the query may
/// not contain whitespace.
pub fn active_query(text: &str, offset: usize) -> Option<(usize, &str)> {
    let before = text.get(..offset)?;
    let start = before.rfind(TRIGGER)?;
    let query = &before[start + TRIGGER.len_utf8()..];
    if query.chars().any(char::is_whitespace) {
        return None;
    }
    let boundary = before[..start]
        .chars()
        .next_back()
        .is_none_or(char::is_whitespace);
    boundary.then_some((start, query))
}
