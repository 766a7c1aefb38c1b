use serde::{Deserialize, Serialize};

/// Id carried by a note the store has not assigned an identity to yet.
pub const UNSAVED_ID: i64 = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Note ID, `0` until the store assigns one
    #[serde(default)]
    pub id: i64,
    /// Note title
    pub title: String,
    /// Note content
    pub content: String,
}

impl Note {
    #[cfg(test)]
    pub fn draft(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: UNSAVED_ID,
            title: title.into(),
            content: content.into(),
        }
    }

    pub const fn is_persisted(&self) -> bool {
        self.id != UNSAVED_ID
    }

    pub fn is_complete(&self) -> bool {
        !self.title.is_empty() && !self.content.is_empty()
    }
}

/// Everything the front-end shows: the draft, the cached list, and the outcome
/// of the last mutating action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteState {
    pub editing: Option<Note>,
    pub notes: Vec<Note>,
    pub loading: bool,
    pub status: Option<String>,
}
