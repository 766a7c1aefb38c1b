use crate::{
    models::{Note, NoteState},
    repository::{ApiError, NotesApi},
};

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::{Mutex, MutexGuard};

pub const CREATED_STATUS: &str = "Note created successfully!";
pub const MISSING_FIELDS_STATUS: &str = "Error: Note title and content are required.";
pub const CREATE_FAILED_STATUS: &str = "Error: Failed to create note.";
pub const UPDATE_FAILED_STATUS: &str = "Error: Failed to update note.";
pub const DELETE_FAILED_STATUS: &str = "Error: Failed to delete note.";

pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(3);

/// Keeps a local copy of the notes store and the draft being edited.
///
/// The state lock is never held across a call to the store, so operations
/// started back to back interleave freely and whichever response resolves last
/// decides the list contents. Every status change schedules a reset that clears
/// status and draft and reloads the list after `reset_delay`. Only the most
/// recently scheduled reset fires; older pending ones are skipped.
pub struct NoteManager<A> {
    api: Arc<A>,
    state: Arc<Mutex<NoteState>>,
    reset_delay: Duration,
    reset_generation: Arc<AtomicU64>,
}

impl<A> Clone for NoteManager<A> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            state: self.state.clone(),
            reset_delay: self.reset_delay,
            reset_generation: self.reset_generation.clone(),
        }
    }
}

impl<A: NotesApi> NoteManager<A> {
    pub fn new(api: A, reset_delay: Duration) -> Self {
        Self {
            api: Arc::new(api),
            state: Arc::new(Mutex::new(NoteState::default())),
            reset_delay,
            reset_generation: Arc::new(AtomicU64::new(0)),
        }
    }

    #[cfg(test)]
    pub(crate) fn api(&self) -> &A {
        &self.api
    }

    pub async fn state(&self) -> NoteState {
        self.state.lock().await.clone()
    }

    pub async fn notes(&self) -> Vec<Note> {
        self.state.lock().await.notes.clone()
    }

    pub async fn editing(&self) -> Option<Note> {
        self.state.lock().await.editing.clone()
    }

    pub async fn status(&self) -> Option<String> {
        self.state.lock().await.status.clone()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.loading
    }

    /// Replaces the local list with the store's. On failure the previous list is kept.
    pub async fn load_all(&self) {
        self.state.lock().await.loading = true;

        let result = self.api.list().await;

        let mut state = self.state.lock().await;
        match result {
            Ok(notes) => {
                tracing::info!("Loaded {} notes", notes.len());
                state.notes = notes;
            }
            Err(e) => tracing::error!("failed to load notes: {}", e),
        }
        state.loading = false;
    }

    /// Fetches a single note from the store. The local list is left alone.
    pub async fn fetch(&self, id: i64) -> Result<Note, ApiError> {
        self.api.get(id).await.inspect_err(|e| {
            tracing::error!("failed to fetch note {}: {}", id, e);
        })
    }

    /// Copies a listed note into the draft. Returns `false` if no such note is listed.
    pub async fn edit(&self, id: i64) -> bool {
        let mut state = self.state.lock().await;
        let Some(note) = state.notes.iter().find(|note| note.id == id).cloned() else {
            return false;
        };
        state.editing = Some(note);
        true
    }

    pub async fn set_title(&self, title: String) {
        self.state
            .lock()
            .await
            .editing
            .get_or_insert_with(Note::default)
            .title = title;
    }

    pub async fn set_content(&self, content: String) {
        self.state
            .lock()
            .await
            .editing
            .get_or_insert_with(Note::default)
            .content = content;
    }

    pub async fn clear(&self) {
        self.state.lock().await.editing = None;
    }

    /// Sends the current draft to the store: unsaved drafts are created, saved ones updated.
    pub async fn submit(&self) {
        let draft = self.editing().await.unwrap_or_default();

        if draft.is_persisted() {
            self.update(draft.id, draft).await;
        } else {
            self.create(draft).await;
        }
    }

    pub async fn create(&self, draft: Note) {
        if !draft.is_complete() {
            tracing::warn!("Refusing to create a note without title or content");
            let state = self.state.lock().await;
            self.finish(state, MISSING_FIELDS_STATUS);
            return;
        }

        match self.api.create(&draft).await {
            Ok(note) => {
                tracing::info!("Created note {}", note.id);
                let mut state = self.state.lock().await;
                state.notes.push(note);
                state.editing = Some(Note::default());
                self.finish(state, CREATED_STATUS);
            }
            Err(e) => {
                tracing::error!("failed to create note: {}", e);
                let state = self.state.lock().await;
                self.finish(state, CREATE_FAILED_STATUS);
            }
        }
    }

    /// Updates note `id` in the store. The listed entry takes the draft's title and
    /// content; the store answers with a result message only, not the saved note.
    pub async fn update(&self, id: i64, draft: Note) {
        match self.api.update(id, &draft).await {
            Ok(response) => {
                tracing::info!("Updated note {}: {}", id, response.result);
                let mut state = self.state.lock().await;
                if let Some(entry) = state.notes.iter_mut().find(|note| note.id == id) {
                    *entry = Note { id, ..draft };
                }
                self.finish(state, response.result);
            }
            Err(e) => {
                tracing::error!("failed to update note {}: {}", id, e);
                let state = self.state.lock().await;
                self.finish(state, UPDATE_FAILED_STATUS);
            }
        }
    }

    pub async fn remove(&self, id: i64) {
        match self.api.delete(id).await {
            Ok(response) => {
                tracing::info!("Deleted note {}: {}", id, response.result);
                let mut state = self.state.lock().await;
                state.notes.retain(|note| note.id != id);
                self.finish(state, response.result);
            }
            Err(e) => {
                tracing::error!("failed to delete note {}: {}", id, e);
                let state = self.state.lock().await;
                self.finish(state, DELETE_FAILED_STATUS);
            }
        }
    }

    fn finish(&self, mut state: MutexGuard<'_, NoteState>, status: impl Into<String>) {
        state.status = Some(status.into());
        let generation = self.reset_generation.fetch_add(1, Ordering::SeqCst) + 1;
        drop(state);

        self.schedule_reset(generation);
    }

    fn schedule_reset(&self, generation: u64) {
        let manager = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(manager.reset_delay).await;
            manager.reset(generation).await;
        });
    }

    async fn reset(&self, generation: u64) {
        {
            let mut state = self.state.lock().await;
            // Superseded by a later status change
            if self.reset_generation.load(Ordering::SeqCst) != generation {
                return;
            }
            state.status = None;
            state.editing = None;
        }

        self.load_all().await;
    }
}
