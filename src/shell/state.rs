use crate::{
    api::ApiError,
    dto::{Note, NoteId, NotePayload},
    ui::editor::{EditorForm, EditorMode},
};

pub const LOAD_FAILED: &str = "Failed to load notes.";
pub const SAVE_FAILED: &str = "Failed to save note.";
pub const DELETE_FAILED: &str = "Failed to delete note.";
pub const MISSING_ID_UPDATE: &str = "This note is missing an id; cannot update.";
pub const MISSING_ID_DELETE: &str = "This note is missing an id; cannot delete.";
pub const DELETE_PROMPT: &str = "Delete this note? This can't be undone.";

/// Network work the shell asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    List,
    Create(NotePayload),
    Update(NoteId, NotePayload),
    Delete(NoteId),
}

/// Result of a finished [`Request`]
#[derive(Debug)]
pub enum Outcome {
    Listed(Result<Vec<Note>, ApiError>),
    Created(NotePayload, Result<Option<Note>, ApiError>),
    Updated(NoteId, NotePayload, Result<Option<Note>, ApiError>),
    Deleted(NoteId, Result<(), ApiError>),
}

/// The open editor dialog
pub struct EditorSession {
    pub mode: EditorMode,
    pub target: Option<Note>,
    pub form: EditorForm,
}

/// Everything the note screen shows.
///
/// Transitions are synchronous: `begin_*`/`submit`/`confirm_delete` hand out
/// a [`Request`], and [`ShellState::apply`] folds the matching [`Outcome`]
/// back in.
#[derive(Default)]
pub struct ShellState {
    notes: Vec<Note>,
    loading: bool,
    refreshing: bool,
    saving: bool,
    error: Option<String>,
    editor: Option<EditorSession>,
    pending_delete: Option<Note>,
    selected: usize,
}

impl ShellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    pub const fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub const fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub const fn editor(&self) -> Option<&EditorSession> {
        self.editor.as_ref()
    }

    pub fn editor_mut(&mut self) -> Option<&mut EditorSession> {
        self.editor.as_mut()
    }

    pub const fn pending_delete(&self) -> Option<&Note> {
        self.pending_delete.as_ref()
    }

    pub const fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_note(&self) -> Option<&Note> {
        self.notes.get(self.selected)
    }

    pub const fn can_refresh(&self) -> bool {
        !self.loading && !self.refreshing
    }

    /// Starts a fetch. A manual refresh is ignored while one is running.
    pub fn begin_load(&mut self, refresh: bool) -> Option<Request> {
        if refresh && !self.can_refresh() {
            return None;
        }

        self.error = None;
        if refresh {
            self.refreshing = true;
        } else {
            self.loading = true;
        }
        Some(Request::List)
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.notes.len() {
            self.selected += 1;
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn open_create(&mut self) {
        self.editor = Some(EditorSession {
            mode: EditorMode::Create,
            target: None,
            form: EditorForm::new(EditorMode::Create, None),
        });
    }

    pub fn open_edit(&mut self, index: usize) {
        let Some(note) = self.notes.get(index).cloned() else {
            return;
        };
        self.selected = index;
        self.editor = Some(EditorSession {
            mode: EditorMode::Edit,
            form: EditorForm::new(EditorMode::Edit, Some(&note)),
            target: Some(note),
        });
    }

    /// No-op while a save is in flight
    pub fn close_editor(&mut self) {
        if self.saving {
            return;
        }
        self.editor = None;
    }

    /// Routes a validated editor payload to create or update
    pub fn submit(&mut self, payload: NotePayload) -> Option<Request> {
        if self.saving {
            return None;
        }
        let editor = self.editor.as_ref()?;

        self.error = None;
        let request = match editor.mode {
            EditorMode::Create => Request::Create(payload),
            EditorMode::Edit => {
                let Some(id) = editor.target.as_ref().and_then(|note| note.id.clone()) else {
                    self.error = Some(MISSING_ID_UPDATE.to_string());
                    return None;
                };
                Request::Update(id, payload)
            }
        };

        self.saving = true;
        Some(request)
    }

    /// Asks for confirmation before deleting the note at `index`
    pub fn request_delete(&mut self, index: usize) {
        let Some(note) = self.notes.get(index) else {
            return;
        };
        if note.id.is_none() {
            self.error = Some(MISSING_ID_DELETE.to_string());
            return;
        }
        self.selected = index;
        self.pending_delete = Some(note.clone());
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    pub fn confirm_delete(&mut self) -> Option<Request> {
        let id = self.pending_delete.take()?.id?;
        self.error = None;
        Some(Request::Delete(id))
    }

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Listed(result) => self.finish_load(result),
            Outcome::Created(payload, result) => self.finish_create(payload, result),
            Outcome::Updated(id, payload, result) => self.finish_update(&id, &payload, result),
            Outcome::Deleted(id, result) => self.finish_delete(&id, result),
        }
    }

    fn finish_load(&mut self, result: Result<Vec<Note>, ApiError>) {
        match result {
            Ok(notes) => {
                tracing::info!("Loaded {} notes", notes.len());
                self.notes = notes;
                self.clamp_selection();
            }
            Err(e) => self.fail(&e, LOAD_FAILED),
        }
        self.loading = false;
        self.refreshing = false;
    }

    fn finish_create(&mut self, payload: NotePayload, result: Result<Option<Note>, ApiError>) {
        self.saving = false;
        match result {
            Ok(created) => {
                let mut note = created.unwrap_or(Note {
                    id: None,
                    title: payload.title,
                    content: payload.content,
                });
                if note.id.is_none() {
                    let id = NoteId::local();
                    tracing::warn!("Service returned no id for the new note, showing it as {id}");
                    note.id = Some(id);
                }
                self.notes.insert(0, note);
                self.selected = 0;
                self.editor = None;
            }
            Err(e) => self.fail(&e, SAVE_FAILED),
        }
    }

    fn finish_update(
        &mut self,
        id: &NoteId,
        payload: &NotePayload,
        result: Result<Option<Note>, ApiError>,
    ) {
        self.saving = false;
        match result {
            Ok(updated) => {
                for note in self.notes.iter_mut().filter(|note| note.has_id(id)) {
                    let mut replacement = updated
                        .clone()
                        .unwrap_or_else(|| note.merged_with(payload));
                    if replacement.id.is_none() {
                        replacement.id = Some(id.clone());
                    }
                    *note = replacement;
                }
                self.editor = None;
            }
            Err(e) => self.fail(&e, SAVE_FAILED),
        }
    }

    fn finish_delete(&mut self, id: &NoteId, result: Result<(), ApiError>) {
        match result {
            Ok(()) => {
                self.notes.retain(|note| !note.has_id(id));
                self.clamp_selection();
            }
            Err(e) => self.fail(&e, DELETE_FAILED),
        }
    }

    fn fail(&mut self, error: &ApiError, fallback: &str) {
        tracing::error!("{fallback} {error}");
        let message = error.user_message();
        self.error = Some(if message.trim().is_empty() {
            fallback.to_string()
        } else {
            message
        });
    }

    fn clamp_selection(&mut self) {
        if self.selected >= self.notes.len() {
            self.selected = self.notes.len().saturating_sub(1);
        }
    }
}
