//! Per-window view state kept next to the prompt collection.

use std::time::Duration;

use promptbook_core::prompt::Prompt;

/// How long the "copied" signal stays raised before views clear it.
pub const COPY_FEEDBACK_DURATION: Duration = Duration::from_millis(1000);

/// How long a delete stays armed waiting for the second click.
pub const DELETE_CONFIRM_DURATION: Duration = Duration::from_millis(1600);

/// A title edit in progress. Nothing is written until it is committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleEdit {
    pub id: String,
    pub draft: String,
}

/// Selection, expansion and transient signals of one store.
///
/// Every id held here refers to a prompt in the collection, or is `None`.
/// [`ViewState::reconcile`] restores that after the collection changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub selected_id: Option<String>,
    pub expanded_id: Option<String>,
    /// Raw search text as typed.
    pub search: String,
    pub title_edit: Option<TitleEdit>,
    /// Prompt that was just copied.
    pub copied_id: Option<String>,
    /// Prompt whose delete button is armed.
    pub delete_confirm_id: Option<String>,
}

impl ViewState {
    /// Selects and expands the first prompt, clearing everything else.
    pub fn focus_first(&mut self, prompts: &[Prompt]) {
        let first = prompts.first().map(|p| p.id.clone());
        self.selected_id = first.clone();
        self.expanded_id = first;
        self.title_edit = None;
        self.copied_id = None;
        self.delete_confirm_id = None;
    }

    /// Selects and expands `id`.
    pub fn focus(&mut self, id: &str) {
        self.selected_id = Some(id.to_string());
        self.expanded_id = Some(id.to_string());
    }

    /// Repairs ids after the collection was replaced.
    ///
    /// Selection and expansion keep their id when it still exists and fall
    /// back to the first prompt otherwise. Transient signals for vanished
    /// prompts are dropped.
    pub fn reconcile(&mut self, prompts: &[Prompt]) {
        let exists = |id: &String| prompts.iter().any(|p| &p.id == id);
        let first = || prompts.first().map(|p| p.id.clone());

        self.selected_id = self.selected_id.take().filter(exists).or_else(first);
        self.expanded_id = self.expanded_id.take().filter(exists).or_else(first);

        if self.title_edit.as_ref().is_some_and(|edit| !exists(&edit.id)) {
            self.title_edit = None;
        }
        self.copied_id = self.copied_id.take().filter(exists);
        self.delete_confirm_id = self.delete_confirm_id.take().filter(exists);
    }

    /// Drops every reference to a deleted prompt.
    ///
    /// `remaining` is the collection after the delete.
    pub fn forget(&mut self, id: &str, remaining: &[Prompt]) {
        let first = remaining.first().map(|p| p.id.clone());

        if self.selected_id.as_deref() == Some(id) || remaining.is_empty() {
            self.selected_id = first.clone();
        }
        if self.expanded_id.as_deref() == Some(id) || remaining.is_empty() {
            self.expanded_id = first;
        }
        if self.title_edit.as_ref().is_some_and(|edit| edit.id == id) {
            self.title_edit = None;
        }
        if self.copied_id.as_deref() == Some(id) {
            self.copied_id = None;
        }
        if self.delete_confirm_id.as_deref() == Some(id) {
            self.delete_confirm_id = None;
        }
    }
}
