//! The authoritative in-memory prompt collection of one window.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use promptbook_core::PromptBookError;
use promptbook_core::clipboard::Clipboard;
use promptbook_core::error::Result;
use promptbook_core::preferences::Preferences;
use promptbook_core::prompt::{
    OrderingPolicy, Prompt, PromptRepository, collections_equal, get_default_prompts,
    normalize_query,
};
use promptbook_core::ranking::{RankingWeights, top_ranked};
use promptbook_core::sync::{ChangeNotifier, PromptsChanged, SourceId};

use super::autosave::Autosaver;
use super::view_state::{TitleEdit, ViewState};

/// Lifecycle of a store.
///
/// `Uninitialized → Loading → Ready`, or `Loading → EmptySeeded → Ready`
/// when storage was empty. `Ready → Reloading → Ready` on external changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreStatus {
    Uninitialized,
    Loading,
    Ready,
    EmptySeeded,
    Reloading,
}

/// What the initial load found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Storage had prompts; they are now in memory.
    Loaded,
    /// Storage was empty; the sample prompts were inserted and persisted.
    Seeded,
}

/// What a reload did to the in-memory collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReloadOutcome {
    /// Storage matched memory. Nothing was touched.
    Unchanged,
    /// Memory was replaced with the stored collection.
    Replaced,
    /// Storage was empty; the sample prompts were written back to it.
    Reseeded,
}

/// Per-store settings, usually derived from [`Preferences`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StoreConfig {
    pub ordering: OrderingPolicy,
    pub autosave_debounce: Duration,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::from(&Preferences::default())
    }
}

impl From<&Preferences> for StoreConfig {
    fn from(preferences: &Preferences) -> Self {
        Self {
            ordering: preferences.ordering,
            autosave_debounce: preferences.autosave_debounce(),
        }
    }
}

/// Owns the prompt collection and view state of one window or process.
///
/// All methods take `&mut self`: a store is driven from a single task and
/// never shared. Mutations are persisted through a debounced autosave, which
/// spawns onto the current tokio runtime. Call [`PromptStore::shutdown`]
/// before dropping the store, or pending edits are lost.
pub struct PromptStore {
    prompts: Vec<Prompt>,
    view: ViewState,
    status: StoreStatus,
    ordering: OrderingPolicy,
    repository: Arc<dyn PromptRepository>,
    autosaver: Autosaver,
    source: SourceId,
    /// Bumped on every change of `prompts`.
    revision: u64,
    /// Last normalized query whose matches were counted.
    last_recorded_query: Option<String>,
}

impl PromptStore {
    pub fn new(
        repository: Arc<dyn PromptRepository>,
        notifier: Arc<dyn ChangeNotifier>,
        source: SourceId,
        config: StoreConfig,
    ) -> Self {
        let autosaver = Autosaver::new(
            Arc::clone(&repository),
            notifier,
            source.clone(),
            config.autosave_debounce,
        );

        Self {
            prompts: Vec::new(),
            view: ViewState::default(),
            status: StoreStatus::Uninitialized,
            ordering: config.ordering,
            repository,
            autosaver,
            source,
            revision: 0,
            last_recorded_query: None,
        }
    }

    // ============================================================================
    // Accessors
    // ============================================================================

    pub fn status(&self) -> StoreStatus {
        self.status
    }

    /// The collection in display order.
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn source(&self) -> &SourceId {
        &self.source
    }

    pub fn ordering(&self) -> OrderingPolicy {
        self.ordering
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True when memory holds changes that are not on disk yet.
    pub fn is_dirty(&self) -> bool {
        self.autosaver.is_dirty(self.revision)
    }

    // ============================================================================
    // Loading
    // ============================================================================

    /// Loads the collection from storage.
    ///
    /// On failure the previous state is kept and a `PersistenceRead` error is
    /// returned. An empty backend is filled with the sample prompts, which are
    /// written back immediately.
    pub async fn load(&mut self) -> Result<LoadOutcome> {
        let previous = self.status;
        self.status = StoreStatus::Loading;

        let mut loaded = match self.repository.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("[PromptStore] Failed to load prompts: {}", e);
                self.status = previous;
                return Err(into_read_error(e));
            }
        };

        if loaded.is_empty() {
            self.status = StoreStatus::EmptySeeded;
            self.prompts = get_default_prompts(Utc::now());
            self.ordering.apply(&mut self.prompts);
            self.revision += 1;
            self.view.focus_first(&self.prompts);
            tracing::info!(
                "[PromptStore] Storage empty, seeded {} sample prompts",
                self.prompts.len()
            );

            if let Err(e) = self.autosaver.flush(self.revision, &self.prompts).await {
                tracing::warn!("[PromptStore] Failed to persist sample prompts: {}", e);
            }
            self.status = StoreStatus::Ready;
            return Ok(LoadOutcome::Seeded);
        }

        self.ordering.apply(&mut loaded);
        self.prompts = loaded;
        self.revision += 1;
        self.autosaver.cancel_pending();
        self.autosaver.mark_saved(self.revision);
        self.view.focus_first(&self.prompts);
        self.status = StoreStatus::Ready;

        tracing::info!("[PromptStore] Loaded {} prompts", self.prompts.len());
        Ok(LoadOutcome::Loaded)
    }

    // ============================================================================
    // Prompt mutations
    // ============================================================================

    /// Inserts a placeholder prompt, selects and expands it.
    pub fn add_prompt(&mut self) -> String {
        let prompt = Prompt::placeholder(Utc::now());
        let id = prompt.id.clone();
        self.prompts.insert(0, prompt);
        self.view.focus(&id);
        self.commit();
        id
    }

    pub fn update_content(&mut self, id: &str, content: &str) -> Result<()> {
        let prompt = self.find_mut(id)?;
        if prompt.content == content {
            return Ok(());
        }
        prompt.set_content(content, Utc::now());
        self.commit();
        Ok(())
    }

    /// Commits a title. Blank titles become "Unnamed".
    pub fn update_title(&mut self, id: &str, title: &str) -> Result<()> {
        let prompt = self.find_mut(id)?;
        prompt.commit_title(title, Utc::now());
        self.commit();
        Ok(())
    }

    /// Counts one confirmed copy and raises the copied signal.
    pub fn record_copy(&mut self, id: &str) -> Result<()> {
        self.find_mut(id)?.record_copy(Utc::now());
        self.view.copied_id = Some(id.to_string());
        self.commit();
        Ok(())
    }

    /// Writes the prompt to the clipboard, then counts the copy.
    ///
    /// A clipboard failure leaves the counters untouched.
    pub async fn copy_prompt(&mut self, id: &str, clipboard: &dyn Clipboard) -> Result<()> {
        let content = self
            .get(id)
            .map(|p| p.content.clone())
            .ok_or_else(|| PromptBookError::not_found("prompt", id))?;

        if let Err(e) = clipboard.write_text(&content).await {
            tracing::warn!("[PromptStore] Failed to copy prompt {}: {}", id, e);
            return Err(match e {
                PromptBookError::Clipboard(_) => e,
                other => PromptBookError::clipboard(other.to_string()),
            });
        }

        self.record_copy(id)
    }

    /// Counts a search hit for every prompt matching `query`.
    ///
    /// Blank queries and a repeat of the last recorded query are ignored.
    /// Returns the number of prompts that were counted.
    pub fn record_search_match(&mut self, query: &str) -> usize {
        let normalized = normalize_query(query);
        if normalized.is_empty() || self.last_recorded_query.as_deref() == Some(&normalized) {
            return 0;
        }
        self.last_recorded_query = Some(normalized.clone());

        let now = Utc::now();
        let mut touched = 0;
        for prompt in self
            .prompts
            .iter_mut()
            .filter(|p| p.matches_lowercase(&normalized))
        {
            prompt.record_search_match(now);
            touched += 1;
        }

        if touched > 0 {
            self.commit();
        }
        touched
    }

    /// Removes a prompt and every view reference to it.
    pub fn delete_prompt(&mut self, id: &str) -> Result<()> {
        let index = self.index_of(id)?;
        self.prompts.remove(index);
        self.view.forget(id, &self.prompts);
        self.commit();
        Ok(())
    }

    /// Moves the prompt at `from` to position `to`.
    ///
    /// Only available with [`OrderingPolicy::Manual`].
    pub fn move_prompt(&mut self, from: usize, to: usize) -> Result<()> {
        if self.ordering != OrderingPolicy::Manual {
            return Err(PromptBookError::config(
                "Prompts can only be reordered with manual ordering",
            ));
        }
        let len = self.prompts.len();
        if from >= len {
            return Err(PromptBookError::not_found("prompt position", from.to_string()));
        }
        if to >= len {
            return Err(PromptBookError::not_found("prompt position", to.to_string()));
        }
        if from == to {
            return Ok(());
        }

        let prompt = self.prompts.remove(from);
        self.prompts.insert(to, prompt);
        self.commit();
        Ok(())
    }

    // ============================================================================
    // View state
    // ============================================================================

    pub fn select(&mut self, id: &str) -> Result<()> {
        self.index_of(id)?;
        self.view.selected_id = Some(id.to_string());
        Ok(())
    }

    /// Expands `id`, or collapses it when it is already expanded.
    pub fn toggle_expanded(&mut self, id: &str) -> Result<()> {
        self.index_of(id)?;
        if self.view.expanded_id.as_deref() == Some(id) {
            self.view.expanded_id = None;
        } else {
            self.view.expanded_id = Some(id.to_string());
        }
        Ok(())
    }

    pub fn set_search(&mut self, query: impl Into<String>) {
        self.view.search = query.into();
    }

    /// Counts matches of the current search text.
    pub fn record_current_search(&mut self) -> usize {
        let query = self.view.search.clone();
        self.record_search_match(&query)
    }

    /// Begins editing a title, seeding the draft with the current title.
    pub fn start_title_edit(&mut self, id: &str) -> Result<()> {
        let title = self
            .get(id)
            .map(|p| p.title.clone())
            .ok_or_else(|| PromptBookError::not_found("prompt", id))?;
        self.view.title_edit = Some(TitleEdit {
            id: id.to_string(),
            draft: title,
        });
        Ok(())
    }

    pub fn set_title_draft(&mut self, value: impl Into<String>) {
        if let Some(edit) = self.view.title_edit.as_mut() {
            edit.draft = value.into();
        }
    }

    /// Commits the title being edited. Returns the edited prompt id, if any.
    pub fn commit_title_edit(&mut self) -> Result<Option<String>> {
        let Some(edit) = self.view.title_edit.take() else {
            return Ok(None);
        };
        self.update_title(&edit.id, &edit.draft)?;
        Ok(Some(edit.id))
    }

    pub fn cancel_title_edit(&mut self) {
        self.view.title_edit = None;
    }

    /// Clears the copied signal if it still refers to `id`.
    pub fn clear_copied(&mut self, id: &str) {
        if self.view.copied_id.as_deref() == Some(id) {
            self.view.copied_id = None;
        }
    }

    /// Arms the two-step delete for `id`.
    pub fn request_delete_confirm(&mut self, id: &str) -> Result<()> {
        self.index_of(id)?;
        self.view.delete_confirm_id = Some(id.to_string());
        Ok(())
    }

    /// Disarms the delete if it still refers to `id`.
    pub fn clear_delete_confirm(&mut self, id: &str) {
        if self.view.delete_confirm_id.as_deref() == Some(id) {
            self.view.delete_confirm_id = None;
        }
    }

    // ============================================================================
    // Queries
    // ============================================================================

    /// Prompts whose title or content contains `query`, ignoring case.
    pub fn filtered_view(&self, query: &str) -> Vec<&Prompt> {
        let needle = normalize_query(query);
        if needle.is_empty() {
            return self.prompts.iter().collect();
        }
        self.prompts
            .iter()
            .filter(|p| p.matches_lowercase(&needle))
            .collect()
    }

    /// [`PromptStore::filtered_view`] for the current search text.
    pub fn visible_prompts(&self) -> Vec<&Prompt> {
        self.filtered_view(&self.view.search)
    }

    pub fn top_ranked(&self, limit: usize, weights: &RankingWeights) -> Vec<&Prompt> {
        self.top_ranked_at(limit, weights, Utc::now())
    }

    pub fn top_ranked_at(
        &self,
        limit: usize,
        weights: &RankingWeights,
        now: DateTime<Utc>,
    ) -> Vec<&Prompt> {
        top_ranked(&self.prompts, weights, now, limit)
    }

    // ============================================================================
    // Persistence and synchronization
    // ============================================================================

    /// Writes pending changes now.
    ///
    /// Returns `Ok(false)` when storage was already up to date.
    pub async fn force_save(&mut self) -> Result<bool> {
        match self.autosaver.flush(self.revision, &self.prompts).await {
            Ok(written) => Ok(written),
            Err(e) => {
                tracing::warn!("[PromptStore] Forced save failed: {}", e);
                Err(into_write_error(e))
            }
        }
    }

    /// Reacts to a change announced by another instance.
    ///
    /// Returns `None` for this store's own announcements.
    pub async fn handle_change(&mut self, event: &PromptsChanged) -> Result<Option<ReloadOutcome>> {
        if event.is_from(&self.source) {
            tracing::debug!("[PromptStore] Ignoring own change notification");
            return Ok(None);
        }
        self.reload().await.map(Some)
    }

    /// Re-reads storage and adopts it if it differs from memory.
    pub async fn reload(&mut self) -> Result<ReloadOutcome> {
        let previous = self.status;
        self.status = StoreStatus::Reloading;
        let outcome = self.reload_inner().await;
        self.status = match outcome {
            Ok(ReloadOutcome::Replaced) => StoreStatus::Ready,
            _ => previous,
        };
        outcome
    }

    async fn reload_inner(&mut self) -> Result<ReloadOutcome> {
        let mut loaded = match self.repository.load().await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!("[PromptStore] Failed to reload prompts: {}", e);
                return Err(into_read_error(e));
            }
        };

        if loaded.is_empty() {
            tracing::info!("[PromptStore] Storage emptied externally, writing samples back");
            let seed = get_default_prompts(Utc::now());
            self.autosaver
                .write_now(&seed)
                .await
                .map_err(into_write_error)?;
            return Ok(ReloadOutcome::Reseeded);
        }

        self.ordering.apply(&mut loaded);
        if collections_equal(&self.prompts, &loaded) {
            return Ok(ReloadOutcome::Unchanged);
        }

        self.prompts = loaded;
        self.revision += 1;
        // The new state came from storage, so the next autosave has nothing to write.
        self.autosaver.cancel_pending();
        self.autosaver.mark_saved(self.revision);
        self.view.reconcile(&self.prompts);

        tracing::info!(
            "[PromptStore] Adopted {} prompts from storage",
            self.prompts.len()
        );
        Ok(ReloadOutcome::Replaced)
    }

    /// Flushes pending changes and consumes the store.
    pub async fn shutdown(mut self) -> Result<bool> {
        if !self.is_dirty() {
            return Ok(false);
        }
        self.force_save().await
    }

    // ============================================================================
    // Internals
    // ============================================================================

    fn index_of(&self, id: &str) -> Result<usize> {
        self.prompts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| PromptBookError::not_found("prompt", id))
    }

    fn find_mut(&mut self, id: &str) -> Result<&mut Prompt> {
        self.prompts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| PromptBookError::not_found("prompt", id))
    }

    /// Re-applies ordering, bumps the revision and schedules an autosave.
    fn commit(&mut self) {
        self.ordering.apply(&mut self.prompts);
        self.revision += 1;

        if self.status == StoreStatus::Uninitialized {
            // Nothing has been loaded, so writing now would clobber storage.
            tracing::debug!("[PromptStore] Not loaded yet, autosave skipped");
            return;
        }
        self.autosaver.schedule(self.revision, self.prompts.clone());
    }
}

fn into_read_error(e: PromptBookError) -> PromptBookError {
    match e {
        PromptBookError::PersistenceRead(_) => e,
        other => PromptBookError::persistence_read(other.to_string()),
    }
}

fn into_write_error(e: PromptBookError) -> PromptBookError {
    match e {
        PromptBookError::PersistenceWrite(_) => e,
        other => PromptBookError::persistence_write(other.to_string()),
    }
}
