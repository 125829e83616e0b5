//! Debounced, cancelable persistence of the prompt collection.
//!
//! Every mutation reschedules a single pending write. A write only starts
//! after the collection has been quiet for the debounce period; once started
//! it always runs to completion. Writes are serialized, so a forced flush
//! waits for an in-flight autosave before writing again.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use promptbook_core::error::Result;
use promptbook_core::prompt::{Prompt, PromptRepository};
use promptbook_core::sync::{ChangeNotifier, PromptsChanged, SourceId};

/// Shared by the scheduler and its spawned write tasks.
struct SaveTarget {
    repository: Arc<dyn PromptRepository>,
    notifier: Arc<dyn ChangeNotifier>,
    source: SourceId,
    /// Held for the whole duration of a repository write.
    write_lock: Mutex<()>,
    /// Highest revision known to be on disk.
    saved_revision: AtomicU64,
}

impl SaveTarget {
    /// Writes `snapshot` unless `revision` is already saved.
    ///
    /// Returns whether a write happened.
    async fn write(&self, revision: u64, snapshot: &[Prompt]) -> Result<bool> {
        let _guard = self.write_lock.lock().await;
        if self.saved_revision.load(Ordering::SeqCst) >= revision {
            return Ok(false);
        }

        self.persist(snapshot).await?;
        self.saved_revision.fetch_max(revision, Ordering::SeqCst);
        tracing::info!(
            "[Autosaver] Saved {} prompts (revision {})",
            snapshot.len(),
            revision
        );
        Ok(true)
    }

    /// Saves and announces. Callers hold `write_lock`.
    async fn persist(&self, snapshot: &[Prompt]) -> Result<()> {
        self.repository.save(snapshot).await?;
        self.notifier
            .notify(PromptsChanged::from_source(self.source.clone()));
        Ok(())
    }
}

/// Schedules debounced writes for one store.
///
/// Scheduling spawns onto the current tokio runtime.
pub struct Autosaver {
    target: Arc<SaveTarget>,
    debounce: Duration,
    pending: Option<CancellationToken>,
}

impl Autosaver {
    pub fn new(
        repository: Arc<dyn PromptRepository>,
        notifier: Arc<dyn ChangeNotifier>,
        source: SourceId,
        debounce: Duration,
    ) -> Self {
        Self {
            target: Arc::new(SaveTarget {
                repository,
                notifier,
                source,
                write_lock: Mutex::new(()),
                saved_revision: AtomicU64::new(0),
            }),
            debounce,
            pending: None,
        }
    }

    pub fn debounce(&self) -> Duration {
        self.debounce
    }

    /// Replaces any pending write with one for `snapshot`.
    pub fn schedule(&mut self, revision: u64, snapshot: Vec<Prompt>) {
        self.cancel_pending();

        let token = CancellationToken::new();
        let cancelled = token.clone();
        let target = Arc::clone(&self.target);
        let debounce = self.debounce;

        tracing::debug!(
            "[Autosaver] Scheduled revision {} in {:?}",
            revision,
            debounce
        );

        tokio::spawn(async move {
            tokio::select! {
                _ = cancelled.cancelled() => return,
                _ = tokio::time::sleep(debounce) => {}
            }

            // Failures keep the revision dirty; the next schedule or flush retries.
            if let Err(e) = target.write(revision, &snapshot).await {
                tracing::warn!("[Autosaver] Failed to save revision {}: {}", revision, e);
            }
        });

        self.pending = Some(token);
    }

    /// Cancels the pending write if it has not started yet.
    pub fn cancel_pending(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }

    /// Writes `snapshot` now, after any in-flight write finishes.
    ///
    /// `Ok(false)` means `revision` was already saved. The pending debounced
    /// write is cancelled only once this write succeeds; after a failure it
    /// still fires and retries.
    pub async fn flush(&mut self, revision: u64, snapshot: &[Prompt]) -> Result<bool> {
        let written = self.target.write(revision, snapshot).await?;
        self.cancel_pending();
        Ok(written)
    }

    /// Writes a collection that is not tracked by revisions, such as the
    /// sample prompts written back after storage was emptied elsewhere.
    pub async fn write_now(&self, snapshot: &[Prompt]) -> Result<()> {
        let _guard = self.target.write_lock.lock().await;
        self.target.persist(snapshot).await
    }

    /// Records that `revision` matches storage without writing it.
    pub fn mark_saved(&self, revision: u64) {
        self.target
            .saved_revision
            .fetch_max(revision, Ordering::SeqCst);
    }

    pub fn saved_revision(&self) -> u64 {
        self.target.saved_revision.load(Ordering::SeqCst)
    }

    pub fn is_dirty(&self, revision: u64) -> bool {
        self.saved_revision() < revision
    }
}

impl Drop for Autosaver {
    fn drop(&mut self) {
        self.cancel_pending();
    }
}
