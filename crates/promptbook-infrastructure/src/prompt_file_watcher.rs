//! Turns writes to `prompts.json` by other processes into change events.
//!
//! The parent directory is watched (not the file itself) because atomic
//! saves replace the file through a rename, which would orphan a watch on
//! the old inode.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebouncedEvent, Debouncer, new_debouncer};

use promptbook_core::PromptBookError;
use promptbook_core::error::Result;
use promptbook_core::sync::{ChangeNotifier, PromptsChanged};

use crate::file_prompt_repository::peek_writer;

/// Default debounce duration for bursts of file system events.
pub const DEFAULT_WATCH_DEBOUNCE: Duration = Duration::from_millis(100);

/// Watches the prompts file for as long as it is alive.
pub struct PromptFileWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
    path: PathBuf,
}

impl PromptFileWatcher {
    /// Starts watching `prompts_file` and publishes every change to `notifier`.
    ///
    /// The published source is the writer recorded in the file, so a store
    /// can recognize and skip its own saves.
    pub fn start(
        prompts_file: PathBuf,
        notifier: Arc<dyn ChangeNotifier>,
        debounce: Duration,
    ) -> Result<Self> {
        let parent = prompts_file
            .parent()
            .ok_or_else(|| PromptBookError::config(format!("{:?} has no parent", prompts_file)))?
            .to_path_buf();
        std::fs::create_dir_all(&parent)?;

        let target = prompts_file.clone();
        let mut debouncer = new_debouncer(
            debounce,
            move |result: std::result::Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    if events.iter().any(|event| is_target(&event.path, &target)) {
                        let event = match peek_writer(&target) {
                            Some(source) => PromptsChanged::from_source(source),
                            None => PromptsChanged::external(),
                        };
                        tracing::debug!("Prompts file changed (writer: {:?})", event.source);
                        notifier.notify(event);
                    }
                }
                Err(error) => tracing::warn!("Prompt file watch error: {}", error),
            },
        )
        .map_err(|e| PromptBookError::internal(format!("Failed to create watcher: {}", e)))?;

        debouncer
            .watcher()
            .watch(&parent, RecursiveMode::NonRecursive)
            .map_err(|e| {
                PromptBookError::internal(format!("Failed to watch path {:?}: {}", parent, e))
            })?;

        tracing::info!("Watching {:?} for external changes", prompts_file);
        Ok(Self {
            _debouncer: debouncer,
            path: prompts_file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Events carry absolute paths that may be canonicalized differently from
/// the configured path, so only the file name is compared.
fn is_target(event_path: &Path, target: &Path) -> bool {
    event_path.file_name().is_some() && event_path.file_name() == target.file_name()
}
