//! File-based prompt repository.
//!
//! Stores the whole collection as one versioned JSON document and replaces
//! it atomically on every save. Uses version-migrate so files written by
//! older builds load transparently.
//!
//! File location: `{config_dir}/prompts.json`

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use version_migrate::Migrator;

use promptbook_core::PromptBookError;
use promptbook_core::error::Result;
use promptbook_core::prompt::{Prompt, PromptCollection, PromptRepository};
use promptbook_core::sync::SourceId;

use crate::dto::{PROMPT_COLLECTION_ENTITY, create_prompt_collection_migrator};
use crate::markdown_mirror::MarkdownMirror;
use crate::paths::PromptBookPaths;
use crate::storage::AtomicFile;

/// Prompt repository backed by `prompts.json` and an optional markdown mirror.
pub struct FilePromptRepository {
    file: AtomicFile,
    mirror: Option<MarkdownMirror>,
    /// Written into every snapshot so other instances can tell who saved it.
    writer: Option<SourceId>,
    migrator: Arc<Migrator>,
}

impl FilePromptRepository {
    /// Creates a repository at the standard locations.
    pub fn new(paths: &PromptBookPaths) -> Result<Self> {
        Ok(Self {
            file: AtomicFile::new(paths.prompts_file()?),
            mirror: Some(MarkdownMirror::new(paths.markdown_dir()?)),
            writer: None,
            migrator: Arc::new(create_prompt_collection_migrator()?),
        })
    }

    /// Creates a repository rooted at `base` (for testing).
    pub fn with_base_path(base: PathBuf) -> Result<Self> {
        Self::new(&PromptBookPaths::with_base(base))
    }

    /// Tags every saved snapshot with `writer`.
    pub fn with_writer(mut self, writer: SourceId) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Turns the markdown mirror on or off.
    pub fn with_markdown_mirror(mut self, enabled: bool) -> Self {
        if !enabled {
            self.mirror = None;
        } else if self.mirror.is_none()
            && let Some(parent) = self.file.path().parent()
        {
            self.mirror = Some(MarkdownMirror::new(parent.join("prompts")));
        }
        self
    }

    pub fn prompts_file(&self) -> &Path {
        self.file.path()
    }

    pub fn writer(&self) -> Option<&SourceId> {
        self.writer.as_ref()
    }

    /// Loads the full snapshot including its writer.
    pub async fn load_collection(&self) -> Result<PromptCollection> {
        let file = self.file.clone();
        let migrator = Arc::clone(&self.migrator);

        run_blocking(move || {
            let Some(content) = file.read_to_string()? else {
                return Ok(PromptCollection::default());
            };

            let json_value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
                PromptBookError::persistence_read(format!(
                    "Failed to parse {:?}: {}",
                    file.path(),
                    e
                ))
            })?;

            migrator
                .load_flat_from(PROMPT_COLLECTION_ENTITY, json_value)
                .map_err(|e| {
                    PromptBookError::persistence_read(format!(
                        "Failed to migrate {:?}: {}",
                        file.path(),
                        e
                    ))
                })
        })
        .await
    }

    /// Resolves the mirrored markdown file of a prompt.
    ///
    /// Fails with `NotFound` until the prompt has been saved at least once.
    pub async fn prompt_file_path(&self, id: &str) -> Result<PathBuf> {
        let Some(mirror) = &self.mirror else {
            return Err(PromptBookError::config("Markdown mirror is disabled"));
        };

        let collection = self.load_collection().await?;
        mirror
            .path_for(&collection.prompts, id)
            .ok_or_else(|| PromptBookError::not_found("prompt file", id))
    }
}

#[async_trait]
impl PromptRepository for FilePromptRepository {
    async fn load(&self) -> Result<Vec<Prompt>> {
        let collection = self.load_collection().await?;
        tracing::debug!(
            "Loaded {} prompts from {:?}",
            collection.prompts.len(),
            self.file.path()
        );
        Ok(collection.prompts)
    }

    async fn save(&self, prompts: &[Prompt]) -> Result<()> {
        let collection = PromptCollection::new(
            prompts.to_vec(),
            self.writer.as_ref().map(|w| w.to_string()),
        );

        // Serialize using migrator (includes version info)
        let serialized = self
            .migrator
            .save_domain_flat(PROMPT_COLLECTION_ENTITY, collection.clone())
            .map_err(|e| {
                PromptBookError::persistence_write(format!("Failed to serialize prompts: {}", e))
            })?;

        let file = self.file.clone();
        let mirror = self.mirror.clone();
        run_blocking(move || {
            file.write(serialized.as_bytes())?;

            // The JSON file is authoritative; a broken mirror must not fail the save.
            if let Some(mirror) = mirror
                && let Err(e) = mirror.sync(&collection.prompts)
            {
                tracing::warn!("Markdown mirror update failed: {}", e);
            }
            Ok(())
        })
        .await
    }
}

/// Reads the `writer` field of a prompts file without migrating it.
///
/// Used by the file watcher, which only needs to know who wrote the file.
pub fn peek_writer(path: &Path) -> Option<SourceId> {
    let content = std::fs::read_to_string(path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value
        .get("writer")
        .and_then(|writer| writer.as_str())
        .map(SourceId::from_raw)
}

async fn run_blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| PromptBookError::internal(format!("Storage task failed: {}", e)))?
}
