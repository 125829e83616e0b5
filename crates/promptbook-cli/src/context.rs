//! Composition root: wires paths, repositories and the store together.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use promptbook_application::{PromptStore, StoreConfig};
use promptbook_core::preferences::{Preferences, PreferencesRepository};
use promptbook_core::prompt::Prompt;
use promptbook_core::sync::{ChangeNotifier, SourceId};
use promptbook_infrastructure::{FilePromptRepository, PromptBookPaths, TomlPreferencesRepository};

/// Everything a command needs.
pub struct AppContext {
    pub paths: PromptBookPaths,
    pub preferences: Preferences,
    pub preferences_repository: TomlPreferencesRepository,
    pub repository: Arc<FilePromptRepository>,
    pub source: SourceId,
}

impl AppContext {
    pub async fn init(data_dir: Option<PathBuf>) -> Result<Self> {
        let paths = PromptBookPaths::new(data_dir);
        let preferences_repository = TomlPreferencesRepository::new(&paths)?;
        let preferences = preferences_repository
            .load()
            .await
            .with_context(|| format!("Failed to read {:?}", preferences_repository.path()))?;

        let source = SourceId::generate("cli");
        let repository = FilePromptRepository::new(&paths)?
            .with_writer(source.clone())
            .with_markdown_mirror(preferences.markdown_mirror);

        Ok(Self {
            paths,
            preferences,
            preferences_repository,
            repository: Arc::new(repository),
            source,
        })
    }

    /// Creates and loads a store announcing its writes on `notifier`.
    pub async fn open_store(&self, notifier: Arc<dyn ChangeNotifier>) -> Result<PromptStore> {
        let mut store = PromptStore::new(
            self.repository.clone(),
            notifier,
            self.source.clone(),
            StoreConfig::from(&self.preferences),
        );
        store.load().await?;
        Ok(store)
    }
}

/// Finds a prompt by full id or unique id prefix.
pub fn resolve_id(prompts: &[Prompt], needle: &str) -> Result<String> {
    if let Some(exact) = prompts.iter().find(|p| p.id == needle) {
        return Ok(exact.id.clone());
    }

    let matches: Vec<&Prompt> = prompts.iter().filter(|p| p.id.starts_with(needle)).collect();
    match matches.as_slice() {
        [only] => Ok(only.id.clone()),
        [] => bail!("No prompt with id {}", needle),
        _ => bail!("Id prefix {} is ambiguous ({} prompts)", needle, matches.len()),
    }
}

/// First eight characters of an id, enough to address it from the shell.
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn prompt_with_id(id: &str) -> Prompt {
        let mut prompt = Prompt::new("t", "c", Utc::now());
        prompt.id = id.to_string();
        prompt
    }

    #[test]
    fn test_resolve_id_by_prefix() {
        let prompts = vec![prompt_with_id("abc123"), prompt_with_id("abd456")];
        assert_eq!(resolve_id(&prompts, "abc").unwrap(), "abc123");
        assert_eq!(resolve_id(&prompts, "abd456").unwrap(), "abd456");
        assert!(resolve_id(&prompts, "ab").is_err());
        assert!(resolve_id(&prompts, "zzz").is_err());
    }

    #[test]
    fn test_short_id() {
        assert_eq!(short_id("0123456789"), "01234567");
        assert_eq!(short_id("abc"), "abc");
    }
}
