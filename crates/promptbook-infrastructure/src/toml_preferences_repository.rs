//! TOML-backed preferences repository.
//!
//! File location: `{config_dir}/preferences.toml`

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use promptbook_core::PromptBookError;
use promptbook_core::error::Result;
use promptbook_core::preferences::{Preferences, PreferencesRepository};

use crate::paths::PromptBookPaths;
use crate::storage::TomlFile;

pub struct TomlPreferencesRepository {
    path: PathBuf,
}

impl TomlPreferencesRepository {
    pub fn new(paths: &PromptBookPaths) -> Result<Self> {
        Ok(Self {
            path: paths.preferences_file()?,
        })
    }

    /// Creates a repository reading `path` directly (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `f` to the stored preferences and writes the result back.
    pub async fn update<F>(&self, f: F) -> Result<Preferences>
    where
        F: FnOnce(&mut Preferences) + Send + 'static,
    {
        let file = TomlFile::<Preferences>::new(self.path.clone());
        tokio::task::spawn_blocking(move || file.update(Preferences::default(), f))
            .await
            .map_err(|e| PromptBookError::internal(format!("Preferences task failed: {}", e)))?
    }
}

#[async_trait]
impl PreferencesRepository for TomlPreferencesRepository {
    async fn load(&self) -> Result<Preferences> {
        let file = TomlFile::<Preferences>::new(self.path.clone());
        let loaded = tokio::task::spawn_blocking(move || file.load())
            .await
            .map_err(|e| PromptBookError::internal(format!("Preferences task failed: {}", e)))??;

        Ok(loaded.unwrap_or_default())
    }

    async fn save(&self, preferences: &Preferences) -> Result<()> {
        let file = TomlFile::<Preferences>::new(self.path.clone());
        let preferences = preferences.clone();
        tokio::task::spawn_blocking(move || file.save(&preferences))
            .await
            .map_err(|e| PromptBookError::internal(format!("Preferences task failed: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use promptbook_core::prompt::OrderingPolicy;
    use promptbook_core::ranking::RankingWeights;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_file_yields_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlPreferencesRepository::with_path(temp_dir.path().join("preferences.toml"));

        let prefs = repo.load().await.unwrap();
        assert_eq!(prefs, Preferences::default());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlPreferencesRepository::with_path(temp_dir.path().join("preferences.toml"));

        let mut prefs = Preferences::default().with_ranking(RankingWeights::new(0.8, 0.2, 0.0, 24.0));
        prefs.ordering = OrderingPolicy::RecentlyUpdated;
        prefs.top_prompt_limit = 5;
        repo.save(&prefs).await.unwrap();

        assert_eq!(repo.load().await.unwrap(), prefs);
    }

    #[tokio::test]
    async fn test_update_persists_change() {
        let temp_dir = TempDir::new().unwrap();
        let repo = TomlPreferencesRepository::with_path(temp_dir.path().join("preferences.toml"));

        let updated = repo.update(|p| p.autosave_debounce_ms = 500).await.unwrap();
        assert_eq!(updated.autosave_debounce_ms, 500);
        assert_eq!(repo.load().await.unwrap().autosave_debounce_ms, 500);
    }
}
