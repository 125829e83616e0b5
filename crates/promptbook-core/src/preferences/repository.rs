//! Preferences repository trait.

use async_trait::async_trait;

use super::model::Preferences;
use crate::error::Result;

/// Storage for [`Preferences`].
#[async_trait]
pub trait PreferencesRepository: Send + Sync {
    /// Loads preferences. Returns defaults if none exist.
    async fn load(&self) -> Result<Preferences>;

    /// Saves preferences.
    async fn save(&self, preferences: &Preferences) -> Result<()>;
}
