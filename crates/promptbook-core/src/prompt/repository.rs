//! Prompt repository trait.

use async_trait::async_trait;

use super::model::Prompt;
use crate::error::Result;

/// Persistence backend for the prompt collection.
///
/// The collection is always read and replaced as a whole. Implementations
/// must make `save` atomic so a concurrent `load` never observes a
/// half-written collection.
#[async_trait]
pub trait PromptRepository: Send + Sync {
    /// Loads the whole collection in persisted order.
    ///
    /// Returns an empty vector when nothing has been stored yet.
    async fn load(&self) -> Result<Vec<Prompt>>;

    /// Replaces the stored collection.
    async fn save(&self, prompts: &[Prompt]) -> Result<()>;
}
