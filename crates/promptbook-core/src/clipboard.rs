//! Clipboard abstraction.

use async_trait::async_trait;

use crate::error::Result;

/// Destination for copied prompt content.
#[async_trait]
pub trait Clipboard: Send + Sync {
    /// Writes plain text. An error means nothing was copied.
    async fn write_text(&self, text: &str) -> Result<()>;
}
