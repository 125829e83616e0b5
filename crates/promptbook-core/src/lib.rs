//! Domain layer of PromptBook: prompts, ranking, preferences and the
//! interfaces the store talks to.

pub mod clipboard;
pub mod error;
pub mod preferences;
pub mod prompt;
pub mod ranking;
pub mod sync;

// Re-export common error type
pub use error::PromptBookError;
