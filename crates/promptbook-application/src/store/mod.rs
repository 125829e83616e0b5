//! Prompt store services.
//!
//! - `prompt_store`: the collection, its lifecycle and every user operation
//! - `autosave`: debounced, cancelable persistence
//! - `view_state`: selection, expansion and transient signals
//! - `listener`: turns bus messages into store reloads

mod autosave;
mod listener;
mod prompt_store;
mod view_state;

#[cfg(test)]
mod test_support;

pub use autosave::Autosaver;
pub use listener::next_change;
pub use prompt_store::{LoadOutcome, PromptStore, ReloadOutcome, StoreConfig, StoreStatus};
pub use view_state::{COPY_FEEDBACK_DURATION, DELETE_CONFIRM_DURATION, TitleEdit, ViewState};
