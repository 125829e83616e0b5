//! User preferences: ranking weights, ordering policy and feature toggles.

mod model;
mod repository;

pub use model::{DEFAULT_AUTOSAVE_DEBOUNCE_MS, DEFAULT_TOP_PROMPT_LIMIT, Preferences};
pub use repository::PreferencesRepository;
