//! Prompt domain module.
//!
//! - `model`: the `Prompt` entity, collection snapshot and ordering policy
//! - `repository`: persistence trait for the whole collection
//! - `preset`: sample prompts for an empty library

mod model;
mod preset;
mod repository;

pub use model::{
    NEW_PROMPT_CONTENT, OrderingPolicy, Prompt, PromptCollection, UNNAMED_PROMPT_TITLE,
    collections_equal, normalize_query, normalize_title,
};
pub use preset::get_default_prompts;
pub use repository::PromptRepository;
