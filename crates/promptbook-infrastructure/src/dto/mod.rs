//! Data Transfer Objects (DTOs) for persistence.
//!
//! DTOs are the versioned on-disk schema. They stay private to the
//! infrastructure layer; the rest of the workspace only sees domain types.
//!
//! ### PromptCollection Version History
//! - **1.0.0**: Legacy desktop records (`copied` / `searched` counters)
//! - **1.1.0**: Usage timestamps and snapshot writer

mod prompt_collection;

pub use prompt_collection::{
    PROMPT_COLLECTION_ENTITY, PromptCollectionDTO, PromptCollectionV1_0_0,
    PromptCollectionV1_1_0, create_prompt_collection_migrator,
};
