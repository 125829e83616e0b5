//! Application layer for PromptBook.
//!
//! Coordinates the domain model with a repository and a change bus to give
//! each window an authoritative, autosaving prompt store.

pub mod store;

pub use store::{PromptStore, ReloadOutcome, StoreConfig, StoreStatus};
