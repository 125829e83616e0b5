//! Cross-window change notification.
//!
//! After a successful write a store announces `PromptsChanged` tagged with
//! its [`SourceId`]; every other store reloads and reconciles.

mod bus;
mod event;

pub use bus::{ChangeBus, ChangeNotifier, NoopNotifier};
pub use event::{PromptsChanged, SourceId};
