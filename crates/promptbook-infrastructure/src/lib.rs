//! Infrastructure layer of PromptBook: file storage, paths, clipboard and
//! file watching.

pub mod dto;
pub mod file_prompt_repository;
pub mod markdown_mirror;
pub mod paths;
pub mod prompt_file_watcher;
pub mod storage;
pub mod system_clipboard;
pub mod toml_preferences_repository;

pub use crate::file_prompt_repository::FilePromptRepository;
pub use crate::markdown_mirror::MarkdownMirror;
pub use crate::paths::PromptBookPaths;
pub use crate::prompt_file_watcher::{DEFAULT_WATCH_DEBOUNCE, PromptFileWatcher};
pub use crate::system_clipboard::{ClipboardCommand, SystemClipboard};
pub use crate::toml_preferences_repository::TomlPreferencesRepository;
