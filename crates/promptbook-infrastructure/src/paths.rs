//! Path management for PromptBook files.
//!
//! Paths are resolved via AppPaths from the version-migrate crate, so the
//! layout follows the platform conventions (XDG on Linux and macOS).
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/promptbook/        # Config directory (AppPaths default)
//! ├── prompts.json             # Prompt collection (versioned JSON)
//! ├── preferences.toml         # User preferences
//! ├── prompts/                 # Markdown mirror, one file per prompt
//! │   └── bug-triage.md
//! └── logs/                    # Application logs
//!     └── promptbook.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

use promptbook_core::PromptBookError;
use version_migrate::AppPaths;

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

impl From<PathError> for PromptBookError {
    fn from(err: PathError) -> Self {
        PromptBookError::config(err.to_string())
    }
}

/// Resolves every file PromptBook reads or writes.
///
/// With a base override all files live directly under that directory. This
/// is how tests and the `--data-dir` flag isolate themselves.
#[derive(Debug, Clone, Default)]
pub struct PromptBookPaths {
    base_override: Option<PathBuf>,
}

impl PromptBookPaths {
    const APP_NAME: &'static str = "promptbook";
    const PROMPTS_FILE: &'static str = "prompts.json";
    const PREFERENCES_FILE: &'static str = "preferences.toml";
    const MARKDOWN_DIR: &'static str = "prompts";
    const LOGS_DIR: &'static str = "logs";

    pub fn new(base_override: Option<PathBuf>) -> Self {
        Self { base_override }
    }

    /// Paths rooted at an explicit directory.
    pub fn with_base(base: impl Into<PathBuf>) -> Self {
        Self::new(Some(base.into()))
    }

    /// Returns the PromptBook configuration directory, e.g. `~/.config/promptbook/`.
    pub fn config_dir(&self) -> Result<PathBuf, PathError> {
        match &self.base_override {
            Some(base) => Ok(base.clone()),
            None => AppPaths::new(Self::APP_NAME)
                .config_dir()
                .map_err(|_| PathError::HomeDirNotFound),
        }
    }

    pub fn prompts_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(Self::PROMPTS_FILE))
    }

    pub fn preferences_file(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(Self::PREFERENCES_FILE))
    }

    /// Directory holding the markdown mirror.
    pub fn markdown_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(Self::MARKDOWN_DIR))
    }

    pub fn logs_dir(&self) -> Result<PathBuf, PathError> {
        Ok(self.config_dir()?.join(Self::LOGS_DIR))
    }
}
