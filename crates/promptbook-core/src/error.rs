//! Error types for PromptBook.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A shared error type for the whole PromptBook workspace.
///
/// Every variant is recoverable: callers log it and keep their last known
/// good state rather than aborting.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum PromptBookError {
    /// Entity not found error with type information
    #[error("Entity not found: {entity_type} '{id}'")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// The persistence backend could not be read or decoded
    #[error("Persistence read error: {0}")]
    PersistenceRead(String),

    /// The persistence backend rejected a write
    #[error("Persistence write error: {0}")]
    PersistenceWrite(String),

    /// Writing to the system clipboard failed
    #[error("Clipboard error: {0}")]
    Clipboard(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration error
    #[error("Migration error: {0}")]
    Migration(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl PromptBookError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a NotFound error
    pub fn not_found(entity_type: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type,
            id: id.into(),
        }
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    /// Creates a PersistenceRead error
    pub fn persistence_read(message: impl Into<String>) -> Self {
        Self::PersistenceRead(message.into())
    }

    /// Creates a PersistenceWrite error
    pub fn persistence_write(message: impl Into<String>) -> Self {
        Self::PersistenceWrite(message.into())
    }

    /// Creates a Clipboard error
    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is a NotFound error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error came from reading the persistence backend
    pub fn is_read_failure(&self) -> bool {
        matches!(
            self,
            Self::PersistenceRead(_) | Self::Io { .. } | Self::Serialization { .. } | Self::Migration(_)
        )
    }

    /// Check if this is a write failure
    pub fn is_write_failure(&self) -> bool {
        matches!(self, Self::PersistenceWrite(_))
    }

    /// Check if this is a clipboard error
    pub fn is_clipboard(&self) -> bool {
        matches!(self, Self::Clipboard(_))
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for PromptBookError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for PromptBookError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for PromptBookError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for PromptBookError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<version_migrate::MigrationError> for PromptBookError {
    fn from(err: version_migrate::MigrationError) -> Self {
        use version_migrate::MigrationError;

        match err {
            MigrationError::DeserializationError(_) | MigrationError::SerializationError(_) => {
                Self::Serialization {
                    format: "migration".to_string(),
                    message: err.to_string(),
                }
            }
            MigrationError::IoError { .. } => Self::Io {
                message: err.to_string(),
            },
            _ => Self::Migration(err.to_string()),
        }
    }
}

/// A type alias for `Result<T, PromptBookError>`.
pub type Result<T> = std::result::Result<T, PromptBookError>;
