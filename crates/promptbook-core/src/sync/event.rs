//! Change notification events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of one live store instance (a window or a process).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceId(String);

impl SourceId {
    /// Creates a unique id with a readable label prefix, e.g. `main-6f1c...`.
    pub fn generate(label: &str) -> Self {
        Self(format!("{}-{}", label, Uuid::new_v4()))
    }

    /// Wraps an existing identifier, e.g. one read back from storage.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Broadcast after a successful write of the prompt collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptsChanged {
    /// Instance that performed the write. `None` when the writer is unknown.
    pub source: Option<SourceId>,
    /// When the change was observed.
    pub at: DateTime<Utc>,
}

impl PromptsChanged {
    pub fn from_source(source: SourceId) -> Self {
        Self {
            source: Some(source),
            at: Utc::now(),
        }
    }

    /// A change whose writer could not be identified.
    pub fn external() -> Self {
        Self {
            source: None,
            at: Utc::now(),
        }
    }

    /// True when this event was produced by `source` itself.
    pub fn is_from(&self, source: &SourceId) -> bool {
        self.source.as_ref() == Some(source)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = SourceId::generate("main");
        let b = SourceId::generate("main");
        assert_ne!(a, b);
        assert!(a.as_str().starts_with("main-"));
    }

    #[test]
    fn test_is_from() {
        let me = SourceId::generate("menubar");
        let other = SourceId::generate("main");
        assert!(PromptsChanged::from_source(me.clone()).is_from(&me));
        assert!(!PromptsChanged::from_source(other).is_from(&me));
        assert!(!PromptsChanged::external().is_from(&me));
    }
}
