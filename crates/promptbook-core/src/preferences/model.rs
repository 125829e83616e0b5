//! Preference domain models.

use serde::{Deserialize, Serialize};

use crate::prompt::OrderingPolicy;
use crate::ranking::RankingWeights;

/// Default number of prompts in the quick-access list.
pub const DEFAULT_TOP_PROMPT_LIMIT: usize = 8;

/// Default quiet period before an autosave fires.
pub const DEFAULT_AUTOSAVE_DEBOUNCE_MS: u64 = 200;

/// Process-wide user preferences.
///
/// Every field has a default, so a partially written file still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Ordering policy of the library.
    pub ordering: OrderingPolicy,
    /// Number of prompts shown in the quick-access list.
    pub top_prompt_limit: usize,
    /// Quiet period before pending edits are written to disk.
    pub autosave_debounce_ms: u64,
    /// Whether each prompt is mirrored to a markdown file.
    pub markdown_mirror: bool,
    /// Log level used when `RUST_LOG` is not set.
    pub log_level: String,
    /// Weights for the quick-access ranking. Kept last so it serializes as a trailing table.
    pub ranking: RankingWeights,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            ordering: OrderingPolicy::default(),
            top_prompt_limit: DEFAULT_TOP_PROMPT_LIMIT,
            autosave_debounce_ms: DEFAULT_AUTOSAVE_DEBOUNCE_MS,
            markdown_mirror: true,
            log_level: "info".to_string(),
            ranking: RankingWeights::default(),
        }
    }
}

impl Preferences {
    /// Returns a copy with the ranking weights replaced.
    pub fn with_ranking(mut self, ranking: RankingWeights) -> Self {
        self.ranking = ranking;
        self
    }

    /// Autosave delay as a [`std::time::Duration`].
    pub fn autosave_debounce(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.autosave_debounce_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_preferences() {
        let prefs = Preferences::default();
        assert_eq!(prefs.top_prompt_limit, 8);
        assert_eq!(prefs.autosave_debounce_ms, 200);
        assert_eq!(prefs.ordering, OrderingPolicy::Manual);
        assert_eq!(prefs.ranking, RankingWeights::default());
        assert!(prefs.markdown_mirror);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let prefs: Preferences = toml::from_str(
            r#"
top_prompt_limit = 5

[ranking]
recency_boost = 1.0
"#,
        )
        .unwrap();
        assert_eq!(prefs.top_prompt_limit, 5);
        assert_eq!(prefs.ranking.recency_boost, 1.0);
        assert_eq!(prefs.ranking.copy_weight, 0.7);
        assert_eq!(prefs.autosave_debounce_ms, 200);
    }

    #[test]
    fn test_unknown_keys_from_older_files_are_ignored() {
        let prefs: Preferences = toml::from_str(
            r#"
global_shortcut_enabled = false
markdown_mirror = false
"#,
        )
        .unwrap();
        assert!(!prefs.markdown_mirror);
        assert_eq!(prefs.top_prompt_limit, DEFAULT_TOP_PROMPT_LIMIT);
    }
}
