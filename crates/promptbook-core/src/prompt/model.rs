//! Prompt domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Title used whenever a prompt is committed with a blank title.
pub const UNNAMED_PROMPT_TITLE: &str = "Unnamed";

/// Body given to prompts created through "add".
pub const NEW_PROMPT_CONTENT: &str = "## Task\n";

/// A titled text snippet with usage counters.
///
/// `copy_count`, `search_count` and `updated_at` only ever move forward; use
/// the mutation helpers below instead of touching the fields directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Unique identifier (UUID v4), immutable after creation.
    pub id: String,
    /// Free-text label.
    pub title: String,
    /// Markdown body.
    pub content: String,
    /// Number of confirmed clipboard copies.
    pub copy_count: u32,
    /// Number of distinct searches this prompt matched.
    pub search_count: u32,
    /// When the prompt was last copied.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_copied_at: Option<DateTime<Utc>>,
    /// When the prompt last matched a recorded search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_matched_search_at: Option<DateTime<Utc>>,
    /// Last mutation time. Default ordering key and ranking tie-break.
    pub updated_at: DateTime<Utc>,
}

impl Prompt {
    /// Creates a prompt with a fresh id and zeroed counters.
    pub fn new(title: impl Into<String>, content: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: content.into(),
            copy_count: 0,
            search_count: 0,
            last_copied_at: None,
            last_matched_search_at: None,
            updated_at: now,
        }
    }

    /// Creates the placeholder prompt used by the "add" action.
    pub fn placeholder(now: DateTime<Utc>) -> Self {
        Self::new(UNNAMED_PROMPT_TITLE, NEW_PROMPT_CONTENT, now)
    }

    /// Sets the given counters. Used for seed data and tests.
    pub fn with_counts(mut self, copy_count: u32, search_count: u32) -> Self {
        self.copy_count = copy_count;
        self.search_count = search_count;
        self
    }

    /// Refreshes `updated_at`, never moving it backwards.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        if now > self.updated_at {
            self.updated_at = now;
        }
    }

    /// Replaces the body.
    pub fn set_content(&mut self, content: impl Into<String>, now: DateTime<Utc>) {
        self.content = content.into();
        self.touch(now);
    }

    /// Commits a title, normalizing blank input to [`UNNAMED_PROMPT_TITLE`].
    pub fn commit_title(&mut self, title: &str, now: DateTime<Utc>) {
        self.title = normalize_title(title);
        self.touch(now);
    }

    /// Records one confirmed clipboard copy.
    pub fn record_copy(&mut self, now: DateTime<Utc>) {
        self.copy_count = self.copy_count.saturating_add(1);
        self.last_copied_at = Some(now);
        self.touch(now);
    }

    /// Records that this prompt was part of a new search result set.
    pub fn record_search_match(&mut self, now: DateTime<Utc>) {
        self.search_count = self.search_count.saturating_add(1);
        self.last_matched_search_at = Some(now);
        self.touch(now);
    }

    /// Most recent copy or search activity, if any.
    pub fn last_active_at(&self) -> Option<DateTime<Utc>> {
        match (self.last_copied_at, self.last_matched_search_at) {
            (Some(copied), Some(searched)) => Some(copied.max(searched)),
            (copied, searched) => copied.or(searched),
        }
    }

    /// Case-insensitive substring match against title or content.
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.content.to_lowercase().contains(needle)
    }

    /// Equality on the fields that matter when reconciling with storage.
    ///
    /// Compares id, title, content and both counters. Timestamps are ignored.
    pub fn same_content_as(&self, other: &Prompt) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.content == other.content
            && self.copy_count == other.copy_count
            && self.search_count == other.search_count
    }
}

/// Normalizes a title at commit time.
pub fn normalize_title(title: &str) -> String {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        UNNAMED_PROMPT_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Normalizes a search query: trimmed and lowercased.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Order-sensitive structural comparison of two collections.
pub fn collections_equal(a: &[Prompt], b: &[Prompt]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(left, right)| left.same_content_as(right))
}

/// Snapshot of the whole collection as it sits in storage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptCollection {
    /// Prompts in persisted order.
    pub prompts: Vec<Prompt>,
    /// Source identifier of the instance that wrote this snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer: Option<String>,
}

impl PromptCollection {
    pub fn new(prompts: Vec<Prompt>, writer: Option<String>) -> Self {
        Self { prompts, writer }
    }
}

/// Which ordering the collection follows. Exactly one is active per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderingPolicy {
    /// Insertion order; new prompts go to the head and users reorder by hand.
    #[default]
    Manual,
    /// Most recently updated first.
    RecentlyUpdated,
}

impl OrderingPolicy {
    /// Applies the policy to a collection in place.
    pub fn apply(&self, prompts: &mut [Prompt]) {
        match self {
            OrderingPolicy::Manual => {}
            OrderingPolicy::RecentlyUpdated => {
                // Stable sort keeps manual order among equal timestamps.
                prompts.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::from_timestamp(1_000_000, 0).unwrap()
    }

    #[test]
    fn test_placeholder_prompt() {
        let prompt = Prompt::placeholder(t0());
        assert!(!prompt.id.is_empty());
        assert_eq!(prompt.title, UNNAMED_PROMPT_TITLE);
        assert_eq!(prompt.content, NEW_PROMPT_CONTENT);
        assert_eq!(prompt.copy_count, 0);
        assert_eq!(prompt.search_count, 0);
        assert!(prompt.last_active_at().is_none());
    }

    #[test]
    fn test_new_prompts_get_distinct_ids() {
        let first = Prompt::placeholder(t0());
        let second = Prompt::placeholder(t0());
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_touch_never_moves_backwards() {
        let mut prompt = Prompt::placeholder(t0());
        prompt.touch(t0() - Duration::hours(1));
        assert_eq!(prompt.updated_at, t0());

        prompt.touch(t0() + Duration::hours(1));
        assert_eq!(prompt.updated_at, t0() + Duration::hours(1));
    }

    #[test]
    fn test_commit_title_normalizes_blank() {
        let mut prompt = Prompt::new("Old", "A", t0());
        prompt.commit_title("   \n", t0());
        assert_eq!(prompt.title, UNNAMED_PROMPT_TITLE);

        prompt.commit_title("New", t0());
        assert_eq!(prompt.title, "New");
    }

    #[test]
    fn test_record_copy_and_search() {
        let mut prompt = Prompt::new("A", "B", t0());
        let later = t0() + Duration::minutes(5);
        prompt.record_copy(later);
        prompt.record_search_match(t0() + Duration::minutes(2));

        assert_eq!(prompt.copy_count, 1);
        assert_eq!(prompt.search_count, 1);
        assert_eq!(prompt.last_active_at(), Some(later));
        assert_eq!(prompt.updated_at, later);
    }

    #[test]
    fn test_collections_equal_is_order_sensitive() {
        let a = Prompt::new("A", "1", t0());
        let b = Prompt::new("B", "2", t0());
        let left = vec![a.clone(), b.clone()];
        let right = vec![b, a];
        assert!(collections_equal(&left, &left.clone()));
        assert!(!collections_equal(&left, &right));
    }

    #[test]
    fn test_collections_equal_ignores_timestamps() {
        let a = Prompt::new("A", "1", t0());
        let mut moved = a.clone();
        moved.touch(t0() + Duration::days(1));
        assert!(collections_equal(&[a], &[moved]));
    }

    #[test]
    fn test_recently_updated_ordering() {
        let old = Prompt::new("old", "", t0());
        let new = Prompt::new("new", "", t0() + Duration::hours(1));
        let mut prompts = vec![old, new];
        OrderingPolicy::RecentlyUpdated.apply(&mut prompts);
        assert_eq!(prompts[0].title, "new");

        let mut manual = prompts.clone();
        manual.reverse();
        OrderingPolicy::Manual.apply(&mut manual);
        assert_eq!(manual[0].title, "old");
    }

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  Review PR \t"), "review pr");
        assert_eq!(normalize_query("   "), "");
    }
}
