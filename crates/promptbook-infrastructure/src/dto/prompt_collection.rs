//! Prompt collection DTOs and migrations.
//!
//! ## Version History
//! - **1.0.0**: Records written by the first desktop build:
//!   `{ id, title, content, copied, searched }`, no timestamps
//! - **1.1.0**: Full prompt with usage timestamps, plus the `writer` of the snapshot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use version_migrate::{FromDomain, IntoDomain, MigratesTo, Versioned};

use promptbook_core::error::Result;
use promptbook_core::prompt::{Prompt, PromptCollection};

/// Entity name used in the version-migrate registry.
pub const PROMPT_COLLECTION_ENTITY: &str = "prompt_collection";

// ============================================================================
// V1.0.0
// ============================================================================

/// Prompt record V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRecordV1_0_0 {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub copied: u32,
    #[serde(default)]
    pub searched: u32,
}

/// Prompt collection V1.0.0.
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.0.0")]
pub struct PromptCollectionV1_0_0 {
    #[serde(default)]
    pub prompts: Vec<PromptRecordV1_0_0>,
}

// ============================================================================
// V1.1.0
// ============================================================================

/// Prompt DTO V1.1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptV1_1_0 {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub copy_count: u32,
    #[serde(default)]
    pub search_count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_copied_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_matched_search_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Prompt collection V1.1.0 (added timestamps and writer).
#[derive(Debug, Clone, Serialize, Deserialize, Versioned)]
#[versioned(version = "1.1.0")]
pub struct PromptCollectionV1_1_0 {
    #[serde(default)]
    pub prompts: Vec<PromptV1_1_0>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub writer: Option<String>,
}

/// Type alias for the latest collection version.
pub type PromptCollectionDTO = PromptCollectionV1_1_0;

// ============================================================================
// Migration implementations
// ============================================================================

/// Migration from V1.0.0 to V1.1.0.
///
/// V1.0.0 never recorded times, so every prompt is stamped with the
/// migration time and usage timestamps stay empty.
impl MigratesTo<PromptCollectionV1_1_0> for PromptCollectionV1_0_0 {
    fn migrate(self) -> PromptCollectionV1_1_0 {
        let now = Utc::now();
        PromptCollectionV1_1_0 {
            prompts: self
                .prompts
                .into_iter()
                .map(|record| PromptV1_1_0 {
                    id: record.id,
                    title: record.title,
                    content: record.content,
                    copy_count: record.copied,
                    search_count: record.searched,
                    last_copied_at: None,
                    last_matched_search_at: None,
                    updated_at: now,
                })
                .collect(),
            writer: None,
        }
    }
}

// ============================================================================
// Domain model conversions
// ============================================================================

impl From<PromptV1_1_0> for Prompt {
    fn from(dto: PromptV1_1_0) -> Self {
        Prompt {
            id: dto.id,
            title: dto.title,
            content: dto.content,
            copy_count: dto.copy_count,
            search_count: dto.search_count,
            last_copied_at: dto.last_copied_at,
            last_matched_search_at: dto.last_matched_search_at,
            updated_at: dto.updated_at,
        }
    }
}

impl From<&Prompt> for PromptV1_1_0 {
    fn from(prompt: &Prompt) -> Self {
        PromptV1_1_0 {
            id: prompt.id.clone(),
            title: prompt.title.clone(),
            content: prompt.content.clone(),
            copy_count: prompt.copy_count,
            search_count: prompt.search_count,
            last_copied_at: prompt.last_copied_at,
            last_matched_search_at: prompt.last_matched_search_at,
            updated_at: prompt.updated_at,
        }
    }
}

/// Convert PromptCollectionV1_1_0 DTO to domain model.
impl IntoDomain<PromptCollection> for PromptCollectionV1_1_0 {
    fn into_domain(self) -> PromptCollection {
        PromptCollection {
            prompts: self.prompts.into_iter().map(Prompt::from).collect(),
            writer: self.writer,
        }
    }
}

/// Convert domain model to PromptCollectionV1_1_0 DTO (for version-migrate save support).
impl FromDomain<PromptCollection> for PromptCollectionV1_1_0 {
    fn from_domain(collection: PromptCollection) -> Self {
        PromptCollectionV1_1_0 {
            prompts: collection.prompts.iter().map(PromptV1_1_0::from).collect(),
            writer: collection.writer,
        }
    }
}

// ============================================================================
// Migrator factory
// ============================================================================

/// Creates a Migrator for the prompt collection.
///
/// # Migration Path
///
/// - V1.0.0 → V1.1.0: counters renamed, timestamps filled with the load time
/// - V1.1.0 → PromptCollection: Converts DTO to domain model
pub fn create_prompt_collection_migrator() -> Result<version_migrate::Migrator> {
    let mut migrator = version_migrate::Migrator::builder().build();

    let path = version_migrate::Migrator::define(PROMPT_COLLECTION_ENTITY)
        .from::<PromptCollectionV1_0_0>()
        .step::<PromptCollectionV1_1_0>()
        .into_with_save::<PromptCollection>();

    migrator.register(path)?;
    Ok(migrator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_load_legacy_records() {
        let migrator = create_prompt_collection_migrator().unwrap();
        let legacy = json!({
            "version": "1.0.0",
            "prompts": [
                { "id": "a", "title": "Bug Triage", "content": "## Task", "copied": 12, "searched": 7 },
                { "id": "b", "title": "PR Review", "content": "", "copied": 0, "searched": 0 }
            ]
        });

        let collection: PromptCollection = migrator
            .load_flat_from(PROMPT_COLLECTION_ENTITY, legacy)
            .unwrap();

        assert_eq!(collection.prompts.len(), 2);
        assert_eq!(collection.prompts[0].title, "Bug Triage");
        assert_eq!(collection.prompts[0].copy_count, 12);
        assert_eq!(collection.prompts[0].search_count, 7);
        assert!(collection.prompts[0].last_copied_at.is_none());
        assert!(collection.writer.is_none());
    }

    #[test]
    fn test_saved_collection_carries_version_and_writer() {
        let migrator = create_prompt_collection_migrator().unwrap();
        let collection = PromptCollection::new(
            vec![Prompt::new("Title", "Body", Utc::now())],
            Some("main-1".to_string()),
        );

        let saved = migrator
            .save_domain_flat(PROMPT_COLLECTION_ENTITY, collection.clone())
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
        assert_eq!(value["version"], "1.1.0");
        assert_eq!(value["writer"], "main-1");
        assert_eq!(value["prompts"][0]["copyCount"], 0);

        let loaded: PromptCollection = migrator
            .load_flat_from(PROMPT_COLLECTION_ENTITY, value)
            .unwrap();
        assert_eq!(loaded, collection);
    }
}
