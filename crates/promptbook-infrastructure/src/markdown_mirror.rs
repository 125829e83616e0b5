//! Markdown mirror of the prompt collection.
//!
//! Each prompt is written to `<dir>/<slug>-<id prefix>.md` so it can be opened in an
//! external editor. The mirror is output only: `prompts.json` stays the
//! source of truth and the mirror is rebuilt after every save.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use promptbook_core::PromptBookError;
use promptbook_core::error::Result;
use promptbook_core::prompt::Prompt;

use crate::storage::write_atomic;

const MAX_SLUG_CHARS: usize = 80;
const FALLBACK_SLUG: &str = "untitled";
const EXTENSION: &str = "md";

/// Lowercase ASCII alphanumerics separated by single dashes.
///
/// `"Bug Triage!"` becomes `"bug-triage"`; titles without any usable
/// character become `"untitled"`.
pub fn slugify(title: &str) -> String {
    let mut out = String::new();
    let mut prev_dash = false;
    for ch in title.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            out.push(ch);
            prev_dash = false;
        } else if !prev_dash {
            out.push('-');
            prev_dash = true;
        }
    }

    let trimmed = out.trim_matches('-');
    if trimmed.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        trimmed
            .chars()
            .take(MAX_SLUG_CHARS)
            .collect::<String>()
            .trim_end_matches('-')
            .to_string()
    }
}

/// Characters of the id appended to the slug.
const ID_SUFFIX_CHARS: usize = 8;

/// `<slug>-<id prefix>.md` for one prompt.
///
/// Depends only on the prompt itself, so inserting, deleting or reordering
/// other prompts never renames its file.
pub fn mirror_file_name(prompt: &Prompt) -> String {
    format!(
        "{}-{}.{EXTENSION}",
        slugify(&prompt.title),
        id_suffix(&prompt.id, ID_SUFFIX_CHARS)
    )
}

fn id_suffix(id: &str, max_chars: usize) -> String {
    let suffix: String = id
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(max_chars)
        .collect::<String>()
        .to_lowercase();
    if suffix.is_empty() {
        "0".to_string()
    } else {
        suffix
    }
}

/// File name of every prompt, in collection order.
///
/// Two prompts sharing a slug and an id prefix fall back to the whole id.
pub fn mirror_file_names(prompts: &[Prompt]) -> Vec<(&str, String)> {
    let mut used = HashSet::new();
    prompts
        .iter()
        .map(|prompt| {
            let mut name = mirror_file_name(prompt);
            if !used.insert(name.clone()) {
                name = format!(
                    "{}-{}.{EXTENSION}",
                    slugify(&prompt.title),
                    id_suffix(&prompt.id, usize::MAX)
                );
                used.insert(name.clone());
            }
            (prompt.id.as_str(), name)
        })
        .collect()
}

/// Writes prompt bodies to a directory of markdown files.
#[derive(Debug, Clone)]
pub struct MarkdownMirror {
    dir: PathBuf,
}

impl MarkdownMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Rewrites every prompt file and removes files of deleted prompts.
    ///
    /// Unchanged files are left alone so external editors do not see
    /// spurious modifications.
    pub fn sync(&self, prompts: &[Prompt]) -> Result<()> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            PromptBookError::persistence_write(format!(
                "Failed to create mirror directory {:?}: {}",
                self.dir, e
            ))
        })?;

        let mut kept = HashSet::new();
        for (prompt, (_, name)) in prompts.iter().zip(mirror_file_names(prompts)) {
            let path = self.dir.join(&name);
            let unchanged = fs::read_to_string(&path)
                .map(|existing| existing == prompt.content)
                .unwrap_or(false);
            if !unchanged {
                write_atomic(&path, prompt.content.as_bytes())?;
            }
            kept.insert(name);
        }

        for stale in self.existing_files()?.difference(&kept) {
            if let Err(e) = fs::remove_file(self.dir.join(stale)) {
                tracing::warn!("Failed to remove stale mirror file {}: {}", stale, e);
            }
        }
        Ok(())
    }

    /// Path of the mirrored file for `id`, if it has been written.
    pub fn path_for(&self, prompts: &[Prompt], id: &str) -> Option<PathBuf> {
        mirror_file_names(prompts)
            .into_iter()
            .find(|(prompt_id, _)| *prompt_id == id)
            .map(|(_, name)| self.dir.join(name))
            .filter(|path| path.exists())
    }

    fn existing_files(&self) -> Result<HashSet<String>> {
        let entries = fs::read_dir(&self.dir)?;
        Ok(entries
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_file())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| name.ends_with(".md"))
            .collect())
    }
}
