//! Sample prompts written to an empty library on first run.

use chrono::{DateTime, Utc};

use super::model::Prompt;

/// Returns the sample prompts used to seed an empty library.
///
/// Ids are generated fresh on every call so two seeded windows never
/// collide on identifiers.
pub fn get_default_prompts(now: DateTime<Utc>) -> Vec<Prompt> {
    vec![
        Prompt::new(
            "Bug Triage",
            "## Task\nReview this bug report and return:\n1. Root cause\n2. Minimal fix\n3. Regression tests",
            now,
        )
        .with_counts(12, 7),
        Prompt::new(
            "PR Review",
            "Review this PR like a senior engineer. Focus on:\n- behavior regressions\n- missing tests\n- performance risks",
            now,
        )
        .with_counts(20, 11),
        Prompt::new(
            "Release Notes",
            "Write concise release notes from commits grouped by:\n- feature\n- fix\n- chore\nInclude migration warnings and known issues.",
            now,
        )
        .with_counts(8, 5),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_prompts_have_unique_ids() {
        let prompts = get_default_prompts(Utc::now());
        assert_eq!(prompts.len(), 3);
        let ids: HashSet<_> = prompts.iter().map(|p| p.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert!(prompts.iter().all(|p| !p.title.trim().is_empty()));
    }
}
