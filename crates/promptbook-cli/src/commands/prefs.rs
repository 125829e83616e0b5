//! Viewing and changing preferences.

use anyhow::{Context, Result, bail};

use promptbook_core::preferences::{Preferences, PreferencesRepository};
use promptbook_core::prompt::OrderingPolicy;

use crate::context::AppContext;

/// One parsed `prefs set` assignment.
#[derive(Debug, Clone, PartialEq)]
pub enum Setting {
    CopyWeight(f64),
    SearchWeight(f64),
    RecencyBoost(f64),
    RecencyWindowHours(f64),
    Ordering(OrderingPolicy),
    TopPromptLimit(usize),
    AutosaveDebounceMs(u64),
    MarkdownMirror(bool),
    LogLevel(String),
}

impl Setting {
    pub const KEYS: [&'static str; 9] = [
        "copy-weight",
        "search-weight",
        "recency-boost",
        "recency-window-hours",
        "ordering",
        "top-limit",
        "autosave-debounce-ms",
        "markdown-mirror",
        "log-level",
    ];

    pub fn parse(key: &str, value: &str) -> Result<Self> {
        let number = || -> Result<f64> {
            value
                .parse::<f64>()
                .with_context(|| format!("{} expects a number, got {:?}", key, value))
        };
        let flag = || -> Result<bool> {
            match value {
                "true" | "on" | "yes" => Ok(true),
                "false" | "off" | "no" => Ok(false),
                _ => bail!("{} expects true or false, got {:?}", key, value),
            }
        };

        Ok(match key {
            "copy-weight" => Setting::CopyWeight(number()?),
            "search-weight" => Setting::SearchWeight(number()?),
            "recency-boost" => Setting::RecencyBoost(number()?),
            "recency-window-hours" => Setting::RecencyWindowHours(number()?),
            "ordering" => Setting::Ordering(match value {
                "manual" => OrderingPolicy::Manual,
                "recently-updated" | "recently_updated" => OrderingPolicy::RecentlyUpdated,
                _ => bail!("ordering must be manual or recently-updated"),
            }),
            "top-limit" => Setting::TopPromptLimit(
                value
                    .parse()
                    .with_context(|| format!("top-limit expects a count, got {:?}", value))?,
            ),
            "autosave-debounce-ms" => Setting::AutosaveDebounceMs(
                value
                    .parse()
                    .with_context(|| format!("autosave-debounce-ms expects milliseconds, got {:?}", value))?,
            ),
            "markdown-mirror" => Setting::MarkdownMirror(flag()?),
            "log-level" => Setting::LogLevel(value.to_string()),
            _ => bail!(
                "Unknown preference {:?}. Known keys: {}",
                key,
                Self::KEYS.join(", ")
            ),
        })
    }

    pub fn apply(self, preferences: &mut Preferences) {
        match self {
            Setting::CopyWeight(v) => preferences.ranking.copy_weight = v,
            Setting::SearchWeight(v) => preferences.ranking.search_weight = v,
            Setting::RecencyBoost(v) => preferences.ranking.recency_boost = v,
            Setting::RecencyWindowHours(v) => preferences.ranking.recency_window_hours = v,
            Setting::Ordering(v) => preferences.ordering = v,
            Setting::TopPromptLimit(v) => preferences.top_prompt_limit = v,
            Setting::AutosaveDebounceMs(v) => preferences.autosave_debounce_ms = v,
            Setting::MarkdownMirror(v) => preferences.markdown_mirror = v,
            Setting::LogLevel(v) => preferences.log_level = v,
        }
    }
}

pub async fn show(ctx: &AppContext) -> Result<()> {
    let preferences = ctx.preferences_repository.load().await?;
    println!("# {}", ctx.preferences_repository.path().display());
    print!("{}", toml::to_string_pretty(&preferences)?);
    Ok(())
}

pub async fn set(ctx: &AppContext, key: String, value: String) -> Result<()> {
    let setting = Setting::parse(&key, &value)?;
    ctx.preferences_repository
        .update(move |preferences| setting.apply(preferences))
        .await?;
    println!("✓ {} = {}", key, value);
    Ok(())
}

pub async fn reset(ctx: &AppContext) -> Result<()> {
    ctx.preferences_repository
        .save(&Preferences::default())
        .await?;
    println!("✓ Preferences reset to defaults");
    Ok(())
}
