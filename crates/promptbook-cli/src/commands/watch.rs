//! Keeps a store in sync with writes from other processes.

use std::sync::Arc;

use anyhow::Result;

use promptbook_application::ReloadOutcome;
use promptbook_application::store::next_change;
use promptbook_core::sync::ChangeBus;
use promptbook_infrastructure::{DEFAULT_WATCH_DEBOUNCE, PromptFileWatcher};

use crate::context::{AppContext, short_id};

/// Follows the prompts file until Ctrl-C, reprinting the quick-access list
/// whenever another instance changes the collection.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let bus = ChangeBus::new();
    let mut changes = bus.subscribe();

    let _watcher = PromptFileWatcher::start(
        ctx.repository.prompts_file().to_path_buf(),
        Arc::new(bus.clone()),
        DEFAULT_WATCH_DEBOUNCE,
    )?;
    let mut store = ctx.open_store(Arc::new(bus.clone())).await?;
    let limit = ctx.preferences.top_prompt_limit;

    println!(
        "Watching {} ({} prompts). Press Ctrl-C to stop.",
        ctx.repository.prompts_file().display(),
        store.prompts().len()
    );

    loop {
        tokio::select! {
            change = next_change(&mut changes) => {
                let Some(event) = change else { break };
                match store.handle_change(&event).await {
                    Ok(Some(ReloadOutcome::Replaced)) => {
                        println!("↻ Reloaded {} prompts", store.prompts().len());
                        for prompt in store.top_ranked(limit, &ctx.preferences.ranking) {
                            println!("   {}  {}", short_id(&prompt.id), prompt.title);
                        }
                    }
                    Ok(Some(ReloadOutcome::Reseeded)) => println!("↻ Storage was emptied, samples restored"),
                    Ok(Some(ReloadOutcome::Unchanged)) | Ok(None) => {}
                    Err(e) => tracing::warn!("Reload failed: {}", e),
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    store.shutdown().await?;
    Ok(())
}
