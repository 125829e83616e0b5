//! Commands that read or change the prompt collection.

use std::io::{self, BufRead, Read, Write};
use std::process::Command;
use std::sync::Arc;

use anyhow::{Context, Result, bail};

use promptbook_application::PromptStore;
use promptbook_core::clipboard::Clipboard;
use promptbook_core::preferences::PreferencesRepository;
use promptbook_core::prompt::Prompt;
use promptbook_core::ranking::RankingService;
use promptbook_core::sync::NoopNotifier;
use promptbook_infrastructure::SystemClipboard;

use crate::context::{AppContext, resolve_id, short_id};

async fn open(ctx: &AppContext) -> Result<PromptStore> {
    ctx.open_store(Arc::new(NoopNotifier)).await
}

/// Flushes and reports a failed final write as an error.
async fn close(store: PromptStore) -> Result<()> {
    store
        .shutdown()
        .await
        .context("Failed to save prompts")?;
    Ok(())
}

fn print_row(index: usize, prompt: &Prompt) {
    println!(
        "{:>3}  {}  {:<40}  copied {:>3}  searched {:>3}",
        index,
        short_id(&prompt.id),
        prompt.title,
        prompt.copy_count,
        prompt.search_count
    );
}

/// Content from the flag, or from stdin when `stdin` is set.
fn read_content(content: Option<String>, stdin: bool) -> Result<Option<String>> {
    if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read content from stdin")?;
        return Ok(Some(buffer));
    }
    Ok(content)
}

pub async fn list(ctx: &AppContext, search: Option<String>) -> Result<()> {
    let mut store = open(ctx).await?;
    store.set_search(search.unwrap_or_default());

    let visible = store.visible_prompts();
    if visible.is_empty() {
        println!("No prompts match.");
    }
    for (index, prompt) in visible.into_iter().enumerate() {
        print_row(index, prompt);
    }
    close(store).await
}

/// Lists matches and counts the search towards ranking.
pub async fn search(ctx: &AppContext, query: String) -> Result<()> {
    let mut store = open(ctx).await?;
    store.set_search(query);

    for (index, prompt) in store.visible_prompts().into_iter().enumerate() {
        print_row(index, prompt);
    }
    let counted = store.record_current_search();
    tracing::debug!("Search counted for {} prompts", counted);
    close(store).await
}

pub async fn show(ctx: &AppContext, id: String) -> Result<()> {
    let store = open(ctx).await?;
    let id = resolve_id(store.prompts(), &id)?;
    if let Some(prompt) = store.get(&id) {
        println!("# {}\n", prompt.title);
        println!("{}", prompt.content);
    }
    close(store).await
}

pub async fn add(
    ctx: &AppContext,
    title: Option<String>,
    content: Option<String>,
    stdin: bool,
) -> Result<()> {
    let content = read_content(content, stdin)?;
    let mut store = open(ctx).await?;

    let id = store.add_prompt();
    if let Some(title) = title {
        store.update_title(&id, &title)?;
    }
    if let Some(content) = content {
        store.update_content(&id, &content)?;
    }

    println!("✓ Added {}", id);
    close(store).await
}

pub async fn edit(
    ctx: &AppContext,
    id: String,
    title: Option<String>,
    content: Option<String>,
    stdin: bool,
) -> Result<()> {
    let content = read_content(content, stdin)?;
    if title.is_none() && content.is_none() {
        bail!("Nothing to change: pass --title, --content or --stdin");
    }

    let mut store = open(ctx).await?;
    let id = resolve_id(store.prompts(), &id)?;
    if let Some(title) = title {
        store.start_title_edit(&id)?;
        store.set_title_draft(title);
        store.commit_title_edit()?;
    }
    if let Some(content) = content {
        store.update_content(&id, &content)?;
    }

    println!("✓ Updated {}", short_id(&id));
    close(store).await
}

pub async fn copy(ctx: &AppContext, id: String) -> Result<()> {
    let mut store = open(ctx).await?;
    let id = resolve_id(store.prompts(), &id)?;

    store.copy_prompt(&id, &SystemClipboard::new()).await?;
    if let Some(prompt) = store.get(&id) {
        println!("✓ Copied \"{}\" ({} copies)", prompt.title, prompt.copy_count);
    }
    close(store).await
}

pub async fn delete(ctx: &AppContext, id: String, yes: bool) -> Result<()> {
    let mut store = open(ctx).await?;
    let id = resolve_id(store.prompts(), &id)?;
    let title = store.get(&id).map(|p| p.title.clone()).unwrap_or_default();

    store.request_delete_confirm(&id)?;
    if !yes && !confirm(&format!("Delete \"{}\"?", title))? {
        store.clear_delete_confirm(&id);
        println!("Cancelled.");
        return close(store).await;
    }

    store.delete_prompt(&id)?;
    println!("✓ Deleted \"{}\"", title);
    close(store).await
}

fn confirm(question: &str) -> Result<bool> {
    print!("{} [y/N] ", question);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes"))
}

pub async fn move_prompt(ctx: &AppContext, from: usize, to: usize) -> Result<()> {
    let mut store = open(ctx).await?;
    store.move_prompt(from, to)?;
    for (index, prompt) in store.prompts().iter().enumerate() {
        print_row(index, prompt);
    }
    close(store).await
}

/// Prints the quick-access list with scores.
pub async fn top(ctx: &AppContext, limit: Option<usize>) -> Result<()> {
    // Preferences may have changed since startup.
    let preferences = ctx.preferences_repository.load().await?;
    let limit = limit.unwrap_or(preferences.top_prompt_limit);
    let store = open(ctx).await?;

    let now = chrono::Utc::now();
    let ranking = RankingService::new(preferences.ranking);
    for (index, prompt) in store
        .top_ranked_at(limit, &preferences.ranking, now)
        .into_iter()
        .enumerate()
    {
        println!(
            "{:>2}. {:<40} {:>7.2}  {}",
            index + 1,
            prompt.title,
            ranking.score(prompt, now),
            short_id(&prompt.id)
        );
    }
    close(store).await
}

/// Prints the prompts file, or the mirrored markdown file of one prompt.
pub async fn path(ctx: &AppContext, id: Option<String>, copy: bool) -> Result<()> {
    let path = match id {
        None => ctx.repository.prompts_file().to_path_buf(),
        Some(id) => {
            let mut store = open(ctx).await?;
            let id = resolve_id(store.prompts(), &id)?;
            // The mirror is written on save, so flush first.
            store.force_save().await?;
            close(store).await?;
            ctx.repository.prompt_file_path(&id).await?
        }
    };

    let text = path.to_string_lossy().to_string();
    if copy {
        SystemClipboard::new().write_text(&text).await?;
    }
    println!("{}", text);
    Ok(())
}

/// Editors that can be launched on a mirrored prompt file.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum Editor {
    Cursor,
    Vscode,
    Zed,
}

impl Editor {
    fn program(self) -> &'static str {
        match self {
            Editor::Cursor => "cursor",
            Editor::Vscode => "code",
            Editor::Zed => "zed",
        }
    }
}

/// Opens a prompt's markdown file in an editor.
///
/// Without `--editor` the `VISUAL` or `EDITOR` variable is used.
pub async fn open_in_editor(ctx: &AppContext, id: String, editor: Option<Editor>) -> Result<()> {
    let mut store = open(ctx).await?;
    let id = resolve_id(store.prompts(), &id)?;
    store.force_save().await?;
    close(store).await?;

    let file = ctx.repository.prompt_file_path(&id).await?;
    let program = match editor {
        Some(editor) => editor.program().to_string(),
        None => std::env::var("VISUAL")
            .or_else(|_| std::env::var("EDITOR"))
            .context("No --editor given and neither VISUAL nor EDITOR is set")?,
    };

    let status = Command::new(&program)
        .arg(&file)
        .status()
        .with_context(|| format!("Failed to launch {}", program))?;
    if !status.success() {
        bail!("{} exited with {}", program, status);
    }
    Ok(())
}
