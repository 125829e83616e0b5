use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod context;
mod logging;

use commands::prompts::Editor;
use context::AppContext;

#[derive(Parser)]
#[command(name = "promptbook")]
#[command(about = "PromptBook - a local prompt library with usage-ranked quick access", long_about = None)]
struct Cli {
    /// Store all files under this directory instead of the platform config dir
    #[arg(long, global = true, env = "PROMPTBOOK_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Print log output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List prompts in library order
    List {
        /// Only show prompts containing this text
        #[arg(short, long)]
        search: Option<String>,
    },
    /// Search prompts and count the hits towards ranking
    Search { query: String },
    /// Print one prompt
    Show { id: String },
    /// Add a prompt
    Add {
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "stdin")]
        content: Option<String>,
        /// Read the content from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Change the title or content of a prompt
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long, conflicts_with = "stdin")]
        content: Option<String>,
        /// Read the content from stdin
        #[arg(long)]
        stdin: bool,
    },
    /// Copy a prompt to the clipboard
    Copy { id: String },
    /// Delete a prompt
    Delete {
        id: String,
        /// Skip the confirmation question
        #[arg(short, long)]
        yes: bool,
    },
    /// Move the prompt at one position to another (manual ordering only)
    Move { from: usize, to: usize },
    /// Show the most used prompts
    Top {
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Reload whenever another instance changes the library
    Watch,
    /// Print the prompts file, or the markdown file of one prompt
    Path {
        id: Option<String>,
        /// Also copy the path to the clipboard
        #[arg(long)]
        copy: bool,
    },
    /// Open the markdown file of a prompt in an editor
    Open {
        id: String,
        #[arg(short, long, value_enum)]
        editor: Option<Editor>,
    },
    /// View or change preferences
    Prefs {
        #[command(subcommand)]
        action: PrefsAction,
    },
}

#[derive(Subcommand)]
enum PrefsAction {
    /// Print the current preferences
    Show,
    /// Set one preference, e.g. `prefs set copy-weight 0.8`
    Set { key: String, value: String },
    /// Restore the defaults
    Reset,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let ctx = AppContext::init(cli.data_dir).await?;
    let logs_dir = ctx.paths.logs_dir().ok();
    let _log_guard = logging::init(&ctx.preferences.log_level, cli.verbose, logs_dir.as_deref());
    tracing::debug!("Starting as {}", ctx.source);

    match cli.command {
        Commands::List { search } => commands::prompts::list(&ctx, search).await?,
        Commands::Search { query } => commands::prompts::search(&ctx, query).await?,
        Commands::Show { id } => commands::prompts::show(&ctx, id).await?,
        Commands::Add {
            title,
            content,
            stdin,
        } => commands::prompts::add(&ctx, title, content, stdin).await?,
        Commands::Edit {
            id,
            title,
            content,
            stdin,
        } => commands::prompts::edit(&ctx, id, title, content, stdin).await?,
        Commands::Copy { id } => commands::prompts::copy(&ctx, id).await?,
        Commands::Delete { id, yes } => commands::prompts::delete(&ctx, id, yes).await?,
        Commands::Move { from, to } => commands::prompts::move_prompt(&ctx, from, to).await?,
        Commands::Top { limit } => commands::prompts::top(&ctx, limit).await?,
        Commands::Watch => commands::watch::run(&ctx).await?,
        Commands::Path { id, copy } => commands::prompts::path(&ctx, id, copy).await?,
        Commands::Open { id, editor } => commands::prompts::open_in_editor(&ctx, id, editor).await?,
        Commands::Prefs { action } => match action {
            PrefsAction::Show => commands::prefs::show(&ctx).await?,
            PrefsAction::Set { key, value } => commands::prefs::set(&ctx, key, value).await?,
            PrefsAction::Reset => commands::prefs::reset(&ctx).await?,
        },
    }

    Ok(())
}
