use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use claude_finder::cli::{context, index, init, list, search, stats, summarize, tree, watch};
use claude_finder::config::Config;
use claude_finder::store::IndexStore;

#[derive(Parser)]
#[command(name = "claude-finder")]
#[command(about = "Searchable, tree-aware index of Claude Code conversation logs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long, global = true, default_value = "claude-finder.yaml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database and index recent history
    Init {
        /// Days of history to index
        #[arg(long, default_value_t = 7)]
        days: u32,

        /// Recreate an existing database
        #[arg(long)]
        force: bool,

        /// Run AI summarization after indexing
        #[arg(long)]
        summarize: bool,
    },

    /// Index conversation files
    Index {
        /// Only files modified within this many days
        #[arg(long, default_value_t = 1, conflicts_with = "all")]
        days: u32,

        /// Index every conversation file
        #[arg(long)]
        all: bool,

        /// Run AI summarization after indexing
        #[arg(long)]
        summarize: bool,
    },

    /// Full-text search over message summaries
    Search {
        query: String,

        /// Limit to the last N days
        #[arg(long)]
        days: Option<u32>,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        /// Only messages from this project path
        #[arg(long)]
        project: Option<String>,

        /// Show message content instead of the summary
        #[arg(long)]
        content: bool,

        #[arg(long)]
        json: bool,
    },

    /// Show a message with its ancestors and replies
    Context {
        /// Message id
        id: String,

        /// How many ancestors to include
        #[arg(long, default_value_t = 3)]
        depth: usize,

        /// Include direct replies
        #[arg(long)]
        children: bool,

        #[arg(long)]
        json: bool,
    },

    /// Show the message tree of a session
    Tree {
        session_id: String,

        #[arg(long)]
        json: bool,
    },

    /// List recent conversations
    List {
        #[arg(long, default_value_t = 7)]
        days: u32,

        #[arg(long, default_value_t = 20)]
        limit: usize,

        #[arg(long)]
        project: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Generate AI summaries for messages that need them
    Summarize {
        /// Only this session
        #[arg(long)]
        session: Option<String>,
    },

    /// Watch for conversation changes and keep the index current
    Watch,

    /// Show index statistics
    Stats {
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    // logs go to stderr so stdout stays clean for results and --json
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("claude_finder=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Load config
    let config = Config::load(&cli.config).context("failed to load config")?;

    match cli.command {
        Commands::Init {
            days,
            force,
            summarize,
        } => init::run(&config, days, force, summarize),
        Commands::Index {
            days,
            all,
            summarize,
        } => index::run(&open_store(&config)?, &config, (!all).then_some(days), summarize),
        Commands::Search {
            query,
            days,
            limit,
            project,
            content,
            json,
        } => search::run(
            &open_existing_store(&config)?,
            &query,
            days,
            limit,
            project.as_deref(),
            content,
            json,
        ),
        Commands::Context {
            id,
            depth,
            children,
            json,
        } => context::run(&open_existing_store(&config)?, &id, depth, children, json),
        Commands::Tree { session_id, json } => tree::run(&open_existing_store(&config)?, &session_id, json),
        Commands::List {
            days,
            limit,
            project,
            json,
        } => list::run(&open_existing_store(&config)?, days, limit, project.as_deref(), json),
        Commands::Summarize { session } => {
            summarize::run(&open_existing_store(&config)?, &config, session.as_deref())
        }
        Commands::Watch => {
            let runtime = tokio::runtime::Builder::new_multi_thread()
                .enable_all()
                .build()
                .context("failed to start async runtime")?;
            runtime.block_on(watch::run(&config))?;
            Ok(())
        }
        Commands::Stats { json } => stats::run(&open_existing_store(&config)?, json),
    }
}

/// Read commands refuse to conjure an empty database
fn open_existing_store(config: &Config) -> Result<IndexStore> {
    let db_path = config.database_path();
    if !db_path.exists() {
        bail!(
            "Database not found at {}. Run `claude-finder init` first.",
            db_path.display()
        );
    }
    open_store(config)
}

fn open_store(config: &Config) -> Result<IndexStore> {
    let db_path = config.database_path();
    IndexStore::open(&db_path).with_context(|| format!("could not open {}", db_path.display()))
}
