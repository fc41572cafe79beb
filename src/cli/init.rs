//! Init command implementation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::store::IndexStore;

use super::index;

pub fn run(config: &Config, days: u32, force: bool, summarize: bool) -> Result<()> {
    println!("Claude Finder - Initializing");
    println!("{}", "=".repeat(50));

    let db_path = config.database_path();
    if db_path.exists() {
        if !force {
            println!("✓ Database already exists: {}", db_path.display());
            println!("  Use --force to reinitialize");
            return Ok(());
        }
        remove_database(&db_path)?;
    }

    println!("Creating database: {}", db_path.display());
    let store = IndexStore::open(&db_path)
        .with_context(|| format!("could not create {}", db_path.display()))?;

    println!("\nIndexing conversations from last {} days...", days);
    let report = index::scan(&store, config, Some(days))?;
    index::print_report(&report);

    if summarize {
        index::summarize_sessions(&store, config, &report.sessions)?;
    }

    println!("\n✓ Initialization complete!");
    println!("\nNext steps:");
    println!("  • Search conversations: claude-finder search '<query>'");
    println!("  • List recent: claude-finder list");
    println!("  • Watch for updates: claude-finder watch");
    Ok(())
}

/// Delete the database together with its WAL side files
fn remove_database(db_path: &Path) -> Result<()> {
    let mut paths = vec![db_path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut side = db_path.as_os_str().to_owned();
        side.push(suffix);
        paths.push(PathBuf::from(side));
    }
    for path in paths {
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("could not remove {}", path.display()))?;
        }
    }
    Ok(())
}
