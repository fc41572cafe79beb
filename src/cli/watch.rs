//! Watch command implementation

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::warn;

use crate::config::Config;
use crate::probe::ClaudeCodeProbe;
use crate::store::IndexStore;
use crate::watch::{start_watcher, IndexPass, WatchCoordinator, WatchEvent, WatchStats};

use super::build_summarizer;

pub async fn run(config: &Config) -> Result<WatchStats> {
    let probe = ClaudeCodeProbe::new(config.projects_dir());
    probe.require_available()?;

    let store = IndexStore::open(&config.database_path())
        .with_context(|| format!("could not open {}", config.database_path().display()))?;

    let catch_up: Vec<_> = probe
        .discover(Some(config.watch.catchup_window()))?
        .into_iter()
        .map(|s| s.source_path)
        .collect();

    let (tx, rx) = mpsc::channel(config.watch.channel_capacity);
    // dropping the watcher stops events, so it lives until run() returns
    let _watcher = start_watcher(probe.base_path(), tx.clone())?;

    let shutdown = tx;
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "could not listen for ctrl-c");
            return;
        }
        let _ = shutdown.send(WatchEvent::Shutdown).await;
    });

    println!(
        "👀 Watching {} (idle threshold {}s, Ctrl-C to stop)",
        probe.base_path().display(),
        config.watch.idle_threshold_secs
    );

    let runner = IndexPass::new(store, probe, build_summarizer(config), &config.summarizer);
    let stats = WatchCoordinator::new(config.watch.clone(), runner)
        .run(catch_up, rx)
        .await?;

    println!(
        "Stopped after {} passes: {} files indexed, {} failed, {} summaries",
        stats.passes, stats.files_indexed, stats.files_failed, stats.summaries_updated
    );
    Ok(stats)
}
