//! Watch-debounce coordinator
//!
//! Filesystem events are funneled into a bounded channel. A drain task records
//! them in a shared [`PendingChanges`]; a timer loop starts a pass once the
//! pending set has been quiet for the idle threshold. Passes run one at a time
//! on a blocking worker that owns the store.

mod debounce;

pub use debounce::PendingChanges;

use notify::{Config as NotifyConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{SummarizerConfig, WatchConfig};
use crate::error::{FinderError, Result};
use crate::indexer;
use crate::probe::{is_session_log, ClaudeCodeProbe};
use crate::store::IndexStore;
use crate::summarize::{SummarizationGate, Summarizer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    Changed(PathBuf),
    Shutdown,
}

/// What one pass did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassOutcome {
    pub indexed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Files whose indexing failed in a way worth retrying
    pub retry: Vec<PathBuf>,
    pub summaries_updated: usize,
}

/// Work done for each pass. Runs on a blocking thread.
pub trait PassRunner: Send + 'static {
    fn run_pass(&mut self, files: &[PathBuf]) -> PassOutcome;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WatchStats {
    pub passes: usize,
    pub files_indexed: usize,
    pub files_skipped: usize,
    pub files_failed: usize,
    pub retries: usize,
    pub gave_up: usize,
    pub summaries_updated: usize,
}

/// Reindex changed files, then run the summarization gate over the sessions
/// they belong to
pub struct IndexPass {
    store: IndexStore,
    probe: ClaudeCodeProbe,
    summarizer: Option<Box<dyn Summarizer>>,
    batch_size: usize,
    max_content_chars: usize,
}

impl IndexPass {
    pub fn new(
        store: IndexStore,
        probe: ClaudeCodeProbe,
        summarizer: Option<Box<dyn Summarizer>>,
        config: &SummarizerConfig,
    ) -> Self {
        Self {
            store,
            probe,
            summarizer,
            batch_size: config.batch_size,
            max_content_chars: config.max_content_chars,
        }
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }
}

impl PassRunner for IndexPass {
    fn run_pass(&mut self, files: &[PathBuf]) -> PassOutcome {
        let mut outcome = PassOutcome::default();
        let mut sessions: Vec<String> = Vec::new();

        for path in files {
            match indexer::index_file(&self.store, &self.probe, path) {
                Ok(Some(indexed)) => {
                    outcome.indexed += 1;
                    sessions.extend(indexed.session_id);
                }
                Ok(None) => outcome.skipped += 1,
                Err(e) if e.is_transient() => {
                    warn!(file = %path.display(), error = %e, "indexing failed, will retry");
                    outcome.retry.push(path.clone());
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "indexing failed");
                    outcome.failed += 1;
                }
            }
        }

        if let Some(summarizer) = &self.summarizer {
            let gate = SummarizationGate::new(
                &self.store,
                summarizer.as_ref(),
                self.batch_size,
                self.max_content_chars,
            );
            for session in &sessions {
                match gate.run_session(session) {
                    Ok(report) => outcome.summaries_updated += report.updated,
                    Err(e) => warn!(session = %session, error = %e, "summarization failed"),
                }
            }
        }

        outcome
    }
}

/// Forward create/modify events for conversation files into `tx`.
///
/// Only files directly inside a project directory count, the same set
/// `ClaudeCodeProbe::discover` finds.
pub fn start_watcher(projects_dir: &Path, tx: mpsc::Sender<WatchEvent>) -> Result<RecommendedWatcher> {
    // some backends report canonical paths
    let root = projects_dir
        .canonicalize()
        .unwrap_or_else(|_| projects_dir.to_path_buf());
    let filter_root = root.clone();
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                if !matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_)) {
                    return;
                }
                for path in event.paths {
                    if is_session_log(&filter_root, &path) {
                        let _ = tx.blocking_send(WatchEvent::Changed(path));
                    }
                }
            }
            Err(e) => warn!(error = %e, "watch error"),
        },
        NotifyConfig::default(),
    )?;
    watcher.watch(&root, RecursiveMode::Recursive)?;
    info!(dir = %root.display(), "watching for conversation changes");
    Ok(watcher)
}

pub struct WatchCoordinator<R> {
    config: WatchConfig,
    runner: R,
}

impl<R: PassRunner> WatchCoordinator<R> {
    pub fn new(config: WatchConfig, runner: R) -> Self {
        Self { config, runner }
    }

    /// Run until a `Shutdown` event arrives or every sender is dropped.
    ///
    /// `catch_up` files are processed in one pass before any event is
    /// looked at.
    pub async fn run(
        self,
        catch_up: Vec<PathBuf>,
        events: mpsc::Receiver<WatchEvent>,
    ) -> Result<WatchStats> {
        let WatchCoordinator { config, mut runner } = self;
        let mut stats = WatchStats::default();
        let pending = Arc::new(Mutex::new(PendingChanges::new()));

        if !catch_up.is_empty() {
            info!(files = catch_up.len(), "catch-up pass");
            let files = catch_up.into_iter().map(|p| (p, 0)).collect();
            runner = run_pass(runner, files, &pending, &config, &mut stats).await?;
        }

        let mut drain = tokio::spawn(drain_events(events, Arc::clone(&pending)));
        let mut tick = time::interval(config.check_interval());
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            // a finished drain means shutdown: it wins over a due tick
            tokio::select! {
                biased;
                _ = &mut drain => break,
                _ = tick.tick() => {
                    if drain.is_finished() {
                        break;
                    }
                    let ready = lock(&pending).take_if_idle(Instant::now(), config.idle_threshold());
                    if let Some(files) = ready {
                        runner = run_pass(runner, files, &pending, &config, &mut stats).await?;
                    }
                }
            }
        }

        info!(passes = stats.passes, indexed = stats.files_indexed, "watch stopped");
        Ok(stats)
    }
}

async fn drain_events(mut events: mpsc::Receiver<WatchEvent>, pending: Arc<Mutex<PendingChanges>>) {
    while let Some(event) = events.recv().await {
        match event {
            WatchEvent::Changed(path) => {
                debug!(file = %path.display(), "change recorded");
                lock(&pending).record(path, Instant::now());
            }
            WatchEvent::Shutdown => {
                info!("shutdown requested");
                break;
            }
        }
    }
}

async fn run_pass<R: PassRunner>(
    mut runner: R,
    files: Vec<(PathBuf, u32)>,
    pending: &Mutex<PendingChanges>,
    config: &WatchConfig,
    stats: &mut WatchStats,
) -> Result<R> {
    let attempts: HashMap<PathBuf, u32> = files.iter().cloned().collect();
    let paths: Vec<PathBuf> = files.into_iter().map(|(p, _)| p).collect();
    info!(files = paths.len(), "starting pass");

    let (runner, outcome) = tokio::task::spawn_blocking(move || {
        let outcome = runner.run_pass(&paths);
        (runner, outcome)
    })
    .await
    .map_err(|e| FinderError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?;

    stats.passes += 1;
    stats.files_indexed += outcome.indexed;
    stats.files_skipped += outcome.skipped;
    stats.files_failed += outcome.failed;
    stats.summaries_updated += outcome.summaries_updated;

    let now = Instant::now();
    let mut queue = lock(pending);
    for path in outcome.retry {
        let next = attempts.get(&path).copied().unwrap_or(0) + 1;
        if next <= config.max_retries {
            stats.retries += 1;
            queue.requeue(path, next, now);
        } else {
            warn!(file = %path.display(), attempts = next, "giving up on file");
            stats.gave_up += 1;
        }
    }

    Ok(runner)
}

fn lock(pending: &Mutex<PendingChanges>) -> MutexGuard<'_, PendingChanges> {
    pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
