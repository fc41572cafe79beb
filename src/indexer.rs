//! File-level indexing on top of the probe and the store

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::error::Result;
use crate::probe::ClaudeCodeProbe;
use crate::store::{IndexOutcome, IndexStore};
use crate::summarize::is_summarizer_conversation;

/// Aggregate result of indexing several files
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanReport {
    pub indexed: usize,
    pub messages: usize,
    /// Files with no messages and summarizer sessions
    pub skipped: usize,
    /// Sessions touched by this scan
    pub sessions: Vec<String>,
    pub failed: Vec<(PathBuf, String)>,
}

/// Parse one file and replace its session in the store.
///
/// Returns `None` when nothing was written: the file held no messages, or it
/// is a session created by the summarizer.
pub fn index_file(
    store: &IndexStore,
    probe: &ClaudeCodeProbe,
    path: &Path,
) -> Result<Option<IndexOutcome>> {
    let conversation = probe.parse(path)?;

    if is_summarizer_conversation(&conversation.messages) {
        debug!(file = %path.display(), "skipping summarizer session");
        return Ok(None);
    }

    let outcome = store.index_conversation(path, &conversation)?;
    Ok(outcome.session_id.is_some().then_some(outcome))
}

/// Index each file independently; a failure is recorded and the scan moves on
pub fn index_files<'p>(
    store: &IndexStore,
    probe: &ClaudeCodeProbe,
    paths: impl IntoIterator<Item = &'p Path>,
) -> ScanReport {
    let mut report = ScanReport::default();

    for path in paths {
        match index_file(store, probe, path) {
            Ok(Some(outcome)) => {
                report.indexed += 1;
                report.messages += outcome.messages;
                report.sessions.extend(outcome.session_id);
            }
            Ok(None) => report.skipped += 1,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to index file");
                report.failed.push((path.to_path_buf(), e.to_string()));
            }
        }
    }

    report
}
