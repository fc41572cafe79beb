//! Index command implementation

use anyhow::{Context, Result};

use crate::config::Config;
use crate::indexer::{self, ScanReport};
use crate::probe::ClaudeCodeProbe;
use crate::store::IndexStore;
use crate::summarize::{GateReport, SummarizationGate};

use super::{build_summarizer, days_to_age};

/// Index conversation files modified within `days` (all files when `None`)
pub fn run(store: &IndexStore, config: &Config, days: Option<u32>, summarize: bool) -> Result<()> {
    let report = scan(store, config, days)?;
    print_report(&report);

    if summarize {
        summarize_sessions(store, config, &report.sessions)?;
    }
    Ok(())
}

pub(crate) fn scan(store: &IndexStore, config: &Config, days: Option<u32>) -> Result<ScanReport> {
    let probe = ClaudeCodeProbe::new(config.projects_dir());
    let sessions = probe
        .discover(days.map(days_to_age))
        .context("could not list conversation files")?;

    if sessions.is_empty() {
        println!("No conversations to index");
        return Ok(ScanReport::default());
    }

    println!("Indexing {} conversation files...", sessions.len());
    let paths = sessions.iter().map(|s| s.source_path.as_path());
    Ok(indexer::index_files(store, &probe, paths))
}

pub(crate) fn print_report(report: &ScanReport) {
    if report.indexed + report.skipped + report.failed.len() == 0 {
        return;
    }
    println!(
        "✅ Indexed {} conversations ({} messages), {} skipped, {} failed",
        report.indexed,
        report.messages,
        report.skipped,
        report.failed.len()
    );
    for (path, error) in &report.failed {
        println!("   ✗ {}: {}", path.display(), error);
    }
}

pub(crate) fn summarize_sessions(store: &IndexStore, config: &Config, sessions: &[String]) -> Result<()> {
    let Some(summarizer) = build_summarizer(config) else {
        println!("Summarizer disabled in config, skipping summaries");
        return Ok(());
    };
    let gate = SummarizationGate::new(
        store,
        summarizer.as_ref(),
        config.summarizer.batch_size,
        config.summarizer.max_content_chars,
    );

    let mut total = GateReport::default();
    for session in sessions {
        total.merge(&gate.run_session(session)?);
    }
    super::summarize::print_report(&total);
    Ok(())
}
