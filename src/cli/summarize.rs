//! Summarize command implementation

use anyhow::Result;

use crate::config::Config;
use crate::store::IndexStore;
use crate::summarize::{GateReport, SummarizationGate};

use super::build_summarizer;

/// Run the summarization gate for one session, or for every session that
/// still has unsummarized messages
pub fn run(store: &IndexStore, config: &Config, session: Option<&str>) -> Result<()> {
    let Some(summarizer) = build_summarizer(config) else {
        println!("Summarizer disabled in config (summarizer.enabled: false)");
        return Ok(());
    };
    let gate = SummarizationGate::new(
        store,
        summarizer.as_ref(),
        config.summarizer.batch_size,
        config.summarizer.max_content_chars,
    );

    let report = match session {
        Some(id) => {
            // surfaces NotFound for unknown sessions
            store.get_conversation(id)?;
            gate.run_session(id)?
        }
        None => gate.run_pending()?,
    };
    print_report(&report);
    Ok(())
}

pub(crate) fn print_report(report: &GateReport) {
    println!(
        "📝 Summaries: {} updated, {} queued in {} batches ({} failed)",
        report.updated, report.queued, report.batches, report.failed_batches
    );
    println!(
        "   Skipped: {} tool noise, {} too short, {} already summarized",
        report.tool_noise, report.too_short, report.already_done
    );
}
