//! Summarization gate and summarizer backends
//!
//! The gate sorts messages into those that need no AI summary (tool noise,
//! too short, already summarized) and those that do, then sends the latter to
//! a [`Summarizer`] in batches. Summarizer failures are logged and cost only
//! the batch they hit.

mod claude;
mod gate;

pub use claude::ClaudeCliSummarizer;
pub use gate::{classify, is_placeholder_summary, is_summarizer_conversation, is_tool_noise, GateDecision};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{Result, SummarizerError};
use crate::probe::Role;
use crate::store::{IndexStore, MessageRow, SummaryMethod, SummaryUpdate};

/// One message as handed to a summarizer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRequest {
    pub id: String,
    pub role: Role,
    pub content: String,
}

/// Produces short summaries for a batch of messages.
///
/// May return summaries for only some of the requests; ids it does not know
/// are ignored by the caller.
pub trait Summarizer: Send {
    fn summarize(&self, requests: &[SummaryRequest]) -> std::result::Result<Vec<SummaryUpdate>, SummarizerError>;
}

/// Counts from one gate run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GateReport {
    pub tool_noise: usize,
    pub too_short: usize,
    pub already_done: usize,
    pub queued: usize,
    pub batches: usize,
    pub failed_batches: usize,
    pub updated: usize,
}

impl GateReport {
    pub fn merge(&mut self, other: &GateReport) {
        self.tool_noise += other.tool_noise;
        self.too_short += other.too_short;
        self.already_done += other.already_done;
        self.queued += other.queued;
        self.batches += other.batches;
        self.failed_batches += other.failed_batches;
        self.updated += other.updated;
    }
}

pub struct SummarizationGate<'a> {
    store: &'a IndexStore,
    summarizer: &'a dyn Summarizer,
    batch_size: usize,
    max_content_chars: usize,
}

impl<'a> SummarizationGate<'a> {
    pub fn new(
        store: &'a IndexStore,
        summarizer: &'a dyn Summarizer,
        batch_size: usize,
        max_content_chars: usize,
    ) -> Self {
        Self {
            store,
            summarizer,
            batch_size: batch_size.max(1),
            max_content_chars,
        }
    }

    /// Classify `rows`, record the no-summary decisions and summarize the rest
    pub fn run(&self, rows: &[MessageRow]) -> Result<GateReport> {
        let mut report = GateReport::default();
        let mut noise = Vec::new();
        let mut short = Vec::new();
        let mut needs: Vec<&MessageRow> = Vec::new();

        for row in rows {
            let existing = row.is_summarized.then_some(row.summary.as_str());
            match classify(row.role, &row.full_content, existing) {
                GateDecision::ToolNoise => {
                    report.tool_noise += 1;
                    if !row.is_summarized {
                        noise.push(row.id.clone());
                    }
                }
                GateDecision::TooShort => {
                    report.too_short += 1;
                    if !row.is_summarized {
                        short.push(row.id.clone());
                    }
                }
                GateDecision::AlreadyDone => report.already_done += 1,
                GateDecision::NeedsSummary => needs.push(row),
            }
        }

        self.store.mark_summarized(&noise, SummaryMethod::ToolNoise)?;
        self.store.mark_summarized(&short, SummaryMethod::TooShort)?;
        report.queued = needs.len();

        for batch in needs.chunks(self.batch_size) {
            report.batches += 1;
            let requests: Vec<SummaryRequest> = batch
                .iter()
                .map(|row| SummaryRequest {
                    id: row.id.clone(),
                    role: row.role,
                    content: row.full_content.chars().take(self.max_content_chars).collect(),
                })
                .collect();

            match self.summarizer.summarize(&requests) {
                Ok(updates) => {
                    let in_batch: Vec<SummaryUpdate> = updates
                        .into_iter()
                        .filter(|u| requests.iter().any(|r| r.id == u.id))
                        .collect();
                    if in_batch.is_empty() {
                        debug!(requested = requests.len(), "summarizer returned no usable summaries");
                        continue;
                    }
                    report.updated += self.store.update_summaries(&in_batch)?;
                }
                Err(e) => {
                    report.failed_batches += 1;
                    warn!(error = %e, messages = requests.len(), "summarizer batch failed");
                }
            }
        }

        Ok(report)
    }

    pub fn run_session(&self, session_id: &str) -> Result<GateReport> {
        let rows = self.store.session_messages(session_id)?;
        let report = self.run(&rows)?;
        info!(
            session = %session_id,
            queued = report.queued,
            updated = report.updated,
            failed_batches = report.failed_batches,
            "summarization gate finished"
        );
        Ok(report)
    }

    /// Run the gate over every session that still has unsummarized messages
    pub fn run_pending(&self) -> Result<GateReport> {
        let mut total = GateReport::default();
        for session_id in self.store.sessions_needing_summary()? {
            total.merge(&self.run_session(&session_id)?);
        }
        Ok(total)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::probe::parse_lines;
    use std::path::Path;
    use std::sync::Mutex;

    /// Summarizer returning canned answers and recording batch sizes
    pub(crate) struct FakeSummarizer {
        pub calls: Mutex<Vec<usize>>,
        pub fail: bool,
        /// Summarize only every n-th request
        pub every: usize,
    }

    impl FakeSummarizer {
        pub(crate) fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail: false,
                every: 1,
            }
        }

        pub(crate) fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new()
            }
        }

        pub(crate) fn calls(&self) -> Vec<usize> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Summarizer for FakeSummarizer {
        fn summarize(
            &self,
            requests: &[SummaryRequest],
        ) -> std::result::Result<Vec<SummaryUpdate>, SummarizerError> {
            self.calls.lock().unwrap().push(requests.len());
            if self.fail {
                return Err(SummarizerError::Timeout(60));
            }
            let mut out: Vec<SummaryUpdate> = requests
                .iter()
                .step_by(self.every)
                .map(|r| SummaryUpdate {
                    id: r.id.clone(),
                    summary: format!("Summary of {} with enough length", r.id),
                })
                .collect();
            out.push(SummaryUpdate {
                id: "not-in-batch".into(),
                summary: "Should never be applied anywhere".into(),
            });
            Ok(out)
        }
    }

    fn long_text(n: usize) -> String {
        format!("Message number {} asks for a thorough review of the storage layer design", n)
    }

    fn store_with(lines: &[String]) -> IndexStore {
        let store = IndexStore::open_in_memory().unwrap();
        store
            .index_conversation(
                Path::new("/tmp/gate.jsonl"),
                &parse_lines(lines.iter().map(String::as_str)),
            )
            .unwrap();
        store
    }

    fn line(id: &str, kind: &str, content: &str) -> String {
        serde_json::json!({
            "type": kind,
            "uuid": id,
            "sessionId": "g",
            "timestamp": "2025-01-01T00:00:00Z",
            "message": {"role": kind, "content": content},
        })
        .to_string()
    }

    fn mixed_session() -> IndexStore {
        store_with(&[
            line("noise", "assistant", "[Tool: Read]"),
            line("short", "user", "ok thanks"),
            line("l1", "user", &long_text(1)),
            line("l2", "assistant", &long_text(2)),
            line("l3", "user", &long_text(3)),
        ])
    }

    #[test]
    fn test_gate_applies_decisions() {
        let store = mixed_session();
        let fake = FakeSummarizer::new();
        let gate = SummarizationGate::new(&store, &fake, 2, 2000);
        let report = gate.run_session("g").unwrap();

        assert_eq!(report.tool_noise, 1);
        assert_eq!(report.too_short, 1);
        assert_eq!(report.queued, 3);
        assert_eq!(report.batches, 2);
        assert_eq!(report.updated, 3);
        assert_eq!(fake.calls(), vec![2, 1]);

        let noise = store.get_message("noise").unwrap();
        assert!(noise.is_summarized);
        assert_eq!(noise.summary_method, SummaryMethod::ToolNoise);
        assert_eq!(store.get_message("short").unwrap().summary_method, SummaryMethod::TooShort);
        let l1 = store.get_message("l1").unwrap();
        assert_eq!(l1.summary_method, SummaryMethod::AiGenerated);
        assert_eq!(l1.summary, "Summary of l1 with enough length");
        assert!(store.get_message("not-in-batch").is_err());

        let stats = store.stats().unwrap();
        assert_eq!(stats.messages, stats.fts_rows);
    }

    #[test]
    fn test_second_run_is_already_done() {
        let store = mixed_session();
        let fake = FakeSummarizer::new();
        let gate = SummarizationGate::new(&store, &fake, 20, 2000);
        gate.run_session("g").unwrap();

        let again = gate.run_session("g").unwrap();
        assert_eq!(again.already_done, 3);
        assert_eq!(again.queued, 0);
        assert_eq!(fake.calls().len(), 1);
        assert!(gate.run_pending().unwrap().queued == 0);
    }

    #[test]
    fn test_partial_results() {
        let store = mixed_session();
        let fake = FakeSummarizer {
            every: 2,
            ..FakeSummarizer::new()
        };
        let gate = SummarizationGate::new(&store, &fake, 20, 2000);
        let report = gate.run_session("g").unwrap();
        assert_eq!(report.updated, 2);

        assert!(store.get_message("l1").unwrap().is_summarized);
        let l2 = store.get_message("l2").unwrap();
        assert!(!l2.is_summarized);
        assert_eq!(l2.summary_method, SummaryMethod::RawTruncated);
        assert!(store.get_message("l3").unwrap().is_summarized);
    }

    #[test]
    fn test_failing_summarizer_leaves_rows_untouched() {
        let store = mixed_session();
        let before = store.get_message("l1").unwrap();
        let fake = FakeSummarizer::failing();
        let gate = SummarizationGate::new(&store, &fake, 2, 2000);
        let report = gate.run_session("g").unwrap();

        assert_eq!(report.batches, 2);
        assert_eq!(report.failed_batches, 2);
        assert_eq!(report.updated, 0);
        // one call per batch, no retries
        assert_eq!(fake.calls(), vec![2, 1]);

        let after = store.get_message("l1").unwrap();
        assert_eq!(after.summary, before.summary);
        assert!(!after.is_summarized);
    }

    #[test]
    fn test_content_is_truncated_for_requests() {
        struct Capture(Mutex<Vec<usize>>);
        impl Summarizer for Capture {
            fn summarize(
                &self,
                requests: &[SummaryRequest],
            ) -> std::result::Result<Vec<SummaryUpdate>, SummarizerError> {
                let mut seen = self.0.lock().unwrap();
                seen.extend(requests.iter().map(|r| r.content.chars().count()));
                Ok(Vec::new())
            }
        }

        let store = store_with(&[line("big", "user", &"z".repeat(5000))]);
        let capture = Capture(Mutex::new(Vec::new()));
        let report = SummarizationGate::new(&store, &capture, 20, 2000)
            .run_session("g")
            .unwrap();
        assert_eq!(*capture.0.lock().unwrap(), vec![2000]);
        assert_eq!(report.updated, 0);
        assert_eq!(report.failed_batches, 0);
    }
}
