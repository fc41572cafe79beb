//! Per-message decision on whether an AI summary is worth asking for

use serde::Serialize;

use crate::probe::{MessageRecord, Role};

/// Markers left in content by tool calls that carry no prose of their own
const TOOL_MARKERS: [&str; 5] = [
    "[Tool: Read]",
    "[Tool: Glob]",
    "[Tool: LS]",
    "[Tool: Grep]",
    "[Tool result]",
];

/// Assistant acknowledgements that only announce a tool call
const FILLER_PHRASES: [&str; 6] = [
    "let me read",
    "let me check",
    "let me search",
    "i'll look at",
    "looking at",
    "checking",
];

/// Phrases from the summarizer's own prompt. A short session opening with one
/// of these was created by a summarizer call.
const SUMMARIZER_PROMPT_MARKERS: [&str; 8] = [
    "summarize this",
    "create a 1-2 sentence summary",
    "generate concise summaries",
    "max 150 characters",
    "for each message",
    "json output:",
    "brief summary here",
    "messages to summarize:",
];

const MIN_CONTENT_CHARS: usize = 50;
const MAX_TEXT_AFTER_MARKER: usize = 100;
const MAX_FILLER_CHARS: usize = 150;
const MIN_SUMMARY_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateDecision {
    ToolNoise,
    TooShort,
    AlreadyDone,
    NeedsSummary,
}

/// Classify one message. `existing_summary` is the stored summary of a row
/// already marked summarized; index-time stand-ins are passed as `None`.
pub fn classify(role: Role, content: &str, existing_summary: Option<&str>) -> GateDecision {
    if is_tool_noise(role, content) {
        return GateDecision::ToolNoise;
    }
    if content.chars().count() < MIN_CONTENT_CHARS {
        return GateDecision::TooShort;
    }
    match existing_summary {
        Some(summary) if !is_placeholder_summary(summary, content) => GateDecision::AlreadyDone,
        _ => GateDecision::NeedsSummary,
    }
}

pub fn is_tool_noise(role: Role, content: &str) -> bool {
    let trimmed = content.trim();
    if trimmed.is_empty()
        || trimmed.starts_with("[Tool")
        || content.contains("[Request interrupted")
    {
        return true;
    }

    for marker in TOOL_MARKERS {
        if let Some(pos) = content.find(marker) {
            let after = content[pos + marker.len()..].trim();
            return after.chars().count() <= MAX_TEXT_AFTER_MARKER;
        }
    }

    if role == Role::Assistant && content.chars().count() < MAX_FILLER_CHARS {
        let lower = content.to_lowercase();
        return FILLER_PHRASES.iter().any(|p| lower.contains(p));
    }

    false
}

/// True when `summary` looks mechanically cut from `content` rather than written
pub fn is_placeholder_summary(summary: &str, content: &str) -> bool {
    if summary.ends_with("...") || summary.ends_with('\u{2026}') {
        return true;
    }
    if summary.starts_with("[Tool") {
        return true;
    }
    let len = summary.chars().count();
    if len < MIN_SUMMARY_CHARS {
        return true;
    }
    (145..=150).contains(&len) && content.starts_with(summary.trim_end_matches(['.', '\u{2026}']))
}

/// Sessions produced by the summarizer itself: 2 to 10 messages, the first
/// user message quoting the summarization prompt
pub fn is_summarizer_conversation(messages: &[MessageRecord]) -> bool {
    if !(2..=10).contains(&messages.len()) {
        return false;
    }
    let Some(first_user) = messages.iter().find(|m| m.role == Role::User) else {
        return false;
    };
    let lower = first_user.content.to_lowercase();
    SUMMARIZER_PROMPT_MARKERS.iter().any(|m| lower.contains(m))
}
