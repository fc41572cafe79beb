//! Conversation log discovery and normalization
//!
//! Claude Code writes one JSONL file per session under
//! `~/.claude/projects/<project_dir>/<session_id>.jsonl`. The first line may be a
//! `summary` header; every other line is a record, of which only `user` and
//! `assistant` records with a `uuid` become messages.

mod claudecode;

pub use claudecode::{is_conversation_file, is_session_log, parse_lines, ClaudeCodeProbe};

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Reference to a session's source location
#[derive(Debug, Clone)]
pub struct SessionRef {
    pub id: String,
    pub source_path: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// Conversation-level metadata from a leading `summary` line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationHeader {
    pub summary: Option<String>,
    pub leaf_id: Option<String>,
}

/// One normalized message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub id: String,
    pub parent_id: Option<String>,
    pub is_sidechain: bool,
    pub timestamp: Option<DateTime<Utc>>,
    pub role: Role,
    pub content: String,
}

/// Everything extracted from one log file
#[derive(Debug, Clone, Default)]
pub struct ParsedConversation {
    pub header: Option<ConversationHeader>,
    /// Taken from the first message record that carries one
    pub session_id: Option<String>,
    pub project_path: Option<String>,
    pub messages: Vec<MessageRecord>,
    /// Lines that failed to decode
    pub skipped_lines: usize,
}

/// Render a timestamp the way it is stored: UTC, millisecond precision, `Z`
/// suffix. Lexical order of these strings matches time order.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Parse an RFC 3339 timestamp into UTC
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_normalization() {
        let ts = parse_timestamp("2025-03-01T10:00:00+02:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2025-03-01T08:00:00.000Z");
        assert!(parse_timestamp("yesterday").is_none());
    }

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("assistant"), Some(Role::Assistant));
        assert_eq!(Role::parse("system"), None);
    }
}
