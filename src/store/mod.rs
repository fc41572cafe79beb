//! Conversation index storage with SQLite
//!
//! Writes are whole-session replacements inside one transaction. Reads live
//! in [`query`].

mod query;
mod schema;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::error::{FinderError, Result};
use crate::probe::{format_timestamp, ParsedConversation, Role};
use crate::tree;

pub use query::{ContextView, ConversationRow, ConversationTree, MessageRow, SearchHit, StoreStats, TreeNode};
pub use schema::SCHEMA;

/// Conversation summary used when the log has no summary header
pub const UNTITLED_CONVERSATION: &str = "Untitled conversation";

/// Index-time summaries longer than this are cut to 147 chars plus `...`
pub const RAW_SUMMARY_MAX_CHARS: usize = 150;

/// How a message's summary was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMethod {
    TooShort,
    ToolNoise,
    AiGenerated,
    RawTruncated,
}

impl SummaryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            SummaryMethod::TooShort => "too_short",
            SummaryMethod::ToolNoise => "tool_noise",
            SummaryMethod::AiGenerated => "ai_generated",
            SummaryMethod::RawTruncated => "raw_truncated",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "too_short" => Some(SummaryMethod::TooShort),
            "tool_noise" => Some(SummaryMethod::ToolNoise),
            "ai_generated" => Some(SummaryMethod::AiGenerated),
            "raw_truncated" => Some(SummaryMethod::RawTruncated),
            _ => None,
        }
    }
}

impl ToSql for SummaryMethod {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SummaryMethod {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        SummaryMethod::parse(raw).ok_or(FromSqlError::InvalidType)
    }
}

impl ToSql for Role {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Role {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let raw = value.as_str()?;
        Role::parse(raw).ok_or(FromSqlError::InvalidType)
    }
}

/// An AI summary to apply to one message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryUpdate {
    #[serde(alias = "uuid")]
    pub id: String,
    pub summary: String,
}

/// Result of indexing one conversation file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexOutcome {
    /// `None` when the file had no messages and nothing was written
    pub session_id: Option<String>,
    pub messages: usize,
    /// The session existed before and was replaced
    pub replaced: bool,
    /// Messages whose parent id did not resolve and were indexed as roots
    pub orphaned: usize,
    /// AI summaries carried over from the previous rows of this session
    pub carried_summaries: usize,
}

pub struct IndexStore {
    conn: Connection,
}

impl IndexStore {
    pub fn open(path: &Path) -> Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.busy_timeout(Duration::from_secs(10))?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    // ============================================
    // WRITES
    // ============================================

    /// Replace everything stored for the conversation's session with its
    /// current contents.
    ///
    /// One transaction: readers see either the old rows or the new rows.
    pub fn index_conversation(
        &self,
        file: &Path,
        conversation: &ParsedConversation,
    ) -> Result<IndexOutcome> {
        let messages = &conversation.messages;
        if messages.is_empty() {
            debug!(file = %file.display(), "no messages, nothing to index");
            return Ok(IndexOutcome::default());
        }

        let session_id = conversation
            .session_id
            .clone()
            .ok_or_else(|| FinderError::MissingSession {
                file: file.to_path_buf(),
            })?;

        let depths = tree::compute_depths(messages);
        if !depths.orphaned.is_empty() {
            warn!(
                session = %session_id,
                orphaned = depths.orphaned.len(),
                "parent ids not found in session, indexed as roots"
            );
        }

        let project_path = conversation.project_path.clone().unwrap_or_default();
        let file_str = file.to_string_lossy().to_string();

        let root = messages
            .iter()
            .find(|m| m.parent_id.is_none())
            .unwrap_or(&messages[0]);
        let first_ts = messages.iter().filter_map(|m| m.timestamp).min();
        let last_ts = messages.iter().filter_map(|m| m.timestamp).max();
        let (summary, leaf_id) = match &conversation.header {
            Some(h) => (
                h.summary
                    .clone()
                    .unwrap_or_else(|| UNTITLED_CONVERSATION.to_string()),
                h.leaf_id.clone(),
            ),
            None => (UNTITLED_CONVERSATION.to_string(), None),
        };

        let tx = self.conn.unchecked_transaction()?;

        let previous = load_carryable_summaries(&tx, &session_id)?;

        tx.execute(
            "DELETE FROM messages WHERE session_id = ?",
            params![session_id],
        )?;
        let replaced = tx.execute(
            "DELETE FROM conversations WHERE session_id = ?",
            params![session_id],
        )? > 0;

        tx.execute(
            r#"INSERT INTO conversations
               (session_id, project_path, conversation_file, root_message_id, leaf_message_id,
                summary, first_message_at, last_message_at, message_count, indexed_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, datetime('now'))"#,
            params![
                session_id,
                project_path,
                file_str,
                root.id,
                leaf_id,
                summary,
                first_ts.as_ref().map(format_timestamp),
                last_ts.as_ref().map(format_timestamp),
                messages.len() as i64,
            ],
        )?;

        let mut carried = 0;
        {
            let mut stmt = tx.prepare(
                r#"INSERT INTO messages
                   (message_id, session_id, parent_id, is_sidechain, depth, timestamp, role,
                    project_path, conversation_file, summary, full_content, is_summarized,
                    summary_method)
                   VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
            )?;

            for msg in messages {
                let (summary, is_summarized, method) = match previous.get(&msg.id) {
                    Some(prev) if prev.content == msg.content => {
                        carried += 1;
                        (prev.summary.clone(), true, prev.method)
                    }
                    _ => (raw_summary(&msg.content), false, SummaryMethod::RawTruncated),
                };

                stmt.execute(params![
                    msg.id,
                    session_id,
                    msg.parent_id,
                    msg.is_sidechain,
                    depths.get(&msg.id).unwrap_or(0),
                    msg.timestamp.as_ref().map(format_timestamp),
                    msg.role,
                    project_path,
                    file_str,
                    summary,
                    msg.content,
                    is_summarized,
                    method,
                ])?;
            }
        }

        tx.commit()?;

        info!(
            session = %session_id,
            messages = messages.len(),
            replaced,
            "indexed conversation"
        );

        Ok(IndexOutcome {
            session_id: Some(session_id),
            messages: messages.len(),
            replaced,
            orphaned: depths.orphaned.len(),
            carried_summaries: carried,
        })
    }

    /// Apply AI summaries. Unknown ids and empty summaries are ignored.
    /// Returns the number of rows changed.
    pub fn update_summaries(&self, updates: &[SummaryUpdate]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut changed = 0;
        {
            let mut stmt = tx.prepare(
                r#"UPDATE messages
                   SET summary = ?, is_summarized = TRUE, summary_method = ?
                   WHERE message_id = ?"#,
            )?;
            for update in updates {
                let summary = update.summary.trim();
                if update.id.is_empty() || summary.is_empty() {
                    continue;
                }
                changed += stmt.execute(params![summary, SummaryMethod::AiGenerated, update.id])?;
            }
        }
        tx.commit()?;
        Ok(changed)
    }

    /// Mark messages as needing no AI summary, keeping their current summary text
    pub fn mark_summarized(&self, ids: &[String], method: SummaryMethod) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        let tx = self.conn.unchecked_transaction()?;
        let mut changed = 0;
        {
            let mut stmt = tx.prepare(
                "UPDATE messages SET is_summarized = TRUE, summary_method = ? WHERE message_id = ?",
            )?;
            for id in ids {
                changed += stmt.execute(params![method, id])?;
            }
        }
        tx.commit()?;
        Ok(changed)
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }
}

struct PreviousSummary {
    content: String,
    summary: String,
    method: SummaryMethod,
}

fn load_carryable_summaries(
    conn: &Connection,
    session_id: &str,
) -> Result<HashMap<String, PreviousSummary>> {
    let mut stmt = conn.prepare(
        r#"SELECT message_id, full_content, summary, summary_method
           FROM messages
           WHERE session_id = ? AND is_summarized = TRUE"#,
    )?;
    let rows = stmt.query_map(params![session_id], |row| {
        Ok((
            row.get::<_, String>(0)?,
            PreviousSummary {
                content: row.get(1)?,
                summary: row.get(2)?,
                method: row.get(3)?,
            },
        ))
    })?;
    rows.collect::<std::result::Result<HashMap<_, _>, _>>()
        .map_err(Into::into)
}

/// Index-time stand-in summary: the content itself, cut to 147 chars plus
/// `...` when longer than 150 chars
pub fn raw_summary(content: &str) -> String {
    if content.chars().count() > RAW_SUMMARY_MAX_CHARS {
        let head: String = content.chars().take(RAW_SUMMARY_MAX_CHARS - 3).collect();
        format!("{}...", head)
    } else {
        content.to_string()
    }
}
