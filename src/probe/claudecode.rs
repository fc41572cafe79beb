//! Claude Code probe implementation
//!
//! Extracts conversation history from Claude Code CLI sessions.
//! Data format: JSONL files in ~/.claude/projects/<project_hash>/<session_id>.jsonl

use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};
use walkdir::WalkDir;

use super::{parse_timestamp, ConversationHeader, MessageRecord, ParsedConversation, Role, SessionRef};
use crate::error::{FinderError, Result};

pub struct ClaudeCodeProbe {
    base_path: PathBuf,
}

// Raw line shapes. Everything is optional: a record that lacks what a
// message needs is dropped, not rejected.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRecord {
    #[serde(rename = "type")]
    kind: Option<String>,
    uuid: Option<String>,
    parent_uuid: Option<String>,
    #[serde(default)]
    is_sidechain: Option<bool>,
    session_id: Option<String>,
    timestamp: Option<String>,
    cwd: Option<String>,
    message: Option<RawMessage>,
    // summary header fields
    summary: Option<String>,
    leaf_uuid: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMessage {
    role: Option<String>,
    #[serde(default)]
    content: MessageContent,
}

/// `message.content` is either plain text or an array of typed blocks
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl Default for MessageContent {
    fn default() -> Self {
        MessageContent::Text(String::new())
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        #[serde(default)]
        text: String,
    },
    ToolUse {
        #[serde(default = "unknown_tool")]
        name: String,
    },
    ToolResult {},
    Thinking {},
    #[serde(other)]
    Unknown,
}

fn unknown_tool() -> String {
    "unknown".to_string()
}

impl MessageContent {
    fn normalize(self) -> String {
        match self {
            MessageContent::Text(text) => text,
            MessageContent::Blocks(blocks) => blocks
                .into_iter()
                .filter_map(|block| match block {
                    ContentBlock::Text { text } => Some(text),
                    ContentBlock::ToolUse { name } => Some(format!("[Tool: {}]", name)),
                    ContentBlock::ToolResult {} => Some("[Tool result]".to_string()),
                    ContentBlock::Thinking {} | ContentBlock::Unknown => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}

impl ClaudeCodeProbe {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn is_available(&self) -> bool {
        self.base_path.is_dir()
    }

    /// Fail unless the projects directory exists
    pub fn require_available(&self) -> Result<()> {
        if self.is_available() {
            Ok(())
        } else {
            Err(FinderError::MissingDirectory {
                path: self.base_path.clone(),
            })
        }
    }

    /// Discover conversation files, newest first.
    ///
    /// `max_age` keeps only files modified within that window.
    pub fn discover(&self, max_age: Option<Duration>) -> Result<Vec<SessionRef>> {
        self.require_available()?;

        let cutoff = max_age.and_then(|age| SystemTime::now().checked_sub(age));
        let mut found: Vec<(SystemTime, SessionRef)> = vec![];

        for entry in WalkDir::new(&self.base_path)
            .min_depth(2)
            .max_depth(2)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !entry.file_type().is_file() || !is_conversation_file(path) {
                continue;
            }

            let modified = match entry.metadata().ok().and_then(|m| m.modified().ok()) {
                Some(m) => m,
                None => continue,
            };
            if let Some(cutoff) = cutoff {
                if modified < cutoff {
                    continue;
                }
            }

            let session_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("unknown")
                .to_string();

            found.push((
                modified,
                SessionRef {
                    id: session_id,
                    source_path: path.to_path_buf(),
                },
            ));
        }

        found.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(found.into_iter().map(|(_, s)| s).collect())
    }

    /// Read and normalize one conversation file
    pub fn parse(&self, path: &Path) -> Result<ParsedConversation> {
        parse_file(path)
    }
}

/// `*.jsonl` files that are not auxiliary agent logs
pub fn is_conversation_file(path: &Path) -> bool {
    let is_jsonl = path.extension().map(|e| e == "jsonl").unwrap_or(false);
    let is_agent = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.starts_with("agent-"))
        .unwrap_or(false);
    is_jsonl && !is_agent
}

/// A conversation file sitting directly inside a project directory, the
/// only depth `discover` walks
pub fn is_session_log(projects_dir: &Path, path: &Path) -> bool {
    is_conversation_file(path) && path.parent().and_then(Path::parent) == Some(projects_dir)
}

fn parse_file(path: &Path) -> Result<ParsedConversation> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut lines = vec![];
    let mut invalid = 0;
    for line in reader.lines() {
        match line {
            Ok(line) => lines.push(line),
            // keeps line numbering so a later summary record is not taken as the header
            Err(e) if e.kind() == std::io::ErrorKind::InvalidData => {
                invalid += 1;
                lines.push(String::new());
            }
            Err(e) => return Err(e.into()),
        }
    }

    let mut parsed = parse_lines(lines.iter().map(String::as_str));
    parsed.skipped_lines += invalid;
    if parsed.skipped_lines > 0 {
        debug!(file = %path.display(), skipped = parsed.skipped_lines, "skipped undecodable lines");
    }

    if parsed.project_path.is_none() {
        parsed.project_path = project_path_from_dir(path);
    }

    Ok(parsed)
}

/// Claude Code names project directories after the cwd with `/` replaced by `-`
fn project_path_from_dir(path: &Path) -> Option<String> {
    path.parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .map(|n| n.replace('-', "/"))
}

/// Normalize the lines of one log file
pub fn parse_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> ParsedConversation {
    let mut parsed = ParsedConversation::default();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for (index, line) in lines.into_iter().enumerate() {
        if line.trim().is_empty() {
            continue;
        }

        let record: RawRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                debug!(line = index + 1, error = %e, "undecodable line");
                parsed.skipped_lines += 1;
                continue;
            }
        };

        // Only the first line may carry conversation metadata
        if record.kind.as_deref() == Some("summary") {
            if index == 0 {
                parsed.header = Some(ConversationHeader {
                    summary: record.summary,
                    leaf_id: record.leaf_uuid,
                });
            }
            continue;
        }

        if parsed.project_path.is_none() {
            parsed.project_path = record.cwd.clone();
        }

        let Some(id) = record.uuid else {
            continue;
        };
        let Some(message) = record.message else {
            continue;
        };
        let role = record
            .kind
            .as_deref()
            .and_then(Role::parse)
            .or_else(|| message.role.as_deref().and_then(Role::parse));
        let Some(role) = role else {
            continue;
        };

        if !seen_ids.insert(id.clone()) {
            warn!(message_id = %id, "duplicate message id, keeping first occurrence");
            continue;
        }

        if parsed.session_id.is_none() {
            parsed.session_id = record.session_id;
        }

        parsed.messages.push(MessageRecord {
            id,
            parent_id: record.parent_uuid.filter(|p| !p.is_empty()),
            is_sidechain: record.is_sidechain.unwrap_or(false),
            timestamp: record.timestamp.as_deref().and_then(parse_timestamp),
            role,
            content: message.content.normalize(),
        });
    }

    parsed
}
