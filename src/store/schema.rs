//! SQLite schema definition
//!
//! - conversations: one row per session, replaced wholesale on reindex
//! - messages: one row per message, ids unique across all sessions
//! - message_summaries_fts: FTS5 over message summaries, kept in lockstep
//!   with `messages` by triggers

pub const SCHEMA: &str = r#"
-- ============================================
-- CONVERSATIONS
-- ============================================

CREATE TABLE IF NOT EXISTS conversations (
    session_id TEXT PRIMARY KEY,
    project_path TEXT NOT NULL,
    conversation_file TEXT NOT NULL,
    root_message_id TEXT,
    leaf_message_id TEXT,                  -- from the summary header, if any
    summary TEXT NOT NULL,
    first_message_at TEXT,
    last_message_at TEXT,
    message_count INTEGER NOT NULL DEFAULT 0,
    indexed_at DATETIME
);

-- ============================================
-- MESSAGES
-- ============================================

CREATE TABLE IF NOT EXISTS messages (
    message_id TEXT PRIMARY KEY,
    session_id TEXT NOT NULL,
    parent_id TEXT,
    is_sidechain BOOLEAN NOT NULL DEFAULT FALSE,
    depth INTEGER NOT NULL DEFAULT 0,
    timestamp TEXT,
    role TEXT NOT NULL,                    -- 'user' | 'assistant'
    project_path TEXT NOT NULL,
    conversation_file TEXT NOT NULL,
    summary TEXT NOT NULL,
    full_content TEXT NOT NULL,
    is_summarized BOOLEAN NOT NULL DEFAULT FALSE,
    summary_method TEXT NOT NULL DEFAULT 'raw_truncated',
    FOREIGN KEY(session_id) REFERENCES conversations(session_id) ON DELETE CASCADE
);

-- ============================================
-- FULL-TEXT SEARCH (summaries only)
-- ============================================

CREATE VIRTUAL TABLE IF NOT EXISTS message_summaries_fts USING fts5(
    message_id UNINDEXED,
    summary,
    tokenize = 'unicode61'
);

CREATE TRIGGER IF NOT EXISTS messages_fts_insert AFTER INSERT ON messages BEGIN
    INSERT INTO message_summaries_fts(rowid, message_id, summary)
    VALUES (new.rowid, new.message_id, new.summary);
END;

CREATE TRIGGER IF NOT EXISTS messages_fts_delete AFTER DELETE ON messages BEGIN
    DELETE FROM message_summaries_fts WHERE rowid = old.rowid;
END;

CREATE TRIGGER IF NOT EXISTS messages_fts_update AFTER UPDATE OF summary ON messages BEGIN
    UPDATE message_summaries_fts SET summary = new.summary WHERE rowid = old.rowid;
END;

-- ============================================
-- INDEXES
-- ============================================

CREATE INDEX IF NOT EXISTS idx_conversations_last ON conversations(last_message_at DESC);
CREATE INDEX IF NOT EXISTS idx_conversations_project ON conversations(project_path);

CREATE INDEX IF NOT EXISTS idx_messages_session ON messages(session_id);
CREATE INDEX IF NOT EXISTS idx_messages_parent ON messages(parent_id);
CREATE INDEX IF NOT EXISTS idx_messages_timestamp ON messages(timestamp);
CREATE INDEX IF NOT EXISTS idx_messages_project ON messages(project_path);
CREATE INDEX IF NOT EXISTS idx_messages_unsummarized ON messages(session_id) WHERE is_summarized = FALSE;
"#;
