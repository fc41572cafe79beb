//! Read-only queries over the index

use chrono::Utc;
use rusqlite::types::ToSql;
use rusqlite::{params, Row};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap, VecDeque};

use super::{IndexStore, SummaryMethod};
use crate::error::{FinderError, Result};
use crate::probe::{format_timestamp, Role};

const MESSAGE_COLUMNS: &str = "m.message_id, m.session_id, m.parent_id, m.is_sidechain, m.depth, \
     m.timestamp, m.role, m.project_path, m.conversation_file, m.summary, m.full_content, \
     m.is_summarized, m.summary_method";

const CONVERSATION_COLUMNS: &str = "c.session_id, c.project_path, c.conversation_file, \
     c.root_message_id, c.leaf_message_id, c.summary, c.first_message_at, c.last_message_at, \
     c.message_count, c.indexed_at";

/// Message row as stored
#[derive(Debug, Clone, Serialize)]
pub struct MessageRow {
    pub id: String,
    pub session_id: String,
    pub parent_id: Option<String>,
    pub is_sidechain: bool,
    pub depth: u32,
    pub timestamp: Option<String>,
    pub role: Role,
    pub project_path: String,
    pub conversation_file: String,
    pub summary: String,
    pub full_content: String,
    pub is_summarized: bool,
    pub summary_method: SummaryMethod,
}

/// Conversation row as stored
#[derive(Debug, Clone, Serialize)]
pub struct ConversationRow {
    pub session_id: String,
    pub project_path: String,
    pub conversation_file: String,
    pub root_message_id: Option<String>,
    pub leaf_message_id: Option<String>,
    pub summary: String,
    pub first_message_at: Option<String>,
    pub last_message_at: Option<String>,
    pub message_count: i64,
    pub indexed_at: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    #[serde(flatten)]
    pub message: MessageRow,
    pub conversation_summary: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContextView {
    pub message: MessageRow,
    /// Root-first
    pub ancestors: Vec<MessageRow>,
    /// Direct children, oldest first
    pub children: Vec<MessageRow>,
    pub conversation: ConversationRow,
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub message: MessageRow,
    pub children: Vec<TreeNode>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ConversationTree {
    pub conversation: ConversationRow,
    pub roots: Vec<TreeNode>,
    pub total_messages: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StoreStats {
    pub conversations: i64,
    pub messages: i64,
    pub fts_rows: i64,
    pub summarized: i64,
    pub by_method: BTreeMap<String, i64>,
}

fn message_from_row(row: &Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        session_id: row.get(1)?,
        parent_id: row.get(2)?,
        is_sidechain: row.get(3)?,
        depth: row.get(4)?,
        timestamp: row.get(5)?,
        role: row.get(6)?,
        project_path: row.get(7)?,
        conversation_file: row.get(8)?,
        summary: row.get(9)?,
        full_content: row.get(10)?,
        is_summarized: row.get(11)?,
        summary_method: row.get(12)?,
    })
}

fn conversation_from_row(row: &Row<'_>) -> rusqlite::Result<ConversationRow> {
    Ok(ConversationRow {
        session_id: row.get(0)?,
        project_path: row.get(1)?,
        conversation_file: row.get(2)?,
        root_message_id: row.get(3)?,
        leaf_message_id: row.get(4)?,
        summary: row.get(5)?,
        first_message_at: row.get(6)?,
        last_message_at: row.get(7)?,
        message_count: row.get(8)?,
        indexed_at: row.get(9)?,
    })
}

/// Turn free text into an FTS5 query: every word becomes a quoted prefix
/// term, and FTS5 ANDs adjacent terms. Words with no letters or digits are
/// dropped since they cannot match a token.
pub(crate) fn fts_query(query: &str) -> Option<String> {
    let terms: Vec<String> = query
        .split_whitespace()
        .filter(|t| t.chars().any(char::is_alphanumeric))
        .map(|t| format!("\"{}\"*", t.replace('"', "\"\"")))
        .collect();
    if terms.is_empty() {
        None
    } else {
        Some(terms.join(" "))
    }
}

/// Oldest timestamp still inside the window. Zero days means no cutoff.
fn cutoff(days_back: Option<u32>) -> Option<String> {
    days_back
        .filter(|d| *d > 0)
        .map(|d| format_timestamp(&(Utc::now() - chrono::Duration::days(i64::from(d)))))
}

impl IndexStore {
    // ============================================
    // SEARCH
    // ============================================

    pub fn search(
        &self,
        query: &str,
        days_back: Option<u32>,
        limit: usize,
        project: Option<&str>,
    ) -> Result<Vec<SearchHit>> {
        let Some(fts) = fts_query(query) else {
            return Ok(Vec::new());
        };

        let mut sql = format!(
            r#"SELECT {MESSAGE_COLUMNS}, c.summary
               FROM messages m
               JOIN conversations c ON c.session_id = m.session_id
               WHERE m.rowid IN (
                   SELECT rowid FROM message_summaries_fts WHERE summary MATCH ?
               )"#
        );
        let mut args: Vec<Box<dyn ToSql>> = vec![Box::new(fts)];

        if let Some(since) = cutoff(days_back) {
            sql.push_str(" AND m.timestamp >= ?");
            args.push(Box::new(since));
        }
        if let Some(p) = project {
            sql.push_str(" AND m.project_path = ?");
            args.push(Box::new(p.to_string()));
        }
        sql.push_str(" ORDER BY m.timestamp DESC LIMIT ?");
        args.push(Box::new(limit as i64));

        let refs: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let mut stmt = self.conn().prepare(&sql)?;
        let hits = stmt
            .query_map(refs.as_slice(), |row| {
                Ok(SearchHit {
                    message: message_from_row(row)?,
                    conversation_summary: row.get(13)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(hits)
    }

    // ============================================
    // LOOKUPS
    // ============================================

    pub fn get_message(&self, id: &str) -> Result<MessageRow> {
        let sql = format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.message_id = ?");
        match self.conn().query_row(&sql, params![id], message_from_row) {
            Ok(row) => Ok(row),
            Err(rusqlite::Error::QueryReturnedNoRows) => Err(FinderError::not_found("message", id)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn get_conversation(&self, session_id: &str) -> Result<ConversationRow> {
        let sql = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations c WHERE c.session_id = ?");
        match self
            .conn()
            .query_row(&sql, params![session_id], conversation_from_row)
        {
            Ok(row) => Ok(row),
            Err(rusqlite::Error::QueryReturnedNoRows) => {
                Err(FinderError::not_found("conversation", session_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All messages of a session, oldest first
    pub fn session_messages(&self, session_id: &str) -> Result<Vec<MessageRow>> {
        let sql = format!(
            "SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.session_id = ? ORDER BY m.timestamp, m.rowid"
        );
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(params![session_id], message_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Sessions that still hold messages not yet through the summarization gate
    pub fn sessions_needing_summary(&self) -> Result<Vec<String>> {
        let mut stmt = self.conn().prepare(
            r#"SELECT DISTINCT m.session_id
               FROM messages m
               JOIN conversations c ON c.session_id = m.session_id
               WHERE m.is_summarized = FALSE
               ORDER BY c.last_message_at DESC"#,
        )?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(ids)
    }

    // ============================================
    // CONTEXT & TREE
    // ============================================

    /// A message with up to `depth` ancestors and, optionally, its children
    pub fn get_context(&self, id: &str, depth: usize, include_children: bool) -> Result<ContextView> {
        let message = self.get_message(id)?;
        let conversation = self.get_conversation(&message.session_id)?;

        let mut ancestors = Vec::new();
        let mut next = message.parent_id.clone();
        while ancestors.len() < depth {
            let Some(parent_id) = next.take() else { break };
            // a chain pointing at itself would otherwise loop until depth runs out
            if parent_id == message.id || ancestors.iter().any(|a: &MessageRow| a.id == parent_id) {
                break;
            }
            match self.get_message(&parent_id) {
                Ok(parent) => {
                    next = parent.parent_id.clone();
                    ancestors.push(parent);
                }
                Err(FinderError::NotFound { .. }) => break,
                Err(e) => return Err(e),
            }
        }
        ancestors.reverse();

        let children = if include_children {
            let sql = format!(
                "SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.parent_id = ? ORDER BY m.timestamp ASC, m.rowid"
            );
            let mut stmt = self.conn().prepare(&sql)?;
            let rows = stmt
                .query_map(params![id], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            rows
        } else {
            Vec::new()
        };

        Ok(ContextView {
            message,
            ancestors,
            children,
            conversation,
        })
    }

    /// Full message tree of a session
    pub fn get_tree(&self, session_id: &str) -> Result<ConversationTree> {
        let conversation = self.get_conversation(session_id)?;
        let rows = self.session_messages(session_id)?;
        let total_messages = rows.len();

        Ok(ConversationTree {
            conversation,
            roots: build_forest(rows),
            total_messages,
        })
    }

    // ============================================
    // LISTING & STATS
    // ============================================

    pub fn list_recent(
        &self,
        days_back: Option<u32>,
        limit: usize,
        project: Option<&str>,
    ) -> Result<Vec<ConversationRow>> {
        let mut sql = format!("SELECT {CONVERSATION_COLUMNS} FROM conversations c WHERE 1 = 1");
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(since) = cutoff(days_back) {
            sql.push_str(" AND c.last_message_at >= ?");
            args.push(Box::new(since));
        }
        if let Some(p) = project {
            sql.push_str(" AND c.project_path = ?");
            args.push(Box::new(p.to_string()));
        }
        sql.push_str(" ORDER BY c.last_message_at DESC LIMIT ?");
        args.push(Box::new(limit as i64));

        let refs: Vec<&dyn ToSql> = args.iter().map(|a| a.as_ref()).collect();
        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt
            .query_map(refs.as_slice(), conversation_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    pub fn stats(&self) -> Result<StoreStats> {
        let conn = self.conn();
        let count = |sql: &str| -> Result<i64> { Ok(conn.query_row(sql, [], |r| r.get(0))?) };

        let mut stats = StoreStats {
            conversations: count("SELECT COUNT(*) FROM conversations")?,
            messages: count("SELECT COUNT(*) FROM messages")?,
            fts_rows: count("SELECT COUNT(*) FROM message_summaries_fts")?,
            summarized: count("SELECT COUNT(*) FROM messages WHERE is_summarized = TRUE")?,
            by_method: BTreeMap::new(),
        };

        let mut stmt = conn.prepare(
            "SELECT summary_method, COUNT(*) FROM messages GROUP BY summary_method",
        )?;
        let rows = stmt.query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?)))?;
        for row in rows {
            let (method, n) = row?;
            stats.by_method.insert(method, n);
        }

        Ok(stats)
    }
}

/// Link rows into nested nodes. Rows arrive oldest first, so children lists
/// come out oldest first too. Rows only reachable through a parent cycle are
/// appended as extra roots.
fn build_forest(rows: Vec<MessageRow>) -> Vec<TreeNode> {
    let index: HashMap<String, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, m)| (m.id.clone(), i))
        .collect();

    let mut children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut roots: Vec<usize> = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        match row.parent_id.as_ref().and_then(|p| index.get(p)) {
            Some(&p) if p != i => children[p].push(i),
            _ => roots.push(i),
        }
    }

    // BFS keeps only the edges that first reach each node
    let mut seen = vec![false; rows.len()];
    let mut tree_children: Vec<Vec<usize>> = vec![Vec::new(); rows.len()];
    let mut order: Vec<usize> = Vec::with_capacity(rows.len());
    let mut queue: VecDeque<usize> = VecDeque::new();

    let mut visit = |start: usize,
                     seen: &mut Vec<bool>,
                     order: &mut Vec<usize>,
                     tree_children: &mut Vec<Vec<usize>>| {
        seen[start] = true;
        queue.push_back(start);
        while let Some(current) = queue.pop_front() {
            order.push(current);
            for &child in &children[current] {
                if !seen[child] {
                    seen[child] = true;
                    tree_children[current].push(child);
                    queue.push_back(child);
                }
            }
        }
    };

    for &r in &roots {
        visit(r, &mut seen, &mut order, &mut tree_children);
    }
    for i in 0..rows.len() {
        if !seen[i] {
            roots.push(i);
            visit(i, &mut seen, &mut order, &mut tree_children);
        }
    }

    let mut slots: Vec<Option<TreeNode>> = rows
        .into_iter()
        .map(|message| {
            Some(TreeNode {
                message,
                children: Vec::new(),
            })
        })
        .collect();

    // children always come after their parent in BFS order
    for &i in order.iter().rev() {
        let kids: Vec<TreeNode> = tree_children[i]
            .iter()
            .filter_map(|&c| slots[c].take())
            .collect();
        if let Some(node) = slots[i].as_mut() {
            node.children = kids;
        }
    }

    roots.iter().filter_map(|&r| slots[r].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::parse_lines;
    use crate::store::tests::{indexed_scenario, scenario_file};
    use crate::store::SummaryUpdate;
    use std::path::Path;

    fn line(id: &str, parent: Option<&str>, session: &str, ts: &str, content: &str) -> String {
        let parent = parent.map_or("null".to_string(), |p| format!("\"{}\"", p));
        format!(
            r#"{{"type":"user","uuid":"{id}","parentUuid":{parent},"sessionId":"{session}","timestamp":"{ts}","cwd":"/work/{session}","message":{{"role":"user","content":"{content}"}}}}"#
        )
    }

    fn index_lines(store: &IndexStore, file: &str, lines: &[String]) {
        store
            .index_conversation(Path::new(file), &parse_lines(lines.iter().map(String::as_str)))
            .unwrap();
    }

    #[test]
    fn test_search_scenario() {
        let store = indexed_scenario();
        let hits = store.search("bug", None, 10, None).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].message.id, "A");
        assert_eq!(hits[0].conversation_summary, "Parser bug fix");
        assert_eq!(hits[0].message.conversation_file, scenario_file().to_string_lossy());

        assert!(store.search("xyzzy", None, 10, None).unwrap().is_empty());
    }

    #[test]
    fn test_search_prefix_and_conjunction() {
        let store = indexed_scenario();
        let ids = |q: &str| -> Vec<String> {
            store
                .search(q, None, 10, None)
                .unwrap()
                .into_iter()
                .map(|h| h.message.id)
                .collect()
        };

        assert_eq!(ids("pars"), vec!["A"]);
        assert_eq!(ids("fix"), vec!["B", "A"]);
        assert_eq!(ids("fix regex"), vec!["B"]);
        assert!(ids("fix xyzzy").is_empty());
    }

    #[test]
    fn test_search_tolerates_punctuation() {
        let store = indexed_scenario();
        assert!(store.search("", None, 10, None).unwrap().is_empty());
        assert!(store.search("   -- ", None, 10, None).unwrap().is_empty());
        assert!(store.search("\"bug", None, 10, None).is_ok());
        assert_eq!(store.search("bug)", None, 10, None).unwrap().len(), 1);
        assert_eq!(store.search("parser AND", None, 10, None).unwrap().len(), 0);
    }

    #[test]
    fn test_search_filters() {
        let store = indexed_scenario();
        let now = format_timestamp(&Utc::now());
        index_lines(
            &store,
            "/tmp/fresh.jsonl",
            &[line("F", None, "fresh", &now, "another bug in lexer")],
        );

        assert_eq!(store.search("bug", None, 10, None).unwrap().len(), 2);
        let recent = store.search("bug", Some(7), 10, None).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].message.id, "F");

        let in_proj = store.search("bug", None, 10, Some("/work/proj")).unwrap();
        assert_eq!(in_proj.len(), 1);
        assert_eq!(in_proj[0].message.id, "A");

        assert_eq!(store.search("bug", None, 1, None).unwrap()[0].message.id, "F");
    }

    #[test]
    fn test_search_sees_updated_summary_only() {
        let store = indexed_scenario();
        store
            .update_summaries(&[SummaryUpdate {
                id: "B".into(),
                summary: "Adjusted tokenizer pattern".into(),
            }])
            .unwrap();
        assert_eq!(store.search("tokenizer", None, 10, None).unwrap().len(), 1);
        assert!(store.search("regex", None, 10, None).unwrap().is_empty());
    }

    #[test]
    fn test_context_scenario() {
        let store = indexed_scenario();
        let ctx = store.get_context("B", 3, true).unwrap();
        assert_eq!(ctx.message.id, "B");
        assert_eq!(ctx.ancestors.len(), 1);
        assert_eq!(ctx.ancestors[0].id, "A");
        assert!(ctx.children.is_empty());
        assert_eq!(ctx.conversation.summary, "Parser bug fix");

        let root = store.get_context("A", 3, true).unwrap();
        assert!(root.ancestors.is_empty());
        assert_eq!(root.children.len(), 1);
        assert_eq!(root.children[0].id, "B");
    }

    #[test]
    fn test_context_depth_limit_and_order() {
        let store = IndexStore::open_in_memory().unwrap();
        index_lines(
            &store,
            "/tmp/chain.jsonl",
            &[
                line("a", None, "chain", "2025-01-01T00:00:00Z", "one"),
                line("b", Some("a"), "chain", "2025-01-01T00:00:01Z", "two"),
                line("c", Some("b"), "chain", "2025-01-01T00:00:02Z", "three"),
                line("d", Some("c"), "chain", "2025-01-01T00:00:03Z", "four"),
                line("e2", Some("d"), "chain", "2025-01-01T00:00:05Z", "late child"),
                line("e1", Some("d"), "chain", "2025-01-01T00:00:04Z", "early child"),
            ],
        );

        let ctx = store.get_context("d", 2, true).unwrap();
        let ancestors: Vec<_> = ctx.ancestors.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ancestors, vec!["b", "c"]);
        let children: Vec<_> = ctx.children.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(children, vec!["e1", "e2"]);

        let no_kids = store.get_context("d", 0, false).unwrap();
        assert!(no_kids.ancestors.is_empty());
        assert!(no_kids.children.is_empty());
    }

    #[test]
    fn test_context_stops_at_broken_chain() {
        let store = IndexStore::open_in_memory().unwrap();
        index_lines(
            &store,
            "/tmp/broken.jsonl",
            &[
                line("o", Some("gone"), "broken", "2025-01-01T00:00:00Z", "orphan"),
                line("p", Some("o"), "broken", "2025-01-01T00:00:01Z", "child"),
            ],
        );
        let ctx = store.get_context("p", 5, false).unwrap();
        assert_eq!(ctx.ancestors.len(), 1);
        assert_eq!(ctx.ancestors[0].id, "o");
    }

    #[test]
    fn test_not_found() {
        let store = indexed_scenario();
        assert!(matches!(
            store.get_context("nope", 3, true),
            Err(FinderError::NotFound { kind: "message", .. })
        ));
        assert!(matches!(
            store.get_tree("nope"),
            Err(FinderError::NotFound { kind: "conversation", .. })
        ));
    }

    #[test]
    fn test_tree_scenario() {
        let store = indexed_scenario();
        let tree = store.get_tree("s1").unwrap();
        assert_eq!(tree.total_messages, 2);
        assert_eq!(tree.roots.len(), 1);
        assert_eq!(tree.roots[0].message.id, "A");
        assert_eq!(tree.roots[0].children.len(), 1);
        assert_eq!(tree.roots[0].children[0].message.id, "B");
        assert!(tree.roots[0].children[0].children.is_empty());
    }

    #[test]
    fn test_tree_branches_and_cycles() {
        let store = IndexStore::open_in_memory().unwrap();
        index_lines(
            &store,
            "/tmp/forest.jsonl",
            &[
                line("r", None, "forest", "2025-01-01T00:00:00Z", "root"),
                line("x", Some("r"), "forest", "2025-01-01T00:00:01Z", "branch one"),
                line("y", Some("r"), "forest", "2025-01-01T00:00:02Z", "branch two"),
                line("z", Some("y"), "forest", "2025-01-01T00:00:03Z", "leaf"),
                line("c1", Some("c2"), "forest", "2025-01-01T00:00:04Z", "loop one"),
                line("c2", Some("c1"), "forest", "2025-01-01T00:00:05Z", "loop two"),
            ],
        );

        let tree = store.get_tree("forest").unwrap();
        assert_eq!(tree.total_messages, 6);
        assert_eq!(tree.roots.len(), 2);

        let root = &tree.roots[0];
        assert_eq!(root.message.id, "r");
        let kids: Vec<_> = root.children.iter().map(|n| n.message.id.as_str()).collect();
        assert_eq!(kids, vec!["x", "y"]);
        assert_eq!(root.children[1].children[0].message.id, "z");

        let cycle = &tree.roots[1];
        assert_eq!(cycle.message.id, "c1");
        assert_eq!(cycle.children[0].message.id, "c2");
        assert!(cycle.children[0].children.is_empty());
    }

    #[test]
    fn test_list_recent() {
        let store = indexed_scenario();
        let now = format_timestamp(&Utc::now());
        index_lines(
            &store,
            "/tmp/fresh.jsonl",
            &[line("F", None, "fresh", &now, "fresh work")],
        );

        let all = store.list_recent(None, 10, None).unwrap();
        let ids: Vec<_> = all.iter().map(|c| c.session_id.as_str()).collect();
        assert_eq!(ids, vec!["fresh", "s1"]);

        assert_eq!(store.list_recent(Some(7), 10, None).unwrap().len(), 1);
        assert_eq!(store.list_recent(None, 1, None).unwrap().len(), 1);
        let proj = store.list_recent(None, 10, Some("/work/proj")).unwrap();
        assert_eq!(proj.len(), 1);
        assert_eq!(proj[0].session_id, "s1");
    }

    #[test]
    fn test_stats_and_pending_sessions() {
        let store = indexed_scenario();
        assert_eq!(store.sessions_needing_summary().unwrap(), vec!["s1".to_string()]);

        store
            .mark_summarized(&["A".to_string(), "B".to_string()], SummaryMethod::TooShort)
            .unwrap();
        let stats = store.stats().unwrap();
        assert_eq!(stats.conversations, 1);
        assert_eq!(stats.messages, 2);
        assert_eq!(stats.fts_rows, 2);
        assert_eq!(stats.summarized, 2);
        assert_eq!(stats.by_method.get("too_short"), Some(&2));
        assert!(store.sessions_needing_summary().unwrap().is_empty());
    }

    #[test]
    fn test_fts_query() {
        assert_eq!(fts_query("bug"), Some("\"bug\"*".to_string()));
        assert_eq!(fts_query("fix  regex"), Some("\"fix\"* \"regex\"*".to_string()));
        assert_eq!(fts_query("say\"hi"), Some("\"say\"\"hi\"*".to_string()));
        assert_eq!(fts_query(" - "), None);
    }
}
