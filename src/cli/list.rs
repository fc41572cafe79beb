//! List command implementation

use anyhow::Result;

use crate::store::IndexStore;

use super::{print_json, short_time, truncate};

pub fn run(store: &IndexStore, days: u32, limit: usize, project: Option<&str>, json: bool) -> Result<()> {
    let conversations = store.list_recent(Some(days), limit, project)?;

    if json {
        return print_json(&conversations);
    }

    if conversations.is_empty() {
        println!("No conversations found. Run 'claude-finder index' first.");
        return Ok(());
    }

    println!(
        "{:<17} {:<10} {:>5}  {:<30} {}",
        "Last message", "Session", "Msgs", "Project", "Summary"
    );
    println!("{}", "-".repeat(100));

    for conv in conversations {
        let session: String = conv.session_id.chars().take(8).collect();
        println!(
            "{:<17} {:<10} {:>5}  {:<30} {}",
            short_time(conv.last_message_at.as_deref()),
            session,
            conv.message_count,
            truncate(&conv.project_path, 30),
            truncate(&conv.summary, 50),
        );
    }
    Ok(())
}
