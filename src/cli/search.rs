//! Search command implementation

use anyhow::Result;

use crate::store::IndexStore;

use super::{print_json, role_icon, short_time, truncate};

pub fn run(
    store: &IndexStore,
    query: &str,
    days: Option<u32>,
    limit: usize,
    project: Option<&str>,
    content: bool,
    json: bool,
) -> Result<()> {
    let hits = store.search(query, days, limit, project)?;

    if json {
        return print_json(&hits);
    }

    if hits.is_empty() {
        println!("No results found for: {}", query);
        return Ok(());
    }

    println!("🔍 Found {} matches for '{}':\n", hits.len(), query);
    for hit in hits {
        let msg = &hit.message;
        println!(
            "{}  [{}] {}",
            role_icon(msg.role),
            short_time(msg.timestamp.as_deref()),
            msg.project_path
        );
        if content {
            println!("   {}", truncate(&msg.full_content, 500));
        } else {
            println!("   {}", msg.summary);
        }
        println!("   UUID: {}", msg.id);
        println!("   Conversation: {}", hit.conversation_summary);
        println!();
    }
    Ok(())
}
