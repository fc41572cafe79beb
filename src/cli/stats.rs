//! Stats command implementation

use anyhow::Result;

use crate::store::IndexStore;

use super::print_json;

pub fn run(store: &IndexStore, json: bool) -> Result<()> {
    let stats = store.stats()?;

    if json {
        return print_json(&stats);
    }

    println!("Conversations:     {}", stats.conversations);
    println!("Messages:          {}", stats.messages);
    println!("Search index rows: {}", stats.fts_rows);
    println!("Summarized:        {}", stats.summarized);
    for (method, count) in &stats.by_method {
        println!("  {:<16} {}", method, count);
    }
    Ok(())
}
