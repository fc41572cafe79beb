//! Context command implementation

use anyhow::Result;

use crate::error::FinderError;
use crate::store::IndexStore;

use super::{print_json, role_icon};

pub fn run(store: &IndexStore, id: &str, depth: usize, children: bool, json: bool) -> Result<()> {
    let ctx = match store.get_context(id, depth, children) {
        Ok(ctx) => ctx,
        Err(e @ FinderError::NotFound { .. }) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&ctx);
    }

    println!("Context for message: {}", id);
    println!("Conversation: {} ({})\n", ctx.conversation.summary, ctx.conversation.session_id);

    if !ctx.ancestors.is_empty() {
        println!("📜 Parent messages:");
        for msg in &ctx.ancestors {
            println!("  {} {}", role_icon(msg.role), msg.summary);
        }
        println!();
    }

    println!("🎯 Target message:");
    println!("  {} {}", role_icon(ctx.message.role), ctx.message.full_content);
    println!();

    if !ctx.children.is_empty() {
        println!("💬 Responses:");
        for msg in &ctx.children {
            println!("  {} {}", role_icon(msg.role), msg.summary);
        }
    }
    Ok(())
}
