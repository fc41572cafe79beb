//! Tree command implementation

use anyhow::Result;

use crate::error::FinderError;
use crate::store::{IndexStore, TreeNode};

use super::{print_json, role_icon, truncate};

pub fn run(store: &IndexStore, session_id: &str, json: bool) -> Result<()> {
    let tree = match store.get_tree(session_id) {
        Ok(tree) => tree,
        Err(e @ FinderError::NotFound { .. }) => {
            println!("{}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&tree);
    }

    println!("Conversation tree: {}", session_id);
    println!("{} ({} messages)\n", tree.conversation.summary, tree.total_messages);

    // explicit stack: deep conversations would overflow a recursive printer
    let mut stack: Vec<(&TreeNode, usize)> = tree.roots.iter().rev().map(|n| (n, 0)).collect();
    while let Some((node, indent)) = stack.pop() {
        let branch = if node.message.is_sidechain { "↳ " } else { "" };
        println!(
            "{}{}{} {}",
            "  ".repeat(indent),
            branch,
            role_icon(node.message.role),
            truncate(&node.message.summary, 80)
        );
        stack.extend(node.children.iter().rev().map(|c| (c, indent + 1)));
    }
    Ok(())
}
