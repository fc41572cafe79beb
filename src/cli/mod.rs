//! Command implementations for the `claude-finder` binary

pub mod context;
pub mod index;
pub mod init;
pub mod list;
pub mod search;
pub mod stats;
pub mod summarize;
pub mod tree;
pub mod watch;

use anyhow::Result;
use serde::Serialize;
use std::time::Duration;

use crate::config::Config;
use crate::probe::Role;
use crate::summarize::{ClaudeCliSummarizer, Summarizer};

pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn role_icon(role: Role) -> &'static str {
    match role {
        Role::User => "👤",
        Role::Assistant => "🤖",
    }
}

/// `2025-01-01T10:00:00.000Z` -> `2025-01-01 10:00`
pub(crate) fn short_time(ts: Option<&str>) -> String {
    match ts {
        Some(ts) if ts.len() >= 16 => ts[..16].replace('T', " "),
        Some(ts) => ts.to_string(),
        None => "-".to_string(),
    }
}

/// Cut to `max` chars, marking the cut with `...`
pub(crate) fn truncate(text: &str, max: usize) -> String {
    let first_line = text.lines().next().unwrap_or("");
    if first_line.chars().count() > max {
        let head: String = first_line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", head)
    } else {
        first_line.to_string()
    }
}

pub(crate) fn days_to_age(days: u32) -> Duration {
    Duration::from_secs(u64::from(days) * 24 * 60 * 60)
}

/// The configured summarizer, or `None` when summarization is switched off
pub(crate) fn build_summarizer(config: &Config) -> Option<Box<dyn Summarizer>> {
    config
        .summarizer
        .enabled
        .then(|| Box::new(ClaudeCliSummarizer::new(&config.summarizer)) as Box<dyn Summarizer>)
}
