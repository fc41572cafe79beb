pub mod cli;
pub mod config;
pub mod error;
pub mod indexer;
pub mod probe;
pub mod store;
pub mod summarize;
pub mod tree;
pub mod watch;

pub use config::Config;
pub use error::{FinderError, Result};
pub use probe::ClaudeCodeProbe;
pub use store::IndexStore;
