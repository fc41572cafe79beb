//! Configuration management with YAML support

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub watch: WatchConfig,

    #[serde(default)]
    pub summarizer: SummarizerConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_path")]
    pub path: String,
}

/// Where conversation logs live
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    #[serde(default = "default_projects_dir")]
    pub projects_dir: String,
}

/// Watch-debounce coordinator settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Quiet time after the last change before a pass starts
    #[serde(default = "default_idle_threshold_secs")]
    pub idle_threshold_secs: u64,

    /// How often the timer loop looks at the pending set
    #[serde(default = "default_check_interval_secs")]
    pub check_interval_secs: u64,

    /// Files modified this recently are reindexed when the watcher starts
    #[serde(default = "default_catchup_window_secs")]
    pub catchup_window_secs: u64,

    /// Re-queue attempts for files whose indexing failed transiently
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

/// External summarizer (Claude CLI in headless mode)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummarizerConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_command")]
    pub command: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,

    /// Working directory for summarizer runs, kept apart from real projects
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: String,
}

// Default value functions
fn default_database_path() -> String {
    "~/.claude-finder/index.db".to_string()
}

fn default_projects_dir() -> String {
    "~/.claude/projects".to_string()
}

fn default_idle_threshold_secs() -> u64 {
    30
}

fn default_check_interval_secs() -> u64 {
    5
}

fn default_catchup_window_secs() -> u64 {
    3600
}

fn default_max_retries() -> u32 {
    3
}

fn default_channel_capacity() -> usize {
    1024
}

fn default_enabled() -> bool {
    true
}

fn default_command() -> String {
    "claude".to_string()
}

fn default_model() -> String {
    "haiku".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_batch_size() -> usize {
    20
}

fn default_max_content_chars() -> usize {
    2000
}

fn default_workspace_dir() -> String {
    "~/.claude-finder/summarizer-workspace".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            projects_dir: default_projects_dir(),
        }
    }
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            idle_threshold_secs: default_idle_threshold_secs(),
            check_interval_secs: default_check_interval_secs(),
            catchup_window_secs: default_catchup_window_secs(),
            max_retries: default_max_retries(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            command: default_command(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            batch_size: default_batch_size(),
            max_content_chars: default_max_content_chars(),
            workspace_dir: default_workspace_dir(),
        }
    }
}

impl WatchConfig {
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_secs(self.idle_threshold_secs)
    }

    pub fn check_interval(&self) -> Duration {
        // interval() panics on a zero period
        Duration::from_secs(self.check_interval_secs.max(1))
    }

    pub fn catchup_window(&self) -> Duration {
        Duration::from_secs(self.catchup_window_secs)
    }
}

impl SummarizerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn workspace_path(&self) -> PathBuf {
        expand(&self.workspace_dir)
    }
}

impl Config {
    /// Load configuration from a YAML file
    /// Searches in order:
    /// 1. Provided path
    /// 2. ./claude-finder.yaml (current directory)
    /// 3. ~/.config/claude-finder/claude-finder.yaml
    pub fn load(path: &str) -> Result<Self> {
        Self::load_first(&search_paths(path))
    }

    /// Parse the first existing file in `candidates`, or fall back to defaults
    fn load_first(candidates: &[PathBuf]) -> Result<Self> {
        for search_path in candidates {
            if search_path.exists() {
                let content = std::fs::read_to_string(search_path)?;
                let config: Config = serde_yaml::from_str(&content)?;
                return Ok(config);
            }
        }

        // No config file found, use defaults
        Ok(Config::default())
    }

    /// Get the database path, expanding ~ to home directory
    pub fn database_path(&self) -> PathBuf {
        expand(&self.database.path)
    }

    /// Get the Claude projects directory, expanding ~ to home directory
    pub fn projects_dir(&self) -> PathBuf {
        expand(&self.source.projects_dir)
    }
}

fn search_paths(path: &str) -> Vec<PathBuf> {
    vec![
        expand(path),
        PathBuf::from("claude-finder.yaml"),
        expand("~/.config/claude-finder/claude-finder.yaml"),
    ]
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).to_string())
}
