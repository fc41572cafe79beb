//! Library error type

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("no session id found in {}", file.display())]
    MissingSession { file: PathBuf },

    #[error("required directory does not exist: {}", path.display())]
    MissingDirectory { path: PathBuf },

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("summarizer failed: {0}")]
    Summarizer(#[from] SummarizerError),

    #[error("file watcher error: {0}")]
    Watch(#[from] notify::Error),
}

impl FinderError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Failures that may succeed if the same file is attempted again later.
    /// A file that no longer exists will not come back by retrying, and
    /// neither will rows that violate a constraint.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Store(rusqlite::Error::SqliteFailure(e, _)) => {
                e.code != rusqlite::ErrorCode::ConstraintViolation
            }
            Self::Store(_) => true,
            Self::Io(e) => e.kind() != std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

/// Ways a batch call to the external summarizer can fail.
#[derive(Debug, Error)]
pub enum SummarizerError {
    #[error("timed out after {0}s")]
    Timeout(u64),

    #[error("exited with status {status}: {stderr}")]
    NonZeroExit { status: String, stderr: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("could not run summarizer: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, FinderError>;
