//! Filesystem persistence.
//!
//! Two files per tournament live in the data directory:
//! - `<name>.json`: the tournament snapshot (roster, history, standings)
//! - `<name>.submissions.jsonl`: append-only journal of score submissions

mod json;
mod jsonl;

pub use json::*;
pub use jsonl::*;

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub tournament: String,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf, tournament: impl Into<String>) -> Self {
        Self {
            data_dir,
            tournament: tournament.into(),
        }
    }

    pub fn tournament_path(&self) -> PathBuf {
        self.data_dir.join(format!("{}.json", self.tournament))
    }

    pub fn journal_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{}.submissions.jsonl", self.tournament))
    }

    /// Reject tournament names that would escape the data directory.
    pub fn validate(&self) -> Result<(), StorageError> {
        let name = self.tournament.trim();
        if name.is_empty() || name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(StorageError::InvalidPath(self.tournament.clone()));
        }
        Ok(())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"), "tournament")
    }
}
