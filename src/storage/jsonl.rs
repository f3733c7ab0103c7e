//! JSONL (JSON Lines) submission journal.
//!
//! Every accepted score submission is appended as one JSON object per line.
//! The journal is an audit trail; the tournament file stays authoritative.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, warn};

use super::{StorageConfig, StorageError};
use crate::models::{GameResult, MatchId};

/// One journal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSubmission {
    /// `R{round}-M{board}`
    pub match_id: String,
    pub score1: i64,
    pub score2: i64,
    pub submitted_at: DateTime<Utc>,
}

impl ResultSubmission {
    pub fn new(match_id: MatchId, result: &GameResult) -> Self {
        Self {
            match_id: match_id.to_string(),
            score1: result.score1,
            score2: result.score2,
            submitted_at: Utc::now(),
        }
    }

    pub fn result(&self) -> GameResult {
        GameResult::new(self.score1, self.score2)
    }
}

/// Line-oriented JSON file of `T`.
pub struct JsonlFile<T> {
    path: PathBuf,
    _marker: PhantomData<T>,
}

impl<T: Serialize + DeserializeOwned> JsonlFile<T> {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _marker: PhantomData,
        }
    }

    fn ensure_dir(&self) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(())
    }

    pub fn append(&self, entity: &T) -> Result<(), StorageError> {
        self.ensure_dir()?;

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;

        let mut writer = BufWriter::new(file);
        let json = serde_json::to_string(entity)?;
        writeln!(writer, "{}", json)?;
        writer.flush()?;

        debug!("Appended entry to {:?}", self.path);
        Ok(())
    }

    /// Read every parseable line. Missing file reads as empty.
    pub fn read_all(&self) -> Result<Vec<T>, StorageError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut entities = Vec::new();

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(entity) => entities.push(entity),
                Err(e) => {
                    warn!("Failed to parse line {} in {:?}: {}", idx + 1, self.path, e);
                }
            }
        }

        debug!("Read {} entries from {:?}", entities.len(), self.path);
        Ok(entities)
    }
}

/// Journal of score submissions for one tournament.
pub struct SubmissionLog {
    file: JsonlFile<ResultSubmission>,
}

impl SubmissionLog {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: JsonlFile::new(path),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.journal_path())
    }

    pub fn record(&self, match_id: MatchId, result: &GameResult) -> Result<ResultSubmission, StorageError> {
        let submission = ResultSubmission::new(match_id, result);
        self.file.append(&submission)?;
        Ok(submission)
    }

    pub fn read_all(&self) -> Result<Vec<ResultSubmission>, StorageError> {
        self.file.read_all()
    }

    /// Submissions for a single match, oldest first.
    pub fn for_match(&self, match_id: MatchId) -> Result<Vec<ResultSubmission>, StorageError> {
        let wanted = match_id.to_string();
        Ok(self
            .read_all()?
            .into_iter()
            .filter(|s| s.match_id == wanted)
            .collect())
    }
}
