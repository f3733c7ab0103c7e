//! Tournament snapshot file.
//!
//! The whole tournament is one pretty-printed JSON document. Saves go to a
//! temporary sibling first and are renamed into place.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::{StorageConfig, StorageError};
use crate::tournament::Tournament;

pub struct TournamentStore {
    path: PathBuf,
}

impl TournamentStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(config.tournament_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn load(&self) -> Result<Tournament, StorageError> {
        if !self.path.exists() {
            return Err(StorageError::PathNotFound(self.path.clone()));
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let tournament: Tournament = serde_json::from_reader(reader)?;
        debug!(
            "Loaded {} ({} competitors, {} rounds) from {:?}",
            tournament.name,
            tournament.roster.len(),
            tournament.history.round_count(),
            self.path
        );
        Ok(tournament)
    }

    pub fn save(&self, tournament: &Tournament) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            serde_json::to_writer_pretty(&mut writer, tournament)?;
            writeln!(writer)?;
            writer.flush()?;
        }
        fs::rename(&tmp, &self.path)?;

        info!("Saved {} to {:?}", tournament.name, self.path);
        Ok(())
    }
}
