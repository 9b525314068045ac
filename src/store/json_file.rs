//! File-backed store: one pretty-printed JSON document per tournament.

use super::{next_revision, sort_summaries, MatchStore, StoreError, StoredTournament, TournamentSummary};
use crate::models::{Tournament, TournamentId};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Stores `<dir>/<tournament id>.json`. Writes go to a temp file first and are renamed into place.
#[derive(Debug)]
pub struct JsonFileStore {
    dir: PathBuf,
    /// Serializes revision check + write within this process.
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        log::info!("Using tournament data directory {}", dir.display());
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: TournamentId) -> PathBuf {
        self.dir.join(format!("{}.json", id))
    }

    fn read_file(&self, path: &Path) -> Result<StoredTournament, StoreError> {
        let contents = fs::read_to_string(path)?;
        let stored: StoredTournament = serde_json::from_str(&contents)?;
        stored.tournament.validate().map_err(StoreError::Invalid)?;
        Ok(stored)
    }

    fn write_file(&self, stored: &StoredTournament) -> Result<(), StoreError> {
        let path = self.path_for(stored.tournament.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(stored)?;
        fs::write(&tmp, json)?;
        if let Err(e) = fs::rename(&tmp, &path) {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                log::warn!("Couldn't remove {}: {}", tmp.display(), cleanup);
            }
            return Err(e.into());
        }
        log::debug!("Wrote {} (revision {})", path.display(), stored.revision);
        Ok(())
    }
}

impl MatchStore for JsonFileStore {
    fn list(&self) -> Result<Vec<TournamentSummary>, StoreError> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match self.read_file(&path) {
                Ok(stored) => summaries.push(stored.summary()),
                Err(e) => log::warn!("Skipping {}: {}", path.display(), e),
            }
        }
        Ok(sort_summaries(summaries))
    }

    fn load(&self, id: TournamentId) -> Result<StoredTournament, StoreError> {
        match self.read_file(&self.path_for(id)) {
            Err(StoreError::Io(e)) if e.kind() == ErrorKind::NotFound => Err(StoreError::NotFound(id)),
            other => other,
        }
    }

    fn insert(&self, tournament: Tournament) -> Result<StoredTournament, StoreError> {
        tournament.validate().map_err(StoreError::Invalid)?;
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let id = tournament.id;
        if self.path_for(id).exists() {
            return Err(StoreError::AlreadyExists(id));
        }
        let stored = StoredTournament::new(tournament);
        self.write_file(&stored)?;
        Ok(stored)
    }

    fn save(
        &self,
        tournament: Tournament,
        expected_revision: u64,
    ) -> Result<StoredTournament, StoreError> {
        let _guard = self.write_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let current = self.load(tournament.id)?;
        let stored = next_revision(&current, tournament, expected_revision)?;
        self.write_file(&stored)?;
        Ok(stored)
    }
}
