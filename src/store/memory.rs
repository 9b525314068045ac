//! In-process store: tournaments by id behind an RwLock.

use super::{next_revision, sort_summaries, MatchStore, StoreError, StoredTournament, TournamentSummary};
use crate::models::{Tournament, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Keeps every tournament in memory; contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tournaments: RwLock<HashMap<TournamentId, StoredTournament>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MatchStore for MemoryStore {
    fn list(&self) -> Result<Vec<TournamentSummary>, StoreError> {
        let g = self.tournaments.read().map_err(|_| StoreError::Poisoned)?;
        Ok(sort_summaries(g.values().map(StoredTournament::summary).collect()))
    }

    fn load(&self, id: TournamentId) -> Result<StoredTournament, StoreError> {
        let g = self.tournaments.read().map_err(|_| StoreError::Poisoned)?;
        g.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    fn insert(&self, tournament: Tournament) -> Result<StoredTournament, StoreError> {
        tournament.validate().map_err(StoreError::Invalid)?;
        let mut g = self.tournaments.write().map_err(|_| StoreError::Poisoned)?;
        let id = tournament.id;
        if g.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        let stored = StoredTournament::new(tournament);
        g.insert(id, stored.clone());
        Ok(stored)
    }

    fn save(
        &self,
        tournament: Tournament,
        expected_revision: u64,
    ) -> Result<StoredTournament, StoreError> {
        let mut g = self.tournaments.write().map_err(|_| StoreError::Poisoned)?;
        let id = tournament.id;
        let current = g.get(&id).ok_or(StoreError::NotFound(id))?;
        let stored = next_revision(current, tournament, expected_revision)?;
        g.insert(id, stored.clone());
        Ok(stored)
    }
}
