//! Service layer: loads a tournament, runs one operation on it, saves it back.
//!
//! Mutations on the same tournament are serialized by a per-tournament mutex, and every save
//! is conditioned on the revision that was loaded.

use crate::logic::{
    advance_stage, compute_standings, create_tournament, knockout_bracket, record_score,
    BracketRound, Progress, ScoreOutcome, ScoreSubmission,
};
use crate::models::{GroupStandings, Tournament, TournamentError, TournamentId};
use crate::store::{MatchStore, StoreError, StoredTournament, TournamentSummary};
use actix_web::http::StatusCode;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Errors surfaced to the HTTP layer.
#[derive(Debug)]
pub enum ServiceError {
    Tournament(TournamentError),
    Store(StoreError),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::Tournament(e) => write!(f, "{}", e),
            ServiceError::Store(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Tournament(e) => Some(e),
            ServiceError::Store(e) => Some(e),
        }
    }
}

impl ServiceError {
    /// HTTP status for this error: not found 404, stage incomplete 412, conflicts 409.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Tournament(TournamentError::UnknownParticipant { .. })
            | ServiceError::Tournament(TournamentError::MatchNotFound { .. })
            | ServiceError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ServiceError::Tournament(TournamentError::StageIncomplete { .. }) => {
                StatusCode::PRECONDITION_FAILED
            }
            ServiceError::Tournament(TournamentError::TournamentComplete { .. })
            | ServiceError::Store(StoreError::Conflict { .. })
            | ServiceError::Store(StoreError::AlreadyExists(_)) => StatusCode::CONFLICT,
            ServiceError::Tournament(_) | ServiceError::Store(StoreError::Invalid(_)) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<TournamentError> for ServiceError {
    fn from(e: TournamentError) -> Self {
        ServiceError::Tournament(e)
    }
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        ServiceError::Store(e)
    }
}

/// Tournament operations over a shared store.
pub struct TournamentService {
    store: Arc<dyn MatchStore>,
    locks: Mutex<HashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl TournamentService {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn list(&self) -> Result<Vec<TournamentSummary>, ServiceError> {
        Ok(self.store.list()?)
    }

    pub fn get(&self, id: TournamentId) -> Result<StoredTournament, ServiceError> {
        Ok(self.store.load(id)?)
    }

    /// Draw groups, schedule stage 1 and store the new tournament.
    pub fn create(
        &self,
        name: &str,
        participants: Vec<String>,
        group_count: usize,
    ) -> Result<StoredTournament, ServiceError> {
        let tournament =
            create_tournament(name, participants, group_count, &mut rand::thread_rng())?;
        Ok(self.store.insert(tournament)?)
    }

    /// Store a tournament built elsewhere (e.g. imported). Validated by the store.
    pub fn import(&self, tournament: Tournament) -> Result<StoredTournament, ServiceError> {
        Ok(self.store.insert(tournament)?)
    }

    pub fn standings(&self, id: TournamentId) -> Result<Vec<GroupStandings>, ServiceError> {
        Ok(compute_standings(&self.store.load(id)?.tournament))
    }

    pub fn bracket(&self, id: TournamentId) -> Result<Vec<BracketRound>, ServiceError> {
        Ok(knockout_bracket(&self.store.load(id)?.tournament)?)
    }

    pub fn record_score(
        &self,
        id: TournamentId,
        submission: &ScoreSubmission,
    ) -> Result<(ScoreOutcome, StoredTournament), ServiceError> {
        self.mutate(id, |t| record_score(t, submission))
    }

    pub fn advance_stage(
        &self,
        id: TournamentId,
    ) -> Result<(Progress, StoredTournament), ServiceError> {
        self.mutate(id, advance_stage)
    }

    /// Load, apply `op`, save with the loaded revision. Nothing is written when `op` fails or
    /// leaves the tournament as it was.
    fn mutate<T>(
        &self,
        id: TournamentId,
        op: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<(T, StoredTournament), ServiceError> {
        let lock = self.lock_for(id)?;
        let result = match lock.lock() {
            Ok(_guard) => self.apply(id, op),
            Err(_) => Err(StoreError::Poisoned.into()),
        };
        self.release_lock(id, lock);
        result
    }

    fn apply<T>(
        &self,
        id: TournamentId,
        op: impl FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    ) -> Result<(T, StoredTournament), ServiceError> {
        let stored = self.store.load(id)?;
        let mut tournament = stored.tournament.clone();
        let out = op(&mut tournament)?;
        if tournament == stored.tournament {
            return Ok((out, stored));
        }
        match self.store.save(tournament, stored.revision) {
            Ok(saved) => Ok((out, saved)),
            Err(e) => {
                log::warn!("Save of tournament {} failed: {}", id, e);
                Err(e.into())
            }
        }
    }

    fn lock_for(&self, id: TournamentId) -> Result<Arc<Mutex<()>>, StoreError> {
        let mut locks = self.locks.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(locks.entry(id).or_default().clone())
    }

    /// Drop the map entry once the caller holds the last handle outside the map.
    fn release_lock(&self, id: TournamentId, lock: Arc<Mutex<()>>) {
        // Handles are only cloned under the map lock, so the count can't grow while we hold it.
        if let Ok(mut locks) = self.locks.lock() {
            if Arc::strong_count(&lock) == 2 {
                locks.remove(&id);
            }
        }
    }
}
