//! Persistence for tournament snapshots.
//!
//! Every save carries the revision the caller loaded; a store refuses the write if the
//! stored revision has moved on since.

mod json_file;
mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use crate::models::{Tournament, TournamentError, TournamentId, TournamentStage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Errors from loading or saving tournaments.
#[derive(Debug)]
pub enum StoreError {
    NotFound(TournamentId),
    /// Stored revision differs from the one the write was based on.
    Conflict { expected: u64, actual: u64 },
    /// A tournament with this id already exists.
    AlreadyExists(TournamentId),
    Io(std::io::Error),
    Serde(serde_json::Error),
    /// Stored document parsed but breaks a tournament invariant.
    Invalid(TournamentError),
    /// Internal lock was poisoned by a panicking writer.
    Poisoned,
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(id) => write!(f, "No tournament {}", id),
            StoreError::Conflict { expected, actual } => write!(
                f,
                "Tournament changed concurrently (expected revision {}, found {})",
                expected, actual
            ),
            StoreError::AlreadyExists(id) => write!(f, "Tournament {} already exists", id),
            StoreError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StoreError::Serde(e) => write!(f, "Storage format error: {}", e),
            StoreError::Invalid(e) => write!(f, "Stored tournament is invalid: {}", e),
            StoreError::Poisoned => write!(f, "Storage lock poisoned"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serde(e) => Some(e),
            StoreError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(e: std::io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serde(e)
    }
}

/// A tournament as held by a store.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StoredTournament {
    pub tournament: Tournament,
    /// Bumped on every successful save.
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

impl StoredTournament {
    pub fn new(tournament: Tournament) -> Self {
        Self {
            tournament,
            revision: 0,
            updated_at: Utc::now(),
        }
    }

    pub fn summary(&self) -> TournamentSummary {
        let t = &self.tournament;
        TournamentSummary {
            id: t.id,
            name: t.name.clone(),
            participants: t.participants.len(),
            stage: t.stage(),
            winner: t.winner.and_then(|w| t.participant_name(w)).map(str::to_string),
            revision: self.revision,
            updated_at: self.updated_at,
        }
    }
}

/// Listing entry.
#[derive(Clone, Debug, Serialize)]
pub struct TournamentSummary {
    pub id: TournamentId,
    pub name: String,
    pub participants: usize,
    pub stage: TournamentStage,
    pub winner: Option<String>,
    pub revision: u64,
    pub updated_at: DateTime<Utc>,
}

/// Load/save contract for tournament snapshots.
pub trait MatchStore: Send + Sync {
    /// All tournaments, oldest update first.
    fn list(&self) -> Result<Vec<TournamentSummary>, StoreError>;

    fn load(&self, id: TournamentId) -> Result<StoredTournament, StoreError>;

    /// Store a new tournament at revision 0.
    fn insert(&self, tournament: Tournament) -> Result<StoredTournament, StoreError>;

    /// Replace the stored snapshot if its revision is still `expected_revision`.
    /// Returns the stored entry with the bumped revision.
    fn save(
        &self,
        tournament: Tournament,
        expected_revision: u64,
    ) -> Result<StoredTournament, StoreError>;
}

/// Shared compare-and-swap step: check the revision and build the next stored entry.
fn next_revision(
    current: &StoredTournament,
    tournament: Tournament,
    expected_revision: u64,
) -> Result<StoredTournament, StoreError> {
    if current.revision != expected_revision {
        return Err(StoreError::Conflict {
            expected: expected_revision,
            actual: current.revision,
        });
    }
    Ok(StoredTournament {
        tournament,
        revision: current.revision + 1,
        updated_at: Utc::now(),
    })
}

fn sort_summaries(mut summaries: Vec<TournamentSummary>) -> Vec<TournamentSummary> {
    summaries.sort_by_key(|s| s.updated_at);
    summaries
}
