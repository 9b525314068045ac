//! Group stage + knockout tournament tracker: models, business logic, storage and service layer.

pub mod config;
pub mod logic;
pub mod models;
pub mod service;
pub mod store;

pub use config::ServerConfig;
pub use logic::{
    advance_stage, compute_standings, create_tournament, fold_pairs, knockout_bracket,
    record_score, seed_bracket, write_standings_csv, BracketRound, Progress, ScoreOutcome,
    ScoreSubmission,
};
pub use models::{
    canonical_pair, GameMatch, Group, GroupStandings, MatchType, ParticipantId, Stage,
    StandingRow, Tournament, TournamentError, TournamentId, TournamentStage, GROUP_STAGE,
};
pub use service::{ServiceError, TournamentService};
pub use store::{JsonFileStore, MatchStore, MemoryStore, StoreError, StoredTournament, TournamentSummary};
