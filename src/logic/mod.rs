//! Tournament business logic: setup, standings, bracket seeding, scoring, stage progression.

mod bracket;
mod progression;
mod scoring;
mod setup;
mod standings;

pub use bracket::{fold_pairs, knockout_bracket, seed_bracket, BracketRound};
pub use progression::{advance_stage, Progress};
pub use scoring::{record_score, ScoreOutcome, ScoreSubmission};
pub use setup::create_tournament;
pub use standings::{compute_standings, write_standings_csv};
