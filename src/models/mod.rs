//! Data structures for the tournament: matches, groups, standings, tournament snapshot.

mod game;
mod group;
mod tournament;

pub use game::{canonical_pair, GameMatch, MatchType, ParticipantId, Stage, GROUP_STAGE};
pub use group::{Group, GroupStandings, StandingRow};
pub use tournament::{Tournament, TournamentError, TournamentId, TournamentStage};
