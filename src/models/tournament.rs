//! Tournament, TournamentStage and TournamentError.

use crate::models::game::{GameMatch, MatchType, ParticipantId, Stage, GROUP_STAGE};
use crate::models::group::Group;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors that can occur during tournament operations.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum TournamentError {
    /// Identifier not present in the participant list.
    UnknownParticipant { name: String },
    /// No match at the latest stage has this canonical pair.
    MatchNotFound { part_a: ParticipantId, part_b: ParticipantId },
    /// Advance requested while matches remain unplayed.
    StageIncomplete { unplayed: usize },
    /// Seeding or pairing input of a length the bracket can't take.
    InvalidBracketInput { len: usize },
    /// Group count with no knockout pairing rule (must be 1, 2 or an even number >= 4).
    UnsupportedGroupCount { groups: usize },
    /// A group doesn't have enough ranked participants for the knockout draw.
    NotEnoughQualifiers { group: String, needed: usize, available: usize },
    /// Knockout match finished level, so no one can advance.
    UndecidedMatch { part_a: ParticipantId, part_b: ParticipantId },
    /// Tournament can't be created from the given participants/groups.
    InvalidSetup(String),
    /// Snapshot breaks a structural invariant.
    InvalidSnapshot(String),
    /// Final already decided; results can no longer change.
    TournamentComplete { winner: ParticipantId },
}

impl std::fmt::Display for TournamentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TournamentError::UnknownParticipant { name } => write!(f, "Unknown participant '{}'", name),
            TournamentError::MatchNotFound { part_a, part_b } => {
                write!(f, "No match {} vs {} in the current stage", part_a, part_b)
            }
            TournamentError::StageIncomplete { unplayed } => {
                write!(f, "Stage not complete: {} match(es) still unplayed", unplayed)
            }
            TournamentError::InvalidBracketInput { len } => {
                write!(f, "Bracket needs a power-of-two number of entries (got {})", len)
            }
            TournamentError::UnsupportedGroupCount { groups } => {
                write!(f, "Can't draw a knockout round from {} groups", groups)
            }
            TournamentError::NotEnoughQualifiers { group, needed, available } => write!(
                f,
                "Group {} needs {} qualifiers but only has {}",
                group, needed, available
            ),
            TournamentError::UndecidedMatch { part_a, part_b } => {
                write!(f, "Knockout match {} vs {} has no winner", part_a, part_b)
            }
            TournamentError::InvalidSetup(msg) => write!(f, "Invalid setup: {}", msg),
            TournamentError::InvalidSnapshot(msg) => write!(f, "Invalid tournament: {}", msg),
            TournamentError::TournamentComplete { winner } => {
                write!(f, "Tournament already won by participant {}", winner)
            }
        }
    }
}

impl std::error::Error for TournamentError {}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// Current phase of the tournament, derived from the match log and winner.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TournamentStage {
    /// Round robin (stage 1), or no matches at all yet.
    GroupStage,
    /// Knockout round with the given stage number (2 and up).
    KnockoutRound(Stage),
    /// Final played and winner recorded.
    Complete,
}

/// Full tournament snapshot: participants, groups and the append-only match log.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    /// Display names; a participant's id is its index here.
    pub participants: Vec<String>,
    pub groups: Vec<Group>,
    /// Every match ever created, in creation order.
    pub games: Vec<GameMatch>,
    pub winner: Option<ParticipantId>,
}

impl Tournament {
    /// Empty tournament with the given participants. Groups and games are filled in by setup.
    pub fn new(name: impl Into<String>, participants: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            participants,
            groups: Vec::new(),
            games: Vec::new(),
            winner: None,
        }
    }

    /// Index of the participant with this display name.
    pub fn participant_index(&self, name: &str) -> Option<ParticipantId> {
        self.participants.iter().position(|p| p == name)
    }

    pub fn participant_name(&self, id: ParticipantId) -> Option<&str> {
        self.participants.get(id).map(String::as_str)
    }

    /// Highest stage number in the match log. Stages only grow, so this is the last game's stage.
    pub fn latest_stage(&self) -> Option<Stage> {
        self.games.last().map(|g| g.stage)
    }

    /// Matches of one stage, in log order.
    pub fn games_in_stage(&self, stage: Stage) -> impl Iterator<Item = &GameMatch> {
        self.games.iter().filter(move |g| g.stage == stage)
    }

    pub fn unplayed_count(&self) -> usize {
        self.games.iter().filter(|g| !g.played).count()
    }

    pub fn stage(&self) -> TournamentStage {
        if self.winner.is_some() {
            return TournamentStage::Complete;
        }
        match self.games.last() {
            Some(g) if g.kind == MatchType::Knockout => TournamentStage::KnockoutRound(g.stage),
            _ => TournamentStage::GroupStage,
        }
    }

    /// Check the structural invariants of a snapshot coming from outside (disk, API body).
    pub fn validate(&self) -> Result<(), TournamentError> {
        let n = self.participants.len();
        let invalid = |msg: String| Err(TournamentError::InvalidSnapshot(msg));

        for group in &self.groups {
            if let Some(&p) = group.participants.iter().find(|&&p| p >= n) {
                return invalid(format!("group {} references participant {}", group.name, p));
            }
        }

        let mut previous_stage = GROUP_STAGE;
        for (i, g) in self.games.iter().enumerate() {
            if g.part_b >= n {
                return invalid(format!("game {} references participant {}", i, g.part_b));
            }
            if g.part_a >= g.part_b {
                return invalid(format!("game {} is not in canonical order", i));
            }
            if g.stage < previous_stage {
                return invalid(format!("game {} goes back to stage {}", i, g.stage));
            }
            let expected = if g.stage == GROUP_STAGE {
                MatchType::Group
            } else {
                MatchType::Knockout
            };
            if g.kind != expected {
                return invalid(format!("game {} in stage {} has type {:?}", i, g.stage, g.kind));
            }
            previous_stage = g.stage;
        }

        if let Some(w) = self.winner {
            if w >= n {
                return invalid(format!("winner {} is not a participant", w));
            }
        }
        Ok(())
    }
}
