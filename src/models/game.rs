//! Match (game) and MatchType for group and knockout play.

use serde::{Deserialize, Serialize};

/// Index of a participant in `Tournament::participants`.
pub type ParticipantId = usize;

/// Stage number: 1 is the group stage, 2 and up are knockout rounds.
pub type Stage = u32;

/// The group stage is always stage 1.
pub const GROUP_STAGE: Stage = 1;

/// Which part of the tournament a match belongs to.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    Group,
    Knockout,
}

/// A single match between two participants.
///
/// `part_a < part_b` always holds; `(stage, part_a, part_b)` addresses the match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub stage: Stage,
    pub part_a: ParticipantId,
    pub part_b: ParticipantId,
    pub score_a: u32,
    pub score_b: u32,
    pub kind: MatchType,
    /// False until a score has been recorded.
    pub played: bool,
}

impl GameMatch {
    /// New unplayed 0-0 match. The pair is stored in canonical order whatever order it's given in.
    pub fn new(stage: Stage, first: ParticipantId, second: ParticipantId, kind: MatchType) -> Self {
        let (part_a, part_b) = canonical_pair(first, second);
        Self {
            stage,
            part_a,
            part_b,
            score_a: 0,
            score_b: 0,
            kind,
            played: false,
        }
    }

    pub fn involves(&self, id: ParticipantId) -> bool {
        self.part_a == id || self.part_b == id
    }

    /// `(own, opponent)` score from `id`'s point of view. Caller must check `involves` first.
    pub fn scores_for(&self, id: ParticipantId) -> (u32, u32) {
        if self.part_a == id {
            (self.score_a, self.score_b)
        } else {
            (self.score_b, self.score_a)
        }
    }

    /// Higher-scoring side, or None on a draw.
    pub fn winner(&self) -> Option<ParticipantId> {
        match self.score_a.cmp(&self.score_b) {
            std::cmp::Ordering::Greater => Some(self.part_a),
            std::cmp::Ordering::Less => Some(self.part_b),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Order a pair so the lower index comes first.
pub fn canonical_pair(a: ParticipantId, b: ParticipantId) -> (ParticipantId, ParticipantId) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}
