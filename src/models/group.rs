//! Group and standings data structures.

use crate::models::game::ParticipantId;
use serde::{Deserialize, Serialize};

/// A round-robin group. Fixed once the tournament is created.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub name: String,
    pub participants: Vec<ParticipantId>,
}

impl Group {
    pub fn new(name: impl Into<String>, participants: Vec<ParticipantId>) -> Self {
        Self {
            name: name.into(),
            participants,
        }
    }

    pub fn contains(&self, id: ParticipantId) -> bool {
        self.participants.contains(&id)
    }
}

/// One participant's line in a group table.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    pub id: ParticipantId,
    pub wins: u32,
    pub losses: u32,
    pub sets_won: i64,
    /// Opponent points folded by subtraction from zero, so this is never positive.
    /// Ranking treats a higher (less negative) value as better.
    pub sets_lost: i64,
}

impl StandingRow {
    pub fn new(id: ParticipantId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// Ranking key, compared descending.
    pub fn rank_key(&self) -> (u32, i64, i64) {
        (self.wins, self.sets_won, self.sets_lost)
    }
}

/// Ranked table for one group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupStandings {
    pub name: String,
    pub rows: Vec<StandingRow>,
}

impl GroupStandings {
    /// Participant ids of the top `n` rows, or None if the group has fewer.
    pub fn top(&self, n: usize) -> Option<Vec<ParticipantId>> {
        if self.rows.len() < n {
            return None;
        }
        Some(self.rows.iter().take(n).map(|r| r.id).collect())
    }
}
