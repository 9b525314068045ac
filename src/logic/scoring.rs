//! Recording a single match result.

use crate::models::{Tournament, TournamentError};
use serde::{Deserialize, Serialize};

/// A submitted result, naming participants by their display names.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    #[serde(alias = "partA")]
    pub part_a: String,
    #[serde(alias = "partB")]
    pub part_b: String,
    #[serde(alias = "scoreA")]
    pub score_a: u32,
    #[serde(alias = "scoreB")]
    pub score_b: u32,
    /// Overwrite a result that has already been recorded.
    #[serde(default, rename = "override")]
    pub override_played: bool,
}

/// What `record_score` did to the match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreOutcome {
    Recorded,
    /// Match already had a result and override wasn't requested.
    Unchanged,
}

/// Apply a result to the matching game of the latest stage.
///
/// Either side may be named first; ids and scores are swapped into canonical order before the
/// lookup. Earlier stages are never written, and nothing is written once a winner is recorded.
pub fn record_score(
    tournament: &mut Tournament,
    submission: &ScoreSubmission,
) -> Result<ScoreOutcome, TournamentError> {
    if let Some(winner) = tournament.winner {
        return Err(TournamentError::TournamentComplete { winner });
    }
    let resolve = |name: &str| {
        tournament
            .participant_index(name)
            .ok_or_else(|| TournamentError::UnknownParticipant {
                name: name.to_string(),
            })
    };
    let mut part_a = resolve(&submission.part_a)?;
    let mut part_b = resolve(&submission.part_b)?;
    let mut score_a = submission.score_a;
    let mut score_b = submission.score_b;
    if part_a > part_b {
        std::mem::swap(&mut part_a, &mut part_b);
        std::mem::swap(&mut score_a, &mut score_b);
    }

    let stage = tournament
        .latest_stage()
        .ok_or(TournamentError::MatchNotFound { part_a, part_b })?;
    let game = tournament
        .games
        .iter_mut()
        .find(|g| g.stage == stage && g.part_a == part_a && g.part_b == part_b)
        .ok_or(TournamentError::MatchNotFound { part_a, part_b })?;

    if game.played && !submission.override_played {
        log::debug!("Match {} vs {} already played, keeping existing score", part_a, part_b);
        return Ok(ScoreOutcome::Unchanged);
    }

    game.score_a = score_a;
    game.score_b = score_b;
    game.played = true;
    log::info!(
        "Recorded stage {} score {} {} - {} {}",
        stage,
        submission.part_a,
        submission.score_a,
        submission.score_b,
        submission.part_b
    );
    Ok(ScoreOutcome::Recorded)
}
