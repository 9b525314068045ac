//! Stage progression: group stage into the first knockout round, knockout round into the next.

use crate::logic::bracket::fold_pairs;
use crate::logic::standings::compute_standings;
use crate::models::{
    GameMatch, GroupStandings, MatchType, ParticipantId, Stage, Tournament, TournamentError,
};
use serde::Serialize;

/// What a successful `advance_stage` did.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "result")]
pub enum Progress {
    /// A new knockout round was appended.
    KnockoutRound { stage: Stage, matches: usize },
    /// The final has been decided.
    Complete { winner: ParticipantId },
}

/// Append the next stage's matches once every recorded match has been played.
///
/// On error the tournament is left untouched. Calling this on a finished tournament
/// reports the existing winner and changes nothing.
pub fn advance_stage(tournament: &mut Tournament) -> Result<Progress, TournamentError> {
    if let Some(winner) = tournament.winner {
        return Ok(Progress::Complete { winner });
    }

    let unplayed = tournament.unplayed_count();
    let last = match tournament.games.last() {
        Some(g) if unplayed == 0 => g,
        _ => return Err(TournamentError::StageIncomplete { unplayed }),
    };
    let stage = last.stage;
    let kind = last.kind;

    match kind {
        MatchType::Group => {
            let pairs = group_stage_pairs(&compute_standings(tournament))?;
            Ok(append_round(tournament, stage + 1, pairs))
        }
        MatchType::Knockout => {
            let round: Vec<&GameMatch> = tournament.games_in_stage(stage).collect();
            let winners = round
                .iter()
                .map(|g| {
                    g.winner().ok_or(TournamentError::UndecidedMatch {
                        part_a: g.part_a,
                        part_b: g.part_b,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            if let &[winner] = winners.as_slice() {
                tournament.winner = Some(winner);
                log::info!("Tournament {} won by participant {}", tournament.id, winner);
                return Ok(Progress::Complete { winner });
            }

            let pairs = fold_pairs(winners)?;
            Ok(append_round(tournament, stage + 1, pairs))
        }
    }
}

fn append_round(
    tournament: &mut Tournament,
    stage: Stage,
    pairs: Vec<(ParticipantId, ParticipantId)>,
) -> Progress {
    let matches = pairs.len();
    tournament.games.extend(
        pairs
            .into_iter()
            .map(|(a, b)| GameMatch::new(stage, a, b, MatchType::Knockout)),
    );
    log::info!(
        "Tournament {} advanced to stage {} with {} match(es)",
        tournament.id,
        stage,
        matches
    );
    Progress::KnockoutRound { stage, matches }
}

/// First knockout round drawn from the group tables.
///
/// - one group: top 8, ranks 1-4 against ranks 8-5 (`1v8, 2v7, 3v6, 4v5`)
/// - two groups: top 4 each, `A1vB4, A2vB3, A3vB2, A4vB1`
/// - even count of 4 or more: adjacent groups, top 2 each, `A1vB2, B1vA2`
fn group_stage_pairs(
    standings: &[GroupStandings],
) -> Result<Vec<(ParticipantId, ParticipantId)>, TournamentError> {
    match standings {
        [only] => {
            let top = qualifiers(only, 8)?;
            let (upper, lower) = top.split_at(4);
            Ok(cross_pairs(upper, lower))
        }
        [a, b] => {
            let top_a = qualifiers(a, 4)?;
            let top_b = qualifiers(b, 4)?;
            Ok(cross_pairs(&top_a, &top_b))
        }
        groups if groups.len() >= 4 && groups.len() % 2 == 0 => {
            let mut pairs = Vec::with_capacity(groups.len());
            for chunk in groups.chunks_exact(2) {
                let top_a = qualifiers(&chunk[0], 2)?;
                let top_b = qualifiers(&chunk[1], 2)?;
                pairs.push((top_a[0], top_b[1]));
                pairs.push((top_b[0], top_a[1]));
            }
            Ok(pairs)
        }
        groups => Err(TournamentError::UnsupportedGroupCount {
            groups: groups.len(),
        }),
    }
}

fn qualifiers(group: &GroupStandings, needed: usize) -> Result<Vec<ParticipantId>, TournamentError> {
    group.top(needed).ok_or_else(|| TournamentError::NotEnoughQualifiers {
        group: group.name.clone(),
        needed,
        available: group.rows.len(),
    })
}

/// Rank i of `a` against rank (n + 1 - i) of `b`.
fn cross_pairs(a: &[ParticipantId], b: &[ParticipantId]) -> Vec<(ParticipantId, ParticipantId)> {
    a.iter().copied().zip(b.iter().rev().copied()).collect()
}
