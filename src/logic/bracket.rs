//! Single-elimination bracket: seeded display order and front/back fold pairing.

use crate::models::{GameMatch, MatchType, Stage, Tournament, TournamentError};
use serde::Serialize;
use std::collections::VecDeque;

/// Reorder seed-ordered entries (favourite first) into bracket display order.
///
/// Each pass moves `take` entries from the front, then `take` from the back, until the
/// working list is consumed; `take` doubles after every pass. The two favourites end up in
/// opposite halves, the top four in different quarters, and so on.
/// Eight entries come out as `1, 8, 4, 5, 2, 7, 3, 6`.
pub fn seed_bracket<T>(items: Vec<T>) -> Result<Vec<T>, TournamentError> {
    let len = items.len();
    if !len.is_power_of_two() {
        return Err(TournamentError::InvalidBracketInput { len });
    }

    let mut working = items;
    let mut take = 1;
    while take < len {
        let mut remaining: VecDeque<T> = working.into();
        let mut output = Vec::with_capacity(len);
        while !remaining.is_empty() {
            output.extend(remaining.drain(..take));
            let back_start = remaining.len() - take;
            output.extend(remaining.drain(back_start..));
        }
        working = output;
        take *= 2;
    }
    Ok(working)
}

/// Pair the first remaining entry with the last, working inward.
pub fn fold_pairs<T>(items: Vec<T>) -> Result<Vec<(T, T)>, TournamentError> {
    if items.len() % 2 != 0 {
        return Err(TournamentError::InvalidBracketInput { len: items.len() });
    }
    let mut remaining: VecDeque<T> = items.into();
    let mut pairs = Vec::with_capacity(remaining.len() / 2);
    while let (Some(first), Some(last)) = (remaining.pop_front(), remaining.pop_back()) {
        pairs.push((first, last));
    }
    Ok(pairs)
}

/// One knockout round as it should be drawn.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct BracketRound {
    pub stage: Stage,
    pub matches: Vec<GameMatch>,
}

/// Knockout rounds in display order.
///
/// The first knockout round is stored in seed order and goes through `seed_bracket`. Later
/// rounds are shown in the order their feeder matches appear, so each match sits between the
/// two matches it was drawn from.
pub fn knockout_bracket(tournament: &Tournament) -> Result<Vec<BracketRound>, TournamentError> {
    let mut stages: Vec<Stage> = tournament
        .games
        .iter()
        .filter(|g| g.kind == MatchType::Knockout)
        .map(|g| g.stage)
        .collect();
    stages.dedup();

    let mut rounds: Vec<BracketRound> = Vec::with_capacity(stages.len());
    for stage in stages {
        let matches: Vec<GameMatch> = tournament.games_in_stage(stage).cloned().collect();
        let matches = match rounds.last() {
            None => seed_bracket(matches)?,
            Some(previous) => follow_feeders(matches, &previous.matches),
        };
        rounds.push(BracketRound { stage, matches });
    }
    Ok(rounds)
}

/// Sort a round by the display position of the earliest feeder match either side came from.
fn follow_feeders(mut matches: Vec<GameMatch>, previous: &[GameMatch]) -> Vec<GameMatch> {
    let position = |m: &GameMatch| {
        previous
            .iter()
            .position(|p| p.involves(m.part_a) || p.involves(m.part_b))
            .unwrap_or(usize::MAX)
    };
    matches.sort_by_key(|m| position(m));
    matches
}
