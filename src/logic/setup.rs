//! Setup: draw participants into groups and schedule the round robin.

use crate::models::{GameMatch, Group, MatchType, Tournament, TournamentError, GROUP_STAGE};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Create a tournament with `group_count` groups and every stage-1 match scheduled.
///
/// Participants are shuffled, then dealt into groups A, B, ... in turn. Names are trimmed and
/// must be unique (case-insensitive); every group needs at least two participants.
pub fn create_tournament<R: Rng + ?Sized>(
    name: &str,
    participants: Vec<String>,
    group_count: usize,
    rng: &mut R,
) -> Result<Tournament, TournamentError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(TournamentError::InvalidSetup("tournament name is empty".into()));
    }
    let participants: Vec<String> = participants.iter().map(|p| p.trim().to_string()).collect();
    if participants.iter().any(String::is_empty) {
        return Err(TournamentError::InvalidSetup("participant name is empty".into()));
    }
    let mut seen = HashSet::new();
    if let Some(dup) = participants.iter().find(|p| !seen.insert(p.to_lowercase())) {
        return Err(TournamentError::InvalidSetup(format!("duplicate participant '{}'", dup)));
    }
    if group_count == 0 || participants.len() < group_count * 2 {
        return Err(TournamentError::InvalidSetup(format!(
            "{} participant(s) can't fill {} group(s) of at least 2",
            participants.len(),
            group_count
        )));
    }

    let mut order: Vec<usize> = (0..participants.len()).collect();
    order.shuffle(rng);

    let mut members: Vec<Vec<usize>> = vec![Vec::new(); group_count];
    for (i, p) in order.into_iter().enumerate() {
        members[i % group_count].push(p);
    }

    let mut tournament = Tournament::new(name, participants);
    for (i, mut ids) in members.into_iter().enumerate() {
        ids.sort_unstable();
        for (x, &a) in ids.iter().enumerate() {
            for &b in &ids[x + 1..] {
                tournament
                    .games
                    .push(GameMatch::new(GROUP_STAGE, a, b, MatchType::Group));
            }
        }
        tournament.groups.push(Group::new(group_name(i), ids));
    }

    log::info!(
        "Created tournament {} '{}' with {} participants in {} group(s), {} group matches",
        tournament.id,
        tournament.name,
        tournament.participants.len(),
        group_count,
        tournament.games.len()
    );
    Ok(tournament)
}

/// A, B, ..., Z, AA, AB, ..., ZZ, AAA, ...
fn group_name(index: usize) -> String {
    let mut letters = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        n -= 1;
        letters.push(char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }
    letters.iter().rev().collect()
}
