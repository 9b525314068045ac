//! Group standings: ranking participants from stage-1 results.

use crate::models::{
    GameMatch, Group, GroupStandings, ParticipantId, StandingRow, Tournament, GROUP_STAGE,
};
use std::io::Write;

/// Ranked standings for every group, in group order.
///
/// A group's matches are the stage-1 matches whose `part_a` belongs to it. Rows are sorted
/// descending by `(wins, sets_won, sets_lost)`; rows that tie on all three keep group order.
pub fn compute_standings(tournament: &Tournament) -> Vec<GroupStandings> {
    tournament
        .groups
        .iter()
        .map(|group| group_standings(tournament, group))
        .collect()
}

fn group_standings(tournament: &Tournament, group: &Group) -> GroupStandings {
    let games: Vec<&GameMatch> = tournament
        .games
        .iter()
        .filter(|g| g.stage == GROUP_STAGE && group.contains(g.part_a))
        .collect();

    let mut rows: Vec<StandingRow> = group
        .participants
        .iter()
        .map(|&p| standing_row(p, &games))
        .collect();
    rows.sort_by(|a, b| b.rank_key().cmp(&a.rank_key()));

    GroupStandings {
        name: group.name.clone(),
        rows,
    }
}

fn standing_row(id: ParticipantId, games: &[&GameMatch]) -> StandingRow {
    let mut row = StandingRow::new(id);
    for game in games.iter().filter(|g| g.involves(id)) {
        let (own, opponent) = game.scores_for(id);
        if own > opponent {
            row.wins += 1;
        } else if own < opponent {
            row.losses += 1;
        }
        row.sets_won += i64::from(own);
        row.sets_lost -= i64::from(opponent);
    }
    row
}

/// Write standings as CSV: one record per row with group, rank (1-based) and participant name.
pub fn write_standings_csv<W: Write>(
    standings: &[GroupStandings],
    participants: &[String],
    writer: W,
) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["group", "rank", "participant", "wins", "losses", "sets_won", "sets_lost"])?;
    for group in standings {
        for (rank, row) in group.rows.iter().enumerate() {
            let name = participants
                .get(row.id)
                .cloned()
                .unwrap_or_else(|| row.id.to_string());
            wtr.write_record([
                group.name.clone(),
                (rank + 1).to_string(),
                name,
                row.wins.to_string(),
                row.losses.to_string(),
                row.sets_won.to_string(),
                row.sets_lost.to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}
