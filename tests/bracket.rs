//! Integration tests for bracket seeding and fold pairing.

use group_knockout_tracker::{
    fold_pairs, knockout_bracket, seed_bracket, GameMatch, MatchType, Tournament, TournamentError,
};

#[test]
fn eight_seeds_give_standard_bracket_order() {
    let seeded = seed_bracket((1..=8).collect()).unwrap();
    assert_eq!(seeded, vec![1, 8, 4, 5, 2, 7, 3, 6]);
}

#[test]
fn four_matches_keep_favourites_apart_until_final() {
    let seeded = seed_bracket(vec!["m1", "m2", "m3", "m4"]).unwrap();
    assert_eq!(seeded, vec!["m1", "m4", "m2", "m3"]);
}

#[test]
fn single_entry_is_unchanged() {
    assert_eq!(seed_bracket(vec![42]).unwrap(), vec![42]);
}

#[test]
fn non_power_of_two_is_rejected() {
    assert_eq!(
        seed_bracket(vec![1, 2, 3, 4, 5, 6]),
        Err(TournamentError::InvalidBracketInput { len: 6 })
    );
    assert_eq!(
        seed_bracket(Vec::<u8>::new()),
        Err(TournamentError::InvalidBracketInput { len: 0 })
    );
}

#[test]
fn seeding_is_a_permutation_with_top_two_in_opposite_halves() {
    for size in [2usize, 4, 8, 16, 32] {
        let seeded = seed_bracket((1..=size).collect()).unwrap();
        let mut sorted = seeded.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (1..=size).collect::<Vec<_>>());

        let half = size / 2;
        let pos = |seed: usize| seeded.iter().position(|&s| s == seed).unwrap();
        assert_ne!(pos(1) < half, pos(2) < half, "size {size}: seeds 1 and 2 share a half");
        assert_eq!(&seeded[..2], &[1, size]);
    }
}

#[test]
fn fold_pairs_strongest_with_weakest() {
    assert_eq!(
        fold_pairs(vec![1, 2, 3, 4, 5, 6]).unwrap(),
        vec![(1, 6), (2, 5), (3, 4)]
    );
    assert_eq!(
        fold_pairs(vec![1, 2, 3]),
        Err(TournamentError::InvalidBracketInput { len: 3 })
    );
    assert!(fold_pairs(Vec::<u8>::new()).unwrap().is_empty());
}

#[test]
fn knockout_bracket_seeds_first_round_and_follows_feeders() {
    let names = (0..8).map(|i| format!("P{i}")).collect();
    let mut t = Tournament::new("Cup", names);
    t.games = vec![
        GameMatch::new(2, 0, 7, MatchType::Knockout),
        GameMatch::new(2, 1, 6, MatchType::Knockout),
        GameMatch::new(2, 2, 5, MatchType::Knockout),
        GameMatch::new(2, 3, 4, MatchType::Knockout),
        // winners 0, 1, 2, 3 folded: 0v3, 1v2
        GameMatch::new(3, 0, 3, MatchType::Knockout),
        GameMatch::new(3, 1, 2, MatchType::Knockout),
    ];

    let rounds = knockout_bracket(&t).unwrap();
    assert_eq!(rounds.len(), 2);
    assert_eq!(rounds[0].stage, 2);
    let first: Vec<(usize, usize)> = rounds[0].matches.iter().map(|m| (m.part_a, m.part_b)).collect();
    assert_eq!(first, vec![(0, 7), (3, 4), (1, 6), (2, 5)]);
    let second: Vec<(usize, usize)> = rounds[1].matches.iter().map(|m| (m.part_a, m.part_b)).collect();
    assert_eq!(second, vec![(0, 3), (1, 2)]);
}

#[test]
fn knockout_bracket_is_empty_during_group_stage() {
    let mut t = Tournament::new("Cup", vec!["A".into(), "B".into()]);
    t.games.push(GameMatch::new(1, 0, 1, MatchType::Group));
    assert!(knockout_bracket(&t).unwrap().is_empty());
}
