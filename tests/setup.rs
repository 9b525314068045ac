//! Integration tests for tournament creation.

use group_knockout_tracker::{create_tournament, MatchType, TournamentError, TournamentStage};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;

fn names(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("Player {i}")).collect()
}

#[test]
fn deals_participants_into_groups_and_schedules_round_robin() {
    let mut rng = StdRng::seed_from_u64(7);
    let t = create_tournament("Spring Cup", names(10), 2, &mut rng).unwrap();

    assert_eq!(t.groups.len(), 2);
    assert_eq!(t.groups[0].name, "A");
    assert_eq!(t.groups[1].name, "B");
    assert!(t.groups.iter().all(|g| g.participants.len() == 5));

    let everyone: HashSet<usize> = t.groups.iter().flat_map(|g| g.participants.clone()).collect();
    assert_eq!(everyone.len(), 10);

    // 5 choose 2 per group
    assert_eq!(t.games.len(), 20);
    for g in &t.games {
        assert_eq!(g.stage, 1);
        assert_eq!(g.kind, MatchType::Group);
        assert!(g.part_a < g.part_b);
        assert!(!g.played);
        let group = t.groups.iter().find(|gr| gr.contains(g.part_a)).unwrap();
        assert!(group.contains(g.part_b));
    }
    assert_eq!(t.stage(), TournamentStage::GroupStage);
    assert!(t.validate().is_ok());
}

#[test]
fn uneven_groups_differ_by_at_most_one() {
    let mut rng = StdRng::seed_from_u64(1);
    let t = create_tournament("Cup", names(9), 4, &mut rng).unwrap();
    let sizes: Vec<usize> = t.groups.iter().map(|g| g.participants.len()).collect();
    assert_eq!(sizes, vec![3, 2, 2, 2]);
}

#[test]
fn rejects_duplicate_names_ignoring_case() {
    let mut rng = StdRng::seed_from_u64(1);
    let err = create_tournament(
        "Cup",
        vec!["Ann".into(), "Bob".into(), " ann ".into()],
        1,
        &mut rng,
    )
    .unwrap_err();
    assert!(matches!(err, TournamentError::InvalidSetup(msg) if msg.contains("duplicate")));
}

#[test]
fn rejects_groups_that_cannot_be_filled() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(matches!(
        create_tournament("Cup", names(3), 2, &mut rng),
        Err(TournamentError::InvalidSetup(_))
    ));
    assert!(matches!(
        create_tournament("Cup", names(4), 0, &mut rng),
        Err(TournamentError::InvalidSetup(_))
    ));
    assert!(matches!(
        create_tournament("  ", names(4), 1, &mut rng),
        Err(TournamentError::InvalidSetup(_))
    ));
}

#[test]
fn many_groups_get_two_letter_names() {
    let mut rng = StdRng::seed_from_u64(3);
    let t = create_tournament("Big Cup", names(60), 28, &mut rng).unwrap();
    assert_eq!(t.groups[25].name, "Z");
    assert_eq!(t.groups[26].name, "AA");
    assert_eq!(t.groups[27].name, "AB");
}

#[test]
fn group_names_stay_unique_past_two_letters() {
    let mut rng = StdRng::seed_from_u64(5);
    let t = create_tournament("Huge Cup", names(1406), 703, &mut rng).unwrap();
    assert_eq!(t.groups[701].name, "ZZ");
    assert_eq!(t.groups[702].name, "AAA");
    let distinct: HashSet<&str> = t.groups.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(distinct.len(), 703);
}
