//! Integration tests for the service layer and both stores.

use group_knockout_tracker::{
    JsonFileStore, MatchStore, MemoryStore, Progress, ScoreOutcome, ScoreSubmission,
    ServiceError, StoreError, TournamentError, TournamentService, TournamentStage,
};
use std::sync::Arc;
use uuid::Uuid;

fn memory_service() -> (Arc<MemoryStore>, TournamentService) {
    let store = Arc::new(MemoryStore::new());
    let service = TournamentService::new(store.clone());
    (store, service)
}

fn submission(t_names: &[String], a: usize, b: usize, score_a: u32, score_b: u32) -> ScoreSubmission {
    ScoreSubmission {
        part_a: t_names[a].clone(),
        part_b: t_names[b].clone(),
        score_a,
        score_b,
        override_played: false,
    }
}

fn participants(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("P{i}")).collect()
}

#[test]
fn score_then_progress_through_memory_store() {
    let (_store, service) = memory_service();
    let created = service.create("Cup", participants(8), 1).unwrap();
    let id = created.tournament.id;
    assert_eq!(created.revision, 0);

    let pairs: Vec<(usize, usize)> =
        created.tournament.games.iter().map(|g| (g.part_a, g.part_b)).collect();
    let names = created.tournament.participants.clone();

    assert!(matches!(
        service.advance_stage(id),
        Err(ServiceError::Tournament(TournamentError::StageIncomplete { unplayed: 28 }))
    ));
    assert_eq!(service.get(id).unwrap().revision, 0);

    for (a, b) in &pairs {
        let (outcome, _) = service.record_score(id, &submission(&names, *a, *b, 3, 0)).unwrap();
        assert_eq!(outcome, ScoreOutcome::Recorded);
    }
    assert_eq!(service.get(id).unwrap().revision, 28);

    let (progress, stored) = service.advance_stage(id).unwrap();
    assert_eq!(progress, Progress::KnockoutRound { stage: 2, matches: 4 });
    assert_eq!(stored.revision, 29);
    assert_eq!(stored.tournament.stage(), TournamentStage::KnockoutRound(2));
    assert_eq!(service.bracket(id).unwrap().len(), 1);
    assert_eq!(service.standings(id).unwrap()[0].rows[0].wins, 7);
}

#[test]
fn unchanged_score_does_not_bump_revision() {
    let (_store, service) = memory_service();
    let created = service.create("Cup", participants(4), 1).unwrap();
    let id = created.tournament.id;
    let g = &created.tournament.games[0];
    let sub = submission(&created.tournament.participants, g.part_a, g.part_b, 2, 1);

    service.record_score(id, &sub).unwrap();
    let (outcome, stored) = service.record_score(id, &sub).unwrap();
    assert_eq!(outcome, ScoreOutcome::Unchanged);
    assert_eq!(stored.revision, 1);
}

#[test]
fn stale_revision_is_rejected() {
    let (store, service) = memory_service();
    let created = service.create("Cup", participants(4), 1).unwrap();
    let mut t = created.tournament.clone();
    t.games[0].played = true;

    store.save(t.clone(), 0).unwrap();
    assert!(matches!(
        store.save(t, 0),
        Err(StoreError::Conflict { expected: 0, actual: 1 })
    ));
}

#[test]
fn unknown_tournament_is_not_found() {
    let (_store, service) = memory_service();
    let id = Uuid::new_v4();
    assert!(matches!(service.get(id), Err(ServiceError::Store(StoreError::NotFound(x))) if x == id));
    assert!(matches!(
        service.advance_stage(id),
        Err(ServiceError::Store(StoreError::NotFound(_)))
    ));
}

#[test]
fn concurrent_scores_are_all_kept() {
    let (_store, service) = memory_service();
    let created = service.create("Cup", participants(8), 1).unwrap();
    let id = created.tournament.id;
    let names = created.tournament.participants.clone();
    let pairs: Vec<(usize, usize)> =
        created.tournament.games.iter().map(|g| (g.part_a, g.part_b)).collect();

    std::thread::scope(|s| {
        for chunk in pairs.chunks(7) {
            let service = &service;
            let names = &names;
            s.spawn(move || {
                for (a, b) in chunk {
                    service.record_score(id, &submission(names, *a, *b, 1, 0)).unwrap();
                }
            });
        }
    });

    let stored = service.get(id).unwrap();
    assert_eq!(stored.revision, pairs.len() as u64);
    assert!(stored.tournament.games.iter().all(|g| g.played));
}

#[test]
fn import_rejects_invalid_snapshot() {
    let (_store, service) = memory_service();
    let created = service.create("Cup", participants(4), 1).unwrap();
    let mut t = created.tournament;
    t.id = Uuid::new_v4();
    let g = &mut t.games[0];
    std::mem::swap(&mut g.part_a, &mut g.part_b);
    assert!(matches!(
        service.import(t),
        Err(ServiceError::Store(StoreError::Invalid(TournamentError::InvalidSnapshot(_))))
    ));
}

#[test]
fn json_file_store_persists_across_instances() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let store = Arc::new(JsonFileStore::open(dir.path()).unwrap());
        let service = TournamentService::new(store);
        let created = service.create("Cup", participants(4), 1).unwrap();
        let g = &created.tournament.games[0];
        let sub = submission(&created.tournament.participants, g.part_a, g.part_b, 3, 2);
        service.record_score(created.tournament.id, &sub).unwrap();
        created.tournament.id
    };

    let store = JsonFileStore::open(dir.path()).unwrap();
    let stored = store.load(id).unwrap();
    assert_eq!(stored.revision, 1);
    assert!(stored.tournament.games[0].played);
    assert_eq!(stored.tournament.games[0].score_a, 3);

    let list = store.list().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0].id, id);
    assert_eq!(list[0].participants, 4);

    assert!(matches!(store.load(Uuid::new_v4()), Err(StoreError::NotFound(_))));
    assert!(matches!(
        store.save(stored.tournament.clone(), 0),
        Err(StoreError::Conflict { expected: 0, actual: 1 })
    ));
}

#[test]
fn errors_map_to_http_status() {
    use actix_web::http::StatusCode;

    let (_store, service) = memory_service();
    let created = service.create("Cup", participants(4), 1).unwrap();
    let id = created.tournament.id;
    let names = created.tournament.participants.clone();

    let unknown = ScoreSubmission {
        part_b: "Nobody".to_string(),
        ..submission(&names, 0, 1, 1, 0)
    };
    let status = |e: ServiceError| e.status_code();

    assert_eq!(status(service.record_score(id, &unknown).unwrap_err()), StatusCode::NOT_FOUND);
    assert_eq!(status(service.get(Uuid::new_v4()).unwrap_err()), StatusCode::NOT_FOUND);
    assert_eq!(
        status(service.advance_stage(id).unwrap_err()),
        StatusCode::PRECONDITION_FAILED
    );
    assert_eq!(
        status(service.import(created.tournament.clone()).unwrap_err()),
        StatusCode::CONFLICT
    );
    assert_eq!(
        status(service.create("Cup", participants(1), 1).unwrap_err()),
        StatusCode::BAD_REQUEST
    );

    let conflict = StoreError::Conflict { expected: 0, actual: 1 };
    assert_eq!(status(conflict.into()), StatusCode::CONFLICT);
    let complete = TournamentError::TournamentComplete { winner: 0 };
    assert_eq!(status(complete.into()), StatusCode::CONFLICT);
    let io = StoreError::Io(std::io::Error::other("disk gone"));
    assert_eq!(status(io.into()), StatusCode::INTERNAL_SERVER_ERROR);
}
