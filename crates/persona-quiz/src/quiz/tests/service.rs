use super::common::*;
use crate::quiz::domain::TypeId;
use crate::quiz::repository::{RepositoryError, SessionId, SessionRepository};
use crate::quiz::{Outcome, QuizError, QuizService, QuizServiceError, SessionPhase};
use std::sync::Arc;

#[test]
fn create_starts_session_and_stores_it() {
    let (service, repository) = build_service();

    let record = service.create().expect("session created");

    assert!(record.id.0.starts_with("session-"));
    assert_eq!(record.session.phase(), SessionPhase::InProgress);
    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.session.question_index(), 0);
}

#[test]
fn answers_accumulate_into_ranked_outcome() {
    let (service, repository) = build_service();
    let record = service.create().expect("session created");

    service.answer(&record.id, 5).expect("first answer");
    let last = service.answer(&record.id, 1).expect("second answer");
    assert_eq!(last.session.phase(), SessionPhase::Completed);

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.session.scores().get(TypeId(1)), 5.0);
    assert_eq!(stored.session.scores().get(TypeId(2)), -5.0);
    assert_eq!(stored.session.scores().get(TypeId(3)), 2.0);

    let outcome = service.result(&record.id).expect("result available");
    let winners: Vec<_> = outcome.winners().iter().map(|w| w.winner.id).collect();
    assert_eq!(winners, vec![TypeId(1), TypeId(3)]);
}

#[test]
fn invalid_answer_is_not_persisted() {
    let (service, repository) = build_service();
    let record = service.create().expect("session created");

    match service.answer(&record.id, 6) {
        Err(QuizServiceError::Quiz(QuizError::InvalidInput { value: 6 })) => {}
        other => panic!("expected invalid input, got {other:?}"),
    }

    let stored = repository
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.session.question_index(), 0);
    assert!(stored.session.scores().is_all_neutral());
}

#[test]
fn result_before_completion_is_invalid_state() {
    let (service, _) = build_service();
    let record = service.create().expect("session created");
    service.answer(&record.id, 4).expect("first answer");

    assert!(matches!(
        service.result(&record.id),
        Err(QuizServiceError::Quiz(QuizError::InvalidState { .. }))
    ));
}

#[test]
fn neutral_session_is_indeterminate() {
    let (service, _) = build_service();
    let record = service.create().expect("session created");
    service.answer(&record.id, 3).expect("first answer");
    service.answer(&record.id, 3).expect("second answer");

    assert_eq!(
        service.result(&record.id).expect("result available"),
        Outcome::Indeterminate
    );
}

#[test]
fn restart_returns_to_first_question() {
    let (service, _) = build_service();
    let record = service.create().expect("session created");
    service.answer(&record.id, 5).expect("first answer");
    service.answer(&record.id, 5).expect("second answer");

    let restarted = service.restart(&record.id).expect("restart succeeds");

    assert_eq!(restarted.session.phase(), SessionPhase::InProgress);
    assert_eq!(restarted.session.question_index(), 0);
    assert!(restarted.session.scores().is_all_neutral());
}

#[test]
fn unknown_session_propagates_not_found() {
    let (service, _) = build_service();

    assert!(matches!(
        service.status(&SessionId("session-missing".to_string())),
        Err(QuizServiceError::Repository(RepositoryError::NotFound))
    ));
}

#[test]
fn type_detail_looks_up_catalog() {
    let (service, _) = build_service();

    let detail = service.type_detail(TypeId(3)).expect("type exists");
    assert_eq!(detail.name, "T3");
    assert_eq!(detail.detail, "T3 detail");

    assert!(matches!(
        service.type_detail(TypeId(99)),
        Err(QuizServiceError::UnknownType(TypeId(99)))
    ));
}

#[test]
fn create_propagates_repository_conflicts() {
    let service = QuizService::new(Arc::new(ConflictRepository), two_question_dataset());

    assert!(matches!(
        service.create(),
        Err(QuizServiceError::Repository(RepositoryError::Conflict))
    ));
}

#[test]
fn overlapping_answers_never_drop_an_accepted_write() {
    let repository = Arc::new(OverlappingReadsRepository::new(
        MemoryRepository::default(),
        2,
    ));
    let service = QuizService::new(repository.clone(), two_question_dataset());
    let record = service.create().expect("session created");

    let results: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..2)
            .map(|_| scope.spawn(|| service.answer(&record.id, 5)))
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().expect("answer thread panicked"))
            .collect()
    });

    let accepted = results.iter().filter(|result| result.is_ok()).count();
    assert_eq!(accepted, 1);
    assert!(results.iter().any(|result| matches!(
        result,
        Err(QuizServiceError::Repository(RepositoryError::Stale {
            expected: 0,
            found: 1
        }))
    )));

    let stored = repository
        .inner
        .fetch(&record.id)
        .expect("fetch succeeds")
        .expect("record present");
    assert_eq!(stored.session.question_index(), accepted);
    assert_eq!(stored.version, 1);
    assert_eq!(stored.session.scores().get(TypeId(1)), 5.0);
}

#[test]
fn writes_built_from_a_stale_read_are_rejected() {
    let (service, repository) = build_service();
    let record = service.create().expect("session created");
    let session_id = record.id.clone();
    service.answer(&session_id, 5).expect("first answer");

    assert!(matches!(
        repository.update(record),
        Err(RepositoryError::Stale {
            expected: 0,
            found: 1
        })
    ));

    let restarted = service.restart(&session_id).expect("restart succeeds");
    assert_eq!(restarted.version, 2);
    assert_eq!(restarted.session.question_index(), 0);
}
