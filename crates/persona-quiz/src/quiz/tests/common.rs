use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::quiz::dataset::{QuizDataset, TypeCatalog};
use crate::quiz::domain::{Category, PersonalityType, Question, ScoringRule, TypeId};
use crate::quiz::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use crate::quiz::{quiz_router, QuizService};

pub(super) fn personality(id: u32, category: &str, name: &str) -> PersonalityType {
    PersonalityType {
        id: TypeId(id),
        category: Category::new(category),
        name: name.to_string(),
        description: format!("{name} description"),
        detail: format!("{name} detail"),
        color: "#336699".to_string(),
    }
}

/// Three types over two categories and two questions:
/// Q1 scores T1 (5) and T3 (2), Q2 scores T2 (5).
pub(super) fn two_question_dataset() -> Arc<QuizDataset> {
    let catalog = TypeCatalog::new(
        vec![Category::new("A"), Category::new("B")],
        vec![
            personality(1, "A", "T1"),
            personality(2, "A", "T2"),
            personality(3, "B", "T3"),
        ],
    )
    .expect("catalog builds");

    let questions = vec![
        Question {
            text: "First question".to_string(),
            scoring: vec![
                ScoringRule::new(TypeId(1), 5.0),
                ScoringRule::new(TypeId(3), 2.0),
            ],
        },
        Question {
            text: "Second question".to_string(),
            scoring: vec![ScoringRule::new(TypeId(2), 5.0)],
        },
    ];

    Arc::new(QuizDataset::new(catalog, questions).expect("dataset builds"))
}

pub(super) fn build_service() -> (QuizService<MemoryRepository>, Arc<MemoryRepository>) {
    let repository = Arc::new(MemoryRepository::default());
    let service = QuizService::new(repository.clone(), two_question_dataset());
    (service, repository)
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for MemoryRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let stored = guard.get(&record.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != record.version {
            return Err(RepositoryError::Stale {
                expected: record.version,
                found: stored.version,
            });
        }
        record.version += 1;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Wraps [`MemoryRepository`] so the first `readers` fetches block until all
/// of them have read, forcing their read-modify-write cycles to overlap.
pub(super) struct OverlappingReadsRepository {
    pub(super) inner: MemoryRepository,
    barrier: Barrier,
    readers: usize,
    fetches: AtomicUsize,
}

impl OverlappingReadsRepository {
    pub(super) fn new(inner: MemoryRepository, readers: usize) -> Self {
        Self {
            inner,
            barrier: Barrier::new(readers),
            readers,
            fetches: AtomicUsize::new(0),
        }
    }
}

impl SessionRepository for OverlappingReadsRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        self.inner.insert(record)
    }

    fn update(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        self.inner.update(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let record = self.inner.fetch(id)?;
        if self.fetches.fetch_add(1, Ordering::SeqCst) < self.readers {
            self.barrier.wait();
        }
        Ok(record)
    }
}

pub(super) struct ConflictRepository;

impl SessionRepository for ConflictRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Conflict)
    }

    fn update(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("read only".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Ok(None)
    }
}

pub(super) struct UnavailableRepository;

impl SessionRepository for UnavailableRepository {
    fn insert(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn update(&self, _record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn quiz_router_with_service(service: QuizService<MemoryRepository>) -> axum::Router {
    quiz_router(Arc::new(service))
}
