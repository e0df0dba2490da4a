use metrics_exporter_prometheus::PrometheusHandle;
use persona_quiz::quiz::{
    QuizDataset, RepositoryError, SessionId, SessionRecord, SessionRepository,
};
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dataset: Arc<QuizDataset>,
}

/// Process-local session store; each session is owned by exactly one entry.
#[derive(Default, Clone)]
pub(crate) struct InMemorySessionRepository {
    records: Arc<Mutex<HashMap<SessionId, SessionRecord>>>,
}

impl SessionRepository for InMemorySessionRepository {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("session store mutex poisoned");
        if guard.contains_key(&record.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn update(&self, mut record: SessionRecord) -> Result<SessionRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("session store mutex poisoned");
        let found = guard
            .get(&record.id)
            .map(|stored| stored.version)
            .ok_or(RepositoryError::NotFound)?;
        if found != record.version {
            return Err(RepositoryError::Stale {
                expected: record.version,
                found,
            });
        }
        record.version += 1;
        guard.insert(record.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError> {
        let guard = self.records.lock().expect("session store mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

impl InMemorySessionRepository {
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.records.lock().expect("session store mutex poisoned").len()
    }
}
