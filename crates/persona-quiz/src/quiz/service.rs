use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use super::dataset::QuizDataset;
use super::domain::TypeId;
use super::error::QuizError;
use super::report::TypeDetail;
use super::repository::{RepositoryError, SessionId, SessionRecord, SessionRepository};
use super::selection::Outcome;
use super::session::QuizSession;

/// Service owning the shared dataset and driving sessions stored in `R`.
pub struct QuizService<R> {
    repository: Arc<R>,
    dataset: Arc<QuizDataset>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R> QuizService<R>
where
    R: SessionRepository + 'static,
{
    pub fn new(repository: Arc<R>, dataset: Arc<QuizDataset>) -> Self {
        Self {
            repository,
            dataset,
        }
    }

    pub fn dataset(&self) -> &Arc<QuizDataset> {
        &self.dataset
    }

    /// Create and start a fresh session.
    pub fn create(&self) -> Result<SessionRecord, QuizServiceError> {
        let mut session = QuizSession::new(self.dataset.clone());
        session.start()?;

        let now = Utc::now();
        let record = SessionRecord {
            id: next_session_id(),
            session,
            started_at: now,
            updated_at: now,
            version: 0,
        };

        let stored = self.repository.insert(record)?;
        info!(session_id = %stored.id, "quiz session created");
        Ok(stored)
    }

    /// Record one answer for the pending question.
    pub fn answer(
        &self,
        session_id: &SessionId,
        selected_value: i64,
    ) -> Result<SessionRecord, QuizServiceError> {
        let mut record = self.fetch(session_id)?;
        let phase = record.session.answer(selected_value)?;
        record.updated_at = Utc::now();
        let stored = self.repository.update(record)?;
        debug!(
            %session_id,
            %phase,
            answered = stored.session.question_index(),
            version = stored.version,
            "answer recorded"
        );
        Ok(stored)
    }

    pub fn result(&self, session_id: &SessionId) -> Result<Outcome, QuizServiceError> {
        let record = self.fetch(session_id)?;
        Ok(record.session.result()?)
    }

    /// Reset the session and start it again from the first question.
    pub fn restart(&self, session_id: &SessionId) -> Result<SessionRecord, QuizServiceError> {
        let mut record = self.fetch(session_id)?;
        record.session.restart();
        record.session.start()?;
        record.updated_at = Utc::now();
        let stored = self.repository.update(record)?;
        info!(%session_id, version = stored.version, "quiz session restarted");
        Ok(stored)
    }

    pub fn status(&self, session_id: &SessionId) -> Result<SessionRecord, QuizServiceError> {
        self.fetch(session_id)
    }

    pub fn type_detail(&self, type_id: TypeId) -> Result<TypeDetail, QuizServiceError> {
        self.dataset
            .catalog()
            .get(type_id)
            .map(TypeDetail::from)
            .ok_or(QuizServiceError::UnknownType(type_id))
    }

    fn fetch(&self, session_id: &SessionId) -> Result<SessionRecord, QuizServiceError> {
        let record = self
            .repository
            .fetch(session_id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(record)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QuizServiceError {
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("unknown type id {0}")]
    UnknownType(TypeId),
}
