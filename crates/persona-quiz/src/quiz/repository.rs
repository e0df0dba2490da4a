use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::session::{QuestionPrompt, QuizSession};

/// Opaque handle for a stored session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Repository record pairing a session with its bookkeeping timestamps.
///
/// `version` counts accepted writes. A write carrying anything other than
/// the stored version was built from a stale read and must be rejected.
#[derive(Debug, Clone)]
pub struct SessionRecord {
    pub id: SessionId,
    pub session: QuizSession,
    pub started_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub version: u64,
}

impl SessionRecord {
    pub fn status_view(&self) -> SessionStatusView {
        SessionStatusView {
            session_id: self.id.clone(),
            phase: self.session.phase().label(),
            answered: self.session.question_index(),
            total_questions: self.session.total_questions(),
            progress_percent: self.session.progress_percent(),
            current_question: self.session.prompt(),
            updated_at: self.updated_at,
        }
    }
}

/// Storage abstraction so sessions can live in memory or behind a real store.
pub trait SessionRepository: Send + Sync {
    fn insert(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    /// Compare-and-swap on `record.version`: fails with
    /// [`RepositoryError::Stale`] when the stored version differs, otherwise
    /// stores the record with its version bumped and returns it.
    fn update(&self, record: SessionRecord) -> Result<SessionRecord, RepositoryError>;
    fn fetch(&self, id: &SessionId) -> Result<Option<SessionRecord>, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("session already exists")]
    Conflict,
    #[error("session changed since it was read (expected version {expected}, found {found})")]
    Stale { expected: u64, found: u64 },
    #[error("session not found")]
    NotFound,
    #[error("session store unavailable: {0}")]
    Unavailable(String),
}

/// Client-facing snapshot of a session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatusView {
    pub session_id: SessionId,
    pub phase: &'static str,
    pub answered: usize,
    pub total_questions: usize,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<QuestionPrompt>,
    pub updated_at: DateTime<Utc>,
}
