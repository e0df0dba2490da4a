//! Personality quiz core: answers are scored into a per-session vector and,
//! once every question is answered, the top type of each category is chosen.
//!
//! Scoring and selection are pure functions over caller-owned state; the
//! session, service and router layers only sequence them.

pub mod dataset;
pub mod domain;
mod error;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod service;
pub mod session;

#[cfg(test)]
mod tests;

pub use dataset::{CategoryGroup, DatasetError, QuestionSet, QuizDataset, TypeCatalog};
pub use domain::{AnswerLevel, Category, PersonalityType, Question, ScoringRule, TypeId};
pub use error::QuizError;
pub use report::{ResultCard, ResultView, TypeDetail};
pub use repository::{
    RepositoryError, SessionId, SessionRecord, SessionRepository, SessionStatusView,
};
pub use router::quiz_router;
pub use scoring::{apply_answer, apply_level, ScoreVector};
pub use selection::{select_results, CategoryWinner, Outcome};
pub use service::{QuizService, QuizServiceError};
pub use session::{grade, QuestionPrompt, QuizSession, SessionPhase};
