use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info};

use super::dataset::QuizDataset;
use super::domain::Question;
use super::error::QuizError;
use super::scoring::{apply_answer, ScoreVector};
use super::selection::{select_results, Outcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    NotStarted,
    InProgress,
    Completed,
}

impl SessionPhase {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "not started",
            Self::InProgress => "in progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The question awaiting an answer, with the numbers a progress display needs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionPrompt {
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub progress_percent: f64,
}

/// One quiz run: question index, phase and an exclusively owned score vector.
#[derive(Debug, Clone)]
pub struct QuizSession {
    dataset: Arc<QuizDataset>,
    phase: SessionPhase,
    question_index: usize,
    scores: ScoreVector,
}

impl QuizSession {
    pub fn new(dataset: Arc<QuizDataset>) -> Self {
        let scores = ScoreVector::new(dataset.catalog());
        Self {
            dataset,
            phase: SessionPhase::NotStarted,
            question_index: 0,
            scores,
        }
    }

    pub fn start(&mut self) -> Result<(), QuizError> {
        self.require(SessionPhase::NotStarted, "start")?;
        self.phase = SessionPhase::InProgress;
        debug!(total = self.total_questions(), "quiz session started");
        Ok(())
    }

    /// Score `selected_value` against the pending question and advance.
    ///
    /// On error neither the index nor the scores change.
    pub fn answer(&mut self, selected_value: i64) -> Result<SessionPhase, QuizError> {
        self.require(SessionPhase::InProgress, "answer a question")?;
        let question = self
            .dataset
            .questions()
            .get(self.question_index)
            .ok_or(QuizError::InvalidState {
                operation: "answer a question",
                phase: SessionPhase::Completed,
            })?;

        apply_answer(question, selected_value, &mut self.scores)?;
        self.question_index += 1;

        if self.question_index == self.total_questions() {
            self.phase = SessionPhase::Completed;
            info!(answered = self.question_index, "quiz session completed");
        }

        Ok(self.phase)
    }

    pub fn result(&self) -> Result<Outcome, QuizError> {
        self.require(SessionPhase::Completed, "read results")?;
        Ok(select_results(&self.scores, self.dataset.catalog()))
    }

    /// Back to the start screen with every accumulator cleared.
    pub fn restart(&mut self) {
        self.phase = SessionPhase::NotStarted;
        self.question_index = 0;
        self.scores.reset();
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn total_questions(&self) -> usize {
        self.dataset.question_count()
    }

    pub fn scores(&self) -> &ScoreVector {
        &self.scores
    }

    pub fn dataset(&self) -> &QuizDataset {
        &self.dataset
    }

    pub fn current_question(&self) -> Option<&Question> {
        match self.phase {
            SessionPhase::InProgress => self.dataset.questions().get(self.question_index),
            SessionPhase::NotStarted | SessionPhase::Completed => None,
        }
    }

    pub fn prompt(&self) -> Option<QuestionPrompt> {
        self.current_question().map(|question| QuestionPrompt {
            number: self.question_index + 1,
            total: self.total_questions(),
            text: question.text.clone(),
            progress_percent: self.progress_percent(),
        })
    }

    pub fn progress_percent(&self) -> f64 {
        let total = self.total_questions();
        if total == 0 {
            return 0.0;
        }
        self.question_index as f64 / total as f64 * 100.0
    }

    fn require(&self, expected: SessionPhase, operation: &'static str) -> Result<(), QuizError> {
        if self.phase == expected {
            Ok(())
        } else {
            Err(QuizError::InvalidState {
                operation,
                phase: self.phase,
            })
        }
    }
}

/// Run a whole session headlessly from a list of answers.
pub fn grade(dataset: Arc<QuizDataset>, answers: &[i64]) -> Result<Outcome, QuizError> {
    let mut session = QuizSession::new(dataset);
    session.start()?;
    for &value in answers {
        session.answer(value)?;
    }
    session.result()
}
