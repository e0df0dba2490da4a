use super::session::SessionPhase;

/// Errors raised while scoring answers or reading results from a session.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuizError {
    /// The selected value is not one of the five answer levels. Nothing was
    /// mutated, so the caller may retry with a valid value.
    #[error("answer value {value} is not one of 1, 2, 3, 4, 5")]
    InvalidInput { value: i64 },
    /// The operation does not apply to the session's current phase.
    #[error("cannot {operation} while the session is {phase}")]
    InvalidState {
        operation: &'static str,
        phase: SessionPhase,
    },
}
