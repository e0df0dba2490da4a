use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

use super::dataset::TypeCatalog;
use super::domain::{AnswerLevel, Question, TypeId};
use super::error::QuizError;

/// Per-session running total for every type in the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreVector {
    scores: BTreeMap<TypeId, f64>,
}

impl ScoreVector {
    /// A zeroed accumulator for each type in the catalog.
    pub fn new(catalog: &TypeCatalog) -> Self {
        Self {
            scores: catalog
                .types()
                .iter()
                .map(|personality| (personality.id, 0.0))
                .collect(),
        }
    }

    pub fn get(&self, id: TypeId) -> f64 {
        self.scores.get(&id).copied().unwrap_or(0.0)
    }

    /// True when every accumulator is exactly zero.
    pub fn is_all_neutral(&self) -> bool {
        self.scores.values().all(|score| *score == 0.0)
    }

    pub fn reset(&mut self) {
        self.scores.values_mut().for_each(|score| *score = 0.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (TypeId, f64)> + '_ {
        self.scores.iter().map(|(id, score)| (*id, *score))
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }
}

/// Apply one answer for `question` to `scores`.
///
/// The value is validated before anything is touched, so an `InvalidInput`
/// error leaves the vector exactly as it was.
pub fn apply_answer(
    question: &Question,
    selected_value: i64,
    scores: &mut ScoreVector,
) -> Result<(), QuizError> {
    let level = AnswerLevel::try_from(selected_value)?;
    apply_level(question, level, scores);
    Ok(())
}

/// Infallible form of [`apply_answer`] for an already-validated level.
pub fn apply_level(question: &Question, level: AnswerLevel, scores: &mut ScoreVector) {
    let multiplier = level.multiplier();
    for rule in &question.scoring {
        let accumulator = scores.scores.entry(rule.type_id).or_insert(0.0);
        *accumulator += rule.weight * multiplier;
        trace!(type_id = %rule.type_id, score = *accumulator, "score updated");
    }
}
