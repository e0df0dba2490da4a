use serde::Serialize;
use tracing::warn;

use super::dataset::TypeCatalog;
use super::domain::{Category, PersonalityType};
use super::scoring::ScoreVector;

/// Winning type for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryWinner {
    pub category: Category,
    pub winner: PersonalityType,
    pub score: f64,
}

/// Classification result for a completed session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "winners", rename_all = "snake_case")]
pub enum Outcome {
    /// Every accumulator was exactly zero.
    Indeterminate,
    /// One winner per non-empty category, in category display order.
    Ranked(Vec<CategoryWinner>),
}

impl Outcome {
    pub fn is_indeterminate(&self) -> bool {
        matches!(self, Outcome::Indeterminate)
    }

    pub fn winners(&self) -> &[CategoryWinner] {
        match self {
            Outcome::Indeterminate => &[],
            Outcome::Ranked(winners) => winners,
        }
    }
}

/// Pick the top type per category, or report an indeterminate outcome when
/// all evidence is neutral.
pub fn select_results(scores: &ScoreVector, catalog: &TypeCatalog) -> Outcome {
    if scores.is_all_neutral() {
        return Outcome::Indeterminate;
    }

    let mut winners = Vec::new();
    for group in catalog.groups() {
        match top_of_category(&group.members, scores) {
            Some((winner, score)) => winners.push(CategoryWinner {
                category: group.category.clone(),
                winner: winner.clone(),
                score,
            }),
            None => warn!(category = %group.category, "no member types; category skipped"),
        }
    }

    Outcome::Ranked(winners)
}

/// Single linear scan with a strict `>` comparison: on an exact tie the member
/// that appears first in the catalog keeps the lead.
fn top_of_category<'a>(
    members: &[&'a PersonalityType],
    scores: &ScoreVector,
) -> Option<(&'a PersonalityType, f64)> {
    let mut best: Option<(&'a PersonalityType, f64)> = None;
    let mut max_score = f64::NEG_INFINITY;

    for member in members {
        let score = scores.get(member.id);
        if score > max_score {
            max_score = score;
            best = Some((*member, score));
        }
    }

    best
}
