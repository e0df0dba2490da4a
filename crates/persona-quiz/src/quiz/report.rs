//! Presentation-neutral views of an outcome. Renderers (console, HTTP, ...)
//! consume these instead of reaching into the core types.

use serde::Serialize;

use super::domain::{PersonalityType, TypeId};
use super::selection::{CategoryWinner, Outcome};

pub const INDETERMINATE_TITLE: &str = "We could not calculate a result.";

pub const INDETERMINATE_MESSAGE: &str = "Most of your answers were very neutral. \
This quiz works by looking at the direction you lean, so it needs a little more to go on. \
If you like, try again and go with whichever side feels slightly more like you. \
You may discover something new about yourself.";

/// Summary card for one category winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultCard {
    pub type_id: TypeId,
    pub category: String,
    pub name: String,
    pub description: String,
    pub color: String,
    pub score: f64,
}

impl ResultCard {
    pub fn from_winner(winner: &CategoryWinner) -> Self {
        Self {
            type_id: winner.winner.id,
            category: winner.category.to_string(),
            name: winner.winner.name.clone(),
            description: winner.winner.description.clone(),
            color: winner.winner.color.clone(),
            score: winner.score,
        }
    }
}

/// Expanded view of a single type, shown when a result card is opened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeDetail {
    pub type_id: TypeId,
    pub category: String,
    pub name: String,
    pub color: String,
    pub detail: String,
}

impl From<&PersonalityType> for TypeDetail {
    fn from(personality: &PersonalityType) -> Self {
        Self {
            type_id: personality.id,
            category: personality.category.to_string(),
            name: personality.name.clone(),
            color: personality.color.clone(),
            detail: personality.detail.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResultView {
    Ranked {
        cards: Vec<ResultCard>,
    },
    Indeterminate {
        title: &'static str,
        message: &'static str,
    },
}

impl ResultView {
    pub fn from_outcome(outcome: &Outcome) -> Self {
        match outcome {
            Outcome::Indeterminate => ResultView::Indeterminate {
                title: INDETERMINATE_TITLE,
                message: INDETERMINATE_MESSAGE,
            },
            Outcome::Ranked(winners) => ResultView::Ranked {
                cards: winners.iter().map(ResultCard::from_winner).collect(),
            },
        }
    }
}
