use serde::{Deserialize, Serialize};
use std::fmt;

use super::error::QuizError;

/// Stable identifier of a personality type within a catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeId(pub u32);

impl fmt::Display for TypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed grouping of types; exactly one winner is selected per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Category(pub String);

impl Category {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One classifiable archetype. Everything except `id` and `category` is display
/// payload and never inspected by scoring or selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityType {
    pub id: TypeId,
    /// Missing in the source becomes blank so catalog validation reports it.
    #[serde(default)]
    pub category: Category,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub color: String,
}

/// Weighted link from a question to a type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringRule {
    #[serde(rename = "type")]
    pub type_id: TypeId,
    #[serde(rename = "val")]
    pub weight: f64,
}

impl ScoringRule {
    pub const fn new(type_id: TypeId, weight: f64) -> Self {
        Self { type_id, weight }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub text: String,
    #[serde(default)]
    pub scoring: Vec<ScoringRule>,
}

/// Likert response level. Only these five values are accepted by scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerLevel {
    StronglyDisagree,
    Disagree,
    Neutral,
    Agree,
    StronglyAgree,
}

impl AnswerLevel {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::StronglyDisagree,
            Self::Disagree,
            Self::Neutral,
            Self::Agree,
            Self::StronglyAgree,
        ]
    }

    pub const fn value(self) -> i64 {
        match self {
            Self::StronglyDisagree => 1,
            Self::Disagree => 2,
            Self::Neutral => 3,
            Self::Agree => 4,
            Self::StronglyAgree => 5,
        }
    }

    /// Fixed symmetric weighting: extremes carry full weight, near-extremes 40%,
    /// and the middle level contributes nothing.
    pub const fn multiplier(self) -> f64 {
        match self {
            Self::StronglyDisagree => -1.0,
            Self::Disagree => -0.4,
            Self::Neutral => 0.0,
            Self::Agree => 0.4,
            Self::StronglyAgree => 1.0,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::StronglyDisagree => "Strongly disagree",
            Self::Disagree => "Disagree",
            Self::Neutral => "Neutral",
            Self::Agree => "Agree",
            Self::StronglyAgree => "Strongly agree",
        }
    }
}

impl TryFrom<i64> for AnswerLevel {
    type Error = QuizError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::StronglyDisagree),
            2 => Ok(Self::Disagree),
            3 => Ok(Self::Neutral),
            4 => Ok(Self::Agree),
            5 => Ok(Self::StronglyAgree),
            other => Err(QuizError::InvalidInput { value: other }),
        }
    }
}
