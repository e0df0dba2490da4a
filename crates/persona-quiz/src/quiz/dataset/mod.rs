//! Loading and load-time validation of the type catalog and question set.
//!
//! Structural problems are fatal here so that scoring never has to handle a
//! rule pointing at a missing type.

mod catalog;
mod parser;

pub use catalog::{CategoryGroup, QuestionSet, TypeCatalog};

use serde::Deserialize;
use std::io::Read;
use std::path::Path;
use tracing::debug;

use super::domain::{Category, PersonalityType, Question};

const BUNDLED_DATASET: &str = include_str!("../../../data/sample_dataset.json");

/// Errors surfaced once at the data-load boundary.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("malformed type catalog: {0}")]
    MalformedCatalog(String),
    #[error("malformed question #{number}: {reason}")]
    MalformedQuestion { number: usize, reason: String },
    #[error("question set is empty")]
    EmptyQuestionSet,
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid dataset JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid type catalog CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Catalog plus question set, validated against each other.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizDataset {
    catalog: TypeCatalog,
    questions: QuestionSet,
}

#[derive(Debug, Deserialize)]
struct DatasetBundle {
    #[serde(default)]
    categories: Option<Vec<Category>>,
    types: Vec<PersonalityType>,
    questions: Vec<Question>,
}

impl QuizDataset {
    pub fn new(catalog: TypeCatalog, questions: Vec<Question>) -> Result<Self, DatasetError> {
        let questions = QuestionSet::new(questions, &catalog)?;
        debug!(
            types = catalog.len(),
            questions = questions.len(),
            "quiz dataset validated"
        );
        Ok(Self { catalog, questions })
    }

    /// The reference dataset compiled into the crate.
    pub fn bundled() -> Result<Self, DatasetError> {
        Self::from_json_str(BUNDLED_DATASET)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, DatasetError> {
        let bundle: DatasetBundle = serde_json::from_str(raw)?;
        Self::from_bundle(bundle)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let bundle: DatasetBundle = serde_json::from_reader(reader)?;
        Self::from_bundle(bundle)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    fn from_bundle(bundle: DatasetBundle) -> Result<Self, DatasetError> {
        let catalog = match bundle.categories {
            Some(categories) => TypeCatalog::new(categories, bundle.types)?,
            None => TypeCatalog::from_types(bundle.types)?,
        };
        Self::new(catalog, bundle.questions)
    }

    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    pub fn questions(&self) -> &QuestionSet {
        &self.questions
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}

impl TypeCatalog {
    /// Import a catalog from CSV; category order is the order of first appearance.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let types = parser::parse_type_rows(reader)?;
        Self::from_types(types)
    }

    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path)?;
        Self::from_csv_reader(file)
    }
}
