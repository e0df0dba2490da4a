use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::DatasetError;
use crate::quiz::domain::{Category, PersonalityType, Question, TypeId};

/// Immutable, validated list of types grouped by category in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeCatalog {
    types: Vec<PersonalityType>,
    index: HashMap<TypeId, usize>,
    groups: Vec<(Category, Vec<usize>)>,
}

/// Members of one category, in catalog order.
#[derive(Debug, Clone)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub members: Vec<&'a PersonalityType>,
}

impl TypeCatalog {
    /// Build a catalog whose categories follow the supplied display order.
    pub fn new(
        categories: Vec<Category>,
        types: Vec<PersonalityType>,
    ) -> Result<Self, DatasetError> {
        let mut declared = HashSet::new();
        for category in &categories {
            if category.as_str().trim().is_empty() {
                return Err(DatasetError::MalformedCatalog(
                    "category list contains a blank entry".to_string(),
                ));
            }
            if !declared.insert(category) {
                return Err(DatasetError::MalformedCatalog(format!(
                    "category '{category}' is declared more than once"
                )));
            }
        }

        let mut index = HashMap::with_capacity(types.len());
        let mut groups: Vec<(Category, Vec<usize>)> = categories
            .iter()
            .map(|category| (category.clone(), Vec::new()))
            .collect();

        for (position, personality) in types.iter().enumerate() {
            if personality.category.as_str().trim().is_empty() {
                return Err(DatasetError::MalformedCatalog(format!(
                    "type {} has no category",
                    personality.id
                )));
            }
            if index.insert(personality.id, position).is_some() {
                return Err(DatasetError::MalformedCatalog(format!(
                    "type id {} appears more than once",
                    personality.id
                )));
            }

            let group = groups
                .iter_mut()
                .find(|(category, _)| *category == personality.category)
                .ok_or_else(|| {
                    DatasetError::MalformedCatalog(format!(
                        "type {} belongs to undeclared category '{}'",
                        personality.id, personality.category
                    ))
                })?;
            group.1.push(position);
        }

        for (category, members) in &groups {
            if members.is_empty() {
                warn!(%category, "category has no member types and will never produce a result");
            }
        }

        Ok(Self {
            types,
            index,
            groups,
        })
    }

    /// Build a catalog whose category order is the order of first appearance.
    pub fn from_types(types: Vec<PersonalityType>) -> Result<Self, DatasetError> {
        let mut categories: Vec<Category> = Vec::new();
        for personality in &types {
            // Blank categories are left for `new` to report against the type.
            if personality.category.as_str().trim().is_empty() {
                continue;
            }
            if !categories.contains(&personality.category) {
                categories.push(personality.category.clone());
            }
        }
        Self::new(categories, types)
    }

    pub fn get(&self, id: TypeId) -> Option<&PersonalityType> {
        self.index.get(&id).map(|&position| &self.types[position])
    }

    pub fn contains(&self, id: TypeId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn types(&self) -> &[PersonalityType] {
        &self.types
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category> + '_ {
        self.groups.iter().map(|(category, _)| category)
    }

    pub fn groups(&self) -> impl Iterator<Item = CategoryGroup<'_>> + '_ {
        self.groups.iter().map(|(category, members)| CategoryGroup {
            category,
            members: members
                .iter()
                .map(|&position| &self.types[position])
                .collect(),
        })
    }
}

/// Ordered, validated question sequence with a fixed total count.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionSet {
    questions: Vec<Question>,
}

impl QuestionSet {
    pub fn new(questions: Vec<Question>, catalog: &TypeCatalog) -> Result<Self, DatasetError> {
        if questions.is_empty() {
            return Err(DatasetError::EmptyQuestionSet);
        }

        for (position, question) in questions.iter().enumerate() {
            let number = position + 1;
            if question.text.trim().is_empty() {
                return Err(DatasetError::MalformedQuestion {
                    number,
                    reason: "question text is blank".to_string(),
                });
            }
            for rule in &question.scoring {
                if !catalog.contains(rule.type_id) {
                    return Err(DatasetError::MalformedQuestion {
                        number,
                        reason: format!("rule references unknown type id {}", rule.type_id),
                    });
                }
                if !rule.weight.is_finite() {
                    return Err(DatasetError::MalformedQuestion {
                        number,
                        reason: format!("rule for type {} has a non-finite weight", rule.type_id),
                    });
                }
            }
        }

        Ok(Self { questions })
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> + '_ {
        self.questions.iter()
    }
}
