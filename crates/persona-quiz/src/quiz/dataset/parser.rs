use serde::{Deserialize, Deserializer};
use std::io::Read;

use crate::quiz::domain::{Category, PersonalityType, TypeId};

/// Read type records from a CSV export with the header
/// `id,category,name,description,detail,color`.
pub(crate) fn parse_type_rows<R: Read>(reader: R) -> Result<Vec<PersonalityType>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut types = Vec::new();

    for record in csv_reader.deserialize::<TypeRow>() {
        let row = record?;
        types.push(row.into_type());
    }

    Ok(types)
}

#[derive(Debug, Deserialize)]
struct TypeRow {
    id: u32,
    #[serde(default)]
    category: String,
    name: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    description: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    detail: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    color: Option<String>,
}

impl TypeRow {
    fn into_type(self) -> PersonalityType {
        PersonalityType {
            id: TypeId(self.id),
            category: Category(self.category),
            name: self.name,
            description: self.description.unwrap_or_default(),
            detail: self.detail.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
        }
    }
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}
