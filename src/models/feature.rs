use serde::{Deserialize, Serialize};

use crate::provider::FeatureRecord;

/// A test file grouping scenarios.
///
/// Features have no foreign keys of their own; their scenarios point back at
/// them through `Scenario::feature_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub id: String,
    pub name: String,
    pub description: String,
    pub file_path: String,
    pub tags: Vec<String>,
}

impl From<FeatureRecord> for Feature {
    fn from(record: FeatureRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            file_path: record.file_path,
            tags: record.tags,
        }
    }
}

/// Whether any tag contains `broken`. Substring match, case-sensitive.
pub fn has_broken_tag<S: AsRef<str>>(tags: &[S]) -> bool {
    tags.iter().any(|t| t.as_ref().contains("broken"))
}
