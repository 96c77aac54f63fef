use serde::{Deserialize, Serialize};

use super::Target;
use crate::provider::ScenarioRecord;

/// One executable test case.
///
/// `feature_id` and `organization_name` may point at nothing; accessors that
/// resolve them degrade to empty values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: u32,
    pub examples: u32,
    pub tags: Vec<String>,
    pub feature_id: String,
    pub organization_name: String,
    /// Raw encoded targets, in provider order.
    pub targets: Vec<String>,
    /// `targets` decoded once at construction.
    #[serde(skip)]
    pub parsed_targets: Vec<Target>,
}

impl From<ScenarioRecord> for Scenario {
    fn from(record: ScenarioRecord) -> Self {
        let parsed_targets = record.targets.iter().map(|t| Target::parse(t)).collect();

        Self {
            id: record.id,
            name: record.name,
            description: record.description,
            steps: record.steps,
            examples: record.examples,
            tags: record.tags,
            feature_id: record.feature_id,
            organization_name: record.organization_name,
            targets: record.targets,
            parsed_targets,
        }
    }
}
