//! JSON bodies served by the HTTP API.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::models::{CloneGroup, StepCategory, StepDefinition, Target};
use crate::store::{
    Catalog, FeatureRef, OrganizationRef, OrganizationRow, OwnerRef, ScenarioRef, ScenarioRow,
    TeamRef,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerSummary {
    pub name: String,
    pub avatar: String,
    pub teams: Vec<String>,
}

impl From<&OwnerRef<'_>> for OwnerSummary {
    fn from(owner: &OwnerRef<'_>) -> Self {
        Self {
            name: owner.name().to_string(),
            avatar: owner.avatar().to_string(),
            teams: owner.teams().iter().map(|t| t.name().to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSummary {
    pub id: String,
    pub name: String,
    pub file_path: String,
    pub tags: Vec<String>,
    pub scenario_count: usize,
    pub is_broken: bool,
}

impl From<&FeatureRef<'_>> for FeatureSummary {
    fn from(feature: &FeatureRef<'_>) -> Self {
        Self {
            id: feature.id.clone(),
            name: feature.name.clone(),
            file_path: feature.file_path.clone(),
            tags: feature.tags.clone(),
            scenario_count: feature.scenarios().count(),
            is_broken: feature.is_broken(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioDetail {
    pub id: String,
    pub name: String,
    pub description: String,
    pub steps: u32,
    pub examples: u32,
    pub tags: Vec<String>,
    pub all_tags: Vec<String>,
    pub feature_id: String,
    pub feature_name: String,
    pub feature_file_path: String,
    pub organization_name: String,
    pub organization_id: String,
    pub organization_slug: String,
    pub organization_owner: String,
    pub organization_owner_avatar: String,
    pub organization_team: String,
    pub organization_users: BTreeMap<String, String>,
    pub targets: Vec<Target>,
    pub flags: Vec<String>,
    pub mock_dates: Vec<String>,
    pub command_max_len: usize,
    pub is_broken: bool,
}

impl From<&ScenarioRef<'_>> for ScenarioDetail {
    fn from(s: &ScenarioRef<'_>) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            description: s.description.clone(),
            steps: s.steps,
            examples: s.examples,
            tags: s.tags.clone(),
            all_tags: s.all_tags(),
            feature_id: s.feature_id.clone(),
            feature_name: s.feature_name().to_string(),
            feature_file_path: s.feature_file_path().to_string(),
            organization_name: s.organization_name.clone(),
            organization_id: s.organization_id().to_string(),
            organization_slug: s.organization_slug(),
            organization_owner: s.organization_owner().to_string(),
            organization_owner_avatar: s.organization_owner_avatar().to_string(),
            organization_team: s.organization_team().to_string(),
            organization_users: s.organization_users().clone(),
            targets: s.parsed_targets().to_vec(),
            flags: s.flags(),
            mock_dates: s.mock_dates(),
            command_max_len: s.command_max_len(),
            is_broken: s.is_broken(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureDetail {
    #[serde(flatten)]
    pub feature: FeatureSummary,
    pub description: String,
    pub organization_id: String,
    pub organization_name: String,
    pub organization_slug: String,
    pub organization_owner: String,
    pub organization_team: String,
    pub organization_users_count: usize,
    pub targets: Vec<String>,
    pub flags: Vec<String>,
    pub mock_dates: Vec<String>,
    pub command_max_len: Option<usize>,
    pub scenarios: Vec<ScenarioRow>,
}

impl From<&FeatureRef<'_>> for FeatureDetail {
    fn from(f: &FeatureRef<'_>) -> Self {
        Self {
            feature: FeatureSummary::from(f),
            description: f.description.clone(),
            organization_id: f.organization_id().to_string(),
            organization_name: f.organization_name().to_string(),
            organization_slug: f.organization_slug(),
            organization_owner: f.organization_owner().to_string(),
            organization_team: f.organization_team().to_string(),
            organization_users_count: f.organization_users_count(),
            targets: f.targets(),
            flags: f.flags(),
            mock_dates: f.mock_dates(),
            command_max_len: f.command_max_len(),
            scenarios: f.scenarios().map(|s| ScenarioRow::from(&s)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDetail {
    #[serde(flatten)]
    pub organization: OrganizationRow,
    pub scenarios: Vec<ScenarioRow>,
}

impl From<&OrganizationRef<'_>> for OrganizationDetail {
    fn from(o: &OrganizationRef<'_>) -> Self {
        Self {
            organization: OrganizationRow::from(o),
            scenarios: o.scenarios().map(|s| ScenarioRow::from(&s)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerDetail {
    #[serde(flatten)]
    pub owner: OwnerSummary,
    pub organizations: Vec<OrganizationRow>,
    pub features: Vec<FeatureSummary>,
    pub scenarios: Vec<ScenarioRow>,
}

impl From<&OwnerRef<'_>> for OwnerDetail {
    fn from(owner: &OwnerRef<'_>) -> Self {
        Self {
            owner: OwnerSummary::from(owner),
            organizations: owner
                .organizations()
                .map(|o| OrganizationRow::from(&o))
                .collect(),
            features: owner.features().map(|f| FeatureSummary::from(&f)).collect(),
            scenarios: owner.scenarios().map(|s| ScenarioRow::from(&s)).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamDetail {
    pub name: String,
    pub members: Vec<OwnerSummary>,
    pub organizations: Vec<OrganizationRow>,
    pub features: Vec<FeatureSummary>,
    pub scenarios: Vec<ScenarioRow>,
}

impl From<&TeamRef<'_>> for TeamDetail {
    fn from(team: &TeamRef<'_>) -> Self {
        Self {
            name: team.name().to_string(),
            members: team.members().map(|o| OwnerSummary::from(&o)).collect(),
            organizations: team
                .organizations()
                .map(|o| OrganizationRow::from(&o))
                .collect(),
            features: team.features().map(|f| FeatureSummary::from(&f)).collect(),
            scenarios: team.scenarios().map(|s| ScenarioRow::from(&s)).collect(),
        }
    }
}

/// Every organization, team and owner of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationsResponse {
    pub organizations: Vec<OrganizationRow>,
    pub teams: Vec<String>,
    pub owners: Vec<OwnerSummary>,
}

impl From<&Catalog> for OrganizationsResponse {
    fn from(catalog: &Catalog) -> Self {
        Self {
            organizations: catalog.organization_rows(),
            teams: catalog.teams().map(|t| t.name().to_string()).collect(),
            owners: catalog.owners().map(|o| OwnerSummary::from(&o)).collect(),
        }
    }
}

/// `(id, name)` of one organization, as handed to the clone detector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneCandidate {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PartitionRequest {
    pub groups: Vec<CloneGroup>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartitionResponse {
    pub templates: Vec<OrganizationRow>,
    pub clones: Vec<OrganizationRow>,
}

/// Query of `GET /features/{id}/source`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceQuery {
    /// Id of one of the feature's scenarios; the whole file when absent.
    pub scenario: Option<String>,
}

/// Numbered listing of a feature file or one of its scenarios.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureSource {
    pub feature_id: String,
    pub scenario_id: Option<String>,
    pub file_path: String,
    pub contents: String,
}

/// Query of `GET /steps`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepsQuery {
    pub category: Option<StepCategory>,
    pub problematic: Option<bool>,
}

impl StepsQuery {
    pub fn matches(&self, step: &StepDefinition) -> bool {
        self.category.map_or(true, |c| step.category == c)
            && self.problematic.map_or(true, |p| step.is_problematic == p)
    }
}
