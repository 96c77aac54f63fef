use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use super::entities::{FeatureRef, OrganizationRef, OwnerRef, ScenarioRef, TeamRef};
use crate::models::*;
use crate::provider::{FeatureData, OrganizationData};

/// An immutable snapshot of the five entity collections.
///
/// Relationships are resolved by key through the hash indexes built here. When
/// a key occurs more than once the first entity in collection order wins, so
/// lookups behave exactly like a front-to-back scan.
#[derive(Debug, Default)]
pub struct Catalog {
    pub(super) owners: Vec<Owner>,
    pub(super) teams: Vec<Team>,
    pub(super) organizations: Vec<Organization>,
    pub(super) features: Vec<Feature>,
    pub(super) scenarios: Vec<Scenario>,
    index: Index,
}

#[derive(Debug, Default)]
struct Index {
    owner_by_name: HashMap<String, usize>,
    team_by_name: HashMap<String, usize>,
    organization_by_id: HashMap<String, usize>,
    organization_by_name: HashMap<String, usize>,
    feature_by_id: HashMap<String, usize>,
    scenario_by_id: HashMap<String, usize>,
    scenarios_by_feature_id: HashMap<String, Vec<usize>>,
    scenarios_by_organization_name: HashMap<String, Vec<usize>>,
}

fn first_wins<'a, T: 'a>(
    items: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
) -> HashMap<String, usize> {
    let mut map = HashMap::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        map.entry(key(item).to_string()).or_insert(i);
    }
    map
}

fn group_by<'a, T: 'a>(
    items: &'a [T],
    key: impl Fn(&'a T) -> &'a str,
) -> HashMap<String, Vec<usize>> {
    let mut map: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, item) in items.iter().enumerate() {
        map.entry(key(item).to_string()).or_default().push(i);
    }
    map
}

impl Catalog {
    /// Build a snapshot from the two provider responses.
    pub fn from_records(org_data: OrganizationData, feature_data: FeatureData) -> Self {
        Self::new(
            org_data.people.into_iter().map(Owner::from).collect(),
            org_data.teams.into_iter().map(Team::from).collect(),
            org_data
                .organizations
                .into_iter()
                .map(Organization::from)
                .collect(),
            feature_data.features.into_iter().map(Feature::from).collect(),
            feature_data
                .scenarios
                .into_iter()
                .map(Scenario::from)
                .collect(),
        )
    }

    pub fn new(
        owners: Vec<Owner>,
        teams: Vec<Team>,
        organizations: Vec<Organization>,
        features: Vec<Feature>,
        scenarios: Vec<Scenario>,
    ) -> Self {
        let index = Index {
            owner_by_name: first_wins(&owners, |o| o.name.as_str()),
            team_by_name: first_wins(&teams, |t| t.name.as_str()),
            organization_by_id: first_wins(&organizations, |o| o.id.as_str()),
            organization_by_name: first_wins(&organizations, |o| o.name.as_str()),
            feature_by_id: first_wins(&features, |f| f.id.as_str()),
            scenario_by_id: first_wins(&scenarios, |s| s.id.as_str()),
            scenarios_by_feature_id: group_by(&scenarios, |s| s.feature_id.as_str()),
            scenarios_by_organization_name: group_by(&scenarios, |s| s.organization_name.as_str()),
        };

        Self {
            owners,
            teams,
            organizations,
            features,
            scenarios,
            index,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.owners.is_empty()
            && self.teams.is_empty()
            && self.organizations.is_empty()
            && self.features.is_empty()
            && self.scenarios.is_empty()
    }

    // ============================================================
    // Collections
    // ============================================================

    pub fn owners(&self) -> impl ExactSizeIterator<Item = OwnerRef<'_>> + '_ {
        (0..self.owners.len()).map(move |i| OwnerRef::new(self, i))
    }

    pub fn teams(&self) -> impl ExactSizeIterator<Item = TeamRef<'_>> + '_ {
        (0..self.teams.len()).map(move |i| TeamRef::new(self, i))
    }

    pub fn organizations(&self) -> impl ExactSizeIterator<Item = OrganizationRef<'_>> + '_ {
        (0..self.organizations.len()).map(move |i| OrganizationRef::new(self, i))
    }

    pub fn features(&self) -> impl ExactSizeIterator<Item = FeatureRef<'_>> + '_ {
        (0..self.features.len()).map(move |i| FeatureRef::new(self, i))
    }

    pub fn scenarios(&self) -> impl ExactSizeIterator<Item = ScenarioRef<'_>> + '_ {
        (0..self.scenarios.len()).map(move |i| ScenarioRef::new(self, i))
    }

    // ============================================================
    // Finders
    // ============================================================

    pub fn find_scenario(&self, id: &str) -> Option<ScenarioRef<'_>> {
        self.index
            .scenario_by_id
            .get(id)
            .map(|&i| ScenarioRef::new(self, i))
    }

    pub fn find_feature(&self, id: &str) -> Option<FeatureRef<'_>> {
        self.index
            .feature_by_id
            .get(id)
            .map(|&i| FeatureRef::new(self, i))
    }

    pub fn find_organization(&self, id: &str) -> Option<OrganizationRef<'_>> {
        self.index
            .organization_by_id
            .get(id)
            .map(|&i| OrganizationRef::new(self, i))
    }

    pub fn find_organization_by_name(&self, name: &str) -> Option<OrganizationRef<'_>> {
        self.index
            .organization_by_name
            .get(name)
            .map(|&i| OrganizationRef::new(self, i))
    }

    pub fn find_owner(&self, name: &str) -> Option<OwnerRef<'_>> {
        self.index
            .owner_by_name
            .get(name)
            .map(|&i| OwnerRef::new(self, i))
    }

    pub fn find_team(&self, name: &str) -> Option<TeamRef<'_>> {
        self.index
            .team_by_name
            .get(name)
            .map(|&i| TeamRef::new(self, i))
    }

    pub(super) fn scenario_indexes_for_feature(&self, feature_id: &str) -> &[usize] {
        self.index
            .scenarios_by_feature_id
            .get(feature_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub(super) fn scenario_indexes_for_organization(&self, name: &str) -> &[usize] {
        self.index
            .scenarios_by_organization_name
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    // ============================================================
    // Table projection
    // ============================================================

    /// One flat row per scenario, in scenario order.
    pub fn scenario_rows(&self) -> Vec<ScenarioRow> {
        self.scenarios().map(|s| ScenarioRow::from(&s)).collect()
    }

    pub fn organization_rows(&self) -> Vec<OrganizationRow> {
        self.organizations()
            .map(|o| OrganizationRow::from(&o))
            .collect()
    }
}

/// A scenario flattened with its resolved feature, organization, owner and
/// team, for tabular display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRow {
    pub scenario: String,
    pub scenario_id: String,
    pub feature: String,
    pub feature_id: String,
    pub organization: String,
    pub organization_id: String,
    pub steps: u32,
    pub examples: u32,
    pub file: String,
    /// Own tags followed by the feature's tags.
    pub tags: Vec<String>,
    pub owner: String,
    pub owner_avatar: String,
    pub team: String,
    pub is_broken: bool,
}

impl From<&ScenarioRef<'_>> for ScenarioRow {
    fn from(s: &ScenarioRef<'_>) -> Self {
        Self {
            scenario: s.name.clone(),
            scenario_id: s.id.clone(),
            feature: s.feature_name().to_string(),
            feature_id: s.feature_id.clone(),
            organization: s.organization_name.clone(),
            organization_id: s.organization_id().to_string(),
            steps: s.steps,
            examples: s.examples,
            file: s.feature_file_path().to_string(),
            tags: s.all_tags(),
            owner: s.organization_owner().to_string(),
            owner_avatar: s.organization_owner_avatar().to_string(),
            team: s.organization_team().to_string(),
            is_broken: s.is_broken(),
        }
    }
}

/// An organization with its resolved owner and team, for tabular display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRow {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub owner: String,
    pub owner_avatar: String,
    pub team: String,
    pub users: BTreeMap<String, String>,
    pub scenario_count: usize,
}

impl From<&OrganizationRef<'_>> for OrganizationRow {
    fn from(o: &OrganizationRef<'_>) -> Self {
        let owner = o.owner();
        Self {
            id: o.id.clone(),
            name: o.name.clone(),
            slug: o.slug(),
            owner: owner.map(|ow| ow.name().to_string()).unwrap_or_default(),
            owner_avatar: owner.map(|ow| ow.avatar().to_string()).unwrap_or_default(),
            team: o.team().map(|t| t.name().to_string()).unwrap_or_default(),
            users: o.users.clone(),
            scenario_count: o.scenarios().count(),
        }
    }
}
