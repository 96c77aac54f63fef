//! Dashboard rollups over a catalog snapshot.
//!
//! Every function recomputes from the snapshot it is given; nothing is
//! maintained incrementally.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::store::{Catalog, OrganizationRef, OrganizationRow, ScenarioRef, ScenarioRow};

/// Group label for scenarios without a resolved team or owner.
pub const UNASSIGNED: &str = "Unassigned";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub feature_count: usize,
    pub scenario_count: usize,
    pub organization_count: usize,
    pub team_count: usize,
    pub owner_count: usize,
    pub broken_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamBreakdown {
    pub team: String,
    pub scenario_count: usize,
    pub broken_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnerBreakdown {
    pub owner: String,
    pub avatar: String,
    pub scenario_count: usize,
    pub broken_count: usize,
}

/// Everything the dashboard shows, computed from one snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub stats: DashboardStats,
    pub broken_scenarios: Vec<ScenarioRow>,
    pub orgs_without_tests: Vec<OrganizationRow>,
    pub team_breakdown: Vec<TeamBreakdown>,
    pub owner_breakdown: Vec<OwnerBreakdown>,
}

pub fn report(catalog: &Catalog) -> DashboardReport {
    DashboardReport {
        stats: get_stats(catalog),
        broken_scenarios: get_broken_scenarios(catalog)
            .iter()
            .map(ScenarioRow::from)
            .collect(),
        orgs_without_tests: get_orgs_without_tests(catalog)
            .iter()
            .map(OrganizationRow::from)
            .collect(),
        team_breakdown: get_team_breakdown(catalog),
        owner_breakdown: get_owner_breakdown(catalog),
    }
}

pub fn get_stats(catalog: &Catalog) -> DashboardStats {
    DashboardStats {
        feature_count: catalog.features().len(),
        scenario_count: catalog.scenarios().len(),
        organization_count: catalog.organizations().len(),
        team_count: catalog.teams().len(),
        owner_count: catalog.owners().len(),
        broken_count: catalog.scenarios().filter(|s| s.is_broken()).count(),
    }
}

/// Broken scenarios in catalog order.
pub fn get_broken_scenarios(catalog: &Catalog) -> Vec<ScenarioRef<'_>> {
    catalog.scenarios().filter(|s| s.is_broken()).collect()
}

/// Organizations whose name no scenario references.
pub fn get_orgs_without_tests(catalog: &Catalog) -> Vec<OrganizationRef<'_>> {
    let referenced: HashSet<&str> = catalog
        .scenarios()
        .map(|s| s.data().organization_name.as_str())
        .collect();

    catalog
        .organizations()
        .filter(|o| !referenced.contains(o.data().name.as_str()))
        .collect()
}

/// Scenario counts grouped by resolved team, largest group first.
pub fn get_team_breakdown(catalog: &Catalog) -> Vec<TeamBreakdown> {
    group_scenarios(catalog, |s| (s.organization_team(), ""))
        .into_iter()
        .map(|g| TeamBreakdown {
            team: g.key,
            scenario_count: g.scenario_count,
            broken_count: g.broken_count,
        })
        .collect()
}

/// Scenario counts grouped by resolved owner, largest group first. Each group
/// carries the avatar seen on its first scenario.
pub fn get_owner_breakdown(catalog: &Catalog) -> Vec<OwnerBreakdown> {
    group_scenarios(catalog, |s| {
        (s.organization_owner(), s.organization_owner_avatar())
    })
    .into_iter()
    .map(|g| OwnerBreakdown {
        owner: g.key,
        avatar: g.avatar,
        scenario_count: g.scenario_count,
        broken_count: g.broken_count,
    })
    .collect()
}

struct Group {
    key: String,
    avatar: String,
    scenario_count: usize,
    broken_count: usize,
}

/// Group scenarios by the key returned from `key_of`, substituting
/// [`UNASSIGNED`] for empty keys. Groups are sorted by scenario count
/// descending; ties keep first-appearance order.
fn group_scenarios<'a, F>(catalog: &'a Catalog, key_of: F) -> Vec<Group>
where
    F: Fn(&ScenarioRef<'a>) -> (&'a str, &'a str),
{
    let mut groups: Vec<Group> = Vec::new();
    let mut positions: HashMap<&'a str, usize> = HashMap::new();

    for scenario in catalog.scenarios() {
        let (key, avatar) = key_of(&scenario);
        let key = if key.is_empty() { UNASSIGNED } else { key };
        let broken = usize::from(scenario.is_broken());

        match positions.get(key) {
            Some(&i) => {
                groups[i].scenario_count += 1;
                groups[i].broken_count += broken;
            }
            None => {
                positions.insert(key, groups.len());
                groups.push(Group {
                    key: key.to_string(),
                    avatar: avatar.to_string(),
                    scenario_count: 1,
                    broken_count: broken,
                });
            }
        }
    }

    // sort_by is stable
    groups.sort_by(|a, b| b.scenario_count.cmp(&a.scenario_count));
    groups
}
