#![allow(dead_code)]

use std::collections::BTreeMap;

use e2e_catalog::provider::*;

pub const BASE_PATH: &str = "/repos/e2e";

pub fn person(name: &str, avatar: &str, teams: &[&str]) -> PersonRecord {
    PersonRecord {
        name: name.to_string(),
        avatar: avatar.to_string(),
        teams: teams.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn team(name: &str) -> TeamRecord {
    TeamRecord {
        name: name.to_string(),
    }
}

pub fn org(id: &str, name: &str, owner: &str, team: &str, users: &[&str]) -> OrgRecord {
    OrgRecord {
        id: id.to_string(),
        name: name.to_string(),
        owner_name: owner.to_string(),
        team_name: team.to_string(),
        users: users
            .iter()
            .map(|u| (u.to_string(), format!("{u}@example.com")))
            .collect::<BTreeMap<_, _>>(),
    }
}

pub fn feature(id: &str, name: &str, tags: &[&str]) -> FeatureRecord {
    FeatureRecord {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        file_path: format!("features/{}.feature", name.to_lowercase()),
        tags: tags.iter().map(|t| t.to_string()).collect(),
    }
}

pub fn scenario(
    id: &str,
    feature_id: &str,
    organization: &str,
    tags: &[&str],
    targets: &[&str],
) -> ScenarioRecord {
    ScenarioRecord {
        id: id.to_string(),
        name: format!("Scenario {id}"),
        steps: 3,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        feature_id: feature_id.to_string(),
        organization_name: organization.to_string(),
        targets: targets.iter().map(|t| t.to_string()).collect(),
        ..Default::default()
    }
}

/// Two teams, two owners, three organizations (one without scenarios), three
/// features (one without scenarios) and four scenarios (one with a dangling
/// organization).
pub fn organization_data() -> OrganizationData {
    OrganizationData {
        people: vec![
            person("ana", "https://avatars.example.com/ana.png", &["core", "billing"]),
            person("bo", "", &["billing"]),
        ],
        teams: vec![team("core"), team("billing")],
        organizations: vec![
            org("1", "Acme Corp", "ana", "core", &["admin", "viewer"]),
            org("2", "Beta LLC", "bo", "billing", &[]),
            org("3", "Empty Org", "ana", "core", &[]),
        ],
    }
}

pub fn feature_data() -> FeatureData {
    FeatureData {
        features: vec![
            feature("f1", "Login", &["@auth"]),
            feature("f2", "Invoices", &["@broken-suite"]),
            feature("f3", "Unused", &[]),
        ],
        scenarios: vec![
            scenario(
                "s1",
                "f1",
                "Acme Corp",
                &["@smoke"],
                &["tasks;/tasks;flag_a,flag_b;2024-01-01", "docs;/docs;flag_b;"],
            ),
            scenario(
                "s2",
                "f1",
                "Acme Corp",
                &["@broken"],
                &["tasks;/tasks;flag_c;2024-01-01,2024-02-01"],
            ),
            scenario("s3", "f2", "Beta LLC", &[], &[]),
            scenario("s4", "f2", "Gone Inc", &[], &["budgets;/financials/budgets;;"]),
        ],
    }
}

pub fn provider() -> StaticProvider {
    StaticProvider::new(organization_data(), feature_data())
}

/// The standard records plus an owner listing a team twice and a team that
/// does not exist, and a scenario pointing at a feature that does not exist.
pub fn loose_records() -> (OrganizationData, FeatureData) {
    let mut orgs = organization_data();
    orgs.people
        .push(person("cy", "", &["core", "core", "ghost"]));

    let mut features = feature_data();
    features
        .scenarios
        .push(scenario("s5", "nope", "Acme Corp", &["@orphan"], &[]));

    (orgs, features)
}
