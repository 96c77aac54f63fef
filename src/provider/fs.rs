//! Provider reading a checked-out test repository from disk.
//!
//! Layout:
//!
//! ```text
//! <base>/package.json              repository marker
//! <base>/data/organizations.yml    org name -> { id, blame, team, users }
//! <base>/data/avatars.yml          person name -> avatar url (optional)
//! <base>/features/**/*.feature     Gherkin features
//! <base>/features/step-definitions  step implementations (`.ts`/`.js`)
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use walkdir::WalkDir;

use super::*;

const DATA_DIR: &str = "data";
const FEATURES_DIR: &str = "features";
const STEP_DEFINITIONS_DIR: &str = "step-definitions";
const ORGANIZATIONS_FILE: &str = "organizations.yml";
const AVATARS_FILE: &str = "avatars.yml";

/// One entry of `organizations.yml`; the map key is the organization name.
#[derive(Debug, Deserialize)]
struct OrgEntry {
    id: String,
    blame: String,
    team: String,
    #[serde(default)]
    users: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default)]
pub struct FsProvider {
    repository_url: Option<String>,
}

impl FsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only accept repositories whose `package.json` points at this URL.
    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }
}

#[async_trait]
impl DataProvider for FsProvider {
    async fn validate_repo(&self, path: &str) -> bool {
        let path = path.to_string();
        let expected = self.repository_url.clone();
        tokio::task::spawn_blocking(move || is_repo(Path::new(&path), expected.as_deref()))
            .await
            .unwrap_or(false)
    }

    async fn load_organization_data(&self, path: &str) -> Result<OrganizationData, ProviderError> {
        let data_dir = Path::new(path).join(DATA_DIR);
        tokio::task::spawn_blocking(move || read_organizations(&data_dir))
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?
    }

    async fn load_feature_data(&self, path: &str) -> Result<FeatureData, ProviderError> {
        let features_dir = Path::new(path).join(FEATURES_DIR);
        tokio::task::spawn_blocking(move || read_features(&features_dir))
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?
    }

    async fn load_step_definitions(
        &self,
        path: &str,
    ) -> Result<Vec<StepDefinition>, ProviderError> {
        let steps_dir = Path::new(path)
            .join(FEATURES_DIR)
            .join(STEP_DEFINITIONS_DIR);
        tokio::task::spawn_blocking(move || read_step_definitions(&steps_dir))
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?
    }

    async fn read_source(
        &self,
        file_path: &str,
        scenario: Option<&str>,
    ) -> Result<String, ProviderError> {
        let file_path = file_path.to_string();
        let scenario = scenario.map(str::to_string);
        tokio::task::spawn_blocking(move || {
            read_source(Path::new(&file_path), scenario.as_deref())
        })
        .await
        .map_err(|e| ProviderError::new(e.to_string()))?
    }
}

fn is_repo(path: &Path, expected_url: Option<&str>) -> bool {
    if !path.is_dir() {
        return false;
    }

    let Ok(contents) = std::fs::read_to_string(path.join("package.json")) else {
        return false;
    };
    let Ok(json) = serde_json::from_str::<serde_json::Value>(&contents) else {
        return false;
    };

    match json.pointer("/repository/url").and_then(|v| v.as_str()) {
        Some(url) => expected_url.map_or(true, |expected| url == expected),
        None => false,
    }
}

fn read_organizations(data_dir: &Path) -> Result<OrganizationData, ProviderError> {
    let org_file = File::open(data_dir.join(ORGANIZATIONS_FILE))
        .map_err(|_| ProviderError::new("organization file not found"))?;
    let entries: BTreeMap<String, OrgEntry> = serde_yaml::from_reader(BufReader::new(org_file))
        .map_err(|_| ProviderError::new("organization file invalid YAML"))?;

    let avatars: BTreeMap<String, String> = match File::open(data_dir.join(AVATARS_FILE)) {
        Ok(file) => serde_yaml::from_reader(BufReader::new(file))
            .map_err(|_| ProviderError::new("avatars file invalid YAML"))?,
        Err(_) => BTreeMap::new(),
    };

    let mut people: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    let mut teams = BTreeSet::new();
    let mut organizations = Vec::with_capacity(entries.len());

    for (name, entry) in entries {
        people
            .entry(entry.blame.clone())
            .or_default()
            .insert(entry.team.clone());
        teams.insert(entry.team.clone());

        organizations.push(OrgRecord {
            id: entry.id,
            name,
            owner_name: entry.blame,
            team_name: entry.team,
            users: entry.users,
        });
    }

    let people = people
        .into_iter()
        .map(|(name, teams)| PersonRecord {
            avatar: avatars.get(&name).cloned().unwrap_or_default(),
            name,
            teams: teams.into_iter().collect(),
        })
        .collect();

    Ok(OrganizationData {
        people,
        teams: teams.into_iter().map(|name| TeamRecord { name }).collect(),
        organizations,
    })
}

fn read_features(features_dir: &Path) -> Result<FeatureData, ProviderError> {
    let mut data = FeatureData::default();

    let files = WalkDir::new(features_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| e.path().extension().and_then(|ext| ext.to_str()) == Some("feature"));

    for entry in files {
        let path = entry.path();
        let file = File::open(path).map_err(|e| ProviderError::new(e.to_string()))?;
        let (feature, scenarios) =
            read_feature(BufReader::new(file), &path.to_string_lossy())
                .map_err(|e| ProviderError::new(e.to_string()))?;

        data.features.push(feature);
        data.scenarios.extend(scenarios);
    }

    tracing::debug!(
        features = data.features.len(),
        scenarios = data.scenarios.len(),
        "Read feature files"
    );
    Ok(data)
}
