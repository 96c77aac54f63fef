//! Boundary to the backend that reads a test repository.
//!
//! The store only ever talks to a [`DataProvider`]. Records returned here are
//! raw: relationships are carried as names and ids and resolved later by the
//! catalog.

mod fs;
mod gherkin;
mod mock;
mod source;
mod steps;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use fs::FsProvider;
pub use gherkin::read_feature;
pub use mock::StaticProvider;
pub use source::{excerpt, read_source};
pub use steps::{categorize, parse_step_definitions, read_step_definitions};

use crate::models::StepDefinition;

/// Error payload of a failed data fetch. The message is shown to users as-is.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A person owning organizations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonRecord {
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub teams: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRecord {
    pub name: String,
}

/// An organization. `owner_name` and `team_name` are join keys, not ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrgRecord {
    pub id: String,
    pub name: String,
    pub owner_name: String,
    pub team_name: String,
    /// Username to role.
    #[serde(default)]
    pub users: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub file_path: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Encoded `name;url;flag;date` target strings.
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub steps: u32,
    #[serde(default)]
    pub examples: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    pub feature_id: String,
    pub organization_name: String,
}

/// Response of [`DataProvider::load_organization_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationData {
    pub people: Vec<PersonRecord>,
    pub teams: Vec<TeamRecord>,
    pub organizations: Vec<OrgRecord>,
}

/// Response of [`DataProvider::load_feature_data`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureData {
    pub features: Vec<FeatureRecord>,
    pub scenarios: Vec<ScenarioRecord>,
}

/// Source of raw catalog records.
///
/// Every call receives the repository base path the store was asked to load.
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Whether `path` points at a usable test repository.
    async fn validate_repo(&self, path: &str) -> bool;

    async fn load_organization_data(&self, path: &str) -> Result<OrganizationData, ProviderError>;

    async fn load_feature_data(&self, path: &str) -> Result<FeatureData, ProviderError>;

    /// Step definitions registered in the repository at `path`.
    async fn load_step_definitions(&self, path: &str)
        -> Result<Vec<StepDefinition>, ProviderError>;

    /// Numbered listing of the feature file at `file_path`, or of one scenario
    /// block in it.
    async fn read_source(
        &self,
        file_path: &str,
        scenario: Option<&str>,
    ) -> Result<String, ProviderError>;
}
