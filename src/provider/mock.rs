//! In-memory provider for tests and demos.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::*;

/// Provider answering from canned responses.
///
/// Responses can be swapped between loads, and each call is counted so tests
/// can assert which steps a load reached.
pub struct StaticProvider {
    valid: Mutex<bool>,
    organizations: Mutex<Result<OrganizationData, ProviderError>>,
    features: Mutex<Result<FeatureData, ProviderError>>,
    steps: Mutex<Result<Vec<StepDefinition>, ProviderError>>,
    /// File path to file contents.
    sources: Mutex<HashMap<String, String>>,
    organization_delays: Mutex<VecDeque<Duration>>,
    validate_calls: AtomicUsize,
    organization_calls: AtomicUsize,
    feature_calls: AtomicUsize,
}

impl StaticProvider {
    pub fn new(organizations: OrganizationData, features: FeatureData) -> Self {
        Self {
            valid: Mutex::new(true),
            organizations: Mutex::new(Ok(organizations)),
            features: Mutex::new(Ok(features)),
            steps: Mutex::new(Ok(Vec::new())),
            sources: Mutex::new(HashMap::new()),
            organization_delays: Mutex::new(VecDeque::new()),
            validate_calls: AtomicUsize::new(0),
            organization_calls: AtomicUsize::new(0),
            feature_calls: AtomicUsize::new(0),
        }
    }

    pub fn empty() -> Self {
        Self::new(OrganizationData::default(), FeatureData::default())
    }

    pub fn set_valid(&self, valid: bool) {
        *self.valid.lock() = valid;
    }

    pub fn set_organizations(&self, response: Result<OrganizationData, ProviderError>) {
        *self.organizations.lock() = response;
    }

    pub fn set_features(&self, response: Result<FeatureData, ProviderError>) {
        *self.features.lock() = response;
    }

    pub fn set_steps(&self, response: Result<Vec<StepDefinition>, ProviderError>) {
        *self.steps.lock() = response;
    }

    /// Serve `contents` as the file at `file_path`.
    pub fn set_source(&self, file_path: impl Into<String>, contents: impl Into<String>) {
        self.sources.lock().insert(file_path.into(), contents.into());
    }

    /// Delay the next organization fetch. Queued delays are used one per call.
    pub fn delay_next_organization_fetch(&self, delay: Duration) {
        self.organization_delays.lock().push_back(delay);
    }

    pub fn validate_calls(&self) -> usize {
        self.validate_calls.load(Ordering::SeqCst)
    }

    pub fn organization_calls(&self) -> usize {
        self.organization_calls.load(Ordering::SeqCst)
    }

    pub fn feature_calls(&self) -> usize {
        self.feature_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataProvider for StaticProvider {
    async fn validate_repo(&self, _path: &str) -> bool {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        *self.valid.lock()
    }

    async fn load_organization_data(&self, _path: &str) -> Result<OrganizationData, ProviderError> {
        self.organization_calls.fetch_add(1, Ordering::SeqCst);
        // Response is captured before waiting, like a request already in flight.
        let response = self.organizations.lock().clone();
        let delay = self.organization_delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        response
    }

    async fn load_feature_data(&self, _path: &str) -> Result<FeatureData, ProviderError> {
        self.feature_calls.fetch_add(1, Ordering::SeqCst);
        self.features.lock().clone()
    }

    async fn load_step_definitions(
        &self,
        _path: &str,
    ) -> Result<Vec<StepDefinition>, ProviderError> {
        self.steps.lock().clone()
    }

    async fn read_source(
        &self,
        file_path: &str,
        scenario: Option<&str>,
    ) -> Result<String, ProviderError> {
        let contents = self
            .sources
            .lock()
            .get(file_path)
            .cloned()
            .ok_or_else(|| ProviderError::new("Invalid file path"))?;
        excerpt(&contents, scenario)
    }
}
