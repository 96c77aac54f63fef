//! The catalog store: one shared, reloadable snapshot of the test catalog.
//!
//! # Loading
//!
//! [`DataStore::load_all`] runs the provider calls in sequence (validate the
//! repository, fetch organization data, fetch feature data) and builds the next
//! [`Catalog`] off to the side. Only a load that completes every step and is
//! still the most recent one swaps its snapshot in; the swap replaces all five
//! collections and the status together. Any failure keeps the previous
//! snapshot and leaves the store not loaded.
//!
//! # Status
//!
//! `Empty → Loading → Loaded | Failed`, and `Loaded | Failed → Loading` on
//! every further load or reload. Changes are published on a watch channel
//! (see [`DataStore::subscribe`]).
//!
//! # Concurrency
//!
//! Each load takes a generation number. Before every step, and once more at
//! commit, a load checks its cancellation token and whether a newer load has
//! started since; a stale load ends with [`LoadError::Superseded`] without
//! touching the store.

mod catalog;
mod entities;
mod error;

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

pub use catalog::{Catalog, OrganizationRow, ScenarioRow};
pub use entities::*;
pub use error::LoadError;

use crate::provider::{DataProvider, ProviderError};

/// Lifecycle state of the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadStatus {
    Empty,
    Loading,
    Loaded,
    Failed,
}

impl LoadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Loading => "loading",
            Self::Loaded => "loaded",
            Self::Failed => "failed",
        }
    }
}

/// Point-in-time view of the store's load state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreStatus {
    pub status: LoadStatus,
    pub loaded: bool,
    pub base_path: Option<String>,
    pub loaded_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
    pub generation: u64,
}

struct State {
    catalog: Arc<Catalog>,
    status: LoadStatus,
    base_path: Option<String>,
    loaded_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

struct Inner {
    provider: Arc<dyn DataProvider>,
    state: RwLock<State>,
    generation: AtomicU64,
    status_tx: watch::Sender<LoadStatus>,
}

/// Shared handle to the catalog store. Clones share the same snapshot.
#[derive(Clone)]
pub struct DataStore {
    inner: Arc<Inner>,
}

impl DataStore {
    pub fn new(provider: Arc<dyn DataProvider>) -> Self {
        let (status_tx, _) = watch::channel(LoadStatus::Empty);

        Self {
            inner: Arc::new(Inner {
                provider,
                state: RwLock::new(State {
                    catalog: Arc::new(Catalog::default()),
                    status: LoadStatus::Empty,
                    base_path: None,
                    loaded_at: None,
                    last_error: None,
                }),
                generation: AtomicU64::new(0),
                status_tx,
            }),
        }
    }

    /// The provider loads read from, for reads outside the snapshot.
    pub fn provider(&self) -> Arc<dyn DataProvider> {
        self.inner.provider.clone()
    }

    /// The current snapshot. Holding it does not block reloads.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.inner.state.read().catalog.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.state.read().status == LoadStatus::Loaded
    }

    pub fn base_path(&self) -> Option<String> {
        self.inner.state.read().base_path.clone()
    }

    pub fn status(&self) -> StoreStatus {
        let state = self.inner.state.read();
        StoreStatus {
            status: state.status,
            loaded: state.status == LoadStatus::Loaded,
            base_path: state.base_path.clone(),
            loaded_at: state.loaded_at,
            last_error: state.last_error.clone(),
            generation: self.inner.generation.load(Ordering::SeqCst),
        }
    }

    /// Receive every status change from now on.
    pub fn subscribe(&self) -> watch::Receiver<LoadStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Load the catalog of the repository at `base_path`.
    pub async fn load_all(&self, base_path: &str) -> Result<(), LoadError> {
        self.load_all_with(base_path, &CancellationToken::new())
            .await
    }

    /// Like [`load_all`](Self::load_all), abandoning the load as soon as
    /// `cancel` fires.
    pub async fn load_all_with(
        &self,
        base_path: &str,
        cancel: &CancellationToken,
    ) -> Result<(), LoadError> {
        let generation = self.begin(base_path);

        let result = match self.build_catalog(generation, base_path, cancel).await {
            Ok(catalog) => self.commit(generation, catalog),
            Err(e) => Err(e),
        };

        if let Err(e) = &result {
            self.fail(generation, e);
        }
        result
    }

    /// Load again from the last base path.
    pub async fn reload(&self) -> Result<(), LoadError> {
        let base_path = self.base_path().unwrap_or_default();
        tracing::info!(base_path = %base_path, "Reloading data");
        self.load_all(&base_path).await
    }

    async fn build_catalog(
        &self,
        generation: u64,
        base_path: &str,
        cancel: &CancellationToken,
    ) -> Result<Catalog, LoadError> {
        if base_path.is_empty() {
            return Err(LoadError::Config("base path not found".to_string()));
        }

        let provider = &self.inner.provider;

        tracing::debug!(base_path, generation, "Validating e2e repo");
        let valid = self
            .step(generation, cancel, provider.validate_repo(base_path))
            .await?;
        if !valid {
            return Err(LoadError::RepoNotFound {
                path: base_path.to_string(),
            });
        }

        tracing::debug!(base_path, generation, "Fetching organizations");
        let org_data = self
            .step(generation, cancel, provider.load_organization_data(base_path))
            .await?
            .map_err(provider_error)?;

        tracing::debug!(base_path, generation, "Fetching features");
        let feature_data = self
            .step(generation, cancel, provider.load_feature_data(base_path))
            .await?
            .map_err(provider_error)?;

        self.checkpoint(generation, cancel)?;
        Ok(Catalog::from_records(org_data, feature_data))
    }

    /// Run one provider call, checking for staleness first and giving up as
    /// soon as `cancel` fires.
    async fn step<T>(
        &self,
        generation: u64,
        cancel: &CancellationToken,
        call: impl Future<Output = T>,
    ) -> Result<T, LoadError> {
        self.checkpoint(generation, cancel)?;

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LoadError::Cancelled),
            value = call => Ok(value),
        }
    }

    fn checkpoint(&self, generation: u64, cancel: &CancellationToken) -> Result<(), LoadError> {
        if cancel.is_cancelled() {
            return Err(LoadError::Cancelled);
        }

        let latest = self.inner.generation.load(Ordering::SeqCst);
        if latest != generation {
            return Err(LoadError::Superseded { generation, latest });
        }
        Ok(())
    }

    /// Take the next generation and mark the store loading. Both happen under
    /// the write lock, so no older load can set `Loading` after a newer commit.
    fn begin(&self, base_path: &str) -> u64 {
        let mut state = self.inner.state.write();
        let generation = self.inner.generation.fetch_add(1, Ordering::SeqCst) + 1;

        state.status = LoadStatus::Loading;
        if !base_path.is_empty() {
            state.base_path = Some(base_path.to_string());
        }
        self.inner.status_tx.send_replace(LoadStatus::Loading);
        generation
    }

    fn commit(&self, generation: u64, catalog: Catalog) -> Result<(), LoadError> {
        let counts = (
            catalog.features().len(),
            catalog.scenarios().len(),
            catalog.organizations().len(),
        );

        {
            let mut state = self.inner.state.write();
            let latest = self.inner.generation.load(Ordering::SeqCst);
            if latest != generation {
                return Err(LoadError::Superseded { generation, latest });
            }

            state.catalog = Arc::new(catalog);
            state.status = LoadStatus::Loaded;
            state.loaded_at = Some(Utc::now());
            state.last_error = None;
            self.inner.status_tx.send_replace(LoadStatus::Loaded);
        }

        tracing::info!(
            generation,
            features = counts.0,
            scenarios = counts.1,
            organizations = counts.2,
            "Catalog loaded"
        );
        Ok(())
    }

    fn fail(&self, generation: u64, error: &LoadError) {
        {
            let mut state = self.inner.state.write();
            if self.inner.generation.load(Ordering::SeqCst) != generation {
                tracing::debug!(generation, "Discarding stale load: {}", error);
                return;
            }

            state.status = LoadStatus::Failed;
            state.last_error = Some(error.to_string());
            self.inner.status_tx.send_replace(LoadStatus::Failed);
        }

        tracing::warn!(generation, "Failed to load catalog: {}", error);
    }
}

fn provider_error(e: ProviderError) -> LoadError {
    LoadError::Provider(e.message)
}
