use thiserror::Error;

/// Why a load did not commit a new snapshot.
///
/// Lookup misses are not errors; finders and relationship accessors return
/// `Option` or empty values instead.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("{0}")]
    Config(String),

    #[error("e2e repo not found: {path}")]
    RepoNotFound { path: String },

    /// Message of the provider's error payload, passed through verbatim.
    #[error("{0}")]
    Provider(String),

    #[error("load cancelled")]
    Cancelled,

    #[error("load superseded by generation {latest}")]
    Superseded { generation: u64, latest: u64 },
}

impl LoadError {
    /// True for loads abandoned in favour of another one rather than failed.
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Superseded { .. })
    }
}
