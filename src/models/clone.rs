use serde::{Deserialize, Serialize};

/// A template organization and the organizations detected as its clones.
///
/// Produced by an external clone detector; the catalog only consumes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneGroup {
    pub template_name: String,
    /// Id of the template organization, when it exists in the catalog.
    pub template_id: Option<String>,
    pub clones: Vec<CloneInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloneInfo {
    pub org_id: String,
    pub org_name: String,
    pub clone_id: String,
}
