use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::provider::OrgRecord;

/// A tenant the scenarios run against.
///
/// `name` is the join key scenarios use; `owner_name` and `team_name` join
/// against owners and teams by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    pub owner_name: String,
    pub team_name: String,
    /// Username to role.
    pub users: BTreeMap<String, String>,
}

impl From<OrgRecord> for Organization {
    fn from(record: OrgRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            owner_name: record.owner_name,
            team_name: record.team_name,
            users: record.users,
        }
    }
}

/// `"{id}-{name}"` with the name lowercased and spaces turned into hyphens.
pub fn organization_slug(id: &str, name: &str) -> String {
    format!("{}-{}", id, name.to_lowercase().replace(' ', "-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slug_lowercases_and_hyphenates() {
        assert_eq!(organization_slug("42", "Some Org LLC"), "42-some-org-llc");
    }

    #[test]
    fn test_slug_with_empty_components() {
        assert_eq!(organization_slug("", ""), "-");
        assert_eq!(organization_slug("", "Ghost Org"), "-ghost-org");
    }
}
