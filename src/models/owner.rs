use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::provider::PersonRecord;

/// Avatar shown for owners without one.
pub const UNKNOWN_AVATAR: &str = "/unknown-avatar.png";

/// A person owning organizations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub avatar: String,
    /// Team names, deduplicated and sorted.
    pub teams: BTreeSet<String>,
}

impl Owner {
    pub fn is_in_team(&self, team: &str) -> bool {
        self.teams.contains(team)
    }

    /// The stored avatar, or [`UNKNOWN_AVATAR`] when empty.
    pub fn avatar_or_default(&self) -> &str {
        if self.avatar.is_empty() {
            UNKNOWN_AVATAR
        } else {
            &self.avatar
        }
    }
}

impl From<PersonRecord> for Owner {
    fn from(record: PersonRecord) -> Self {
        Self {
            name: record.name,
            avatar: record.avatar,
            teams: record.teams.into_iter().collect(),
        }
    }
}
