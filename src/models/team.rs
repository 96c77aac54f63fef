use serde::{Deserialize, Serialize};

use crate::provider::TeamRecord;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    pub name: String,
}

impl From<TeamRecord> for Team {
    fn from(record: TeamRecord) -> Self {
        Self { name: record.name }
    }
}
