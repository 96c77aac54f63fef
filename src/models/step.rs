use serde::{Deserialize, Serialize};

/// Gherkin keyword a step definition is registered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKeyword {
    Given,
    When,
    Then,
    And,
    But,
}

impl StepKeyword {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Given => "Given",
            Self::When => "When",
            Self::Then => "Then",
            Self::And => "And",
            Self::But => "But",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Given" => Some(Self::Given),
            "When" => Some(Self::When),
            "Then" => Some(Self::Then),
            "And" => Some(Self::And),
            "But" => Some(Self::But),
            _ => None,
        }
    }
}

/// What a step definition is for, guessed from its keyword and pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StepCategory {
    Navigation,
    Waits,
    Assertions,
    #[serde(rename = "Data Setup")]
    DataSetup,
    Flags,
    Actions,
    Other,
}

impl StepCategory {
    pub const ALL: [StepCategory; 7] = [
        Self::Navigation,
        Self::Waits,
        Self::Assertions,
        Self::DataSetup,
        Self::Flags,
        Self::Actions,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::Waits => "Waits",
            Self::Assertions => "Assertions",
            Self::DataSetup => "Data Setup",
            Self::Flags => "Flags",
            Self::Actions => "Actions",
            Self::Other => "Other",
        }
    }
}

/// One step definition found in the repository's step-definition sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    /// `<file_path>:<line_number>`
    pub id: String,
    pub keyword: StepKeyword,
    /// The regex body or string literal the step is registered with.
    pub pattern: String,
    pub file_path: String,
    /// 1-based.
    pub line_number: usize,
    pub category: StepCategory,
    pub is_problematic: bool,
    pub problem_reason: Option<String>,
}
