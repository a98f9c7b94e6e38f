use std::str::FromStr;

use docforge_core::AppError;
use serde::{Deserialize, Serialize};

/// Stage of the document generation workflow, in forward order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStep {
    /// Choosing the document type.
    SelectType,
    /// Fetching the document config.
    LoadConfig,
    /// Filling in the dynamic form.
    FormEntry,
    /// Reviewing and editing the rendered letter.
    Preview,
    /// Exporting the letter.
    Generate,
}

impl WorkflowStep {
    /// Returns a stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SelectType => "select-type",
            Self::LoadConfig => "load-config",
            Self::FormEntry => "form-entry",
            Self::Preview => "preview",
            Self::Generate => "generate",
        }
    }

    /// Returns the one-based position shown in progress indicators.
    #[must_use]
    pub fn ordinal(&self) -> u8 {
        match self {
            Self::SelectType => 1,
            Self::LoadConfig => 2,
            Self::FormEntry => 3,
            Self::Preview => 4,
            Self::Generate => 5,
        }
    }

    /// Returns the step a "back" action leads to, if any.
    #[must_use]
    pub fn previous(&self) -> Option<Self> {
        match self {
            Self::SelectType => None,
            Self::LoadConfig | Self::FormEntry => Some(Self::SelectType),
            Self::Preview => Some(Self::FormEntry),
            Self::Generate => Some(Self::Preview),
        }
    }
}

impl FromStr for WorkflowStep {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "select-type" => Ok(Self::SelectType),
            "load-config" => Ok(Self::LoadConfig),
            "form-entry" => Ok(Self::FormEntry),
            "preview" => Ok(Self::Preview),
            "generate" => Ok(Self::Generate),
            _ => Err(AppError::Validation(format!(
                "unknown workflow step '{value}'"
            ))),
        }
    }
}
