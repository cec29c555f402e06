//! Planner configuration.

use serde::{Deserialize, Serialize};

use crate::error::{PathwayError, Result};
use crate::sequence::SequencingStrategy;
use crate::types::{MAX_LEVEL, MIN_LEVEL};

/// What to do with a prerequisite id the repository cannot resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DanglingPrerequisitePolicy {
    /// Drop the id from the closure, as if the edge did not exist (default)
    #[default]
    Ignore,
    /// Fail the request with `NotFound`
    Reject,
}

impl std::str::FromStr for DanglingPrerequisitePolicy {
    type Err = PathwayError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "reject" => Ok(Self::Reject),
            other => Err(PathwayError::InvalidInput(format!(
                "unknown dangling prerequisite policy: {}",
                other
            ))),
        }
    }
}

/// Planner configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Strategy used when a request does not name one
    pub default_strategy: String,
    /// Handling of unresolvable prerequisite ids during closure expansion
    pub dangling_prerequisites: DanglingPrerequisitePolicy,
    /// Target level for prerequisites the request does not name directly
    pub implied_prerequisite_level: u8,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            default_strategy: "default".to_string(),
            dangling_prerequisites: DanglingPrerequisitePolicy::Ignore,
            implied_prerequisite_level: MIN_LEVEL,
        }
    }
}

impl PlannerConfig {
    /// Checks that the default strategy is registered and the implied level is in range.
    pub fn validate(&self) -> Result<()> {
        SequencingStrategy::from_name(&self.default_strategy)?;
        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.implied_prerequisite_level) {
            return Err(PathwayError::InvalidInput(format!(
                "implied prerequisite level {} is outside [{}, {}]",
                self.implied_prerequisite_level, MIN_LEVEL, MAX_LEVEL
            )));
        }
        Ok(())
    }
}
