//! Runtime configuration loaded from YAML and the environment.

use anyhow::Context;
use pathway_core::{DanglingPrerequisitePolicy, PlannerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Overrides the planner's default strategy name.
pub const ENV_STRATEGY: &str = "PATHWAY_STRATEGY";
/// `ignore` or `reject`.
pub const ENV_DANGLING_PREREQUISITES: &str = "PATHWAY_DANGLING_PREREQUISITES";
/// Target level for implied prerequisites.
pub const ENV_IMPLIED_LEVEL: &str = "PATHWAY_IMPLIED_LEVEL";

/// Runtime configuration.
///
/// ```yaml
/// planner:
///   default_strategy: immersive-practice
///   dangling_prerequisites: reject
///   implied_prerequisite_level: 2
/// seed_catalog: true
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Planner settings
    pub planner: PlannerConfig,
    /// Seed the backend developer knowledge graph on startup
    pub seed_catalog: bool,
}

impl RuntimeConfig {
    /// Parses a YAML document. Missing keys take their defaults.
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse runtime config YAML")
    }

    /// Loads a YAML config file.
    pub async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Default config with overrides from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies the `PATHWAY_*` overrides resolved by `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> anyhow::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(strategy) = lookup(ENV_STRATEGY) {
            self.planner.default_strategy = strategy.trim().to_string();
        }
        if let Some(policy) = lookup(ENV_DANGLING_PREREQUISITES) {
            self.planner.dangling_prerequisites = policy
                .parse::<DanglingPrerequisitePolicy>()
                .with_context(|| format!("Invalid {}", ENV_DANGLING_PREREQUISITES))?;
        }
        if let Some(level) = lookup(ENV_IMPLIED_LEVEL) {
            self.planner.implied_prerequisite_level = level
                .trim()
                .parse::<u8>()
                .with_context(|| format!("Invalid {}: {:?}", ENV_IMPLIED_LEVEL, level))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.planner.validate().context("Invalid planner configuration")
    }
}
