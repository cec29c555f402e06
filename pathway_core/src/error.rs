//! Error types for PathwayKit.

use crate::types::SkillId;

/// Main error type for PathwayKit.
///
/// All planning operations return `Result<T> = std::result::Result<T, PathwayError>`.
/// Every variant is fatal to the current request; nothing is retried internally.
#[derive(thiserror::Error, Debug)]
pub enum PathwayError {
    /// A referenced skill or learner profile id does not resolve.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The sequencer found no ready skill while skills remained.
    #[error("Circular dependency detected among skills: {0:?}")]
    CircularDependency(Vec<SkillId>),

    /// No sequencing policy is registered under the requested name.
    #[error("Unknown curriculum strategy: {0}")]
    UnknownStrategy(String),

    /// Request shape or range validation failed.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Failure reported by a repository backend.
    #[error("Repository error: {0}")]
    Repository(#[from] anyhow::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Type alias for Result with PathwayError.
pub type Result<T> = std::result::Result<T, PathwayError>;
