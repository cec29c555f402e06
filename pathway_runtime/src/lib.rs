//! PathwayKit runtime layer - composition root, configuration and seeded data.
//!
//! This crate wires the `pathway_core` planner to in-memory stores and adds:
//!
//! - YAML and environment configuration
//! - The seeded backend developer knowledge graph
//! - A library of named transformations
//! - Request metrics

pub mod catalog;
pub mod config;
pub mod library;
pub mod metrics;
pub mod runtime;

pub use catalog::SeededCatalog;
pub use config::RuntimeConfig;
pub use library::{TransformationDefinition, TransformationLibrary};
pub use metrics::{MetricKind, MetricsSummary, RuntimeMetrics};
pub use runtime::PathwayRuntime;

/// Logs the crate version. Call once after installing a subscriber.
pub fn init() {
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "pathwaykit runtime initialized");
}
