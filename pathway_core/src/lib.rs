//! PathwayKit - learning pathway planning over a skill prerequisite graph
//!
//! This crate provides the core planning engine: given a directed graph of
//! skills and a learner's current competencies, it computes what must be
//! learned to reach a target and orders that work into dependency-consistent
//! modules.
//!
//! # Overview
//!
//! - **Closure**: transitive prerequisite expansion with batched lookups
//! - **Difference**: gap and scaffold skill trees from closure differences
//! - **Gap analysis**: flat competency comparison into level transformations
//! - **Sequencing**: topological and immersive-practice module ordering
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use pathway_core::storage::SkillRepository;
//! use pathway_core::{PathwayPlanner, Skill, SkillId};
//!
//! #[tokio::main]
//! async fn main() -> pathway_core::Result<()> {
//!     let planner = PathwayPlanner::in_memory();
//!     planner.skills().save_skill(&Skill::new("a", "A")).await?;
//!     planner.skills().save_skill(&Skill::new("b", "B").depends_on("a")).await?;
//!
//!     let tree = planner.pairwise_gap(&SkillId::new("a"), &SkillId::new("b")).await?;
//!     for line in tree.outline() {
//!         println!("{}", line);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`]: Skills, competencies, transformations and skill trees
//! - [`error`]: Error types for all operations
//! - [`curriculum`]: Lessons, modules and the curriculum aggregate
//! - [`storage`]: Repository traits and in-memory adapters
//! - [`config`]: Planner configuration
//! - [`graph`]: Prerequisite closure and closure differences
//! - [`gap`]: Competency gap analysis
//! - [`sequence`]: Curriculum sequencing policies
//! - [`planner`]: Request-level entry points

pub mod error;
pub mod types;

pub mod config;
pub mod curriculum;
pub mod gap;
pub mod graph;
pub mod planner;
pub mod sequence;
pub mod storage;

// Re-export commonly used types
pub use config::{DanglingPrerequisitePolicy, PlannerConfig};
pub use curriculum::{Curriculum, CurriculumId, Lesson, LessonId, Module, ModuleId};
pub use error::{PathwayError, Result};
pub use planner::{GeneratedCurriculum, PathwayPlanner, PathwayPlannerBuilder, PlanOutcome};
pub use sequence::{ModulePlan, SequencingStrategy};
pub use types::{
    Competency, LearnerId, LearnerProfile, Skill, SkillId, SkillMap, SkillTree, Transformation,
    MAX_LEVEL, MIN_LEVEL,
};
