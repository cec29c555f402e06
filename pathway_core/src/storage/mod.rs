//! Repository abstractions consumed by the planner.
//!
//! Persistence lives outside the core: these traits are the seams, and the
//! in-memory adapters in [`memory`] back tests and the runtime composition root.

pub mod memory;

use async_trait::async_trait;

use crate::curriculum::{Curriculum, CurriculumId, Lesson, Module};
use crate::error::Result;
use crate::types::{LearnerId, LearnerProfile, Skill, SkillId};

pub use memory::{InMemoryCurriculumStore, InMemoryLearnerProfileStore, InMemorySkillStore};

/// Lookup of skills by id.
#[async_trait]
pub trait SkillRepository: Send + Sync {
    /// Get a skill by ID
    async fn find_skill_by_id(&self, id: &SkillId) -> Result<Option<Skill>>;

    /// Get every skill that resolves, in request order.
    ///
    /// Missing ids are silently omitted.
    async fn find_skills_by_ids(&self, ids: &[SkillId]) -> Result<Vec<Skill>>;

    /// Store a skill, replacing any previous version
    async fn save_skill(&self, skill: &Skill) -> Result<()>;

    /// List all skills
    async fn all_skills(&self) -> Result<Vec<Skill>>;
}

/// Lookup of learner competency profiles.
#[async_trait]
pub trait LearnerProfileRepository: Send + Sync {
    async fn find_learner_profile_by_id(&self, id: &LearnerId) -> Result<Option<LearnerProfile>>;

    async fn save_learner_profile(&self, profile: &LearnerProfile) -> Result<()>;
}

/// Persistence sinks for computed curricula.
#[async_trait]
pub trait CurriculumRepository: Send + Sync {
    async fn save_curriculum(&self, curriculum: &Curriculum) -> Result<()>;

    async fn save_module(&self, module: &Module) -> Result<()>;

    async fn save_lesson(&self, lesson: &Lesson) -> Result<()>;

    async fn find_curriculum_by_id(&self, id: CurriculumId) -> Result<Option<Curriculum>>;
}
