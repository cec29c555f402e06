//! Common test utilities for PathwayKit integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use pathway_core::storage::{
    InMemoryCurriculumStore, InMemoryLearnerProfileStore, InMemorySkillStore,
    LearnerProfileRepository, SkillRepository,
};
use pathway_core::{
    Competency, LearnerProfile, PathwayPlanner, PlannerConfig, Result, Skill, SkillId,
};

/// A planner plus direct handles on the stores behind it.
pub struct TestPlanner {
    pub planner: PathwayPlanner,
    pub skills: InMemorySkillStore,
    pub learners: InMemoryLearnerProfileStore,
    pub curricula: InMemoryCurriculumStore,
}

/// Creates a planner over empty in-memory stores.
pub fn test_planner(config: PlannerConfig) -> anyhow::Result<TestPlanner> {
    let skills = InMemorySkillStore::new();
    let learners = InMemoryLearnerProfileStore::new();
    let curricula = InMemoryCurriculumStore::new();

    let planner = PathwayPlanner::builder()
        .skills(Arc::new(skills.clone()))
        .learners(Arc::new(learners.clone()))
        .curricula(Arc::new(curricula.clone()))
        .config(config)
        .build()?;

    Ok(TestPlanner {
        planner,
        skills,
        learners,
        curricula,
    })
}

/// Skill repository whose every call fails with `message`.
pub struct UnavailableSkillStore {
    pub message: &'static str,
}

#[async_trait]
impl SkillRepository for UnavailableSkillStore {
    async fn find_skill_by_id(&self, _id: &SkillId) -> Result<Option<Skill>> {
        Err(anyhow::anyhow!(self.message).into())
    }

    async fn find_skills_by_ids(&self, _ids: &[SkillId]) -> Result<Vec<Skill>> {
        Err(anyhow::anyhow!(self.message).into())
    }

    async fn save_skill(&self, _skill: &Skill) -> Result<()> {
        Err(anyhow::anyhow!(self.message).into())
    }

    async fn all_skills(&self) -> Result<Vec<Skill>> {
        Err(anyhow::anyhow!(self.message).into())
    }
}

/// Creates a planner whose skill lookups always fail with `message`.
pub fn unavailable_planner(message: &'static str) -> anyhow::Result<TestPlanner> {
    let skills = InMemorySkillStore::new();
    let learners = InMemoryLearnerProfileStore::new();
    let curricula = InMemoryCurriculumStore::new();

    let planner = PathwayPlanner::builder()
        .skills(Arc::new(UnavailableSkillStore { message }))
        .learners(Arc::new(learners.clone()))
        .curricula(Arc::new(curricula.clone()))
        .build()?;

    Ok(TestPlanner {
        planner,
        skills,
        learners,
        curricula,
    })
}

/// Builds a skill named after its upper-cased id.
pub fn skill(id: &str, prerequisites: &[&str]) -> Skill {
    prerequisites
        .iter()
        .fold(Skill::new(id, id.to_uppercase()), |skill, p| skill.depends_on(*p))
}

/// Stores every skill.
pub async fn seed(store: &InMemorySkillStore, skills: &[Skill]) -> anyhow::Result<()> {
    for skill in skills {
        store.save_skill(skill).await?;
    }
    Ok(())
}

/// Stores a learner holding `competencies`.
pub async fn learner(
    store: &InMemoryLearnerProfileStore,
    id: &str,
    competencies: &[(&str, u8)],
) -> anyhow::Result<LearnerProfile> {
    let mut profile = LearnerProfile::new(id);
    for (skill_id, level) in competencies {
        profile.achieve_competency(Competency::new(*skill_id, *level)?);
    }
    store.save_learner_profile(&profile).await?;
    Ok(profile)
}

/// The A -> B -> C chain (C depends on B, B depends on A).
pub fn chain() -> Vec<Skill> {
    vec![skill("a", &[]), skill("b", &["a"]), skill("c", &["b"])]
}
