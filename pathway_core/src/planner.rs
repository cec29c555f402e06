//! Planner service - the request-level entry points.
//!
//! [`PathwayPlanner`] owns the repository handles and configuration and wires
//! closure expansion, gap analysis and sequencing into whole requests. Every
//! request validates its input before the first repository call and persists
//! nothing until the full module list has been computed.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::info;

use crate::config::PlannerConfig;
use crate::curriculum::{materialize_module, Curriculum, CurriculumId, Module};
use crate::error::{PathwayError, Result};
use crate::gap::competency_gap;
use crate::graph::{PrerequisiteClosure, SetDifferenceExtractor};
use crate::sequence::SequencingStrategy;
use crate::storage::{
    CurriculumRepository, InMemoryCurriculumStore, InMemoryLearnerProfileStore,
    InMemorySkillStore, LearnerProfileRepository, SkillRepository,
};
use crate::types::{Competency, LearnerId, Skill, SkillId, SkillMap, SkillTree, Transformation};

/// Result of [`PathwayPlanner::plan_curriculum`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PlanOutcome {
    /// The learner already meets every target; nothing was persisted.
    UpToDate,
    /// A curriculum was computed and persisted.
    Planned {
        curriculum_id: CurriculumId,
        module_count: usize,
        lesson_count: usize,
    },
}

impl PlanOutcome {
    pub fn curriculum_id(&self) -> Option<CurriculumId> {
        match self {
            Self::UpToDate => None,
            Self::Planned { curriculum_id, .. } => Some(*curriculum_id),
        }
    }

    pub fn is_up_to_date(&self) -> bool {
        matches!(self, Self::UpToDate)
    }
}

/// Summary returned by [`PathwayPlanner::generate_curriculum`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedCurriculum {
    pub curriculum_id: CurriculumId,
    pub module_count: usize,
    pub lesson_count: usize,
}

/// Entry point for gap, scaffold and curriculum planning requests.
///
/// # Examples
///
/// ```rust,no_run
/// use pathway_core::{Competency, LearnerId, PathwayPlanner};
///
/// # #[tokio::main]
/// # async fn main() -> pathway_core::Result<()> {
/// let planner = PathwayPlanner::in_memory();
/// let outcome = planner
///     .plan_curriculum(&LearnerId::new("learner-1"), &[Competency::new("cqrs", 2)?], None)
///     .await?;
/// println!("{:?}", outcome);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct PathwayPlanner {
    skills: Arc<dyn SkillRepository>,
    learners: Arc<dyn LearnerProfileRepository>,
    curricula: Arc<dyn CurriculumRepository>,
    config: PlannerConfig,
}

impl PathwayPlanner {
    /// Creates a planner with the default configuration.
    pub fn new(
        skills: Arc<dyn SkillRepository>,
        learners: Arc<dyn LearnerProfileRepository>,
        curricula: Arc<dyn CurriculumRepository>,
    ) -> Self {
        Self {
            skills,
            learners,
            curricula,
            config: PlannerConfig::default(),
        }
    }

    /// Creates a planner over fresh in-memory stores.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemorySkillStore::new()),
            Arc::new(InMemoryLearnerProfileStore::new()),
            Arc::new(InMemoryCurriculumStore::new()),
        )
    }

    pub fn builder() -> PathwayPlannerBuilder {
        PathwayPlannerBuilder::new()
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn skills(&self) -> &Arc<dyn SkillRepository> {
        &self.skills
    }

    pub fn learners(&self) -> &Arc<dyn LearnerProfileRepository> {
        &self.learners
    }

    pub fn curricula(&self) -> &Arc<dyn CurriculumRepository> {
        &self.curricula
    }

    fn closure(&self) -> PrerequisiteClosure<'_> {
        PrerequisiteClosure::new(self.skills.as_ref()).with_policy(self.config.dangling_prerequisites)
    }

    async fn require_skill(&self, id: &SkillId) -> Result<Skill> {
        self.skills
            .find_skill_by_id(id)
            .await?
            .ok_or_else(|| PathwayError::NotFound(format!("skill {}", id)))
    }

    /// Skills required by `b` that `a` does not already imply.
    pub async fn pairwise_gap(&self, a: &SkillId, b: &SkillId) -> Result<SkillTree> {
        a.validate()?;
        b.validate()?;
        let skill_a = self.require_skill(a).await?;
        let skill_b = self.require_skill(b).await?;

        SetDifferenceExtractor::new(self.closure())
            .difference(&skill_a, &skill_b)
            .await
    }

    /// Skills needed to get from `start` to `end`, excluding `start`.
    pub async fn scaffold(&self, start: &SkillId, end: &SkillId) -> Result<SkillTree> {
        start.validate()?;
        end.validate()?;
        let start_skill = self.require_skill(start).await?;
        let end_skill = self.require_skill(end).await?;

        SetDifferenceExtractor::new(self.closure())
            .scaffold(&start_skill, &end_skill)
            .await
    }

    /// Skills on the generic path from `start` that the ideal path does not need.
    ///
    /// Order follows the generic path. An empty result means the generic path
    /// is already optimal.
    pub async fn non_essential_skills(
        &self,
        start: &SkillId,
        generic_end: &SkillId,
        ideal_end: &SkillId,
    ) -> Result<Vec<Skill>> {
        ideal_end.validate()?;
        let generic = self.scaffold(start, generic_end).await?;
        let ideal = self.scaffold(start, ideal_end).await?;

        Ok(generic
            .skills
            .into_iter()
            .filter(|skill| !ideal.contains(&skill.id))
            .collect())
    }

    fn resolve_strategy(&self, name: Option<&str>) -> Result<SequencingStrategy> {
        let name = name.unwrap_or(&self.config.default_strategy);
        if name.trim().is_empty() {
            return Err(PathwayError::InvalidInput("strategy name cannot be empty".to_string()));
        }
        SequencingStrategy::from_name(name)
    }

    /// Plans and persists a curriculum that takes `learner_id` to `targets`.
    ///
    /// `strategy` names a sequencing policy; `None` uses the configured
    /// default. Returns [`PlanOutcome::UpToDate`] without touching the
    /// curriculum repository when the learner already meets every target.
    pub async fn plan_curriculum(
        &self,
        learner_id: &LearnerId,
        targets: &[Competency],
        strategy: Option<&str>,
    ) -> Result<PlanOutcome> {
        learner_id.validate()?;
        for target in targets {
            target.validate()?;
        }
        let strategy = self.resolve_strategy(strategy)?;

        let profile = self
            .learners
            .find_learner_profile_by_id(learner_id)
            .await?
            .ok_or_else(|| PathwayError::NotFound(format!("learner profile {}", learner_id)))?;

        let initial_gap = competency_gap(&profile.competencies, targets);
        if initial_gap.is_empty() {
            info!(learner = %learner_id, "learner already meets all targets");
            return Ok(PlanOutcome::UpToDate);
        }

        let seed_ids: IndexSet<SkillId> = initial_gap.iter().map(|t| t.skill_id.clone()).collect();
        let seed_ids: Vec<SkillId> = seed_ids.into_iter().collect();
        let seeds = self.skills.find_skills_by_ids(&seed_ids).await?;
        if seeds.len() < seed_ids.len() {
            let found: HashSet<&SkillId> = seeds.iter().map(|skill| &skill.id).collect();
            let missing: Vec<String> = seed_ids
                .iter()
                .filter(|id| !found.contains(id))
                .map(|id| id.to_string())
                .collect();
            return Err(PathwayError::NotFound(format!("target skills {}", missing.join(", "))));
        }

        let working_set = self.closure().closure_of(&seeds).await?;
        let full_targets = self.full_targets(&working_set, targets)?;
        let full_gap = competency_gap(&profile.competencies, &full_targets);

        let plans = strategy.sequence(&full_gap, &working_set)?;
        if plans.is_empty() {
            info!(learner = %learner_id, "sequencing produced no work");
            return Ok(PlanOutcome::UpToDate);
        }

        let modules: Vec<Module> = plans
            .into_iter()
            .map(|plan| materialize_module(plan.position, plan.transformations, &working_set))
            .collect();
        let curriculum = Curriculum::new(
            format!("Pathway for {}", learner_id),
            Some(learner_id.clone()),
            targets.to_vec(),
            modules,
        )?;

        self.persist(&curriculum).await?;
        info!(
            curriculum = %curriculum.id,
            learner = %learner_id,
            strategy = strategy.name(),
            modules = curriculum.modules.len(),
            lessons = curriculum.lesson_count(),
            "persisted curriculum"
        );

        Ok(PlanOutcome::Planned {
            curriculum_id: curriculum.id,
            module_count: curriculum.modules.len(),
            lesson_count: curriculum.lesson_count(),
        })
    }

    /// Target for every skill in the working set: the requested one, or the implied level.
    fn full_targets(&self, working_set: &SkillMap, targets: &[Competency]) -> Result<Vec<Competency>> {
        working_set
            .keys()
            .map(|id| match targets.iter().find(|t| &t.skill_id == id) {
                Some(target) => Ok(target.clone()),
                None => Competency::new(id.clone(), self.config.implied_prerequisite_level),
            })
            .collect()
    }

    /// Turns a skill tree into a curriculum with one single-lesson module per skill.
    ///
    /// Modules follow the tree's skill order, not its prerequisite order.
    pub async fn generate_curriculum(&self, title: &str, tree: &SkillTree) -> Result<GeneratedCurriculum> {
        if title.trim().is_empty() {
            return Err(PathwayError::InvalidInput("curriculum title cannot be empty".to_string()));
        }
        if tree.is_empty() {
            return Err(PathwayError::InvalidInput(
                "cannot create an empty curriculum: the skill tree has no skills".to_string(),
            ));
        }

        let skills: SkillMap = tree.skills.iter().map(|s| (s.id.clone(), s.clone())).collect();
        let mut modules = Vec::with_capacity(tree.skills.len());
        for (i, skill) in tree.skills.iter().enumerate() {
            let transformation =
                Transformation::new(skill.id.clone(), 0, self.config.implied_prerequisite_level)?;
            let mut module = materialize_module(i + 1, vec![transformation], &skills);
            module.name = format!("Module: {}", skill.name);
            modules.push(module);
        }

        let curriculum = Curriculum::new(title, None, Vec::new(), modules)?;
        self.persist(&curriculum).await?;
        info!(curriculum = %curriculum.id, modules = curriculum.modules.len(), "generated curriculum from skill tree");

        Ok(GeneratedCurriculum {
            curriculum_id: curriculum.id,
            module_count: curriculum.modules.len(),
            lesson_count: curriculum.lesson_count(),
        })
    }

    /// Lessons first, then modules, then the curriculum itself.
    async fn persist(&self, curriculum: &Curriculum) -> Result<()> {
        for module in &curriculum.modules {
            for lesson in &module.lessons {
                self.curricula.save_lesson(lesson).await?;
            }
            self.curricula.save_module(module).await?;
        }
        self.curricula.save_curriculum(curriculum).await
    }
}

/// Builder for [`PathwayPlanner`].
#[derive(Clone, Default)]
pub struct PathwayPlannerBuilder {
    skills: Option<Arc<dyn SkillRepository>>,
    learners: Option<Arc<dyn LearnerProfileRepository>>,
    curricula: Option<Arc<dyn CurriculumRepository>>,
    config: Option<PlannerConfig>,
}

impl PathwayPlannerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn skills(mut self, repository: Arc<dyn SkillRepository>) -> Self {
        self.skills = Some(repository);
        self
    }

    pub fn learners(mut self, repository: Arc<dyn LearnerProfileRepository>) -> Self {
        self.learners = Some(repository);
        self
    }

    pub fn curricula(mut self, repository: Arc<dyn CurriculumRepository>) -> Self {
        self.curricula = Some(repository);
        self
    }

    pub fn config(mut self, config: PlannerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Validates the configuration and builds the planner.
    ///
    /// Repositories that were not set default to fresh in-memory stores.
    pub fn build(self) -> Result<PathwayPlanner> {
        let config = self.config.unwrap_or_default();
        config.validate()?;

        Ok(PathwayPlanner {
            skills: self.skills.unwrap_or_else(|| Arc::new(InMemorySkillStore::new())),
            learners: self
                .learners
                .unwrap_or_else(|| Arc::new(InMemoryLearnerProfileStore::new())),
            curricula: self
                .curricula
                .unwrap_or_else(|| Arc::new(InMemoryCurriculumStore::new())),
            config,
        })
    }
}
