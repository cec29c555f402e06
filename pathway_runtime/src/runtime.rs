//! Composition root wiring in-memory stores into a planner.

use anyhow::Context;
use std::sync::Arc;
use std::time::Instant;

use pathway_core::storage::{
    CurriculumRepository, InMemoryCurriculumStore, InMemoryLearnerProfileStore,
    InMemorySkillStore, LearnerProfileRepository,
};
use pathway_core::{
    Competency, CurriculumId, GeneratedCurriculum, LearnerId, LearnerProfile, PathwayError,
    PathwayPlanner, PlanOutcome, SkillId, SkillTree,
};

use crate::catalog::{self, SeededCatalog};
use crate::config::RuntimeConfig;
use crate::library::TransformationLibrary;
use crate::metrics::{MetricKind, RuntimeMetrics};

/// PathwayKit runtime over in-memory stores.
///
/// # Examples
///
/// ```rust,no_run
/// use pathway_core::{LearnerId, LearnerProfile};
/// use pathway_runtime::PathwayRuntime;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let runtime = PathwayRuntime::new().await?;
/// runtime.seed_catalog().await?;
/// runtime.register_learner(&LearnerProfile::new("dev-1")).await?;
///
/// let outcome = runtime
///     .plan_transformation(&LearnerId::new("dev-1"), "adopt-ddd", None)
///     .await?;
/// if let Some(id) = outcome.curriculum_id() {
///     println!("{}", runtime.export_curriculum(id).await?);
/// }
/// # Ok(())
/// # }
/// ```
pub struct PathwayRuntime {
    config: RuntimeConfig,
    planner: PathwayPlanner,
    skills: InMemorySkillStore,
    learners: InMemoryLearnerProfileStore,
    curricula: InMemoryCurriculumStore,
    library: TransformationLibrary,
    metrics: RuntimeMetrics,
}

impl PathwayRuntime {
    /// Creates a runtime with default configuration.
    pub async fn new() -> anyhow::Result<Self> {
        Self::with_config(RuntimeConfig::default()).await
    }

    /// Creates a runtime with custom configuration.
    ///
    /// Seeds the catalog when `config.seed_catalog` is set.
    pub async fn with_config(config: RuntimeConfig) -> anyhow::Result<Self> {
        config.validate()?;

        let skills = InMemorySkillStore::new();
        let learners = InMemoryLearnerProfileStore::new();
        let curricula = InMemoryCurriculumStore::new();
        let planner = PathwayPlanner::builder()
            .skills(Arc::new(skills.clone()))
            .learners(Arc::new(learners.clone()))
            .curricula(Arc::new(curricula.clone()))
            .config(config.planner.clone())
            .build()
            .context("Failed to build planner")?;

        let runtime = Self {
            config,
            planner,
            skills,
            learners,
            curricula,
            library: TransformationLibrary::builtin()?,
            metrics: RuntimeMetrics::new(),
        };
        if runtime.config.seed_catalog {
            runtime.seed_catalog().await.context("Failed to seed catalog")?;
        }
        Ok(runtime)
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn planner(&self) -> &PathwayPlanner {
        &self.planner
    }

    pub fn skills(&self) -> &InMemorySkillStore {
        &self.skills
    }

    pub fn learners(&self) -> &InMemoryLearnerProfileStore {
        &self.learners
    }

    pub fn curricula(&self) -> &InMemoryCurriculumStore {
        &self.curricula
    }

    pub fn library(&self) -> &TransformationLibrary {
        &self.library
    }

    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    /// Seeds the backend developer knowledge graph.
    pub async fn seed_catalog(&self) -> pathway_core::Result<SeededCatalog> {
        catalog::seed(&self.skills).await
    }

    pub async fn register_learner(&self, profile: &LearnerProfile) -> pathway_core::Result<()> {
        self.learners.save_learner_profile(profile).await
    }

    fn observe<T>(&self, started: Instant, result: &pathway_core::Result<T>, kind: impl FnOnce(&T) -> MetricKind) {
        let kind = match result {
            Ok(value) => kind(value),
            Err(_) => MetricKind::Failed,
        };
        self.metrics.record_timing(kind, started.elapsed());
    }

    pub async fn plan_curriculum(
        &self,
        learner_id: &LearnerId,
        targets: &[Competency],
        strategy: Option<&str>,
    ) -> pathway_core::Result<PlanOutcome> {
        let started = Instant::now();
        let result = self.planner.plan_curriculum(learner_id, targets, strategy).await;
        self.observe(started, &result, |outcome| match outcome {
            PlanOutcome::UpToDate => MetricKind::UpToDate,
            PlanOutcome::Planned { .. } => MetricKind::Planned,
        });
        result
    }

    /// Plans toward the targets of a named library transformation.
    pub async fn plan_transformation(
        &self,
        learner_id: &LearnerId,
        key: &str,
        strategy: Option<&str>,
    ) -> pathway_core::Result<PlanOutcome> {
        let definition = match self.library.require(key) {
            Ok(definition) => definition,
            Err(err) => {
                self.metrics.record(MetricKind::Failed);
                return Err(err);
            }
        };
        tracing::debug!(key, learner = %learner_id, "planning library transformation");
        self.plan_curriculum(learner_id, &definition.target_competencies, strategy)
            .await
    }

    pub async fn pairwise_gap(&self, a: &SkillId, b: &SkillId) -> pathway_core::Result<SkillTree> {
        let started = Instant::now();
        let result = self.planner.pairwise_gap(a, b).await;
        self.observe(started, &result, |_| MetricKind::TreeQuery);
        result
    }

    pub async fn scaffold(&self, start: &SkillId, end: &SkillId) -> pathway_core::Result<SkillTree> {
        let started = Instant::now();
        let result = self.planner.scaffold(start, end).await;
        self.observe(started, &result, |_| MetricKind::TreeQuery);
        result
    }

    pub async fn generate_curriculum(
        &self,
        title: &str,
        tree: &SkillTree,
    ) -> pathway_core::Result<GeneratedCurriculum> {
        let started = Instant::now();
        let result = self.planner.generate_curriculum(title, tree).await;
        self.observe(started, &result, |_| MetricKind::Generated);
        result
    }

    /// Pretty JSON of a stored curriculum.
    pub async fn export_curriculum(&self, id: CurriculumId) -> anyhow::Result<String> {
        let curriculum = self
            .curricula
            .find_curriculum_by_id(id)
            .await?
            .ok_or_else(|| PathwayError::NotFound(format!("curriculum {}", id)))?;
        curriculum
            .to_json()
            .with_context(|| format!("Failed to serialize curriculum {}", id))
    }
}
