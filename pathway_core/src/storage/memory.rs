//! In-memory repository adapters.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{CurriculumRepository, LearnerProfileRepository, SkillRepository};
use crate::curriculum::{Curriculum, CurriculumId, Lesson, LessonId, Module, ModuleId};
use crate::error::Result;
use crate::types::{LearnerId, LearnerProfile, Skill, SkillId};

/// In-memory skill storage
///
/// Keeps insertion order so `all_skills` is deterministic.
#[derive(Clone, Default)]
pub struct InMemorySkillStore {
    skills: Arc<RwLock<IndexMap<SkillId, Skill>>>,
}

impl InMemorySkillStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every stored skill
    pub async fn clear(&self) {
        self.skills.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.skills.read().await.len()
    }
}

#[async_trait]
impl SkillRepository for InMemorySkillStore {
    async fn find_skill_by_id(&self, id: &SkillId) -> Result<Option<Skill>> {
        let store = self.skills.read().await;
        Ok(store.get(id).cloned())
    }

    async fn find_skills_by_ids(&self, ids: &[SkillId]) -> Result<Vec<Skill>> {
        let store = self.skills.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }

    async fn save_skill(&self, skill: &Skill) -> Result<()> {
        skill.validate()?;
        let mut store = self.skills.write().await;
        store.insert(skill.id.clone(), skill.clone());
        Ok(())
    }

    async fn all_skills(&self) -> Result<Vec<Skill>> {
        let store = self.skills.read().await;
        Ok(store.values().cloned().collect())
    }
}

/// In-memory learner profile storage
#[derive(Clone, Default)]
pub struct InMemoryLearnerProfileStore {
    profiles: Arc<RwLock<HashMap<LearnerId, LearnerProfile>>>,
}

impl InMemoryLearnerProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn clear(&self) {
        self.profiles.write().await.clear();
    }
}

#[async_trait]
impl LearnerProfileRepository for InMemoryLearnerProfileStore {
    async fn find_learner_profile_by_id(&self, id: &LearnerId) -> Result<Option<LearnerProfile>> {
        let store = self.profiles.read().await;
        Ok(store.get(id).cloned())
    }

    async fn save_learner_profile(&self, profile: &LearnerProfile) -> Result<()> {
        profile.id.validate()?;
        let mut store = self.profiles.write().await;
        store.insert(profile.id.clone(), profile.clone());
        Ok(())
    }
}

#[derive(Default)]
struct CurriculumTables {
    curricula: HashMap<CurriculumId, Curriculum>,
    modules: HashMap<ModuleId, Module>,
    lessons: HashMap<LessonId, Lesson>,
}

/// In-memory curriculum, module and lesson storage
#[derive(Clone, Default)]
pub struct InMemoryCurriculumStore {
    tables: Arc<RwLock<CurriculumTables>>,
}

impl InMemoryCurriculumStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn curriculum_count(&self) -> usize {
        self.tables.read().await.curricula.len()
    }

    pub async fn module_count(&self) -> usize {
        self.tables.read().await.modules.len()
    }

    pub async fn lesson_count(&self) -> usize {
        self.tables.read().await.lessons.len()
    }

    pub async fn find_module_by_id(&self, id: ModuleId) -> Option<Module> {
        self.tables.read().await.modules.get(&id).cloned()
    }

    pub async fn find_lesson_by_id(&self, id: LessonId) -> Option<Lesson> {
        self.tables.read().await.lessons.get(&id).cloned()
    }

    pub async fn clear(&self) {
        let mut tables = self.tables.write().await;
        *tables = CurriculumTables::default();
    }
}

#[async_trait]
impl CurriculumRepository for InMemoryCurriculumStore {
    async fn save_curriculum(&self, curriculum: &Curriculum) -> Result<()> {
        curriculum.validate()?;
        let mut tables = self.tables.write().await;
        tables.curricula.insert(curriculum.id, curriculum.clone());
        Ok(())
    }

    async fn save_module(&self, module: &Module) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.modules.insert(module.id, module.clone());
        Ok(())
    }

    async fn save_lesson(&self, lesson: &Lesson) -> Result<()> {
        let mut tables = self.tables.write().await;
        tables.lessons.insert(lesson.id, lesson.clone());
        Ok(())
    }

    async fn find_curriculum_by_id(&self, id: CurriculumId) -> Result<Option<Curriculum>> {
        let tables = self.tables.read().await;
        Ok(tables.curricula.get(&id).cloned())
    }
}
