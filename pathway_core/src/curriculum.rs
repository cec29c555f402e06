//! Curriculum entities: lessons, modules and the curriculum aggregate.
//!
//! Only the transformation membership of each module and the module order are
//! load-bearing. Names, lesson titles and objectives are presentation helpers
//! produced by [`materialize_module`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{PathwayError, Result};
use crate::types::{Competency, LearnerId, SkillId, SkillMap, Transformation};

/// Unique identifier for a curriculum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurriculumId(pub Uuid);

impl CurriculumId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CurriculumId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for CurriculumId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a module.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleId(pub Uuid);

impl ModuleId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ModuleId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a lesson.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LessonId(pub Uuid);

impl LessonId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LessonId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for LessonId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningObjective {
    pub description: String,
}

/// One lesson teaches exactly one transformation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    /// 1-based position inside the owning module
    pub sequence: usize,
    pub content: String,
    pub transformation: Transformation,
    pub objectives: Vec<LearningObjective>,
}

impl Lesson {
    pub fn skill_id(&self) -> &SkillId {
        &self.transformation.skill_id
    }
}

/// An ordered batch of curriculum work.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Module {
    pub id: ModuleId,
    pub name: String,
    /// 1-based position inside the curriculum
    pub position: usize,
    pub lessons: Vec<Lesson>,
}

impl Module {
    /// Transformations taught by this module, in lesson order.
    pub fn transformations(&self) -> Vec<Transformation> {
        self.lessons
            .iter()
            .map(|lesson| lesson.transformation.clone())
            .collect()
    }

    pub fn skill_ids(&self) -> Vec<SkillId> {
        self.lessons.iter().map(|l| l.skill_id().clone()).collect()
    }
}

/// Ordered list of modules for one learner/target pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Curriculum {
    pub id: CurriculumId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learner_id: Option<LearnerId>,
    #[serde(default)]
    pub target_competencies: Vec<Competency>,
    pub modules: Vec<Module>,
    pub created_at: DateTime<Utc>,
}

impl Curriculum {
    /// Creates a curriculum, rejecting an empty title or module list.
    pub fn new(
        title: impl Into<String>,
        learner_id: Option<LearnerId>,
        target_competencies: Vec<Competency>,
        modules: Vec<Module>,
    ) -> Result<Self> {
        let curriculum = Self {
            id: CurriculumId::new(),
            title: title.into(),
            learner_id,
            target_competencies,
            modules,
            created_at: Utc::now(),
        };
        curriculum.validate()?;
        Ok(curriculum)
    }

    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(PathwayError::InvalidInput("curriculum title cannot be empty".to_string()));
        }
        if self.modules.is_empty() {
            return Err(PathwayError::InvalidInput(
                "curriculum must contain at least one module".to_string(),
            ));
        }
        Ok(())
    }

    pub fn lesson_count(&self) -> usize {
        self.modules.iter().map(|m| m.lessons.len()).sum()
    }

    /// Serializes the curriculum as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builds a module at `position` with one lesson per transformation.
///
/// Skills missing from `skills` are labelled "Unknown Skill".
pub fn materialize_module(position: usize, transformations: Vec<Transformation>, skills: &SkillMap) -> Module {
    let lessons = transformations
        .into_iter()
        .enumerate()
        .map(|(i, transformation)| {
            let (name, description) = match skills.get(&transformation.skill_id) {
                Some(skill) => (skill.name.clone(), skill.description.clone()),
                None => ("Unknown Skill".to_string(), None),
            };
            Lesson {
                id: LessonId::new(),
                title: format!("Introduction to {}", name),
                sequence: i + 1,
                content: description
                    .unwrap_or_else(|| format!("Study materials for \"{}\".", name)),
                objectives: vec![LearningObjective {
                    description: format!(
                        "Raise {} from level {} to level {}",
                        name, transformation.from_level, transformation.to_level
                    ),
                }],
                transformation,
            }
        })
        .collect();

    Module {
        id: ModuleId::new(),
        name: format!("Module {}", position),
        position,
        lessons,
    }
}
