//! Core types for PathwayKit.

use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{PathwayError, Result};

/// Lowest mastery level on the DACUM-style scale.
pub const MIN_LEVEL: u8 = 1;

/// Highest mastery level on the DACUM-style scale.
pub const MAX_LEVEL: u8 = 4;

/// Skills keyed by id, in discovery order.
pub type SkillMap = IndexMap<SkillId, Skill>;

/// Opaque identifier for a skill node.
///
/// Ids are caller-supplied strings; the only structural rule is that they
/// are non-blank.
#[derive(Clone, Debug, Hash, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillId(String);

impl SkillId {
    /// Creates a new SkillId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rejects blank ids.
    pub fn validate(&self) -> Result<()> {
        if self.0.trim().is_empty() {
            return Err(PathwayError::InvalidInput("skill id cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SkillId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for SkillId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Identifier of a learner (and of their competency profile).
#[derive(Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(String);

impl LearnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Rejects blank ids.
    pub fn validate(&self) -> Result<()> {
        if self.0.trim().is_empty() {
            return Err(PathwayError::InvalidInput("learner id cannot be empty".to_string()));
        }
        Ok(())
    }
}

impl fmt::Display for LearnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for LearnerId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for LearnerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A node of the prerequisite DAG.
///
/// Edge direction: a skill points at the skills it requires. The whole graph
/// is only required to be acyclic when it is sequenced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    pub id: SkillId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub prerequisite_skill_ids: IndexSet<SkillId>,
}

impl Skill {
    /// Creates a skill with no prerequisites.
    pub fn new(id: impl Into<SkillId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            prerequisite_skill_ids: IndexSet::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares a prerequisite edge. Not checked until [`validate`](Self::validate).
    pub fn depends_on(mut self, prerequisite: impl Into<SkillId>) -> Self {
        self.prerequisite_skill_ids.insert(prerequisite.into());
        self
    }

    /// Adds a prerequisite, ignoring duplicates and self-references.
    ///
    /// Returns true if the prerequisite set changed.
    pub fn add_prerequisite(&mut self, prerequisite: SkillId) -> bool {
        if prerequisite == self.id {
            return false;
        }
        self.prerequisite_skill_ids.insert(prerequisite)
    }

    /// Renames the skill.
    pub fn rename(&mut self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(PathwayError::InvalidInput("skill name cannot be empty".to_string()));
        }
        self.name = name;
        Ok(())
    }

    /// Checks the skill-local invariants: non-blank id and name, no self-reference.
    pub fn validate(&self) -> Result<()> {
        self.id.validate()?;
        if self.name.trim().is_empty() {
            return Err(PathwayError::InvalidInput(format!(
                "skill {} has an empty name",
                self.id
            )));
        }
        if self.prerequisite_skill_ids.contains(&self.id) {
            return Err(PathwayError::InvalidInput(format!(
                "skill {} cannot be a prerequisite of itself",
                self.id
            )));
        }
        for prerequisite in &self.prerequisite_skill_ids {
            prerequisite.validate()?;
        }
        Ok(())
    }

    /// True when the skill declares no prerequisites.
    pub fn is_foundational(&self) -> bool {
        self.prerequisite_skill_ids.is_empty()
    }
}

fn check_level(level: u8, min: u8, what: &str) -> Result<()> {
    if !(min..=MAX_LEVEL).contains(&level) {
        return Err(PathwayError::InvalidInput(format!(
            "{} {} is outside [{}, {}]",
            what, level, min, MAX_LEVEL
        )));
    }
    Ok(())
}

/// A mastery level held (or targeted) for one skill.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Competency {
    pub skill_id: SkillId,
    pub level: u8,
}

impl Competency {
    /// Creates a competency, validating the level range.
    pub fn new(skill_id: impl Into<SkillId>, level: u8) -> Result<Self> {
        let competency = Self {
            skill_id: skill_id.into(),
            level,
        };
        competency.validate()?;
        Ok(competency)
    }

    pub fn validate(&self) -> Result<()> {
        self.skill_id.validate()?;
        check_level(self.level, MIN_LEVEL, "competency level")
    }
}

/// A single skill's required level increase.
///
/// `from_level == 0` means the skill is entirely unacquired.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Transformation {
    pub skill_id: SkillId,
    pub from_level: u8,
    pub to_level: u8,
}

impl Transformation {
    pub fn new(skill_id: impl Into<SkillId>, from_level: u8, to_level: u8) -> Result<Self> {
        let transformation = Self {
            skill_id: skill_id.into(),
            from_level,
            to_level,
        };
        transformation.validate()?;
        Ok(transformation)
    }

    pub fn validate(&self) -> Result<()> {
        self.skill_id.validate()?;
        check_level(self.from_level, 0, "from level")?;
        check_level(self.to_level, MIN_LEVEL, "to level")?;
        if self.from_level >= self.to_level {
            return Err(PathwayError::InvalidInput(format!(
                "transformation for {} must raise the level ({} -> {})",
                self.skill_id, self.from_level, self.to_level
            )));
        }
        Ok(())
    }
}

/// Result of a closure difference: a skill subset plus its roots.
///
/// A root is a member whose prerequisites all lie outside `skills`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillTree {
    pub skills: Vec<Skill>,
    pub root_skill_ids: Vec<SkillId>,
}

impl SkillTree {
    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.skills.iter().any(|skill| &skill.id == id)
    }

    /// Ids of every member, in tree order.
    pub fn skill_ids(&self) -> Vec<SkillId> {
        self.skills.iter().map(|skill| skill.id.clone()).collect()
    }

    /// Renders the tree as indented `- name` lines, walking from each root
    /// down to the members that depend on it.
    ///
    /// A skill reachable through several parents is printed under each of them.
    pub fn outline(&self) -> Vec<String> {
        let mut lines = Vec::new();
        let mut path = Vec::new();
        for root in &self.root_skill_ids {
            self.outline_from(root, 0, &mut path, &mut lines);
        }
        lines
    }

    fn outline_from(
        &self,
        id: &SkillId,
        depth: usize,
        path: &mut Vec<SkillId>,
        lines: &mut Vec<String>,
    ) {
        let Some(skill) = self.skills.iter().find(|skill| &skill.id == id) else {
            return;
        };
        if path.contains(id) {
            return;
        }
        lines.push(format!("{}- {}", "  ".repeat(depth), skill.name));

        path.push(id.clone());
        for child in self
            .skills
            .iter()
            .filter(|candidate| candidate.prerequisite_skill_ids.contains(id))
        {
            self.outline_from(&child.id, depth + 1, path, lines);
        }
        path.pop();
    }
}

/// A learner's current competencies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerProfile {
    pub id: LearnerId,
    #[serde(default)]
    pub competencies: Vec<Competency>,
}

impl LearnerProfile {
    pub fn new(id: impl Into<LearnerId>) -> Self {
        Self {
            id: id.into(),
            competencies: Vec::new(),
        }
    }

    pub fn with_competency(mut self, competency: Competency) -> Self {
        self.achieve_competency(competency);
        self
    }

    /// Records a competency. An existing entry is only ever raised, never lowered.
    ///
    /// Returns true if the profile changed.
    pub fn achieve_competency(&mut self, competency: Competency) -> bool {
        match self
            .competencies
            .iter_mut()
            .find(|existing| existing.skill_id == competency.skill_id)
        {
            Some(existing) if existing.level < competency.level => {
                existing.level = competency.level;
                true
            }
            Some(_) => false,
            None => {
                self.competencies.push(competency);
                true
            }
        }
    }

    /// Current level for a skill, if the learner holds it at all.
    pub fn level_of(&self, skill_id: &SkillId) -> Option<u8> {
        self.competencies
            .iter()
            .find(|c| &c.skill_id == skill_id)
            .map(|c| c.level)
    }
}
