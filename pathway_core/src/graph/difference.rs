//! Set-difference extraction between two prerequisite closures.

use std::collections::HashSet;

use super::PrerequisiteClosure;
use crate::error::Result;
use crate::types::{Skill, SkillId, SkillMap, SkillTree};

/// Derives "gap" and "scaffold" skill trees from closure differences.
pub struct SetDifferenceExtractor<'a> {
    closure: PrerequisiteClosure<'a>,
}

impl<'a> SetDifferenceExtractor<'a> {
    pub fn new(closure: PrerequisiteClosure<'a>) -> Self {
        Self { closure }
    }

    /// `closure(target)` minus `closure(reference)`.
    ///
    /// An empty tree means the reference already covers the target.
    pub async fn difference(&self, reference: &Skill, target: &Skill) -> Result<SkillTree> {
        let target_closure = self.closure.closure(target).await?;
        let reference_closure = self.closure.closure(reference).await?;
        Ok(subtract(&target_closure, &reference_closure, None))
    }

    /// `closure(end)` minus `closure(start)`, never including `start` itself.
    pub async fn scaffold(&self, start: &Skill, end: &Skill) -> Result<SkillTree> {
        let end_closure = self.closure.closure(end).await?;
        let start_closure = self.closure.closure(start).await?;
        Ok(subtract(&end_closure, &start_closure, Some(&start.id)))
    }
}

/// Keeps every skill of `target` whose id is absent from `reference` (and is
/// not `exclude`), preserving `target`'s discovery order.
pub fn subtract(target: &SkillMap, reference: &SkillMap, exclude: Option<&SkillId>) -> SkillTree {
    let skills: Vec<Skill> = target
        .values()
        .filter(|skill| !reference.contains_key(&skill.id))
        .filter(|skill| exclude != Some(&skill.id))
        .cloned()
        .collect();

    let root_skill_ids = root_skill_ids(&skills);
    SkillTree {
        skills,
        root_skill_ids,
    }
}

/// Members with no prerequisite inside the same subset.
pub fn root_skill_ids(skills: &[Skill]) -> Vec<SkillId> {
    let members: HashSet<&SkillId> = skills.iter().map(|skill| &skill.id).collect();
    skills
        .iter()
        .filter(|skill| {
            skill
                .prerequisite_skill_ids
                .iter()
                .all(|prerequisite| !members.contains(prerequisite))
        })
        .map(|skill| skill.id.clone())
        .collect()
}
