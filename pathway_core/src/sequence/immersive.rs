//! Immersive practice: foundational skills wait for the practical skill that needs them.
//!
//! A skill with no declared prerequisites is foundational, anything else is
//! practical. Foundational transformations accumulate in a [`CarryOver`]
//! buffer and are flushed in front of the next level that has practical work.
//! A buffer still holding work after the last level becomes a trailing module.

use std::collections::HashSet;

use super::{Leveler, ModulePlan};
use crate::error::Result;
use crate::types::{SkillId, SkillMap, Transformation};

/// Sequencer state threaded through each leveling step.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarryOver {
    buffer: Vec<Transformation>,
    next_position: usize,
}

impl CarryOver {
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            next_position: 1,
        }
    }

    /// Foundational transformations not yet placed in a module.
    pub fn pending(&self) -> &[Transformation] {
        &self.buffer
    }

    /// Applies one level.
    ///
    /// `foundational` always joins the buffer. Non-empty `practical` work
    /// flushes the buffer followed by `practical` into a module.
    pub fn step(
        self,
        foundational: Vec<Transformation>,
        practical: Vec<Transformation>,
    ) -> (Self, Option<ModulePlan>) {
        let mut buffer = self.buffer;
        buffer.extend(foundational);

        if practical.is_empty() {
            return (
                Self {
                    buffer,
                    next_position: self.next_position,
                },
                None,
            );
        }

        buffer.extend(practical);
        let module = ModulePlan {
            position: self.next_position,
            transformations: buffer,
        };
        (
            Self {
                buffer: Vec::new(),
                next_position: self.next_position + 1,
            },
            Some(module),
        )
    }

    /// Emits whatever is left in the buffer as a final module.
    pub fn finish(self) -> Option<ModulePlan> {
        (!self.buffer.is_empty()).then(|| ModulePlan {
            position: self.next_position,
            transformations: self.buffer,
        })
    }
}

impl Default for CarryOver {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) fn sequence(gaps: &[Transformation], skills: &SkillMap) -> Result<Vec<ModulePlan>> {
    let foundational_ids: HashSet<&SkillId> = skills
        .values()
        .filter(|skill| skill.is_foundational())
        .map(|skill| &skill.id)
        .collect();

    let mut leveler = Leveler::new(skills);
    let mut state = CarryOver::new();
    let mut modules = Vec::new();

    while let Some(ready) = leveler.next_level()? {
        let (foundational, practical): (Vec<Transformation>, Vec<Transformation>) = gaps
            .iter()
            .filter(|t| ready.contains(&t.skill_id))
            .cloned()
            .partition(|t| foundational_ids.contains(&t.skill_id));

        let (next, module) = state.step(foundational, practical);
        state = next;
        if let Some(module) = module {
            tracing::debug!(
                position = module.position,
                transformations = module.transformations.len(),
                "flushed practice module"
            );
            modules.push(module);
        }
    }

    modules.extend(state.finish());
    Ok(modules)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PathwayError;
    use crate::types::Skill;

    fn map(skills: Vec<Skill>) -> SkillMap {
        skills.into_iter().map(|s| (s.id.clone(), s)).collect()
    }

    fn ids(values: &[&str]) -> Vec<SkillId> {
        values.iter().map(|v| SkillId::new(*v)).collect()
    }

    fn t(id: &str) -> Transformation {
        Transformation::new(id, 0, 1).unwrap()
    }

    #[test]
    fn test_step_accumulates_without_practical_work() {
        let (state, module) = CarryOver::new().step(vec![t("f")], vec![]);
        assert!(module.is_none());
        assert_eq!(state.pending(), &[t("f")]);

        let (state, module) = state.step(vec![t("g")], vec![]);
        assert!(module.is_none());
        assert_eq!(state.pending().len(), 2);
    }

    #[test]
    fn test_step_flushes_buffer_before_practical() {
        let (state, _) = CarryOver::new().step(vec![t("f")], vec![]);
        let (state, module) = state.step(vec![t("g")], vec![t("p")]);

        let module = module.unwrap();
        assert_eq!(module.position, 1);
        assert_eq!(module.transformations, vec![t("f"), t("g"), t("p")]);
        assert!(state.pending().is_empty());
        assert!(state.finish().is_none());
    }

    #[test]
    fn test_foundational_carried_to_practical_module() {
        let skills = map(vec![Skill::new("f", "F"), Skill::new("p", "P").depends_on("f")]);

        let plan = sequence(&[t("p"), t("f")], &skills).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].transformations, vec![t("f"), t("p")]);
    }

    #[test]
    fn test_chain_groups_root_with_first_practical() {
        let skills = map(vec![
            Skill::new("a", "A"),
            Skill::new("b", "B").depends_on("a"),
            Skill::new("c", "C").depends_on("b"),
        ]);

        let plan = sequence(&[t("c"), t("b"), t("a")], &skills).unwrap();
        let levels: Vec<Vec<SkillId>> = plan.iter().map(|m| m.skill_ids()).collect();
        assert_eq!(levels, vec![ids(&["a", "b"]), ids(&["c"])]);
        assert_eq!(plan[1].position, 2);
    }

    #[test]
    fn test_trailing_buffer_becomes_last_module() {
        let skills = map(vec![Skill::new("x", "X"), Skill::new("y", "Y")]);

        let plan = sequence(&[t("x"), t("y")], &skills).unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].position, 1);
        assert_eq!(plan[0].transformations, vec![t("x"), t("y")]);
    }

    #[test]
    fn test_cycle_fails() {
        let skills = map(vec![
            Skill::new("f", "F"),
            Skill::new("a", "A").depends_on("b"),
            Skill::new("b", "B").depends_on("a"),
        ]);

        let result = sequence(&[t("f"), t("a")], &skills);
        assert!(matches!(result, Err(PathwayError::CircularDependency(_))));
    }
}
