//! Plain leveling: one module per dependency level that has work.

use super::{Leveler, ModulePlan};
use crate::error::Result;
use crate::types::{SkillMap, Transformation};

pub(crate) fn sequence(gaps: &[Transformation], skills: &SkillMap) -> Result<Vec<ModulePlan>> {
    let mut leveler = Leveler::new(skills);
    let mut modules = Vec::new();

    while let Some(ready) = leveler.next_level()? {
        let transformations: Vec<Transformation> = gaps
            .iter()
            .filter(|t| ready.contains(&t.skill_id))
            .cloned()
            .collect();

        // Ready skills without work are consumed silently.
        if !transformations.is_empty() {
            modules.push(ModulePlan {
                position: modules.len() + 1,
                transformations,
            });
        }
    }

    Ok(modules)
}
