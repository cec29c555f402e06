//! Flat competency gap analysis.
//!
//! Compares target levels against current levels without looking at the
//! skill graph. Output order follows the target list.

use std::collections::HashMap;

use crate::types::{Competency, SkillId, Transformation};

/// Computes the level increases needed to reach `targets` from `current`.
///
/// Duplicate entries in `current` resolve to the last one. A skill the learner
/// already holds at or above the target level produces nothing.
pub fn competency_gap(current: &[Competency], targets: &[Competency]) -> Vec<Transformation> {
    let current_levels: HashMap<&SkillId, u8> = current
        .iter()
        .map(|competency| (&competency.skill_id, competency.level))
        .collect();

    targets
        .iter()
        .filter_map(|target| {
            let from_level = current_levels.get(&target.skill_id).copied().unwrap_or(0);
            (from_level < target.level).then(|| Transformation {
                skill_id: target.skill_id.clone(),
                from_level,
                to_level: target.level,
            })
        })
        .collect()
}
