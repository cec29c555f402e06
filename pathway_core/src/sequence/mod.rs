//! Curriculum sequencing over a shrinking set of remaining skills.
//!
//! Both policies share the leveling core in [`Leveler`]: a skill is *ready*
//! once none of its prerequisites is still remaining. The policies only differ
//! in how each level's transformations are grouped into modules.
//!
//! # Example
//!
//! ```rust
//! use pathway_core::sequence::SequencingStrategy;
//! use pathway_core::{Skill, SkillMap, Transformation};
//!
//! let mut skills = SkillMap::new();
//! for skill in [Skill::new("a", "A"), Skill::new("b", "B").depends_on("a")] {
//!     skills.insert(skill.id.clone(), skill);
//! }
//! let gaps = vec![
//!     Transformation::new("b", 0, 1).unwrap(),
//!     Transformation::new("a", 0, 1).unwrap(),
//! ];
//!
//! let plan = SequencingStrategy::from_name("default")
//!     .unwrap()
//!     .sequence(&gaps, &skills)
//!     .unwrap();
//! assert_eq!(plan.len(), 2);
//! assert_eq!(plan[0].transformations[0].skill_id.as_str(), "a");
//! ```

pub mod immersive;
pub mod topological;

use indexmap::IndexSet;
use petgraph::algo::tarjan_scc;
use petgraph::graph::DiGraph;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{PathwayError, Result};
use crate::types::{SkillId, SkillMap, Transformation};

pub use immersive::CarryOver;

/// Transformations grouped into one module, before materialization.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModulePlan {
    /// 1-based position in the curriculum
    pub position: usize,
    pub transformations: Vec<Transformation>,
}

impl ModulePlan {
    pub fn skill_ids(&self) -> Vec<SkillId> {
        self.transformations.iter().map(|t| t.skill_id.clone()).collect()
    }
}

/// Registered sequencing policies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SequencingStrategy {
    /// One module per dependency level
    TopologicalSort,
    /// Foundational skills carried until a practical skill needs them
    ImmersivePractice,
}

/// Lookup table from request key to policy.
const STRATEGIES: &[(&str, SequencingStrategy)] = &[
    ("default", SequencingStrategy::TopologicalSort),
    ("topological-sort", SequencingStrategy::TopologicalSort),
    ("immersive-practice", SequencingStrategy::ImmersivePractice),
];

impl SequencingStrategy {
    /// Resolves a policy by its registered name.
    pub fn from_name(name: &str) -> Result<Self> {
        STRATEGIES
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, strategy)| *strategy)
            .ok_or_else(|| PathwayError::UnknownStrategy(name.to_string()))
    }

    /// All registered names, including aliases.
    pub fn names() -> impl Iterator<Item = &'static str> {
        STRATEGIES.iter().map(|(key, _)| *key)
    }

    /// Canonical name of the policy.
    pub fn name(&self) -> &'static str {
        match self {
            Self::TopologicalSort => "topological-sort",
            Self::ImmersivePractice => "immersive-practice",
        }
    }

    /// Groups and orders `gaps` into modules.
    ///
    /// `skills` is the whole working set, including skills without a
    /// transformation that only exist to satisfy dependency checks.
    /// Transformations whose skill is not in `skills` are never placed.
    pub fn sequence(&self, gaps: &[Transformation], skills: &SkillMap) -> Result<Vec<ModulePlan>> {
        match self {
            Self::TopologicalSort => topological::sequence(gaps, skills),
            Self::ImmersivePractice => immersive::sequence(gaps, skills),
        }
    }
}

impl std::str::FromStr for SequencingStrategy {
    type Err = PathwayError;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

/// Ids in `remaining` whose prerequisites are all outside `remaining`.
pub fn ready_set(skills: &SkillMap, remaining: &IndexSet<SkillId>) -> IndexSet<SkillId> {
    remaining
        .iter()
        .filter(|id| {
            skills.get(*id).is_some_and(|skill| {
                skill
                    .prerequisite_skill_ids
                    .iter()
                    .all(|prerequisite| !remaining.contains(prerequisite))
            })
        })
        .cloned()
        .collect()
}

/// Level-by-level consumption of a skill working set.
pub struct Leveler<'a> {
    skills: &'a SkillMap,
    remaining: IndexSet<SkillId>,
    level: usize,
}

impl<'a> Leveler<'a> {
    pub fn new(skills: &'a SkillMap) -> Self {
        Self {
            skills,
            remaining: skills.keys().cloned().collect(),
            level: 0,
        }
    }

    pub fn remaining(&self) -> &IndexSet<SkillId> {
        &self.remaining
    }

    /// Removes and returns the next ready set, or `None` once everything is consumed.
    ///
    /// Fails with `CircularDependency` when skills remain but none is ready.
    pub fn next_level(&mut self) -> Result<Option<IndexSet<SkillId>>> {
        if self.remaining.is_empty() {
            return Ok(None);
        }

        let ready = ready_set(self.skills, &self.remaining);
        if ready.is_empty() {
            return Err(PathwayError::CircularDependency(cycle_members(
                self.skills,
                &self.remaining,
            )));
        }

        self.level += 1;
        tracing::debug!(
            step = self.level,
            ready = ready.len(),
            remaining = self.remaining.len() - ready.len(),
            "sequenced skill level"
        );
        self.remaining.retain(|id| !ready.contains(id));
        Ok(Some(ready))
    }
}

/// Members of the strongly connected components among `remaining`.
///
/// Falls back to every remaining id if no component can be isolated.
fn cycle_members(skills: &SkillMap, remaining: &IndexSet<SkillId>) -> Vec<SkillId> {
    let mut graph: DiGraph<SkillId, ()> = DiGraph::new();
    let mut nodes = HashMap::new();
    for id in remaining {
        nodes.insert(id, graph.add_node(id.clone()));
    }
    for id in remaining {
        let Some(skill) = skills.get(id) else { continue };
        for prerequisite in &skill.prerequisite_skill_ids {
            if let Some(&to) = nodes.get(prerequisite) {
                graph.add_edge(nodes[id], to, ());
            }
        }
    }

    let members: Vec<SkillId> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || graph.find_edge(scc[0], scc[0]).is_some())
        .flatten()
        .map(|idx| graph[idx].clone())
        .collect();

    if members.is_empty() {
        remaining.iter().cloned().collect()
    } else {
        members
    }
}
