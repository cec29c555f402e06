//! Graph module - prerequisite closure and closure differences.
//!
//! Closures are expanded ring by ring: every frontier of unresolved ids is
//! fetched with a single batched repository lookup, and an id is never
//! fetched or expanded twice. A cycle in the data therefore just closes the
//! expansion; cycle detection belongs to the sequencer.

pub mod difference;

use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::config::DanglingPrerequisitePolicy;
use crate::error::{PathwayError, Result};
use crate::storage::SkillRepository;
use crate::types::{Skill, SkillId, SkillMap};

pub use difference::{root_skill_ids, subtract, SetDifferenceExtractor};

/// Computes the transitive prerequisite closure of skills.
///
/// # Examples
///
/// ```rust,no_run
/// use pathway_core::graph::PrerequisiteClosure;
/// use pathway_core::storage::{InMemorySkillStore, SkillRepository};
/// use pathway_core::Skill;
///
/// # #[tokio::main]
/// # async fn main() -> pathway_core::Result<()> {
/// let store = InMemorySkillStore::new();
/// store.save_skill(&Skill::new("a", "A")).await?;
/// let b = Skill::new("b", "B").depends_on("a");
/// store.save_skill(&b).await?;
///
/// let closure = PrerequisiteClosure::new(&store).closure(&b).await?;
/// assert_eq!(closure.len(), 2);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Copy)]
pub struct PrerequisiteClosure<'a> {
    repository: &'a dyn SkillRepository,
    policy: DanglingPrerequisitePolicy,
}

impl<'a> PrerequisiteClosure<'a> {
    /// Creates a closure engine that ignores dangling prerequisites.
    pub fn new(repository: &'a dyn SkillRepository) -> Self {
        Self {
            repository,
            policy: DanglingPrerequisitePolicy::Ignore,
        }
    }

    pub fn with_policy(mut self, policy: DanglingPrerequisitePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the skill itself plus every skill transitively required by it.
    pub async fn closure(&self, skill: &Skill) -> Result<SkillMap> {
        self.closure_of(std::slice::from_ref(skill)).await
    }

    /// Returns the union of the closures of all `seeds`.
    ///
    /// Seeds come first in the result, followed by each ring in discovery order.
    pub async fn closure_of(&self, seeds: &[Skill]) -> Result<SkillMap> {
        let mut visited: HashSet<SkillId> = HashSet::new();
        let mut result = SkillMap::new();
        let mut frontier: IndexSet<SkillId> = IndexSet::new();

        for seed in seeds {
            if visited.insert(seed.id.clone()) {
                result.insert(seed.id.clone(), seed.clone());
            }
        }
        for seed in seeds {
            frontier.extend(
                seed.prerequisite_skill_ids
                    .iter()
                    .filter(|id| !visited.contains(*id))
                    .cloned(),
            );
        }

        let mut ring = 0usize;
        while !frontier.is_empty() {
            ring += 1;
            let batch: Vec<SkillId> = frontier.drain(..).collect();
            visited.extend(batch.iter().cloned());

            let fetched = self.repository.find_skills_by_ids(&batch).await?;
            debug!(ring, requested = batch.len(), resolved = fetched.len(), "expanded closure ring");

            if fetched.len() < batch.len() {
                let resolved: HashSet<&SkillId> = fetched.iter().map(|skill| &skill.id).collect();
                for missing in batch.iter().filter(|id| !resolved.contains(id)) {
                    match self.policy {
                        DanglingPrerequisitePolicy::Ignore => {
                            warn!(skill_id = %missing, "dropping unresolved prerequisite from closure");
                        }
                        DanglingPrerequisitePolicy::Reject => {
                            return Err(PathwayError::NotFound(format!(
                                "prerequisite skill {} not found",
                                missing
                            )));
                        }
                    }
                }
            }

            for skill in fetched {
                frontier.extend(
                    skill
                        .prerequisite_skill_ids
                        .iter()
                        .filter(|id| !visited.contains(*id))
                        .cloned(),
                );
                result.entry(skill.id.clone()).or_insert(skill);
            }
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySkillStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Counts batched lookups so ring batching can be asserted.
    struct CountingStore {
        inner: InMemorySkillStore,
        batches: AtomicUsize,
        fetched_ids: std::sync::Mutex<Vec<SkillId>>,
    }

    #[async_trait]
    impl SkillRepository for CountingStore {
        async fn find_skill_by_id(&self, id: &SkillId) -> Result<Option<Skill>> {
            self.inner.find_skill_by_id(id).await
        }

        async fn find_skills_by_ids(&self, ids: &[SkillId]) -> Result<Vec<Skill>> {
            self.batches.fetch_add(1, Ordering::SeqCst);
            self.fetched_ids.lock().unwrap().extend(ids.iter().cloned());
            self.inner.find_skills_by_ids(ids).await
        }

        async fn save_skill(&self, skill: &Skill) -> Result<()> {
            self.inner.save_skill(skill).await
        }

        async fn all_skills(&self) -> Result<Vec<Skill>> {
            self.inner.all_skills().await
        }
    }

    async fn store_with(skills: Vec<Skill>) -> CountingStore {
        let inner = InMemorySkillStore::new();
        for skill in &skills {
            inner.save_skill(skill).await.unwrap();
        }
        CountingStore {
            inner,
            batches: AtomicUsize::new(0),
            fetched_ids: std::sync::Mutex::new(Vec::new()),
        }
    }

    #[tokio::test]
    async fn test_closure_of_chain() {
        let c = Skill::new("c", "C").depends_on("b");
        let store = store_with(vec![
            Skill::new("a", "A"),
            Skill::new("b", "B").depends_on("a"),
            c.clone(),
        ])
        .await;

        let closure = PrerequisiteClosure::new(&store).closure(&c).await.unwrap();
        let ids: Vec<&str> = closure.keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_closure_batches_one_lookup_per_ring() {
        // Diamond: d -> {b, c}, b -> a, c -> a
        let d = Skill::new("d", "D").depends_on("b").depends_on("c");
        let store = store_with(vec![
            Skill::new("a", "A"),
            Skill::new("b", "B").depends_on("a"),
            Skill::new("c", "C").depends_on("a"),
            d.clone(),
        ])
        .await;

        let closure = PrerequisiteClosure::new(&store).closure(&d).await.unwrap();
        assert_eq!(closure.len(), 4);
        // ring 1: {b, c}; ring 2: {a}
        assert_eq!(store.batches.load(Ordering::SeqCst), 2);
        // the shared prerequisite is fetched exactly once
        let fetched = store.fetched_ids.lock().unwrap();
        assert_eq!(fetched.iter().filter(|id| id.as_str() == "a").count(), 1);
    }

    #[tokio::test]
    async fn test_closure_terminates_on_cycle() {
        // Stored directly: the store only rejects self-references.
        let a = Skill::new("a", "A").depends_on("b");
        let store = store_with(vec![a.clone(), Skill::new("b", "B").depends_on("a")]).await;

        let closure = PrerequisiteClosure::new(&store).closure(&a).await.unwrap();
        assert_eq!(closure.len(), 2);
        assert_eq!(store.batches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_dangling_prerequisite_ignored_by_default() {
        let b = Skill::new("b", "B").depends_on("ghost").depends_on("a");
        let store = store_with(vec![Skill::new("a", "A"), b.clone()]).await;

        let closure = PrerequisiteClosure::new(&store).closure(&b).await.unwrap();
        assert_eq!(closure.len(), 2);
        assert!(!closure.contains_key(&SkillId::new("ghost")));
    }

    #[tokio::test]
    async fn test_dangling_prerequisite_rejected_when_configured() {
        let b = Skill::new("b", "B").depends_on("ghost");
        let store = store_with(vec![b.clone()]).await;

        let result = PrerequisiteClosure::new(&store)
            .with_policy(DanglingPrerequisitePolicy::Reject)
            .closure(&b)
            .await;
        assert!(matches!(result, Err(PathwayError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_closure_of_many_seeds_deduplicates() {
        let b = Skill::new("b", "B").depends_on("a");
        let c = Skill::new("c", "C").depends_on("a");
        let store = store_with(vec![Skill::new("a", "A"), b.clone(), c.clone()]).await;

        let closure = PrerequisiteClosure::new(&store)
            .closure_of(&[b, c])
            .await
            .unwrap();
        let ids: Vec<&str> = closure.keys().map(|id| id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(store.batches.load(Ordering::SeqCst), 1);
    }
}
