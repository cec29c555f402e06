//! End-to-end planning tests over in-memory stores.

mod common;

use std::collections::HashMap;

use common::{chain, learner, seed, skill, test_planner, unavailable_planner, UnavailableSkillStore};
use pathway_core::graph::PrerequisiteClosure;
use pathway_core::storage::CurriculumRepository;
use pathway_core::{
    Competency, LearnerId, PathwayError, PlanOutcome, PlannerConfig, SequencingStrategy, SkillId,
    SkillMap, Transformation,
};

fn target(id: &str, level: u8) -> Competency {
    Competency::new(id, level).unwrap()
}

fn ids(values: &[&str]) -> Vec<SkillId> {
    values.iter().map(|v| SkillId::new(*v)).collect()
}

#[tokio::test]
async fn test_chain_plain_policy_one_module_per_skill() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &chain()).await.unwrap();
    learner(&t.learners, "l1", &[]).await.unwrap();

    let outcome = t
        .planner
        .plan_curriculum(&LearnerId::new("l1"), &[target("c", 1)], Some("topological-sort"))
        .await
        .unwrap();

    let id = outcome.curriculum_id().unwrap();
    let curriculum = t.curricula.find_curriculum_by_id(id).await.unwrap().unwrap();
    let modules: Vec<Vec<SkillId>> = curriculum.modules.iter().map(|m| m.skill_ids()).collect();
    assert_eq!(modules, vec![ids(&["a"]), ids(&["b"]), ids(&["c"])]);
    assert_eq!(
        curriculum.modules.iter().map(|m| m.position).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );

    for module in &curriculum.modules {
        assert_eq!(t.curricula.find_module_by_id(module.id).await.as_ref(), Some(module));
        for lesson in &module.lessons {
            assert_eq!(t.curricula.find_lesson_by_id(lesson.id).await.as_ref(), Some(lesson));
        }
    }
    assert_eq!(t.curricula.module_count().await, 3);
    assert_eq!(t.curricula.lesson_count().await, 3);
}

#[tokio::test]
async fn test_satisfied_target_is_noop() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &chain()).await.unwrap();
    learner(&t.learners, "l1", &[("c", 1)]).await.unwrap();

    let outcome = t
        .planner
        .plan_curriculum(&LearnerId::new("l1"), &[target("c", 1)], None)
        .await
        .unwrap();
    assert_eq!(outcome, PlanOutcome::UpToDate);
    assert_eq!(t.curricula.curriculum_count().await, 0);
    assert_eq!(t.curricula.module_count().await, 0);
}

#[tokio::test]
async fn test_scaffold_chain() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &chain()).await.unwrap();

    let tree = t.planner.scaffold(&SkillId::new("a"), &SkillId::new("c")).await.unwrap();
    let mut members = tree.skill_ids();
    members.sort();
    assert_eq!(members, ids(&["b", "c"]));
    assert_eq!(tree.root_skill_ids, ids(&["b"]));
}

#[tokio::test]
async fn test_covered_target_gives_empty_gap_and_noop_plan() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &chain()).await.unwrap();
    // holding c at level 1 implies everything a requires
    learner(&t.learners, "l1", &[("c", 1), ("b", 1), ("a", 1)]).await.unwrap();

    let tree = t.planner.pairwise_gap(&SkillId::new("c"), &SkillId::new("a")).await.unwrap();
    assert!(tree.is_empty());
    assert!(tree.root_skill_ids.is_empty());

    let outcome = t
        .planner
        .plan_curriculum(&LearnerId::new("l1"), &[target("a", 1)], None)
        .await
        .unwrap();
    assert!(outcome.is_up_to_date());
}

#[tokio::test]
async fn test_tree_roots_are_members_and_non_roots_have_inner_prerequisite() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    let skills = vec![
        skill("base", &[]),
        skill("x", &["base"]),
        skill("y", &["base"]),
        skill("z", &["x", "y"]),
        skill("w", &["z", "base"]),
        skill("other", &[]),
    ];
    seed(&t.skills, &skills).await.unwrap();

    let tree = t.planner.pairwise_gap(&SkillId::new("other"), &SkillId::new("w")).await.unwrap();
    assert_eq!(tree.len(), 5);
    assert_eq!(tree.root_skill_ids, ids(&["base"]));
    for root in &tree.root_skill_ids {
        assert!(tree.contains(root));
    }
    for member in tree.skills.iter().filter(|s| !tree.root_skill_ids.contains(&s.id)) {
        assert!(member.prerequisite_skill_ids.iter().any(|p| tree.contains(p)));
    }
}

#[tokio::test]
async fn test_plain_policy_places_prerequisites_earlier() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    let skills = vec![
        skill("base", &[]),
        skill("x", &["base"]),
        skill("y", &["base"]),
        skill("z", &["x", "y"]),
        skill("w", &["z", "base"]),
        skill("v", &["y"]),
    ];
    seed(&t.skills, &skills).await.unwrap();
    learner(&t.learners, "l1", &[]).await.unwrap();

    let outcome = t
        .planner
        .plan_curriculum(&LearnerId::new("l1"), &[target("w", 2), target("v", 1)], None)
        .await
        .unwrap();
    let id = outcome.curriculum_id().unwrap();
    let curriculum = t.curricula.find_curriculum_by_id(id).await.unwrap().unwrap();

    let mut position: HashMap<SkillId, usize> = HashMap::new();
    for module in &curriculum.modules {
        for skill_id in module.skill_ids() {
            position.insert(skill_id, module.position);
        }
    }
    assert_eq!(position.len(), 6);
    for s in &skills {
        for prerequisite in &s.prerequisite_skill_ids {
            assert!(position[prerequisite] < position[&s.id], "{} before {}", prerequisite, s.id);
        }
    }
}

#[tokio::test]
async fn test_cycle_fails_without_persisting() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &[skill("a", &["b"]), skill("b", &["a"]), skill("c", &["a"])]).await.unwrap();
    learner(&t.learners, "l1", &[]).await.unwrap();

    for strategy in SequencingStrategy::names() {
        let result = t
            .planner
            .plan_curriculum(&LearnerId::new("l1"), &[target("c", 1)], Some(strategy))
            .await;
        match result {
            Err(PathwayError::CircularDependency(mut members)) => {
                members.sort();
                assert_eq!(members, ids(&["a", "b"]));
            }
            other => panic!("{}: expected circular dependency, got {:?}", strategy, other),
        }
    }
    assert_eq!(t.curricula.curriculum_count().await, 0);
    assert_eq!(t.curricula.lesson_count().await, 0);
}

#[tokio::test]
async fn test_immersive_carries_foundational_to_practical() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &[skill("f", &[]), skill("p", &["f"])]).await.unwrap();
    learner(&t.learners, "l1", &[]).await.unwrap();

    let outcome = t
        .planner
        .plan_curriculum(&LearnerId::new("l1"), &[target("p", 2)], Some("immersive-practice"))
        .await
        .unwrap();
    let id = outcome.curriculum_id().unwrap();
    let curriculum = t.curricula.find_curriculum_by_id(id).await.unwrap().unwrap();

    assert_eq!(curriculum.modules.len(), 1);
    assert_eq!(
        curriculum.modules[0].transformations(),
        vec![
            Transformation::new("f", 0, 1).unwrap(),
            Transformation::new("p", 0, 2).unwrap(),
        ]
    );
}

#[tokio::test]
async fn test_partial_competency_raises_from_current_level() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    seed(&t.skills, &chain()).await.unwrap();
    learner(&t.learners, "l1", &[("a", 2), ("c", 1)]).await.unwrap();

    let outcome = t
        .planner
        .plan_curriculum(&LearnerId::new("l1"), &[target("c", 3)], None)
        .await
        .unwrap();
    let id = outcome.curriculum_id().unwrap();
    let curriculum = t.curricula.find_curriculum_by_id(id).await.unwrap().unwrap();

    // a is already held above the implied level, so only b and c need work
    let transformations: Vec<Transformation> =
        curriculum.modules.iter().flat_map(|m| m.transformations()).collect();
    assert_eq!(
        transformations,
        vec![
            Transformation::new("b", 0, 1).unwrap(),
            Transformation::new("c", 1, 3).unwrap(),
        ]
    );
    assert_eq!(curriculum.modules[0].position, 1);
}

#[tokio::test]
async fn test_non_essential_skills_on_generic_path() {
    let t = test_planner(PlannerConfig::default()).unwrap();
    let skills = vec![
        skill("start", &[]),
        skill("ideal", &["start"]),
        skill("detour", &["ideal"]),
        skill("generic", &["detour"]),
    ];
    seed(&t.skills, &skills).await.unwrap();

    let extra = t
        .planner
        .non_essential_skills(&SkillId::new("start"), &SkillId::new("generic"), &SkillId::new("ideal"))
        .await
        .unwrap();
    let names: Vec<&str> = extra.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["GENERIC", "DETOUR"]);

    let none = t
        .planner
        .non_essential_skills(&SkillId::new("start"), &SkillId::new("ideal"), &SkillId::new("generic"))
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn test_sequencing_directly_over_skill_map() {
    let skills: SkillMap = chain().into_iter().map(|s| (s.id.clone(), s)).collect();
    let gaps = vec![
        Transformation::new("c", 0, 1).unwrap(),
        Transformation::new("a", 0, 1).unwrap(),
    ];

    // b is consumed silently, it has no transformation
    let plan = SequencingStrategy::TopologicalSort.sequence(&gaps, &skills).unwrap();
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[1].position, 2);
    assert_eq!(plan[1].skill_ids(), ids(&["c"]));
}

#[tokio::test]
async fn test_repository_failure_reaches_caller_unchanged() {
    let store = UnavailableSkillStore { message: "db down" };
    let err = PrerequisiteClosure::new(&store)
        .closure(&skill("b", &["a"]))
        .await
        .unwrap_err();
    assert!(matches!(err, PathwayError::Repository(ref source) if source.to_string() == "db down"));

    let t = unavailable_planner("db down").unwrap();
    learner(&t.learners, "l1", &[]).await.unwrap();

    let err = t
        .planner
        .pairwise_gap(&SkillId::new("a"), &SkillId::new("b"))
        .await
        .unwrap_err();
    assert!(matches!(err, PathwayError::Repository(ref source) if source.to_string() == "db down"));

    for strategy in SequencingStrategy::names() {
        let err = t
            .planner
            .plan_curriculum(&LearnerId::new("l1"), &[target("c", 1)], Some(strategy))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Repository error: db down");
    }
    assert_eq!(t.curricula.curriculum_count().await, 0);
    assert_eq!(t.curricula.lesson_count().await, 0);
}
