//! Seeded knowledge graph for a backend developer moving to domain-driven design.

use pathway_core::storage::SkillRepository;
use pathway_core::{Skill, SkillId};

pub const ANEMIC_MODELS: &str = "anemic-models";
pub const SERVICE_LAYERS: &str = "service-layers";
pub const UBIQUITOUS_LANGUAGE: &str = "ubiquitous-language";
pub const VALUE_OBJECTS: &str = "value-objects";
pub const ENTITIES: &str = "entities";
pub const AGGREGATES: &str = "aggregates";
pub const RICH_DOMAIN_MODELS: &str = "rich-domain-models";
pub const PORTS_AND_ADAPTERS: &str = "ports-and-adapters";
pub const PERFORMANCE_VS_CONSISTENCY: &str = "performance-vs-consistency";
pub const CQRS: &str = "cqrs";
pub const DOMAIN_EVENTS: &str = "domain-events";
pub const EVENTUAL_CONSISTENCY: &str = "eventual-consistency";

/// Handles to the landmark skills of the seeded graph.
#[derive(Clone, Debug)]
pub struct SeededCatalog {
    pub anemic_models: Skill,
    pub rich_domain_models: Skill,
    pub cqrs: Skill,
    pub eventual_consistency: Skill,
}

/// The twelve skills of the backend developer graph, prerequisites first.
pub fn backend_developer_skills() -> Vec<Skill> {
    vec![
        // starting point
        Skill::new(ANEMIC_MODELS, "Anemic Models")
            .with_description("Understanding of simple data classes (POJOs/DTOs) with no logic."),
        Skill::new(SERVICE_LAYERS, "Service Layers")
            .with_description("Business logic is placed in stateless service classes.")
            .depends_on(ANEMIC_MODELS),
        // core domain modelling
        Skill::new(UBIQUITOUS_LANGUAGE, "Ubiquitous Language")
            .with_description("Developing a shared language between developers and domain experts."),
        Skill::new(VALUE_OBJECTS, "Value Objects")
            .with_description("Modeling immutable concepts defined by their attributes.")
            .depends_on(ANEMIC_MODELS)
            .depends_on(UBIQUITOUS_LANGUAGE),
        Skill::new(ENTITIES, "Entities")
            .with_description("Modeling concepts with a unique, continuous identity.")
            .depends_on(ANEMIC_MODELS)
            .depends_on(UBIQUITOUS_LANGUAGE),
        Skill::new(AGGREGATES, "Aggregates")
            .with_description("Forming a transactional consistency boundary around a cluster of objects.")
            .depends_on(VALUE_OBJECTS)
            .depends_on(ENTITIES),
        Skill::new(RICH_DOMAIN_MODELS, "Rich Domain Models")
            .with_description("Encapsulating business logic within the domain objects themselves.")
            .depends_on(AGGREGATES),
        // hexagonal architecture
        Skill::new(PORTS_AND_ADAPTERS, "Ports & Adapters")
            .with_description("Decoupling the application core from infrastructure concerns.")
            .depends_on(SERVICE_LAYERS)
            .depends_on(RICH_DOMAIN_MODELS),
        // trade-offs
        Skill::new(PERFORMANCE_VS_CONSISTENCY, "Performance vs. Consistency Trade-off")
            .with_description("Understanding the cost of large, strongly consistent aggregates.")
            .depends_on(AGGREGATES),
        Skill::new(CQRS, "CQRS")
            .with_description("Segregating read and write operations to optimize both.")
            .depends_on(PERFORMANCE_VS_CONSISTENCY)
            .depends_on(PORTS_AND_ADAPTERS),
        Skill::new(DOMAIN_EVENTS, "Domain Events")
            .with_description("Communicating between aggregates without creating direct coupling.")
            .depends_on(AGGREGATES),
        Skill::new(EVENTUAL_CONSISTENCY, "Eventual Consistency")
            .with_description("Accepting that read models may have a slight delay in updating.")
            .depends_on(CQRS)
            .depends_on(DOMAIN_EVENTS),
    ]
}

/// Saves the backend developer graph into `repository`.
///
/// Seeding twice overwrites the same ids.
pub async fn seed(repository: &dyn SkillRepository) -> pathway_core::Result<SeededCatalog> {
    let skills = backend_developer_skills();
    for skill in &skills {
        repository.save_skill(skill).await?;
    }
    tracing::info!(skills = skills.len(), "seeded backend developer knowledge graph");

    let landmark = |id: &str| {
        let id = SkillId::new(id);
        skills
            .iter()
            .find(|skill| skill.id == id)
            .cloned()
            .ok_or_else(|| pathway_core::PathwayError::NotFound(format!("catalog skill {}", id)))
    };

    Ok(SeededCatalog {
        anemic_models: landmark(ANEMIC_MODELS)?,
        rich_domain_models: landmark(RICH_DOMAIN_MODELS)?,
        cqrs: landmark(CQRS)?,
        eventual_consistency: landmark(EVENTUAL_CONSISTENCY)?,
    })
}
