//! Named transformations over the seeded catalog.

use pathway_core::{Competency, PathwayError};

use crate::catalog::{CQRS, EVENTUAL_CONSISTENCY, RICH_DOMAIN_MODELS};

/// A reusable set of target competencies under a stable key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformationDefinition {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub target_competencies: Vec<Competency>,
}

/// Library of named transformations.
#[derive(Clone, Debug)]
pub struct TransformationLibrary {
    definitions: Vec<TransformationDefinition>,
}

impl TransformationLibrary {
    /// The built-in library keyed by `adopt-ddd` and `become-contributor`.
    pub fn builtin() -> pathway_core::Result<Self> {
        let definitions = vec![
            TransformationDefinition {
                key: "adopt-ddd",
                name: "Adopt Domain-Driven Design",
                description: "Transition from anemic models to using rich domain models and aggregates.",
                target_competencies: vec![Competency::new(RICH_DOMAIN_MODELS, 2)?],
            },
            TransformationDefinition {
                key: "become-contributor",
                name: "Become a Contributor",
                description: "Master advanced architectural patterns to contribute to complex systems.",
                target_competencies: vec![
                    Competency::new(RICH_DOMAIN_MODELS, 3)?,
                    Competency::new(CQRS, 2)?,
                    Competency::new(EVENTUAL_CONSISTENCY, 2)?,
                ],
            },
        ];
        Ok(Self { definitions })
    }

    pub fn get(&self, key: &str) -> Option<&TransformationDefinition> {
        self.definitions.iter().find(|definition| definition.key == key)
    }

    /// Like [`get`](Self::get), but an unknown key is `NotFound`.
    pub fn require(&self, key: &str) -> pathway_core::Result<&TransformationDefinition> {
        self.get(key)
            .ok_or_else(|| PathwayError::NotFound(format!("transformation {}", key)))
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.definitions.iter().map(|definition| definition.key)
    }
}
