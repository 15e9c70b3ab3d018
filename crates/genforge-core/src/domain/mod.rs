// ============================================================================
//  CLEAN MODULE BOUNDARIES
// ============================================================================

//! Core domain layer for genforge.
//!
//! Pure generation logic: constraint profiles, templates, the per-run
//! context, the pipeline state machine and the shape of a run's result. All
//! I/O (filesystem, processes, the enhancement service) sits behind ports in
//! the application layer.
//!
//! - **No I/O**: nothing here touches disk, network or processes
//! - **Immutable profiles**: constraints merge into new values
//! - **Rules as tables**: archetype rules live in [`rules`]

pub mod entities;
pub mod error;
pub mod naming;
pub mod rules;
pub mod state;
pub mod value_objects;

mod validation;

pub use entities::{
    common::RelativePath,
    constraints::{ConstraintOverride, ConstraintReport, ProjectConstraints, ProjectConstraintsBuilder},
    context::{GENERATOR_NAME, GenerationContext, GenerationMetadata, MergeRecord, Variable},
    result::{
        CommandOutcome, CommandReport, FileOutcome, FileReport, GenerationResult, TaskOutcome,
        TaskReport, VALIDATIONS_FAILED, ValidationResult,
    },
    suggestion::{
        SuggestedCommand, SuggestedDependency, SuggestedFile, TaskSuggestion, TemplateSuggestion,
    },
    template::{
        ContentFn, DependencyKind, FileContent, GenerationTemplate, GenerationTemplateBuilder,
        PredicateFn, RuleCheck, RuleKind, TemplateCommand, TemplateDependency, TemplateFile,
        TemplateId, TemplateSource, ValidationRule,
    },
};

pub use error::{DomainError, ErrorCategory};
pub use state::{PipelineState, RunTracker};
pub use validation::DomainValidator;
pub use value_objects::{
    Archetype, ArchitectureFlag, Capability, ComplianceFlag, Platform, StackCategory, archetypes,
};

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    // ========================================================================
    // Value Object Tests
    // ========================================================================

    #[test]
    fn platform_parses_with_aliases() {
        assert_eq!(Platform::from_str("WEB").unwrap(), Platform::Web);
        assert_eq!(Platform::from_str("backend").unwrap(), Platform::Server);
        assert!(matches!(
            Platform::from_str("tv"),
            Err(DomainError::UnknownName { kind: "platform", .. })
        ));
    }

    #[test]
    fn capability_and_flag_aliases() {
        assert_eq!(Capability::from_str("auth").unwrap(), Capability::Authentication);
        assert_eq!(Capability::from_str("cicd").unwrap(), Capability::CiCd);
        assert_eq!(
            ArchitectureFlag::from_str("spa").unwrap(),
            ArchitectureFlag::SinglePage
        );
        assert_eq!(
            ComplianceFlag::from_str("a11y").unwrap(),
            ComplianceFlag::Accessibility
        );
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for p in Platform::ALL {
            assert_eq!(Platform::from_str(p.as_str()).unwrap(), p);
        }
        for c in Capability::ALL {
            assert_eq!(Capability::from_str(&c.to_string()).unwrap(), c);
        }
    }

    #[test]
    fn archetype_validation() {
        assert_eq!(Archetype::new(" Expo-Mobile ").unwrap().as_str(), "expo-mobile");
        assert!(Archetype::new("").is_err());
        assert!(Archetype::new("9lives").is_err());
        assert!(Archetype::new("bad_tag").is_err());
        assert!(Archetype::new("trailing-").is_err());
        assert!(Archetype::new("double--dash").is_err());
    }

    #[test]
    fn archetype_deserializes_through_validation() {
        let ok: Archetype = serde_json::from_str("\"cli-tool\"").unwrap();
        assert_eq!(ok.as_str(), "cli-tool");
        assert!(serde_json::from_str::<Archetype>("\"Not Valid\"").is_err());
    }

    #[test]
    fn constraints_serialize_with_kebab_keys() {
        let c = ProjectConstraints::builder(Archetype::new("node-backend").unwrap())
            .platform(Platform::Server)
            .stack(StackCategory::Backend, &["Express"])
            .require(Capability::CiCd)
            .build();
        let json = serde_json::to_value(&c).unwrap();

        assert_eq!(json["archetype"], "node-backend");
        assert_eq!(json["platforms"][0], "server");
        assert_eq!(json["tech_stack"]["backend"][0], "Express");
        assert_eq!(json["capabilities"]["ci-cd"], true);
    }

    #[test]
    fn domain_errors_carry_suggestions() {
        let err = DomainError::NoTemplateForArchetype("x".into());
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(!err.suggestions().is_empty());
    }
}
