//! Template Service - read-only queries over the registries.
//!
//! Separated from [`GenerationService`](super::GenerationService) so listing
//! and inspection never need filesystem or process adapters.

use std::sync::Arc;

use serde::Serialize;

use crate::{
    application::registry::{ConstraintRegistry, TemplateRegistry},
    domain::{Archetype, DomainError, GenerationTemplate, ProjectConstraints, TemplateId},
    error::GenforgeResult,
};

/// Template metadata for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateInfo {
    pub id: String,
    pub name: String,
    pub description: String,
    pub archetype: String,
    pub platforms: Vec<String>,
    pub files: usize,
    pub commands: usize,
    pub rules: usize,
    /// True when this is the template a run for its archetype would use.
    pub selected: bool,
}

/// Constraint profile summary for display.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileInfo {
    pub archetype: String,
    pub constraints: ProjectConstraints,
    pub required_capabilities: Vec<String>,
    pub templates: usize,
}

pub struct TemplateService {
    constraints: Arc<ConstraintRegistry>,
    templates: Arc<TemplateRegistry>,
}

impl TemplateService {
    pub fn new(constraints: Arc<ConstraintRegistry>, templates: Arc<TemplateRegistry>) -> Self {
        Self {
            constraints,
            templates,
        }
    }

    /// Every registered template, in registration order.
    pub fn list(&self) -> Vec<TemplateInfo> {
        self.templates.all().iter().map(|t| self.info(t)).collect()
    }

    pub fn for_archetype(&self, archetype: &Archetype) -> Vec<TemplateInfo> {
        self.templates
            .get_by_archetype(archetype)
            .into_iter()
            .map(|t| self.info(t))
            .collect()
    }

    pub fn get(&self, id: &TemplateId) -> GenforgeResult<TemplateInfo> {
        self.templates
            .get_by_id(id)
            .map(|t| self.info(t))
            .ok_or_else(|| {
                DomainError::UnknownName {
                    kind: "template",
                    value: id.to_string(),
                }
                .into()
            })
    }

    /// Every constraint profile, sorted by archetype.
    pub fn profiles(&self) -> Vec<ProfileInfo> {
        self.constraints
            .archetypes()
            .into_iter()
            .filter_map(|a| self.constraints.get(a))
            .map(|c| self.profile_info(c))
            .collect()
    }

    pub fn profile(&self, archetype: &Archetype) -> GenforgeResult<ProfileInfo> {
        self.constraints
            .get(archetype)
            .map(|c| self.profile_info(c))
            .ok_or_else(|| {
                DomainError::UnknownName {
                    kind: "archetype",
                    value: archetype.to_string(),
                }
                .into()
            })
    }

    /// Archetypes that have a profile, a template, or both.
    pub fn known_archetypes(&self) -> Vec<Archetype> {
        let mut all: Vec<Archetype> = self.constraints.archetypes().into_iter().cloned().collect();
        all.extend(self.templates.all().iter().map(|t| t.archetype.clone()));
        all.sort();
        all.dedup();
        all
    }

    // -------------------------------------------------------------------------
    // Internal Helpers
    // -------------------------------------------------------------------------

    fn info(&self, t: &GenerationTemplate) -> TemplateInfo {
        let selected = self
            .templates
            .select(&t.archetype)
            .is_some_and(|s| s.id == t.id);

        TemplateInfo {
            id: t.id.to_string(),
            name: t.name.clone(),
            description: t.description.clone(),
            archetype: t.archetype.to_string(),
            platforms: t
                .constraints
                .platforms()
                .iter()
                .map(ToString::to_string)
                .collect(),
            files: t.files.len(),
            commands: t.commands.len(),
            rules: t.validation.len(),
            selected,
        }
    }

    fn profile_info(&self, constraints: ProjectConstraints) -> ProfileInfo {
        ProfileInfo {
            archetype: constraints.archetype().to_string(),
            required_capabilities: constraints
                .required_capabilities()
                .iter()
                .map(ToString::to_string)
                .collect(),
            templates: self.templates.get_by_archetype(constraints.archetype()).len(),
            constraints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Capability, Platform, TemplateFile};

    fn service() -> TemplateService {
        let a = Archetype::new("x-web").unwrap();
        let profile = ProjectConstraints::builder(a.clone())
            .platform(Platform::Web)
            .require(Capability::Testing)
            .build();

        let mut templates = TemplateRegistry::new();
        for id in ["x-one", "x-two"] {
            templates
                .register(
                    GenerationTemplate::builder()
                        .id(TemplateId::new(id).unwrap())
                        .name(id)
                        .constraints(profile.clone())
                        .file(TemplateFile::literal("a.txt", "a"))
                        .build()
                        .unwrap(),
                )
                .unwrap();
        }

        TemplateService::new(
            Arc::new(ConstraintRegistry::from_profiles([profile])),
            Arc::new(templates),
        )
    }

    #[test]
    fn list_marks_the_selected_template() {
        let infos = service().list();
        assert_eq!(infos.len(), 2);
        assert!(infos[0].selected);
        assert!(!infos[1].selected);
        assert_eq!(infos[0].platforms, vec!["web"]);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let err = service()
            .get(&TemplateId::new("nope").unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
        assert!(service().profile(&Archetype::new("nope").unwrap()).is_err());
    }

    #[test]
    fn profiles_count_their_templates() {
        let profiles = service().profiles();
        assert_eq!(profiles.len(), 1);
        assert_eq!(profiles[0].templates, 2);
        assert_eq!(profiles[0].required_capabilities, vec!["testing"]);
    }
}
