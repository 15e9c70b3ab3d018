//! Constraint and template registries.
//!
//! Both are filled once at startup (`&mut self` registration), then wrapped in
//! an `Arc` and shared read-only by every run.

use std::collections::BTreeMap;

use tracing::debug;

use crate::domain::{
    Archetype, Capability, ConstraintOverride, ConstraintReport, DomainError, DomainValidator,
    GenerationTemplate, ProjectConstraints, StackCategory, TemplateId, rules,
};

// ============================================================================
// Constraint Registry
// ============================================================================

/// Canonical constraint profile per archetype.
#[derive(Debug, Clone, Default)]
pub struct ConstraintRegistry {
    profiles: BTreeMap<Archetype, ProjectConstraints>,
}

impl ConstraintRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a set of profiles. Later duplicates win.
    pub fn from_profiles(profiles: impl IntoIterator<Item = ProjectConstraints>) -> Self {
        let mut registry = Self::new();
        for p in profiles {
            registry.register(p);
        }
        registry
    }

    /// Add or replace the profile for its archetype.
    pub fn register(&mut self, profile: ProjectConstraints) {
        debug!(archetype = %profile.archetype(), "Registering constraint profile");
        self.profiles.insert(profile.archetype().clone(), profile);
    }

    /// Copy of the canonical profile for `archetype`.
    pub fn get(&self, archetype: &Archetype) -> Option<ProjectConstraints> {
        self.profiles.get(archetype).cloned()
    }

    pub fn validate(&self, constraints: &ProjectConstraints) -> ConstraintReport {
        DomainValidator::validate_constraints(constraints)
    }

    pub fn merge(
        &self,
        base: &ProjectConstraints,
        over: &ConstraintOverride,
    ) -> ProjectConstraints {
        base.merge(over)
    }

    /// Registered archetypes, sorted.
    pub fn archetypes(&self) -> Vec<&Archetype> {
        self.profiles.keys().collect()
    }

    pub fn required_capabilities(&self, archetype: &Archetype) -> Option<Vec<Capability>> {
        self.profiles
            .get(archetype)
            .map(ProjectConstraints::required_capabilities)
    }

    pub fn supported_stack(
        &self,
        archetype: &Archetype,
    ) -> Option<&BTreeMap<StackCategory, Vec<String>>> {
        self.profiles.get(archetype).map(ProjectConstraints::tech_stack)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

// ============================================================================
// Template Registry
// ============================================================================

/// Templates in registration order.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: Vec<GenerationTemplate>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template.
    ///
    /// Re-registering an id replaces the earlier template in its original
    /// position, so selection order does not change.
    ///
    /// # Errors
    ///
    /// Any [`GenerationTemplate::validate`] failure.
    pub fn register(&mut self, template: GenerationTemplate) -> Result<(), DomainError> {
        DomainValidator::validate_template(&template)?;

        match self.templates.iter_mut().find(|t| t.id == template.id) {
            Some(existing) => {
                debug!(id = %template.id, "Replacing template");
                *existing = template;
            }
            None => {
                debug!(id = %template.id, archetype = %template.archetype, "Registering template");
                self.templates.push(template);
            }
        }
        Ok(())
    }

    pub fn get_by_id(&self, id: &TemplateId) -> Option<&GenerationTemplate> {
        self.templates.iter().find(|t| &t.id == id)
    }

    /// All templates for `archetype`, in registration order.
    pub fn get_by_archetype(&self, archetype: &Archetype) -> Vec<&GenerationTemplate> {
        self.templates
            .iter()
            .filter(|t| &t.archetype == archetype)
            .collect()
    }

    /// The template a run uses: the first one registered for the archetype.
    pub fn select(&self, archetype: &Archetype) -> Option<&GenerationTemplate> {
        self.templates.iter().find(|t| &t.archetype == archetype)
    }

    pub fn all(&self) -> &[GenerationTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
