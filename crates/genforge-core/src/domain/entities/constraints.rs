//! Project constraints: the declarative requirement set a generated project
//! must satisfy.
//!
//! A [`ProjectConstraints`] value is built once (per archetype profile, or per
//! request) and never mutated afterwards. Overrides are applied with
//! [`ProjectConstraints::merge`], which returns a new value.
//!
//! Validation does not return `Err`: it produces a [`ConstraintReport`] that
//! lists every problem as a human-readable string.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::domain::{
    rules,
    value_objects::{
        Archetype, ArchitectureFlag, Capability, ComplianceFlag, Platform, StackCategory,
    },
};

/// Canonical requirement profile for one generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConstraints {
    archetype: Archetype,
    platforms: BTreeSet<Platform>,
    tech_stack: BTreeMap<StackCategory, Vec<String>>,
    capabilities: BTreeMap<Capability, bool>,
    architecture: BTreeMap<ArchitectureFlag, bool>,
    compliance: BTreeMap<ComplianceFlag, bool>,
}

impl ProjectConstraints {
    /// Start building a constraint set for `archetype`.
    pub fn builder(archetype: Archetype) -> ProjectConstraintsBuilder {
        ProjectConstraintsBuilder {
            inner: Self {
                archetype,
                platforms: BTreeSet::new(),
                tech_stack: BTreeMap::new(),
                capabilities: BTreeMap::new(),
                architecture: BTreeMap::new(),
                compliance: BTreeMap::new(),
            },
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    pub fn targets(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    /// True when mobile is the only targeted platform.
    pub fn is_mobile_only(&self) -> bool {
        self.platforms.len() == 1 && self.targets(Platform::Mobile)
    }

    pub fn tech_stack(&self) -> &BTreeMap<StackCategory, Vec<String>> {
        &self.tech_stack
    }

    /// Technologies declared for `category`, or `None` if the category is absent.
    pub fn stack(&self, category: StackCategory) -> Option<&[String]> {
        self.tech_stack.get(&category).map(Vec::as_slice)
    }

    pub fn requires(&self, capability: Capability) -> bool {
        self.capabilities.get(&capability).copied().unwrap_or(false)
    }

    pub fn has_architecture(&self, flag: ArchitectureFlag) -> bool {
        self.architecture.get(&flag).copied().unwrap_or(false)
    }

    pub fn demands(&self, flag: ComplianceFlag) -> bool {
        self.compliance.get(&flag).copied().unwrap_or(false)
    }

    pub fn capability_flags(&self) -> &BTreeMap<Capability, bool> {
        &self.capabilities
    }

    pub fn architecture_flags(&self) -> &BTreeMap<ArchitectureFlag, bool> {
        &self.architecture
    }

    pub fn compliance_flags(&self) -> &BTreeMap<ComplianceFlag, bool> {
        &self.compliance
    }

    /// Enabled capabilities in declaration order.
    pub fn required_capabilities(&self) -> Vec<Capability> {
        Capability::ALL
            .into_iter()
            .filter(|c| self.requires(*c))
            .collect()
    }

    // ── Operations ────────────────────────────────────────────────────────

    /// Check cross-field consistency.
    ///
    /// Delegates to `rules::check_constraints`. Do not add checks here;
    /// register them in `rules.rs`.
    pub fn validate(&self) -> ConstraintReport {
        ConstraintReport::from_errors(rules::check_constraints(self))
    }

    /// Field-wise shallow merge.
    ///
    /// `platforms` is replaced wholesale when the override sets it. Tech-stack
    /// categories and every flag map are merged key by key: keys present in
    /// the override win, all other keys are kept from `self`.
    pub fn merge(&self, over: &ConstraintOverride) -> Self {
        let mut merged = self.clone();

        if let Some(platforms) = &over.platforms {
            merged.platforms = platforms.clone();
        }
        for (category, techs) in &over.tech_stack {
            merged.tech_stack.insert(*category, techs.clone());
        }
        merged.capabilities.extend(over.capabilities.iter());
        merged.architecture.extend(over.architecture.iter());
        merged.compliance.extend(over.compliance.iter());

        merged
    }
}

/// Fluent constructor for [`ProjectConstraints`].
///
/// Building never fails; consistency is checked by
/// [`ProjectConstraints::validate`].
#[derive(Debug, Clone)]
pub struct ProjectConstraintsBuilder {
    inner: ProjectConstraints,
}

impl ProjectConstraintsBuilder {
    pub fn platform(mut self, platform: Platform) -> Self {
        self.inner.platforms.insert(platform);
        self
    }

    pub fn platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.inner.platforms.extend(platforms);
        self
    }

    /// Set the technologies for one stack category (replaces any previous list).
    pub fn stack(mut self, category: StackCategory, techs: &[&str]) -> Self {
        self.inner
            .tech_stack
            .insert(category, techs.iter().map(|t| (*t).to_string()).collect());
        self
    }

    pub fn require(self, capability: Capability) -> Self {
        self.capability(capability, true)
    }

    pub fn capability(mut self, capability: Capability, enabled: bool) -> Self {
        self.inner.capabilities.insert(capability, enabled);
        self
    }

    pub fn architecture(self, flag: ArchitectureFlag) -> Self {
        self.architecture_flag(flag, true)
    }

    pub fn architecture_flag(mut self, flag: ArchitectureFlag, enabled: bool) -> Self {
        self.inner.architecture.insert(flag, enabled);
        self
    }

    pub fn compliance(mut self, flag: ComplianceFlag) -> Self {
        self.inner.compliance.insert(flag, true);
        self
    }

    pub fn build(self) -> ProjectConstraints {
        self.inner
    }
}

/// Caller-supplied partial constraint set, applied with
/// [`ProjectConstraints::merge`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintOverride {
    pub platforms: Option<BTreeSet<Platform>>,
    pub tech_stack: BTreeMap<StackCategory, Vec<String>>,
    pub capabilities: BTreeMap<Capability, bool>,
    pub architecture: BTreeMap<ArchitectureFlag, bool>,
    pub compliance: BTreeMap<ComplianceFlag, bool>,
}

impl ConstraintOverride {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platforms(mut self, platforms: impl IntoIterator<Item = Platform>) -> Self {
        self.platforms = Some(platforms.into_iter().collect());
        self
    }

    pub fn stack(mut self, category: StackCategory, techs: &[&str]) -> Self {
        self.tech_stack
            .insert(category, techs.iter().map(|t| (*t).to_string()).collect());
        self
    }

    pub fn capability(mut self, capability: Capability, enabled: bool) -> Self {
        self.capabilities.insert(capability, enabled);
        self
    }

    pub fn architecture(mut self, flag: ArchitectureFlag, enabled: bool) -> Self {
        self.architecture.insert(flag, enabled);
        self
    }

    pub fn compliance(mut self, flag: ComplianceFlag, enabled: bool) -> Self {
        self.compliance.insert(flag, enabled);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Outcome of constraint validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConstraintReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

impl ConstraintReport {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn archetype(s: &str) -> Archetype {
        Archetype::new(s).unwrap()
    }

    fn web_profile() -> ProjectConstraints {
        ProjectConstraints::builder(archetype("nextjs-web"))
            .platform(Platform::Web)
            .stack(StackCategory::Frontend, &["React", "Next.js"])
            .stack(StackCategory::Testing, &["Jest"])
            .require(Capability::Testing)
            .capability(Capability::Authentication, true)
            .architecture(ArchitectureFlag::ServerRendered)
            .compliance(ComplianceFlag::Seo)
            .build()
    }

    #[test]
    fn merge_is_key_wise_for_maps() {
        let base = web_profile();
        let over = ConstraintOverride::new()
            .stack(StackCategory::Frontend, &["Svelte"])
            .capability(Capability::Authentication, false)
            .capability(Capability::Payments, true);

        let merged = base.merge(&over);

        assert_eq!(
            merged.stack(StackCategory::Frontend).unwrap(),
            &["Svelte".to_string()]
        );
        // untouched category survives
        assert_eq!(
            merged.stack(StackCategory::Testing).unwrap(),
            &["Jest".to_string()]
        );
        assert!(!merged.requires(Capability::Authentication));
        assert!(merged.requires(Capability::Payments));
        assert!(merged.requires(Capability::Testing));
        assert!(merged.has_architecture(ArchitectureFlag::ServerRendered));
    }

    #[test]
    fn merge_replaces_platform_set_and_leaves_base_untouched() {
        let base = web_profile();
        let merged = base.merge(&ConstraintOverride::new().platforms([Platform::Desktop]));

        assert!(merged.targets(Platform::Desktop));
        assert!(!merged.targets(Platform::Web));
        assert!(base.targets(Platform::Web));
    }

    #[test]
    fn empty_override_is_identity() {
        let base = web_profile();
        assert!(ConstraintOverride::new().is_empty());
        assert_eq!(base.merge(&ConstraintOverride::new()), base);
    }

    #[test]
    fn required_capabilities_lists_enabled_only() {
        let caps = web_profile().required_capabilities();
        assert_eq!(caps, vec![Capability::Authentication, Capability::Testing]);
    }

    #[test]
    fn report_validity_mirrors_errors() {
        assert!(ConstraintReport::from_errors(vec![]).valid);
        assert!(!ConstraintReport::from_errors(vec!["x".into()]).valid);
    }
}
