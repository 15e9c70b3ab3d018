//! Subcommand handlers.
//!
//! Each handler translates parsed arguments into calls on the core services
//! and renders the outcome through the [`OutputManager`](crate::output::OutputManager).

use std::sync::Arc;

use tracing::debug;

use genforge_adapters::{builtin_constraints, builtin_templates};
use genforge_core::{
    application::{ConstraintRegistry, TemplateRegistry, TemplateService},
    domain::Archetype,
};

use crate::{
    config::AppConfig,
    error::{CliError, CliResult},
};

pub mod completions;
pub mod config;
pub mod constraints;
pub mod generate;
pub mod list;

/// The constraint profiles and template catalog a command works against.
pub(crate) struct Registries {
    pub constraints: Arc<ConstraintRegistry>,
    pub templates: Arc<TemplateRegistry>,
}

impl Registries {
    /// Built-in profiles plus built-in templates and any manifests found in
    /// the configured (or discovered) templates directory.
    pub fn load(config: &AppConfig) -> CliResult<Self> {
        let constraints = builtin_constraints::builtin_registry().map_err(core)?;
        let templates =
            builtin_templates::catalog(config.templates.manifest_dir.as_deref()).map_err(core)?;
        debug!(
            profiles = constraints.len(),
            templates = templates.len(),
            "Registries loaded"
        );
        Ok(Self {
            constraints: Arc::new(constraints),
            templates: Arc::new(templates),
        })
    }

    pub fn template_service(&self) -> TemplateService {
        TemplateService::new(Arc::clone(&self.constraints), Arc::clone(&self.templates))
    }
}

/// Parse an archetype tag and check that something knows about it.
pub(crate) fn resolve_archetype(raw: &str, service: &TemplateService) -> CliResult<Archetype> {
    let archetype = Archetype::new(raw).map_err(core)?;
    let known = service.known_archetypes();
    if known.contains(&archetype) {
        Ok(archetype)
    } else {
        Err(CliError::UnknownArchetype {
            archetype: archetype.to_string(),
            known: known.iter().map(ToString::to_string).collect(),
        })
    }
}

fn core(err: impl Into<genforge_core::error::GenforgeError>) -> CliError {
    CliError::Core(err.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registries() -> Registries {
        Registries::load(&AppConfig::default()).unwrap()
    }

    #[test]
    fn builtin_registries_load() {
        let regs = registries();
        assert_eq!(regs.constraints.len(), 10);
        assert!(regs.templates.len() >= 8);
    }

    #[test]
    fn known_archetype_resolves() {
        let service = registries().template_service();
        let archetype = resolve_archetype("expo-mobile", &service).unwrap();
        assert_eq!(archetype.as_str(), "expo-mobile");
    }

    #[test]
    fn profile_only_archetype_still_resolves() {
        let service = registries().template_service();
        assert!(resolve_archetype("nextjs-web", &service).is_ok());
    }

    #[test]
    fn unknown_archetype_is_not_found() {
        let service = registries().template_service();
        let err = resolve_archetype("cobol-mainframe", &service).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }
}
