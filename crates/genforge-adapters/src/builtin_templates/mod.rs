//! Built-in templates and manifest discovery.
//!
//! [`builtin_templates`] returns the eight templates that ship with genforge.
//! [`catalog`] builds the registry a run actually uses: built-ins first, then
//! any `template.toml` manifests found on disk. A manifest whose id matches a
//! built-in replaces it in place.
//!
//! # Manifest resolution order
//!
//! The first directory that exists wins:
//!
//! 1. an explicit directory passed by the caller (the CLI's
//!    `templates.manifest_dir` setting)
//! 2. `$GENFORGE_TEMPLATES_DIR`
//! 3. `./templates`, relative to the current working directory
//! 4. `<executable-dir>/templates`
//!
//! No directory at all is not an error; the built-ins are enough to run.

mod desktop;
mod extensions;
mod mobile;
mod monorepo;

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use genforge_core::{
    application::TemplateRegistry,
    domain::{DomainError, GenerationTemplate, TemplateId},
};

use crate::template_loader::ManifestLoader;

pub const TEMPLATES_DIR_ENV: &str = "GENFORGE_TEMPLATES_DIR";

// ── Public API ────────────────────────────────────────────────────────────────

/// Every built-in template, in registration order.
pub fn builtin_templates() -> Result<Vec<GenerationTemplate>, DomainError> {
    Ok(vec![
        monorepo::nx_full_stack()?,
        mobile::expo_app()?,
        desktop::electron_app()?,
        extensions::chrome_extension()?,
        extensions::vscode_extension()?,
        extensions::cli_tool()?,
        extensions::shopify_app()?,
        extensions::discord_bot()?,
    ])
}

/// A registry holding only the built-in templates.
pub fn builtin_registry() -> Result<TemplateRegistry, DomainError> {
    let mut registry = TemplateRegistry::new();
    for template in builtin_templates()? {
        registry.register(template)?;
    }
    Ok(registry)
}

/// Built-ins plus discovered manifests.
///
/// # Errors
///
/// Only when a built-in fails to build or a discovered templates directory
/// cannot be read. Individual invalid manifests are skipped with a warning.
#[instrument(skip_all, fields(explicit = ?manifest_dir))]
pub fn catalog(manifest_dir: Option<&Path>) -> Result<TemplateRegistry, DomainError> {
    let mut registry = builtin_registry()?;

    let Some(dir) = discover_manifest_dir(manifest_dir) else {
        debug!("no manifest directory found, using built-in templates only");
        return Ok(registry);
    };

    let manifests = ManifestLoader::new(&dir).load_all()?;
    info!(path = %dir.display(), count = manifests.len(), "Loaded template manifests");

    for template in manifests {
        let id = template.id.clone();
        if let Err(e) = registry.register(template) {
            warn!(%id, error = %e, "Skipping template manifest");
        }
    }
    Ok(registry)
}

/// Look up one built-in template by id.
pub fn builtin(id: &str) -> Option<GenerationTemplate> {
    let id = TemplateId::new(id).ok()?;
    builtin_templates().ok()?.into_iter().find(|t| t.id == id)
}

// ── Resolution helpers ────────────────────────────────────────────────────────

/// The first existing directory among the candidates.
pub fn discover_manifest_dir(explicit: Option<&Path>) -> Option<PathBuf> {
    candidate_paths(explicit).into_iter().find(|p| {
        let found = p.is_dir();
        debug!(path = %p.display(), found, "checking manifest directory");
        found
    })
}

fn candidate_paths(explicit: Option<&Path>) -> Vec<PathBuf> {
    let mut paths = Vec::with_capacity(4);

    if let Some(dir) = explicit {
        paths.push(dir.to_path_buf());
    }
    if let Ok(env_dir) = std::env::var(TEMPLATES_DIR_ENV)
        && !env_dir.trim().is_empty()
    {
        paths.push(PathBuf::from(env_dir));
    }
    paths.push(PathBuf::from("templates"));
    if let Some(exe_sibling) = exe_sibling_templates() {
        paths.push(exe_sibling);
    }

    paths
}

fn exe_sibling_templates() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.join("templates")))
}

// ── Content helpers ───────────────────────────────────────────────────────────

/// Two-space indented JSON, the layout npm and friends write.
pub(crate) fn pretty(value: Value) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use genforge_core::domain::{FileContent, GenerationContext};

    use super::*;

    fn context_for(template: &GenerationTemplate, name: &str) -> GenerationContext {
        GenerationContext::new(
            name,
            PathBuf::from("/tmp").join(name),
            template.constraints.clone(),
            template.clone(),
        )
    }

    #[test]
    fn eight_templates_with_unique_ids() {
        let templates = builtin_templates().unwrap();
        assert_eq!(templates.len(), 8);

        let ids: HashSet<_> = templates.iter().map(|t| t.id.to_string()).collect();
        assert_eq!(ids.len(), 8);
    }

    #[test]
    fn every_template_matches_its_profile() {
        for t in builtin_templates().unwrap() {
            let profile = crate::builtin_constraints::profile(t.archetype.as_str())
                .unwrap_or_else(|| panic!("no profile for {}", t.archetype));
            assert_eq!(t.constraints, profile, "{}", t.id);
            assert!(!t.validation.is_empty(), "{} has no rules", t.id);
        }
    }

    #[test]
    fn json_files_are_valid_json() {
        for t in builtin_templates().unwrap() {
            let ctx = context_for(&t, "My App");
            for file in t.files.iter().filter(|f| f.path.to_string().ends_with(".json")) {
                let text = file.content.resolve(&ctx);
                serde_json::from_str::<Value>(&text)
                    .unwrap_or_else(|e| panic!("{}:{} is not JSON: {e}", t.id, file.path));
            }
        }
    }

    #[test]
    fn no_placeholder_survives_resolution() {
        for t in builtin_templates().unwrap() {
            let ctx = context_for(&t, "Acme");
            for file in &t.files {
                if matches!(file.content, FileContent::Literal(_)) {
                    continue;
                }
                let text = file.content.resolve(&ctx);
                assert!(!text.contains("{{projectName}}"), "{}:{}", t.id, file.path);
            }
        }
    }

    #[test]
    fn content_is_deterministic_for_a_fixed_context() {
        let mut generated = 0;
        for t in builtin_templates().unwrap() {
            let ctx = context_for(&t, "Acme Tools");
            let copy = ctx.clone();
            for file in &t.files {
                if matches!(file.content, FileContent::Generated(_)) {
                    generated += 1;
                }
                let first = file.content.resolve(&ctx);
                assert_eq!(first, file.content.resolve(&ctx), "{}:{}", t.id, file.path);
                assert_eq!(first, file.content.resolve(&copy), "{}:{}", t.id, file.path);
            }
        }
        assert!(generated > 0, "no generated content was exercised");
    }

    #[test]
    fn builtin_lookup() {
        assert!(builtin("chrome-extension-v3").is_some());
        assert!(builtin("missing-template").is_none());
    }

    #[test]
    fn explicit_dir_comes_first() {
        let dir = tempfile::tempdir().unwrap();
        let found = discover_manifest_dir(Some(dir.path())).unwrap();
        assert_eq!(found, dir.path());
    }

    #[test]
    fn catalog_adds_manifests_from_explicit_dir() {
        let dir = tempfile::tempdir().unwrap();
        let tpl = dir.path().join("hello");
        std::fs::create_dir_all(&tpl).unwrap();
        std::fs::write(
            tpl.join("template.toml"),
            r#"
[template]
id = "hello-web"
name = "Hello"
archetype = "hello"

[constraints]
platforms = ["web"]

[[files]]
path = "index.txt"
content = "hello {{name}}"
"#,
        )
        .unwrap();

        let registry = catalog(Some(dir.path())).unwrap();
        assert_eq!(registry.len(), 9);
        assert!(
            registry
                .get_by_id(&TemplateId::new("hello-web").unwrap())
                .is_some()
        );
    }
}
