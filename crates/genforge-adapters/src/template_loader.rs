//! Filesystem-based template loader.
//!
//! Discovers `template.toml` manifests anywhere under a directory and turns
//! them into [`GenerationTemplate`]s ready for the template registry.
//!
//! # Directory layout expected
//!
//! ```text
//! templates/
//! ├── nextjs-auth/
//! │   ├── template.toml        ← manifest (required)
//! │   └── files/
//! │       └── page.tsx         ← referenced by `source`
//! └── team/
//!     └── cli-tool/
//!         └── template.toml    ← nesting is fine
//! ```
//!
//! # `template.toml` format
//!
//! ```toml
//! [template]
//! id          = "nextjs-auth"
//! name        = "Next.js with auth"
//! description = "App router plus NextAuth"   # optional
//! archetype   = "nextjs-web"
//!
//! [constraints]
//! platforms    = ["web"]
//! capabilities = ["authentication"]          # optional
//! architecture = ["server-rendered"]         # optional
//! compliance   = ["accessibility"]           # optional
//!
//! [constraints.stack]
//! frontend = ["Next.js", "React"]
//!
//! [[files]]
//! path    = "README.md"
//! content = "# {{projectName}}"              # inline, parameterized
//!
//! [[files]]
//! path       = "src/app/page.tsx"
//! source     = "files/page.tsx"              # sibling file
//! literal    = true                          # optional: no interpolation
//! executable = false                         # optional
//! overwrite  = true                          # optional
//!
//! [[commands]]
//! command           = "npm install"
//! description       = "Install dependencies"
//! working_directory = "."                     # optional
//!
//! [[dependencies]]
//! name    = "next-auth"
//! version = "^4.24.0"
//! kind    = "runtime"                        # runtime | dev | peer | optional
//!
//! [[validation]]
//! kind        = "file-exists"               # file-exists | command-success |
//! description = "Core files exist"          # lint-pass | test-pass | build-success
//! paths       = ["package.json"]
//! ```
//!
//! `custom` rules carry a Rust predicate and cannot be written in a manifest.

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use tracing::{debug, instrument, warn};
use walkdir::WalkDir;

use genforge_core::domain::{
    Archetype, ArchitectureFlag, Capability, ComplianceFlag, DependencyKind, DomainError,
    GenerationTemplate, Platform, ProjectConstraints, RelativePath, StackCategory,
    TemplateCommand, TemplateDependency, TemplateFile, TemplateId, TemplateSource, ValidationRule,
};

/// File name the loader looks for.
pub const MANIFEST_FILE: &str = "template.toml";

// ── Manifest types ────────────────────────────────────────────────────────────

/// Deserialised representation of a `template.toml` file.
#[derive(Debug, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct TemplateManifest {
    pub template: TemplateSection,
    pub constraints: ConstraintSection,
    #[serde(default)]
    pub files: Vec<FileEntry>,
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
    #[serde(default)]
    pub dependencies: Vec<DependencyEntry>,
    #[serde(default)]
    pub validation: Vec<RuleEntry>,
}

/// `[template]` section - identity of the template.
#[derive(Debug, Deserialize, Clone)]
pub struct TemplateSection {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub archetype: String,
}

/// `[constraints]` section - the template's own constraint profile.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ConstraintSection {
    #[serde(default)]
    pub platforms: Vec<String>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub architecture: Vec<String>,
    #[serde(default)]
    pub compliance: Vec<String>,
    #[serde(default)]
    pub stack: BTreeMap<String, Vec<String>>,
}

/// One entry under `[[files]]`. Exactly one of `content` and `source`.
#[derive(Debug, Deserialize, Clone)]
pub struct FileEntry {
    pub path: String,
    pub content: Option<String>,
    /// Path relative to the manifest's directory.
    pub source: Option<String>,
    #[serde(default)]
    pub literal: bool,
    #[serde(default)]
    pub executable: bool,
    #[serde(default = "default_true")]
    pub overwrite: bool,
}

fn default_true() -> bool {
    true
}

/// One entry under `[[commands]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct CommandEntry {
    pub command: String,
    #[serde(default)]
    pub description: String,
    pub working_directory: Option<String>,
    #[serde(default)]
    pub independent: bool,
}

/// One entry under `[[dependencies]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct DependencyEntry {
    pub name: String,
    pub version: Option<String>,
    pub kind: Option<String>,
    pub platform: Option<String>,
}

/// One entry under `[[validation]]`.
#[derive(Debug, Deserialize, Clone)]
pub struct RuleEntry {
    pub kind: RuleEntryKind,
    pub description: String,
    #[serde(default)]
    pub paths: Vec<String>,
    pub command: Option<String>,
}

/// Rule kinds a manifest can express.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RuleEntryKind {
    FileExists,
    CommandSuccess,
    LintPass,
    TestPass,
    BuildSuccess,
}

// ── Loader ────────────────────────────────────────────────────────────────────

/// Loads [`GenerationTemplate`]s from every `template.toml` under a directory.
///
/// Manifests that fail to parse or build emit a `WARN` log and are skipped;
/// they do not prevent other templates from loading.
///
/// # Example
///
/// ```no_run
/// use genforge_adapters::template_loader::ManifestLoader;
///
/// let loader = ManifestLoader::new("./templates");
/// let templates = loader.load_all()?;
/// println!("Loaded {} templates", templates.len());
/// # Ok::<(), genforge_core::domain::DomainError>(())
/// ```
pub struct ManifestLoader {
    templates_dir: PathBuf,
}

impl ManifestLoader {
    pub fn new(templates_dir: impl Into<PathBuf>) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// Load every valid manifest, sorted by manifest path.
    ///
    /// # Errors
    ///
    /// [`DomainError::InvalidTemplate`] if `templates_dir` does not exist or
    /// is not a directory.
    #[instrument(skip(self), fields(dir = %self.templates_dir.display()))]
    pub fn load_all(&self) -> Result<Vec<GenerationTemplate>, DomainError> {
        if !self.templates_dir.is_dir() {
            return Err(DomainError::InvalidTemplate(format!(
                "templates directory not found: {}",
                self.templates_dir.display()
            )));
        }

        let mut manifests: Vec<PathBuf> = WalkDir::new(&self.templates_dir)
            .follow_links(false)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(e) => Some(e),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable entry");
                    None
                }
            })
            .filter(|e| e.file_type().is_file() && e.file_name() == MANIFEST_FILE)
            .map(walkdir::DirEntry::into_path)
            .collect();
        manifests.sort();

        let mut templates = Vec::with_capacity(manifests.len());
        for manifest_path in manifests {
            match self.load_manifest(&manifest_path) {
                Ok(template) => {
                    debug!(id = %template.id, archetype = %template.archetype, "loaded template");
                    templates.push(template);
                }
                Err(e) => {
                    warn!(
                        manifest = %manifest_path.display(),
                        error = %e,
                        "skipping template manifest due to load error"
                    );
                }
            }
        }

        debug!(count = templates.len(), "finished loading templates");
        Ok(templates)
    }

    /// Load one manifest file.
    #[instrument(skip(self))]
    pub fn load_manifest(&self, manifest_path: &Path) -> Result<GenerationTemplate, DomainError> {
        let raw = fs::read_to_string(manifest_path).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to read '{}': {e}",
                manifest_path.display()
            ))
        })?;

        let manifest: TemplateManifest = toml::from_str(&raw).map_err(|e| {
            DomainError::InvalidTemplate(format!(
                "failed to parse '{}': {e}",
                manifest_path.display()
            ))
        })?;

        let base_dir = manifest_path.parent().unwrap_or_else(|| Path::new("."));
        build_template(manifest, base_dir)
    }
}

/// Turn a parsed manifest into a validated template. `base_dir` resolves
/// `source` references.
pub fn build_template(
    manifest: TemplateManifest,
    base_dir: &Path,
) -> Result<GenerationTemplate, DomainError> {
    let archetype = Archetype::new(&manifest.template.archetype)?;
    let constraints = parse_constraints(archetype, &manifest.constraints)?;

    let files = manifest
        .files
        .iter()
        .map(|entry| parse_file(entry, base_dir))
        .collect::<Result<Vec<_>, _>>()?;

    let mut builder = GenerationTemplate::builder()
        .id(TemplateId::new(manifest.template.id)?)
        .name(manifest.template.name)
        .description(manifest.template.description)
        .constraints(constraints)
        .files(files);

    for entry in &manifest.commands {
        builder = builder.command(parse_command(entry)?);
    }
    for entry in &manifest.dependencies {
        builder = builder.dependency(parse_dependency(entry)?);
    }
    for entry in &manifest.validation {
        builder = builder.rule(parse_rule(entry)?);
    }

    builder.build()
}

// ── Free parsing functions ────────────────────────────────────────────────────

pub fn parse_constraints(
    archetype: Archetype,
    section: &ConstraintSection,
) -> Result<ProjectConstraints, DomainError> {
    let mut builder = ProjectConstraints::builder(archetype);

    for p in &section.platforms {
        builder = builder.platform(p.parse::<Platform>()?);
    }
    for c in &section.capabilities {
        builder = builder.require(c.parse::<Capability>()?);
    }
    for a in &section.architecture {
        builder = builder.architecture(a.parse::<ArchitectureFlag>()?);
    }
    for c in &section.compliance {
        builder = builder.compliance(c.parse::<ComplianceFlag>()?);
    }
    for (category, techs) in &section.stack {
        let techs: Vec<&str> = techs.iter().map(String::as_str).collect();
        builder = builder.stack(category.parse::<StackCategory>()?, &techs);
    }

    Ok(builder.build())
}

fn parse_file(entry: &FileEntry, base_dir: &Path) -> Result<TemplateFile, DomainError> {
    let path = RelativePath::try_new(normalize_path(&entry.path))?;

    let content = match (&entry.content, &entry.source) {
        (Some(inline), None) => inline.clone(),
        (None, Some(source)) => {
            // Sources must stay inside the manifest directory too.
            let source = RelativePath::try_new(normalize_path(source))?;
            let full = source.under(base_dir);
            fs::read_to_string(&full).map_err(|e| {
                DomainError::InvalidTemplate(format!(
                    "failed to read source '{}' for '{path}': {e}",
                    full.display()
                ))
            })?
        }
        _ => {
            return Err(DomainError::InvalidTemplate(format!(
                "file '{path}' needs exactly one of `content` or `source`"
            )));
        }
    };

    let mut file = if entry.literal {
        TemplateFile::literal(path, TemplateSource::from(content))
    } else {
        TemplateFile::parameterized(path, TemplateSource::from(content))
    };
    if entry.executable {
        file = file.executable();
    }
    if !entry.overwrite {
        file = file.no_overwrite();
    }
    Ok(file)
}

fn parse_command(entry: &CommandEntry) -> Result<TemplateCommand, DomainError> {
    let mut command = TemplateCommand::new(&entry.command, &entry.description);
    if let Some(dir) = &entry.working_directory {
        command = command.in_dir(RelativePath::try_new(normalize_path(dir))?);
    }
    if entry.independent {
        command = command.independent();
    }
    Ok(command)
}

fn parse_dependency(entry: &DependencyEntry) -> Result<TemplateDependency, DomainError> {
    let kind = match &entry.kind {
        Some(k) => k.parse::<DependencyKind>()?,
        None => DependencyKind::default(),
    };
    let mut dep = TemplateDependency::new(&entry.name, entry.version.as_deref(), kind);
    if let Some(p) = &entry.platform {
        dep = dep.only_on(p.parse::<Platform>()?);
    }
    Ok(dep)
}

fn parse_rule(entry: &RuleEntry) -> Result<ValidationRule, DomainError> {
    let command = || {
        entry.command.clone().ok_or_else(|| {
            DomainError::InvalidTemplate(format!(
                "validation rule '{}' needs a `command`",
                entry.description
            ))
        })
    };

    Ok(match entry.kind {
        RuleEntryKind::FileExists => {
            if entry.paths.is_empty() {
                return Err(DomainError::InvalidTemplate(format!(
                    "validation rule '{}' needs at least one path",
                    entry.description
                )));
            }
            let paths = entry
                .paths
                .iter()
                .map(|p| RelativePath::try_new(normalize_path(p)))
                .collect::<Result<Vec<_>, _>>()?;
            ValidationRule::file_exists(&entry.description, paths)
        }
        RuleEntryKind::CommandSuccess => ValidationRule::command_success(&entry.description, command()?),
        RuleEntryKind::LintPass => ValidationRule::lint_pass(&entry.description, command()?),
        RuleEntryKind::TestPass => ValidationRule::test_pass(&entry.description, command()?),
        RuleEntryKind::BuildSuccess => ValidationRule::build_success(&entry.description, command()?),
    })
}

/// Normalise a path to forward slashes so Windows and Unix manifests
/// compare identically.
fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use genforge_core::domain::{FileContent, RuleKind};
    use tempfile::TempDir;

    // ── helpers ───────────────────────────────────────────────────────────

    /// Write a template directory (manifest plus extra files) under `root`.
    fn write_template(root: &Path, dir: &str, manifest: &str, files: &[(&str, &str)]) {
        let dir = root.join(dir);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(MANIFEST_FILE), manifest).unwrap();
        for (rel, content) in files {
            let full = dir.join(rel);
            if let Some(parent) = full.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(full, content).unwrap();
        }
    }

    const MINIMAL_MANIFEST: &str = r##"
[template]
id        = "tpl"
name      = "Test Template"
archetype = "cli-tool"

[constraints]
platforms = ["server"]

[[files]]
path    = "README.md"
content = "# {{projectName}}"
"##;

    // ── load_all ──────────────────────────────────────────────────────────

    #[test]
    fn load_all_returns_error_for_missing_dir() {
        let loader = ManifestLoader::new("/absolutely/does/not/exist");
        assert!(matches!(
            loader.load_all(),
            Err(DomainError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn load_all_finds_nested_manifests() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "a", MINIMAL_MANIFEST, &[]);
        write_template(
            temp.path(),
            "team/deep/b",
            &MINIMAL_MANIFEST.replace("\"tpl\"", "\"tpl-b\""),
            &[],
        );

        let templates = ManifestLoader::new(temp.path()).load_all().unwrap();
        let ids: Vec<_> = templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["tpl", "tpl-b"]);
    }

    #[test]
    fn load_all_continues_when_one_manifest_is_invalid() {
        let temp = TempDir::new().unwrap();
        write_template(temp.path(), "bad", "this is = = not toml", &[]);
        write_template(temp.path(), "good", MINIMAL_MANIFEST, &[]);

        let templates = ManifestLoader::new(temp.path()).load_all().unwrap();
        assert_eq!(templates.len(), 1, "bad manifest should be skipped");
    }

    // ── template building ─────────────────────────────────────────────────

    #[test]
    fn loads_full_manifest() {
        let manifest = r##"
[template]
id          = "nextjs-auth"
name        = "Next.js with auth"
description = "App router plus NextAuth"
archetype   = "nextjs-web"

[constraints]
platforms    = ["web"]
capabilities = ["authentication"]
architecture = ["server-rendered"]

[constraints.stack]
frontend = ["Next.js", "React"]

[[files]]
path   = "src/app/page.tsx"
source = "files/page.tsx"

[[files]]
path       = "scripts/setup.sh"
content    = "#!/bin/sh\necho {{projectName}}"
literal    = true
executable = true
overwrite  = false

[[commands]]
command           = "npm install"
description       = "Install dependencies"
working_directory = "apps/web"

[[dependencies]]
name    = "next-auth"
version = "^4.24.0"

[[dependencies]]
name = "vitest"
kind = "dev"

[[validation]]
kind        = "file-exists"
description = "Page exists"
paths       = ["src/app/page.tsx"]

[[validation]]
kind        = "build-success"
description = "Builds"
command     = "npm run build"
"##;
        let temp = TempDir::new().unwrap();
        write_template(
            temp.path(),
            "auth",
            manifest,
            &[("files/page.tsx", "export default function Page() {}")],
        );

        let t = ManifestLoader::new(temp.path())
            .load_manifest(&temp.path().join("auth").join(MANIFEST_FILE))
            .unwrap();

        assert_eq!(t.id.as_str(), "nextjs-auth");
        assert_eq!(t.archetype.as_str(), "nextjs-web");
        assert!(t.constraints.requires(Capability::Authentication));
        assert!(t.constraints.has_architecture(ArchitectureFlag::ServerRendered));
        assert_eq!(
            t.constraints.stack(StackCategory::Frontend).unwrap(),
            &["Next.js".to_string(), "React".to_string()]
        );

        assert!(matches!(t.files[0].content, FileContent::Parameterized(_)));
        match &t.files[1].content {
            FileContent::Literal(src) => {
                assert_eq!(src.as_str(), "#!/bin/sh\necho {{projectName}}")
            }
            other => panic!("expected literal content, got {other:?}"),
        }
        assert!(t.files[1].executable);
        assert!(!t.files[1].overwrite);

        assert_eq!(
            t.commands[0].working_directory,
            Some(RelativePath::new("apps/web"))
        );
        assert_eq!(t.dependencies[1].kind, DependencyKind::Dev);
        assert_eq!(t.validation[1].kind(), RuleKind::BuildSuccess);
    }

    #[test]
    fn file_needs_exactly_one_content_source() {
        let entry = FileEntry {
            path: "a.txt".into(),
            content: Some("x".into()),
            source: Some("b.txt".into()),
            literal: false,
            executable: false,
            overwrite: true,
        };
        assert!(parse_file(&entry, Path::new(".")).is_err());
    }

    #[test]
    fn source_outside_manifest_dir_is_rejected() {
        let entry = FileEntry {
            path: "a.txt".into(),
            content: None,
            source: Some("../secrets.txt".into()),
            literal: false,
            executable: false,
            overwrite: true,
        };
        assert!(matches!(
            parse_file(&entry, Path::new("/tmp")),
            Err(DomainError::PathEscapesRoot { .. })
        ));
    }

    #[test]
    fn custom_rules_are_not_expressible() {
        let manifest = format!(
            "{MINIMAL_MANIFEST}\n[[validation]]\nkind = \"custom\"\ndescription = \"x\"\n"
        );
        assert!(toml::from_str::<TemplateManifest>(&manifest).is_err());
    }

    #[test]
    fn command_rule_without_command_is_an_error() {
        let entry = RuleEntry {
            kind: RuleEntryKind::LintPass,
            description: "lint".into(),
            paths: vec![],
            command: None,
        };
        assert!(parse_rule(&entry).is_err());
    }

    #[test]
    fn unknown_platform_is_an_error() {
        let section = ConstraintSection {
            platforms: vec!["toaster".into()],
            ..Default::default()
        };
        let err = parse_constraints(Archetype::new("x").unwrap(), &section).unwrap_err();
        assert!(err.to_string().contains("toaster"));
    }

    #[test]
    fn normalize_path_replaces_backslashes() {
        assert_eq!(normalize_path(r"src\app\page.tsx"), "src/app/page.tsx");
    }
}
