//! Generation template aggregate.
//!
//! A [`GenerationTemplate`] is the blueprint for one archetype: which files to
//! write, which commands to run afterwards, which dependencies the project is
//! expected to carry, and how to check the result.
//!
//! ## Architecture Overview
//!
//! ```text
//! GenerationTemplate (Aggregate Root)
//! ├── TemplateId
//! ├── ProjectConstraints       what the template assumes
//! ├── Vec<TemplateFile>        what to write
//! │    └── FileContent         Literal | Parameterized | Generated(fn)
//! ├── Vec<TemplateCommand>     what to run, in order
//! ├── Vec<TemplateDependency>  descriptive only
//! └── Vec<ValidationRule>      how to judge the result
//!       └── RuleCheck          closed set, one exhaustive match
//! ```
//!
//! Templates are registered once and never mutated in a registry. A run works
//! on its own copy inside the [`GenerationContext`], which may grow through
//! enhancement merges.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use super::{common::RelativePath, constraints::ProjectConstraints, context::GenerationContext};
use crate::domain::{
    error::DomainError,
    value_objects::{Archetype, Platform},
};

/// Pure content producer. Cannot capture ambient state.
pub type ContentFn = fn(&GenerationContext) -> String;

/// Injected validation predicate. `Err` counts as a failed check.
pub type PredicateFn = fn(&GenerationContext) -> Result<bool, String>;

// ============================================================================
// Template Identity
// ============================================================================

/// Stable template identifier (e.g. `expo-mobile-app`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TemplateId(String);

impl TemplateId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let id = raw.into().trim().to_string();
        if id.is_empty() {
            return Err(DomainError::InvalidTemplate(
                "template id cannot be empty".into(),
            ));
        }
        if id.chars().any(char::is_whitespace) {
            return Err(DomainError::InvalidTemplate(format!(
                "template id '{id}' cannot contain whitespace"
            )));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TemplateId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for TemplateId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TemplateId> for String {
    fn from(value: TemplateId) -> Self {
        value.0
    }
}

// ============================================================================
// Core Template Aggregate
// ============================================================================

/// A reusable project blueprint for one archetype.
///
/// ## Invariants (enforced by `validate()`)
///
/// 1. `name` is non-empty
/// 2. `archetype` equals the embedded constraints' archetype
/// 3. File paths are unique within `files`
#[derive(Debug, Clone)]
pub struct GenerationTemplate {
    pub id: TemplateId,
    pub name: String,
    pub description: String,
    pub archetype: Archetype,
    pub constraints: ProjectConstraints,
    pub files: Vec<TemplateFile>,
    pub commands: Vec<TemplateCommand>,
    pub dependencies: Vec<TemplateDependency>,
    pub validation: Vec<ValidationRule>,
}

impl GenerationTemplate {
    pub fn builder() -> GenerationTemplateBuilder {
        GenerationTemplateBuilder::default()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::InvalidTemplate(format!(
                "template '{}' has an empty name",
                self.id
            )));
        }

        if &self.archetype != self.constraints.archetype() {
            return Err(DomainError::InvalidTemplate(format!(
                "template '{}' declares archetype '{}' but its constraints describe '{}'",
                self.id,
                self.archetype,
                self.constraints.archetype()
            )));
        }

        let mut seen = HashSet::new();
        for file in &self.files {
            if !seen.insert(&file.path) {
                return Err(DomainError::DuplicatePath {
                    path: file.path.to_string(),
                });
            }
        }

        Ok(())
    }

    /// True when two or more files target the same path.
    ///
    /// Registered templates never do, but enhancement merges may append a
    /// file that shadows a template file.
    pub fn has_duplicate_paths(&self) -> bool {
        let mut seen = HashSet::new();
        self.files.iter().any(|f| !seen.insert(&f.path))
    }
}

/// Fluent constructor for [`GenerationTemplate`].
///
/// `id`, `name` and `constraints` are required. The archetype is taken from
/// the constraints.
#[derive(Default)]
pub struct GenerationTemplateBuilder {
    id: Option<TemplateId>,
    name: Option<String>,
    description: String,
    constraints: Option<ProjectConstraints>,
    files: Vec<TemplateFile>,
    commands: Vec<TemplateCommand>,
    dependencies: Vec<TemplateDependency>,
    validation: Vec<ValidationRule>,
}

impl GenerationTemplateBuilder {
    pub fn id(mut self, id: TemplateId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn constraints(mut self, constraints: ProjectConstraints) -> Self {
        self.constraints = Some(constraints);
        self
    }

    pub fn file(mut self, file: TemplateFile) -> Self {
        self.files.push(file);
        self
    }

    pub fn files(mut self, files: impl IntoIterator<Item = TemplateFile>) -> Self {
        self.files.extend(files);
        self
    }

    pub fn command(mut self, command: TemplateCommand) -> Self {
        self.commands.push(command);
        self
    }

    pub fn dependency(mut self, dependency: TemplateDependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn dependencies(mut self, deps: impl IntoIterator<Item = TemplateDependency>) -> Self {
        self.dependencies.extend(deps);
        self
    }

    pub fn rule(mut self, rule: ValidationRule) -> Self {
        self.validation.push(rule);
        self
    }

    /// # Errors
    ///
    /// - `MissingRequiredField` if id, name or constraints are not set
    /// - any error from [`GenerationTemplate::validate`]
    pub fn build(self) -> Result<GenerationTemplate, DomainError> {
        let constraints = self
            .constraints
            .ok_or(DomainError::MissingRequiredField {
                field: "constraints",
            })?;

        let template = GenerationTemplate {
            id: self.id.ok_or(DomainError::MissingRequiredField { field: "id" })?,
            name: self
                .name
                .ok_or(DomainError::MissingRequiredField { field: "name" })?,
            description: self.description,
            archetype: constraints.archetype().clone(),
            constraints,
            files: self.files,
            commands: self.commands,
            dependencies: self.dependencies,
            validation: self.validation,
        };

        template.validate()?;
        Ok(template)
    }
}

// ============================================================================
// Files
// ============================================================================

/// One file the template writes.
#[derive(Debug, Clone)]
pub struct TemplateFile {
    pub path: RelativePath,
    pub content: FileContent,
    pub executable: bool,
    /// When false, an existing file at `path` is left alone.
    pub overwrite: bool,
}

impl TemplateFile {
    pub fn new(path: RelativePath, content: FileContent) -> Self {
        Self {
            path,
            content,
            executable: false,
            overwrite: true,
        }
    }

    /// Content written exactly as given.
    pub fn literal(path: impl Into<RelativePath>, content: impl Into<TemplateSource>) -> Self {
        Self::new(path.into(), FileContent::Literal(content.into()))
    }

    /// Content with `{{var}}` placeholders.
    pub fn parameterized(
        path: impl Into<RelativePath>,
        content: impl Into<TemplateSource>,
    ) -> Self {
        Self::new(path.into(), FileContent::Parameterized(content.into()))
    }

    /// Content computed from the run context.
    pub fn generated(path: impl Into<RelativePath>, producer: ContentFn) -> Self {
        Self::new(path.into(), FileContent::Generated(producer))
    }

    pub fn executable(mut self) -> Self {
        self.executable = true;
        self
    }

    pub fn no_overwrite(mut self) -> Self {
        self.overwrite = false;
        self
    }
}

/// How a file's content is produced.
#[derive(Clone)]
pub enum FileContent {
    Literal(TemplateSource),
    Parameterized(TemplateSource),
    Generated(ContentFn),
}

impl FileContent {
    /// Produce the final text for `ctx`. Deterministic for a fixed context.
    pub fn resolve(&self, ctx: &GenerationContext) -> String {
        match self {
            Self::Literal(src) => src.as_str().to_string(),
            Self::Parameterized(src) => ctx.interpolate(src.as_str()),
            Self::Generated(producer) => producer(ctx),
        }
    }
}

impl fmt::Debug for FileContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(src) => f.debug_tuple("Literal").field(src).finish(),
            Self::Parameterized(src) => f.debug_tuple("Parameterized").field(src).finish(),
            Self::Generated(_) => f.write_str("Generated(<fn>)"),
        }
    }
}

/// Source of template text: compile-time or runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    Static(&'static str),
    Owned(String),
}

impl TemplateSource {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Static(s) => s,
            Self::Owned(s) => s,
        }
    }

    /// Quick heuristic used by loaders that don't say which kind they want.
    pub fn contains_placeholder(&self) -> bool {
        let s = self.as_str();
        s.contains("{{") && s.contains("}}")
    }
}

impl From<&'static str> for TemplateSource {
    fn from(s: &'static str) -> Self {
        Self::Static(s)
    }
}

impl From<String> for TemplateSource {
    fn from(s: String) -> Self {
        Self::Owned(s)
    }
}

// ============================================================================
// Commands and Dependencies
// ============================================================================

/// A shell command run after materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateCommand {
    /// May contain `{{var}}` placeholders.
    pub command: String,
    pub working_directory: Option<RelativePath>,
    pub description: String,
    /// Marks the command as not depending on earlier ones. Commands still
    /// run in order.
    pub independent: bool,
}

impl TemplateCommand {
    pub fn new(command: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            working_directory: None,
            description: description.into(),
            independent: false,
        }
    }

    pub fn in_dir(mut self, dir: impl Into<RelativePath>) -> Self {
        self.working_directory = Some(dir.into());
        self
    }

    pub fn independent(mut self) -> Self {
        self.independent = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyKind {
    #[default]
    Runtime,
    Dev,
    Peer,
    Optional,
}

impl DependencyKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Runtime => "runtime",
            Self::Dev => "dev",
            Self::Peer => "peer",
            Self::Optional => "optional",
        }
    }
}

impl fmt::Display for DependencyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "runtime" | "prod" | "production" => Ok(Self::Runtime),
            "dev" | "development" => Ok(Self::Dev),
            "peer" => Ok(Self::Peer),
            "optional" => Ok(Self::Optional),
            other => Err(DomainError::UnknownName {
                kind: "dependency kind",
                value: other.into(),
            }),
        }
    }
}

/// A package the generated project is expected to depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateDependency {
    pub name: String,
    pub version: Option<String>,
    #[serde(default)]
    pub kind: DependencyKind,
    pub platform: Option<Platform>,
}

impl TemplateDependency {
    pub fn new(name: impl Into<String>, version: Option<&str>, kind: DependencyKind) -> Self {
        Self {
            name: name.into(),
            version: version.map(str::to_string),
            kind,
            platform: None,
        }
    }

    pub fn runtime(name: impl Into<String>, version: &str) -> Self {
        Self::new(name, Some(version), DependencyKind::Runtime)
    }

    pub fn dev(name: impl Into<String>, version: &str) -> Self {
        Self::new(name, Some(version), DependencyKind::Dev)
    }

    pub fn only_on(mut self, platform: Platform) -> Self {
        self.platform = Some(platform);
        self
    }
}

// ============================================================================
// Validation Rules
// ============================================================================

/// A post-generation check.
#[derive(Debug, Clone)]
pub struct ValidationRule {
    pub description: String,
    pub check: RuleCheck,
}

/// The closed set of checks a rule can perform.
#[derive(Clone)]
pub enum RuleCheck {
    /// Every path must exist under the project root.
    FileExists(Vec<RelativePath>),
    CommandSuccess(String),
    LintPass(String),
    TestPass(String),
    BuildSuccess(String),
    Custom(PredicateFn),
}

impl fmt::Debug for RuleCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileExists(paths) => f.debug_tuple("FileExists").field(paths).finish(),
            Self::CommandSuccess(c) => f.debug_tuple("CommandSuccess").field(c).finish(),
            Self::LintPass(c) => f.debug_tuple("LintPass").field(c).finish(),
            Self::TestPass(c) => f.debug_tuple("TestPass").field(c).finish(),
            Self::BuildSuccess(c) => f.debug_tuple("BuildSuccess").field(c).finish(),
            Self::Custom(_) => f.write_str("Custom(<fn>)"),
        }
    }
}

/// Discriminant of [`RuleCheck`], for display and manifests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleKind {
    FileExists,
    CommandSuccess,
    LintPass,
    TestPass,
    BuildSuccess,
    Custom,
}

impl RuleKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::FileExists => "file-exists",
            Self::CommandSuccess => "command-success",
            Self::LintPass => "lint-pass",
            Self::TestPass => "test-pass",
            Self::BuildSuccess => "build-success",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ValidationRule {
    pub fn new(description: impl Into<String>, check: RuleCheck) -> Self {
        Self {
            description: description.into(),
            check,
        }
    }

    pub fn file_exists<I, P>(description: impl Into<String>, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<RelativePath>,
    {
        Self::new(
            description,
            RuleCheck::FileExists(paths.into_iter().map(Into::into).collect()),
        )
    }

    pub fn command_success(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(description, RuleCheck::CommandSuccess(command.into()))
    }

    pub fn lint_pass(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(description, RuleCheck::LintPass(command.into()))
    }

    pub fn test_pass(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(description, RuleCheck::TestPass(command.into()))
    }

    pub fn build_success(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self::new(description, RuleCheck::BuildSuccess(command.into()))
    }

    pub fn custom(description: impl Into<String>, predicate: PredicateFn) -> Self {
        Self::new(description, RuleCheck::Custom(predicate))
    }

    pub fn kind(&self) -> RuleKind {
        match self.check {
            RuleCheck::FileExists(_) => RuleKind::FileExists,
            RuleCheck::CommandSuccess(_) => RuleKind::CommandSuccess,
            RuleCheck::LintPass(_) => RuleKind::LintPass,
            RuleCheck::TestPass(_) => RuleKind::TestPass,
            RuleCheck::BuildSuccess(_) => RuleKind::BuildSuccess,
            RuleCheck::Custom(_) => RuleKind::Custom,
        }
    }

    /// The command a command-style rule runs, if any.
    pub fn command(&self) -> Option<&str> {
        match &self.check {
            RuleCheck::CommandSuccess(c)
            | RuleCheck::LintPass(c)
            | RuleCheck::TestPass(c)
            | RuleCheck::BuildSuccess(c) => Some(c),
            RuleCheck::FileExists(_) | RuleCheck::Custom(_) => None,
        }
    }
}

impl Serialize for ValidationRule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ValidationRule", 3)?;
        s.serialize_field("kind", &self.kind())?;
        s.serialize_field("description", &self.description)?;
        match &self.check {
            RuleCheck::FileExists(paths) => s.serialize_field("paths", paths)?,
            RuleCheck::Custom(_) => s.skip_field("command")?,
            _ => s.serialize_field("command", &self.command())?,
        }
        s.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProjectConstraints, value_objects::Platform};

    fn constraints(archetype: &str) -> ProjectConstraints {
        ProjectConstraints::builder(Archetype::new(archetype).unwrap())
            .platform(Platform::Web)
            .build()
    }

    fn minimal() -> GenerationTemplateBuilder {
        GenerationTemplate::builder()
            .id(TemplateId::new("demo").unwrap())
            .name("Demo")
            .constraints(constraints("demo-web"))
    }

    #[test]
    fn builder_takes_archetype_from_constraints() {
        let t = minimal()
            .file(TemplateFile::literal("README.md", "# demo"))
            .build()
            .unwrap();
        assert_eq!(t.archetype.as_str(), "demo-web");
    }

    #[test]
    fn builder_requires_name() {
        let err = GenerationTemplate::builder()
            .id(TemplateId::new("x").unwrap())
            .constraints(constraints("x"))
            .build()
            .unwrap_err();
        assert_eq!(err, DomainError::MissingRequiredField { field: "name" });
    }

    #[test]
    fn duplicate_file_paths_are_rejected() {
        let err = minimal()
            .file(TemplateFile::literal("a.txt", "1"))
            .file(TemplateFile::literal("./a.txt", "2"))
            .build()
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicatePath { .. }));
    }

    #[test]
    fn mismatched_archetype_is_invalid() {
        let mut t = minimal().build().unwrap();
        t.archetype = Archetype::new("other").unwrap();
        assert!(t.validate().is_err());
    }

    #[test]
    fn template_id_rejects_blank_and_whitespace() {
        assert!(TemplateId::new("  ").is_err());
        assert!(TemplateId::new("two words").is_err());
        assert_eq!(TemplateId::new(" ok-id ").unwrap().as_str(), "ok-id");
    }

    #[test]
    fn file_flags() {
        let f = TemplateFile::literal("bin/run.sh", "#!/bin/sh")
            .executable()
            .no_overwrite();
        assert!(f.executable);
        assert!(!f.overwrite);
        assert!(TemplateFile::literal("a", "").overwrite);
    }

    #[test]
    fn rule_kind_and_command() {
        let rule = ValidationRule::lint_pass("Lint", "nx lint");
        assert_eq!(rule.kind(), RuleKind::LintPass);
        assert_eq!(rule.command(), Some("nx lint"));
        assert_eq!(
            ValidationRule::file_exists("f", ["a"]).kind().as_str(),
            "file-exists"
        );
    }

    #[test]
    fn placeholder_detection() {
        assert!(TemplateSource::from("hi {{name}}").contains_placeholder());
        assert!(!TemplateSource::from("plain").contains_placeholder());
    }
}
