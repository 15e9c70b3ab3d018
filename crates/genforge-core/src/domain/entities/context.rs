//! Per-run generation context.
//!
//! Everything a content producer or a command placeholder can see lives here:
//! the project name, where it is being written, the resolved constraints, the
//! run's copy of the template, caller variables and run metadata.
//!
//! The only mutation allowed after construction is an enhancement merge,
//! which appends to the template and records what it did in the merge log.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    common::RelativePath,
    constraints::ProjectConstraints,
    suggestion::{SuggestedFile, TaskSuggestion, TemplateSuggestion},
    template::{FileContent, GenerationTemplate, TemplateCommand, TemplateFile},
};
use crate::domain::{error::DomainError, naming};

/// Name recorded as the generator in run metadata.
pub const GENERATOR_NAME: &str = "genforge";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("placeholder pattern compiles"));

// ── Variables ────────────────────────────────────────────────────────────────

/// A caller-supplied variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Variable {
    Str(String),
    Number(f64),
    Bool(bool),
}

impl Variable {
    /// Parse a `key=value` assignment. The value is always taken as a string.
    pub fn parse_assignment(raw: &str) -> Result<(String, Self), DomainError> {
        let (key, value) = raw
            .split_once('=')
            .ok_or_else(|| DomainError::InvalidVariable(raw.to_string()))?;
        let key = key.trim();
        if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
            return Err(DomainError::InvalidVariable(raw.to_string()));
        }
        Ok((key.to_string(), Self::Str(value.to_string())))
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl From<&str> for Variable {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for Variable {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for Variable {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Variable {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

// ── Metadata ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationMetadata {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub generated_by: String,
    pub version: String,
}

impl GenerationMetadata {
    /// Fresh metadata: new run id, current time.
    pub fn fresh() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            generated_by: GENERATOR_NAME.to_string(),
            version: crate::VERSION.to_string(),
        }
    }
}

// ── Merge log ────────────────────────────────────────────────────────────────

/// What one enhancement merge appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MergeRecord {
    /// `"requirements"` for the template enhancement, else the task name.
    pub source: String,
    pub files: usize,
    pub dependencies: usize,
    pub commands: usize,
    /// Suggested paths discarded because they were absolute or escaped the root.
    pub rejected: Vec<String>,
}

impl MergeRecord {
    fn empty(source: &str) -> Self {
        Self {
            source: source.to_string(),
            files: 0,
            dependencies: 0,
            commands: 0,
            rejected: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.files == 0 && self.dependencies == 0 && self.commands == 0
    }
}

// ── Context ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct GenerationContext {
    project_name: String,
    project_path: PathBuf,
    constraints: ProjectConstraints,
    template: GenerationTemplate,
    variables: BTreeMap<String, Variable>,
    metadata: GenerationMetadata,
    merges: Vec<MergeRecord>,
}

impl GenerationContext {
    pub fn new(
        project_name: impl Into<String>,
        project_path: impl Into<PathBuf>,
        constraints: ProjectConstraints,
        template: GenerationTemplate,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_path: project_path.into(),
            constraints,
            template,
            variables: BTreeMap::new(),
            metadata: GenerationMetadata::fresh(),
            merges: Vec::new(),
        }
    }

    pub fn with_variable(mut self, key: impl Into<String>, value: impl Into<Variable>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }

    pub fn with_variables(mut self, vars: impl IntoIterator<Item = (String, Variable)>) -> Self {
        self.variables.extend(vars);
        self
    }

    /// Replace the generated metadata (used to pin timestamps in tests).
    pub fn with_metadata(mut self, metadata: GenerationMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }

    pub fn constraints(&self) -> &ProjectConstraints {
        &self.constraints
    }

    pub fn template(&self) -> &GenerationTemplate {
        &self.template
    }

    pub fn variables(&self) -> &BTreeMap<String, Variable> {
        &self.variables
    }

    pub fn variable(&self, key: &str) -> Option<&Variable> {
        self.variables.get(key)
    }

    pub fn metadata(&self) -> &GenerationMetadata {
        &self.metadata
    }

    pub fn merges(&self) -> &[MergeRecord] {
        &self.merges
    }

    pub fn name_kebab(&self) -> String {
        naming::to_kebab_case(&self.project_name)
    }

    pub fn name_snake(&self) -> String {
        naming::to_snake_case(&self.project_name)
    }

    pub fn name_pascal(&self) -> String {
        naming::to_pascal_case(&self.project_name)
    }

    /// Package-safe name (`[a-z0-9-]`), for `package.json` and friends.
    pub fn package_name(&self) -> String {
        naming::to_package_slug(&self.project_name)
    }

    // ── Interpolation ─────────────────────────────────────────────────────

    /// Substitute `{{key}}` placeholders.
    ///
    /// - string variable: its value
    /// - missing key: the project name
    /// - number or boolean variable: the placeholder is left as written
    pub fn interpolate(&self, text: &str) -> String {
        PLACEHOLDER
            .replace_all(text, |caps: &Captures<'_>| match self.variables.get(&caps[1]) {
                Some(Variable::Str(value)) => value.clone(),
                Some(Variable::Number(_) | Variable::Bool(_)) => caps[0].to_string(),
                None => self.project_name.clone(),
            })
            .into_owned()
    }

    // ── Merges ────────────────────────────────────────────────────────────

    /// Append an enhancement suggestion to this run's template.
    ///
    /// Files and command directories that are absolute or escape the project
    /// root are dropped and listed in the returned record's `rejected`.
    pub fn merge_suggestion(
        &mut self,
        source: &str,
        suggestion: TemplateSuggestion,
    ) -> MergeRecord {
        let mut record = MergeRecord::empty(source);

        let files = accept_files(suggestion.files, &mut record.rejected);
        record.files = files.len();
        self.template.files.extend(files);

        record.dependencies = suggestion.dependencies.len();
        self.template
            .dependencies
            .extend(suggestion.dependencies.into_iter().map(Into::into));

        for cmd in suggestion.commands {
            let working_directory = match cmd.working_directory.as_deref() {
                None | Some("") | Some(".") => None,
                Some(dir) => match RelativePath::try_new(dir) {
                    Ok(p) => Some(p),
                    Err(_) => {
                        record.rejected.push(dir.to_string());
                        continue;
                    }
                },
            };
            self.template.commands.push(TemplateCommand {
                command: cmd.command,
                working_directory,
                description: cmd.description,
                independent: false,
            });
            record.commands += 1;
        }

        self.merges.push(record.clone());
        record
    }

    /// Append a task's files and return them for materialization.
    pub fn merge_task(
        &mut self,
        task: &str,
        suggestion: TaskSuggestion,
    ) -> (MergeRecord, Vec<TemplateFile>) {
        let mut record = MergeRecord::empty(task);
        let files = accept_files(suggestion.files, &mut record.rejected);
        record.files = files.len();
        self.template.files.extend(files.iter().cloned());
        self.merges.push(record.clone());
        (record, files)
    }
}

fn accept_files(files: Vec<SuggestedFile>, rejected: &mut Vec<String>) -> Vec<TemplateFile> {
    files
        .into_iter()
        .filter_map(|f| match RelativePath::try_new(&f.path) {
            Ok(path) => {
                let mut file = TemplateFile::new(path, FileContent::Literal(f.content.into()));
                file.executable = f.executable;
                Some(file)
            }
            Err(_) => {
                rejected.push(f.path);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        SuggestedCommand, SuggestedDependency, TemplateId,
        value_objects::{Archetype, Platform},
    };

    fn context() -> GenerationContext {
        let constraints = ProjectConstraints::builder(Archetype::new("demo").unwrap())
            .platform(Platform::Web)
            .build();
        let template = GenerationTemplate::builder()
            .id(TemplateId::new("demo").unwrap())
            .name("Demo")
            .constraints(constraints.clone())
            .file(TemplateFile::literal("README.md", "# demo"))
            .build()
            .unwrap();
        GenerationContext::new("Demo", "/tmp/out/Demo", constraints, template)
    }

    #[test]
    fn interpolation_rules() {
        let ctx = context()
            .with_variable("author", "ada")
            .with_variable("port", 3000.0)
            .with_variable("strict", true);

        assert_eq!(ctx.interpolate("by {{author}}"), "by ada");
        assert_eq!(ctx.interpolate("hello {{name}}"), "hello Demo");
        assert_eq!(ctx.interpolate("port {{port}}"), "port {{port}}");
        assert_eq!(ctx.interpolate("{{strict}}"), "{{strict}}");
        assert_eq!(ctx.interpolate("no placeholders"), "no placeholders");
        assert_eq!(
            ctx.interpolate("cd {{projectName}} && {{projectName}}"),
            "cd Demo && Demo"
        );
    }

    #[test]
    fn merge_appends_and_logs() {
        let mut ctx = context();
        let record = ctx.merge_suggestion(
            "requirements",
            TemplateSuggestion {
                files: vec![
                    SuggestedFile::new("src/auth.ts", "export {}"),
                    SuggestedFile::new("/etc/passwd", "x"),
                    SuggestedFile::new("../escape.ts", "x"),
                ],
                dependencies: vec![SuggestedDependency::named("zod")],
                commands: vec![SuggestedCommand {
                    command: "npm i zod".into(),
                    description: String::new(),
                    working_directory: None,
                }],
            },
        );

        assert_eq!(record.files, 1);
        assert_eq!(record.dependencies, 1);
        assert_eq!(record.commands, 1);
        assert_eq!(record.rejected, vec!["/etc/passwd", "../escape.ts"]);

        // original file kept, suggestion appended after it
        assert_eq!(ctx.template().files.len(), 2);
        assert_eq!(ctx.template().files[1].path.as_str(), "src/auth.ts");
        assert_eq!(ctx.merges().len(), 1);
    }

    #[test]
    fn task_merge_returns_new_files() {
        let mut ctx = context();
        let (record, files) = ctx.merge_task(
            "Add documentation",
            TaskSuggestion {
                files: vec![SuggestedFile::new("docs/guide.md", "# guide")],
            },
        );
        assert_eq!(record.source, "Add documentation");
        assert_eq!(files.len(), 1);
        assert_eq!(ctx.template().files.len(), 2);
    }

    #[test]
    fn variable_assignment_parsing() {
        assert_eq!(
            Variable::parse_assignment("author=Ada Lovelace").unwrap(),
            ("author".into(), Variable::Str("Ada Lovelace".into()))
        );
        assert_eq!(
            Variable::parse_assignment("empty=").unwrap().1,
            Variable::Str(String::new())
        );
        assert!(Variable::parse_assignment("novalue").is_err());
        assert!(Variable::parse_assignment("bad key=x").is_err());
    }

    #[test]
    fn name_helpers() {
        let ctx = context();
        assert_eq!(ctx.name_kebab(), "demo");
        assert_eq!(ctx.name_pascal(), "Demo");
        assert_eq!(ctx.package_name(), "demo");
    }
}
