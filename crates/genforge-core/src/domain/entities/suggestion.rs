//! Enhancement suggestions.
//!
//! These are the shapes an [`Enhancer`](crate::application::ports::Enhancer)
//! hands back. They are deliberately loose (plain strings, everything
//! optional) because they usually come from a language model; the context
//! validates them when they are merged.

use serde::{Deserialize, Deserializer, Serialize};

use super::template::{DependencyKind, TemplateDependency};

/// Extra files, dependencies and commands proposed for a template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSuggestion {
    pub files: Vec<SuggestedFile>,
    pub dependencies: Vec<SuggestedDependency>,
    pub commands: Vec<SuggestedCommand>,
}

impl TemplateSuggestion {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.dependencies.is_empty() && self.commands.is_empty()
    }
}

/// Extra files proposed for one post-generation task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskSuggestion {
    pub files: Vec<SuggestedFile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedFile {
    pub path: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub executable: bool,
}

impl SuggestedFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
            executable: false,
        }
    }
}

/// A dependency, given either as a bare name or as an object.
///
/// Both `"zod"` and `{"name": "zod", "version": "^3", "dev": true}` parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestedDependency {
    pub name: String,
    pub version: Option<String>,
    pub kind: DependencyKind,
}

impl SuggestedDependency {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
            kind: DependencyKind::Runtime,
        }
    }
}

impl From<SuggestedDependency> for TemplateDependency {
    fn from(value: SuggestedDependency) -> Self {
        TemplateDependency {
            name: value.name,
            version: value.version,
            kind: value.kind,
            platform: None,
        }
    }
}

impl<'de> Deserialize<'de> for SuggestedDependency {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Name(String),
            Full {
                name: String,
                #[serde(default)]
                version: Option<String>,
                #[serde(default)]
                dev: bool,
                #[serde(default)]
                kind: Option<DependencyKind>,
            },
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Name(name) => Self::named(name),
            Raw::Full {
                name,
                version,
                dev,
                kind,
            } => Self {
                name,
                version,
                kind: kind.unwrap_or(if dev {
                    DependencyKind::Dev
                } else {
                    DependencyKind::Runtime
                }),
            },
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestedCommand {
    pub command: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "workingDirectory")]
    pub working_directory: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dependencies_accept_strings_and_objects() {
        let s: TemplateSuggestion = serde_json::from_str(
            r#"{
                "dependencies": ["zod", {"name": "vitest", "version": "^1", "dev": true}]
            }"#,
        )
        .unwrap();

        assert_eq!(s.dependencies[0], SuggestedDependency::named("zod"));
        assert_eq!(s.dependencies[1].kind, DependencyKind::Dev);
        assert_eq!(s.dependencies[1].version.as_deref(), Some("^1"));
        assert!(s.files.is_empty());
    }

    #[test]
    fn command_accepts_camel_case_working_directory() {
        let c: SuggestedCommand =
            serde_json::from_str(r#"{"command": "npm i", "workingDirectory": "apps/web"}"#)
                .unwrap();
        assert_eq!(c.working_directory.as_deref(), Some("apps/web"));
    }
}
