//! Domain value objects: Archetype, Platform, Capability, ArchitectureFlag,
//! ComplianceFlag, StackCategory.
//!
//! # Design
//!
//! These are pure value types with equality-by-value and no identity. They
//! hold NO rule logic. Cross-field consistency lives in `rules.rs`. This
//! file's only job is to define the types, their string representations, and
//! their `FromStr` parsers.
//!
//! # Adding New Variants
//!
//! 1. Add the enum variant here
//! 2. Add the `as_str` arm, the `FromStr` arm, and extend `ALL`
//! 3. If the variant participates in a consistency rule, add it in `rules.rs`

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Archetype ────────────────────────────────────────────────────────────────

/// A named category of project to generate (e.g. `expo-mobile`).
///
/// Archetypes are open-ended: user-supplied template manifests may introduce
/// new ones, so this is a validated string rather than an enum. The built-in
/// set is listed in [`archetypes`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Archetype(String);

impl Archetype {
    /// Parse and validate an archetype tag.
    ///
    /// Accepts lowercase ASCII letters, digits and single dashes; must start
    /// with a letter. Input is lowercased first.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, DomainError> {
        let tag = raw.as_ref().trim().to_ascii_lowercase();

        if tag.is_empty() {
            return Err(DomainError::InvalidArchetype(
                "archetype cannot be empty".into(),
            ));
        }
        if !tag.starts_with(|c: char| c.is_ascii_lowercase()) {
            return Err(DomainError::InvalidArchetype(format!(
                "'{tag}' must start with a letter"
            )));
        }
        if let Some(bad) = tag
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(DomainError::InvalidArchetype(format!(
                "'{tag}' contains invalid character '{bad}'"
            )));
        }
        if tag.ends_with('-') || tag.contains("--") {
            return Err(DomainError::InvalidArchetype(format!(
                "'{tag}' has a dangling or doubled '-'"
            )));
        }

        Ok(Self(tag))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Archetype {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Archetype {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Archetype> for String {
    fn from(value: Archetype) -> Self {
        value.0
    }
}

/// Tags of the archetypes shipped with the built-in catalog.
pub mod archetypes {
    pub const NX_MONOREPO: &str = "nx-monorepo";
    pub const EXPO_MOBILE: &str = "expo-mobile";
    pub const ELECTRON_DESKTOP: &str = "electron-desktop";
    pub const NEXTJS_WEB: &str = "nextjs-web";
    pub const NODE_BACKEND: &str = "node-backend";
    pub const CHROME_EXTENSION: &str = "chrome-extension";
    pub const VSCODE_EXTENSION: &str = "vscode-extension";
    pub const CLI_TOOL: &str = "cli-tool";
    pub const SHOPIFY_APP: &str = "shopify-app";
    pub const DISCORD_BOT: &str = "discord-bot";
}

// ── Platform ─────────────────────────────────────────────────────────────────

/// A platform the generated project targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Web,
    Mobile,
    Desktop,
    Server,
    CrossPlatform,
}

impl Platform {
    pub const ALL: [Self; 5] = [
        Self::Web,
        Self::Mobile,
        Self::Desktop,
        Self::Server,
        Self::CrossPlatform,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Mobile => "mobile",
            Self::Desktop => "desktop",
            Self::Server => "server",
            Self::CrossPlatform => "cross-platform",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "web" => Ok(Self::Web),
            "mobile" => Ok(Self::Mobile),
            "desktop" => Ok(Self::Desktop),
            "server" | "backend" => Ok(Self::Server),
            "cross-platform" | "crossplatform" | "cross" => Ok(Self::CrossPlatform),
            other => Err(DomainError::UnknownName {
                kind: "platform",
                value: other.into(),
            }),
        }
    }
}

// ── Capability ───────────────────────────────────────────────────────────────

/// A capability the generated project is required to provide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Capability {
    Authentication,
    Database,
    Realtime,
    Payments,
    Analytics,
    Testing,
    CiCd,
    Containerization,
    Monitoring,
    Seo,
}

impl Capability {
    pub const ALL: [Self; 10] = [
        Self::Authentication,
        Self::Database,
        Self::Realtime,
        Self::Payments,
        Self::Analytics,
        Self::Testing,
        Self::CiCd,
        Self::Containerization,
        Self::Monitoring,
        Self::Seo,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Database => "database",
            Self::Realtime => "realtime",
            Self::Payments => "payments",
            Self::Analytics => "analytics",
            Self::Testing => "testing",
            Self::CiCd => "ci-cd",
            Self::Containerization => "containerization",
            Self::Monitoring => "monitoring",
            Self::Seo => "seo",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Capability {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "authentication" | "auth" => Ok(Self::Authentication),
            "database" | "db" => Ok(Self::Database),
            "realtime" => Ok(Self::Realtime),
            "payments" => Ok(Self::Payments),
            "analytics" => Ok(Self::Analytics),
            "testing" | "tests" => Ok(Self::Testing),
            "ci-cd" | "cicd" | "ci" => Ok(Self::CiCd),
            "containerization" | "docker" => Ok(Self::Containerization),
            "monitoring" => Ok(Self::Monitoring),
            "seo" => Ok(Self::Seo),
            other => Err(DomainError::UnknownName {
                kind: "capability",
                value: other.into(),
            }),
        }
    }
}

// ── ArchitectureFlag ─────────────────────────────────────────────────────────

/// An architectural property of the generated project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ArchitectureFlag {
    Monorepo,
    Microservices,
    Serverless,
    SinglePage,
    ServerRendered,
    Static,
}

impl ArchitectureFlag {
    pub const ALL: [Self; 6] = [
        Self::Monorepo,
        Self::Microservices,
        Self::Serverless,
        Self::SinglePage,
        Self::ServerRendered,
        Self::Static,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monorepo => "monorepo",
            Self::Microservices => "microservices",
            Self::Serverless => "serverless",
            Self::SinglePage => "single-page",
            Self::ServerRendered => "server-rendered",
            Self::Static => "static",
        }
    }
}

impl fmt::Display for ArchitectureFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArchitectureFlag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "monorepo" => Ok(Self::Monorepo),
            "microservices" => Ok(Self::Microservices),
            "serverless" => Ok(Self::Serverless),
            "single-page" | "spa" => Ok(Self::SinglePage),
            "server-rendered" | "ssr" => Ok(Self::ServerRendered),
            "static" | "ssg" => Ok(Self::Static),
            other => Err(DomainError::UnknownName {
                kind: "architecture flag",
                value: other.into(),
            }),
        }
    }
}

// ── ComplianceFlag ───────────────────────────────────────────────────────────

/// A non-functional quality the generated project must meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplianceFlag {
    Accessibility,
    Security,
    Performance,
    Seo,
}

impl ComplianceFlag {
    pub const ALL: [Self; 4] = [
        Self::Accessibility,
        Self::Security,
        Self::Performance,
        Self::Seo,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accessibility => "accessibility",
            Self::Security => "security",
            Self::Performance => "performance",
            Self::Seo => "seo",
        }
    }
}

impl fmt::Display for ComplianceFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplianceFlag {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accessibility" | "a11y" => Ok(Self::Accessibility),
            "security" => Ok(Self::Security),
            "performance" | "perf" => Ok(Self::Performance),
            "seo" => Ok(Self::Seo),
            other => Err(DomainError::UnknownName {
                kind: "compliance flag",
                value: other.into(),
            }),
        }
    }
}

// ── StackCategory ────────────────────────────────────────────────────────────

/// A tech-stack slot holding an ordered list of technology names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StackCategory {
    Frontend,
    Backend,
    Database,
    Deployment,
    Testing,
    Styling,
    State,
    Bundler,
    Runtime,
}

impl StackCategory {
    pub const ALL: [Self; 9] = [
        Self::Frontend,
        Self::Backend,
        Self::Database,
        Self::Deployment,
        Self::Testing,
        Self::Styling,
        Self::State,
        Self::Bundler,
        Self::Runtime,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Frontend => "frontend",
            Self::Backend => "backend",
            Self::Database => "database",
            Self::Deployment => "deployment",
            Self::Testing => "testing",
            Self::Styling => "styling",
            Self::State => "state",
            Self::Bundler => "bundler",
            Self::Runtime => "runtime",
        }
    }
}

impl fmt::Display for StackCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StackCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "frontend" => Ok(Self::Frontend),
            "backend" => Ok(Self::Backend),
            "database" | "db" => Ok(Self::Database),
            "deployment" | "deploy" => Ok(Self::Deployment),
            "testing" => Ok(Self::Testing),
            "styling" => Ok(Self::Styling),
            "state" | "state-management" => Ok(Self::State),
            "bundler" => Ok(Self::Bundler),
            "runtime" => Ok(Self::Runtime),
            other => Err(DomainError::UnknownName {
                kind: "stack category",
                value: other.into(),
            }),
        }
    }
}
