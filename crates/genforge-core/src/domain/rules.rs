//! Constraint and guidance rule tables.
//!
//! Every archetype-specific rule the engine knows about is described exactly
//! once in a static table here. Validation and next-step guidance are
//! table lookups over these entries.
//!
//! # Adding a New Archetype Rule
//!
//! 1. Add one [`ArchetypeRule`] entry to [`ARCHETYPE_RULES`]
//! 2. Optionally add a [`NextStepsDef`] entry to [`NEXT_STEPS`]
//! 3. That's it, no other files change

use crate::domain::{
    entities::constraints::ProjectConstraints,
    value_objects::{ArchitectureFlag, Capability, Platform, StackCategory, archetypes},
};

// ── Consistency rules ────────────────────────────────────────────────────────

/// A requirement a specific archetype places on its constraint set.
#[derive(Debug, Clone, Copy)]
pub enum Requirement {
    /// The platform set must contain this platform.
    Platform(Platform),
    /// This architecture flag must be set.
    Architecture(ArchitectureFlag),
}

/// One archetype-scoped consistency rule.
#[derive(Debug, Clone, Copy)]
pub struct ArchetypeRule {
    pub archetype: &'static str,
    pub requirement: Requirement,
    /// Reported verbatim when the rule is violated.
    pub message: &'static str,
}

/// Single source of truth for archetype-specific validation.
pub static ARCHETYPE_RULES: &[ArchetypeRule] = &[
    ArchetypeRule {
        archetype: archetypes::EXPO_MOBILE,
        requirement: Requirement::Platform(Platform::Mobile),
        message: "Expo projects must target mobile platform",
    },
    ArchetypeRule {
        archetype: archetypes::ELECTRON_DESKTOP,
        requirement: Requirement::Platform(Platform::Desktop),
        message: "Electron projects must target desktop platform",
    },
    ArchetypeRule {
        archetype: archetypes::NX_MONOREPO,
        requirement: Requirement::Architecture(ArchitectureFlag::Monorepo),
        message: "Nx projects must use monorepo architecture",
    },
];

/// Frontend technologies able to produce a native mobile app.
///
/// Compared case-insensitively against the `frontend` stack list.
pub static MOBILE_CAPABLE_FRONTENDS: &[&str] =
    &["React Native", "Expo", "Flutter", "Ionic", "NativeScript"];

/// Run every consistency rule and collect violations.
pub fn check_constraints(constraints: &ProjectConstraints) -> Vec<String> {
    let mut errors = Vec::new();

    if constraints.platforms().is_empty() {
        errors.push("At least one target platform is required".to_string());
    }

    for rule in ARCHETYPE_RULES
        .iter()
        .filter(|r| r.archetype == constraints.archetype().as_str())
    {
        let satisfied = match rule.requirement {
            Requirement::Platform(p) => constraints.targets(p),
            Requirement::Architecture(flag) => constraints.has_architecture(flag),
        };
        if !satisfied {
            errors.push(rule.message.to_string());
        }
    }

    // Only a mobile-only project is judged on its frontend list; multi-platform
    // projects may ship a web frontend next to a separate mobile app.
    if constraints.is_mobile_only()
        && let Some(frontend) = constraints.stack(StackCategory::Frontend)
        && !frontend.iter().any(|tech| is_mobile_capable(tech))
    {
        errors.push("Mobile platforms require React Native or Expo frontend".to_string());
    }

    errors
}

fn is_mobile_capable(tech: &str) -> bool {
    MOBILE_CAPABLE_FRONTENDS
        .iter()
        .any(|m| m.eq_ignore_ascii_case(tech.trim()))
}

// ── Next steps ───────────────────────────────────────────────────────────────

/// Extra guidance printed for one archetype after generation.
#[derive(Debug, Clone, Copy)]
pub struct NextStepsDef {
    pub archetype: &'static str,
    pub steps: &'static [&'static str],
}

pub static NEXT_STEPS: &[NextStepsDef] = &[
    NextStepsDef {
        archetype: archetypes::NX_MONOREPO,
        steps: &[
            "Build all apps: npm run build:all",
            "Run tests: npm run test",
            "Start web app: npm run dev",
            "Start mobile app: npm run dev:mobile",
        ],
    },
    NextStepsDef {
        archetype: archetypes::EXPO_MOBILE,
        steps: &["Start Expo: npx expo start"],
    },
    NextStepsDef {
        archetype: archetypes::ELECTRON_DESKTOP,
        steps: &["Launch the desktop app: npm start"],
    },
    NextStepsDef {
        archetype: archetypes::CHROME_EXTENSION,
        steps: &["Load the dist/ folder via chrome://extensions (Load unpacked)"],
    },
    NextStepsDef {
        archetype: archetypes::VSCODE_EXTENSION,
        steps: &["Press F5 in VS Code to open an Extension Development Host"],
    },
    NextStepsDef {
        archetype: archetypes::CLI_TOOL,
        steps: &["Link the binary locally: npm link"],
    },
    NextStepsDef {
        archetype: archetypes::DISCORD_BOT,
        steps: &["Copy .env.example to .env and set DISCORD_TOKEN"],
    },
];

/// Deterministic, archetype-aware instructions shown after a run.
///
/// Depends only on the constraints, never on validation results.
pub fn next_steps(project_name: &str, constraints: &ProjectConstraints) -> Vec<String> {
    let mut steps = vec![
        format!("cd {project_name}"),
        "Review the generated code and configuration".to_string(),
        "Install dependencies: npm install".to_string(),
        "Start development server: npm run dev".to_string(),
    ];

    if let Some(def) = NEXT_STEPS
        .iter()
        .find(|d| d.archetype == constraints.archetype().as_str())
    {
        steps.extend(def.steps.iter().map(|s| (*s).to_string()));
    }

    if constraints.requires(Capability::Testing) {
        steps.push("Run tests: npm test".to_string());
    }
    if constraints.requires(Capability::CiCd) {
        steps.push("Set up CI/CD pipeline".to_string());
    }

    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Archetype, ConstraintOverride};

    fn profile(archetype: &str) -> crate::domain::ProjectConstraintsBuilder {
        ProjectConstraints::builder(Archetype::new(archetype).unwrap())
    }

    #[test]
    fn expo_must_target_mobile() {
        let c = profile("expo-mobile").platform(Platform::Web).build();
        assert!(
            check_constraints(&c).contains(&"Expo projects must target mobile platform".into())
        );
    }

    #[test]
    fn nx_requires_monorepo_flag() {
        let c = profile("nx-monorepo")
            .platforms([Platform::Web, Platform::Mobile])
            .build();
        let errors = check_constraints(&c);
        assert_eq!(errors, vec!["Nx projects must use monorepo architecture"]);

        let fixed = c.merge(&ConstraintOverride::new().architecture(ArchitectureFlag::Monorepo, true));
        assert!(check_constraints(&fixed).is_empty());
    }

    #[test]
    fn mobile_only_needs_mobile_frontend() {
        let bad = profile("custom-mobile")
            .platform(Platform::Mobile)
            .stack(StackCategory::Frontend, &["React", "TypeScript"])
            .build();
        assert_eq!(check_constraints(&bad).len(), 1);

        let good = profile("custom-mobile")
            .platform(Platform::Mobile)
            .stack(StackCategory::Frontend, &["react native"])
            .build();
        assert!(check_constraints(&good).is_empty());

        // no frontend list declared: nothing to check
        let bare = profile("custom-mobile").platform(Platform::Mobile).build();
        assert!(check_constraints(&bare).is_empty());
    }

    #[test]
    fn multi_platform_with_web_frontend_is_allowed() {
        let c = profile("nx-monorepo")
            .platforms([Platform::Web, Platform::Mobile, Platform::Desktop])
            .stack(StackCategory::Frontend, &["React"])
            .architecture(ArchitectureFlag::Monorepo)
            .build();
        assert!(check_constraints(&c).is_empty());
    }

    #[test]
    fn empty_platform_set_is_reported() {
        let c = profile("anything").build();
        assert_eq!(
            check_constraints(&c),
            vec!["At least one target platform is required"]
        );
    }

    #[test]
    fn next_steps_are_archetype_aware() {
        let c = profile("nx-monorepo")
            .platform(Platform::Web)
            .require(Capability::Testing)
            .require(Capability::CiCd)
            .build();
        let steps = next_steps("demo", &c);

        assert_eq!(steps[0], "cd demo");
        assert!(steps.contains(&"Start mobile app: npm run dev:mobile".to_string()));
        assert_eq!(steps.last().unwrap(), "Set up CI/CD pipeline");
        assert_eq!(steps, next_steps("demo", &c));
    }
}
