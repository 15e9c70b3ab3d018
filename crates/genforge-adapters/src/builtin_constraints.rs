//! Built-in constraint profiles, one per shipped archetype.
//!
//! # Adding a new profile
//!
//! 1. Add the archetype tag to `genforge_core::domain::archetypes`
//! 2. Write a `fn` here returning its [`ProjectConstraints`]
//! 3. Add it to [`builtin_profiles`]
//!
//! Profiles must pass [`ProjectConstraints::validate`]; the tests below check
//! every one.

use genforge_core::{
    application::ConstraintRegistry,
    domain::{
        Archetype, ArchitectureFlag as Arch, Capability as Cap, ComplianceFlag as Comp, DomainError,
        Platform, ProjectConstraints, ProjectConstraintsBuilder, StackCategory as Stack,
        archetypes,
    },
};

type Profile = Result<ProjectConstraints, DomainError>;

/// Every built-in profile, in a stable order.
pub fn builtin_profiles() -> Result<Vec<ProjectConstraints>, DomainError> {
    [
        nx_monorepo as fn() -> Profile,
        expo_mobile,
        electron_desktop,
        nextjs_web,
        node_backend,
        chrome_extension,
        vscode_extension,
        cli_tool,
        shopify_app,
        discord_bot,
    ]
    .into_iter()
    .map(|f| f())
    .collect()
}

/// A registry holding every built-in profile.
pub fn builtin_registry() -> Result<ConstraintRegistry, DomainError> {
    Ok(ConstraintRegistry::from_profiles(builtin_profiles()?))
}

/// The built-in profile for `archetype`, if there is one.
pub fn profile(archetype: &str) -> Option<ProjectConstraints> {
    builtin_profiles()
        .ok()?
        .into_iter()
        .find(|p| p.archetype().as_str() == archetype)
}

fn base(tag: &str) -> Result<ProjectConstraintsBuilder, DomainError> {
    Ok(ProjectConstraints::builder(Archetype::new(tag)?))
}

pub fn nx_monorepo() -> Profile {
    Ok(base(archetypes::NX_MONOREPO)?
        .platforms([Platform::Web, Platform::Mobile, Platform::Desktop])
        .stack(Stack::Frontend, &["React", "TypeScript", "Tailwind CSS"])
        .stack(Stack::Backend, &["Node.js", "Express", "Prisma"])
        .stack(Stack::Database, &["PostgreSQL", "SQLite"])
        .stack(Stack::Deployment, &["Vercel", "Netlify", "Docker"])
        .stack(Stack::Testing, &["Jest", "Playwright", "Cypress"])
        .stack(Stack::Styling, &["Tailwind CSS", "CSS Modules"])
        .stack(Stack::State, &["Zustand", "React Context"])
        .stack(Stack::Bundler, &["Vite", "Webpack"])
        .stack(Stack::Runtime, &["Node.js", "Bun"])
        .require(Cap::Authentication)
        .require(Cap::Database)
        .require(Cap::Testing)
        .require(Cap::CiCd)
        .architecture(Arch::Monorepo)
        .architecture(Arch::SinglePage)
        .architecture(Arch::ServerRendered)
        .compliance(Comp::Accessibility)
        .compliance(Comp::Security)
        .compliance(Comp::Performance)
        .build())
}

pub fn expo_mobile() -> Profile {
    Ok(base(archetypes::EXPO_MOBILE)?
        .platform(Platform::Mobile)
        .stack(Stack::Frontend, &["React Native", "TypeScript", "Expo"])
        .stack(Stack::Backend, &["Supabase", "Firebase"])
        .stack(Stack::Database, &["SQLite", "Realm", "AsyncStorage"])
        .stack(Stack::Deployment, &["EAS Build", "App Store", "Google Play"])
        .stack(Stack::Testing, &["Jest", "Detox"])
        .stack(Stack::Styling, &["StyleSheet", "NativeWind", "Tamagui"])
        .stack(Stack::State, &["Zustand", "Redux Toolkit", "React Context"])
        .stack(Stack::Bundler, &["Metro"])
        .stack(Stack::Runtime, &["Hermes", "JSC"])
        .require(Cap::Authentication)
        .require(Cap::Realtime)
        .require(Cap::Analytics)
        .architecture(Arch::SinglePage)
        .compliance(Comp::Accessibility)
        .compliance(Comp::Performance)
        .build())
}

pub fn electron_desktop() -> Profile {
    Ok(base(archetypes::ELECTRON_DESKTOP)?
        .platform(Platform::Desktop)
        .stack(Stack::Frontend, &["React", "TypeScript", "Electron"])
        .stack(Stack::Backend, &["Node.js", "SQLite"])
        .stack(Stack::Database, &["SQLite", "LevelDB"])
        .stack(Stack::Deployment, &["Electron Builder", "Auto Updater"])
        .stack(Stack::Testing, &["Jest", "Playwright"])
        .stack(Stack::Styling, &["CSS Modules", "Styled Components"])
        .stack(Stack::State, &["Zustand", "Redux Toolkit"])
        .stack(Stack::Bundler, &["Webpack", "Vite"])
        .stack(Stack::Runtime, &["Electron", "Node.js"])
        .capability(Cap::Authentication, false)
        .require(Cap::Database)
        .require(Cap::Testing)
        .architecture(Arch::SinglePage)
        .compliance(Comp::Security)
        .compliance(Comp::Performance)
        .build())
}

pub fn nextjs_web() -> Profile {
    Ok(base(archetypes::NEXTJS_WEB)?
        .platform(Platform::Web)
        .stack(Stack::Frontend, &["React", "TypeScript", "Next.js"])
        .stack(Stack::Backend, &["Next.js API Routes", "tRPC"])
        .stack(Stack::Database, &["PostgreSQL", "Prisma", "PlanetScale"])
        .stack(Stack::Deployment, &["Vercel", "Netlify"])
        .stack(Stack::Testing, &["Jest", "Playwright"])
        .stack(Stack::Styling, &["Tailwind CSS", "CSS Modules"])
        .stack(Stack::State, &["Zustand", "React Query"])
        .stack(Stack::Bundler, &["Next.js", "Turbopack"])
        .stack(Stack::Runtime, &["Node.js", "Edge Runtime"])
        .require(Cap::Authentication)
        .require(Cap::Database)
        .require(Cap::Testing)
        .require(Cap::Seo)
        .architecture(Arch::ServerRendered)
        .architecture(Arch::Static)
        .compliance(Comp::Accessibility)
        .compliance(Comp::Seo)
        .compliance(Comp::Performance)
        .build())
}

pub fn node_backend() -> Profile {
    Ok(base(archetypes::NODE_BACKEND)?
        .platform(Platform::Server)
        .stack(Stack::Backend, &["Node.js", "Express", "Fastify", "tRPC"])
        .stack(Stack::Database, &["PostgreSQL", "MongoDB", "Redis"])
        .stack(Stack::Deployment, &["Docker", "Railway", "Fly.io"])
        .stack(Stack::Testing, &["Jest", "Supertest"])
        .stack(Stack::Runtime, &["Node.js", "Bun"])
        .require(Cap::Authentication)
        .require(Cap::Database)
        .require(Cap::Testing)
        .require(Cap::Monitoring)
        .architecture(Arch::Microservices)
        .architecture(Arch::Serverless)
        .compliance(Comp::Security)
        .compliance(Comp::Performance)
        .build())
}

pub fn chrome_extension() -> Profile {
    Ok(base(archetypes::CHROME_EXTENSION)?
        .platform(Platform::Web)
        .stack(Stack::Frontend, &["TypeScript", "React", "Vite"])
        .stack(Stack::Backend, &["Chrome APIs", "Storage API"])
        .stack(Stack::Deployment, &["Chrome Web Store"])
        .stack(Stack::Testing, &["Jest", "Playwright"])
        .stack(Stack::Styling, &["CSS Modules", "Tailwind CSS"])
        .stack(Stack::Bundler, &["Vite", "Webpack"])
        .stack(Stack::Runtime, &["Chrome Extension Runtime"])
        .require(Cap::Testing)
        .architecture(Arch::SinglePage)
        .compliance(Comp::Security)
        .compliance(Comp::Performance)
        .build())
}

pub fn vscode_extension() -> Profile {
    Ok(base(archetypes::VSCODE_EXTENSION)?
        .platform(Platform::Desktop)
        .stack(Stack::Frontend, &["TypeScript", "VS Code API"])
        .stack(Stack::Backend, &["Node.js", "Language Server Protocol"])
        .stack(Stack::Deployment, &["VS Code Marketplace"])
        .stack(Stack::Testing, &["Mocha", "VS Code Test Runner"])
        .stack(Stack::Bundler, &["Webpack", "esbuild"])
        .stack(Stack::Runtime, &["VS Code Extension Host"])
        .require(Cap::Testing)
        .architecture_flag(Arch::SinglePage, false)
        .compliance(Comp::Performance)
        .build())
}

pub fn cli_tool() -> Profile {
    Ok(base(archetypes::CLI_TOOL)?
        .platform(Platform::Server)
        .stack(Stack::Backend, &["Node.js", "TypeScript", "Commander.js"])
        .stack(Stack::Deployment, &["npm", "GitHub Releases"])
        .stack(Stack::Testing, &["Jest"])
        .stack(Stack::Bundler, &["esbuild", "pkg"])
        .stack(Stack::Runtime, &["Node.js", "Bun"])
        .require(Cap::Testing)
        .architecture_flag(Arch::SinglePage, false)
        .compliance(Comp::Performance)
        .build())
}

pub fn shopify_app() -> Profile {
    Ok(base(archetypes::SHOPIFY_APP)?
        .platform(Platform::Web)
        .stack(Stack::Frontend, &["React", "Shopify Polaris", "TypeScript"])
        .stack(Stack::Backend, &["Node.js", "Shopify CLI", "GraphQL"])
        .stack(Stack::Database, &["PostgreSQL", "Shopify Admin API"])
        .stack(Stack::Deployment, &["Shopify Partners", "Vercel"])
        .stack(Stack::Testing, &["Jest"])
        .stack(Stack::Styling, &["Shopify Polaris"])
        .stack(Stack::Runtime, &["Node.js"])
        .require(Cap::Authentication)
        .require(Cap::Database)
        .require(Cap::Testing)
        .architecture(Arch::SinglePage)
        .compliance(Comp::Security)
        .compliance(Comp::Performance)
        .build())
}

pub fn discord_bot() -> Profile {
    Ok(base(archetypes::DISCORD_BOT)?
        .platform(Platform::Server)
        .stack(Stack::Backend, &["Node.js", "Discord.js", "TypeScript"])
        .stack(Stack::Database, &["SQLite", "PostgreSQL"])
        .stack(Stack::Deployment, &["Railway", "Docker"])
        .stack(Stack::Testing, &["Jest"])
        .stack(Stack::Runtime, &["Node.js"])
        .require(Cap::Database)
        .require(Cap::Testing)
        .architecture_flag(Arch::SinglePage, false)
        .compliance(Comp::Security)
        .build())
}
