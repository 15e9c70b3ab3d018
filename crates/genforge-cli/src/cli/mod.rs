//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(
    name     = "genforge",
    bin_name = "genforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "Constraint-driven project generation",
    long_about = "genforge turns an archetype, a set of constraints and optional \
                  free-text requirements into a ready-to-run project, then checks \
                  the result against the template's validation rules.",
    after_help = "EXAMPLES:\n\
        \x20 genforge generate my-ext --archetype chrome-extension\n\
        \x20 genforge generate shop --archetype shopify-app -r \"add a loyalty page\"\n\
        \x20 genforge list --format json\n\
        \x20 genforge constraints nx-monorepo --validate",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate a project.
    #[command(
        visible_alias = "gen",
        about = "Generate a project for an archetype",
        after_help = "EXAMPLES:\n\
            \x20 genforge generate my-app --archetype expo-mobile\n\
            \x20 genforge generate tool -a cli-tool --var author=\"Ada\" --dry-run\n\
            \x20 genforge generate bot -a discord-bot -r \"moderation commands\" --post-enhance"
    )]
    Generate(GenerateArgs),

    /// List registered templates.
    #[command(
        visible_alias = "ls",
        about = "List available templates",
        after_help = "EXAMPLES:\n\
            \x20 genforge list\n\
            \x20 genforge list --archetype nx-monorepo\n\
            \x20 genforge list --format json"
    )]
    List(ListArgs),

    /// Show an archetype's constraint profile.
    #[command(
        about = "Show the constraint profile for an archetype",
        after_help = "EXAMPLES:\n\
            \x20 genforge constraints expo-mobile\n\
            \x20 genforge constraints nx-monorepo --validate"
    )]
    Constraints(ConstraintsArgs),

    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 genforge completions bash > ~/.local/share/bash-completion/completions/genforge\n\
            \x20 genforge completions zsh  > ~/.zfunc/_genforge\n\
            \x20 genforge completions fish > ~/.config/fish/completions/genforge.fish"
    )]
    Completions(CompletionsArgs),

    #[command(
        about = "Inspect configuration",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 genforge config get enhancer.model\n\
            \x20 genforge config list\n\
            \x20 genforge config path"
    )]
    Config(ConfigCommands),
}

// ── generate ──────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Project name; also the directory created under the output root.
    #[arg(value_name = "NAME")]
    pub name: String,

    /// Archetype tag, e.g. `expo-mobile`. Prompted for when omitted on a
    /// terminal (requires the `interactive` feature).
    #[arg(short = 'a', long = "archetype", value_name = "ARCHETYPE")]
    pub archetype: Option<String>,

    /// Target platforms; replaces the profile's platforms when given.
    #[arg(
        short = 'p',
        long = "platform",
        value_name = "PLATFORM",
        value_enum,
        help = "Target platform (repeatable)"
    )]
    pub platforms: Vec<PlatformArg>,

    /// Free-text requirements passed to the enhancer.
    #[arg(short = 'r', long = "requirements", value_name = "TEXT")]
    pub requirements: Option<String>,

    /// Directory the project is created in (default: `generation.output_root`).
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Template variable, `key=value` (repeatable).
    #[arg(long = "var", value_name = "KEY=VALUE")]
    pub vars: Vec<String>,

    /// Run the post-enhancement tasks (tests, docs, optimisation, security, CI).
    #[arg(long = "post-enhance")]
    pub post_enhance: bool,

    /// Skip the enhancer even when it is enabled in configuration.
    #[arg(long = "no-enhance", conflicts_with = "post_enhance")]
    pub no_enhance: bool,

    /// Print the plan without writing files or running commands.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

/// Platform names accepted on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PlatformArg {
    Web,
    Mobile,
    Desktop,
    Server,
    CrossPlatform,
}

// ── list ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Only templates for this archetype.
    #[arg(short = 'a', long = "archetype", value_name = "ARCHETYPE")]
    pub archetype: Option<String>,

    #[arg(
        long = "format",
        value_enum,
        default_value = "table",
        help = "Output format"
    )]
    pub format: ListFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ListFormat {
    /// Human-readable table.
    Table,
    /// One template id per line.
    List,
    /// JSON array.
    Json,
}

// ── constraints ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConstraintsArgs {
    #[arg(value_name = "ARCHETYPE")]
    pub archetype: String,

    /// Also run the archetype rules and report any violations.
    #[arg(long = "validate")]
    pub validate: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a configuration key.
    Get {
        /// Dotted key path, e.g. `enhancer.model`.
        key: String,
    },
    /// Print the effective configuration.
    List,
    /// Print the path of the default configuration file.
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_generate_command() {
        let cli = Cli::parse_from([
            "genforge",
            "generate",
            "my-app",
            "--archetype",
            "expo-mobile",
            "-p",
            "mobile",
            "-p",
            "web",
            "--var",
            "author=Ada",
        ]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate");
        };
        assert_eq!(args.archetype.as_deref(), Some("expo-mobile"));
        assert_eq!(args.platforms, vec![PlatformArg::Mobile, PlatformArg::Web]);
        assert_eq!(args.vars, vec!["author=Ada"]);
    }

    #[test]
    fn gen_alias() {
        let cli = Cli::parse_from(["genforge", "gen", "x", "-a", "cli-tool"]);
        assert!(matches!(cli.command, Commands::Generate(_)));
    }

    #[test]
    fn cross_platform_is_kebab_case() {
        let cli = Cli::parse_from(["genforge", "gen", "x", "-p", "cross-platform"]);
        let Commands::Generate(args) = cli.command else {
            panic!("expected Generate");
        };
        assert_eq!(args.platforms, vec![PlatformArg::CrossPlatform]);
    }

    #[test]
    fn post_enhance_conflicts_with_no_enhance() {
        let result = Cli::try_parse_from([
            "genforge",
            "gen",
            "x",
            "--post-enhance",
            "--no-enhance",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        let result = Cli::try_parse_from(["genforge", "--quiet", "--verbose", "list"]);
        assert!(result.is_err());
    }
}
