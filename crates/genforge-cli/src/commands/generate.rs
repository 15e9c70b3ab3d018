//! Implementation of the `genforge generate` command.
//!
//! Responsibility: translate CLI arguments into a `GenerationRequest`, run
//! the core generation service, and display results. No business logic
//! lives here.

use std::io::IsTerminal as _;

use tracing::{debug, info, instrument};

use genforge_adapters::{ChatCompletionEnhancer, LocalFilesystem, ShellRunner};
use genforge_core::{
    application::{
        CancellationToken, GenerationOptions, GenerationPlan, GenerationRequest,
        GenerationService, TemplateService,
    },
    domain::{
        Archetype, CommandOutcome, DomainError, FileOutcome, GenerationResult, Platform,
        TaskOutcome, Variable,
    },
};

use crate::{
    cli::{GenerateArgs, PlatformArg, global::GlobalArgs},
    commands::{Registries, resolve_archetype},
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

#[instrument(skip_all, fields(project = %args.name))]
pub fn execute(
    args: GenerateArgs,
    global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    let registries = Registries::load(&config)?;
    let templates = registries.template_service();

    let archetype = match args.archetype.as_deref() {
        Some(raw) => resolve_archetype(raw, &templates)?,
        None => prompt_archetype(&templates, &output)?,
    };
    if templates.for_archetype(&archetype).is_empty() {
        return Err(CliError::Core(
            DomainError::NoTemplateForArchetype(archetype.to_string()).into(),
        ));
    }
    let request = build_request(&args, archetype, &config)?;
    debug!(
        archetype = %request.archetype,
        path = %request.project_path().display(),
        variables = request.variables.len(),
        "Request built"
    );

    let service = GenerationService::new(
        registries.constraints,
        registries.templates,
        Box::new(LocalFilesystem::new()),
        Box::new(ShellRunner::new()),
    )
    .with_options(options(&args, &config));

    if args.dry_run {
        let plan = service.plan(&request).with_cli_context(|| "planning")?;
        return render_plan(&plan, &output);
    }

    let service = if config.enhancer.enabled && !args.no_enhance {
        info!(model = %config.enhancer.model, "Enhancer enabled");
        let enhancer = ChatCompletionEnhancer::new(config.enhancer.settings())?;
        service.with_enhancer(Box::new(enhancer))
    } else {
        service
    };

    output.header(&format!(
        "Generating '{}' ({})",
        request.project_name, request.archetype
    ))?;

    let cancel = CancellationToken::new();
    let spinner = output.spinner("Running generation pipeline");
    let result = service.generate(request, &cancel);
    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }
    let result = result?;

    render_result(&result, &output, global.verbose > 0)?;
    outcome(&result)
}

/// Turn parsed flags into a request; `--output` wins over `generation.output_root`.
fn build_request(
    args: &GenerateArgs,
    archetype: Archetype,
    config: &AppConfig,
) -> CliResult<GenerationRequest> {
    let output_dir = args
        .output
        .clone()
        .unwrap_or_else(|| config.generation.output_root.clone());

    let mut request = GenerationRequest::new(archetype, args.name.trim(), output_dir)
        .platforms(args.platforms.iter().copied().map(Platform::from));

    if let Some(text) = &args.requirements {
        request = request.requirements(text.clone());
    }
    for raw in &args.vars {
        let (key, value) = Variable::parse_assignment(raw).map_err(|e| CliError::InvalidInput {
            message: format!("--var {raw}"),
            source: Some(Box::new(e)),
        })?;
        request = request.variable(key, value);
    }
    Ok(request)
}

fn options(args: &GenerateArgs, config: &AppConfig) -> GenerationOptions {
    let mut options = config.generation.options();
    options.post_enhance = !args.no_enhance && (args.post_enhance || options.post_enhance);
    options
}

impl From<PlatformArg> for Platform {
    fn from(arg: PlatformArg) -> Self {
        match arg {
            PlatformArg::Web => Platform::Web,
            PlatformArg::Mobile => Platform::Mobile,
            PlatformArg::Desktop => Platform::Desktop,
            PlatformArg::Server => Platform::Server,
            PlatformArg::CrossPlatform => Platform::CrossPlatform,
        }
    }
}

/// Map the run outcome to the process result.
fn outcome(result: &GenerationResult) -> CliResult<()> {
    if result.is_fatal() {
        return Err(CliError::GenerationFailed {
            errors: result.errors.clone(),
        });
    }
    if !result.success {
        return Err(CliError::ValidationFailed {
            failed: result.failed_validations().count(),
        });
    }
    Ok(())
}

// ── Archetype prompt ──────────────────────────────────────────────────────────

#[cfg(feature = "interactive")]
fn prompt_archetype(service: &TemplateService, output: &OutputManager) -> CliResult<Archetype> {
    if output.is_json() || !std::io::stdin().is_terminal() {
        return Err(missing_archetype());
    }

    let mut choices: Vec<String> = service.list().into_iter().map(|t| t.archetype).collect();
    choices.dedup();

    let index = dialoguer::FuzzySelect::new()
        .with_prompt("Archetype")
        .items(&choices)
        .default(0)
        .interact_opt()
        .map_err(|e| CliError::InvalidInput {
            message: "archetype prompt failed".into(),
            source: Some(Box::new(e)),
        })?
        .ok_or(CliError::Cancelled)?;

    resolve_archetype(&choices[index], service)
}

#[cfg(not(feature = "interactive"))]
fn prompt_archetype(_service: &TemplateService, output: &OutputManager) -> CliResult<Archetype> {
    if output.is_json() || !std::io::stdin().is_terminal() {
        return Err(missing_archetype());
    }
    Err(CliError::FeatureNotAvailable {
        feature: "interactive",
    })
}

fn missing_archetype() -> CliError {
    CliError::InvalidInput {
        message: "--archetype is required when not running interactively".into(),
        source: None,
    }
}

// ── Rendering ─────────────────────────────────────────────────────────────────

fn render_plan(plan: &GenerationPlan, output: &OutputManager) -> CliResult<()> {
    if output.is_json() {
        output.json(plan)?;
        return Ok(());
    }

    output.info(&format!(
        "Dry run: would create {} from '{}' ({})",
        plan.project_path.display(),
        plan.template_name,
        plan.template_id
    ))?;
    if !plan.report.valid {
        for err in &plan.report.errors {
            output.error(err)?;
        }
    }
    output.header("Files:")?;
    for file in &plan.files {
        output.detail(file)?;
    }
    if !plan.commands.is_empty() {
        output.header("Commands:")?;
        for command in &plan.commands {
            output.detail(command)?;
        }
    }
    if !plan.rules.is_empty() {
        output.header("Validation rules:")?;
        for rule in &plan.rules {
            output.detail(rule)?;
        }
    }
    Ok(())
}

fn render_result(
    result: &GenerationResult,
    output: &OutputManager,
    verbose: bool,
) -> CliResult<()> {
    if output.is_json() {
        output.json(result)?;
        return Ok(());
    }

    // fatal errors are reported by the caller
    if result.is_fatal() {
        return Ok(());
    }

    output.success(&format!(
        "{} file(s) written to {}",
        result.files_written.len(),
        result.project_path.display()
    ))?;
    for report in &result.file_outcomes {
        match &report.outcome {
            FileOutcome::Written if verbose => output.detail(&report.path.to_string())?,
            FileOutcome::Written => {}
            FileOutcome::Skipped { reason } => {
                output.warning(&format!("{} skipped: {reason}", report.path))?
            }
        }
    }

    for report in &result.command_reports {
        match &report.outcome {
            CommandOutcome::Executed { exit_code: 0 } => {
                output.success(&format!("$ {}", report.command))?
            }
            CommandOutcome::Executed { exit_code } => {
                output.warning(&format!("$ {} (exit {exit_code})", report.command))?
            }
            CommandOutcome::Failed { reason } => {
                output.warning(&format!("$ {} ({reason})", report.command))?
            }
        }
    }

    for record in &result.enhancements {
        output.info(&format!(
            "Enhancement '{}': +{} file(s), +{} dependenc(ies), +{} command(s)",
            record.source, record.files, record.dependencies, record.commands
        ))?;
        for rejected in &record.rejected {
            output.detail(&format!("rejected path {rejected}"))?;
        }
    }
    for task in &result.post_tasks {
        match &task.outcome {
            TaskOutcome::Applied { files } => {
                output.info(&format!("{}: {files} file(s)", task.task))?
            }
            TaskOutcome::Failed { reason } => {
                output.warning(&format!("{}: {reason}", task.task))?
            }
        }
    }

    if !result.validation_results.is_empty() {
        output.header("Validation:")?;
        for check in &result.validation_results {
            let line = format!("{}: {}", check.rule.description, check.message);
            if check.passed {
                output.success(&line)?;
            } else {
                output.error(&line)?;
            }
        }
    }

    for warning in &result.warnings {
        output.warning(warning)?;
    }

    if !result.next_steps.is_empty() {
        output.print("")?;
        output.header("Next steps:")?;
        for step in &result.next_steps {
            output.print(&format!("  {step}"))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(name: &str) -> GenerateArgs {
        GenerateArgs {
            name: name.into(),
            archetype: Some("cli-tool".into()),
            platforms: vec![],
            requirements: None,
            output: None,
            vars: vec![],
            post_enhance: false,
            no_enhance: false,
            dry_run: false,
        }
    }

    fn cli_tool() -> Archetype {
        Archetype::new("cli-tool").unwrap()
    }

    #[test]
    fn output_defaults_to_config_root() {
        let mut config = AppConfig::default();
        config.generation.output_root = PathBuf::from("/srv/projects");

        let request = build_request(&args("tool"), cli_tool(), &config).unwrap();
        assert_eq!(request.project_path(), PathBuf::from("/srv/projects/tool"));
    }

    #[test]
    fn explicit_output_wins() {
        let mut a = args("tool");
        a.output = Some(PathBuf::from("/tmp/out"));
        let request = build_request(&a, cli_tool(), &AppConfig::default()).unwrap();
        assert_eq!(request.output_dir, PathBuf::from("/tmp/out"));
    }

    #[test]
    fn platforms_requirements_and_vars_are_carried() {
        let mut a = args("tool");
        a.platforms = vec![PlatformArg::Server, PlatformArg::CrossPlatform];
        a.requirements = Some("add a config command".into());
        a.vars = vec!["author=Ada Lovelace".into()];

        let request = build_request(&a, cli_tool(), &AppConfig::default()).unwrap();
        assert_eq!(
            request.platforms,
            vec![Platform::Server, Platform::CrossPlatform]
        );
        assert_eq!(
            request.custom_requirements.as_deref(),
            Some("add a config command")
        );
        assert_eq!(
            request.variables.get("author").map(ToString::to_string),
            Some("Ada Lovelace".to_string())
        );
    }

    #[test]
    fn malformed_var_is_a_user_error() {
        let mut a = args("tool");
        a.vars = vec!["no-equals-sign".into()];
        let err = build_request(&a, cli_tool(), &AppConfig::default()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn no_enhance_disables_post_enhancement() {
        let mut config = AppConfig::default();
        config.generation.post_enhance = true;

        assert!(options(&args("x"), &config).post_enhance);

        let mut a = args("x");
        a.no_enhance = true;
        assert!(!options(&a, &config).post_enhance);
    }

    #[test]
    fn outcome_maps_fatal_and_validation_failures() {
        let mut result = GenerationResult::new(uuid::Uuid::nil(), PathBuf::from("/p"));
        result.success = true;
        assert!(outcome(&result).is_ok());

        result.success = false;
        assert_eq!(outcome(&result).unwrap_err().exit_code(), 5);

        result.errors.push("No template registered for archetype 'x'".into());
        assert!(matches!(
            outcome(&result),
            Err(CliError::GenerationFailed { .. })
        ));
    }
}
