//! Implementation of the `genforge list` command.

use genforge_core::application::TemplateInfo;

use crate::{
    cli::{ListArgs, ListFormat},
    commands::{Registries, resolve_archetype},
    config::AppConfig,
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = Registries::load(&config)?.template_service();

    let templates = match args.archetype.as_deref() {
        Some(raw) => service.for_archetype(&resolve_archetype(raw, &service)?),
        None => service.list(),
    };

    // --output-format json forces JSON regardless of --format
    let format = if output.is_json() {
        ListFormat::Json
    } else {
        args.format
    };

    match format {
        ListFormat::Table => {
            output.header("Available Templates:")?;
            if templates.is_empty() {
                output.info("No templates registered for this archetype")?;
            }
            for line in table_rows(&templates) {
                output.print(&line)?;
            }
        }
        ListFormat::List => {
            for t in &templates {
                output.print(&t.id)?;
            }
        }
        // Bypasses quiet mode so JSON stays parseable in pipes.
        ListFormat::Json => output.json(&templates)?,
    }

    Ok(())
}

/// `  id  archetype  platforms  files/commands/rules`, column-aligned.
fn table_rows(templates: &[TemplateInfo]) -> Vec<String> {
    let id_width = templates.iter().map(|t| t.id.len()).max().unwrap_or(0);
    let arch_width = templates.iter().map(|t| t.archetype.len()).max().unwrap_or(0);

    templates
        .iter()
        .map(|t| {
            let marker = if t.selected { "*" } else { " " };
            format!(
                "{marker} {:<id_width$}  {:<arch_width$}  {:<24}  {} files, {} commands, {} rules",
                t.id,
                t.archetype,
                t.platforms.join(","),
                t.files,
                t.commands,
                t.rules,
            )
        })
        .collect()
}
