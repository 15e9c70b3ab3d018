//! Implementation of the `genforge constraints` command.

use std::collections::BTreeMap;
use std::fmt::Display;

use serde::Serialize;

use genforge_core::{application::ProfileInfo, domain::ConstraintReport};

use crate::{
    cli::ConstraintsArgs,
    commands::{Registries, resolve_archetype},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

#[derive(Serialize)]
struct ProfileView<'a> {
    #[serde(flatten)]
    profile: &'a ProfileInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    report: Option<&'a ConstraintReport>,
}

pub fn execute(args: ConstraintsArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let service = Registries::load(&config)?.template_service();
    let archetype = resolve_archetype(&args.archetype, &service)?;
    let profile = service.profile(&archetype)?;

    let report = args.validate.then(|| profile.constraints.validate());

    if output.is_json() {
        output.json(&ProfileView {
            profile: &profile,
            report: report.as_ref(),
        })?;
    } else {
        render(&profile, &output)?;
        if let Some(report) = &report {
            if report.valid {
                output.success("Constraints are valid")?;
            } else {
                for err in &report.errors {
                    output.error(err)?;
                }
            }
        }
    }

    match report {
        Some(report) if !report.valid => Err(CliError::InvalidInput {
            message: format!(
                "constraint profile '{archetype}' has {} violation(s)",
                report.errors.len()
            ),
            source: None,
        }),
        _ => Ok(()),
    }
}

fn render(profile: &ProfileInfo, output: &OutputManager) -> CliResult<()> {
    let c = &profile.constraints;

    output.header(&format!("Archetype: {}", profile.archetype))?;
    output.print(&format!("  Platforms:  {}", join(c.platforms())))?;
    output.print(&format!("  Templates:  {}", profile.templates))?;

    if !c.tech_stack().is_empty() {
        output.header("Tech stack:")?;
        for (category, techs) in c.tech_stack() {
            output.print(&format!("  {:<16}{}", category.to_string(), techs.join(", ")))?;
        }
    }
    flag_section(output, "Capabilities:", c.capability_flags())?;
    flag_section(output, "Architecture:", c.architecture_flags())?;
    flag_section(output, "Compliance:", c.compliance_flags())?;
    Ok(())
}

fn flag_section<K: Display>(
    output: &OutputManager,
    title: &str,
    flags: &BTreeMap<K, bool>,
) -> CliResult<()> {
    if flags.is_empty() {
        return Ok(());
    }
    output.header(title)?;
    for line in flag_lines(flags) {
        output.print(&line)?;
    }
    Ok(())
}

/// `  [x] testing` / `  [ ] authentication`
fn flag_lines<K: Display>(flags: &BTreeMap<K, bool>) -> Vec<String> {
    flags
        .iter()
        .map(|(flag, on)| format!("  [{}] {flag}", if *on { 'x' } else { ' ' }))
        .collect()
}

fn join<'a, T: Display + 'a>(items: impl IntoIterator<Item = &'a T>) -> String {
    items
        .into_iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_render_as_checkboxes() {
        let mut flags = BTreeMap::new();
        flags.insert("auth", false);
        flags.insert("testing", true);
        assert_eq!(flag_lines(&flags), vec!["  [ ] auth", "  [x] testing"]);
    }

    #[test]
    fn join_uses_display() {
        let items = ["web".to_string(), "mobile".to_string()];
        assert_eq!(join(&items), "web, mobile");
    }

    #[test]
    fn json_view_omits_missing_report() {
        let service = Registries::load(&AppConfig::default())
            .unwrap()
            .template_service();
        let archetype = resolve_archetype("cli-tool", &service).unwrap();
        let profile = service.profile(&archetype).unwrap();

        let value = serde_json::to_value(ProfileView {
            profile: &profile,
            report: None,
        })
        .unwrap();
        assert_eq!(value["archetype"], "cli-tool");
        assert!(value.get("report").is_none());
    }
}
