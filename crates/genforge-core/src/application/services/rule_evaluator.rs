//! Validation subsystem: evaluates [`ValidationRule`]s against a finished
//! project.

use tracing::debug;

use crate::{
    application::ports::{CommandRunner, Filesystem},
    domain::{GenerationContext, RuleCheck, ValidationResult, ValidationRule},
};

pub struct RuleEvaluator<'a> {
    filesystem: &'a dyn Filesystem,
    runner: &'a dyn CommandRunner,
}

impl<'a> RuleEvaluator<'a> {
    pub fn new(filesystem: &'a dyn Filesystem, runner: &'a dyn CommandRunner) -> Self {
        Self { filesystem, runner }
    }

    /// Evaluate every rule, in order.
    pub fn evaluate_all(&self, rules: &[ValidationRule], ctx: &GenerationContext) -> Vec<ValidationResult> {
        rules.iter().map(|r| self.evaluate(r, ctx)).collect()
    }

    pub fn evaluate(&self, rule: &ValidationRule, ctx: &GenerationContext) -> ValidationResult {
        let (passed, message) = match &rule.check {
            RuleCheck::FileExists(paths) => {
                let missing: Vec<String> = paths
                    .iter()
                    .filter(|p| !self.filesystem.exists(&p.under(ctx.project_path())))
                    .map(ToString::to_string)
                    .collect();
                if missing.is_empty() {
                    (true, "All required files exist".to_string())
                } else {
                    (
                        false,
                        format!("Some required files are missing: {}", missing.join(", ")),
                    )
                }
            }
            RuleCheck::CommandSuccess(command)
            | RuleCheck::LintPass(command)
            | RuleCheck::TestPass(command)
            | RuleCheck::BuildSuccess(command) => {
                match self.runner.run(command, ctx.project_path()) {
                    Ok(out) if out.success() => (true, "Command executed successfully".to_string()),
                    Ok(out) => (
                        false,
                        format!("Command failed: exited with code {}", out.exit_code),
                    ),
                    Err(e) => (false, format!("Command failed: {e}")),
                }
            }
            RuleCheck::Custom(predicate) => match predicate(ctx) {
                Ok(true) => (true, "Custom validation passed".to_string()),
                Ok(false) => (false, "Custom validation failed".to_string()),
                Err(e) => (false, format!("Validation error: {e}")),
            },
        };

        debug!(rule = %rule.description, kind = %rule.kind(), passed, "Rule evaluated");

        ValidationResult {
            rule: rule.clone(),
            passed,
            message,
        }
    }
}
