//! Run outcome reported to the caller.
//!
//! Per-file and per-command outcomes are typed so callers never need to
//! scrape logs to learn what happened.

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use super::{common::RelativePath, context::MergeRecord, template::ValidationRule};
use crate::domain::state::PipelineState;

/// Warning added whenever validation did not fully pass.
pub const VALIDATIONS_FAILED: &str = "Some validations failed";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum FileOutcome {
    Written,
    Skipped { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: RelativePath,
    #[serde(flatten)]
    pub outcome: FileOutcome,
}

impl FileReport {
    pub fn written(path: RelativePath) -> Self {
        Self {
            path,
            outcome: FileOutcome::Written,
        }
    }

    pub fn skipped(path: RelativePath, reason: impl Into<String>) -> Self {
        Self {
            path,
            outcome: FileOutcome::Skipped {
                reason: reason.into(),
            },
        }
    }

    pub fn is_written(&self) -> bool {
        matches!(self.outcome, FileOutcome::Written)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum CommandOutcome {
    Executed { exit_code: i32 },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReport {
    /// The command after placeholder substitution.
    pub command: String,
    #[serde(flatten)]
    pub outcome: CommandOutcome,
}

impl CommandReport {
    pub fn succeeded(&self) -> bool {
        matches!(self.outcome, CommandOutcome::Executed { exit_code: 0 })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ValidationResult {
    pub rule: ValidationRule,
    pub passed: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum TaskOutcome {
    Applied { files: usize },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskReport {
    pub task: String,
    #[serde(flatten)]
    pub outcome: TaskOutcome,
}

/// Everything a caller learns about one generation run.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub run_id: Uuid,
    pub success: bool,
    pub project_path: PathBuf,
    pub state: PipelineState,
    pub trail: Vec<PipelineState>,
    /// Paths written, in declaration order.
    pub files_written: Vec<RelativePath>,
    pub file_outcomes: Vec<FileReport>,
    /// Commands that ran to a zero exit code.
    pub commands_executed: Vec<String>,
    pub command_reports: Vec<CommandReport>,
    pub validation_results: Vec<ValidationResult>,
    pub enhancements: Vec<MergeRecord>,
    pub post_tasks: Vec<TaskReport>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub next_steps: Vec<String>,
}

impl GenerationResult {
    pub fn new(run_id: Uuid, project_path: PathBuf) -> Self {
        Self {
            run_id,
            success: false,
            project_path,
            state: PipelineState::Idle,
            trail: Vec::new(),
            files_written: Vec::new(),
            file_outcomes: Vec::new(),
            commands_executed: Vec::new(),
            command_reports: Vec::new(),
            validation_results: Vec::new(),
            enhancements: Vec::new(),
            post_tasks: Vec::new(),
            errors: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn record_file(&mut self, report: FileReport) {
        if report.is_written() {
            self.files_written.push(report.path.clone());
        }
        self.file_outcomes.push(report);
    }

    pub fn record_command(&mut self, report: CommandReport) {
        if report.succeeded() {
            self.commands_executed.push(report.command.clone());
        }
        self.command_reports.push(report);
    }

    pub fn failed_validations(&self) -> impl Iterator<Item = &ValidationResult> {
        self.validation_results.iter().filter(|r| !r.passed)
    }

    pub fn skipped_files(&self) -> impl Iterator<Item = &FileReport> {
        self.file_outcomes.iter().filter(|r| !r.is_written())
    }

    /// True when the run failed fatally (constraints, template, cancellation).
    pub fn is_fatal(&self) -> bool {
        !self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_splits_successes_from_reports() {
        let mut r = GenerationResult::new(Uuid::nil(), PathBuf::from("/tmp/demo"));
        r.record_file(FileReport::written(RelativePath::new("a.txt")));
        r.record_file(FileReport::skipped(RelativePath::new("b.txt"), "disk full"));
        r.record_command(CommandReport {
            command: "npm i".into(),
            outcome: CommandOutcome::Executed { exit_code: 0 },
        });
        r.record_command(CommandReport {
            command: "npm test".into(),
            outcome: CommandOutcome::Executed { exit_code: 1 },
        });

        assert_eq!(r.files_written, vec![RelativePath::new("a.txt")]);
        assert_eq!(r.skipped_files().count(), 1);
        assert_eq!(r.commands_executed, vec!["npm i"]);
        assert_eq!(r.command_reports.len(), 2);
    }

    #[test]
    fn outcomes_serialize_flat() {
        let json = serde_json::to_value(FileReport::skipped(RelativePath::new("x"), "exists"))
            .unwrap();
        assert_eq!(json["path"], "x");
        assert_eq!(json["status"], "skipped");
        assert_eq!(json["reason"], "exists");
    }
}
