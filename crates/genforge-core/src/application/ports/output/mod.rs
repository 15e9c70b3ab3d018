//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `genforge-adapters` crate provides implementations.

use std::path::Path;

use serde::Serialize;

use crate::domain::{GenerationContext, TaskSuggestion, TemplateSuggestion};
use crate::error::GenforgeResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `genforge_adapters::filesystem::LocalFilesystem` (production)
/// - `genforge_adapters::filesystem::MemoryFilesystem` (testing)
///
/// Calls may arrive from several write workers at once.
#[cfg_attr(test, mockall::automock)]
pub trait Filesystem: Send + Sync {
    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> GenforgeResult<()>;

    /// Write content to a file, replacing it if present.
    fn write_file(&self, path: &Path, content: &str) -> GenforgeResult<()>;

    /// Mark a file executable.
    fn set_executable(&self, path: &Path) -> GenforgeResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;
}

/// Captured result of a finished process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Port for running shell commands.
///
/// Implemented by:
/// - `genforge_adapters::process::ShellRunner` (production)
/// - `genforge_adapters::process::ScriptedRunner` (testing)
///
/// A non-zero exit is a normal `Ok` result; `Err` means the process could
/// not be started.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner: Send + Sync {
    fn run(&self, command: &str, cwd: &Path) -> GenforgeResult<CommandOutput>;
}

/// Port for the external enhancement collaborator.
///
/// Implemented by:
/// - `genforge_adapters::enhancer::ChatCompletionEnhancer` (OpenAI-compatible HTTP)
/// - `genforge_adapters::enhancer::CannedEnhancer` (offline, tests)
///
/// The orchestrator treats every `Err` as "no suggestion".
#[cfg_attr(test, mockall::automock)]
pub trait Enhancer: Send + Sync {
    /// Propose extra files, dependencies and commands for free-text requirements.
    fn enhance_template(
        &self,
        context: &GenerationContext,
        requirements: &str,
    ) -> GenforgeResult<TemplateSuggestion>;

    /// Propose files that carry out one named improvement task.
    fn enhance_with_task(
        &self,
        context: &GenerationContext,
        task: &str,
    ) -> GenforgeResult<TaskSuggestion>;
}
