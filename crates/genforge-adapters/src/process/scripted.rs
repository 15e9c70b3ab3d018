//! Scripted command runner for tests and dry runs.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use genforge_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandRunner},
    },
    error::{GenforgeError, GenforgeResult},
};

/// What a scripted command does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptedResponse {
    Exit(i32),
    SpawnError(String),
}

/// Records every command and answers from a script instead of spawning.
///
/// Responses match on substring, first match wins; unmatched commands exit 0.
/// Clones share the call log.
#[derive(Debug, Clone, Default)]
pub struct ScriptedRunner {
    script: Vec<(String, ScriptedResponse)>,
    calls: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, pattern: impl Into<String>, response: ScriptedResponse) -> Self {
        self.script.push((pattern.into(), response));
        self
    }

    /// Commands seen so far with their working directories.
    pub fn calls(&self) -> Vec<(String, PathBuf)> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn commands(&self) -> Vec<String> {
        self.calls().into_iter().map(|(c, _)| c).collect()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str, cwd: &Path) -> GenforgeResult<CommandOutput> {
        self.calls
            .lock()
            .map_err(|_| GenforgeError::Internal {
                message: "scripted runner lock poisoned".into(),
            })?
            .push((command.to_string(), cwd.to_path_buf()));

        let response = self
            .script
            .iter()
            .find(|(pattern, _)| command.contains(pattern.as_str()))
            .map(|(_, r)| r.clone())
            .unwrap_or(ScriptedResponse::Exit(0));

        match response {
            ScriptedResponse::Exit(code) => Ok(CommandOutput {
                exit_code: code,
                stdout: String::new(),
                stderr: String::new(),
            }),
            ScriptedResponse::SpawnError(reason) => Err(ApplicationError::CommandSpawn {
                command: command.to_string(),
                reason,
            }
            .into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_matching_pattern_wins() {
        let runner = ScriptedRunner::new()
            .respond("npm test", ScriptedResponse::Exit(1))
            .respond("npm", ScriptedResponse::SpawnError("npm not found".into()));

        assert_eq!(runner.run("npm test", Path::new("/p")).unwrap().exit_code, 1);
        assert!(runner.run("npm install", Path::new("/p")).is_err());
        assert!(runner.run("git init", Path::new("/p")).unwrap().success());
        assert_eq!(runner.commands(), vec!["npm test", "npm install", "git init"]);
    }
}
