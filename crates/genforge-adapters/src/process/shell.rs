//! Shell command runner using `std::process`.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use genforge_core::{
    application::{
        ApplicationError,
        ports::{CommandOutput, CommandRunner},
    },
    error::GenforgeResult,
};

/// Runs commands through the platform shell (`sh -c` or `cmd /C`).
///
/// Output is captured; a non-zero exit is returned as a normal
/// [`CommandOutput`]. Only a spawn failure is an error.
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    env: Vec<(String, String)>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra environment variable for every command.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn shell_command(command: &str) -> Command {
        if cfg!(windows) {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        } else {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str, cwd: &Path) -> GenforgeResult<CommandOutput> {
        debug!(command, cwd = %cwd.display(), "spawning");

        let output = Self::shell_command(command)
            .current_dir(cwd)
            .envs(self.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|e| ApplicationError::CommandSpawn {
                command: command.to_string(),
                reason: e.to_string(),
            })?;

        Ok(CommandOutput {
            // Killed by a signal: no code.
            exit_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn captures_output_and_exit_code() {
        let dir = TempDir::new().unwrap();
        let runner = ShellRunner::new().env("GENFORGE_TEST", "hi");

        let ok = runner.run("echo $GENFORGE_TEST", dir.path()).unwrap();
        assert!(ok.success());
        assert_eq!(ok.stdout.trim(), "hi");

        let failed = runner.run("exit 3", dir.path()).unwrap();
        assert_eq!(failed.exit_code, 3);
    }

    #[test]
    fn runs_in_the_given_directory() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "").unwrap();

        let out = ShellRunner::new().run("ls", dir.path()).unwrap();
        assert!(out.stdout.contains("marker.txt"));
    }

    #[test]
    fn missing_directory_is_a_spawn_error() {
        let err = ShellRunner::new()
            .run("true", Path::new("/definitely/not/here"))
            .unwrap_err();
        assert!(err.to_string().contains("true"));
    }
}
