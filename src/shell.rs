//! Running the user command inside a repository

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use std::process::Stdio;
use tokio::process::Command;

/// Captured output of a finished command
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` when the process was killed by a signal
    pub status: Option<i32>,
    pub success: bool,
}

/// Runs `command` under `shell` with `dir` as the working directory
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, shell: &Path, command: &str, dir: &Path) -> Result<CommandOutput>;
}

/// Runs commands as `<shell> -c <command>` and buffers all output
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, shell: &Path, command: &str, dir: &Path) -> Result<CommandOutput> {
        let output = Command::new(shell)
            .arg("-c")
            .arg(command)
            .current_dir(dir)
            .stdin(Stdio::null())
            .output()
            .await?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            status: output.status.code(),
            success: output.status.success(),
        })
    }
}
