//! External program runner.
//!
//! The packaging backend and the system package manager both go through
//! [`Cmd`], so a failure always names the program, its exit code and
//! whatever it wrote to stderr.

use anyhow::{bail, Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Captured output of a finished program.
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandResult {
    /// Exit code, or -1 when killed by a signal.
    pub fn code(&self) -> i32 {
        self.status.code().unwrap_or(-1)
    }

    pub fn stdout_trimmed(&self) -> &str {
        self.stdout.trim()
    }
}

/// Invocation of one external program.
pub struct Cmd {
    program: String,
    args: Vec<OsString>,
    /// Replaces the default "'<program>' failed" prefix of errors.
    error_prefix: Option<String>,
}

impl Cmd {
    pub fn new(program: impl AsRef<str>) -> Self {
        Self {
            program: program.as_ref().to_string(),
            args: Vec::new(),
            error_prefix: None,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|a| OsString::from(a.as_ref())));
        self
    }

    /// Pass a path verbatim, without a UTF-8 round trip.
    pub fn arg_path(mut self, path: &Path) -> Self {
        self.args.push(path.as_os_str().to_owned());
        self
    }

    pub fn error_msg(mut self, msg: impl AsRef<str>) -> Self {
        self.error_prefix = Some(msg.as_ref().to_string());
        self
    }

    fn prefix(&self) -> String {
        self.error_prefix
            .clone()
            .unwrap_or_else(|| format!("'{}' failed", self.program))
    }

    fn spawn_error(&self) -> String {
        format!("Failed to execute '{}'. Is it installed?", self.program)
    }

    /// Run to completion with stdout and stderr captured. Non-zero exit is an error.
    pub fn run(self) -> Result<CommandResult> {
        tracing::debug!(program = %self.program, args = ?self.args, "running command");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .with_context(|| self.spawn_error())?;

        let result = CommandResult {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.status.success() {
            let stderr = result.stderr.trim();
            if stderr.is_empty() {
                bail!("{} (exit code {})", self.prefix(), result.code());
            }
            bail!("{} (exit code {}):\n{}", self.prefix(), result.code(), stderr);
        }

        Ok(result)
    }

    /// Run attached to the terminal, for the package manager's prompts
    /// (sudo password, progress output).
    pub fn run_interactive(self) -> Result<ExitStatus> {
        tracing::debug!(program = %self.program, args = ?self.args, "running interactive command");

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .with_context(|| self.spawn_error())?;

        if !status.success() {
            bail!(
                "{} (exit code {})",
                self.prefix(),
                status.code().unwrap_or(-1)
            );
        }

        Ok(status)
    }
}

/// Full path of `program` on PATH, if any.
pub fn which(program: &str) -> Option<PathBuf> {
    which::which(program).ok()
}
