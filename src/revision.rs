// SPDX-FileCopyrightText: 2025 Maciej Borzecki <maciek.borzecki@gmail.com>
//
// SPDX-License-Identifier: MIT

use std::env;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror;

/// Environment variable which, when set to a non-empty value, replaces the
/// git query.
pub const DESCRIBE_ENV: &str = "GENVERSION_DESCRIBE";

/// Wraps revision query errors.
#[derive(thiserror::Error, Debug)]
pub enum RevisionError {
    #[error("cannot start git: {0}")]
    Start(io::Error),
    #[error("git command exited with status {exit_code}, stderr:\n{stderr}")]
    Execution { stderr: String, exit_code: i32 },
    #[error("cannot parse git output: {0}")]
    Output(String),
}

/// Short token identifying the state of the checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionDescriptor(String);

impl RevisionDescriptor {
    /// Returns a descriptor with surrounding whitespace stripped.
    pub fn new(desc: &str) -> Self {
        RevisionDescriptor(desc.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RevisionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct GitCommand(Command);

/// Scope for git commands.
#[derive(Debug, Clone, PartialEq)]
pub enum GitCommandScope {
    /// Current working directory.
    Cwd,
    /// Specific directory, passed as `-C <dir>`.
    Dir(PathBuf),
}

/// Builds git command line.
struct GitCommandBuilder<'a> {
    scope: &'a GitCommandScope,
    args: Vec<&'a str>,
}

impl<'a> GitCommandBuilder<'a> {
    fn new(scope: &'a GitCommandScope) -> Self {
        Self {
            scope,
            args: Vec::new(),
        }
    }

    fn args(mut self, args: &[&'a str]) -> Self {
        self.args = args.to_vec();
        self
    }

    fn build(self) -> GitCommand {
        let mut cmd = Command::new("git");
        if let GitCommandScope::Dir(dir) = self.scope {
            cmd.arg("-C");
            cmd.arg(dir);
        }

        cmd.args(self.args);
        GitCommand(cmd)
    }
}

/// Trait representing a way to run git command.
pub trait GitRunner {
    fn run(&mut self, cmd: GitCommand) -> Result<Vec<u8>, RevisionError>;
}

/// Wrapper for running git commands.
pub struct GitCommandRunner;

impl GitRunner for GitCommandRunner {
    /// Runs a command returning its output (stdout).
    fn run(&mut self, gitcmd: GitCommand) -> Result<Vec<u8>, RevisionError> {
        let GitCommand(mut cmd) = gitcmd;

        log::trace!(
            "running git with: {:?}",
            cmd.get_args()
                .by_ref()
                .map(|a| a.to_string_lossy())
                .collect::<Vec<_>>()
        );

        let res = cmd.output().map_err(RevisionError::Start)?;

        if !res.status.success() {
            return Err(RevisionError::Execution {
                stderr: String::from_utf8_lossy(&res.stderr).trim().to_string(),
                exit_code: res.status.code().unwrap_or(255),
            });
        }
        Ok(res.stdout)
    }
}

/// Describe the current checkout state with an abbreviated identifier, falling
/// back to the commit hash when no tag describes it.
pub fn describe<R>(
    runner: &mut R,
    scope: &GitCommandScope,
    abbrev: u32,
) -> Result<RevisionDescriptor, RevisionError>
where
    R: GitRunner,
{
    let abbrev_arg = format!("--abbrev={}", abbrev);
    let output = runner.run(
        GitCommandBuilder::new(scope)
            .args(&["describe", &abbrev_arg, "--always"])
            .build(),
    )?;

    let desc = String::from_utf8(output).map_err(|e| RevisionError::Output(e.to_string()))?;
    log::debug!("git describe: '{}'", desc.trim());

    Ok(RevisionDescriptor::new(&desc))
}

/// Returns the descriptor from the environment override, if one is set.
pub fn from_env() -> Option<RevisionDescriptor> {
    match env::var(DESCRIBE_ENV) {
        Ok(val) if !val.trim().is_empty() => Some(RevisionDescriptor::new(&val)),
        _ => None,
    }
}

/// Returns the git scope matching the project directory, or the current
/// directory if none is given.
pub fn scope_for(dir: Option<&Path>) -> GitCommandScope {
    match dir {
        Some(d) if !d.as_os_str().is_empty() => GitCommandScope::Dir(d.to_path_buf()),
        _ => GitCommandScope::Cwd,
    }
}
