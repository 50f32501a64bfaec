// src/installer.rs
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use duct::cmd;
use log::{debug, error, trace};

use crate::cancel::CancellationToken;
use crate::config::ProjectConfig;
use crate::error::{CancelReason, ScaffoldError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyGroup {
  Runtime,
  Tooling,
  CssFramework,
  TypeChecking,
}

impl DependencyGroup {
  fn packages(self) -> &'static [&'static str] {
    match self {
      DependencyGroup::Runtime => &["three@latest"],
      DependencyGroup::Tooling => &["vite@latest", "vite-plugin-glsl@latest"],
      DependencyGroup::CssFramework => &["tailwindcss@latest", "@tailwindcss/vite@latest"],
      DependencyGroup::TypeChecking => &["typescript@latest", "@types/three@latest", "@types/node@latest"],
    }
  }

  fn save_flag(self) -> &'static str {
    match self {
      DependencyGroup::Runtime => "--save",
      DependencyGroup::Tooling | DependencyGroup::CssFramework | DependencyGroup::TypeChecking => "--save-dev",
    }
  }
}

/// One `<manager> install <package...> --save|--save-dev` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallCommand {
  pub group: DependencyGroup,
  pub program: String,
  pub args: Vec<String>,
  pub working_dir: PathBuf,
}

impl InstallCommand {
  pub fn new(group: DependencyGroup, program: &str, working_dir: &Path) -> Self {
    let mut args = vec!["install".to_string()];
    args.extend(group.packages().iter().map(|p| p.to_string()));
    args.push(group.save_flag().to_string());
    InstallCommand {
      group,
      program: program.to_string(),
      args,
      working_dir: working_dir.to_path_buf(),
    }
  }

  pub fn command_line(&self) -> String {
    format!("{} {}", self.program, self.args.join(" "))
  }
}

/// Install commands for `config`, in execution order.
pub fn install_commands(config: &ProjectConfig, program: &str, working_dir: &Path) -> Vec<InstallCommand> {
  let mut groups = vec![DependencyGroup::Runtime, DependencyGroup::Tooling];
  if config.tailwind {
    groups.push(DependencyGroup::CssFramework);
  }
  if config.is_typed() {
    groups.push(DependencyGroup::TypeChecking);
  }
  groups
    .into_iter()
    .map(|group| InstallCommand::new(group, program, working_dir))
    .collect()
}

/// What came back from a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
  pub success: bool,
  pub code: Option<i32>,
  pub stdout: String,
  pub stderr: String,
}

pub trait CommandRunner {
  /// Runs to completion. `Err` only when the process could not be started or waited on.
  fn run(&self, command: &InstallCommand) -> Result<CommandOutcome, ScaffoldError>;
}

/// Runs commands through duct with output captured (never shown to the user).
#[derive(Debug, Default, Clone, Copy)]
pub struct DuctRunner;

impl CommandRunner for DuctRunner {
  fn run(&self, command: &InstallCommand) -> Result<CommandOutcome, ScaffoldError> {
    debug!(
      "Executing `{}` in {}",
      command.command_line(),
      command.working_dir.display()
    );
    let output = cmd(&command.program, &command.args)
      .dir(&command.working_dir)
      .stdin_null()
      .stdout_capture()
      .stderr_capture()
      .unchecked()
      .run()
      .map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
          error!("Package manager '{}' not found on PATH", command.program);
        }
        ScaffoldError::CommandExecError {
          command: command.command_line(),
          source: e,
        }
      })?;

    Ok(CommandOutcome {
      success: output.status.success(),
      code: output.status.code(),
      stdout: String::from_utf8_lossy(&output.stdout).to_string(),
      stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    })
  }
}

pub struct DependencyInstaller<R: CommandRunner> {
  runner: R,
  cancel: CancellationToken,
}

impl<R: CommandRunner> DependencyInstaller<R> {
  pub fn new(runner: R, cancel: CancellationToken) -> Self {
    DependencyInstaller { runner, cancel }
  }

  /// Blocks until `command` exits. Any non-zero exit is fatal; nothing is retried.
  pub fn install(&self, command: &InstallCommand) -> Result<(), ScaffoldError> {
    self.cancel.check()?;
    debug!("Installing {:?} dependencies", command.group);

    let outcome = self.runner.run(command)?;
    trace!("`{}` stdout:\n{}", command.command_line(), outcome.stdout);
    trace!("`{}` stderr:\n{}", command.command_line(), outcome.stderr);

    // An interrupted child dies with a failure status; report the interrupt instead.
    if self.cancel.is_cancelled() {
      return Err(ScaffoldError::Cancelled(CancelReason::Interrupted));
    }
    if !outcome.success {
      error!(
        "`{}` failed (status: {:?}). Stderr: {}",
        command.command_line(),
        outcome.code,
        outcome.stderr.lines().next().unwrap_or("<empty stderr>")
      );
      return Err(ScaffoldError::CommandFailedStatus {
        command: command.command_line(),
        code: outcome.code,
        stderr: outcome.stderr,
      });
    }
    debug!("`{}` succeeded", command.command_line());
    Ok(())
  }
}
