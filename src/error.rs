// src/error.rs
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScaffoldError {
  #[error("IO Error: {0}")]
  Io(#[from] std::io::Error),

  #[error("JSON Serialization Error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("Invalid project name '{name}': {reason}")]
  InvalidProjectName { name: String, reason: String },

  #[error("Operation cancelled: {0}")]
  Cancelled(CancelReason),

  #[error("Failed to {action} '{path}': {source}")]
  FileSystem {
    action: &'static str,
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Refusing to touch '{path}': it resolves outside the project root")]
  PathEscapesRoot { path: PathBuf },

  #[error("Could not execute `{command}`: {source}")]
  CommandExecError {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("`{command}` failed with status {}. Stderr: {stderr}", display_code(.code))]
  CommandFailedStatus {
    command: String,
    code: Option<i32>,
    stderr: String,
  },

  #[error("User interaction failed: {0}")]
  Prompt(#[from] dialoguer::Error),
}

/// Why a run stopped early without being a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
  /// The user aborted a prompt (Esc / Ctrl-C while answering).
  PromptAborted,
  /// The target directory exists and the user declined to overwrite it.
  OverwriteDeclined,
  /// An interrupt signal arrived.
  Interrupted,
}

impl fmt::Display for CancelReason {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      CancelReason::PromptAborted => write!(f, "prompt aborted"),
      CancelReason::OverwriteDeclined => write!(f, "existing directory kept"),
      CancelReason::Interrupted => write!(f, "interrupted"),
    }
  }
}

impl ScaffoldError {
  /// True for outcomes the user chose; everything else is fatal.
  pub fn is_cancellation(&self) -> bool {
    matches!(self, ScaffoldError::Cancelled(_))
  }

  pub(crate) fn fs(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
    ScaffoldError::FileSystem {
      action,
      path: path.into(),
      source,
    }
  }
}

fn display_code(code: &Option<i32>) -> String {
  code.map_or_else(|| "unknown (terminated by signal)".to_string(), |c| c.to_string())
}
