// src/prompt.rs
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use log::{debug, warn};

use crate::cancel::CancellationToken;
use crate::config::{ProjectConfig, ProjectName, ProjectType, Variant, DEFAULT_PROJECT_NAME};
use crate::error::{CancelReason, ScaffoldError};

/// Interactive questions. `Ok(None)` means the user aborted the prompt.
pub trait Prompter {
  fn text(
    &mut self,
    prompt: &str,
    default: &str,
    validate: &dyn Fn(&str) -> Result<(), String>,
  ) -> Result<Option<String>, ScaffoldError>;

  fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Option<usize>, ScaffoldError>;

  fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, ScaffoldError>;
}

/// Terminal prompts. Esc or Ctrl-C while answering yields `None`.
pub struct DialoguerPrompter {
  theme: ColorfulTheme,
}

impl DialoguerPrompter {
  pub fn new() -> Self {
    DialoguerPrompter {
      theme: ColorfulTheme::default(),
    }
  }
}

/// dialoguer surfaces an aborted text prompt as an interrupted read.
fn aborted_as_none<T>(result: Result<T, dialoguer::Error>) -> Result<Option<T>, ScaffoldError> {
  match result {
    Ok(value) => Ok(Some(value)),
    Err(dialoguer::Error::IO(e)) if e.kind() == ErrorKind::Interrupted => Ok(None),
    Err(e) => Err(e.into()),
  }
}

/// `interact_opt` only reports Esc/`q` as `None`; Ctrl-C still arrives as an interrupted read.
fn aborted_opt_as_none<T>(result: Result<Option<T>, dialoguer::Error>) -> Result<Option<T>, ScaffoldError> {
  aborted_as_none(result).map(Option::flatten)
}

impl Prompter for DialoguerPrompter {
  fn text(
    &mut self,
    prompt: &str,
    default: &str,
    validate: &dyn Fn(&str) -> Result<(), String>,
  ) -> Result<Option<String>, ScaffoldError> {
    let input = Input::<String>::with_theme(&self.theme)
      .with_prompt(prompt)
      .default(default.to_string())
      .validate_with(|value: &String| -> Result<(), String> { validate(value.as_str()) })
      .interact_text();
    aborted_as_none(input)
  }

  fn select(&mut self, prompt: &str, items: &[&str], default: usize) -> Result<Option<usize>, ScaffoldError> {
    let selection = Select::with_theme(&self.theme)
      .with_prompt(prompt)
      .items(items)
      .default(default)
      .interact_opt();
    aborted_opt_as_none(selection)
  }

  fn confirm(&mut self, prompt: &str, default: bool) -> Result<Option<bool>, ScaffoldError> {
    let answer = Confirm::with_theme(&self.theme)
      .with_prompt(prompt)
      .default(default)
      .interact_opt();
    aborted_opt_as_none(answer)
  }
}

/// A validated configuration plus where it goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collected {
  pub config: ProjectConfig,
  pub target: PathBuf,
  /// Set only when the target existed and the user agreed to replace it.
  pub overwrite_confirmed: bool,
}

pub struct ConfigCollector<'a, P: Prompter> {
  prompter: P,
  cancel: &'a CancellationToken,
}

fn answered<T>(answer: Option<T>) -> Result<T, ScaffoldError> {
  answer.ok_or(ScaffoldError::Cancelled(CancelReason::PromptAborted))
}

impl<'a, P: Prompter> ConfigCollector<'a, P> {
  pub fn new(prompter: P, cancel: &'a CancellationToken) -> Self {
    ConfigCollector { prompter, cancel }
  }

  /// Asks name, project type, variant and tailwind, in that order, then
  /// confirms an overwrite if `parent/<name>` already exists.
  ///
  /// Touches nothing on disk; declining the overwrite ends as a cancellation.
  pub fn collect(&mut self, parent: &Path) -> Result<Collected, ScaffoldError> {
    let project_name = self.ask_name()?;

    self.cancel.check()?;
    let labels: Vec<&str> = ProjectType::ALL.iter().map(|t| t.label()).collect();
    let index = answered(self.prompter.select("Select a project type:", &labels, 0)?)?;
    let project_type = ProjectType::ALL[index];

    self.cancel.check()?;
    let labels: Vec<&str> = Variant::ALL.iter().map(|v| v.label()).collect();
    let index = answered(self.prompter.select("Select a variant:", &labels, 0)?)?;
    let variant = Variant::ALL[index];

    self.cancel.check()?;
    let tailwind = answered(
      self
        .prompter
        .confirm("Do you want to include Tailwind CSS?", false)?,
    )?;

    let config = ProjectConfig::new(project_name, project_type, variant, tailwind);
    debug!("Collected configuration: {:?}", config);

    let target = parent.join(config.project_name.as_str());
    let mut overwrite_confirmed = false;
    // Same check as `prepare_target`: a dangling symlink still occupies the name.
    if fs::symlink_metadata(&target).is_ok() {
      self.cancel.check()?;
      let prompt = format!(
        "Directory {} already exists. Do you want to overwrite it?",
        config.project_name
      );
      if !answered(self.prompter.confirm(&prompt, false)?)? {
        return Err(ScaffoldError::Cancelled(CancelReason::OverwriteDeclined));
      }
      overwrite_confirmed = true;
    }

    Ok(Collected {
      config,
      target,
      overwrite_confirmed,
    })
  }

  fn ask_name(&mut self) -> Result<ProjectName, ScaffoldError> {
    let validate = |input: &str| ProjectName::parse(input).map(|_| ()).map_err(|e| e.to_string());
    loop {
      self.cancel.check()?;
      let raw = answered(
        self
          .prompter
          .text("Project name:", DEFAULT_PROJECT_NAME, &validate)?,
      )?;
      match ProjectName::parse(&raw) {
        Ok(name) => return Ok(name),
        Err(e) => warn!("{}", e),
      }
    }
  }
}
