// src/generate.rs
use std::env;
use std::path::Path;

use log::{debug, info};

use crate::builder::{prepare_target, BuildReport, ProjectBuilder};
use crate::cancel::CancellationToken;
use crate::cli::Cli;
use crate::config::ProjectConfig;
use crate::error::ScaffoldError;
use crate::installer::{CommandRunner, DependencyInstaller, DuctRunner};
use crate::plan::StepPlan;
use crate::progress::{total_steps, ProgressReporter};
use crate::prompt::{Collected, ConfigCollector, DialoguerPrompter, Prompter};

/// What a successful run produced, for the closing summary.
#[derive(Debug)]
pub struct Generated {
  pub config: ProjectConfig,
  pub report: BuildReport,
}

pub fn run_generate(cli: &Cli, cancel: &CancellationToken) -> Result<Generated, ScaffoldError> {
  let parent = env::current_dir().map_err(ScaffoldError::Io)?;
  let installer = DependencyInstaller::new(DuctRunner, cancel.clone());
  run_with(
    DialoguerPrompter::new(),
    &installer,
    &parent,
    &cli.package_manager,
    cancel,
    true,
  )
}

/// Prompts, then builds and installs under `parent`.
fn run_with<P: Prompter, R: CommandRunner>(
  prompter: P,
  installer: &DependencyInstaller<R>,
  parent: &Path,
  package_manager: &str,
  cancel: &CancellationToken,
  show_progress: bool,
) -> Result<Generated, ScaffoldError> {
  // --- 1. Gather Configuration ---
  info!("Collecting project configuration...");
  let Collected {
    config,
    target,
    overwrite_confirmed,
  } = ConfigCollector::new(prompter, cancel).collect(parent)?;
  debug!("Configuration as JSON: {}", serde_json::to_string(&config)?);

  // --- 2. Plan (derived before the first mutation) ---
  let plan = StepPlan::for_config(&config, &target, package_manager)?;
  let total = total_steps(&config);
  debug!(
    "Planned {} steps ({} of {} progress units) for {}",
    plan.steps().len(),
    plan.total_weight(),
    total,
    target.display()
  );

  // --- 3. Prepare Target Directory ---
  cancel.check()?;
  prepare_target(&target, overwrite_confirmed)?;

  let mut progress = if show_progress {
    println!();
    ProgressReporter::new(total)
  } else {
    ProgressReporter::hidden(total)
  };

  // --- 4. Generate Files And Install Dependencies ---
  info!("Generating project in '{}'...", target.display());
  let builder = ProjectBuilder::new(&target, installer, cancel);
  match builder.execute(&plan, &mut progress) {
    Ok(report) => {
      progress.finish();
      info!("Project ready in '{}'", builder.root().display());
      Ok(Generated { config, report })
    }
    Err(e) => {
      debug!(
        "Stopped after {} of {} progress units; '{}' is left as is",
        progress.issued(),
        progress.total(),
        builder.root().display()
      );
      progress.abandon();
      Err(e)
    }
  }
}
