// src/builder.rs
use std::fs;
use std::path::{Component, Path, PathBuf};

use log::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::error::{CancelReason, ScaffoldError};
use crate::installer::{CommandRunner, DependencyInstaller};
use crate::plan::{Step, StepPlan};
use crate::progress::ProgressReporter;

/// Counts of what a run actually did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct BuildReport {
  pub directories_created: usize,
  pub files_written: usize,
  pub commands_run: usize,
}

/// Clears the way for a fresh project root.
///
/// An existing target is removed only when `overwrite_confirmed` is set;
/// otherwise nothing is touched and the run ends as a cancellation.
pub fn prepare_target(root: &Path, overwrite_confirmed: bool) -> Result<(), ScaffoldError> {
  let Ok(metadata) = fs::symlink_metadata(root) else {
    return Ok(());
  };
  if !overwrite_confirmed {
    info!("Keeping existing '{}'", root.display());
    return Err(ScaffoldError::Cancelled(CancelReason::OverwriteDeclined));
  }

  warn!("Removing existing '{}'", root.display());
  if metadata.is_dir() {
    fs::remove_dir_all(root).map_err(|e| ScaffoldError::fs("remove directory", root, e))
  } else {
    fs::remove_file(root).map_err(|e| ScaffoldError::fs("remove file", root, e))
  }
}

/// Resolves a `/`-separated relative path under `root`, rejecting anything
/// absolute or containing `..`.
fn resolve_within(root: &Path, relative: &str) -> Result<PathBuf, ScaffoldError> {
  let mut resolved = root.to_path_buf();
  for component in Path::new(relative).components() {
    match component {
      Component::Normal(part) => resolved.push(part),
      Component::CurDir => {}
      Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
        return Err(ScaffoldError::PathEscapesRoot {
          path: PathBuf::from(relative),
        });
      }
    }
  }
  Ok(resolved)
}

pub struct ProjectBuilder<'a, R: CommandRunner> {
  root: PathBuf,
  installer: &'a DependencyInstaller<R>,
  cancel: &'a CancellationToken,
}

impl<'a, R: CommandRunner> ProjectBuilder<'a, R> {
  pub fn new(root: impl Into<PathBuf>, installer: &'a DependencyInstaller<R>, cancel: &'a CancellationToken) -> Self {
    ProjectBuilder {
      root: root.into(),
      installer,
      cancel,
    }
  }

  pub fn root(&self) -> &Path {
    &self.root
  }

  /// Runs every step in order, one progress tick per unit of weight.
  ///
  /// Stops at the first failure. Whatever was written before it stays on disk.
  pub fn execute(&self, plan: &StepPlan, progress: &mut ProgressReporter) -> Result<BuildReport, ScaffoldError> {
    let mut report = BuildReport::default();
    let total = plan.steps().len();

    for (i, step) in plan.steps().iter().enumerate() {
      self.cancel.check()?;
      debug!("[{}/{}] {}", i + 1, total, step.describe());

      match step {
        Step::MkDir(dir) => {
          let path = resolve_within(&self.root, &dir.relative_path)?;
          fs::create_dir(&path).map_err(|e| ScaffoldError::fs("create directory", &path, e))?;
          report.directories_created += 1;
        }
        Step::WriteFile(file) => {
          let path = resolve_within(&self.root, &file.relative_path)?;
          fs::write(&path, &file.content).map_err(|e| ScaffoldError::fs("write", &path, e))?;
          report.files_written += 1;
        }
        Step::RunCommand(command) => {
          if command.working_dir != self.root {
            return Err(ScaffoldError::PathEscapesRoot {
              path: command.working_dir.clone(),
            });
          }
          self.installer.install(command)?;
          report.commands_run += 1;
        }
      }
      progress.advance(step.weight());
    }

    Ok(report)
  }
}

#[cfg(test)]
mod tests {
  use std::collections::BTreeSet;

  use tempfile::TempDir;
  use walkdir::WalkDir;

  use super::*;
  use crate::config::{ProjectConfig, ProjectName, ProjectType, Variant};
  use crate::installer::testing::RecordingRunner;
  use crate::installer::DependencyGroup;
  use crate::progress::total_steps;
  use crate::templates::FileSpec;

  fn config(project_type: ProjectType, variant: Variant, tailwind: bool) -> ProjectConfig {
    ProjectConfig::new(ProjectName::parse("demo").unwrap(), project_type, variant, tailwind)
  }

  fn tree(root: &Path) -> BTreeSet<String> {
    WalkDir::new(root)
      .min_depth(1)
      .into_iter()
      .map(|e| {
        e.unwrap()
          .path()
          .strip_prefix(root)
          .unwrap()
          .to_string_lossy()
          .replace('\\', "/")
      })
      .collect()
  }

  fn build(cfg: &ProjectConfig, runner: &RecordingRunner) -> (TempDir, PathBuf, Result<BuildReport, ScaffoldError>, u64) {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join(cfg.project_name.as_str());
    let token = CancellationToken::new();
    let installer = DependencyInstaller::new(runner, token.clone());
    let builder = ProjectBuilder::new(&root, &installer, &token);
    let plan = StepPlan::for_config(cfg, &root, "npm").unwrap();
    let mut progress = ProgressReporter::hidden(total_steps(cfg));
    let result = builder.execute(&plan, &mut progress);
    let issued = progress.issued();
    (tmp, root, result, issued)
  }

  #[test]
  fn basic_plain_tree() {
    let runner = RecordingRunner::default();
    let cfg = config(ProjectType::Basic, Variant::Plain, false);
    let (_tmp, root, result, _) = build(&cfg, &runner);
    result.unwrap();

    let expected: BTreeSet<String> = [
      "index.html",
      "src",
      "src/main.js",
      "src/styles.css",
      "package.json",
      "vite.config.js",
      "public",
      ".gitignore",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    assert_eq!(tree(&root), expected);
    assert_eq!(fs::read_dir(root.join("public")).unwrap().count(), 0);
    assert_eq!(runner.calls.borrow().len(), 2);
  }

  #[test]
  fn shaders_typed_tailwind_tree() {
    let runner = RecordingRunner::default();
    let cfg = config(ProjectType::Shaders, Variant::Typed, true);
    let (_tmp, root, result, _) = build(&cfg, &runner);
    let report = result.unwrap();

    let files = tree(&root);
    for expected in [
      "src/main.ts",
      "src/shaders/vertex.glsl",
      "src/shaders/fragment.glsl",
      "src/glsl.d.ts",
      "tsconfig.json",
      "vite.config.ts",
    ] {
      assert!(files.contains(expected), "{} missing from {:?}", expected, files);
    }
    assert!(!files.contains("src/main.js"));
    assert_eq!(report.commands_run, 4);
    assert!(runner.calls.borrow().iter().all(|c| c.working_dir == root));
  }

  #[test]
  fn issued_progress_equals_precomputed_total() {
    for cfg in ProjectConfig::all_for("demo") {
      let runner = RecordingRunner::default();
      let (_tmp, _root, result, issued) = build(&cfg, &runner);
      result.unwrap();
      assert_eq!(issued, total_steps(&cfg), "diverged for {:?}", cfg);
    }
  }

  #[test]
  fn command_failure_aborts_and_leaves_partial_tree() {
    let runner = RecordingRunner {
      fail_on: Some(DependencyGroup::Runtime),
      ..Default::default()
    };
    let cfg = config(ProjectType::Basic, Variant::Typed, true);
    let (_tmp, root, result, issued) = build(&cfg, &runner);

    assert!(matches!(result, Err(ScaffoldError::CommandFailedStatus { .. })));
    assert_eq!(runner.calls.borrow().len(), 1, "no command may run after a failure");
    assert!(root.join("package.json").is_file(), "written files are not rolled back");
    assert!(issued < total_steps(&cfg));
  }

  #[test]
  fn filesystem_failure_aborts_before_installing() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("demo");
    let token = CancellationToken::new();
    let runner = RecordingRunner::default();
    let installer = DependencyInstaller::new(&runner, token.clone());
    let builder = ProjectBuilder::new(&root, &installer, &token);
    let cfg = config(ProjectType::Basic, Variant::Plain, false);
    let mut plan = StepPlan::for_config(&cfg, &root, "npm").unwrap();
    // a regular file named `src` lands right before the `src` directory
    assert_eq!(plan.steps()[2].describe(), "create directory src");
    plan.insert(
      2,
      Step::WriteFile(FileSpec {
        relative_path: "src".to_string(),
        content: String::new(),
      }),
    );

    let mut progress = ProgressReporter::hidden(total_steps(&cfg));
    let err = builder.execute(&plan, &mut progress).unwrap_err();
    match &err {
      ScaffoldError::FileSystem { action, path, .. } => {
        assert_eq!(*action, "create directory");
        assert_eq!(path, &root.join("src"));
      }
      other => panic!("unexpected error: {other:?}"),
    }
    assert!(!err.is_cancellation());
    assert!(root.join("index.html").is_file(), "earlier writes stay on disk");
    assert!(root.join("src").is_file());
    assert!(runner.calls.borrow().is_empty());
    assert_eq!(progress.issued(), 2);
  }

  #[test]
  fn cancellation_stops_before_the_next_step() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("demo");
    let token = CancellationToken::new();
    let runner = RecordingRunner::default();
    let installer = DependencyInstaller::new(&runner, token.clone());
    let builder = ProjectBuilder::new(&root, &installer, &token);
    let cfg = config(ProjectType::Basic, Variant::Plain, false);
    let plan = StepPlan::for_config(&cfg, &root, "npm").unwrap();

    token.cancel();
    let mut progress = ProgressReporter::hidden(total_steps(&cfg));
    let err = builder.execute(&plan, &mut progress).unwrap_err();
    assert!(err.is_cancellation());
    assert!(!root.exists());
    assert_eq!(progress.issued(), 0);
  }

  #[test]
  fn declined_overwrite_leaves_directory_untouched() {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("demo");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("keep.txt"), "old").unwrap();

    let err = prepare_target(&root, false).unwrap_err();
    assert!(matches!(err, ScaffoldError::Cancelled(CancelReason::OverwriteDeclined)));
    assert_eq!(fs::read_to_string(root.join("keep.txt")).unwrap(), "old");
  }

  #[test]
  fn accepted_overwrite_removes_previous_run() {
    let runner = RecordingRunner::default();
    let tmp = TempDir::new().unwrap();
    let root = tmp.path().join("demo");
    fs::create_dir_all(root.join("src/shaders")).unwrap();
    fs::write(root.join("src/shaders/vertex.glsl"), "old").unwrap();
    fs::write(root.join("stale.txt"), "old").unwrap();

    prepare_target(&root, true).unwrap();
    assert!(!root.exists());

    let token = CancellationToken::new();
    let installer = DependencyInstaller::new(&runner, token.clone());
    let builder = ProjectBuilder::new(&root, &installer, &token);
    let cfg = config(ProjectType::Basic, Variant::Plain, false);
    let plan = StepPlan::for_config(&cfg, &root, "npm").unwrap();
    builder
      .execute(&plan, &mut ProgressReporter::hidden(total_steps(&cfg)))
      .unwrap();

    let files = tree(&root);
    assert!(!files.contains("stale.txt"));
    assert!(!files.contains("src/shaders"));
    assert!(files.contains("src/main.js"));
  }

  #[test]
  fn missing_target_needs_no_confirmation() {
    let tmp = TempDir::new().unwrap();
    prepare_target(&tmp.path().join("fresh"), false).unwrap();
  }

  #[test]
  fn paths_cannot_escape_the_root() {
    let root = Path::new("/work/demo");
    assert_eq!(resolve_within(root, ".").unwrap(), root);
    assert_eq!(
      resolve_within(root, "src/shaders/vertex.glsl").unwrap(),
      root.join("src").join("shaders").join("vertex.glsl")
    );
    for bad in ["../outside", "src/../../x", "/etc/passwd"] {
      assert!(
        matches!(resolve_within(root, bad), Err(ScaffoldError::PathEscapesRoot { .. })),
        "{} should be rejected",
        bad
      );
    }
  }
}
