// src/plan.rs
use std::path::Path;

use crate::config::{ProjectConfig, ProjectType, Variant};
use crate::error::ScaffoldError;
use crate::installer::{install_commands, InstallCommand};
use crate::templates::{self, FileSpec, PUBLIC_DIR, SHADERS_DIR, SRC_DIR};

/// A directory to create, relative to the project root (`.` is the root itself).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirSpec {
  pub relative_path: String,
  /// Output artifacts count toward progress; directories that only hold the
  /// files written after them do not.
  pub counted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
  MkDir(DirSpec),
  WriteFile(FileSpec),
  RunCommand(InstallCommand),
}

impl Step {
  pub fn weight(&self) -> u64 {
    match self {
      Step::MkDir(dir) => u64::from(dir.counted),
      Step::WriteFile(_) | Step::RunCommand(_) => 1,
    }
  }

  pub fn describe(&self) -> String {
    match self {
      Step::MkDir(dir) => format!("create directory {}", dir.relative_path),
      Step::WriteFile(file) => format!("write {}", file.relative_path),
      Step::RunCommand(command) => format!("run `{}`", command.command_line()),
    }
  }
}

/// The ordered steps for one configuration, computed before anything is touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPlan {
  steps: Vec<Step>,
}

fn container(path: &str) -> Step {
  Step::MkDir(DirSpec {
    relative_path: path.to_string(),
    counted: false,
  })
}

impl StepPlan {
  pub fn for_config(config: &ProjectConfig, root: &Path, package_manager: &str) -> Result<Self, ScaffoldError> {
    let mut steps = vec![
      container("."),
      Step::WriteFile(templates::index_html(config)),
      container(SRC_DIR),
      Step::WriteFile(templates::entry_script(config)),
      Step::WriteFile(templates::stylesheet(config)),
    ];

    match config.project_type {
      ProjectType::Basic => {}
      ProjectType::Shaders => {
        steps.push(container(SHADERS_DIR));
        steps.push(Step::WriteFile(templates::vertex_shader()));
        steps.push(Step::WriteFile(templates::fragment_shader()));
      }
    }

    steps.push(Step::WriteFile(templates::package_json(config)?));

    match config.variant {
      Variant::Plain => {}
      Variant::Typed => {
        steps.push(Step::WriteFile(templates::tsconfig()?));
        steps.push(Step::WriteFile(templates::glsl_declaration()));
      }
    }

    steps.push(Step::WriteFile(templates::vite_config(config)));
    steps.push(Step::MkDir(DirSpec {
      relative_path: PUBLIC_DIR.to_string(),
      counted: true,
    }));
    steps.push(Step::WriteFile(templates::gitignore()));

    steps.extend(
      install_commands(config, package_manager, root)
        .into_iter()
        .map(Step::RunCommand),
    );

    Ok(StepPlan { steps })
  }

  pub fn steps(&self) -> &[Step] {
    &self.steps
  }

  pub fn total_weight(&self) -> u64 {
    self.steps.iter().map(Step::weight).sum()
  }

  #[cfg(test)]
  pub(crate) fn insert(&mut self, index: usize, step: Step) {
    self.steps.insert(index, step);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::ProjectName;
  use crate::progress::total_steps;

  #[test]
  fn plan_weight_matches_closed_form_for_every_configuration() {
    for cfg in ProjectConfig::all_for("demo") {
      let plan = StepPlan::for_config(&cfg, Path::new("/tmp/demo"), "npm").unwrap();
      assert_eq!(plan.total_weight(), total_steps(&cfg), "mismatch for {:?}", cfg);
    }
  }

  #[test]
  fn writes_follow_template_order() {
    for cfg in ProjectConfig::all_for("demo") {
      let plan = StepPlan::for_config(&cfg, Path::new("/tmp/demo"), "npm").unwrap();
      let written: Vec<FileSpec> = plan
        .steps()
        .iter()
        .filter_map(|s| match s {
          Step::WriteFile(f) => Some(f.clone()),
          _ => None,
        })
        .collect();
      assert_eq!(written, templates::render_all(&cfg).unwrap());
    }
  }

  #[test]
  fn root_is_created_first_and_commands_run_last() {
    let cfg = ProjectConfig::new(
      ProjectName::parse("demo").unwrap(),
      ProjectType::Shaders,
      Variant::Typed,
      true,
    );
    let plan = StepPlan::for_config(&cfg, Path::new("/tmp/demo"), "npm").unwrap();
    let steps = plan.steps();

    assert_eq!(steps[0], container("."));
    let first_command = steps
      .iter()
      .position(|s| matches!(s, Step::RunCommand(_)))
      .unwrap();
    assert!(steps[first_command..]
      .iter()
      .all(|s| matches!(s, Step::RunCommand(_))));
    assert_eq!(steps.len() - first_command, 4);

    // every file's parent directory is created before the file
    let shaders_dir = steps.iter().position(|s| *s == container(SHADERS_DIR)).unwrap();
    let vertex = steps
      .iter()
      .position(|s| matches!(s, Step::WriteFile(f) if f.relative_path == "src/shaders/vertex.glsl"))
      .unwrap();
    assert!(shaders_dir < vertex);
  }
}
