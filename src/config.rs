// src/config.rs
use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::ScaffoldError;

pub const DEFAULT_PROJECT_NAME: &str = "vite-three-project";

fn name_pattern() -> &'static Regex {
  static PATTERN: OnceLock<Regex> = OnceLock::new();
  PATTERN.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("project name pattern is valid"))
}

/// A project name restricted to `[A-Za-z0-9_-]+`.
///
/// The charset excludes separators and dots, so a name can never climb out of
/// the directory it is created in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ProjectName(String);

impl ProjectName {
  pub fn parse(input: &str) -> Result<Self, ScaffoldError> {
    if input.is_empty() {
      return Err(ScaffoldError::InvalidProjectName {
        name: input.to_string(),
        reason: "name must not be empty".to_string(),
      });
    }
    if !name_pattern().is_match(input) {
      return Err(ScaffoldError::InvalidProjectName {
        name: input.to_string(),
        reason: "use only letters, digits, '-' and '_'".to_string(),
      });
    }
    Ok(ProjectName(input.to_string()))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for ProjectName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ProjectType {
  /// A rotating mesh with a basic material.
  Basic,
  /// A plane driven by custom vertex/fragment shaders and a `time` uniform.
  Shaders,
}

impl ProjectType {
  pub const ALL: [ProjectType; 2] = [ProjectType::Basic, ProjectType::Shaders];

  pub fn label(self) -> &'static str {
    match self {
      ProjectType::Basic => "basic",
      ProjectType::Shaders => "shaders",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Variant {
  /// Untyped JavaScript output.
  Plain,
  /// TypeScript output, type-checked before bundling.
  Typed,
}

impl Variant {
  pub const ALL: [Variant; 2] = [Variant::Plain, Variant::Typed];

  pub fn label(self) -> &'static str {
    match self {
      Variant::Plain => "JavaScript",
      Variant::Typed => "TypeScript",
    }
  }

  /// Extension for the entry script and bundler configuration.
  pub fn script_extension(self) -> &'static str {
    match self {
      Variant::Plain => "js",
      Variant::Typed => "ts",
    }
  }
}

/// The answers gathered by the prompts. Never mutated after collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
  pub project_name: ProjectName,
  pub project_type: ProjectType,
  pub variant: Variant,
  pub tailwind: bool,
}

impl ProjectConfig {
  pub fn new(project_name: ProjectName, project_type: ProjectType, variant: Variant, tailwind: bool) -> Self {
    ProjectConfig {
      project_name,
      project_type,
      variant,
      tailwind,
    }
  }

  pub fn is_typed(&self) -> bool {
    matches!(self.variant, Variant::Typed)
  }

  pub fn uses_shaders(&self) -> bool {
    matches!(self.project_type, ProjectType::Shaders)
  }

  /// Every combination of type, variant and tailwind for a given name.
  #[cfg(test)]
  pub fn all_for(name: &str) -> Vec<ProjectConfig> {
    let mut configs = Vec::new();
    for project_type in ProjectType::ALL {
      for variant in Variant::ALL {
        for tailwind in [false, true] {
          configs.push(ProjectConfig::new(
            ProjectName::parse(name).unwrap(),
            project_type,
            variant,
            tailwind,
          ));
        }
      }
    }
    configs
  }
}
