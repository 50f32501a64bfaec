// src/progress.rs
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use log::error;

use crate::config::ProjectConfig;

/// index.html, entry script, stylesheet, package.json, bundler config, public/, .gitignore
const BASE_STEPS: u64 = 7;
/// runtime and tooling installs
const DEPENDENCY_INSTALL_STEPS: u64 = 2;

/// Total progress units for a full run of `config`, known before any side effect.
pub fn total_steps(config: &ProjectConfig) -> u64 {
  BASE_STEPS
    + DEPENDENCY_INSTALL_STEPS
    + if config.uses_shaders() { 2 } else { 0 }
    + if config.tailwind { 1 } else { 0 }
    + if config.is_typed() { 3 } else { 0 }
}

pub struct ProgressReporter {
  bar: ProgressBar,
  total: u64,
  issued: u64,
}

impl ProgressReporter {
  pub fn new(total: u64) -> Self {
    let bar = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
      .template("Installing dependencies [{bar:40.green/white}] {percent}%")
      .unwrap_or_else(|_| ProgressStyle::default_bar())
      .progress_chars("■■ ");
    bar.set_style(style);
    Self::with_bar(bar, total)
  }

  /// A reporter that counts but draws nothing.
  pub fn hidden(total: u64) -> Self {
    let bar = ProgressBar::with_draw_target(Some(total), ProgressDrawTarget::hidden());
    Self::with_bar(bar, total)
  }

  fn with_bar(bar: ProgressBar, total: u64) -> Self {
    ProgressReporter { bar, total, issued: 0 }
  }

  pub fn advance(&mut self, weight: u64) {
    if weight == 0 {
      return;
    }
    self.issued += weight;
    self.bar.inc(weight);
  }

  pub fn issued(&self) -> u64 {
    self.issued
  }

  pub fn total(&self) -> u64 {
    self.total
  }

  /// Clears the bar. Returns the number of units issued.
  pub fn finish(self) -> u64 {
    if self.issued != self.total {
      error!(
        "Progress accounting diverged: issued {} of {} units",
        self.issued, self.total
      );
    }
    self.bar.finish_and_clear();
    self.issued
  }

  /// Clears the bar after a failure or cancellation.
  pub fn abandon(self) {
    self.bar.finish_and_clear();
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::config::{ProjectName, ProjectType, Variant};

  #[test]
  fn closed_form_totals() {
    let name = || ProjectName::parse("demo").unwrap();
    let minimal = ProjectConfig::new(name(), ProjectType::Basic, Variant::Plain, false);
    let maximal = ProjectConfig::new(name(), ProjectType::Shaders, Variant::Typed, true);
    assert_eq!(total_steps(&minimal), 9);
    assert_eq!(total_steps(&maximal), 15);
  }

  #[test]
  fn zero_weight_is_not_counted() {
    let mut reporter = ProgressReporter::hidden(3);
    reporter.advance(1);
    reporter.advance(0);
    reporter.advance(2);
    assert_eq!(reporter.issued(), 3);
    assert_eq!(reporter.total(), 3);
    assert_eq!(reporter.finish(), 3);
  }
}
