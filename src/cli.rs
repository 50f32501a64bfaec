// src/cli.rs
use clap::Parser;

/// Project settings are never taken from flags; they are always asked interactively.
#[derive(Parser, Debug)]
#[command(
    name = "vite3",
    author,
    version,
    about = "Scaffolds a Vite + Three.js project and installs its dependencies.",
    long_about = None
)]
pub struct Cli {
  /// Increase verbosity level (e.g., -v, -vv)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Package manager executable used for `install`
  #[arg(long, default_value = "npm")]
  #[clap(env = "VITE3_PACKAGE_MANAGER")]
  pub package_manager: String,
}
