// src/main.rs
mod builder;
mod cancel;
mod cli;
mod config;
mod error;
mod generate;
mod installer;
mod plan;
mod progress;
mod prompt;
mod templates;

use std::process::{self, ExitCode};

use cancel::CancellationToken;
use clap::Parser;
use cli::Cli;
use console::{style, Term};
use error::{CancelReason, ScaffoldError};
use log::LevelFilter;

const BANNER: &str = r"
  ██╗   ██╗  ██╗ ████████╗ ███████╗       ██████╗
  ██║   ██║  ██║ ╚══██╔══╝ ██╔════╝       ╚════██╗
  ██║   ██║  ██║    ██║    █████╗  █████╗  █████╔╝
  ╚██╗ ██╔╝  ██║    ██║    ██╔══╝  ╚════╝  ╚═══██╗
   ╚████╔╝   ██║    ██║    ███████╗       ██████╔╝
    ╚═══╝    ╚═╝    ╚═╝    ╚══════╝       ╚═════╝
";

fn main() -> ExitCode {
  let cli = Cli::parse();

  // Setup logging based on verbosity
  let log_level = match cli.verbose {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new().filter_level(log_level).init();

  log::debug!("CLI args: {:?}", cli);

  let cancel = CancellationToken::new();
  install_interrupt_handler(cancel.clone());

  match generate::run_generate(&cli, &cancel) {
    Ok(generated) => {
      log::info!(
        "Wrote {} files, created {} directories, ran {} install commands",
        generated.report.files_written,
        generated.report.directories_created,
        generated.report.commands_run
      );
      print_summary(&generated.config.project_name.to_string(), &cli.package_manager);
      ExitCode::SUCCESS
    }
    Err(e) if e.is_cancellation() => {
      log::debug!("{}", e);
      println!("{}", cancellation_message(&e));
      ExitCode::SUCCESS
    }
    Err(e) => {
      log::error!("{:?}", e);
      eprintln!("An error occurred: {}", e);
      ExitCode::FAILURE
    }
  }
}

/// Ctrl-C ends the process on the spot; files already written stay.
fn install_interrupt_handler(cancel: CancellationToken) {
  let result = ctrlc::set_handler(move || {
    cancel.cancel();
    let _ = Term::stderr().show_cursor();
    println!("\n{} Operation cancelled", style("✖").red());
    process::exit(0);
  });
  if let Err(e) = result {
    log::warn!("Could not install interrupt handler: {}", e);
  }
}

/// A declined overwrite is a choice, not an abort, and reads that way.
fn cancellation_message(error: &ScaffoldError) -> String {
  match error {
    ScaffoldError::Cancelled(CancelReason::OverwriteDeclined) => "Operation terminated.".to_string(),
    _ => format!("\n{} Operation cancelled", style("✖").red()),
  }
}

fn print_summary(project_name: &str, package_manager: &str) {
  let stdout = Term::stdout();
  if stdout.is_term() {
    let _ = stdout.clear_screen();
  }
  println!("{}", style(BANNER).blue().bright());
  println!(
    "\n Created \"{}\" a {} + {} project.\n",
    style(project_name).green().bright(),
    style("Vite").blue().bright(),
    style("ThreeJS").blue().bright()
  );
  println!("{}\n", style(" To run the project:").blue().bright());
  println!(" cd {}", style(project_name).cyan());
  println!(
    " {} {} {}",
    package_manager,
    style("run").magenta().bright(),
    style("dev").blue().bright()
  );
}
