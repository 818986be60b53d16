mod cli;
mod commands;

use bankline::BankError;
use clap::Parser;
use cli::{Cli, Commands};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const EXIT_CONFIG: u8 = 2;
const EXIT_SOFTWARE: u8 = 70;

#[tokio::main]
async fn main() -> ExitCode {
  let cli_args = Cli::parse();

  // Can be overridden by RUST_LOG env variable
  let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
  tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_writer(std::io::stderr)
    .init();

  let result = match cli_args.command {
    Commands::Run(run_args) => commands::run::run_day(run_args).await,
  };

  match result {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      eprintln!("Error: {:#}", err);
      ExitCode::from(exit_status(&err))
    }
  }
}

/// Configuration problems exit with 2; anything else that stops the day exits with 70.
fn exit_status(err: &anyhow::Error) -> u8 {
  let is_config = err
    .downcast_ref::<BankError>()
    .map(BankError::is_config_error)
    .unwrap_or(false);
  if is_config {
    EXIT_CONFIG
  } else {
    EXIT_SOFTWARE
  }
}
