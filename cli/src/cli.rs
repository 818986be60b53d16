use clap::Parser;
use std::path::PathBuf;

use bankline::config::{
  DEFAULT_CUSTOMERS, DEFAULT_DOOR_CAPACITY, DEFAULT_MANAGER_CAPACITY, DEFAULT_SAFE_CAPACITY, DEFAULT_TELLERS,
};

#[derive(Parser, Debug)]
#[clap(name = "bankline", version, about = "Bank simulation with teller and customer actors")]
pub struct Cli {
  #[clap(subcommand)]
  pub command: Commands,
}

#[derive(clap::Subcommand, Debug)]
pub enum Commands {
  /// Simulate one day at the bank and print the transcript
  Run(RunArgs),
}

#[derive(Parser, Debug)]
pub struct RunArgs {
  /// Number of tellers on duty
  #[clap(long, default_value_t = DEFAULT_TELLERS)]
  pub tellers: usize,

  /// Number of customers visiting today
  #[clap(long, default_value_t = DEFAULT_CUSTOMERS)]
  pub customers: usize,

  /// How many customers may be inside the bank at once
  #[clap(long = "door", default_value_t = DEFAULT_DOOR_CAPACITY)]
  pub door_capacity: usize,

  /// How many tellers may be inside the safe at once
  #[clap(long = "safe", default_value_t = DEFAULT_SAFE_CAPACITY)]
  pub safe_capacity: usize,

  /// How many tellers the manager can attend to at once
  #[clap(long = "manager", default_value_t = DEFAULT_MANAGER_CAPACITY)]
  pub manager_capacity: usize,

  /// Seed for transaction choices and delays; omit for a random day
  #[clap(long)]
  pub seed: Option<u64>,

  /// Upper bound on any single simulated delay, in milliseconds
  #[clap(long)]
  pub max_delay_ms: Option<u64>,

  /// Also append the transcript to this file
  #[clap(long, short = 'o')]
  pub log_file: Option<PathBuf>,
}
