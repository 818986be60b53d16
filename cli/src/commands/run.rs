use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::time::Duration;

use bankline::{Bank, BankConfig, RandomBehavior};

use crate::cli::RunArgs;

/// Writes every line to stdout and, if configured, to a log file as well.
struct Tee {
  stdout: io::Stdout,
  file: Option<File>,
}

impl Write for Tee {
  fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
    self.stdout.write_all(buf)?;
    if let Some(file) = self.file.as_mut() {
      file.write_all(buf)?;
    }
    Ok(buf.len())
  }

  fn flush(&mut self) -> io::Result<()> {
    self.stdout.flush()?;
    if let Some(file) = self.file.as_mut() {
      file.flush()?;
    }
    Ok(())
  }
}

fn config_from(args: &RunArgs) -> BankConfig {
  let mut config = BankConfig::default()
    .with_tellers(args.tellers)
    .with_customers(args.customers)
    .with_door_capacity(args.door_capacity)
    .with_safe_capacity(args.safe_capacity)
    .with_manager_capacity(args.manager_capacity);
  if let Some(ms) = args.max_delay_ms {
    config = config.with_max_delay(Duration::from_millis(ms));
  }
  config
}

pub async fn run_day(args: RunArgs) -> Result<()> {
  let config = config_from(&args);
  let behavior = match args.seed {
    Some(seed) => RandomBehavior::seeded(seed),
    None => RandomBehavior::new(),
  };

  let file = match &args.log_file {
    Some(path) => Some(
      OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?,
    ),
    None => None,
  };

  let bank = Bank::new(config)?.with_behavior(behavior).with_output(Tee {
    stdout: io::stdout(),
    file,
  });
  tracing::info!(config = ?bank.config(), seed = ?args.seed, "Opening the bank");

  let report = bank.run().await?;
  tracing::info!(
    served = report.served,
    per_teller = ?report.teller_served,
    door_high_water = report.door.high_water,
    safe_high_water = report.safe.high_water,
    "Bank closed"
  );
  Ok(())
}
