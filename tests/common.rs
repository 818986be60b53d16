// tests/common.rs
#![allow(dead_code)] // Each test binary uses a different subset of helpers

use bankline::{
  ActorRef, ActorType, Bank, BankConfig, BankError, BankEvent, BankReport, Behavior, CustomerId, LogLine, Resource,
};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use std::collections::HashMap;
use std::sync::Once;
use std::time::Duration;

use tokio::time::timeout;

/// Upper bound for a whole simulated day in tests. A deadlock shows up as this timeout.
pub const DAY_TIMEOUT: Duration = Duration::from_secs(10);

static TRACING_INIT: Once = Once::new();

fn setup_tracing() {
  TRACING_INIT.call_once(|| {
    // Can be overridden by RUST_LOG env variable
    let default_filter = "bankline=info,warn";
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let subscriber = FmtSubscriber::builder()
      .with_env_filter(env_filter)
      .with_target(true)
      .with_line_number(true)
      .with_test_writer()
      .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set global tracing subscriber");
  });
}

/// Runs one day with `behavior`, failing the test if it does not finish within `DAY_TIMEOUT`.
pub async fn run_day(config: BankConfig, behavior: impl Behavior + 'static) -> Result<BankReport, BankError> {
  setup_tracing();
  let bank = Bank::new(config)?.with_behavior(behavior);
  match timeout(DAY_TIMEOUT, bank.run()).await {
    Ok(result) => result,
    Err(_) => panic!("bank did not close within {:?}; actors are deadlocked", DAY_TIMEOUT),
  }
}

/// Index of the first line matching `pred`.
pub fn position(lines: &[LogLine], pred: impl Fn(&LogLine) -> bool) -> Option<usize> {
  lines.iter().position(pred)
}

pub fn is(line: &LogLine, actor: ActorRef, event: &BankEvent) -> bool {
  line.actor == actor && &line.event == event
}

/// Replays going/inside/leaving lines and returns the largest number of
/// actors simultaneously inside `resource`.
///
/// "inside" is logged after acquiring and "leaving" before releasing, so this
/// never exceeds the real number of holders.
pub fn max_inside(lines: &[LogLine], resource: Resource) -> usize {
  let mut inside = 0usize;
  let mut max = 0usize;
  for line in lines {
    match &line.event {
      BankEvent::Inside(r) if *r == resource => {
        inside += 1;
        max = max.max(inside);
      }
      BankEvent::Leaving(r) if *r == resource => {
        inside = inside.checked_sub(1).expect("left a resource nobody was inside");
      }
      _ => {}
    }
  }
  assert_eq!(inside, 0, "{:?} still occupied at the end of the day", resource);
  max
}

/// Counts lines per actor type whose event equals `event`.
pub fn count_events(lines: &[LogLine], actor_type: ActorType, event: &BankEvent) -> HashMap<usize, usize> {
  let mut counts = HashMap::new();
  for line in lines {
    if line.actor.actor_type == actor_type && &line.event == event {
      *counts.entry(line.actor.id).or_insert(0) += 1;
    }
  }
  counts
}

/// Customers in the order tellers started serving them.
pub fn service_order(lines: &[LogLine]) -> Vec<CustomerId> {
  lines
    .iter()
    .filter(|line| line.event == BankEvent::ServesCustomer)
    .filter_map(|line| line.related.map(|r| CustomerId(r.id)))
    .collect()
}

/// Customers in the order they joined the line.
pub fn join_order(lines: &[LogLine]) -> Vec<CustomerId> {
  lines
    .iter()
    .filter(|line| matches!(line.event, BankEvent::JoinsLine { .. }))
    .map(|line| CustomerId(line.actor.id))
    .collect()
}
