// tests/actor_failure.rs

use bankline::{BankConfig, BankError, Behavior, CustomerId, ScriptedBehavior, TellerId, TransactionKind};
use std::time::Duration;
mod common;

/// Scripted behavior where chosen actors panic part-way through the day.
#[derive(Debug)]
struct FaultyBehavior {
  script: ScriptedBehavior,
  broken_customer: Option<CustomerId>,
  broken_safe: bool,
  arrival: Duration,
}

impl FaultyBehavior {
  fn new() -> Self {
    Self {
      script: ScriptedBehavior::new(),
      broken_customer: None,
      broken_safe: false,
      arrival: Duration::ZERO,
    }
  }
}

impl Behavior for FaultyBehavior {
  fn transaction(&self, customer: CustomerId) -> TransactionKind {
    self.script.transaction(customer)
  }

  fn arrival_delay(&self, customer: CustomerId) -> Duration {
    if self.broken_customer == Some(customer) {
      panic!("customer {} tripped on the way in", customer);
    }
    self.arrival
  }

  fn manager_delay(&self, teller: TellerId) -> Duration {
    self.script.manager_delay(teller)
  }

  fn safe_delay(&self, teller: TellerId) -> Duration {
    if self.broken_safe {
      panic!("teller {} jammed the safe", teller);
    }
    self.script.safe_delay(teller)
  }
}

// --- Test: a panicking customer halts the bank instead of hanging it ---
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_customer_panic_aborts_the_day() {
  // Everyone else would dawdle far longer than the test timeout, so the run
  // only returns in time if the remaining actors are aborted.
  let behavior = FaultyBehavior {
    broken_customer: Some(CustomerId(2)),
    arrival: Duration::from_secs(30),
    ..FaultyBehavior::new()
  };
  let config = BankConfig::default().with_max_delay(Duration::from_secs(60));

  let err = common::run_day(config, behavior).await.unwrap_err();
  match err {
    BankError::ActorPanicked(msg) => assert_eq!(msg, "customer 2 tripped on the way in"),
    other => panic!("expected ActorPanicked, got {:?}", other),
  }
}

// --- Test: a panicking teller releases customers blocked on the rendezvous ---
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_teller_panic_aborts_waiting_customers() {
  let behavior = FaultyBehavior {
    broken_safe: true,
    ..FaultyBehavior::new()
  };
  let config = BankConfig::default().with_tellers(2).with_customers(6);

  let err = common::run_day(config, behavior).await.unwrap_err();
  assert!(!err.is_config_error());
  match err {
    BankError::ActorPanicked(msg) => assert!(msg.contains("jammed the safe"), "unexpected message: {}", msg),
    other => panic!("expected ActorPanicked, got {:?}", other),
  }
}

// --- Test: a healthy run is unaffected by the fault hooks ---
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_faultless_behavior_completes() -> Result<(), BankError> {
  let report = common::run_day(BankConfig::default(), FaultyBehavior::new()).await?;
  assert_eq!(report.served, 5);
  Ok(())
}
