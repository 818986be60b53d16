// src/behavior.rs

//! Where transaction choices and think/service times come from.

use std::fmt;
use std::ops::RangeInclusive;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::types::{CustomerId, TellerId, TransactionKind};

/// Source of every random decision in a simulated day.
pub trait Behavior: Send + Sync + fmt::Debug {
  /// Called once per customer when the customer table is allocated.
  fn transaction(&self, customer: CustomerId) -> TransactionKind;
  /// Time a customer spends before walking to the door.
  fn arrival_delay(&self, customer: CustomerId) -> Duration;
  /// Time a teller spends with the manager.
  fn manager_delay(&self, teller: TellerId) -> Duration;
  /// Time a teller spends inside the safe.
  fn safe_delay(&self, teller: TellerId) -> Duration;
}

/// Uniformly random choices, optionally from a fixed seed.
pub struct RandomBehavior {
  rng: Mutex<StdRng>,
  arrival_ms: RangeInclusive<u64>,
  manager_ms: RangeInclusive<u64>,
  safe_ms: RangeInclusive<u64>,
}

impl RandomBehavior {
  pub fn new() -> Self {
    Self::from_rng(StdRng::from_os_rng())
  }

  /// Same seed, same choices (though not the same interleaving).
  pub fn seeded(seed: u64) -> Self {
    Self::from_rng(StdRng::seed_from_u64(seed))
  }

  fn from_rng(rng: StdRng) -> Self {
    Self {
      rng: Mutex::new(rng),
      arrival_ms: 0..=100,
      manager_ms: 5..=30,
      safe_ms: 10..=50,
    }
  }

  fn millis(&self, range: &RangeInclusive<u64>) -> Duration {
    Duration::from_millis(self.rng.lock().random_range(range.clone()))
  }
}

impl Default for RandomBehavior {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for RandomBehavior {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("RandomBehavior")
      .field("arrival_ms", &self.arrival_ms)
      .field("manager_ms", &self.manager_ms)
      .field("safe_ms", &self.safe_ms)
      .finish_non_exhaustive()
  }
}

impl Behavior for RandomBehavior {
  fn transaction(&self, _customer: CustomerId) -> TransactionKind {
    if self.rng.lock().random_bool(0.5) {
      TransactionKind::Deposit
    } else {
      TransactionKind::Withdrawal
    }
  }

  fn arrival_delay(&self, _customer: CustomerId) -> Duration {
    self.millis(&self.arrival_ms)
  }

  fn manager_delay(&self, _teller: TellerId) -> Duration {
    self.millis(&self.manager_ms)
  }

  fn safe_delay(&self, _teller: TellerId) -> Duration {
    self.millis(&self.safe_ms)
  }
}

/// Deterministic behavior: transaction kinds cycle through a fixed list and
/// every delay is constant.
#[derive(Debug, Clone)]
pub struct ScriptedBehavior {
  kinds: Vec<TransactionKind>,
  arrival: Duration,
  manager: Duration,
  safe: Duration,
}

impl ScriptedBehavior {
  /// Alternates deposit / withdrawal by customer id with no delays.
  pub fn new() -> Self {
    Self {
      kinds: vec![TransactionKind::Deposit, TransactionKind::Withdrawal],
      arrival: Duration::ZERO,
      manager: Duration::ZERO,
      safe: Duration::ZERO,
    }
  }

  /// Every customer wants `kind`.
  pub fn all(kind: TransactionKind) -> Self {
    Self::new().with_kinds(vec![kind])
  }

  /// Customer `i` wants `kinds[i % kinds.len()]`. An empty list means all deposits.
  pub fn with_kinds(mut self, kinds: Vec<TransactionKind>) -> Self {
    self.kinds = if kinds.is_empty() {
      vec![TransactionKind::Deposit]
    } else {
      kinds
    };
    self
  }

  pub fn with_arrival(mut self, delay: Duration) -> Self {
    self.arrival = delay;
    self
  }

  pub fn with_manager(mut self, delay: Duration) -> Self {
    self.manager = delay;
    self
  }

  pub fn with_safe(mut self, delay: Duration) -> Self {
    self.safe = delay;
    self
  }
}

impl Default for ScriptedBehavior {
  fn default() -> Self {
    Self::new()
  }
}

impl Behavior for ScriptedBehavior {
  fn transaction(&self, customer: CustomerId) -> TransactionKind {
    self.kinds[customer.0 % self.kinds.len()]
  }

  fn arrival_delay(&self, _customer: CustomerId) -> Duration {
    self.arrival
  }

  fn manager_delay(&self, _teller: TellerId) -> Duration {
    self.manager
  }

  fn safe_delay(&self, _teller: TellerId) -> Duration {
    self.safe
  }
}
