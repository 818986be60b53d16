// src/config.rs

use std::time::Duration;

use crate::error::BankError;

pub const DEFAULT_TELLERS: usize = 3;
pub const DEFAULT_CUSTOMERS: usize = 5;
pub const DEFAULT_DOOR_CAPACITY: usize = 2;
pub const DEFAULT_SAFE_CAPACITY: usize = 2;
pub const DEFAULT_MANAGER_CAPACITY: usize = 1;
/// Upper bound applied to every think/service delay.
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_millis(250);

/// Population sizes and resource capacities for one simulated day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankConfig {
  pub tellers: usize,
  pub customers: usize,
  /// Customers allowed inside the bank at once.
  pub door_capacity: usize,
  /// Tellers allowed inside the safe at once.
  pub safe_capacity: usize,
  /// Tellers allowed with the manager at once. 1 makes it a mutex.
  pub manager_capacity: usize,
  pub max_delay: Duration,
}

impl Default for BankConfig {
  fn default() -> Self {
    Self {
      tellers: DEFAULT_TELLERS,
      customers: DEFAULT_CUSTOMERS,
      door_capacity: DEFAULT_DOOR_CAPACITY,
      safe_capacity: DEFAULT_SAFE_CAPACITY,
      manager_capacity: DEFAULT_MANAGER_CAPACITY,
      max_delay: DEFAULT_MAX_DELAY,
    }
  }
}

impl BankConfig {
  pub fn with_tellers(mut self, tellers: usize) -> Self {
    self.tellers = tellers;
    self
  }

  pub fn with_customers(mut self, customers: usize) -> Self {
    self.customers = customers;
    self
  }

  pub fn with_door_capacity(mut self, capacity: usize) -> Self {
    self.door_capacity = capacity;
    self
  }

  pub fn with_safe_capacity(mut self, capacity: usize) -> Self {
    self.safe_capacity = capacity;
    self
  }

  pub fn with_manager_capacity(mut self, capacity: usize) -> Self {
    self.manager_capacity = capacity;
    self
  }

  pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
    self.max_delay = max_delay;
    self
  }

  /// Rejects configurations that cannot run. Called before any actor exists.
  pub fn validate(&self) -> Result<(), BankError> {
    if self.tellers == 0 {
      return Err(BankError::InvalidConfig("at least one teller is required".into()));
    }
    for (name, value) in [
      ("door_capacity", self.door_capacity),
      ("safe_capacity", self.safe_capacity),
      ("manager_capacity", self.manager_capacity),
    ] {
      if value == 0 {
        return Err(BankError::InvalidConfig(format!("{} must be positive", name)));
      }
    }
    if self.max_delay.is_zero() {
      return Err(BankError::InvalidConfig("max_delay must be positive".into()));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_matches_the_classic_bank() {
    let cfg = BankConfig::default();
    assert_eq!(cfg.tellers, 3);
    assert_eq!(cfg.customers, 5);
    assert_eq!((cfg.door_capacity, cfg.safe_capacity, cfg.manager_capacity), (2, 2, 1));
    assert!(cfg.validate().is_ok());
  }

  #[test]
  fn zero_customers_is_a_valid_day() {
    assert!(BankConfig::default().with_customers(0).validate().is_ok());
  }

  #[test]
  fn rejects_non_positive_counts() {
    let err = BankConfig::default().with_tellers(0).validate().unwrap_err();
    assert!(err.is_config_error());

    let err = BankConfig::default().with_safe_capacity(0).validate().unwrap_err();
    assert!(matches!(err, BankError::InvalidConfig(ref msg) if msg.contains("safe_capacity")));

    assert!(BankConfig::default().with_door_capacity(0).validate().is_err());
    assert!(BankConfig::default().with_manager_capacity(0).validate().is_err());
    assert!(BankConfig::default().with_max_delay(Duration::ZERO).validate().is_err());
  }
}
