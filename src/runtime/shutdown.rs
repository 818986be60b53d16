// src/runtime/shutdown.rs

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::runtime::line::WaitingLine;

/// Counts completed transactions and releases the tellers once the quota is met.
///
/// The served counter itself lives under the waiting line's lock; this type
/// is its only mutator.
#[derive(Debug)]
pub struct ShutdownCoordinator {
  line: Arc<WaitingLine>,
  target: usize,
  tellers: usize,
  released: AtomicBool,
}

impl ShutdownCoordinator {
  pub fn new(line: Arc<WaitingLine>, target: usize, tellers: usize) -> Self {
    Self {
      line,
      target,
      tellers,
      released: AtomicBool::new(false),
    }
  }

  /// Records one completed transaction.
  ///
  /// Returns `true` for the single call that reaches the target; that call
  /// also injects one wake per teller into the readiness signal.
  pub fn record_served(&self) -> bool {
    let served = self.line.record_served();
    if served > self.target {
      panic!("served counter overshot: {} served, {} customers", served, self.target);
    }
    if served == self.target {
      tracing::debug!(served, tellers = self.tellers, "All customers served, waking tellers");
      self.release();
      return true;
    }
    false
  }

  /// Releases the tellers immediately when there is nobody to serve.
  pub fn release_if_idle(&self) {
    if self.target == 0 {
      tracing::debug!(tellers = self.tellers, "No customers today, waking tellers");
      self.release();
    }
  }

  fn release(&self) {
    if self
      .released
      .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
      .is_err()
    {
      panic!("shutdown wakes released twice");
    }
    self.line.wake_tellers(self.tellers);
  }

  pub fn is_complete(&self) -> bool {
    self.line.served() == self.target
  }

  pub fn served(&self) -> usize {
    self.line.served()
  }

  pub fn target(&self) -> usize {
    self.target
  }
}
