// src/runtime/gate.rs

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use crate::error::BankError;

#[derive(Debug)]
struct GateInner {
  name: &'static str,
  capacity: usize,
  semaphore: Arc<Semaphore>,
  // Live holder count, tracked separately from the semaphore so bounds can be checked.
  holders: AtomicUsize,
  high_water: AtomicUsize,
  acquisitions: AtomicUsize,
}

/// Counting admission control: at most `capacity` holders at once.
///
/// Blocked callers are not served in any particular order. Holding is
/// represented by a [`GatePermit`]; dropping or releasing the permit leaves
/// the gate, so a release can never happen without a matching acquire.
#[derive(Debug, Clone)]
pub struct CapacityGate {
  inner: Arc<GateInner>,
}

/// Point-in-time view of a gate's counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GateStats {
  pub capacity: usize,
  /// Largest number of simultaneous holders ever observed.
  pub high_water: usize,
  pub acquisitions: usize,
  /// Holders at the time of the snapshot.
  pub holders: usize,
}

impl CapacityGate {
  /// Creates a gate admitting `capacity` concurrent holders.
  ///
  /// Panics if `capacity` is zero; configurations are validated before gates are built.
  pub fn new(name: &'static str, capacity: usize) -> Self {
    assert!(capacity > 0, "CapacityGate '{}' needs a positive capacity", name);
    Self {
      inner: Arc::new(GateInner {
        name,
        capacity,
        semaphore: Arc::new(Semaphore::new(capacity)),
        holders: AtomicUsize::new(0),
        high_water: AtomicUsize::new(0),
        acquisitions: AtomicUsize::new(0),
      }),
    }
  }

  /// Single-holder gate.
  pub fn mutex(name: &'static str) -> Self {
    Self::new(name, 1)
  }

  /// Waits until fewer than `capacity` holders are inside, then enters.
  pub async fn acquire(&self) -> Result<GatePermit, BankError> {
    let permit = self
      .inner
      .semaphore
      .clone()
      .acquire_owned()
      .await
      .map_err(|_| BankError::Internal(format!("gate '{}' semaphore closed", self.inner.name)))?;
    self.enter();
    Ok(GatePermit {
      gate: self.inner.clone(),
      permit: Some(permit),
    })
  }

  fn enter(&self) {
    let now = self.inner.holders.fetch_add(1, Ordering::AcqRel) + 1;
    assert!(
      now <= self.inner.capacity,
      "CapacityGate '{}' admitted {} holders (capacity {})",
      self.inner.name,
      now,
      self.inner.capacity
    );
    self.inner.high_water.fetch_max(now, Ordering::AcqRel);
    self.inner.acquisitions.fetch_add(1, Ordering::Relaxed);
    tracing::trace!(gate = self.inner.name, holders = now, "Gate entered");
  }

  pub fn stats(&self) -> GateStats {
    GateStats {
      capacity: self.inner.capacity,
      high_water: self.inner.high_water.load(Ordering::Acquire),
      acquisitions: self.inner.acquisitions.load(Ordering::Relaxed),
      holders: self.inner.holders.load(Ordering::Acquire),
    }
  }
}

impl GateInner {
  fn leave(&self) {
    // The holder count must drop before the semaphore permit is returned,
    // otherwise a waiter could enter while the old holder is still counted.
    let prev = self.holders.fetch_sub(1, Ordering::AcqRel);
    if prev == 0 {
      self.holders.fetch_add(1, Ordering::Relaxed);
      panic!("CapacityGate '{}' released with no holders inside", self.name);
    }
    tracing::trace!(gate = self.name, holders = prev - 1, "Gate left");
  }
}

/// Proof of being inside a [`CapacityGate`]. Leaves the gate on drop.
#[derive(Debug)]
pub struct GatePermit {
  gate: Arc<GateInner>,
  permit: Option<OwnedSemaphorePermit>,
}

impl GatePermit {
  /// Leaves the gate explicitly.
  pub fn release(self) {
    drop(self);
  }

  pub fn gate_name(&self) -> &'static str {
    self.gate.name
  }
}

impl Drop for GatePermit {
  fn drop(&mut self) {
    if let Some(permit) = self.permit.take() {
      self.gate.leave();
      drop(permit);
    }
  }
}
