// src/runtime/line.rs

//! The waiting line customers join and tellers pull from.

use std::collections::VecDeque;

use parking_lot::Mutex;
use tokio::sync::Semaphore;

use crate::error::BankError;
use crate::types::CustomerId;

#[derive(Debug)]
struct LineState {
  queue: VecDeque<CustomerId>,
  /// Indexed by customer id; set once a customer has joined.
  joined: Vec<bool>,
  /// Completed transactions. Lives under the same lock as the queue.
  served: usize,
}

/// FIFO of customers awaiting a teller, plus the readiness signal tellers sleep on.
///
/// The readiness semaphore holds one permit per queued customer and one per
/// shutdown wake. Permits for customers are added while the queue lock is
/// held, so a teller that obtained a permit always finds either a customer or
/// an intentionally empty line.
#[derive(Debug)]
pub struct WaitingLine {
  state: Mutex<LineState>,
  ready: Semaphore,
  capacity: usize,
}

impl WaitingLine {
  /// `capacity` is the whole customer population; the line never grows past it.
  pub fn new(capacity: usize) -> Self {
    Self {
      state: Mutex::new(LineState {
        queue: VecDeque::with_capacity(capacity),
        joined: vec![false; capacity],
        served: 0,
      }),
      ready: Semaphore::new(0),
      capacity,
    }
  }

  /// Appends `customer` and signals one waiting teller.
  ///
  /// `on_joined` runs inside the critical section with the customer's
  /// 0-based position, so anything it records is ordered exactly like the queue.
  /// Each customer joins at most once per day; ids outside the population are rejected.
  pub fn join(&self, customer: CustomerId, on_joined: impl FnOnce(usize)) -> Result<(), BankError> {
    let mut state = self.state.lock();
    let slot = state.joined.get_mut(customer.0).ok_or(BankError::UnknownCustomer {
      id: customer.0,
      population: self.capacity,
    })?;
    assert!(!*slot, "Customer {} joined the line twice", customer);
    *slot = true;
    state.queue.push_back(customer);
    on_joined(state.queue.len() - 1);
    self.ready.add_permits(1);
    tracing::trace!(customer = customer.0, queued = state.queue.len(), "Customer joined line");
    Ok(())
  }

  /// Removes the head of the line without blocking.
  pub fn pop_if_non_empty(&self) -> Option<CustomerId> {
    self.state.lock().queue.pop_front()
  }

  /// Blocks until a customer is queued or a shutdown wake arrives.
  ///
  /// Returns `None` for a shutdown wake.
  pub async fn next_customer(&self) -> Result<Option<CustomerId>, BankError> {
    let permit = self
      .ready
      .acquire()
      .await
      .map_err(|_| BankError::Internal("waiting line readiness signal closed".to_string()))?;
    // Each permit stands for one unit of work that this caller now owns.
    permit.forget();
    Ok(self.pop_if_non_empty())
  }

  /// Adds `count` permits that carry no customer. Tellers receiving one see an empty line.
  pub fn wake_tellers(&self, count: usize) {
    self.ready.add_permits(count);
  }

  /// Increments the served counter under the line lock and returns the new value.
  pub fn record_served(&self) -> usize {
    let mut state = self.state.lock();
    state.served += 1;
    state.served
  }

  pub fn served(&self) -> usize {
    self.state.lock().served
  }

  pub fn len(&self) -> usize {
    self.state.lock().queue.len()
  }

  pub fn is_empty(&self) -> bool {
    self.state.lock().queue.is_empty()
  }
}
