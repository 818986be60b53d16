// src/actor/mod.rs

//! Customer and teller state machines.

pub mod customer;
pub mod teller;

use std::fmt;

use crate::types::{ActorRef, CustomerId, TellerId};

pub use customer::CustomerState;
pub use teller::TellerState;

pub(crate) use customer::CustomerActor;
pub(crate) use teller::TellerActor;

/// What an actor task hands back to the coordinator when it finishes cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorOutcome {
  /// The customer left the bank.
  Departed(CustomerId),
  /// The teller went home after serving `served` customers.
  OffDuty { teller: TellerId, served: usize },
}

/// A state machine whose legal transitions are known up front.
pub trait Lifecycle: Copy + fmt::Debug + PartialEq {
  fn can_advance_to(self, next: Self) -> bool;
}

/// Tracks an actor's current state and rejects illegal transitions.
#[derive(Debug)]
pub(crate) struct Progress<S> {
  actor: ActorRef,
  state: S,
}

impl<S: Lifecycle> Progress<S> {
  pub(crate) fn new(actor: ActorRef, initial: S) -> Self {
    Self { actor, state: initial }
  }

  pub(crate) fn advance(&mut self, next: S) {
    assert!(
      self.state.can_advance_to(next),
      "{} cannot move from {:?} to {:?}",
      self.actor,
      self.state,
      next
    );
    tracing::trace!(actor = %self.actor, from = ?self.state, to = ?next, "State transition");
    self.state = next;
  }
}
