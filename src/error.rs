use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum BankError {
  // --- Configuration ---
  #[error("Invalid bank configuration: {0}")]
  InvalidConfig(String),

  // --- Shared Resources ---
  #[error("Customer {id} is outside the customer table (population {population})")]
  UnknownCustomer { id: usize, population: usize },

  // --- Rendezvous ---
  #[error("Rendezvous counterpart disappeared before signalling '{0}'")]
  PeerGone(&'static str),

  // --- Actor Lifecycle ---
  #[error("Actor panicked: {0}")]
  ActorPanicked(String),
  #[error("Actor was cancelled: {0}")]
  ActorCancelled(String),

  // --- Output ---
  #[error("I/O error: {0}")]
  Io(#[from] io::Error),

  #[error("Internal error: {0}")]
  Internal(String),
}

impl BankError {
  /// True for errors raised before any actor was spawned.
  pub fn is_config_error(&self) -> bool {
    matches!(self, BankError::InvalidConfig(_))
  }

  /// Maps a failed actor join into the error reported by the coordinator.
  pub(crate) fn from_join(err: tokio::task::JoinError) -> Self {
    if err.is_panic() {
      let payload = err.into_panic();
      let msg = if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
      } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
      } else {
        "non-string panic payload".to_string()
      };
      BankError::ActorPanicked(msg)
    } else {
      BankError::ActorCancelled(err.to_string())
    }
  }
}
