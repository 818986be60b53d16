// src/types.rs

//! Identifiers and small value types shared by every actor.

use std::fmt;

/// Dense index of a customer, `0..customers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CustomerId(pub usize);

/// Dense index of a teller, `0..tellers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TellerId(pub usize);

impl fmt::Display for CustomerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl fmt::Display for TellerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// What a customer came to do. Only withdrawals involve the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransactionKind {
  Deposit,
  Withdrawal,
}

impl TransactionKind {
  pub fn needs_manager(self) -> bool {
    matches!(self, TransactionKind::Withdrawal)
  }
}

impl fmt::Display for TransactionKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      TransactionKind::Deposit => f.write_str("deposit"),
      TransactionKind::Withdrawal => f.write_str("withdrawal"),
    }
  }
}

/// Kinds of participants that appear in the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActorType {
  Customer,
  Teller,
  Manager,
  Bank,
}

impl fmt::Display for ActorType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      ActorType::Customer => "Customer",
      ActorType::Teller => "Teller",
      ActorType::Manager => "Manager",
      ActorType::Bank => "Bank",
    };
    f.write_str(name)
  }
}

/// An actor as it is named in the transcript, e.g. `Teller 2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorRef {
  pub actor_type: ActorType,
  pub id: usize,
}

impl ActorRef {
  pub fn customer(id: CustomerId) -> Self {
    Self { actor_type: ActorType::Customer, id: id.0 }
  }

  pub fn teller(id: TellerId) -> Self {
    Self { actor_type: ActorType::Teller, id: id.0 }
  }

  /// There is a single manager; it is always `Manager 0`.
  pub fn manager() -> Self {
    Self { actor_type: ActorType::Manager, id: 0 }
  }

  pub fn bank() -> Self {
    Self { actor_type: ActorType::Bank, id: 0 }
  }
}

impl fmt::Display for ActorRef {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{} {}", self.actor_type, self.id)
  }
}
