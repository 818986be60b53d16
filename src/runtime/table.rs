// src/runtime/table.rs

use once_cell::sync::OnceCell;

use crate::error::BankError;
use crate::runtime::rendezvous::Rendezvous;
use crate::types::{CustomerId, TellerId, TransactionKind};

/// Everything the bank keeps about one customer.
#[derive(Debug)]
pub struct CustomerRecord {
  /// Chosen at allocation, read only by the owning customer.
  kind: TransactionKind,
  /// Written once by the teller that dequeues the customer.
  assignment: OnceCell<TellerId>,
  rendezvous: Rendezvous,
}

impl CustomerRecord {
  fn new(kind: TransactionKind) -> Self {
    Self {
      kind,
      assignment: OnceCell::new(),
      rendezvous: Rendezvous::new(),
    }
  }

  pub fn kind(&self) -> TransactionKind {
    self.kind
  }

  pub fn rendezvous(&self) -> &Rendezvous {
    &self.rendezvous
  }

  /// Records which teller serves this customer. A second assignment is a protocol bug.
  pub fn assign(&self, teller: TellerId) {
    if self.assignment.set(teller).is_err() {
      panic!(
        "customer already assigned to teller {:?} (attempted teller {})",
        self.assignment.get(),
        teller
      );
    }
  }

  pub fn assigned_teller(&self) -> Option<TellerId> {
    self.assignment.get().copied()
  }
}

/// Fixed-size arena of customer records indexed by [`CustomerId`].
///
/// Allocated in one step before any actor starts and never resized.
#[derive(Debug)]
pub struct CustomerTable {
  records: Vec<CustomerRecord>,
}

impl CustomerTable {
  /// Builds one record per customer, asking `pick_kind` for each transaction.
  pub fn allocate(population: usize, mut pick_kind: impl FnMut(CustomerId) -> TransactionKind) -> Self {
    let records = (0..population)
      .map(|i| CustomerRecord::new(pick_kind(CustomerId(i))))
      .collect();
    Self { records }
  }

  pub fn get(&self, id: CustomerId) -> Result<&CustomerRecord, BankError> {
    self.records.get(id.0).ok_or(BankError::UnknownCustomer {
      id: id.0,
      population: self.records.len(),
    })
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  pub fn ids(&self) -> impl Iterator<Item = CustomerId> {
    (0..self.records.len()).map(CustomerId)
  }
}
