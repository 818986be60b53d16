// src/actor/customer.rs

use std::sync::Arc;

use crate::actor::{ActorOutcome, Lifecycle, Progress};
use crate::bank::Floor;
use crate::error::BankError;
use crate::runtime::transcript::{BankEvent, Resource};
use crate::types::{ActorRef, CustomerId};

/// Where a customer is in its visit. Strictly linear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CustomerState {
  Deciding,
  Arriving,
  AwaitingDoor,
  InLine,
  AwaitingAssignment,
  AwaitingTransactionRequest,
  Reporting,
  AwaitingCompletion,
  Departing,
  Done,
}

impl CustomerState {
  fn successor(self) -> Option<Self> {
    use CustomerState::*;
    match self {
      Deciding => Some(Arriving),
      Arriving => Some(AwaitingDoor),
      AwaitingDoor => Some(InLine),
      InLine => Some(AwaitingAssignment),
      AwaitingAssignment => Some(AwaitingTransactionRequest),
      AwaitingTransactionRequest => Some(Reporting),
      Reporting => Some(AwaitingCompletion),
      AwaitingCompletion => Some(Departing),
      Departing => Some(Done),
      Done => None,
    }
  }
}

impl Lifecycle for CustomerState {
  fn can_advance_to(self, next: Self) -> bool {
    self.successor() == Some(next)
  }
}

/// Drives one customer from arrival to departure.
pub(crate) struct CustomerActor {
  id: CustomerId,
  floor: Arc<Floor>,
  progress: Progress<CustomerState>,
}

impl CustomerActor {
  pub(crate) fn new(id: CustomerId, floor: Arc<Floor>) -> Self {
    Self {
      id,
      floor,
      progress: Progress::new(ActorRef::customer(id), CustomerState::Deciding),
    }
  }

  pub(crate) async fn run(mut self) -> Result<ActorOutcome, BankError> {
    let floor = Arc::clone(&self.floor);
    let me = ActorRef::customer(self.id);
    let record = floor.customers.get(self.id)?;
    let rendezvous = record.rendezvous();
    let kind = record.kind();
    let log = &floor.transcript;

    log.emit(me, None, BankEvent::WantsTransaction(kind));

    self.progress.advance(CustomerState::Arriving);
    floor.pause(floor.behavior.arrival_delay(self.id)).await;

    self.progress.advance(CustomerState::AwaitingDoor);
    log.emit(me, None, BankEvent::GoingTo(Resource::Door));
    let door = floor.door.acquire().await?;
    log.emit(me, None, BankEvent::Inside(Resource::Door));

    self.progress.advance(CustomerState::InLine);
    floor
      .line
      .join(self.id, |position| log.emit(me, None, BankEvent::JoinsLine { position }))?;

    self.progress.advance(CustomerState::AwaitingAssignment);
    rendezvous.wait_asked().await?;

    self.progress.advance(CustomerState::AwaitingTransactionRequest);
    let teller = record.assigned_teller().ok_or_else(|| {
      BankError::Internal(format!("customer {} was asked before being assigned", self.id))
    })?;
    let teller = ActorRef::teller(teller);
    log.emit(me, Some(teller), BankEvent::ApproachesTeller);

    self.progress.advance(CustomerState::Reporting);
    log.emit(me, Some(teller), BankEvent::AsksFor(kind));
    rendezvous.notify_reported(kind)?;

    self.progress.advance(CustomerState::AwaitingCompletion);
    rendezvous.wait_completed().await?;
    log.emit(me, Some(teller), BankEvent::LeavesTeller);

    self.progress.advance(CustomerState::Departing);
    log.emit(me, None, BankEvent::Leaving(Resource::Door));
    door.release();

    self.progress.advance(CustomerState::Done);
    tracing::debug!(customer = self.id.0, "Customer done");
    Ok(ActorOutcome::Departed(self.id))
  }
}
