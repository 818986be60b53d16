// src/actor/teller.rs

use std::sync::Arc;

use crate::actor::{ActorOutcome, Lifecycle, Progress};
use crate::bank::Floor;
use crate::error::BankError;
use crate::runtime::transcript::{BankEvent, Resource};
use crate::types::{ActorRef, TellerId};

/// Where a teller is in its working day.
///
/// ```text
/// Starting -> WaitingForCustomer -> Assigning -> RequestingTransaction
///   -> [ManagerApproval] -> SafeAccess -> Finishing -> WaitingForCustomer ...
/// WaitingForCustomer -> Terminating
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TellerState {
  Starting,
  WaitingForCustomer,
  Assigning,
  RequestingTransaction,
  ManagerApproval,
  SafeAccess,
  Finishing,
  Terminating,
}

impl Lifecycle for TellerState {
  fn can_advance_to(self, next: Self) -> bool {
    use TellerState::*;
    matches!(
      (self, next),
      (Starting, WaitingForCustomer)
        | (WaitingForCustomer, Assigning)
        | (WaitingForCustomer, Terminating)
        | (Assigning, RequestingTransaction)
        | (RequestingTransaction, ManagerApproval)
        | (RequestingTransaction, SafeAccess)
        | (ManagerApproval, SafeAccess)
        | (SafeAccess, Finishing)
        | (Finishing, WaitingForCustomer)
    )
  }
}

/// Drives one teller until the day's quota of customers has been served.
pub(crate) struct TellerActor {
  id: TellerId,
  floor: Arc<Floor>,
  progress: Progress<TellerState>,
  served: usize,
}

impl TellerActor {
  pub(crate) fn new(id: TellerId, floor: Arc<Floor>) -> Self {
    Self {
      id,
      floor,
      progress: Progress::new(ActorRef::teller(id), TellerState::Starting),
      served: 0,
    }
  }

  pub(crate) async fn run(mut self) -> Result<ActorOutcome, BankError> {
    let floor = Arc::clone(&self.floor);
    let me = ActorRef::teller(self.id);
    let log = &floor.transcript;

    log.emit(me, None, BankEvent::ReadyToServe);

    loop {
      self.progress.advance(TellerState::WaitingForCustomer);
      log.emit(me, None, BankEvent::WaitingForCustomer);
      let customer = match floor.line.next_customer().await? {
        Some(customer) => customer,
        None => break,
      };

      self.progress.advance(TellerState::Assigning);
      let record = floor.customers.get(customer)?;
      let rendezvous = record.rendezvous();
      let them = ActorRef::customer(customer);
      record.assign(self.id);
      log.emit(me, Some(them), BankEvent::ServesCustomer);
      log.emit(me, Some(them), BankEvent::AsksForTransaction);
      rendezvous.notify_asked()?;

      self.progress.advance(TellerState::RequestingTransaction);
      let kind = rendezvous.wait_reported().await?;
      log.emit(me, Some(them), BankEvent::Handles(kind));

      if kind.needs_manager() {
        self.progress.advance(TellerState::ManagerApproval);
        self.visit_manager(&floor).await?;
      }

      self.progress.advance(TellerState::SafeAccess);
      self.visit_safe(&floor, them).await?;

      self.progress.advance(TellerState::Finishing);
      log.emit(me, Some(them), BankEvent::TransactionComplete(kind));
      rendezvous.notify_completed()?;
      self.served += 1;
      floor.shutdown.record_served();
    }

    // An empty line after a wake is only legitimate once everyone has been served.
    if !floor.shutdown.is_complete() {
      panic!(
        "teller {} found an empty line with {}/{} customers served",
        self.id,
        floor.shutdown.served(),
        floor.shutdown.target()
      );
    }

    self.progress.advance(TellerState::Terminating);
    log.emit(me, None, BankEvent::LeavingForTheDay);
    tracing::debug!(teller = self.id.0, served = self.served, "Teller off duty");
    Ok(ActorOutcome::OffDuty {
      teller: self.id,
      served: self.served,
    })
  }

  async fn visit_manager(&self, floor: &Floor) -> Result<(), BankError> {
    let me = ActorRef::teller(self.id);
    let manager = ActorRef::manager();
    let log = &floor.transcript;

    log.emit(me, Some(manager), BankEvent::GoingTo(Resource::Manager));
    let permit = floor.manager.acquire().await?;
    log.emit(me, Some(manager), BankEvent::Inside(Resource::Manager));
    log.emit(manager, Some(me), BankEvent::GrantsPermission);
    floor.pause(floor.behavior.manager_delay(self.id)).await;
    log.emit(me, Some(manager), BankEvent::Leaving(Resource::Manager));
    permit.release();
    Ok(())
  }

  async fn visit_safe(&self, floor: &Floor, customer: ActorRef) -> Result<(), BankError> {
    let me = ActorRef::teller(self.id);
    let log = &floor.transcript;

    log.emit(me, Some(customer), BankEvent::GoingTo(Resource::Safe));
    let permit = floor.safe.acquire().await?;
    log.emit(me, Some(customer), BankEvent::Inside(Resource::Safe));
    floor.pause(floor.behavior.safe_delay(self.id)).await;
    log.emit(me, Some(customer), BankEvent::Leaving(Resource::Safe));
    permit.release();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use TellerState::*;

  #[test]
  fn deposits_skip_the_manager() {
    assert!(RequestingTransaction.can_advance_to(SafeAccess));
    assert!(RequestingTransaction.can_advance_to(ManagerApproval));
    assert!(ManagerApproval.can_advance_to(SafeAccess));
  }

  #[test]
  fn manager_comes_before_the_safe() {
    assert!(!SafeAccess.can_advance_to(ManagerApproval));
    assert!(!ManagerApproval.can_advance_to(Finishing));
  }

  #[test]
  fn teller_only_terminates_while_waiting() {
    assert!(WaitingForCustomer.can_advance_to(Terminating));
    for state in [Starting, Assigning, RequestingTransaction, ManagerApproval, SafeAccess, Finishing] {
      assert!(!state.can_advance_to(Terminating), "{:?} must not terminate", state);
    }
    assert!(!Terminating.can_advance_to(WaitingForCustomer));
  }

  #[test]
  fn finishing_loops_back() {
    assert!(Finishing.can_advance_to(WaitingForCustomer));
    assert!(!Finishing.can_advance_to(Assigning));
  }
}
