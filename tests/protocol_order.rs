// tests/protocol_order.rs

use bankline::{
  ActorRef, ActorType, BankConfig, BankError, BankEvent, CustomerId, LogLine, Resource, ScriptedBehavior, TellerId,
  TransactionKind,
};
use std::time::Duration;
mod common;

fn mixed() -> ScriptedBehavior {
  ScriptedBehavior::new()
    .with_kinds(vec![
      TransactionKind::Withdrawal,
      TransactionKind::Deposit,
      TransactionKind::Withdrawal,
    ])
    .with_manager(Duration::from_millis(1))
    .with_safe(Duration::from_millis(2))
}

/// Strips the queue position so customer sequences can be compared.
fn normalized(event: &BankEvent) -> BankEvent {
  match event {
    BankEvent::JoinsLine { .. } => BankEvent::JoinsLine { position: 0 },
    other => other.clone(),
  }
}

// --- Test: a customer leaves only after its teller completed the transaction ---
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_departure_follows_completion() -> Result<(), BankError> {
  let report = common::run_day(BankConfig::default().with_customers(9), mixed()).await?;
  let lines = &report.transcript;

  for c in 0..9 {
    let customer = ActorRef::customer(CustomerId(c));
    let left = common::position(lines, |l| common::is(l, customer, &BankEvent::Leaving(Resource::Door)))
      .expect("customer never left");
    let completed = common::position(lines, |l| {
      l.actor.actor_type == ActorType::Teller
        && l.related == Some(customer)
        && matches!(l.event, BankEvent::TransactionComplete(_))
    })
    .expect("transaction never completed");
    assert!(completed < left, "customer {} left before its transaction completed", c);

    // The teller that completed it is the one the customer talked to.
    let teller = lines[completed].actor;
    let asked = common::position(lines, |l| l.actor == customer && matches!(l.event, BankEvent::AsksFor(_)))
      .expect("customer never reported");
    assert_eq!(lines[asked].related, Some(teller));
    assert!(asked < completed);
  }
  Ok(())
}

// --- Test: each customer walks through its states in order ---
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_customer_event_sequence() -> Result<(), BankError> {
  let behavior = mixed();
  let report = common::run_day(BankConfig::default().with_customers(6), behavior.clone()).await?;

  for c in 0..6 {
    let kind = if c % 3 == 1 {
      TransactionKind::Deposit
    } else {
      TransactionKind::Withdrawal
    };
    let events: Vec<_> = report
      .lines_of(ActorRef::customer(CustomerId(c)))
      .map(|line| normalized(&line.event))
      .collect();
    assert_eq!(
      events,
      vec![
        BankEvent::WantsTransaction(kind),
        BankEvent::GoingTo(Resource::Door),
        BankEvent::Inside(Resource::Door),
        BankEvent::JoinsLine { position: 0 },
        BankEvent::ApproachesTeller,
        BankEvent::AsksFor(kind),
        BankEvent::LeavesTeller,
        BankEvent::Leaving(Resource::Door),
      ],
      "customer {}",
      c
    );
  }
  Ok(())
}

/// Checks one teller's lines against its state machine and returns how many customers it served.
fn check_teller_lines(lines: &[&LogLine]) -> usize {
  let events: Vec<BankEvent> = lines.iter().map(|l| l.event.clone()).collect();
  assert_eq!(events.first(), Some(&BankEvent::ReadyToServe));
  assert_eq!(events.last(), Some(&BankEvent::LeavingForTheDay));
  assert_eq!(events[events.len() - 2], BankEvent::WaitingForCustomer);

  let mut served = 0;
  let mut i = 1;
  while events[i] == BankEvent::WaitingForCustomer && events[i + 1] != BankEvent::LeavingForTheDay {
    assert_eq!(events[i + 1], BankEvent::ServesCustomer);
    assert_eq!(events[i + 2], BankEvent::AsksForTransaction);
    let kind = match events[i + 3] {
      BankEvent::Handles(kind) => kind,
      ref other => panic!("expected Handles, got {:?}", other),
    };
    i += 4;
    if kind == TransactionKind::Withdrawal {
      assert_eq!(events[i], BankEvent::GoingTo(Resource::Manager));
      assert_eq!(events[i + 1], BankEvent::Inside(Resource::Manager));
      assert_eq!(events[i + 2], BankEvent::Leaving(Resource::Manager));
      i += 3;
    }
    assert_eq!(events[i], BankEvent::GoingTo(Resource::Safe));
    assert_eq!(events[i + 1], BankEvent::Inside(Resource::Safe));
    assert_eq!(events[i + 2], BankEvent::Leaving(Resource::Safe));
    assert_eq!(events[i + 3], BankEvent::TransactionComplete(kind));
    i += 4;
    served += 1;
  }
  assert_eq!(i, events.len() - 2, "unexpected teller lines: {:?}", &events[i..]);

  // A teller serves one customer at a time: every serviced line names the current customer.
  let mut current = None;
  for line in lines {
    match line.event {
      BankEvent::ServesCustomer => current = line.related,
      BankEvent::GoingTo(Resource::Safe) | BankEvent::TransactionComplete(_) => assert_eq!(line.related, current),
      _ => {}
    }
  }
  served
}

// --- Test: each teller follows its state machine, manager only for withdrawals ---
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_teller_event_sequence() -> Result<(), BankError> {
  let report = common::run_day(BankConfig::default().with_customers(10), mixed()).await?;

  let mut total = 0;
  for t in 0..3 {
    let lines: Vec<_> = report.lines_of(ActorRef::teller(TellerId(t))).collect();
    let served = check_teller_lines(&lines);
    assert_eq!(served, report.teller_served[t]);
    total += served;
  }
  assert_eq!(total, 10);

  // The manager grants exactly one permission per withdrawal and never to two tellers at once.
  let withdrawals = (0..10).filter(|c| c % 3 != 1).count();
  let grants = report
    .lines_of(ActorRef::manager())
    .filter(|l| l.event == BankEvent::GrantsPermission)
    .count();
  assert_eq!(grants, withdrawals);
  assert_eq!(report.manager.acquisitions, withdrawals);
  assert_eq!(common::max_inside(&report.transcript, Resource::Manager), 1);
  Ok(())
}

// --- Test: with one teller the line is served strictly in arrival order ---
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_single_teller_serves_in_join_order() -> Result<(), BankError> {
  let config = BankConfig::default()
    .with_tellers(1)
    .with_customers(8)
    .with_door_capacity(4);
  let report = common::run_day(config, mixed()).await?;

  let joined = common::join_order(&report.transcript);
  let served = common::service_order(&report.transcript);
  assert_eq!(joined.len(), 8);
  assert_eq!(joined, served);

  // Positions reported when joining are consistent with a FIFO of the same length.
  for line in &report.transcript {
    if let BankEvent::JoinsLine { position } = line.event {
      assert!(position < 4, "more customers queued than the door admits");
    }
  }
  Ok(())
}
