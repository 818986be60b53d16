// src/runtime/rendezvous.rs

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::error::BankError;
use crate::types::TransactionKind;

/// A single-use, single-producer/single-consumer signal.
///
/// Both ends live in one shareable value. Each end is wrapped in an `Option`
/// so it can be `take()`-n exactly once; a second notify or a second wait is a
/// protocol bug and panics.
#[derive(Debug)]
pub struct OneShotSignal<T> {
  name: &'static str,
  tx: Mutex<Option<oneshot::Sender<T>>>,
  rx: Mutex<Option<oneshot::Receiver<T>>>,
}

impl<T> OneShotSignal<T> {
  pub fn new(name: &'static str) -> Self {
    let (tx, rx) = oneshot::channel();
    Self {
      name,
      tx: Mutex::new(Some(tx)),
      rx: Mutex::new(Some(rx)),
    }
  }

  /// Delivers `value` to the waiter.
  ///
  /// Fails with `PeerGone` if the waiting side has been dropped.
  pub fn notify(&self, value: T) -> Result<(), BankError> {
    let sender = self
      .tx
      .lock()
      .take()
      .unwrap_or_else(|| panic!("one-shot signal '{}' notified twice", self.name));
    sender.send(value).map_err(|_| BankError::PeerGone(self.name))
  }

  /// Waits for the value. Fails with `PeerGone` if the notifier vanished without sending.
  pub async fn wait(&self) -> Result<T, BankError> {
    let receiver = self
      .rx
      .lock()
      .take()
      .unwrap_or_else(|| panic!("one-shot signal '{}' waited on twice", self.name));
    receiver.await.map_err(|_| BankError::PeerGone(self.name))
  }

  pub fn is_notified(&self) -> bool {
    self.tx.lock().is_none()
  }

  /// Drops the sending end unsent, so the waiter observes `PeerGone`.
  pub fn abandon(&self) {
    self.tx.lock().take();
  }
}

/// The private channel between one customer and whichever teller serves it.
///
/// Owned by the customer's record; written only by the assigned teller,
/// except `reported`, which the customer fills in.
#[derive(Debug)]
pub struct Rendezvous {
  /// Teller to customer: "tell me your transaction".
  asked: OneShotSignal<()>,
  /// Customer to teller: the transaction the customer wants.
  reported: OneShotSignal<TransactionKind>,
  /// Teller to customer: "transaction done".
  completed: OneShotSignal<()>,
}

impl Rendezvous {
  pub fn new() -> Self {
    Self {
      asked: OneShotSignal::new("asked"),
      reported: OneShotSignal::new("reported"),
      completed: OneShotSignal::new("completed"),
    }
  }

  pub fn notify_asked(&self) -> Result<(), BankError> {
    self.asked.notify(())
  }

  pub async fn wait_asked(&self) -> Result<(), BankError> {
    self.asked.wait().await
  }

  pub fn notify_reported(&self, kind: TransactionKind) -> Result<(), BankError> {
    self.reported.notify(kind)
  }

  pub async fn wait_reported(&self) -> Result<TransactionKind, BankError> {
    self.reported.wait().await
  }

  pub fn notify_completed(&self) -> Result<(), BankError> {
    self.completed.notify(())
  }

  pub async fn wait_completed(&self) -> Result<(), BankError> {
    self.completed.wait().await
  }

  /// True once all three signals have been sent.
  pub fn is_finished(&self) -> bool {
    self.asked.is_notified() && self.reported.is_notified() && self.completed.is_notified()
  }
}

impl Default for Rendezvous {
  fn default() -> Self {
    Self::new()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::Arc;
  use std::time::Duration;
  use tokio::time::timeout;
  use tokio_test::{assert_pending, assert_ready, task};

  #[tokio::test]
  async fn test_signal_delivers_once() {
    let signal = OneShotSignal::new("test");
    let mut waiter = task::spawn(signal.wait());
    assert_pending!(waiter.poll());

    signal.notify(7u32).unwrap();
    assert!(waiter.is_woken());
    assert_eq!(assert_ready!(waiter.poll()).unwrap(), 7);
  }

  #[tokio::test]
  async fn test_notify_before_wait_is_not_lost() {
    let signal = OneShotSignal::new("early");
    signal.notify(()).unwrap();
    assert!(signal.is_notified());
    timeout(Duration::from_millis(50), signal.wait())
      .await
      .expect("early notify was lost")
      .unwrap();
  }

  #[test]
  #[should_panic(expected = "notified twice")]
  fn test_double_notify_panics() {
    let signal = OneShotSignal::new("twice");
    let _ = signal.notify(());
    let _ = signal.notify(());
  }

  #[tokio::test]
  #[should_panic(expected = "waited on twice")]
  async fn test_double_wait_panics() {
    let signal = OneShotSignal::new("twice");
    signal.notify(()).unwrap();
    signal.wait().await.unwrap();
    let _ = signal.wait().await;
  }

  #[tokio::test]
  async fn test_abandoned_signal_reports_peer_gone() {
    let signal: OneShotSignal<()> = OneShotSignal::new("completed");
    signal.abandon();
    let err = signal.wait().await.unwrap_err();
    assert!(matches!(err, BankError::PeerGone("completed")));
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
  async fn test_rendezvous_handshake() {
    let rv = Arc::new(Rendezvous::new());

    let teller_side = rv.clone();
    let teller = tokio::spawn(async move {
      teller_side.notify_asked().unwrap();
      let kind = teller_side.wait_reported().await.unwrap();
      teller_side.notify_completed().unwrap();
      kind
    });

    rv.wait_asked().await.unwrap();
    rv.notify_reported(TransactionKind::Withdrawal).unwrap();
    rv.wait_completed().await.unwrap();

    assert_eq!(teller.await.unwrap(), TransactionKind::Withdrawal);
    assert!(rv.is_finished());
  }
}
