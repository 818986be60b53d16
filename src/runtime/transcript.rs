// src/runtime/transcript.rs

//! The observable output of a simulated day.
//!
//! Actors publish [`LogLine`]s through a [`TranscriptSender`]. A single
//! collector task drains the channel, so the order lines are received in is
//! the order of the transcript. The collector can mirror each line to an
//! `io::Write` sink in the wire format:
//!
//! ```text
//! Teller 1 [Customer 4]: asks for transaction
//! Customer 4 []: leaves the bank
//! ```

use std::fmt;
use std::io::Write;

use futures::executor::block_on;
use tokio::task::JoinHandle;

use crate::error::BankError;
use crate::types::{ActorRef, TransactionKind};

/// Shared resources whose use is framed by going / inside / leaving lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
  Door,
  Safe,
  Manager,
}

/// Every observable transition in the bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankEvent {
  // --- Customer ---
  WantsTransaction(TransactionKind),
  JoinsLine { position: usize },
  ApproachesTeller,
  AsksFor(TransactionKind),
  LeavesTeller,

  // --- Teller ---
  ReadyToServe,
  WaitingForCustomer,
  ServesCustomer,
  AsksForTransaction,
  Handles(TransactionKind),
  TransactionComplete(TransactionKind),
  LeavingForTheDay,

  // --- Manager ---
  GrantsPermission,

  // --- Shared resources ---
  GoingTo(Resource),
  Inside(Resource),
  Leaving(Resource),

  // --- Bank ---
  Closed,
}

impl fmt::Display for BankEvent {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      BankEvent::WantsTransaction(kind) => write!(f, "wants to perform a {}", kind),
      BankEvent::JoinsLine { position } => write!(f, "getting in line (position {})", position),
      BankEvent::ApproachesTeller => f.write_str("approaches teller"),
      BankEvent::AsksFor(kind) => write!(f, "asks for a {} transaction", kind),
      BankEvent::LeavesTeller => f.write_str("leaves teller"),
      BankEvent::ReadyToServe => f.write_str("ready to serve"),
      BankEvent::WaitingForCustomer => f.write_str("waiting for a customer"),
      BankEvent::ServesCustomer => f.write_str("serving a customer"),
      BankEvent::AsksForTransaction => f.write_str("asks for transaction"),
      BankEvent::Handles(kind) => write!(f, "handling {} transaction", kind),
      BankEvent::TransactionComplete(kind) => write!(f, "{} transaction complete", kind),
      BankEvent::LeavingForTheDay => f.write_str("leaving for the day"),
      BankEvent::GrantsPermission => f.write_str("grants permission"),
      BankEvent::GoingTo(Resource::Door) => f.write_str("going to the bank"),
      BankEvent::Inside(Resource::Door) => f.write_str("entering the bank"),
      BankEvent::Leaving(Resource::Door) => f.write_str("leaves the bank"),
      BankEvent::GoingTo(Resource::Safe) => f.write_str("going to the safe"),
      BankEvent::Inside(Resource::Safe) => f.write_str("inside the safe"),
      BankEvent::Leaving(Resource::Safe) => f.write_str("leaving the safe"),
      BankEvent::GoingTo(Resource::Manager) => f.write_str("going to the manager"),
      BankEvent::Inside(Resource::Manager) => f.write_str("granted the manager"),
      BankEvent::Leaving(Resource::Manager) => f.write_str("leaving the manager"),
      BankEvent::Closed => f.write_str("closed for the day"),
    }
  }
}

/// One line of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
  pub actor: ActorRef,
  pub related: Option<ActorRef>,
  pub event: BankEvent,
}

impl fmt::Display for LogLine {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.related {
      Some(related) => write!(f, "{} [{}]: {}", self.actor, related, self.event),
      None => write!(f, "{} []: {}", self.actor, self.event),
    }
  }
}

/// Cloneable publishing end of the transcript.
#[derive(Debug, Clone)]
pub struct TranscriptSender {
  tx: async_channel::Sender<LogLine>,
}

impl TranscriptSender {
  /// Publishes a line. Never blocks.
  pub fn emit(&self, actor: ActorRef, related: Option<ActorRef>, event: BankEvent) {
    let line = LogLine { actor, related, event };
    tracing::debug!(%line, "Transcript");
    if let Err(err) = self.tx.try_send(line) {
      // Only possible once the collector is gone, i.e. after the run ended.
      tracing::warn!(line = %err.into_inner(), "Transcript collector closed, line dropped");
    }
  }
}

/// The collecting end of the transcript.
pub struct Transcript {
  handle: JoinHandle<Result<Vec<LogLine>, BankError>>,
}

impl Transcript {
  /// Starts the collector. Lines are also written to `sink` when one is given.
  ///
  /// The sink may block (stdout, files), so the collector runs on Tokio's
  /// blocking pool instead of an async worker.
  pub fn start(sink: Option<Box<dyn Write + Send>>) -> (TranscriptSender, Transcript) {
    let (tx, rx) = async_channel::unbounded::<LogLine>();
    let handle = tokio::task::spawn_blocking(move || Self::collect(rx, sink));
    (TranscriptSender { tx }, Transcript { handle })
  }

  fn collect(
    rx: async_channel::Receiver<LogLine>,
    mut sink: Option<Box<dyn Write + Send>>,
  ) -> Result<Vec<LogLine>, BankError> {
    let mut lines = Vec::new();
    // Ends once every sender has been dropped.
    while let Ok(line) = block_on(rx.recv()) {
      if let Some(out) = sink.as_mut() {
        writeln!(out, "{}", line)?;
      }
      lines.push(line);
    }
    if let Some(out) = sink.as_mut() {
      out.flush()?;
    }
    tracing::debug!(lines = lines.len(), "Transcript collector finished");
    Ok(lines)
  }

  /// Waits for the collector to drain. Every sender must be dropped first.
  pub async fn finish(self) -> Result<Vec<LogLine>, BankError> {
    self.handle.await.map_err(BankError::from_join)?
  }
}

impl fmt::Debug for Transcript {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Transcript").finish_non_exhaustive()
  }
}
