//! bankline - a bank simulated by concurrent teller and customer actors on Tokio.
//!
//! Tellers pull customers from a FIFO waiting line, exchange transaction
//! details with each customer over a private rendezvous, and share three
//! capacity-bounded resources: the door, the safe and the manager. The day
//! ends when every customer has been served, at which point every teller is
//! woken and goes home.
//!
//! ```no_run
//! # async fn day() -> Result<(), bankline::BankError> {
//! let report = bankline::Bank::new(bankline::BankConfig::default())?
//!   .with_output(std::io::stdout())
//!   .run()
//!   .await?;
//! assert_eq!(report.served, 5);
//! # Ok(())
//! # }
//! ```

/// Customer and teller state machines.
pub mod actor;
/// The coordinator that opens the bank, spawns actors and joins them.
pub mod bank;
/// Sources of transaction choices and think/service delays.
pub mod behavior;
/// Population sizes and resource capacities.
pub mod config;
/// Error type used throughout the crate.
pub mod error;
/// Gates, waiting line, rendezvous, shutdown and transcript.
pub mod runtime;
/// Identifiers and small value types.
pub mod types;

pub use bank::{Bank, BankReport};
pub use behavior::{Behavior, RandomBehavior, ScriptedBehavior};
pub use config::BankConfig;
pub use error::BankError;
pub use runtime::{BankEvent, GateStats, LogLine, Resource};
pub use types::{ActorRef, ActorType, CustomerId, TellerId, TransactionKind};

const VERSION_MAJOR: i32 = 0;
const VERSION_MINOR: i32 = 1;
const VERSION_PATCH: i32 = 0;

/// Returns the library version as a tuple (major, minor, patch).
pub fn version() -> (i32, i32, i32) {
  (VERSION_MAJOR, VERSION_MINOR, VERSION_PATCH)
}
