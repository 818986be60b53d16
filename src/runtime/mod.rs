// src/runtime/mod.rs

//! Synchronization primitives the actors share: gates, the waiting line,
//! per-customer rendezvous, shutdown and the transcript.

pub mod gate;
pub mod line;
pub mod rendezvous;
pub mod shutdown;
pub mod table;
pub mod transcript;

pub use gate::{CapacityGate, GatePermit, GateStats};
pub use line::WaitingLine;
pub use rendezvous::{OneShotSignal, Rendezvous};
pub use shutdown::ShutdownCoordinator;
pub use table::{CustomerRecord, CustomerTable};
pub use transcript::{BankEvent, LogLine, Resource, Transcript, TranscriptSender};
