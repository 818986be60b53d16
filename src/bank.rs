// src/bank.rs

use std::fmt;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinSet;
use tracing::Instrument;

use crate::actor::{ActorOutcome, CustomerActor, TellerActor};
use crate::behavior::{Behavior, RandomBehavior};
use crate::config::BankConfig;
use crate::error::BankError;
use crate::runtime::gate::{CapacityGate, GateStats};
use crate::runtime::line::WaitingLine;
use crate::runtime::shutdown::ShutdownCoordinator;
use crate::runtime::table::CustomerTable;
use crate::runtime::transcript::{BankEvent, LogLine, Transcript, TranscriptSender};
use crate::types::{ActorRef, CustomerId, TellerId};

/// State shared by every actor for the length of one run.
pub(crate) struct Floor {
  pub(crate) door: CapacityGate,
  pub(crate) safe: CapacityGate,
  pub(crate) manager: CapacityGate,
  pub(crate) line: Arc<WaitingLine>,
  pub(crate) shutdown: ShutdownCoordinator,
  pub(crate) customers: CustomerTable,
  pub(crate) transcript: TranscriptSender,
  pub(crate) behavior: Arc<dyn Behavior>,
  max_delay: Duration,
}

impl Floor {
  fn open(config: &BankConfig, behavior: Arc<dyn Behavior>, transcript: TranscriptSender) -> Self {
    let line = Arc::new(WaitingLine::new(config.customers));
    let customers = CustomerTable::allocate(config.customers, |id| behavior.transaction(id));
    Self {
      door: CapacityGate::new("door", config.door_capacity),
      safe: CapacityGate::new("safe", config.safe_capacity),
      manager: CapacityGate::new("manager", config.manager_capacity),
      shutdown: ShutdownCoordinator::new(line.clone(), config.customers, config.tellers),
      line,
      customers,
      transcript,
      behavior,
      max_delay: config.max_delay,
    }
  }

  /// Sleeps for `delay`, clamped to the configured maximum.
  pub(crate) async fn pause(&self, delay: Duration) {
    let delay = delay.min(self.max_delay);
    if !delay.is_zero() {
      tokio::time::sleep(delay).await;
    }
  }
}

impl fmt::Debug for Floor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Floor")
      .field("door", &self.door.stats())
      .field("safe", &self.safe.stats())
      .field("manager", &self.manager.stats())
      .field("queued", &self.line.len())
      .field("served", &self.shutdown.served())
      .finish_non_exhaustive()
  }
}

/// Summary of a completed day.
#[derive(Debug, Clone)]
pub struct BankReport {
  /// Final value of the served counter.
  pub served: usize,
  /// Customers that left the bank.
  pub departed: Vec<CustomerId>,
  /// Customers served by each teller, indexed by teller id.
  pub teller_served: Vec<usize>,
  pub door: GateStats,
  pub safe: GateStats,
  pub manager: GateStats,
  pub transcript: Vec<LogLine>,
}

impl BankReport {
  /// Lines emitted by `actor`, in transcript order.
  pub fn lines_of(&self, actor: ActorRef) -> impl Iterator<Item = &LogLine> + '_ {
    self.transcript.iter().filter(move |line| line.actor == actor)
  }

  /// The transcript rendered in the wire format, one line per entry.
  pub fn render(&self) -> String {
    self.transcript.iter().map(|line| format!("{}\n", line)).collect()
  }
}

/// Opens the bank for one day: spawns every actor and joins them all.
pub struct Bank {
  config: BankConfig,
  behavior: Arc<dyn Behavior>,
  output: Option<Box<dyn Write + Send>>,
}

impl Bank {
  /// Validates `config`. No actor exists until [`Bank::run`].
  pub fn new(config: BankConfig) -> Result<Self, BankError> {
    config.validate()?;
    Ok(Self {
      config,
      behavior: Arc::new(RandomBehavior::new()),
      output: None,
    })
  }

  pub fn with_behavior(mut self, behavior: impl Behavior + 'static) -> Self {
    self.behavior = Arc::new(behavior);
    self
  }

  /// Mirrors every transcript line to `output` as it is produced.
  pub fn with_output(mut self, output: impl Write + Send + 'static) -> Self {
    self.output = Some(Box::new(output));
    self
  }

  pub fn config(&self) -> &BankConfig {
    &self.config
  }

  /// Runs the simulation to completion.
  ///
  /// The first actor to fail or panic halts the bank: every other actor is
  /// aborted and the failure is returned.
  pub async fn run(self) -> Result<BankReport, BankError> {
    let Bank {
      config,
      behavior,
      output,
    } = self;
    let (transcript_tx, transcript) = Transcript::start(output);
    let floor = Arc::new(Floor::open(&config, behavior, transcript_tx));
    tracing::info!(
      tellers = config.tellers,
      customers = config.customers,
      door = config.door_capacity,
      safe = config.safe_capacity,
      manager = config.manager_capacity,
      "Bank opening"
    );

    let mut actors = JoinSet::new();
    for t in 0..config.tellers {
      let actor = TellerActor::new(TellerId(t), floor.clone());
      actors.spawn(actor.run().instrument(tracing::debug_span!("teller", id = t)));
    }
    floor.shutdown.release_if_idle();
    for id in floor.customers.ids() {
      let actor = CustomerActor::new(id, floor.clone());
      actors.spawn(actor.run().instrument(tracing::debug_span!("customer", id = id.0)));
    }

    let joined = Self::join_actors(&mut actors, config.tellers).await;
    let (departed, teller_served) = match joined {
      Ok(outcome) => outcome,
      Err(err) => {
        tracing::error!(error = %err, "Bank halted");
        drop(floor);
        // Drain what was produced so far; the run's error takes precedence.
        let _ = transcript.finish().await;
        return Err(err);
      }
    };

    let served = floor.shutdown.served();
    if served != config.customers || departed.len() != config.customers {
      return Err(BankError::Internal(format!(
        "day ended with {} served and {} departed out of {} customers",
        served,
        departed.len(),
        config.customers
      )));
    }

    floor.transcript.emit(ActorRef::bank(), None, BankEvent::Closed);
    let door = floor.door.stats();
    let safe = floor.safe.stats();
    let manager = floor.manager.stats();
    tracing::info!(served, ?door, ?safe, ?manager, "Bank closed");
    drop(floor);

    let transcript = transcript.finish().await?;
    Ok(BankReport {
      served,
      departed,
      teller_served,
      door,
      safe,
      manager,
      transcript,
    })
  }

  async fn join_actors(
    actors: &mut JoinSet<Result<ActorOutcome, BankError>>,
    tellers: usize,
  ) -> Result<(Vec<CustomerId>, Vec<usize>), BankError> {
    let mut departed = Vec::new();
    let mut teller_served = vec![0; tellers];

    while let Some(joined) = actors.join_next().await {
      let outcome = joined.map_err(BankError::from_join).and_then(|result| result);
      match outcome {
        Ok(ActorOutcome::Departed(id)) => departed.push(id),
        Ok(ActorOutcome::OffDuty { teller, served }) => teller_served[teller.0] = served,
        Err(err) => {
          tracing::error!(error = %err, remaining = actors.len(), "Actor failed, aborting the rest");
          actors.shutdown().await;
          return Err(err);
        }
      }
    }
    Ok((departed, teller_served))
  }
}

impl fmt::Debug for Bank {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Bank")
      .field("config", &self.config)
      .field("behavior", &self.behavior)
      .finish_non_exhaustive()
  }
}
