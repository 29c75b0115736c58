// core/src/poller.rs

//! Background status polling for one checkout.
//!
//! A poller waits one interval, checks the status, and repeats until the
//! payment is terminal, the handle is cancelled (or dropped), or the attempt
//! limit runs out. Cancellation only stops future checks: a check already in
//! flight is allowed to finish.

use crate::models::{OrderStatus, StatusResult};
use crate::orchestrator::PaymentOrchestrator;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn, Instrument};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
/// Ten minutes at the default cadence.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 120;

/// Anything that can answer "what is the status of this transaction".
#[async_trait]
pub trait StatusSource: Send + Sync {
  async fn check_status(&self, transaction_id: &str) -> StatusResult;
}

#[async_trait]
impl StatusSource for PaymentOrchestrator {
  async fn check_status(&self, transaction_id: &str) -> StatusResult {
    self.get_status(transaction_id).await
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerConfig {
  pub interval: Duration,
  /// `None` polls until terminal or cancelled.
  pub max_attempts: Option<u32>,
}

impl Default for PollerConfig {
  fn default() -> Self {
    Self {
      interval: DEFAULT_POLL_INTERVAL,
      max_attempts: Some(DEFAULT_MAX_ATTEMPTS),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
  Terminal(OrderStatus),
  Cancelled,
  Exhausted { attempts: u32 },
}

/// Handle to a running poller. Dropping it cancels polling.
#[derive(Debug)]
pub struct PollHandle {
  cancel_tx: watch::Sender<bool>,
  status_rx: watch::Receiver<OrderStatus>,
  task: JoinHandle<PollOutcome>,
}

impl PollHandle {
  /// Stops scheduling further checks.
  pub fn cancel(&self) {
    self.cancel_tx.send_replace(true);
  }

  /// Last normalized status observed; `Pending` until the first successful check.
  pub fn latest_status(&self) -> OrderStatus {
    *self.status_rx.borrow()
  }

  pub fn subscribe(&self) -> watch::Receiver<OrderStatus> {
    self.status_rx.clone()
  }

  pub fn is_finished(&self) -> bool {
    self.task.is_finished()
  }

  pub async fn join(self) -> PollOutcome {
    let PollHandle { cancel_tx, task, .. } = self;
    let outcome = task.await;
    drop(cancel_tx);
    match outcome {
      Ok(outcome) => outcome,
      Err(e) => {
        error!(error = %e, "Status poller task failed.");
        PollOutcome::Cancelled
      }
    }
  }
}

/// Starts polling `transaction_id` on the current tokio runtime.
pub fn spawn<S>(source: Arc<S>, transaction_id: impl Into<String>, config: PollerConfig) -> PollHandle
where
  S: StatusSource + ?Sized + 'static,
{
  let transaction_id = transaction_id.into();
  let (cancel_tx, cancel_rx) = watch::channel(false);
  let (status_tx, status_rx) = watch::channel(OrderStatus::Pending);

  let span = tracing::info_span!("status_poller", transaction_id = %transaction_id);
  let task = tokio::spawn(
    poll_until_settled(source, transaction_id, config, cancel_rx, status_tx).instrument(span),
  );

  PollHandle {
    cancel_tx,
    status_rx,
    task,
  }
}

async fn poll_until_settled<S>(
  source: Arc<S>,
  transaction_id: String,
  config: PollerConfig,
  mut cancel_rx: watch::Receiver<bool>,
  status_tx: watch::Sender<OrderStatus>,
) -> PollOutcome
where
  S: StatusSource + ?Sized,
{
  let mut ticker = time::interval_at(Instant::now() + config.interval, config.interval);
  ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
  let mut attempts: u32 = 0;

  loop {
    if config.max_attempts.is_some_and(|max| attempts >= max) {
      warn!(attempts, "Status polling gave up before a terminal status.");
      return PollOutcome::Exhausted { attempts };
    }

    tokio::select! {
      biased;
      _ = cancellation(&mut cancel_rx) => {
        info!(attempts, "Status polling cancelled.");
        return PollOutcome::Cancelled;
      }
      _ = ticker.tick() => {}
    }

    attempts += 1;
    match source.check_status(&transaction_id).await {
      StatusResult::Checked { status, raw_status, .. } => {
        status_tx.send_replace(status);
        if status.is_terminal() {
          info!(attempts, status = %status, "Payment reached a terminal status.");
          return PollOutcome::Terminal(status);
        }
        debug!(attempts, raw_status = ?raw_status, "Payment still pending.");
      }
      StatusResult::Failed { error } => {
        warn!(attempts, error = %error, "Status check failed; retrying on next tick.");
      }
    }
  }
}

/// Resolves once cancellation is requested or the handle is gone.
async fn cancellation(cancel_rx: &mut watch::Receiver<bool>) {
  let _ = cancel_rx.wait_for(|cancelled| *cancelled).await;
}
