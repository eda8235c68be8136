//! Periodic polling of a settlement's stages
//!
//! The poller publishes a [`PollUpdate`] on every tick through a `watch`
//! channel. A failed tick keeps the last known stages and carries the error,
//! and polling continues. The poller stops once the settlement is terminal,
//! once every receiver is gone, or when its [`PollerHandle`] is dropped

use std::time::Duration;

use tokio::{sync::watch, task::JoinHandle, time::MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

use crate::{
    error::SwapClientError,
    settlement::SettlementId,
    status::{SwapPhase, SwapStageStatus},
    thornode::ThornodeClient,
};

/// The outcome of a single poll
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PollUpdate {
    /// The latest known stages, if any poll has succeeded
    pub status: Option<SwapStageStatus>,
    /// The phase derived from the latest known stages
    pub phase: SwapPhase,
    /// Whether the settlement is terminal
    pub completed: bool,
    /// The error of this tick, if it failed
    pub error: Option<String>,
}

impl PollUpdate {
    /// The update published before the first poll
    fn initial() -> Self {
        Self { status: None, phase: SwapPhase::Initializing, completed: false, error: None }
    }

    /// An update from a successful poll
    fn from_status(status: SwapStageStatus) -> Self {
        Self {
            phase: status.phase(),
            completed: status.is_complete(),
            status: Some(status),
            error: None,
        }
    }

    /// An update from a failed poll, keeping the last known stages
    fn from_error(last: Option<SwapStageStatus>, err: &SwapClientError) -> Self {
        let phase = last.as_ref().map(SwapStageStatus::phase).unwrap_or(SwapPhase::Initializing);
        Self { status: last, phase, completed: false, error: Some(err.message().to_string()) }
    }
}

/// Polls the stages of one settlement
#[derive(Clone, Debug)]
pub struct StatusPoller {
    /// The THORNode client
    client: ThornodeClient,
    /// The settlement being polled
    settlement_id: SettlementId,
    /// The interval between polls
    interval: Duration,
}

impl StatusPoller {
    /// Constructor
    pub fn new(client: ThornodeClient, settlement_id: SettlementId, interval: Duration) -> Self {
        Self { client, settlement_id, interval }
    }

    /// Poll once, keeping `last` if the poll fails
    pub async fn poll_once(&self, last: Option<SwapStageStatus>) -> PollUpdate {
        match self.client.get_tx_stages(&self.settlement_id).await {
            Ok(stages) => PollUpdate::from_status(stages.into()),
            Err(e) => {
                warn!("failed to poll stages of {}: {e}", self.settlement_id);
                PollUpdate::from_error(last, &e)
            },
        }
    }

    /// Start polling in the background
    pub fn spawn(self) -> PollerHandle {
        let (tx, updates) = watch::channel(PollUpdate::initial());
        let task = tokio::spawn(self.run(tx));
        PollerHandle { updates, task }
    }

    /// The polling loop
    #[instrument(skip_all, fields(settlement_id = %self.settlement_id))]
    async fn run(self, tx: watch::Sender<PollUpdate>) {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut last = None;
        loop {
            ticker.tick().await;
            let update = self.poll_once(last.take()).await;
            let completed = update.completed;
            last = update.status.clone();

            if tx.send(update).is_err() {
                debug!("no status receivers left, stopping poller");
                break;
            }

            if completed {
                info!("settlement complete: {}", self.settlement_id.tracker_url());
                break;
            }
        }
    }
}

/// Owns a running poller; dropping the handle stops it
#[derive(Debug)]
pub struct PollerHandle {
    /// The published updates
    updates: watch::Receiver<PollUpdate>,
    /// The polling task
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// The latest update
    pub fn latest(&self) -> PollUpdate {
        self.updates.borrow().clone()
    }

    /// Subscribe to updates
    pub fn subscribe(&self) -> watch::Receiver<PollUpdate> {
        self.updates.clone()
    }

    /// Whether the polling task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the terminal update
    pub async fn wait_for_completion(&mut self) -> Result<PollUpdate, SwapClientError> {
        wait_for_completion(&mut self.updates).await
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Wait on an update stream for the terminal update
pub(crate) async fn wait_for_completion(
    updates: &mut watch::Receiver<PollUpdate>,
) -> Result<PollUpdate, SwapClientError> {
    loop {
        {
            let update = updates.borrow_and_update();
            if update.completed {
                return Ok(update.clone());
            }
        }

        if updates.changed().await.is_err() {
            let update = updates.borrow().clone();
            if update.completed {
                return Ok(update);
            }
            return Err(SwapClientError::polling("status poller stopped before completion"));
        }
    }
}
