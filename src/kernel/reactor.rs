use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::{JoinError, JoinHandle, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, info_span, Instrument};
use uuid::Uuid;

use super::catalog::extension_id;
use super::telemetry::{DeliveryStats, TelemetryEvent, TelemetryRecorder};
use super::time::{epoch_ms, Deadline, SessionClock};
use super::vote::{
    combo_label, deliver, ComboTracker, DeliveryReport, Relay, RocketLaunch, VoteEvent, VoteNotice,
    VoteQueue, VoteReceipt, VoteSink, VoterInfo,
};
use crate::config::VoteConfig;
use crate::error::SessionError;

const COMMAND_CAPACITY: usize = 100;

pub enum VoteCommand {
    Cast {
        extension_name: String,
        voter: VoterInfo,
        reply: oneshot::Sender<VoteReceipt>,
    },
    Flush {
        reply: oneshot::Sender<usize>,
    },
    ComboCount {
        reply: oneshot::Sender<u32>,
    },
    Snapshot {
        reply: oneshot::Sender<DeliveryStats>,
    },
    /// Answered once the queue is empty and no delivery is in flight.
    Settle {
        reply: oneshot::Sender<DeliveryStats>,
    },
    /// Stops the loop; answered after the final drain.
    Shutdown {
        reply: oneshot::Sender<DeliveryStats>,
    },
}

/// Owns all vote session state: combo counter, pending queue and both timers.
///
/// Every transition happens inside [`VoteReactor::run`], one event at a time.
/// Transport runs in spawned tasks and reports back through `deliveries`.
pub struct VoteReactor {
    receiver: mpsc::Receiver<VoteCommand>,
    config: VoteConfig,
    combo: ComboTracker,
    queue: VoteQueue,
    reset_timer: Deadline,
    flush_timer: Deadline,
    clock: SessionClock,
    sink: Arc<dyn VoteSink>,
    relay: Arc<dyn Relay>,
    notices: mpsc::UnboundedSender<VoteNotice>,
    deliveries: JoinSet<DeliveryReport>,
    settle_waiters: Vec<oneshot::Sender<DeliveryStats>>,
    shutdown: CancellationToken,
    pub telemetry: TelemetryRecorder,
    pub session_id: Uuid,
}

/// Cloneable front door to a running [`VoteReactor`].
#[derive(Clone)]
pub struct VoteHandle {
    tx: mpsc::Sender<VoteCommand>,
}

impl VoteReactor {
    pub fn new(
        config: VoteConfig,
        sink: Arc<dyn VoteSink>,
        relay: Arc<dyn Relay>,
    ) -> (Self, VoteHandle, mpsc::UnboundedReceiver<VoteNotice>) {
        let (tx, receiver) = mpsc::channel(COMMAND_CAPACITY);
        let (notices, notice_rx) = mpsc::unbounded_channel();

        let reactor = Self {
            receiver,
            combo: ComboTracker::new(config.combo_window_ms),
            config,
            queue: VoteQueue::new(),
            reset_timer: Deadline::new(),
            flush_timer: Deadline::new(),
            clock: SessionClock::start(),
            sink,
            relay,
            notices,
            deliveries: JoinSet::new(),
            settle_waiters: Vec::new(),
            shutdown: CancellationToken::new(),
            telemetry: TelemetryRecorder::new(),
            session_id: Uuid::new_v4(),
        };

        (reactor, VoteHandle { tx }, notice_rx)
    }

    /// Builds the reactor and drives it on the current runtime.
    pub fn spawn(
        config: VoteConfig,
        sink: Arc<dyn VoteSink>,
        relay: Arc<dyn Relay>,
    ) -> (VoteHandle, mpsc::UnboundedReceiver<VoteNotice>, JoinHandle<DeliveryStats>) {
        let (reactor, handle, notices) = Self::new(config, sink, relay);
        let span = info_span!("vote_session", id = %reactor.session_id);
        let task = tokio::spawn(reactor.run().instrument(span));
        (handle, notices, task)
    }

    /// Event loop. Returns final statistics after pending votes were flushed.
    pub async fn run(mut self) -> DeliveryStats {
        info!(
            "Vote session started (combo window {}ms, reset {}ms, flush {}ms)",
            self.config.combo_window_ms, self.config.combo_reset_ms, self.config.flush_delay_ms
        );

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(command) => self.handle(command),
                    None => break,
                },
                _ = self.shutdown.cancelled() => break,
                _ = self.reset_timer.elapsed() => self.on_combo_idle(),
                _ = self.flush_timer.elapsed() => {
                    self.flush();
                }
                Some(joined) = self.deliveries.join_next(), if !self.deliveries.is_empty() => {
                    self.on_delivered(joined);
                }
            }
        }

        self.drain().await
    }

    fn handle(&mut self, command: VoteCommand) {
        match command {
            VoteCommand::Cast { extension_name, voter, reply } => {
                let receipt = self.cast(&extension_name, voter);
                let _ = reply.send(receipt);
            }
            VoteCommand::Flush { reply } => {
                let _ = reply.send(self.flush());
            }
            VoteCommand::ComboCount { reply } => {
                let _ = reply.send(self.combo.count());
            }
            VoteCommand::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
            VoteCommand::Settle { reply } => {
                self.settle_waiters.push(reply);
                self.answer_settled();
            }
            VoteCommand::Shutdown { reply } => {
                self.settle_waiters.push(reply);
                self.shutdown.cancel();
            }
        }
    }

    fn cast(&mut self, extension_name: &str, voter: VoterInfo) -> VoteReceipt {
        let voter = if voter.is_set() {
            voter
        } else {
            VoterInfo::random(&mut rand::thread_rng())
        };

        let extension_id = extension_id(extension_name);
        let combo_count = self.combo.register(&extension_id, self.clock.now_ms());
        self.reset_timer.reschedule(self.config.combo_reset());

        let event = VoteEvent {
            extension_id: extension_id.clone(),
            voter_name: voter.name.clone(),
            job_position: voter.job_position.clone(),
            combo_count,
            timestamp: epoch_ms(),
        };

        self.relay.launch(RocketLaunch::from(&event));
        self.telemetry.record(TelemetryEvent::VoteRegistered {
            extension_id: extension_id.clone(),
            combo: combo_count,
        });
        debug!("Vote for {} queued (combo {})", extension_id, combo_count);

        self.queue.push(event);
        self.flush_timer.reschedule(self.config.flush_delay());

        VoteReceipt {
            extension_id,
            combo_count,
            label: combo_label(combo_count),
            display_name: voter.display_name(),
        }
    }

    /// Hands the queue to a delivery task. Returns how many votes left.
    fn flush(&mut self) -> usize {
        self.flush_timer.cancel();
        if self.queue.is_empty() {
            return 0;
        }

        let batch = self.queue.take_batch();
        let size = batch.len();
        let sink = Arc::clone(&self.sink);
        self.deliveries
            .spawn(async move { deliver(sink.as_ref(), batch).await });
        debug!("Flushed {} votes", size);
        size
    }

    fn on_combo_idle(&mut self) {
        self.reset_timer.cancel();
        let peak = self.combo.count();
        self.combo.reset();
        self.telemetry.record(TelemetryEvent::ComboReset { peak });
        debug!("Combo reset after idle (peak {})", peak);
    }

    fn on_delivered(&mut self, joined: Result<DeliveryReport, JoinError>) {
        match joined {
            Ok(report) => {
                self.telemetry.record_delivery(&report);
                if let Some(reason) = &report.batch_error {
                    let _ = self.notices.send(VoteNotice::DeliveryDegraded {
                        batch_size: report.batch_size,
                        reason: reason.clone(),
                    });
                }
                for (event, reason) in report.lost {
                    let _ = self.notices.send(VoteNotice::VoteLost { event, reason });
                }
            }
            Err(e) => error!("Vote delivery task failed: {}", e),
        }
        self.answer_settled();
    }

    fn answer_settled(&mut self) {
        if !self.queue.is_empty() || !self.deliveries.is_empty() {
            return;
        }
        let stats = self.snapshot();
        for waiter in self.settle_waiters.drain(..) {
            let _ = waiter.send(stats.clone());
        }
    }

    fn snapshot(&self) -> DeliveryStats {
        let mut stats = self.telemetry.snapshot();
        stats.pending = self.queue.len();
        stats
    }

    async fn drain(&mut self) -> DeliveryStats {
        self.flush();
        while let Some(joined) = self.deliveries.join_next().await {
            self.on_delivered(joined);
        }
        self.answer_settled();
        let stats = self.snapshot();
        info!(
            "Vote session closed: {} votes, {} delivered, {} lost",
            stats.votes, stats.delivered, stats.lost
        );
        stats
    }
}

impl VoteHandle {
    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> VoteCommand,
    ) -> Result<T, SessionError> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(make(reply)).await.map_err(|_| SessionError::Closed)?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Registers a vote and returns its combo immediately; delivery happens later.
    pub async fn cast(
        &self,
        extension_name: impl Into<String>,
        voter: VoterInfo,
    ) -> Result<VoteReceipt, SessionError> {
        let extension_name = extension_name.into();
        self.request(|reply| VoteCommand::Cast { extension_name, voter, reply })
            .await
    }

    pub async fn flush(&self) -> Result<usize, SessionError> {
        self.request(|reply| VoteCommand::Flush { reply }).await
    }

    pub async fn combo_count(&self) -> Result<u32, SessionError> {
        self.request(|reply| VoteCommand::ComboCount { reply }).await
    }

    pub async fn snapshot(&self) -> Result<DeliveryStats, SessionError> {
        self.request(|reply| VoteCommand::Snapshot { reply }).await
    }

    pub async fn settle(&self) -> Result<DeliveryStats, SessionError> {
        self.request(|reply| VoteCommand::Settle { reply }).await
    }

    /// Flushes what is pending, waits for in-flight deliveries, stops the session.
    pub async fn shutdown(&self) -> Result<DeliveryStats, SessionError> {
        self.request(|reply| VoteCommand::Shutdown { reply }).await
    }
}
