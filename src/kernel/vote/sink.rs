use async_trait::async_trait;
use tracing::{debug, error, warn};

use super::event::{RocketLaunch, VoteEvent};
use crate::error::TransportError;

/// Backend vote endpoints. Best-effort, dedup is the backend's job.
#[async_trait]
pub trait VoteSink: Send + Sync {
    async fn submit_batch(&self, events: &[VoteEvent]) -> Result<(), TransportError>;
    async fn submit_one(&self, event: &VoteEvent) -> Result<(), TransportError>;
}

/// Send-only realtime channel to the planet display.
/// Connection handling belongs to the implementation; `launch` never blocks.
pub trait Relay: Send + Sync {
    fn launch(&self, rocket: RocketLaunch);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub batch_size: usize,
    /// Set when the batch endpoint failed and the single-vote path ran.
    pub batch_error: Option<String>,
    pub delivered: usize,
    pub lost: Vec<(VoteEvent, String)>,
}

impl DeliveryReport {
    pub fn fell_back(&self) -> bool {
        self.batch_error.is_some()
    }
}

/// Batch first; on failure every event of that batch is tried exactly once
/// on the single-vote endpoint. Nothing is re-queued.
pub async fn deliver(sink: &dyn VoteSink, batch: Vec<VoteEvent>) -> DeliveryReport {
    let batch_size = batch.len();

    match sink.submit_batch(&batch).await {
        Ok(()) => {
            debug!("Delivered batch of {} votes", batch_size);
            DeliveryReport {
                batch_size,
                batch_error: None,
                delivered: batch_size,
                lost: Vec::new(),
            }
        }
        Err(batch_err) => {
            warn!("Batch vote submission failed ({}), falling back to single votes", batch_err);
            let mut delivered = 0;
            let mut lost = Vec::new();

            for event in batch {
                match sink.submit_one(&event).await {
                    Ok(()) => delivered += 1,
                    Err(e) => {
                        error!("Vote for {} lost: {}", event.extension_id, e);
                        lost.push((event, e.to_string()));
                    }
                }
            }

            DeliveryReport {
                batch_size,
                batch_error: Some(batch_err.to_string()),
                delivered,
                lost,
            }
        }
    }
}
