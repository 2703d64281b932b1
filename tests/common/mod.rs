#![allow(dead_code)]

use async_trait::async_trait;
use planetvote::error::TransportError;
use planetvote::kernel::vote::{Relay, RocketLaunch, VoteEvent, VoteSink};
use std::collections::HashSet;
use std::sync::Mutex;

/// In-memory backend that records every call.
#[derive(Default)]
pub struct RecordingSink {
    pub batches: Mutex<Vec<Vec<VoteEvent>>>,
    pub singles: Mutex<Vec<VoteEvent>>,
    pub fail_batch: bool,
    /// Extension ids the single-vote endpoint refuses.
    pub fail_single: HashSet<String>,
}

impl RecordingSink {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn batch_down() -> Self {
        Self {
            fail_batch: true,
            ..Self::default()
        }
    }

    pub fn batches(&self) -> Vec<Vec<VoteEvent>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn singles(&self) -> Vec<VoteEvent> {
        self.singles.lock().unwrap().clone()
    }
}

#[async_trait]
impl VoteSink for RecordingSink {
    async fn submit_batch(&self, events: &[VoteEvent]) -> Result<(), TransportError> {
        self.batches.lock().unwrap().push(events.to_vec());
        if self.fail_batch {
            return Err(TransportError::Rejected("batch endpoint down".to_string()));
        }
        Ok(())
    }

    async fn submit_one(&self, event: &VoteEvent) -> Result<(), TransportError> {
        self.singles.lock().unwrap().push(event.clone());
        if self.fail_single.contains(&event.extension_id) {
            return Err(TransportError::Rejected("vote refused".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingRelay {
    pub launches: Mutex<Vec<RocketLaunch>>,
}

impl RecordingRelay {
    pub fn launches(&self) -> Vec<RocketLaunch> {
        self.launches.lock().unwrap().clone()
    }
}

impl Relay for RecordingRelay {
    fn launch(&self, rocket: RocketLaunch) {
        self.launches.lock().unwrap().push(rocket);
    }
}

pub fn event(extension_id: &str, combo_count: u32) -> VoteEvent {
    VoteEvent {
        extension_id: extension_id.to_string(),
        voter_name: "Ada".to_string(),
        job_position: String::new(),
        combo_count,
        timestamp: 1_700_000_000_000,
    }
}
