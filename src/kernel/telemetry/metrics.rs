use std::collections::HashMap;

use super::event::TelemetryEvent;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeliveryStats {
    pub votes: u64,
    pub max_combo: u32,
    pub combo_resets: u64,
    pub batches: u64,
    /// Votes handed to the batch endpoint, whatever the outcome.
    pub batched_votes: u64,
    pub fallbacks: u64,
    /// Votes accepted by either endpoint.
    pub delivered: u64,
    pub lost: u64,
    pub avg_batch_size: f64,
    /// Filled in by the reactor; telemetry itself does not see the queue.
    pub pending: usize,
    pub votes_by_extension: HashMap<String, u64>,
}

impl DeliveryStats {
    /// Folds one event into the session totals.
    pub fn apply(&mut self, event: &TelemetryEvent) {
        match event {
            TelemetryEvent::VoteRegistered { extension_id, combo } => {
                self.votes += 1;
                self.max_combo = self.max_combo.max(*combo);
                *self.votes_by_extension.entry(extension_id.clone()).or_insert(0) += 1;
            }
            TelemetryEvent::ComboReset { .. } => self.combo_resets += 1,
            TelemetryEvent::BatchDelivered { size } => {
                self.batches += 1;
                self.delivered += *size as u64;
                self.batched_votes += *size as u64;
            }
            TelemetryEvent::BatchFallback { size } => {
                self.batches += 1;
                self.fallbacks += 1;
                self.batched_votes += *size as u64;
            }
            TelemetryEvent::SingleDelivered => self.delivered += 1,
            TelemetryEvent::SingleFailed => self.lost += 1,
        }

        if self.batches > 0 {
            self.avg_batch_size = self.batched_votes as f64 / self.batches as f64;
        }
    }
}
