use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TelemetryEvent {
    VoteRegistered {
        extension_id: String,
        combo: u32,
    },

    /// Idle timer dropped the combo counter back to zero.
    ComboReset {
        peak: u32,
    },

    BatchDelivered {
        size: usize,
    },

    BatchFallback {
        size: usize,
    },

    SingleDelivered,

    SingleFailed,
}
