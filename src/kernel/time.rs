use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// A single cancel-and-reschedule timer slot.
///
/// At most one deadline is pending; scheduling again replaces it.
#[derive(Debug, Default)]
pub struct Deadline {
    at: Option<Instant>,
}

impl Deadline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reschedule(&mut self, after: Duration) {
        self.at = Some(Instant::now() + after);
    }

    pub fn cancel(&mut self) {
        self.at = None;
    }

    /// Resolves when the deadline passes. Pending forever while unset,
    /// so it can sit in a `select!` unconditionally.
    pub async fn elapsed(&self) {
        match self.at {
            Some(at) => sleep_until(at).await,
            None => std::future::pending().await,
        }
    }
}

/// Monotonic milliseconds since the session started.
#[derive(Debug, Clone, Copy)]
pub struct SessionClock {
    started: Instant,
}

impl SessionClock {
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    pub fn now_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }
}

/// Wall-clock milliseconds since the Unix epoch, for event timestamps.
pub fn epoch_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
