use super::event::VoteEvent;

/// Votes waiting for the next flush.
#[derive(Debug, Default)]
pub struct VoteQueue {
    pending: Vec<VoteEvent>,
}

impl VoteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: VoteEvent) {
        self.pending.push(event);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Hands the whole queue over and leaves it empty.
    pub fn take_batch(&mut self) -> Vec<VoteEvent> {
        std::mem::take(&mut self.pending)
    }
}
