pub mod combo;
pub mod event;
pub mod queue;
pub mod sink;

pub use combo::{combo_label, ComboTracker};
pub use event::*;
pub use queue::VoteQueue;
pub use sink::{deliver, DeliveryReport, Relay, VoteSink};
