//! Vote delivery telemetry.
//!
//! Telemetry is a read-only side-effect layer. The reactor records into it
//! but never reads it back when deciding anything.
//! Events carry ids and counts only, never voter names.

pub mod event;
pub mod metrics;
pub mod recorder;

pub use event::TelemetryEvent;
pub use metrics::DeliveryStats;
pub use recorder::TelemetryRecorder;
