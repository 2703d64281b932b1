use super::event::TelemetryEvent;
use super::metrics::DeliveryStats;
use crate::kernel::vote::DeliveryReport;

/// Running totals for one vote session. Every event is folded in as it is
/// recorded, so totals stay exact however long the session runs.
#[derive(Debug, Default)]
pub struct TelemetryRecorder {
    totals: DeliveryStats,
}

impl TelemetryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: TelemetryEvent) {
        self.totals.apply(&event);
    }

    /// Expands one delivery outcome into per-path events.
    pub fn record_delivery(&mut self, report: &DeliveryReport) {
        if report.fell_back() {
            self.record(TelemetryEvent::BatchFallback { size: report.batch_size });
            for _ in 0..report.delivered {
                self.record(TelemetryEvent::SingleDelivered);
            }
            for _ in 0..report.lost.len() {
                self.record(TelemetryEvent::SingleFailed);
            }
        } else {
            self.record(TelemetryEvent::BatchDelivered { size: report.batch_size });
        }
    }

    pub fn snapshot(&self) -> DeliveryStats {
        self.totals.clone()
    }
}
