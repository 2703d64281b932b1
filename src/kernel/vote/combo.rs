/// Combo state machine. Time is injected (ms), the idle reset is driven
/// externally through [`ComboTracker::reset`].
#[derive(Debug, Clone)]
pub struct ComboTracker {
    window_ms: u64,
    count: u32,
    last_target: Option<String>,
    last_at: u64,
}

impl ComboTracker {
    pub fn new(window_ms: u64) -> Self {
        Self {
            window_ms,
            count: 0,
            last_target: None,
            last_at: 0,
        }
    }

    /// Same target inside the window extends the combo, anything else
    /// starts a new one at 1.
    pub fn register(&mut self, target: &str, now_ms: u64) -> u32 {
        let within_window = now_ms.saturating_sub(self.last_at) < self.window_ms;
        let same_target = self.last_target.as_deref() == Some(target);

        if within_window && same_target {
            self.count += 1;
        } else {
            self.count = 1;
        }

        self.last_target = Some(target.to_string());
        self.last_at = now_ms;
        self.count
    }

    /// Idle timer fired.
    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }
}

impl Default for ComboTracker {
    fn default() -> Self {
        Self::new(2_000)
    }
}

pub fn combo_label(count: u32) -> Option<String> {
    (count > 1).then(|| format!("🔥 {count}x combo"))
}
