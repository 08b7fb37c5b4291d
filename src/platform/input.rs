//! Jump input collection
//!
//! Raw presses arrive from pointer, touch and keyboard handlers at arbitrary
//! times. The simulation wants at most one jump per step, and presses that come
//! faster than a human could mean them are dropped.

/// Default minimum spacing between accepted presses
pub const DEFAULT_MIN_SPACING_SECS: f64 = 0.08;

#[derive(Debug, Clone)]
pub struct JumpDebouncer {
    min_spacing_secs: f64,
    last_accepted: Option<f64>,
    pending: bool,
}

impl Default for JumpDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_SPACING_SECS)
    }
}

impl JumpDebouncer {
    pub fn new(min_spacing_secs: f64) -> Self {
        Self {
            min_spacing_secs: min_spacing_secs.max(0.0),
            last_accepted: None,
            pending: false,
        }
    }

    /// Record a press at `now` (seconds, monotonic). Returns whether it was accepted.
    pub fn press(&mut self, now: f64) -> bool {
        if let Some(last) = self.last_accepted {
            if now - last < self.min_spacing_secs {
                return false;
            }
        }
        self.last_accepted = Some(now);
        self.pending = true;
        true
    }

    /// Take the pending jump for this step (multiple presses collapse into one)
    pub fn take(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Drop any pending press and forget the spacing history
    pub fn reset(&mut self) {
        self.last_accepted = None;
        self.pending = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presses_collapse_into_one_jump() {
        let mut d = JumpDebouncer::new(0.0);
        d.press(1.0);
        d.press(1.01);
        assert!(d.take());
        assert!(!d.take());
    }

    #[test]
    fn rapid_presses_are_dropped() {
        let mut d = JumpDebouncer::new(0.08);
        assert!(d.press(1.0));
        assert!(d.take());
        assert!(!d.press(1.05));
        assert!(!d.take());
        assert!(d.press(1.09));
        assert!(d.take());
    }

    #[test]
    fn reset_clears_history() {
        let mut d = JumpDebouncer::default();
        d.press(2.0);
        d.reset();
        assert!(!d.take());
        assert!(d.press(2.01));
    }
}
