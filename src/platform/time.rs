//! Frame timing

/// Converts monotonic timestamps into per-frame elapsed seconds
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seconds since the previous tick. The first tick and clocks that run
    /// backwards yield 0.
    pub fn tick(&mut self, now: f64) -> f32 {
        let elapsed = match self.last {
            Some(last) if now > last => (now - last) as f32,
            _ => 0.0,
        };
        self.last = Some(now);
        elapsed
    }

    /// Forget the previous timestamp (e.g. after the app was backgrounded)
    pub fn reset(&mut self) {
        self.last = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(10.0), 0.0);
        assert!((clock.tick(10.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn backwards_time_is_zero() {
        let mut clock = FrameClock::new();
        clock.tick(5.0);
        assert_eq!(clock.tick(4.0), 0.0);
        assert!((clock.tick(4.25) - 0.25).abs() < 1e-6);
    }
}
