use std::time::Duration;

/// Longest frame delta folded into the timeline; a stalled or suspended host resumes smoothly.
pub const MAX_FRAME_DELTA: Duration = Duration::from_millis(250);

/// Scene timeline. Only grows, only by clamped frame deltas, and not while paused.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    elapsed: Duration,
    paused: bool,
}

impl Clock {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one frame delta into the timeline and returns the elapsed milliseconds.
    pub fn tick(&mut self, delta: Duration) -> f64 {
        if !self.paused {
            self.elapsed += delta.min(MAX_FRAME_DELTA);
        }
        self.elapsed_ms()
    }

    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn resume(&mut self) {
        self.paused = false;
    }

    pub fn toggle(&mut self) {
        self.paused = !self.paused;
    }

    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulates_frame_deltas() {
        let mut clock = Clock::new();
        clock.tick(Duration::from_millis(16));
        let ms = clock.tick(Duration::from_millis(17));
        assert!((ms - 33.0).abs() < 1e-9);
    }

    #[test]
    fn long_gaps_are_clamped() {
        let mut clock = Clock::new();
        let ms = clock.tick(Duration::from_secs(30));
        assert!((ms - 250.0).abs() < 1e-9);
    }

    #[test]
    fn paused_clock_holds_still() {
        let mut clock = Clock::new();
        clock.tick(Duration::from_millis(100));
        clock.pause();
        clock.tick(Duration::from_millis(100));
        assert!((clock.elapsed_ms() - 100.0).abs() < 1e-9);

        clock.resume();
        clock.tick(Duration::from_millis(50));
        assert!((clock.elapsed_ms() - 150.0).abs() < 1e-9);
    }

    #[test]
    fn toggle_flips_pause_state() {
        let mut clock = Clock::new();
        clock.toggle();
        assert!(clock.is_paused());
        clock.toggle();
        assert!(!clock.is_paused());
    }
}
