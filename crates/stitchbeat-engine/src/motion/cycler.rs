//! Frame clock for the 6-frame animation cycle.

use crate::clip::FRAME_COUNT;

/// Derives the current frame index from playback time and reports cycle
/// boundaries. Owns no frame data, only the clock arithmetic.
pub struct FrameCycler {
    frame_duration: f64,
    cycle_start: f64,
    frame_index: usize,
}

impl FrameCycler {
    pub fn new(frame_duration: f64) -> Self {
        Self {
            frame_duration,
            cycle_start: 0.0,
            frame_index: 0,
        }
    }

    /// Advance the clock to `now`. Returns true exactly when a cycle
    /// completed and the next one started at `now`.
    ///
    /// A clock running backwards (seek, track restart) restarts the cycle
    /// without reporting a boundary.
    pub fn advance(&mut self, now: f64) -> bool {
        if now < self.cycle_start {
            self.restart(now);
            return false;
        }

        let progress = (now - self.cycle_start) / self.frame_duration;
        if progress >= FRAME_COUNT as f64 {
            self.restart(now);
            return true;
        }

        self.frame_index = (progress.floor() as usize).min(FRAME_COUNT - 1);
        false
    }

    /// Restart the cycle at `now`, frame 0.
    pub fn restart(&mut self, now: f64) {
        self.cycle_start = now;
        self.frame_index = 0;
    }

    pub fn frame_index(&self) -> usize {
        self.frame_index
    }

    pub fn cycle_start(&self) -> f64 {
        self.cycle_start
    }
}
