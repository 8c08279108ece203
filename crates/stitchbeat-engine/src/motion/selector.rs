//! Motion selection state machine.
//!
//! Buckets the motion score into slow/medium/fast, smooths the numeric bucket
//! choice itself, and commits changes only when the frame cycler reports a
//! cycle boundary. That makes the dwell time of every motion an exact multiple
//! of one full 6-frame cycle, which reads as intentional instead of jittery.
//!
//! Committed changes land in a trailing log used for diagnostics: recent
//! history display and a "has the music visited all three motions lately"
//! coverage check.

use std::collections::VecDeque;

use crate::config::{EngineConfig, MOTION_COUNT};
use crate::motion::classifier::EnergyReading;

/// Default motion while nothing has been committed yet: the middle one.
const INITIAL_MOTION: usize = 1;

/// One committed motion change.
#[derive(Clone, Copy, Debug)]
pub struct MotionChange {
    /// Playback time of the commit in seconds
    pub time: f64,
    /// Motion index committed to
    pub motion: usize,
    /// Motion score that drove the commit
    pub score: f32,
    /// Smoothed total energy at commit time
    pub energy: f32,
    /// Treble/bass ratio at commit time
    pub treble_ratio: f32,
}

/// Maps scored readings to the current motion index.
pub struct MotionSelector {
    slow_threshold: f32,
    fast_threshold: f32,
    index_smoothing: f32,
    log_retention: f64,
    coverage_window: f64,

    current_motion: usize,
    smoothed_index: f32,
    last_change_time: f64,
    change_log: VecDeque<MotionChange>,
}

impl MotionSelector {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            slow_threshold: config.slow_threshold,
            fast_threshold: config.fast_threshold,
            index_smoothing: config.index_smoothing,
            log_retention: config.log_retention_secs,
            coverage_window: config.coverage_window_secs,
            current_motion: INITIAL_MOTION,
            smoothed_index: INITIAL_MOTION as f32,
            last_change_time: 0.0,
            change_log: VecDeque::new(),
        }
    }

    /// Discrete bucket for a score. Boundary values resolve to the upper
    /// bucket: 0.35 is already medium, 0.6 already fast.
    pub fn bucket(&self, score: f32) -> usize {
        if score < self.slow_threshold {
            0
        } else if score < self.fast_threshold {
            1
        } else {
            2
        }
    }

    /// Run one transition step. Call only at cycle boundaries.
    ///
    /// Returns the committed change, or `None` when the smoothed candidate
    /// still rounds to the current motion.
    pub fn evaluate(&mut self, reading: &EnergyReading, now: f64) -> Option<MotionChange> {
        let bucket = self.bucket(reading.motion_score);

        self.smoothed_index =
            self.smoothed_index * self.index_smoothing + bucket as f32 * (1.0 - self.index_smoothing);
        let candidate = (self.smoothed_index.round() as usize).min(MOTION_COUNT - 1);

        if candidate == self.current_motion {
            return None;
        }

        self.current_motion = candidate;
        self.last_change_time = now;

        let change = MotionChange {
            time: now,
            motion: candidate,
            score: reading.motion_score,
            energy: reading.smoothed_energy,
            treble_ratio: reading.treble_ratio,
        };
        self.change_log.push_back(change);
        self.prune_log(now);

        Some(change)
    }

    fn prune_log(&mut self, now: f64) {
        while let Some(oldest) = self.change_log.front() {
            if now - oldest.time >= self.log_retention {
                self.change_log.pop_front();
            } else {
                break;
            }
        }
    }

    /// True when every motion appears in the change log within the trailing
    /// coverage window. Purely observational; nothing acts on it.
    pub fn coverage_complete(&self, now: f64) -> bool {
        let mut seen = [false; MOTION_COUNT];
        for change in self.change_log.iter().rev() {
            if now - change.time >= self.coverage_window {
                break;
            }
            seen[change.motion] = true;
        }
        seen.iter().all(|&s| s)
    }

    pub fn current_motion(&self) -> usize {
        self.current_motion
    }

    pub fn smoothed_index(&self) -> f32 {
        self.smoothed_index
    }

    pub fn last_change_time(&self) -> f64 {
        self.last_change_time
    }

    pub fn change_log(&self) -> &VecDeque<MotionChange> {
        &self.change_log
    }

    /// Re-anchor the change timestamp after paused playback resumes, so dwell
    /// accounting does not count the pause.
    pub fn reanchor(&mut self, now: f64) {
        self.last_change_time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading_with_score(score: f32) -> EnergyReading {
        EnergyReading {
            motion_score: score,
            ..EnergyReading::default()
        }
    }

    fn selector() -> MotionSelector {
        MotionSelector::new(&EngineConfig::classic())
    }

    #[test]
    fn test_bucket_boundaries_resolve_upward() {
        let selector = selector();
        assert_eq!(selector.bucket(0.0), 0);
        assert_eq!(selector.bucket(0.349), 0);
        assert_eq!(selector.bucket(0.35), 1);
        assert_eq!(selector.bucket(0.599), 1);
        assert_eq!(selector.bucket(0.6), 2);
        assert_eq!(selector.bucket(1.0), 2);
    }

    #[test]
    fn test_high_score_commits_fast_after_smoothing() {
        let mut selector = selector();
        let reading = reading_with_score(0.9);

        // 1.0 -> 1.3 still rounds to the current motion
        assert!(selector.evaluate(&reading, 1.0).is_none());
        assert_eq!(selector.current_motion(), 1);

        // 1.3 -> 1.51 rounds up: commit
        let change = selector
            .evaluate(&reading, 2.0)
            .expect("second boundary should commit");
        assert_eq!(change.motion, 2);
        assert_eq!(selector.current_motion(), 2);
    }

    #[test]
    fn test_silence_converges_to_slow() {
        let mut selector = selector();
        let silent = reading_with_score(0.0);

        let mut commits = Vec::new();
        for boundary in 0..10 {
            if let Some(change) = selector.evaluate(&silent, boundary as f64) {
                commits.push(change.motion);
            }
        }

        assert_eq!(selector.current_motion(), 0);
        assert_eq!(commits, vec![0], "one commit, straight to slow");
    }

    #[test]
    fn test_stable_score_commits_at_most_once() {
        let mut selector = selector();
        let reading = reading_with_score(0.7);

        let mut change_count = 0;
        for boundary in 0..20 {
            if selector.evaluate(&reading, boundary as f64).is_some() {
                change_count += 1;
            }
        }

        assert_eq!(change_count, 1, "steady input must settle, not oscillate");
        assert_eq!(selector.current_motion(), 2);
    }

    #[test]
    fn test_log_retention() {
        let mut selector = selector();

        // Alternate between fast and slow so every evaluation window commits
        selector.evaluate(&reading_with_score(0.9), 1.0);
        selector.evaluate(&reading_with_score(0.9), 2.0);
        for boundary in 0..6 {
            selector.evaluate(&reading_with_score(0.0), 10.0 + boundary as f64);
        }
        let logged_before = selector.change_log().len();
        assert!(logged_before >= 2, "expected multiple committed changes");

        // A commit a minute later prunes everything older than retention
        for boundary in 0..6 {
            let now = 100.0 + boundary as f64;
            selector.evaluate(&reading_with_score(0.9), now);
        }
        assert!(selector
            .change_log()
            .iter()
            .all(|change| change.time >= 100.0 - 60.0));
    }

    #[test]
    fn test_coverage_needs_all_motions() {
        let mut selector = selector();

        // Straight drop to slow: only motions {0} in the log
        for boundary in 0..4 {
            selector.evaluate(&reading_with_score(0.0), boundary as f64);
        }
        assert!(!selector.coverage_complete(4.0));

        // Climb back through medium to fast: {0, 1, 2} within the window
        for boundary in 4..14 {
            selector.evaluate(&reading_with_score(0.9), boundary as f64);
        }
        assert_eq!(selector.current_motion(), 2);
        assert!(selector.coverage_complete(14.0));

        // Outside the 30 second window the old visits no longer count
        assert!(!selector.coverage_complete(100.0));
    }
}
