//! Bridges live capture into the engine's analysis source.

use std::time::Instant;

use stitchbeat_engine::{AnalysisSource, SpectrumAnalyzer, SNAPSHOT_BINS};

use super::AudioCapture;

/// Live microphone/monitor input as an [`AnalysisSource`].
///
/// Playback time is wall time since the stream was attached; a live capture
/// has no seeking and no duration.
pub struct LiveInput {
    capture: AudioCapture,
    analyzer: SpectrumAnalyzer,
    started: Instant,
}

impl LiveInput {
    pub fn new(capture: AudioCapture) -> Self {
        Self {
            capture,
            analyzer: SpectrumAnalyzer::new(),
            started: Instant::now(),
        }
    }

    fn refresh(&mut self) {
        let samples = self.capture.samples();
        self.analyzer.push_samples(&samples);
        self.analyzer.set_clock(self.started.elapsed().as_secs_f64());
    }
}

impl AnalysisSource for LiveInput {
    fn frequency_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
        self.refresh();
        self.analyzer.frequency_snapshot()
    }

    // Uses the samples pulled by the frequency snapshot of the same tick, so
    // both snapshots describe the same audio window.
    fn time_domain_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
        self.analyzer.time_domain_snapshot()
    }

    fn playback_time(&self) -> f64 {
        self.analyzer.playback_time()
    }
}
