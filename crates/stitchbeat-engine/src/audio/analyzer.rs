//! FFT-based realization of [`AnalysisSource`].
//!
//! Runs a Hann-windowed forward FFT over a short ring of recent mono samples
//! and converts bin magnitudes to the byte scale the classifier was tuned
//! against: per-bin EMA smoothing, then decibels mapped from a fixed window
//! onto 0..=255. Time-domain snapshots read the newest samples directly.

use num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

use super::source::{AnalysisSource, SNAPSHOT_BINS};

/// FFT size - small on purpose; the classifier wants coarse band sums at a
/// fast cadence, not fine frequency resolution
const FFT_SIZE: usize = 2 * SNAPSHOT_BINS;

/// Per-bin EMA retention between snapshots (the analyser node's smoothing
/// time constant)
const SMOOTHING_TIME_CONSTANT: f32 = 0.8;

/// Decibel window mapped onto the 0..=255 byte range
const MIN_DECIBELS: f32 = -100.0;
const MAX_DECIBELS: f32 = -30.0;

/// Streaming spectral analyzer over a mono sample feed.
///
/// Push samples as they arrive, read snapshots once per tick. The per-bin
/// smoothing state advances once per [`frequency_snapshot`] call, so call it
/// exactly once per tick.
///
/// [`frequency_snapshot`]: AnalysisSource::frequency_snapshot
pub struct SpectrumAnalyzer {
    fft: Arc<dyn Fft<f32>>,
    fft_buffer: Vec<Complex<f32>>,
    fft_window: Vec<f32>,
    samples: Vec<f32>,
    smoothed_bins: [f32; SNAPSHOT_BINS],
    clock: f64,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(FFT_SIZE);

        // Pre-compute Hann window
        let fft_window: Vec<f32> = (0..FFT_SIZE)
            .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / FFT_SIZE as f32).cos()))
            .collect();

        Self {
            fft,
            fft_buffer: vec![Complex::new(0.0, 0.0); FFT_SIZE],
            fft_window,
            samples: vec![0.0; FFT_SIZE],
            smoothed_bins: [0.0; SNAPSHOT_BINS],
            clock: 0.0,
        }
    }

    /// Append fresh mono samples, keeping the newest [`FFT_SIZE`] of them.
    pub fn push_samples(&mut self, samples: &[f32]) {
        for &sample in samples {
            self.samples.remove(0);
            self.samples.push(sample);
        }
    }

    /// Set the playback clock reported through [`AnalysisSource`].
    pub fn set_clock(&mut self, seconds: f64) {
        self.clock = seconds;
    }

    /// Drop accumulated samples and smoothing state, keeping the clock.
    pub fn reset(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = 0.0);
        self.smoothed_bins = [0.0; SNAPSHOT_BINS];
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisSource for SpectrumAnalyzer {
    fn frequency_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
        // Window and fill the pre-allocated buffer
        for i in 0..FFT_SIZE {
            self.fft_buffer[i] = Complex::new(self.samples[i] * self.fft_window[i], 0.0);
        }

        self.fft.process(&mut self.fft_buffer);

        let mut snapshot = [0u8; SNAPSHOT_BINS];
        let db_range = MAX_DECIBELS - MIN_DECIBELS;

        for (i, byte) in snapshot.iter_mut().enumerate() {
            let magnitude = self.fft_buffer[i].norm() / FFT_SIZE as f32;

            self.smoothed_bins[i] = self.smoothed_bins[i] * SMOOTHING_TIME_CONSTANT
                + magnitude * (1.0 - SMOOTHING_TIME_CONSTANT);

            let db = 20.0 * (self.smoothed_bins[i] + 1e-10).log10();
            let scaled = 255.0 * (db - MIN_DECIBELS) / db_range;
            *byte = scaled.clamp(0.0, 255.0) as u8;
        }

        snapshot
    }

    fn time_domain_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
        let mut snapshot = [0u8; SNAPSHOT_BINS];
        let newest = &self.samples[FFT_SIZE - SNAPSHOT_BINS..];

        for (byte, &sample) in snapshot.iter_mut().zip(newest) {
            // 128 = silence, full scale hits 0 and 255
            *byte = (128.0 * (1.0 + sample)).clamp(0.0, 255.0) as u8;
        }

        snapshot
    }

    fn playback_time(&self) -> f64 {
        self.clock
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silence_snapshots() {
        let mut analyzer = SpectrumAnalyzer::new();

        let freq = analyzer.frequency_snapshot();
        assert!(
            freq.iter().all(|&b| b == 0),
            "silence should sit at the -100 dB floor"
        );

        let wave = analyzer.time_domain_snapshot();
        assert!(wave.iter().all(|&b| b == 128), "silence should center at 128");
    }

    #[test]
    fn test_sine_concentrates_energy_in_its_bin() {
        let mut analyzer = SpectrumAnalyzer::new();

        // Period-16 sine lands exactly in bin 16 of a 256-point FFT
        let tone: Vec<f32> = (0..FFT_SIZE)
            .map(|i| 0.02 * (2.0 * std::f32::consts::PI * i as f32 / 16.0).sin())
            .collect();
        analyzer.push_samples(&tone);

        // Let the per-bin EMA converge
        let mut snapshot = [0u8; SNAPSHOT_BINS];
        for _ in 0..30 {
            snapshot = analyzer.frequency_snapshot();
        }

        let peak_bin = snapshot
            .iter()
            .enumerate()
            .max_by_key(|&(_, &b)| b)
            .map(|(i, _)| i)
            .expect("snapshot is non-empty");
        assert_eq!(peak_bin, 16, "energy should concentrate in bin 16");
        assert!(snapshot[16] > 0);

        // Bins far from the tone stay near the floor
        assert!(
            snapshot[40..].iter().all(|&b| b < 40),
            "distant bins should stay quiet, got {:?}",
            &snapshot[40..48]
        );
    }

    #[test]
    fn test_time_domain_tracks_amplitude() {
        let mut analyzer = SpectrumAnalyzer::new();

        analyzer.push_samples(&vec![1.0; FFT_SIZE]);
        let wave = analyzer.time_domain_snapshot();
        assert!(wave.iter().all(|&b| b == 255), "full positive scale clamps to 255");

        analyzer.push_samples(&vec![-1.0; FFT_SIZE]);
        let wave = analyzer.time_domain_snapshot();
        assert!(wave.iter().all(|&b| b == 0), "full negative scale clamps to 0");
    }

    #[test]
    fn test_push_keeps_newest_samples() {
        let mut analyzer = SpectrumAnalyzer::new();

        analyzer.push_samples(&vec![1.0; FFT_SIZE]);
        analyzer.push_samples(&vec![0.5; SNAPSHOT_BINS]);

        // The time-domain view reads the newest SNAPSHOT_BINS samples
        let wave = analyzer.time_domain_snapshot();
        assert!(
            wave.iter().all(|&b| b == 192),
            "newest samples should all read 0.5 -> 192"
        );
    }

    #[test]
    fn test_clock_passthrough() {
        let mut analyzer = SpectrumAnalyzer::new();
        assert_eq!(analyzer.playback_time(), 0.0);
        analyzer.set_clock(12.5);
        assert_eq!(analyzer.playback_time(), 12.5);
        assert!(analyzer.duration().is_infinite());
    }
}
