//! Band energy extraction and motion scoring.
//!
//! Splits a frequency snapshot into bass/mid/treble bands by fixed bin
//! fractions, smooths total energy over time, and folds normalized energy and
//! treble balance into a single motion score in [0, 1]. High score means the
//! music asks for a faster motion.

use crate::audio::SNAPSHOT_BINS;
use crate::config::EngineConfig;

/// Bass band covers the lowest 10% of bins
const BASS_FRACTION: f32 = 0.1;
/// Mid band ends at 50% of bins
const MID_FRACTION: f32 = 0.5;
/// Treble band starts at 60% of bins; [50%, 60%) is a deliberate dead zone
/// that keeps presence-range mush out of both mid and treble sums
const TREBLE_FRACTION: f32 = 0.6;

/// Band energies and derived score for one analysis tick.
#[derive(Clone, Copy, Debug, Default)]
pub struct EnergyReading {
    /// Sum of byte magnitudes in the bass band
    pub bass_energy: f32,
    /// Sum of byte magnitudes in the mid band
    pub mid_energy: f32,
    /// Sum of byte magnitudes in the treble band
    pub treble_energy: f32,
    /// EMA of the per-tick total across all three bands
    pub smoothed_energy: f32,
    /// Treble relative to bass: `treble / (bass + 1)`
    pub treble_ratio: f32,
    /// Weighted combination of normalized energy and treble, in [0, 1]
    pub motion_score: f32,
}

/// Converts frequency snapshots into [`EnergyReading`]s. Call once per tick.
pub struct EnergyClassifier {
    // Band bin ranges (pre-computed)
    bass_bins: std::ops::Range<usize>,
    mid_bins: std::ops::Range<usize>,
    treble_bins: std::ops::Range<usize>,

    energy_decay: f32,
    energy_scale: f32,
    treble_scale: f32,
    energy_weight: f32,
    treble_weight: f32,

    smoothed_energy: f32,
    last_reading: EnergyReading,
}

impl EnergyClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        let bass_end = (SNAPSHOT_BINS as f32 * BASS_FRACTION).floor() as usize;
        let mid_end = (SNAPSHOT_BINS as f32 * MID_FRACTION).floor() as usize;
        let treble_start = (SNAPSHOT_BINS as f32 * TREBLE_FRACTION).floor() as usize;

        Self {
            bass_bins: 0..bass_end,
            mid_bins: bass_end..mid_end,
            treble_bins: treble_start..SNAPSHOT_BINS,
            energy_decay: config.energy_decay,
            energy_scale: config.energy_scale,
            treble_scale: config.treble_scale,
            energy_weight: config.energy_weight,
            treble_weight: config.treble_weight,
            smoothed_energy: 0.0,
            last_reading: EnergyReading::default(),
        }
    }

    /// Fold one frequency snapshot into the running state.
    pub fn process(&mut self, bins: &[u8; SNAPSHOT_BINS]) -> EnergyReading {
        let band_sum = |range: &std::ops::Range<usize>| -> f32 {
            bins[range.clone()].iter().map(|&b| b as f32).sum()
        };

        let bass_energy = band_sum(&self.bass_bins);
        let mid_energy = band_sum(&self.mid_bins);
        let treble_energy = band_sum(&self.treble_bins);
        let total = bass_energy + mid_energy + treble_energy;

        self.smoothed_energy =
            self.smoothed_energy * self.energy_decay + total * (1.0 - self.energy_decay);

        // +1 in the denominator keeps silence from exploding the ratio
        let treble_ratio = treble_energy / (bass_energy + 1.0);

        let normalized_energy = (self.smoothed_energy / self.energy_scale).min(1.0);
        let normalized_treble = (treble_ratio / self.treble_scale).min(1.0);
        let motion_score =
            normalized_energy * self.energy_weight + normalized_treble * self.treble_weight;

        self.last_reading = EnergyReading {
            bass_energy,
            mid_energy,
            treble_energy,
            smoothed_energy: self.smoothed_energy,
            treble_ratio,
            motion_score,
        };

        self.last_reading
    }

    /// Most recent reading, unchanged until the next [`process`] call.
    ///
    /// [`process`]: EnergyClassifier::process
    pub fn last_reading(&self) -> EnergyReading {
        self.last_reading
    }

    /// Clear the energy EMA (useful when the audio source changes).
    pub fn reset(&mut self) {
        self.smoothed_energy = 0.0;
        self.last_reading = EnergyReading::default();
    }
}
