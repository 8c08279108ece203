//! Engine tuning constants.
//!
//! Every threshold, decay and weight the pipeline uses lives here as a named
//! field so it can be overridden from a config file without touching code.
//! The defaults are the pattern editor's hand-tuned values; treat them as
//! calibrated data, not round numbers to clean up.

use serde::{Deserialize, Serialize};

/// Number of selectable motion clips (slow, medium, fast)
pub const MOTION_COUNT: usize = 3;

/// Tuning constants for the motion engine.
///
/// Unset fields in a partial TOML/JSON override fall back to [`classic`].
///
/// [`classic`]: EngineConfig::classic
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Per-tick EMA decay applied to total band energy
    pub energy_decay: f32,
    /// Total band energy that maps to a normalized energy of 1.0
    pub energy_scale: f32,
    /// Treble/bass ratio that maps to a normalized treble of 1.0
    pub treble_scale: f32,
    /// Weight of normalized energy in the motion score
    pub energy_weight: f32,
    /// Weight of normalized treble in the motion score
    pub treble_weight: f32,
    /// Scores below this land in the slow bucket
    pub slow_threshold: f32,
    /// Scores below this (and at or above `slow_threshold`) land in the
    /// medium bucket; the boundary value itself is fast
    pub fast_threshold: f32,
    /// EMA factor applied to the numeric motion index between commits
    pub index_smoothing: f32,
    /// Seconds each of the six clip frames is shown (full cycle = 6x this)
    pub frame_duration: f64,
    /// Per-tick EMA decay applied to the accent volume envelope
    pub volume_decay: f32,
    /// Gain applied to the time-domain RMS before clamping to 1.0
    pub volume_gain: f32,
    /// Seconds a motion change stays in the change log
    pub log_retention_secs: f64,
    /// Trailing window for the all-motions-seen coverage diagnostic
    pub coverage_window_secs: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl EngineConfig {
    /// The editor's original tuning: long energy memory, treble-led scoring.
    pub fn classic() -> Self {
        Self {
            energy_decay: 0.85,
            energy_scale: 3500.0,
            treble_scale: 1.2,
            energy_weight: 0.45,
            treble_weight: 0.55,
            slow_threshold: 0.35,
            fast_threshold: 0.6,
            index_smoothing: 0.7,
            frame_duration: 1.0 / 6.0,
            volume_decay: 0.88,
            volume_gain: 1.8,
            log_retention_secs: 60.0,
            coverage_window_secs: 30.0,
        }
    }

    /// Faster-reacting variant: shorter energy memory, more weight on raw
    /// energy than on treble balance.
    pub fn punchy() -> Self {
        Self {
            energy_decay: 0.7,
            energy_weight: 0.6,
            treble_weight: 0.4,
            ..Self::classic()
        }
    }

    /// Look up a preset by name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "punchy" => Some(Self::punchy()),
            _ => None,
        }
    }
}
