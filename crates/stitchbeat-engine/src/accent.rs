//! Loudness-driven accent coloring.
//!
//! Accent cells pick their color from the active motion's ramp using two
//! indices added together: a spatial layer from the cell's ring distance to
//! the grid center, and a loudness offset from the smoothed waveform RMS.
//! Louder music pushes every ring deeper into the ramp, so the accent
//! visually "heats up" from the center outward.

use crate::audio::SNAPSHOT_BINS;
use crate::clip::GRID_SIZE;
use crate::color::{MotionStyle, Rgb};
use crate::config::EngineConfig;

pub struct AccentColorMapper {
    volume_decay: f32,
    volume_gain: f32,
    smoothed_volume: f32,
}

impl AccentColorMapper {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            volume_decay: config.volume_decay,
            volume_gain: config.volume_gain,
            smoothed_volume: 0.0,
        }
    }

    /// Fold one time-domain snapshot into the smoothed volume and return the
    /// updated value.
    ///
    /// Waveform bytes are centered on 128, so RMS is computed on the signed
    /// [-1.0, 1.0] signal they encode.
    pub fn process(&mut self, waveform: &[u8; SNAPSHOT_BINS]) -> f32 {
        let mut sum_squares = 0.0f32;
        for &byte in waveform.iter() {
            let centered = (byte as f32 - 128.0) / 128.0;
            sum_squares += centered * centered;
        }
        let rms = (sum_squares / SNAPSHOT_BINS as f32).sqrt();
        let volume = (rms * self.volume_gain).min(1.0);

        self.smoothed_volume =
            self.smoothed_volume * self.volume_decay + volume * (1.0 - self.volume_decay);
        self.smoothed_volume
    }

    pub fn smoothed_volume(&self) -> f32 {
        self.smoothed_volume
    }

    /// Ramp color for an accent cell of the given style.
    pub fn color_at(&self, style: &MotionStyle, row: usize, col: usize) -> Rgb {
        let ramp = &style.accent_ramp;
        if ramp.is_empty() {
            return style.body_color;
        }
        let last = ramp.len() - 1;

        let center = (GRID_SIZE / 2) as isize;
        let ring = (row as isize - center)
            .abs()
            .max((col as isize - center).abs()) as f32;
        let layer_ratio = (ring / center as f32).min(1.0);

        let layer = (layer_ratio * last as f32).floor() as usize;
        let offset = ((self.smoothed_volume * ramp.len() as f32).floor() as usize).min(last);

        ramp[(layer + offset).min(last)]
    }

    /// Color used for accent cells while no audio source is attached: the
    /// coolest ramp entry, independent of any stale volume state.
    pub fn idle_color(style: &MotionStyle) -> Rgb {
        style
            .accent_ramp
            .first()
            .copied()
            .unwrap_or(style.body_color)
    }

    pub fn reset(&mut self) {
        self.smoothed_volume = 0.0;
    }
}
