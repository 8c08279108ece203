//! Configuration file management.
//!
//! Handles loading and saving user preferences to `~/.stitchbeat.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use stitchbeat_engine::{EngineConfig, MotionStyle, Rgb, MOTION_COUNT};

const DEFAULT_DEVICE_TIMEOUT_SECS: u64 = 3;
const DEFAULT_CLIPS_DIR: &str = "motions";

const CONFIG_TEMPLATE: &str = r##"# stitchbeat configuration file

# Timeout in seconds when probing audio devices (default: 3)
# device_timeout_secs = 3

# Last selected audio device (auto-saved)
# last_device = "Device Name"
# last_device_is_input = false

# Directory scanned for motion clip documents (default: "motions")
# clips_dir = "motions"

# Scoring preset: "classic" or "punchy" (default: classic)
# preset = "classic"

# =============================================================================
# Engine Tuning
# =============================================================================
# An [engine] table replaces the preset entirely; unset fields fall back to
# the classic values.

# [engine]
# energy_decay = 0.85       # EMA decay on total band energy
# energy_scale = 3500.0     # Band energy that maps to a normalized 1.0
# treble_scale = 1.2        # Treble ratio that maps to a normalized 1.0
# energy_weight = 0.45      # Score weight of normalized energy
# treble_weight = 0.55      # Score weight of normalized treble
# slow_threshold = 0.35     # Scores below this: slow motion
# fast_threshold = 0.6      # Scores at or above this: fast motion
# index_smoothing = 0.7     # EMA on the motion index between commits
# frame_duration = 0.16666  # Seconds per clip frame
# volume_decay = 0.88       # EMA decay on the accent volume envelope
# volume_gain = 1.8         # Gain on waveform RMS before clamping to 1.0

# =============================================================================
# Motion Styles
# =============================================================================
# One block per motion in order (slow, medium, fast). Colors are "#rrggbb";
# accent_ramp runs from the grid center outward.

# [[motion]]
# body_color = "#000000"
# accent_ramp = ["#e2d8bc", "#579355", "#2f5e1f"]

# [[motion]]
# body_color = "#000000"
# accent_ramp = ["#e2d8bc", "#c10000", "#2f5e1f"]

# [[motion]]
# body_color = "#000000"
# accent_ramp = ["#e2d8b8", "#e17a7a", "#9b0000"]
"##;

/// Per-motion style overrides. Unset fields keep the default palette entry.
#[derive(Serialize, Deserialize, Clone, Default)]
pub struct MotionStyleConfig {
    pub body_color: Option<Rgb>,
    pub accent_ramp: Option<Vec<Rgb>>,
}

#[derive(Serialize, Deserialize, Default)]
pub struct Config {
    pub last_device: Option<String>,
    pub last_device_is_input: Option<bool>,
    pub device_timeout_secs: Option<u64>,
    pub clips_dir: Option<String>,
    pub preset: Option<String>,

    pub engine: Option<EngineConfig>,
    pub motion: Option<Vec<MotionStyleConfig>>,
}

impl Config {
    fn path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(".stitchbeat.toml"))
    }

    pub fn load() -> Self {
        let path = match Self::path() {
            Some(p) => p,
            None => return Self::default(),
        };

        // Create template file if it doesn't exist
        if !path.exists() {
            let _ = fs::write(&path, CONFIG_TEMPLATE);
            println!("Created config template at {:?}", path);
        }

        fs::read_to_string(&path)
            .ok()
            .and_then(|s| toml::from_str(&s).ok())
            .unwrap_or_default()
    }

    pub fn save(&self) {
        if let Some(path) = Self::path() {
            if let Ok(content) = toml::to_string(self) {
                let _ = fs::write(&path, &content);
                println!("Config saved to {:?}", path);
            }
        }
    }

    pub fn set_device(&mut self, name: &str, is_input: bool) {
        self.last_device = Some(name.to_string());
        self.last_device_is_input = Some(is_input);
        self.save();
    }

    pub fn device_timeout_secs(&self) -> u64 {
        self.device_timeout_secs
            .unwrap_or(DEFAULT_DEVICE_TIMEOUT_SECS)
    }

    pub fn clips_dir(&self) -> PathBuf {
        PathBuf::from(self.clips_dir.as_deref().unwrap_or(DEFAULT_CLIPS_DIR))
    }

    /// Engine tuning: an explicit `[engine]` table wins, then the named
    /// preset, then the classic defaults.
    pub fn engine_config(&self) -> EngineConfig {
        if let Some(engine) = self.engine {
            return engine;
        }
        self.preset
            .as_deref()
            .and_then(EngineConfig::preset)
            .unwrap_or_default()
    }

    /// Motion styles with config overrides applied over the default palette.
    pub fn styles(&self) -> [MotionStyle; MOTION_COUNT] {
        let mut styles = MotionStyle::default_set();

        if let Some(overrides) = &self.motion {
            for (style, override_entry) in styles.iter_mut().zip(overrides.iter()) {
                if let Some(body) = override_entry.body_color {
                    style.body_color = body;
                }
                if let Some(ramp) = &override_entry.accent_ramp {
                    style.accent_ramp = ramp.clone();
                }
            }
        }

        styles
    }
}
