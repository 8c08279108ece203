//! Music-reactive motion selection for the stitch-pattern animator.
//!
//! This crate turns a live audio signal into deterministic animation decisions:
//! which of three pre-authored 6-frame motion clips should play, which frame of
//! it is showing right now, and what color each accent cell gets. The pipeline
//! runs once per display tick:
//!
//! analyzer → energy classifier → motion selector → { frame cycler, accent mapper }
//!
//! Motions only change at clip cycle boundaries, so every committed motion
//! plays at least one complete 6-frame pass. All tuning constants live in
//! [`EngineConfig`] and default to the pattern editor's hand-tuned values.

pub mod accent;
pub mod audio;
pub mod clip;
pub mod color;
pub mod config;
pub mod error;
pub mod motion;
pub mod session;

pub use accent::AccentColorMapper;
pub use audio::{AnalysisSource, SpectrumAnalyzer, SNAPSHOT_BINS};
pub use clip::{CellOverlays, ClipFrame, MotionClip, Overlay, FRAME_COUNT, GRID_SIZE};
pub use color::{MotionStyle, Rgb};
pub use config::{EngineConfig, MOTION_COUNT};
pub use error::{ClipError, ColorParseError};
pub use motion::{EnergyClassifier, EnergyReading, FrameCycler, MotionChange, MotionSelector};
pub use session::{MotionSession, RenderInstruction};
