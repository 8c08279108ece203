//! Motion selection pipeline: score the audio, pick a motion, cycle frames.

pub mod classifier;
pub mod cycler;
pub mod selector;

pub use classifier::{EnergyClassifier, EnergyReading};
pub use cycler::FrameCycler;
pub use selector::{MotionChange, MotionSelector};
