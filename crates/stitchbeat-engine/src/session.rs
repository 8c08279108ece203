//! Session facade over the whole pipeline.
//!
//! [`MotionSession`] owns the analyzer consumers, the selection state machine,
//! the frame clock, the accent envelope, and the loaded clips. The embedding
//! application drives it with one [`tick`] per display frame and reads back a
//! [`RenderInstruction`] plus per-cell colors.
//!
//! [`tick`]: MotionSession::tick

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::accent::AccentColorMapper;
use crate::audio::AnalysisSource;
use crate::clip::{ClipFrame, MotionClip};
use crate::color::{MotionStyle, Rgb};
use crate::config::{EngineConfig, MOTION_COUNT};
use crate::error::ClipError;
use crate::motion::{EnergyClassifier, EnergyReading, FrameCycler, MotionChange, MotionSelector};

/// Everything the renderer needs from one tick.
#[derive(Clone, Copy, Debug)]
pub struct RenderInstruction {
    /// Active motion after this tick
    pub motion_index: usize,
    /// Frame of the active clip to draw
    pub frame_index: usize,
    /// True when this tick crossed a cycle boundary
    pub cycle_completed: bool,
    /// True when this tick committed a motion change
    pub motion_changed: bool,
    /// False when the active motion has no clip loaded
    pub has_clip: bool,
}

/// The music-reactive motion engine.
///
/// Without an attached audio source the session keeps cycling frames of the
/// current motion and paints accent cells in their idle color; selection is
/// suspended until audio returns.
pub struct MotionSession {
    config: EngineConfig,
    source: Option<Box<dyn AnalysisSource>>,
    classifier: EnergyClassifier,
    selector: MotionSelector,
    cycler: FrameCycler,
    accent: AccentColorMapper,
    clips: [Option<MotionClip>; MOTION_COUNT],
    styles: [MotionStyle; MOTION_COUNT],
    last_reading: EnergyReading,
    missing_clip_reported: [bool; MOTION_COUNT],
}

impl MotionSession {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            source: None,
            classifier: EnergyClassifier::new(&config),
            selector: MotionSelector::new(&config),
            cycler: FrameCycler::new(config.frame_duration),
            accent: AccentColorMapper::new(&config),
            clips: std::array::from_fn(|_| None),
            styles: MotionStyle::default_set(),
            last_reading: EnergyReading::default(),
            missing_clip_reported: [false; MOTION_COUNT],
        }
    }

    /// Run one tick at playback time `now` (seconds).
    ///
    /// Snapshots audio, advances the frame clock, and re-evaluates the motion
    /// choice if a cycle boundary was crossed. Motion changes can only happen
    /// on ticks where `cycle_completed` is true.
    pub fn tick(&mut self, now: f64) -> RenderInstruction {
        if let Some(source) = self.source.as_mut() {
            let spectrum = source.frequency_snapshot();
            self.last_reading = self.classifier.process(&spectrum);

            let waveform = source.time_domain_snapshot();
            self.accent.process(&waveform);
        }

        let cycle_completed = self.cycler.advance(now);

        let mut motion_changed = false;
        if cycle_completed && self.source.is_some() {
            if let Some(change) = self.selector.evaluate(&self.last_reading, now) {
                motion_changed = true;
                info!(
                    motion = change.motion,
                    score = change.score,
                    energy = change.energy,
                    "motion change committed"
                );
                if self.selector.coverage_complete(now) {
                    debug!("all motions visited within the coverage window");
                }
            }
        }

        let motion_index = self.selector.current_motion();
        let has_clip = self.clips[motion_index].is_some();
        if !has_clip && !self.missing_clip_reported[motion_index] {
            self.missing_clip_reported[motion_index] = true;
            warn!(motion = motion_index, "active motion has no clip loaded");
        }

        RenderInstruction {
            motion_index,
            frame_index: self.cycler.frame_index(),
            cycle_completed,
            motion_changed,
            has_clip,
        }
    }

    /// Attach the audio source feeding selection. Analysis state restarts
    /// from silence; the current motion is kept.
    pub fn attach_source(&mut self, source: Box<dyn AnalysisSource>) {
        self.classifier.reset();
        self.accent.reset();
        self.source = Some(source);
    }

    /// Detach the audio source. Selection suspends and accent cells fall back
    /// to their idle color; the current motion keeps playing.
    pub fn detach_source(&mut self) {
        self.source = None;
        self.accent.reset();
    }

    pub fn has_source(&self) -> bool {
        self.source.is_some()
    }

    /// Playback position of the attached source, if any.
    pub fn source_time(&self) -> Option<f64> {
        self.source.as_ref().map(|s| s.playback_time())
    }

    /// Parse a clip document and install it for `motion`.
    pub fn load_clip(&mut self, motion: usize, bytes: &[u8]) -> Result<(), ClipError> {
        let clip = MotionClip::from_json(bytes)?;
        self.set_clip(motion, clip);
        Ok(())
    }

    /// Install an already-parsed clip for `motion`.
    pub fn set_clip(&mut self, motion: usize, clip: MotionClip) {
        self.clips[motion] = Some(clip);
        self.missing_clip_reported[motion] = false;
    }

    pub fn clip(&self, motion: usize) -> Option<&MotionClip> {
        self.clips[motion].as_ref()
    }

    pub fn set_style(&mut self, motion: usize, style: MotionStyle) {
        self.styles[motion] = style;
    }

    pub fn set_styles(&mut self, styles: [MotionStyle; MOTION_COUNT]) {
        self.styles = styles;
    }

    pub fn style(&self, motion: usize) -> &MotionStyle {
        &self.styles[motion]
    }

    /// Frame of the active clip to draw now, or `None` when no clip is
    /// loaded for the active motion.
    pub fn current_frame(&self) -> Option<&ClipFrame> {
        self.clips[self.selector.current_motion()]
            .as_ref()
            .map(|clip| clip.frame(self.cycler.frame_index()))
    }

    /// Color for body cells of the active motion.
    pub fn body_color(&self) -> Rgb {
        self.styles[self.selector.current_motion()].body_color
    }

    /// Color for an accent cell of the active motion at `(row, col)`.
    pub fn accent_color(&self, row: usize, col: usize) -> Rgb {
        let style = &self.styles[self.selector.current_motion()];
        if self.source.is_some() {
            self.accent.color_at(style, row, col)
        } else {
            AccentColorMapper::idle_color(style)
        }
    }

    /// Handle a seek: restart the cycle at the new position and re-anchor
    /// dwell accounting. No motion change and no cycle boundary is reported.
    pub fn seek(&mut self, now: f64) {
        self.resume(now);
    }

    /// Handle playback resuming after a pause. Same reset as [`seek`]: the
    /// gap must not count as dwell time or as elapsed frames.
    ///
    /// [`seek`]: MotionSession::seek
    pub fn resume(&mut self, now: f64) {
        self.cycler.restart(now);
        self.selector.reanchor(now);
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_motion(&self) -> usize {
        self.selector.current_motion()
    }

    pub fn frame_index(&self) -> usize {
        self.cycler.frame_index()
    }

    pub fn last_reading(&self) -> EnergyReading {
        self.last_reading
    }

    pub fn smoothed_volume(&self) -> f32 {
        self.accent.smoothed_volume()
    }

    pub fn change_log(&self) -> &VecDeque<MotionChange> {
        self.selector.change_log()
    }

    pub fn coverage_complete(&self, now: f64) -> bool {
        self.selector.coverage_complete(now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SNAPSHOT_BINS;

    /// Treble-heavy source that pins the motion score at the fast end.
    struct LoudSource;

    impl AnalysisSource for LoudSource {
        fn frequency_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
            let mut bins = [0u8; SNAPSHOT_BINS];
            for bin in bins[..12].iter_mut() {
                *bin = 40;
            }
            for bin in bins[76..].iter_mut() {
                *bin = 220;
            }
            bins
        }

        fn time_domain_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
            [200u8; SNAPSHOT_BINS]
        }

        fn playback_time(&self) -> f64 {
            0.0
        }
    }

    #[test]
    fn test_no_source_holds_motion_and_idles_accent() {
        let mut session = MotionSession::new(EngineConfig::classic());

        for n in 0..30 {
            let frame = session.tick(n as f64 * 0.5);
            assert!(!frame.motion_changed);
            assert!(!frame.has_clip);
            assert_eq!(frame.motion_index, 1);
        }

        let idle = AccentColorMapper::idle_color(session.style(1));
        assert_eq!(session.accent_color(22, 22), idle);
        assert_eq!(session.accent_color(0, 0), idle);
    }

    #[test]
    fn test_loud_source_commits_fast_at_boundaries_only() {
        let mut session = MotionSession::new(EngineConfig::classic());
        session.attach_source(Box::new(LoudSource));

        let mut commit_times = Vec::new();
        for n in 1..=40 {
            let now = n as f64 * 0.25;
            let frame = session.tick(now);
            if frame.motion_changed {
                assert!(frame.cycle_completed, "commits only at cycle boundaries");
                commit_times.push(now);
            }
        }

        assert_eq!(session.current_motion(), 2);
        assert_eq!(commit_times.len(), 1, "steady input commits exactly once");
    }

    #[test]
    fn test_detach_holds_current_motion() {
        let mut session = MotionSession::new(EngineConfig::classic());
        session.attach_source(Box::new(LoudSource));
        for n in 1..=20 {
            session.tick(n as f64 * 0.5);
        }
        assert_eq!(session.current_motion(), 2);

        session.detach_source();
        for n in 21..=60 {
            let frame = session.tick(n as f64 * 0.5);
            assert!(!frame.motion_changed);
        }
        assert_eq!(session.current_motion(), 2);
        assert!(session.source_time().is_none());
    }

    #[test]
    fn test_seek_restarts_the_cycle() {
        let mut session = MotionSession::new(EngineConfig::classic());
        session.tick(0.5);
        assert_eq!(session.frame_index(), 3);

        session.seek(10.0);
        assert_eq!(session.frame_index(), 0);

        let frame = session.tick(10.1);
        assert!(!frame.cycle_completed, "seek target starts a fresh cycle");
        assert_eq!(frame.frame_index, 0);
    }
}
