//! End-to-end session behavior with a scripted track: a quiet opening that
//! settles on the slow motion, then a loud treble-heavy section that walks
//! the selection up through medium to fast, one cycle at a time.

use stitchbeat_engine::{
    AnalysisSource, EngineConfig, MotionSession, Overlay, FRAME_COUNT, GRID_SIZE, MOTION_COUNT,
    SNAPSHOT_BINS,
};

const TICKS_PER_SECOND: u32 = 60;

/// Deterministic audio source: silent for the first `quiet_ticks` snapshots,
/// then a fixed treble-heavy spectrum at full waveform level.
struct ScriptedTrack {
    ticks: u32,
    quiet_ticks: u32,
}

impl ScriptedTrack {
    fn new(quiet_ticks: u32) -> Self {
        Self {
            ticks: 0,
            quiet_ticks,
        }
    }

    fn loud(&self) -> bool {
        self.ticks > self.quiet_ticks
    }
}

impl AnalysisSource for ScriptedTrack {
    fn frequency_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
        self.ticks += 1;
        let mut bins = [0u8; SNAPSHOT_BINS];
        if self.loud() {
            for bin in bins[..12].iter_mut() {
                *bin = 40;
            }
            for bin in bins[76..].iter_mut() {
                *bin = 220;
            }
        }
        bins
    }

    fn time_domain_snapshot(&mut self) -> [u8; SNAPSHOT_BINS] {
        if self.loud() {
            [255u8; SNAPSHOT_BINS]
        } else {
            [128u8; SNAPSHOT_BINS]
        }
    }

    fn playback_time(&self) -> f64 {
        self.ticks as f64 / TICKS_PER_SECOND as f64
    }
}

/// Minimal valid clip document: frame `f` carries a body cell at (f, 0) and
/// an accent cell at (f, 1).
fn clip_document() -> Vec<u8> {
    let frames: Vec<Vec<Vec<serde_json::Value>>> = (0..FRAME_COUNT)
        .map(|f| {
            (0..GRID_SIZE)
                .map(|row| {
                    (0..GRID_SIZE)
                        .map(|col| {
                            if row == f && col == 0 {
                                serde_json::json!({ "body": {} })
                            } else if row == f && col == 1 {
                                serde_json::json!({ "scarf": {} })
                            } else {
                                serde_json::json!({})
                            }
                        })
                        .collect()
                })
                .collect()
        })
        .collect();

    serde_json::to_vec(&serde_json::json!({ "framesData": frames })).expect("document serializes")
}

fn session_with_clips() -> MotionSession {
    let mut session = MotionSession::new(EngineConfig::classic());
    let document = clip_document();
    for motion in 0..MOTION_COUNT {
        session.load_clip(motion, &document).expect("clip loads");
    }
    session
}

#[test]
fn test_quiet_to_loud_walks_all_motions() {
    let mut session = session_with_clips();
    // 10 seconds of silence, then 10 seconds of loud treble
    session.attach_source(Box::new(ScriptedTrack::new(600)));

    let mut committed = Vec::new();
    let mut last_now = 0.0;
    for n in 0..1200u32 {
        let now = n as f64 / TICKS_PER_SECOND as f64;
        last_now = now;
        let frame = session.tick(now);

        assert!(frame.frame_index < FRAME_COUNT);
        assert!(frame.has_clip);
        if frame.motion_changed {
            assert!(frame.cycle_completed, "changes only land on cycle boundaries");
            committed.push(frame.motion_index);
        }

        let clip_frame = session.current_frame().expect("active motion has a clip");
        assert_eq!(clip_frame.occupied_cells(), 2);
        assert!(clip_frame.cell(frame.frame_index, 1).has(Overlay::Accent));

        let ramp = &session.style(frame.motion_index).accent_ramp;
        let color = session.accent_color(frame.frame_index, 1);
        assert!(
            ramp.contains(&color),
            "accent color must come from the active motion's ramp"
        );
    }

    // Silence settles on slow, the loud section climbs through medium to
    // fast, one committed change each
    assert_eq!(committed, vec![0, 1, 2]);
    assert_eq!(session.current_motion(), 2);
    assert!(session.coverage_complete(last_now));

    assert_eq!(session.change_log().len(), 3);
    let times: Vec<f64> = session.change_log().iter().map(|c| c.time).collect();
    assert!(times.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_seek_back_does_not_commit_or_report_a_boundary() {
    let mut session = session_with_clips();
    // Loud from the first snapshot
    session.attach_source(Box::new(ScriptedTrack::new(0)));

    for n in 1..=300u32 {
        session.tick(n as f64 / TICKS_PER_SECOND as f64);
    }
    assert_eq!(session.current_motion(), 2);
    let changes_before = session.change_log().len();

    session.seek(1.0);
    assert_eq!(session.frame_index(), 0);

    let frame = session.tick(1.05);
    assert!(!frame.cycle_completed);
    assert!(!frame.motion_changed);
    assert_eq!(frame.frame_index, 0);
    assert_eq!(session.current_motion(), 2);
    assert_eq!(session.change_log().len(), changes_before);
}
