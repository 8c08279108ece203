mod audio;
mod clip_library;
mod ui;
mod utils;

use std::env;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use audio::{AudioCapture, LiveInput};
use clip_library::ClipLibrary;
use stitchbeat_engine::{EngineConfig, MotionSession, MOTION_COUNT};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ui::FrameView;
use utils::Config;

/// Target frame time, ~60fps
const TICK_BUDGET: Duration = Duration::from_micros(16_667);

fn main() -> io::Result<()> {
    init_logging();

    let args: Vec<String> = env::args().collect();

    if args.contains(&"--audio-info".to_string()) {
        utils::log_audio_info();
        return Ok(());
    }
    if args.contains(&"--list-devices".to_string()) {
        AudioCapture::list_devices();
        return Ok(());
    }

    let config = Config::load();

    let engine_config = match flag_value(&args, "--preset") {
        Some(name) => match EngineConfig::preset(&name) {
            Some(preset) => preset,
            None => {
                eprintln!("Unknown preset '{}' (expected: classic, punchy)", name);
                return Ok(());
            }
        },
        None => config.engine_config(),
    };

    let mut session = MotionSession::new(engine_config);
    session.set_styles(config.styles());

    let clips_dir = flag_value(&args, "--clips")
        .map(PathBuf::from)
        .unwrap_or_else(|| config.clips_dir());
    let mut library = ClipLibrary::new(clips_dir);
    for motion in 0..MOTION_COUNT {
        if let Some(clip) = library.clip(motion) {
            session.set_clip(motion, clip.clone());
        }
    }

    let capture = AudioCapture::new();
    if capture.has_stream() {
        session.attach_source(Box::new(LiveInput::new(capture)));
        info!("audio capture attached");
    } else {
        warn!("no audio stream, motion selection is suspended");
    }

    let mut view = FrameView::new();
    view.prepare()?;
    run(&mut session, &mut library, &mut view)
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(
    session: &mut MotionSession,
    library: &mut ClipLibrary,
    view: &mut FrameView,
) -> io::Result<()> {
    let wall_start = Instant::now();

    loop {
        let tick_start = Instant::now();

        // With no audio attached the frame clock runs on wall time
        let now = session
            .source_time()
            .unwrap_or_else(|| wall_start.elapsed().as_secs_f64());

        for motion in library.check_reload() {
            if let Some(clip) = library.clip(motion) {
                session.set_clip(motion, clip.clone());
            }
        }

        let frame = session.tick(now);
        view.render(session, &frame)?;

        if let Some(remaining) = TICK_BUDGET.checked_sub(tick_start.elapsed()) {
            std::thread::sleep(remaining);
        }
    }
}
