//! Terminal renderer for the motion grid.
//!
//! Draws the 45x45 grid with Unicode half blocks, packing two grid rows into
//! each terminal line via 24-bit foreground/background colors, followed by a
//! one-line status readout. The whole frame is built in a string buffer and
//! written in one syscall to keep the update flicker-free.

use std::fmt::Write as _;
use std::io::{self, Write as _};

use stitchbeat_engine::{MotionSession, RenderInstruction, Rgb, GRID_SIZE, MOTION_COUNT};

/// Background for cells with no overlay
const EMPTY_CELL: Rgb = Rgb::new(24, 24, 24);

const MOTION_LABELS: [&str; MOTION_COUNT] = ["slow", "medium", "fast"];

const BAR_WIDTH: usize = 10;

pub struct FrameView {
    out: String,
}

impl FrameView {
    pub fn new() -> Self {
        Self {
            out: String::with_capacity(64 * 1024),
        }
    }

    /// Clear the terminal before the first frame.
    pub fn prepare(&self) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        stdout.write_all(b"\x1b[2J")?;
        stdout.flush()
    }

    /// Draw one frame.
    pub fn render(&mut self, session: &MotionSession, frame: &RenderInstruction) -> io::Result<()> {
        self.out.clear();
        self.out.push_str("\x1b[H");

        if frame.has_clip {
            self.draw_grid(session);
        } else {
            let _ = writeln!(
                self.out,
                "no clip loaded for motion {} ({})\x1b[K",
                frame.motion_index, MOTION_LABELS[frame.motion_index]
            );
        }

        self.draw_status(session, frame);
        self.out.push_str("\x1b[0m\x1b[J");

        let mut stdout = io::stdout().lock();
        stdout.write_all(self.out.as_bytes())?;
        stdout.flush()
    }

    fn draw_grid(&mut self, session: &MotionSession) {
        // 45 rows pack into 23 lines; the lower half of the last line is
        // past the grid and painted as empty
        for line in 0..(GRID_SIZE + 1) / 2 {
            let top_row = line * 2;
            let bottom_row = top_row + 1;

            for col in 0..GRID_SIZE {
                let top = Self::cell_color(session, top_row, col);
                let bottom = if bottom_row < GRID_SIZE {
                    Self::cell_color(session, bottom_row, col)
                } else {
                    EMPTY_CELL
                };

                let _ = write!(
                    self.out,
                    "\x1b[38;2;{};{};{}m\x1b[48;2;{};{};{}m\u{2580}",
                    top.r, top.g, top.b, bottom.r, bottom.g, bottom.b
                );
            }
            self.out.push_str("\x1b[0m\x1b[K\n");
        }
    }

    fn cell_color(session: &MotionSession, row: usize, col: usize) -> Rgb {
        match session.current_frame() {
            Some(clip_frame) => {
                let cell = clip_frame.cell(row, col);
                // Accent paints over body where a cell carries both
                if cell.accent {
                    session.accent_color(row, col)
                } else if cell.body {
                    session.body_color()
                } else {
                    EMPTY_CELL
                }
            }
            None => EMPTY_CELL,
        }
    }

    fn draw_status(&mut self, session: &MotionSession, frame: &RenderInstruction) {
        let clock = match session.source_time() {
            Some(time) => format_clock(time),
            None => String::from("no audio"),
        };
        let reading = session.last_reading();
        let last_change = match session.change_log().back() {
            Some(change) => format!(
                "{} at {}",
                MOTION_LABELS[change.motion],
                format_clock(change.time)
            ),
            None => String::from("none"),
        };

        let _ = writeln!(
            self.out,
            "{} | {} f{} | score {:.2} | vol {} | changes {} (last: {})\x1b[K",
            clock,
            MOTION_LABELS[frame.motion_index],
            frame.frame_index,
            reading.motion_score,
            level_bar(session.smoothed_volume()),
            session.change_log().len(),
            last_change
        );
    }
}

/// Formats seconds of playback as `m:ss`.
fn format_clock(seconds: f64) -> String {
    let total = seconds.max(0.0) as u64;
    format!("{}:{:02}", total / 60, total % 60)
}

/// Fixed-width meter for a [0, 1] level.
fn level_bar(level: f32) -> String {
    let filled = (level.clamp(0.0, 1.0) * BAR_WIDTH as f32).round() as usize;
    let mut bar = String::with_capacity(BAR_WIDTH * 3);
    for _ in 0..filled {
        bar.push('\u{2588}');
    }
    for _ in filled..BAR_WIDTH {
        bar.push('\u{00b7}');
    }
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "0:00");
        assert_eq!(format_clock(59.9), "0:59");
        assert_eq!(format_clock(65.0), "1:05");
        assert_eq!(format_clock(600.0), "10:00");
        assert_eq!(format_clock(-2.0), "0:00");
    }

    #[test]
    fn test_level_bar_width_is_stable() {
        for level in [-0.5, 0.0, 0.31, 0.5, 0.99, 1.0, 2.0] {
            assert_eq!(level_bar(level).chars().count(), BAR_WIDTH);
        }
    }

    #[test]
    fn test_level_bar_fill() {
        assert_eq!(level_bar(0.0), "\u{00b7}".repeat(BAR_WIDTH));
        assert_eq!(level_bar(1.0), "\u{2588}".repeat(BAR_WIDTH));
        assert!(level_bar(0.5).starts_with("\u{2588}\u{2588}\u{2588}\u{2588}\u{2588}\u{00b7}"));
    }
}
