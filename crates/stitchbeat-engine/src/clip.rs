//! Motion clip data.
//!
//! A motion clip is exactly six 45x45 frames. Each cell carries a sparse set
//! of named overlays; which overlays are present is all the music mode needs,
//! any per-cell styling in the document is editor data and gets dropped here.
//! Documents arrive as the pattern editor's JSON export and are validated
//! structurally before anything is installed.

use serde::Deserialize;

use crate::error::ClipError;

/// Grid edge length in cells
pub const GRID_SIZE: usize = 45;

/// Frames in every motion clip
pub const FRAME_COUNT: usize = 6;

/// Overlay layers a cell can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Overlay {
    Body,
    Accent,
}

impl Overlay {
    /// Maps a clip-document key to an overlay. `"scarf"` is the editor's
    /// historical name for the accent layer and stays accepted on input.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "body" => Some(Overlay::Body),
            "scarf" | "accent" => Some(Overlay::Accent),
            _ => None,
        }
    }
}

/// Overlay membership for a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellOverlays {
    pub body: bool,
    pub accent: bool,
}

impl CellOverlays {
    pub fn is_empty(&self) -> bool {
        !self.body && !self.accent
    }

    pub fn has(&self, overlay: Overlay) -> bool {
        match overlay {
            Overlay::Body => self.body,
            Overlay::Accent => self.accent,
        }
    }

    fn mark(&mut self, overlay: Overlay) {
        match overlay {
            Overlay::Body => self.body = true,
            Overlay::Accent => self.accent = true,
        }
    }
}

/// One frame of a motion clip: a dense 45x45 grid of overlay sets.
#[derive(Clone)]
pub struct ClipFrame {
    cells: Vec<CellOverlays>,
}

impl ClipFrame {
    /// Overlays at `(row, col)`. Both must be below [`GRID_SIZE`].
    pub fn cell(&self, row: usize, col: usize) -> CellOverlays {
        self.cells[row * GRID_SIZE + col]
    }

    /// Number of cells carrying at least one overlay.
    pub fn occupied_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }
}

/// An immutable six-frame motion clip.
#[derive(Clone)]
pub struct MotionClip {
    frames: Vec<ClipFrame>,
}

/// Raw document shape. Cell payloads stay as opaque JSON; only key presence
/// matters for music mode. Unknown top-level keys (editor metadata like
/// `layers` or `version`) are ignored.
#[derive(Deserialize)]
struct ClipDocument {
    #[serde(rename = "framesData")]
    frames_data: Vec<Vec<Vec<serde_json::Map<String, serde_json::Value>>>>,
}

impl MotionClip {
    /// Parses and validates a clip document. Pure: no IO, no engine state.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ClipError> {
        let document: ClipDocument = serde_json::from_slice(bytes)?;

        if document.frames_data.len() != FRAME_COUNT {
            return Err(ClipError::FrameCount {
                found: document.frames_data.len(),
            });
        }

        let mut frames = Vec::with_capacity(FRAME_COUNT);
        for (frame_idx, rows) in document.frames_data.iter().enumerate() {
            if rows.len() != GRID_SIZE {
                return Err(ClipError::GridShape {
                    frame: frame_idx,
                    rows: rows.len(),
                    cols: rows.first().map_or(0, Vec::len),
                });
            }

            let mut cells = vec![CellOverlays::default(); GRID_SIZE * GRID_SIZE];
            for (row_idx, row) in rows.iter().enumerate() {
                if row.len() != GRID_SIZE {
                    return Err(ClipError::GridShape {
                        frame: frame_idx,
                        rows: rows.len(),
                        cols: row.len(),
                    });
                }

                for (col_idx, cell) in row.iter().enumerate() {
                    let slot = &mut cells[row_idx * GRID_SIZE + col_idx];
                    for key in cell.keys() {
                        if let Some(overlay) = Overlay::from_key(key) {
                            slot.mark(overlay);
                        }
                    }
                }
            }

            frames.push(ClipFrame { cells });
        }

        Ok(Self { frames })
    }

    /// Frame at `index`, which must be below [`FRAME_COUNT`].
    pub fn frame(&self, index: usize) -> &ClipFrame {
        &self.frames[index]
    }

    pub fn frames(&self) -> &[ClipFrame] {
        &self.frames
    }
}
