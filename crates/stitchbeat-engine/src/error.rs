//! Error types for clip loading and color parsing.
//!
//! Analysis itself never fails: a missing audio source or missing clip
//! degrades to a neutral result at the session level. Errors here are the
//! load-time kind that callers must see and react to.

use thiserror::Error;

use crate::clip::{FRAME_COUNT, GRID_SIZE};

/// Errors raised while loading a motion clip document.
///
/// A failed load never touches engine state; the caller keeps whatever clip
/// was installed before.
#[derive(Error, Debug)]
pub enum ClipError {
    /// The file could not be read from disk
    #[error("failed to read clip file: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON or is missing `framesData`
    #[error("malformed clip document: {0}")]
    Json(#[from] serde_json::Error),

    /// The document does not contain exactly six frames
    #[error("clip has {found} frames, expected {expected}", expected = FRAME_COUNT)]
    FrameCount { found: usize },

    /// A frame is not a full 45x45 grid
    #[error("frame {frame} is {rows}x{cols}, expected {side}x{side}", side = GRID_SIZE)]
    GridShape {
        frame: usize,
        rows: usize,
        cols: usize,
    },
}

/// Raised when a color string is not `#rrggbb`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid color '{0}', expected #rrggbb")]
pub struct ColorParseError(pub String);
