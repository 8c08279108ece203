//! Clip discovery and hot-reload.
//!
//! Scans a directory for clip documents (`.json`), mapping the first three in
//! sorted order onto the slow/medium/fast slots, and polls file mtimes so an
//! edit in the pattern editor swaps in without restarting. A reload only
//! replaces the previous clip once the new document validates.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use stitchbeat_engine::{ClipError, MotionClip, MOTION_COUNT};
use tracing::{info, warn};

struct LoadedClip {
    clip: MotionClip,
    path: PathBuf,
    last_modified: SystemTime,
}

/// Manages clip discovery, loading, and hot-reload.
pub struct ClipLibrary {
    slots: [Option<LoadedClip>; MOTION_COUNT],
    clips_dir: PathBuf,
    reload_check_counter: u32,
}

impl ClipLibrary {
    const RELOAD_CHECK_INTERVAL: u32 = 30; // Check every 30 frames (~0.5s at 60fps)

    /// Create a library over the given directory and load what's there.
    pub fn new(clips_dir: PathBuf) -> Self {
        let mut library = Self {
            slots: std::array::from_fn(|_| None),
            clips_dir,
            reload_check_counter: 0,
        };
        library.scan();
        library
    }

    fn scan(&mut self) {
        if !self.clips_dir.exists() {
            warn!(
                dir = %self.clips_dir.display(),
                "clips directory does not exist yet"
            );
            return;
        }

        let entries = match std::fs::read_dir(&self.clips_dir) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(dir = %self.clips_dir.display(), error = %e, "cannot read clips directory");
                return;
            }
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map_or(false, |ext| ext == "json"))
            .collect();
        paths.sort();

        for (slot, path) in paths.into_iter().take(MOTION_COUNT).enumerate() {
            match Self::load_clip(&path) {
                Ok(loaded) => {
                    info!(motion = slot, path = %path.display(), "loaded clip");
                    self.slots[slot] = Some(loaded);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to load clip");
                }
            }
        }

        info!(
            count = self.count(),
            dir = %self.clips_dir.display(),
            "clip scan complete"
        );
    }

    fn load_clip(path: &Path) -> Result<LoadedClip, ClipError> {
        let bytes = std::fs::read(path)?;
        let clip = MotionClip::from_json(&bytes)?;
        let last_modified = path.metadata()?.modified()?;

        Ok(LoadedClip {
            clip,
            path: path.to_path_buf(),
            last_modified,
        })
    }

    /// Check for edited clip files and reload them.
    ///
    /// Call once per frame; checks are rate-limited to avoid hammering the
    /// file system. Returns the slots whose clip changed.
    pub fn check_reload(&mut self) -> Vec<usize> {
        self.reload_check_counter += 1;
        if self.reload_check_counter < Self::RELOAD_CHECK_INTERVAL {
            return Vec::new();
        }
        self.reload_check_counter = 0;

        let mut reloaded = Vec::new();

        for slot in 0..MOTION_COUNT {
            let (path, last_modified) = match &self.slots[slot] {
                Some(loaded) => (loaded.path.clone(), loaded.last_modified),
                None => continue,
            };

            let modified = match path.metadata().and_then(|m| m.modified()) {
                Ok(modified) => modified,
                Err(_) => continue,
            };
            if modified <= last_modified {
                continue;
            }

            // Parse before swapping: an edit that breaks the document keeps
            // the previous clip on screen
            match Self::load_clip(&path) {
                Ok(loaded) => {
                    info!(motion = slot, path = %path.display(), "reloaded clip");
                    self.slots[slot] = Some(loaded);
                    reloaded.push(slot);
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "clip edit rejected, keeping previous version"
                    );
                    // Remember the rejected mtime so the poll does not
                    // re-parse the same broken file every interval
                    if let Some(loaded) = self.slots[slot].as_mut() {
                        loaded.last_modified = modified;
                    }
                }
            }
        }

        reloaded
    }

    pub fn clip(&self, slot: usize) -> Option<&MotionClip> {
        self.slots.get(slot).and_then(|s| s.as_ref()).map(|l| &l.clip)
    }

    /// Number of loaded clips
    pub fn count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stitchbeat_engine::{FRAME_COUNT, GRID_SIZE};

    fn valid_document() -> Vec<u8> {
        let empty_row = vec![serde_json::json!({}); GRID_SIZE];
        let grid = vec![empty_row; GRID_SIZE];
        let frames = vec![grid; FRAME_COUNT];
        serde_json::to_vec(&serde_json::json!({ "framesData": frames })).expect("serializes")
    }

    #[test]
    fn test_scan_assigns_sorted_json_files_to_slots() {
        let dir = std::env::temp_dir().join(format!("stitchbeat-clips-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");

        std::fs::write(dir.join("a.json"), valid_document()).expect("write a");
        std::fs::write(dir.join("b.json"), b"not a clip").expect("write b");
        std::fs::write(dir.join("c.json"), valid_document()).expect("write c");
        std::fs::write(dir.join("d.json"), valid_document()).expect("write d");
        std::fs::write(dir.join("notes.txt"), b"ignored").expect("write notes");

        let library = ClipLibrary::new(dir.clone());

        // a -> slow, b fails to parse and leaves medium empty, c -> fast;
        // d is beyond the three slots
        assert!(library.clip(0).is_some());
        assert!(library.clip(1).is_none());
        assert!(library.clip(2).is_some());
        assert_eq!(library.count(), 2);

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn test_missing_directory_yields_empty_library() {
        let dir = std::env::temp_dir().join(format!("stitchbeat-none-{}", std::process::id()));
        let library = ClipLibrary::new(dir);
        assert_eq!(library.count(), 0);
        assert!(library.clip(0).is_none());
    }
}
