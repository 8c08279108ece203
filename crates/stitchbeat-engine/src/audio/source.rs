//! The pull-based contract a session reads audio through.

/// Bins in every analysis snapshot, frequency and time domain alike.
pub const SNAPSHOT_BINS: usize = 128;

/// Supplier of per-tick analysis snapshots.
///
/// The session pulls from the source once per tick and never blocks on it;
/// implementations own whatever capture thread or decoder feeds them. Byte
/// semantics match the pattern editor's analyser node so the classifier's
/// tuned constants keep their meaning:
///
/// - frequency bytes map smoothed per-bin magnitude from a [-100 dB, -30 dB]
///   window onto 0..=255,
/// - time-domain bytes map sample amplitude [-1, 1] onto 0..=255 with 128 as
///   silence.
pub trait AnalysisSource {
    /// Frequency-domain snapshot, bin 0 lowest.
    fn frequency_snapshot(&mut self) -> [u8; SNAPSHOT_BINS];

    /// Time-domain snapshot of the most recent samples.
    fn time_domain_snapshot(&mut self) -> [u8; SNAPSHOT_BINS];

    /// Playback clock in seconds. Monotonic except across seeks.
    fn playback_time(&self) -> f64;

    /// Total length in seconds; live capture has no end.
    fn duration(&self) -> f64 {
        f64::INFINITY
    }
}
