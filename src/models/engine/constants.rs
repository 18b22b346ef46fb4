//! Tuning constants shared by chart generation and judgement.

/// No notes are generated inside the first second of a track.
pub const WARM_UP_MS: f64 = 1000.0;

/// Padding around a hold's span in which taps in the same lane collide.
pub const HOLD_RESERVATION_PADDING_MS: f64 = 100.0;

/// Longest hold generated from a single bar.
pub const MAX_HOLD_DURATION_MS: f64 = 2000.0;

/// Holds are only generated from this star rating up.
pub const HOLD_MIN_STAR_RATING: u8 = 3;

/// Same-lane notes closer than this count as duplicates: segment taps are
/// dropped and grid snaps are skipped.
pub const DUPLICATE_WINDOW_MS: f64 = 120.0;

/// Taps in different lanes closer than this are snapped together.
pub const SYNC_THRESHOLD_MS: f64 = 80.0;

/// Fraction of a quarter-beat within which notes snap to the tempo grid.
pub const GRID_SNAP_TOLERANCE: f64 = 0.5;

/// Spacing of hold scoring ticks.
pub const HOLD_TICK_INTERVAL_MS: f64 = 100.0;

/// Score awarded per hold tick before combo scaling.
pub const HOLD_TICK_SCORE: f64 = 10.0;

/// Combo bonus per combo step in the score formula.
pub const COMBO_SCORE_FACTOR: f64 = 0.05;

/// Combo from which fever doubles hit scores.
pub const FEVER_COMBO_THRESHOLD: u32 = 50;
pub const FEVER_MULTIPLIER: f64 = 2.0;

pub const MAX_HEALTH: f64 = 100.0;
pub const MISS_HEALTH_PENALTY: f64 = 15.0;

/// The session ends this long before the reported track duration.
pub const SONG_END_MARGIN_MS: f64 = 1000.0;

/// Approach time used for hidden/sudden visibility.
pub const APPROACH_WINDOW_MS: f64 = 1000.0;
