//! Definitions and constructors for hit window timing thresholds.

use crate::models::config::HitWindowMode;
use crate::models::stats::Judgement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub perfect_ms: f64,
    pub great_ms: f64,
    pub good_ms: f64,
    pub miss_ms: f64,
}

impl HitWindow {
    /// Default windows.
    pub fn new() -> Self {
        Self {
            perfect_ms: 50.0,
            great_ms: 100.0,
            good_ms: 150.0,
            miss_ms: 250.0,
        }
    }

    /// Tighter windows for experienced players.
    pub fn strict() -> Self {
        Self {
            perfect_ms: 35.0,
            great_ms: 70.0,
            good_ms: 110.0,
            miss_ms: 200.0,
        }
    }

    pub fn from_mode(mode: HitWindowMode) -> Self {
        match mode {
            HitWindowMode::Standard => Self::new(),
            HitWindowMode::Strict => Self::strict(),
        }
    }

    /// Returns `true` if a press `timing_diff_ms` away from a note may claim it.
    pub fn in_range(&self, timing_diff_ms: f64) -> bool {
        timing_diff_ms.abs() < self.miss_ms
    }

    /// Classifies a timing offset. Offsets past the good window but inside the
    /// miss window are a miss; callers filter out-of-range presses first.
    pub fn judge(&self, timing_diff_ms: f64) -> Judgement {
        let abs_diff = timing_diff_ms.abs();

        if abs_diff <= self.perfect_ms {
            Judgement::Perfect
        } else if abs_diff <= self.great_ms {
            Judgement::Great
        } else if abs_diff <= self.good_ms {
            Judgement::Good
        } else {
            Judgement::Miss
        }
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new()
    }
}
