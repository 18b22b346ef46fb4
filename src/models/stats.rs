//! Judgement types and per-session judgement tallies.
//!
//! This module defines the judgement categories used for scoring and the
//! accuracy formula reported at the end of a session.

use serde::{Deserialize, Serialize};

/// Hit judgement types from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Judgement {
    /// Tightest timing window.
    Perfect,
    /// Second window.
    Great,
    /// Widest scoring window.
    Good,
    /// Outside every scoring window, or never pressed.
    Miss,
}

impl Judgement {
    /// Base score awarded before combo and fever scaling.
    pub fn base_value(self) -> f64 {
        match self {
            Judgement::Perfect => 300.0,
            Judgement::Great => 200.0,
            Judgement::Good => 100.0,
            Judgement::Miss => 0.0,
        }
    }

    /// Health restored by a successful hit.
    pub fn heal(self) -> f64 {
        match self {
            Judgement::Perfect => 2.0,
            Judgement::Great | Judgement::Good => 1.0,
            Judgement::Miss => 0.0,
        }
    }

    pub fn is_miss(self) -> bool {
        matches!(self, Judgement::Miss)
    }
}

/// Accumulated judgement counts for a play session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitStats {
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub miss: u32,
}

impl HitStats {
    /// Creates empty hit statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Perfect => self.perfect += 1,
            Judgement::Great => self.great += 1,
            Judgement::Good => self.good += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    /// Number of non-miss judgements.
    pub fn successful(&self) -> u32 {
        self.perfect + self.great + self.good
    }

    /// Accuracy percentage (0-100) over `total_notes`, rounded to two decimals.
    ///
    /// Every non-miss judgement weighs the same; a chart with no notes reports 0.
    pub fn accuracy(&self, total_notes: usize) -> f64 {
        if total_notes == 0 {
            return 0.0;
        }

        let raw = self.successful() as f64 / total_notes as f64 * 100.0;
        (raw.clamp(0.0, 100.0) * 100.0).round() / 100.0
    }
}
