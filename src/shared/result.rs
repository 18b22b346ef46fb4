//! End-of-session summary and its persistence key.

use crate::models::stats::HitStats;
use serde::{Deserialize, Serialize};

/// One-shot summary emitted when an attempt ends normally.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub score: u64,
    pub max_combo: u32,
    pub judgement_counts: HitStats,
    /// Percentage, two decimals.
    pub accuracy: f64,
    pub is_full_combo: bool,
    pub is_dead: bool,
}

/// Storage key for a track/difficulty pair: md5 hex of `"{track}:{difficulty}"`.
pub fn storage_key(track_id: &str, difficulty: &str) -> String {
    format!("{:x}", md5::compute(format!("{track_id}:{difficulty}")))
}
