//! Render snapshots for inter-thread communication.
//!
//! Snapshots are immutable captures of session state sent from the session
//! thread to whatever renders it. This decouples judgement from rendering.

use crate::models::engine::{NoteId, NoteKind, NoteState};
use crate::models::stats::HitStats;
use crate::state::game::{JudgementEvent, Phase};
use std::time::Instant;

/// A note as the renderer sees it.
#[derive(Clone, Debug, PartialEq)]
pub struct NoteView {
    pub id: NoteId,
    pub kind: NoteKind,
    pub lane: usize,
    pub time_ms: f64,
    pub state: NoteState,
    /// 0 is invisible, 1 fully drawn (hidden/sudden).
    pub opacity: f32,
}

/// Snapshot of gameplay state for rendering.
#[derive(Clone, Debug)]
pub struct GameplaySnapshot {
    /// Judge time (corrected time plus sync offset) in milliseconds.
    pub audio_time: f64,
    /// Wall-clock time when the snapshot was created (for interpolation).
    pub timestamp: Instant,
    pub phase: Phase,

    /// Notes inside the approach window, plus holds still in progress.
    pub visible_notes: Vec<NoteView>,
    /// Per-lane key held state.
    pub keys_held: Vec<bool>,

    pub score: f64,
    /// Accuracy over the notes judged so far.
    pub accuracy: f64,
    pub combo: u32,
    pub max_combo: u32,
    pub health: f64,
    pub hit_stats: HitStats,
    pub fever: bool,
    pub fever_multiplier: f64,
    pub perfect_streak: u32,
    pub remaining_notes: usize,

    /// Last judgement (for flash display).
    pub last_judgement: Option<JudgementEvent>,
}
