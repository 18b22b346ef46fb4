//! Chart notes and their per-note judgement state.

use super::constants::HOLD_TICK_INTERVAL_MS;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Audio feature a note was generated from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    Bar,
    Beat,
    Segment,
}

/// Stable note identity: source feature plus its index in the timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoteId {
    pub source: NoteSource,
    pub index: usize,
}

impl NoteId {
    pub fn new(source: NoteSource, index: usize) -> Self {
        Self { source, index }
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.source {
            NoteSource::Bar => "bar",
            NoteSource::Beat => "beat",
            NoteSource::Segment => "segment",
        };
        write!(f, "{prefix}-{}", self.index)
    }
}

/// Type of note in a chart.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NoteKind {
    /// Simple tap note.
    Tap,

    /// Hold note, scored in discrete ticks while the lane stays pressed.
    Hold { duration_ms: f64, total_ticks: u32 },
}

impl NoteKind {
    pub fn new_hold(duration_ms: f64) -> Self {
        let total_ticks = ((duration_ms / HOLD_TICK_INTERVAL_MS).floor() as u32).max(1);
        NoteKind::Hold {
            duration_ms,
            total_ticks,
        }
    }

    /// Returns the duration if this is a hold, 0 otherwise.
    pub fn duration(&self) -> f64 {
        match self {
            NoteKind::Hold { duration_ms, .. } => *duration_ms,
            NoteKind::Tap => 0.0,
        }
    }
}

/// Judgement state of a single note.
///
/// Taps go `Pending -> Hit | Missed`. Holds go `Pending -> Holding`, then
/// `Completed` when held to the end, or `Released` if let go early, which the
/// miss sweep later turns into `Missed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum NoteState {
    #[default]
    Pending,
    Holding {
        ticks_hit: u32,
    },
    Released {
        ticks_hit: u32,
    },
    Hit,
    Completed,
    Missed,
}

/// A single note in a generated chart.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub kind: NoteKind,
    /// Lane index (0-indexed).
    pub lane: usize,
    /// Tap time or hold start in milliseconds.
    pub time_ms: f64,
    #[serde(skip)]
    pub state: NoteState,
}

impl Note {
    pub fn tap(id: NoteId, time_ms: f64, lane: usize) -> Self {
        Self {
            id,
            kind: NoteKind::Tap,
            lane,
            time_ms,
            state: NoteState::Pending,
        }
    }

    pub fn hold(id: NoteId, time_ms: f64, lane: usize, duration_ms: f64) -> Self {
        Self {
            id,
            kind: NoteKind::new_hold(duration_ms),
            lane,
            time_ms,
            state: NoteState::Pending,
        }
    }

    /// Tap time, or hold start + duration.
    pub fn end_time_ms(&self) -> f64 {
        self.time_ms + self.kind.duration()
    }

    pub fn is_hold(&self) -> bool {
        matches!(self.kind, NoteKind::Hold { .. })
    }

    pub fn is_tap(&self) -> bool {
        matches!(self.kind, NoteKind::Tap)
    }

    pub fn is_pending(&self) -> bool {
        self.state == NoteState::Pending
    }

    pub fn is_hit(&self) -> bool {
        self.state == NoteState::Hit
    }

    pub fn is_passed(&self) -> bool {
        matches!(self.state, NoteState::Completed | NoteState::Missed)
    }

    pub fn is_holding(&self) -> bool {
        matches!(self.state, NoteState::Holding { .. })
    }

    /// Hit or passed: nothing can change this note any more.
    pub fn is_resolved(&self) -> bool {
        self.is_hit() || self.is_passed()
    }

    /// Creates a copy of this note with its state reset to `Pending`.
    pub fn reset(&self) -> Self {
        let mut note = self.clone();
        note.state = NoteState::Pending;
        note
    }
}
