//! Real-time judgement engine.
//!
//! The `GameEngine` owns the generated chart and the running session state:
//! - Closest-note hit detection and judgement
//! - Hold-note tick scoring
//! - Miss sweep and end-of-session detection

mod input;
mod notes;
mod snapshot;

use crate::models::config::GameConfig;
use crate::models::engine::{HitWindow, MAX_HEALTH, Note};
use crate::models::stats::{HitStats, Judgement};
use crate::shared::result::SessionResult;

/// Lifecycle of one attempt. `Paused` is a sub-state of a running attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    NotStarted,
    Running,
    Paused,
    Ended,
}

/// Most recent judgement, kept for UI feedback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JudgementEvent {
    pub judgement: Judgement,
    /// Judge time (corrected time plus sync offset) in ms.
    pub time_ms: f64,
    pub lane: usize,
    /// Signed press offset (positive = late). `None` for swept misses.
    pub offset_ms: Option<f64>,
}

/// Running score state of an attempt.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionState {
    pub score: f64,
    pub combo: u32,
    pub max_combo: u32,
    pub health: f64,
    pub hit_stats: HitStats,
    pub fever: bool,
    pub fever_multiplier: f64,
    pub perfect_streak: u32,
    pub last_judgement: Option<JudgementEvent>,
    pub total_notes: usize,
    pub full_combo: bool,
    pub ended: bool,
}

impl SessionState {
    pub fn new(total_notes: usize) -> Self {
        Self {
            score: 0.0,
            combo: 0,
            max_combo: 0,
            health: MAX_HEALTH,
            hit_stats: HitStats::new(),
            fever: false,
            fever_multiplier: 1.0,
            perfect_streak: 0,
            last_judgement: None,
            total_notes,
            full_combo: true,
            ended: false,
        }
    }

    /// Accuracy over the whole chart, as reported at session end.
    pub fn accuracy(&self) -> f64 {
        self.hit_stats.accuracy(self.total_notes)
    }
}

/// Main gameplay engine handling note timing, scoring and end detection.
pub struct GameEngine {
    /// The chart data, sorted by time.
    chart: Vec<Note>,
    /// Index of the first unresolved note.
    head_index: usize,
    state: SessionState,
    phase: Phase,

    hit_window: HitWindow,
    /// Added to corrected time before every timing comparison.
    sync_offset_ms: f64,
    no_fail: bool,
    hidden: bool,
    sudden: bool,
    /// Zero when the track length is unknown.
    song_duration_ms: f64,

    /// Currently held keys per lane.
    keys_held: Vec<bool>,
    result: Option<SessionResult>,
}

impl GameEngine {
    pub fn new(chart: Vec<Note>, config: &GameConfig, song_duration_ms: f64) -> Self {
        let total_notes = chart.len();
        Self {
            chart,
            head_index: 0,
            state: SessionState::new(total_notes),
            phase: Phase::NotStarted,
            hit_window: HitWindow::from_mode(config.hit_window),
            sync_offset_ms: f64::from(config.sync_offset_ms),
            no_fail: config.modifiers.no_fail,
            hidden: config.modifiers.hidden,
            sudden: config.modifiers.sudden,
            song_duration_ms: song_duration_ms.max(0.0),
            keys_held: vec![false; config.lane_count],
            result: None,
        }
    }

    pub fn start(&mut self) {
        if self.phase == Phase::NotStarted {
            self.phase = Phase::Running;
            log::info!(
                "ENGINE: Started ({} notes, {:.0}ms song)",
                self.chart.len(),
                self.song_duration_ms
            );
        }
    }

    pub fn pause(&mut self) {
        if self.phase == Phase::Running {
            self.phase = Phase::Paused;
            log::info!("ENGINE: Paused");
        }
    }

    pub fn resume(&mut self) {
        if self.phase == Phase::Paused {
            self.phase = Phase::Running;
            log::info!("ENGINE: Resumed");
        }
    }

    /// Resets every note and the session state for a new attempt.
    pub fn restart(&mut self) {
        for note in &mut self.chart {
            *note = note.reset();
        }
        self.head_index = 0;
        self.state = SessionState::new(self.chart.len());
        self.keys_held.iter_mut().for_each(|k| *k = false);
        self.result = None;
        self.phase = Phase::Running;
        log::info!("ENGINE: Restarted");
    }

    /// Ends the attempt without producing a result.
    pub fn abort(&mut self) {
        if self.phase != Phase::Ended {
            self.phase = Phase::Ended;
            self.state.ended = true;
            log::warn!("ENGINE: Attempt aborted");
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ended(&self) -> bool {
        self.phase == Phase::Ended
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn chart(&self) -> &[Note] {
        &self.chart
    }

    pub fn hit_window(&self) -> &HitWindow {
        &self.hit_window
    }

    pub fn lane_count(&self) -> usize {
        self.keys_held.len()
    }

    /// The end-of-session summary, once the attempt has finished normally.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    fn judge_time(&self, corrected_time_ms: f64) -> f64 {
        corrected_time_ms + self.sync_offset_ms
    }

    fn remaining_notes(&self) -> usize {
        self.chart.len() - self.head_index
    }
}
