//! Note processing - tick, hold scoring, miss sweep, apply_judgement

use super::{GameEngine, JudgementEvent, Phase};
use crate::models::engine::{
    COMBO_SCORE_FACTOR, FEVER_COMBO_THRESHOLD, FEVER_MULTIPLIER, HOLD_TICK_SCORE, MAX_HEALTH,
    MISS_HEALTH_PENALTY, NoteKind, NoteState, SONG_END_MARGIN_MS,
};
use crate::models::stats::Judgement;
use crate::shared::result::SessionResult;

impl GameEngine {
    /// Advances the attempt to `corrected_time_ms`: hold ticks, then the miss
    /// sweep, then the end check. Returns the result on the tick that ends
    /// the attempt, and never again after that.
    pub fn tick(&mut self, corrected_time_ms: f64) -> Option<SessionResult> {
        if self.phase != Phase::Running {
            return None;
        }

        let now = self.judge_time(corrected_time_ms);
        self.update_holds(now);
        self.sweep_misses(now);
        self.check_end(corrected_time_ms)
    }

    /// Awards unclaimed ticks of every held hold and completes holds whose
    /// end has passed.
    pub(crate) fn update_holds(&mut self, now: f64) {
        let mut completed = 0usize;

        for note in self.chart.iter_mut().skip(self.head_index) {
            let NoteState::Holding { ticks_hit } = note.state else {
                continue;
            };
            let NoteKind::Hold {
                duration_ms,
                total_ticks,
            } = note.kind
            else {
                continue;
            };

            let tick_interval = duration_ms / f64::from(total_ticks);
            let elapsed = (now - note.time_ms).max(0.0);
            let expected = ((elapsed / tick_interval).floor() as u32).min(total_ticks);

            for _ in ticks_hit..expected {
                let combo_bonus = 1.0 + f64::from(self.state.combo) * COMBO_SCORE_FACTOR;
                self.state.score += HOLD_TICK_SCORE * combo_bonus;
                self.state.combo += 1;
                self.state.max_combo = self.state.max_combo.max(self.state.combo);
            }

            note.state = if now > note.end_time_ms() {
                completed += 1;
                NoteState::Completed
            } else {
                NoteState::Holding {
                    ticks_hit: expected.max(ticks_hit),
                }
            };
        }

        if completed > 0 {
            log::trace!("ENGINE: {} holds completed", completed);
            self.advance_head();
        }
    }

    /// Marks notes that can no longer be hit as missed.
    pub(crate) fn sweep_misses(&mut self, now: f64) {
        let miss_ms = self.hit_window.miss_ms;
        let mut missed_lanes = Vec::new();

        for note in self.chart.iter_mut().skip(self.head_index) {
            // Sorted by start and end >= start: nothing later can be late yet.
            if note.time_ms + miss_ms >= now {
                break;
            }
            if !matches!(
                note.state,
                NoteState::Pending | NoteState::Released { .. }
            ) {
                continue;
            }
            if now - note.end_time_ms() > miss_ms {
                note.state = NoteState::Missed;
                missed_lanes.push(note.lane);
            }
        }

        for lane in missed_lanes {
            self.apply_judgement(Judgement::Miss, now, lane, None);
        }
        self.advance_head();
    }

    fn check_end(&mut self, corrected_time_ms: f64) -> Option<SessionResult> {
        if self.state.ended {
            return None;
        }

        let all_resolved = !self.chart.is_empty() && self.head_index == self.chart.len();
        let song_over = self.song_duration_ms > 0.0
            && corrected_time_ms >= self.song_duration_ms - SONG_END_MARGIN_MS;
        let is_dead = self.state.health <= 0.0;

        if !(all_resolved || song_over || is_dead) {
            return None;
        }
        Some(self.finish(is_dead))
    }

    fn finish(&mut self, is_dead: bool) -> SessionResult {
        self.state.ended = true;
        self.phase = Phase::Ended;

        let result = SessionResult {
            score: self.state.score.round() as u64,
            max_combo: self.state.max_combo,
            judgement_counts: self.state.hit_stats.clone(),
            accuracy: self.state.accuracy(),
            is_full_combo: self.state.hit_stats.miss == 0,
            is_dead,
        };

        log::info!(
            "ENGINE: Session ended (score {}, acc {:.2}%, max combo {}{}{})",
            result.score,
            result.accuracy,
            result.max_combo,
            if result.is_full_combo { ", FC" } else { "" },
            if is_dead { ", dead" } else { "" }
        );

        self.result = Some(result.clone());
        result
    }

    /// Applies a judgement to the session state (score, combo, health, stats).
    pub(crate) fn apply_judgement(
        &mut self,
        judgement: Judgement,
        time_ms: f64,
        lane: usize,
        offset_ms: Option<f64>,
    ) {
        let state = &mut self.state;

        if judgement.is_miss() {
            state.combo = 0;
            state.perfect_streak = 0;
            state.full_combo = false;
            state.fever = false;
            state.fever_multiplier = 1.0;
            if !self.no_fail {
                state.health = (state.health - MISS_HEALTH_PENALTY).max(0.0);
            }
        } else {
            let combo_before = state.combo;
            state.fever = combo_before >= FEVER_COMBO_THRESHOLD;
            state.fever_multiplier = if state.fever { FEVER_MULTIPLIER } else { 1.0 };

            let combo_bonus = 1.0 + f64::from(combo_before) * COMBO_SCORE_FACTOR;
            state.score += judgement.base_value() * combo_bonus * state.fever_multiplier;

            state.combo += 1;
            state.max_combo = state.max_combo.max(state.combo);
            state.health = (state.health + judgement.heal()).min(MAX_HEALTH);

            if judgement == Judgement::Perfect {
                state.perfect_streak += 1;
            } else {
                state.perfect_streak = 0;
            }
        }

        state.hit_stats.record(judgement);
        state.last_judgement = Some(JudgementEvent {
            judgement,
            time_ms,
            lane,
            offset_ms,
        });
    }

    /// Moves the head past resolved notes.
    pub(crate) fn advance_head(&mut self) {
        while self
            .chart
            .get(self.head_index)
            .is_some_and(|note| note.is_resolved())
        {
            self.head_index += 1;
        }
    }
}
