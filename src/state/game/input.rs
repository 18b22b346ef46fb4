//! Lane press/release handling: closest-note resolution and judgement.

use super::{GameEngine, Phase};
use crate::models::engine::NoteState;
use crate::models::stats::Judgement;

impl GameEngine {
    /// Judges a press in `lane` at `corrected_time_ms`.
    ///
    /// Claims the closest pending note in the lane whose distance is inside
    /// the miss window. Returns `None` when nothing was claimed.
    pub fn on_lane_press(&mut self, lane: usize, corrected_time_ms: f64) -> Option<Judgement> {
        if self.phase != Phase::Running || lane >= self.keys_held.len() {
            return None;
        }
        self.keys_held[lane] = true;

        let now = self.judge_time(corrected_time_ms);
        let search_limit = now + self.hit_window.miss_ms;
        let mut best_note_idx = None;
        let mut min_diff = f64::MAX;

        for (i, note) in self.chart.iter().enumerate().skip(self.head_index) {
            if note.time_ms > search_limit {
                break;
            }
            if note.lane != lane || !note.is_pending() {
                continue;
            }
            let diff = (note.time_ms - now).abs();
            if self.hit_window.in_range(diff) && diff < min_diff {
                min_diff = diff;
                best_note_idx = Some(i);
            }
        }

        let idx = best_note_idx?;
        let offset_ms = now - self.chart[idx].time_ms;
        let judgement = self.hit_window.judge(offset_ms);

        let note = &mut self.chart[idx];
        note.state = if judgement.is_miss() {
            NoteState::Missed
        } else if note.is_hold() {
            NoteState::Holding { ticks_hit: 0 }
        } else {
            NoteState::Hit
        };

        log::debug!(
            "ENGINE: {} on {} ({:+.1}ms)",
            judgement_label(judgement),
            note.id,
            offset_ms
        );

        self.apply_judgement(judgement, now, lane, Some(offset_ms));
        self.advance_head();
        Some(judgement)
    }

    /// Lets go of `lane`. A hold being held there becomes `Released`.
    pub fn on_lane_release(&mut self, lane: usize) {
        if self.phase != Phase::Running || lane >= self.keys_held.len() {
            return;
        }
        self.keys_held[lane] = false;

        for note in self.chart.iter_mut().skip(self.head_index) {
            if note.lane != lane {
                continue;
            }
            if let NoteState::Holding { ticks_hit } = note.state {
                note.state = NoteState::Released { ticks_hit };
                log::debug!("ENGINE: Released {} after {} ticks", note.id, ticks_hit);
            }
        }
    }
}

fn judgement_label(judgement: Judgement) -> &'static str {
    match judgement {
        Judgement::Perfect => "PERFECT",
        Judgement::Great => "GREAT",
        Judgement::Good => "GOOD",
        Judgement::Miss => "MISS",
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::config::GameConfig;
    use crate::models::engine::NoteState;
    use crate::models::stats::Judgement;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn on_time_press_is_perfect() {
        let mut engine = running(vec![tap(0, 2000.0, 0)], &GameConfig::default());

        assert_eq!(engine.on_lane_press(0, 2000.0), Some(Judgement::Perfect));
        let state = engine.state();
        assert!(approx(state.score, 300.0));
        assert_eq!(state.combo, 1);
        assert_eq!(state.max_combo, 1);
        assert_eq!(state.health, 100.0);
        assert_eq!(state.hit_stats.perfect, 1);
        assert_eq!(state.perfect_streak, 1);
        assert!(engine.chart()[0].is_hit());

        let last = state.last_judgement.unwrap();
        assert_eq!(last.lane, 0);
        assert_eq!(last.offset_ms, Some(0.0));
    }

    #[test]
    fn judgement_follows_distance() {
        let mut engine = running(
            vec![tap(0, 2000.0, 0), tap(1, 3000.0, 1), tap(2, 4000.0, 2)],
            &GameConfig::default(),
        );

        assert_eq!(engine.on_lane_press(0, 2080.0), Some(Judgement::Great));
        assert_eq!(engine.on_lane_press(1, 2880.0), Some(Judgement::Good));
        assert_eq!(engine.on_lane_press(2, 4040.0), Some(Judgement::Perfect));
        assert_eq!(engine.state().perfect_streak, 1);
    }

    #[test]
    fn closest_pending_note_is_claimed() {
        let mut engine = running(
            vec![tap(0, 2000.0, 0), tap(1, 2200.0, 0)],
            &GameConfig::default(),
        );

        assert_eq!(engine.on_lane_press(0, 2150.0), Some(Judgement::Perfect));
        assert!(engine.chart()[0].is_pending());
        assert!(engine.chart()[1].is_hit());
    }

    #[test]
    fn press_past_good_window_is_a_miss() {
        let mut engine = running(
            vec![tap(0, 2000.0, 0), tap(1, 2100.0, 1), tap(2, 5000.0, 0)],
            &GameConfig::default(),
        );
        engine.on_lane_press(1, 2100.0);

        assert_eq!(engine.on_lane_press(0, 2200.0), Some(Judgement::Miss));
        let state = engine.state();
        assert_eq!(state.combo, 0);
        assert_eq!(state.max_combo, 1);
        assert_eq!(state.health, 85.0);
        assert!(!state.full_combo);
        assert_eq!(engine.chart()[0].state, NoteState::Missed);
    }

    #[test]
    fn press_outside_miss_window_is_ignored() {
        let mut engine = running(vec![tap(0, 2000.0, 0)], &GameConfig::default());

        assert_eq!(engine.on_lane_press(0, 2250.0), None);
        assert_eq!(engine.on_lane_press(1, 2000.0), None);
        assert_eq!(engine.on_lane_press(9, 2000.0), None);
        assert!(engine.chart()[0].is_pending());
        assert_eq!(engine.state().hit_stats.miss, 0);
    }

    #[test]
    fn sync_offset_shifts_judge_time() {
        let config = GameConfig {
            sync_offset_ms: 100,
            ..Default::default()
        };
        let mut engine = running(vec![tap(0, 2000.0, 0)], &config);

        assert_eq!(engine.on_lane_press(0, 1900.0), Some(Judgement::Perfect));
    }

    #[test]
    fn combo_scales_score() {
        let mut engine = running(
            vec![tap(0, 2000.0, 0), tap(1, 2500.0, 1), tap(2, 3000.0, 2)],
            &GameConfig::default(),
        );
        engine.on_lane_press(0, 2000.0);
        engine.on_lane_press(1, 2500.0);
        engine.on_lane_press(2, 3000.0);

        // 300 + 300 * 1.05 + 300 * 1.10
        assert!(approx(engine.state().score, 945.0));
        assert_eq!(engine.state().combo, 3);
    }

    #[test]
    fn fever_doubles_the_triggering_hit() {
        let mut engine = running(
            vec![tap(0, 2000.0, 0), tap(1, 3000.0, 0)],
            &GameConfig::default(),
        );

        engine.state.combo = 49;
        engine.on_lane_press(0, 2000.0);
        assert!(!engine.state().fever);
        assert!(approx(engine.state().score, 300.0 * 3.45));

        engine.state.score = 0.0;
        engine.on_lane_press(0, 3000.0);
        assert!(engine.state().fever);
        assert_eq!(engine.state().fever_multiplier, 2.0);
        assert!(approx(engine.state().score, 300.0 * 3.5 * 2.0));
    }

    #[test]
    fn hold_press_starts_holding_and_release_lets_go() {
        let mut engine = running(vec![hold(0, 2000.0, 0, 1000.0)], &GameConfig::default());

        assert_eq!(engine.on_lane_press(0, 2010.0), Some(Judgement::Perfect));
        assert_eq!(engine.chart()[0].state, NoteState::Holding { ticks_hit: 0 });
        assert!(engine.chart()[0].is_holding());

        engine.on_lane_release(0);
        assert_eq!(engine.chart()[0].state, NoteState::Released { ticks_hit: 0 });

        // A released hold cannot be claimed again.
        assert_eq!(engine.on_lane_press(0, 2100.0), None);
    }

    #[test]
    fn release_without_hold_is_a_noop() {
        let mut engine = running(vec![tap(0, 2000.0, 0)], &GameConfig::default());
        engine.on_lane_release(0);
        engine.on_lane_release(7);

        assert!(engine.chart()[0].is_pending());
        assert!(engine.state().last_judgement.is_none());
    }
}
