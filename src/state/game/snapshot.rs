//! Snapshot creation for GameEngine - snapshot, note_opacity

use super::GameEngine;
use crate::models::engine::APPROACH_WINDOW_MS;
use crate::shared::snapshot::{GameplaySnapshot, NoteView};

/// Notes stay listed this long after their end so release feedback can draw.
const TRAIL_MS: f64 = 100.0;

impl GameEngine {
    /// Creates a snapshot of the current session state for rendering.
    pub fn snapshot(&self, corrected_time_ms: f64) -> GameplaySnapshot {
        let now = self.judge_time(corrected_time_ms);
        let max_visible_time = now + APPROACH_WINDOW_MS;

        let visible_notes = self
            .chart
            .iter()
            .skip(self.head_index)
            .take_while(|n| n.time_ms <= max_visible_time)
            .filter(|n| !n.is_resolved() && n.end_time_ms() > now - TRAIL_MS)
            .map(|n| NoteView {
                id: n.id,
                kind: n.kind,
                lane: n.lane,
                time_ms: n.time_ms,
                state: n.state,
                opacity: note_opacity(n.time_ms - now, self.hidden, self.sudden),
            })
            .collect();

        let stats = &self.state.hit_stats;
        let judged = (stats.successful() + stats.miss) as usize;

        GameplaySnapshot {
            audio_time: now,
            timestamp: std::time::Instant::now(),
            phase: self.phase,
            visible_notes,
            keys_held: self.keys_held.clone(),
            score: self.state.score,
            accuracy: stats.accuracy(judged),
            combo: self.state.combo,
            max_combo: self.state.max_combo,
            health: self.state.health,
            hit_stats: stats.clone(),
            fever: self.state.fever,
            fever_multiplier: self.state.fever_multiplier,
            perfect_streak: self.state.perfect_streak,
            remaining_notes: self.remaining_notes(),
            last_judgement: self.state.last_judgement,
        }
    }
}

/// Opacity of a note `time_until_ms` before its hit time.
///
/// Progress runs from 1 at the top of the approach window to 0 at the
/// judgement line. Hidden fades notes out between 40% and 20%; sudden
/// fades them in between 80% and 60%.
pub fn note_opacity(time_until_ms: f64, hidden: bool, sudden: bool) -> f32 {
    let progress = (time_until_ms / APPROACH_WINDOW_MS).clamp(0.0, 1.0);
    let mut alpha = 1.0;

    if hidden {
        alpha *= ((progress - 0.2) / 0.2).clamp(0.0, 1.0);
    }
    if sudden {
        alpha *= ((0.8 - progress) / 0.2).clamp(0.0, 1.0);
    }
    alpha as f32
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::models::config::{GameConfig, Modifiers};

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn plain_notes_are_fully_visible() {
        assert_eq!(note_opacity(900.0, false, false), 1.0);
        assert_eq!(note_opacity(0.0, false, false), 1.0);
    }

    #[test]
    fn hidden_fades_near_the_judgement_line() {
        assert!(approx(note_opacity(1000.0, true, false), 1.0));
        assert!(approx(note_opacity(400.0, true, false), 1.0));
        assert!(approx(note_opacity(300.0, true, false), 0.5));
        assert!(approx(note_opacity(200.0, true, false), 0.0));
        assert!(approx(note_opacity(-50.0, true, false), 0.0));
    }

    #[test]
    fn sudden_appears_late() {
        assert!(approx(note_opacity(900.0, false, true), 0.0));
        assert!(approx(note_opacity(700.0, false, true), 0.5));
        assert!(approx(note_opacity(600.0, false, true), 1.0));
        assert!(approx(note_opacity(100.0, false, true), 1.0));
    }

    #[test]
    fn snapshot_lists_notes_in_the_approach_window() {
        let config = GameConfig {
            modifiers: Modifiers {
                hidden: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let mut engine = running(
            vec![tap(0, 2000.0, 0), tap(1, 2300.0, 1), tap(2, 3500.0, 2)],
            &config,
        );
        engine.on_lane_press(0, 2000.0);

        let snapshot = engine.snapshot(1700.0);
        let ids: Vec<_> = snapshot.visible_notes.iter().map(|n| n.id.index).collect();
        assert_eq!(ids, vec![1]);
        assert!(approx(snapshot.visible_notes[0].opacity, 1.0));
        assert!(snapshot.keys_held[0]);
        assert_eq!(snapshot.combo, 1);
        assert_eq!(snapshot.accuracy, 100.0);
        assert_eq!(snapshot.remaining_notes, 2);
    }
}
