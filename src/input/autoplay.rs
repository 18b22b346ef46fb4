//! Autoplay input source.
//!
//! Turns a chart into timed key events and feeds them into the session's
//! raw input channel at the right moments, the way a recorded replay would.

use super::events::RawInputEvent;
use super::manager::InputManager;
use crate::logic::time::SystemTimeSource;
use crate::models::engine::Note;
use crossbeam_channel::Sender;
use std::thread;
use std::time::Instant;

/// How long a tap key stays down.
const TAP_PRESS_MS: f64 = 40.0;
/// Holds are let go this long after their end.
const HOLD_RELEASE_GRACE_MS: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduledInput {
    /// Corrected playback time at which to send the event.
    pub at_ms: f64,
    pub event: RawInputEvent,
}

/// Builds a press and a release for every note, timed to land dead on once
/// `sync_offset_ms` is applied.
pub fn schedule(
    chart: &[Note],
    manager: &InputManager,
    sync_offset_ms: f64,
) -> Vec<ScheduledInput> {
    let mut inputs = Vec::with_capacity(chart.len() * 2);

    for (i, note) in chart.iter().enumerate() {
        let Some(key) = manager.key_for_lane(note.lane) else {
            continue;
        };

        let press_at = note.time_ms - sync_offset_ms;
        let hold_for = if note.is_hold() {
            note.kind.duration() + HOLD_RELEASE_GRACE_MS
        } else {
            TAP_PRESS_MS
        };
        let mut release_at = press_at + hold_for;

        // Let go before the next note in the same lane.
        if let Some(next) = chart[i + 1..].iter().find(|n| n.lane == note.lane) {
            let next_press = next.time_ms - sync_offset_ms;
            release_at = release_at.min(next_press - 1.0).max(press_at);
        }

        inputs.push(ScheduledInput {
            at_ms: press_at,
            event: RawInputEvent::pressed(key),
        });
        inputs.push(ScheduledInput {
            at_ms: release_at,
            event: RawInputEvent::released(key),
        });
    }

    // Stable: a release and a press at the same instant keep note order.
    inputs.sort_by(|a, b| a.at_ms.total_cmp(&b.at_ms));
    inputs
}

/// Spawns the thread that replays `inputs` on `clock`, which should share its
/// origin with the session's time source.
pub fn start_thread(
    tx: Sender<RawInputEvent>,
    inputs: Vec<ScheduledInput>,
    clock: SystemTimeSource,
) -> thread::JoinHandle<()> {
    thread::Builder::new()
        .name("Autoplay Thread".to_string())
        .spawn(move || {
            log::info!("INPUT: Autoplay started ({} events)", inputs.len());

            for input in inputs {
                let due = clock.instant_at(input.at_ms);
                let now = Instant::now();
                if due > now {
                    thread::sleep(due - now);
                }
                if tx.send(input.event).is_err() {
                    log::debug!("INPUT: Session gone, autoplay stopping");
                    break;
                }
            }

            log::info!("INPUT: Autoplay finished");
        })
        .expect("Failed to spawn Autoplay thread")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::config::GameConfig;
    use crate::models::engine::{NoteId, NoteSource};
    use winit::event::ElementState;
    use winit::keyboard::KeyCode;

    fn tap(index: usize, time_ms: f64, lane: usize) -> Note {
        Note::tap(NoteId::new(NoteSource::Beat, index), time_ms, lane)
    }

    #[test]
    fn every_note_gets_a_press_and_release() {
        let manager = InputManager::new(&GameConfig::default());
        let chart = vec![
            tap(0, 2000.0, 0),
            Note::hold(NoteId::new(NoteSource::Bar, 0), 2500.0, 2, 1000.0),
        ];

        let inputs = schedule(&chart, &manager, 0.0);
        let timeline: Vec<_> = inputs
            .iter()
            .map(|i| (i.at_ms, i.event.keycode, i.event.state))
            .collect();

        assert_eq!(
            timeline,
            vec![
                (2000.0, KeyCode::KeyD, ElementState::Pressed),
                (2040.0, KeyCode::KeyD, ElementState::Released),
                (2500.0, KeyCode::KeyJ, ElementState::Pressed),
                (3550.0, KeyCode::KeyJ, ElementState::Released),
            ]
        );
    }

    #[test]
    fn release_comes_before_next_press_in_lane() {
        let manager = InputManager::new(&GameConfig::default());
        let chart = vec![tap(0, 2000.0, 1), tap(1, 2020.0, 1)];

        let inputs = schedule(&chart, &manager, 0.0);
        assert_eq!(inputs[1].at_ms, 2019.0);
        assert_eq!(inputs[1].event.state, ElementState::Released);
        assert_eq!(inputs[2].at_ms, 2020.0);
        assert_eq!(inputs[2].event.state, ElementState::Pressed);
    }

    #[test]
    fn sync_offset_moves_presses_earlier() {
        let manager = InputManager::new(&GameConfig::default());
        let inputs = schedule(&[tap(0, 2000.0, 0)], &manager, 30.0);
        assert_eq!(inputs[0].at_ms, 1970.0);
    }
}
