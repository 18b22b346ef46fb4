//! Post-passes that align taps: near-simultaneity sync and tempo-grid snap.
//!
//! Both passes leave holds untouched and never move a tap into a hold span
//! of its own lane or into the warm-up second. The grid snap also never
//! lands a tap on top of another note in its lane.

use super::reservations::HoldReservations;
use crate::models::engine::{
    DUPLICATE_WINDOW_MS, GRID_SNAP_TOLERANCE, Note, SYNC_THRESHOLD_MS, WARM_UP_MS,
};

/// Snaps taps in different lanes that are within `SYNC_THRESHOLD_MS` of an
/// earlier tap onto that tap's time. Expects `notes` sorted by time.
pub fn synchronize(notes: &mut [Note], reservations: &HoldReservations) {
    let mut snapped = 0usize;

    for i in 0..notes.len() {
        if notes[i].is_hold() {
            continue;
        }
        let anchor_time = notes[i].time_ms;
        let anchor_lane = notes[i].lane;

        for j in (i + 1)..notes.len() {
            let gap = notes[j].time_ms - anchor_time;
            if gap > SYNC_THRESHOLD_MS {
                break;
            }
            // Already pulled onto an earlier anchor.
            if gap <= 0.0 {
                continue;
            }

            let note = &mut notes[j];
            if note.is_hold() || note.lane == anchor_lane {
                continue;
            }
            if reservations.inside_hold(note.lane, anchor_time) {
                continue;
            }
            note.time_ms = anchor_time;
            snapped += 1;
        }
    }

    log::debug!("CHART: Synchronized {} near-simultaneous notes", snapped);
}

/// Snaps taps to the nearest quarter-beat of `tempo` (BPM).
pub fn snap_to_grid(notes: &mut [Note], tempo: f64, reservations: &HoldReservations) {
    if tempo <= 0.0 {
        return;
    }

    let quarter_beat_ms = 15000.0 / tempo;
    let tolerance_ms = quarter_beat_ms * GRID_SNAP_TOLERANCE;
    let mut snapped = 0usize;

    for i in 0..notes.len() {
        if notes[i].is_hold() {
            continue;
        }
        let time_ms = notes[i].time_ms;
        let lane = notes[i].lane;

        let target = (time_ms / quarter_beat_ms).round() * quarter_beat_ms;
        if time_ms == target || (time_ms - target).abs() > tolerance_ms {
            continue;
        }
        if target < WARM_UP_MS || reservations.inside_hold(lane, target) {
            continue;
        }
        if crowds_lane(notes, i, target) {
            continue;
        }
        notes[i].time_ms = target;
        snapped += 1;
    }

    log::debug!(
        "CHART: Snapped {} notes to a {:.2}ms grid",
        snapped,
        quarter_beat_ms
    );
}

/// `true` if moving `notes[index]` to `target` would put it within the
/// duplicate window of another note in its lane that it was clear of before.
fn crowds_lane(notes: &[Note], index: usize, target: f64) -> bool {
    let moving = &notes[index];
    notes.iter().enumerate().any(|(j, other)| {
        j != index
            && other.lane == moving.lane
            && (other.time_ms - target).abs() <= DUPLICATE_WINDOW_MS
            && (other.time_ms - moving.time_ms).abs() > DUPLICATE_WINDOW_MS
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::{NoteId, NoteSource};

    fn tap(index: usize, time_ms: f64, lane: usize) -> Note {
        Note::tap(NoteId::new(NoteSource::Beat, index), time_ms, lane)
    }

    #[test]
    fn close_taps_in_different_lanes_are_synced() {
        let mut notes = vec![tap(0, 2000.0, 0), tap(1, 2060.0, 1), tap(2, 2200.0, 2)];
        synchronize(&mut notes, &HoldReservations::new(4));

        assert_eq!(notes[1].time_ms, 2000.0);
        assert_eq!(notes[2].time_ms, 2200.0);
    }

    #[test]
    fn same_lane_taps_are_not_synced() {
        let mut notes = vec![tap(0, 2000.0, 1), tap(1, 2050.0, 1)];
        synchronize(&mut notes, &HoldReservations::new(4));
        assert_eq!(notes[1].time_ms, 2050.0);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut notes = vec![tap(0, 2000.0, 0), tap(1, 2080.0, 3)];
        synchronize(&mut notes, &HoldReservations::new(4));
        assert_eq!(notes[1].time_ms, 2000.0);
    }

    #[test]
    fn holds_are_left_alone() {
        let hold = Note::hold(NoteId::new(NoteSource::Bar, 0), 2000.0, 0, 500.0);
        let mut notes = vec![hold, tap(1, 2040.0, 1)];
        synchronize(&mut notes, &HoldReservations::new(4));
        assert_eq!(notes[1].time_ms, 2040.0);
    }

    #[test]
    fn grid_snap_rounds_to_quarter_beats() {
        // 120 BPM: quarter-beat of 125ms.
        let mut notes = vec![tap(0, 2040.0, 0), tap(1, 2070.0, 1)];
        snap_to_grid(&mut notes, 120.0, &HoldReservations::new(4));

        assert_eq!(notes[0].time_ms, 2000.0);
        assert_eq!(notes[1].time_ms, 2125.0);
    }

    #[test]
    fn grid_snap_never_enters_warm_up() {
        // 151 BPM: the grid point nearest to 1002ms is ~993ms.
        let mut notes = vec![tap(0, 1002.0, 0)];
        snap_to_grid(&mut notes, 151.0, &HoldReservations::new(4));
        assert_eq!(notes[0].time_ms, 1002.0);
    }

    #[test]
    fn grid_snap_never_stacks_taps_in_one_lane() {
        // 60 BPM: 2124 rounds to 2000, where lane 0 already has a tap.
        let mut notes = vec![tap(0, 2000.0, 0), tap(1, 2124.0, 0), tap(2, 2124.0, 1)];
        snap_to_grid(&mut notes, 60.0, &HoldReservations::new(4));

        assert_eq!(notes[1].time_ms, 2124.0);
        assert_eq!(notes[2].time_ms, 2000.0);
    }

    #[test]
    fn grid_snap_never_enters_a_hold() {
        let mut reservations = HoldReservations::new(4);
        reservations.reserve(2, 3000.0, 1000.0);
        // 60 BPM: quarter-beat of 250ms, 2880 rounds to 3000.
        let mut notes = vec![tap(0, 2880.0, 2)];
        snap_to_grid(&mut notes, 60.0, &reservations);
        assert_eq!(notes[0].time_ms, 2880.0);
    }
}
