//! Chart generation from an audio feature timeline.
//!
//! Generation is a fixed sequence of passes:
//! 1. Holds from bars (3 stars and up), reserving their lanes
//! 2. Taps from thinned beats, shifted one lane or dropped on hold collision
//! 3. Taps from confident segments, dropped on collision or near-duplicate
//! 4. Sort, then drop everything inside the warm-up second
//! 5. Near-simultaneity sync, then tempo-grid snap
//!
//! Later passes rely on the reservations made by earlier ones, so the order
//! is fixed.

pub mod lanes;
pub mod reservations;
pub mod sync;

use crate::models::config::GameConfig;
use crate::models::engine::{
    HOLD_MIN_STAR_RATING, MAX_HOLD_DURATION_MS, Note, NoteId, NoteSource,
    DUPLICATE_WINDOW_MS, WARM_UP_MS,
};
use crate::models::timeline::FeatureTimeline;
use lanes::{LaneAssigner, feature_lane};
use rand::Rng;
use reservations::HoldReservations;

/// Generates a chart, drawing random lanes from the thread RNG when the
/// random modifier is on.
pub fn generate(timeline: &FeatureTimeline, config: &GameConfig) -> Vec<Note> {
    generate_with_rng(timeline, config, &mut rand::rng())
}

/// Generates a chart with an explicit random source. Without the random
/// modifier the source is never read and the output depends only on the inputs.
pub fn generate_with_rng<R: Rng + ?Sized>(
    timeline: &FeatureTimeline,
    config: &GameConfig,
    rng: &mut R,
) -> Vec<Note> {
    let lane_count = config.lane_count;
    if lane_count == 0 {
        log::warn!("CHART: No lanes configured, generating an empty chart");
        return Vec::new();
    }
    let lanes = LaneAssigner::new(lane_count, config.modifiers);
    let mut reservations = HoldReservations::new(lane_count);
    let mut notes = Vec::new();

    add_holds(timeline, config, &lanes, &mut reservations, &mut notes, rng);
    add_beat_taps(timeline, config, &lanes, &reservations, &mut notes, rng);
    add_segment_taps(timeline, config, &lanes, &reservations, &mut notes, rng);

    notes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));
    let before_warm_up = notes.len();
    notes.retain(|n| n.time_ms >= WARM_UP_MS);
    log::debug!(
        "CHART: Dropped {} notes inside the warm-up",
        before_warm_up - notes.len()
    );

    sync::synchronize(&mut notes, &reservations);
    if let Some(tempo) = timeline.tempo() {
        sync::snap_to_grid(&mut notes, tempo, &reservations);
    }
    notes.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

    log::info!(
        "CHART: Generated {} notes ({} holds) for {} lanes, {} ({} stars)",
        notes.len(),
        notes.iter().filter(|n| n.is_hold()).count(),
        lane_count,
        config.difficulty.name,
        config.difficulty.star_rating
    );

    notes
}

fn add_holds<R: Rng + ?Sized>(
    timeline: &FeatureTimeline,
    config: &GameConfig,
    lanes: &LaneAssigner,
    reservations: &mut HoldReservations,
    notes: &mut Vec<Note>,
    rng: &mut R,
) {
    let stars = config.difficulty.star_rating;
    if stars < HOLD_MIN_STAR_RATING {
        return;
    }
    let stride = 6usize.saturating_sub(stars as usize).max(1);

    for (index, bar) in timeline.bars.iter().enumerate().step_by(stride) {
        let duration_ms = (bar.duration * 1000.0).min(MAX_HOLD_DURATION_MS);
        if duration_ms <= 0.0 {
            continue;
        }
        let time_ms = bar.start * 1000.0;
        let lane = lanes.assign(feature_lane(bar.start, config.lane_count), rng);

        // Holds never stack in one lane.
        let end_ms = time_ms + duration_ms;
        if reservations.collides(lane, time_ms) || reservations.collides(lane, end_ms) {
            log::trace!("CHART: Dropping bar hold {} on lane {}", index, lane);
            continue;
        }

        reservations.reserve(lane, time_ms, duration_ms);
        notes.push(Note::hold(
            NoteId::new(NoteSource::Bar, index),
            time_ms,
            lane,
            duration_ms,
        ));
    }
}

fn add_beat_taps<R: Rng + ?Sized>(
    timeline: &FeatureTimeline,
    config: &GameConfig,
    lanes: &LaneAssigner,
    reservations: &HoldReservations,
    notes: &mut Vec<Note>,
    rng: &mut R,
) {
    let density = config.difficulty.note_density;
    let step = if density < 1.0 {
        ((1.0 / density).floor() as usize).max(1)
    } else {
        1
    };

    for (index, beat) in timeline.beats.iter().enumerate().step_by(step) {
        let time_ms = beat.start * 1000.0;
        let mut lane = lanes.assign(feature_lane(beat.start, config.lane_count), rng);

        if reservations.collides(lane, time_ms) {
            let shifted = (lane + 1) % config.lane_count;
            if reservations.collides(shifted, time_ms) {
                continue;
            }
            lane = shifted;
        }

        notes.push(Note::tap(NoteId::new(NoteSource::Beat, index), time_ms, lane));
    }
}

fn add_segment_taps<R: Rng + ?Sized>(
    timeline: &FeatureTimeline,
    config: &GameConfig,
    lanes: &LaneAssigner,
    reservations: &HoldReservations,
    notes: &mut Vec<Note>,
    rng: &mut R,
) {
    let threshold = config.difficulty.segment_confidence_threshold;

    for (index, segment) in timeline.segments.iter().enumerate() {
        if segment.confidence <= threshold {
            continue;
        }
        let time_ms = segment.start * 1000.0;
        let lane = lanes.assign((index + 2) % config.lane_count, rng);

        if reservations.collides(lane, time_ms) {
            continue;
        }
        let duplicate = notes
            .iter()
            .any(|n| n.lane == lane && (n.time_ms - time_ms).abs() <= DUPLICATE_WINDOW_MS);
        if duplicate {
            continue;
        }

        notes.push(Note::tap(
            NoteId::new(NoteSource::Segment, index),
            time_ms,
            lane,
        ));
    }
}
