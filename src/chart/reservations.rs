//! Per-lane hold spans used to keep taps clear of holds.

use crate::models::engine::HOLD_RESERVATION_PADDING_MS;

#[derive(Debug, Clone, Copy, PartialEq)]
struct HoldSpan {
    start_ms: f64,
    end_ms: f64,
}

#[derive(Debug, Clone, Default)]
pub struct HoldReservations {
    lanes: Vec<Vec<HoldSpan>>,
}

impl HoldReservations {
    pub fn new(lane_count: usize) -> Self {
        Self {
            lanes: vec![Vec::new(); lane_count],
        }
    }

    pub fn reserve(&mut self, lane: usize, start_ms: f64, duration_ms: f64) {
        if let Some(spans) = self.lanes.get_mut(lane) {
            spans.push(HoldSpan {
                start_ms,
                end_ms: start_ms + duration_ms,
            });
        }
    }

    /// `true` if a tap at `time_ms` falls in a padded hold span of `lane`.
    pub fn collides(&self, lane: usize, time_ms: f64) -> bool {
        self.any_span(lane, time_ms, HOLD_RESERVATION_PADDING_MS)
    }

    /// `true` if `time_ms` lies inside an unpadded hold span of `lane`.
    pub fn inside_hold(&self, lane: usize, time_ms: f64) -> bool {
        self.any_span(lane, time_ms, 0.0)
    }

    fn any_span(&self, lane: usize, time_ms: f64, padding_ms: f64) -> bool {
        self.lanes.get(lane).is_some_and(|spans| {
            spans
                .iter()
                .any(|s| time_ms >= s.start_ms - padding_ms && time_ms <= s.end_ms + padding_ms)
        })
    }
}
