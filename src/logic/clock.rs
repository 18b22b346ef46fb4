//! Reconciliation of the polled transport position with the local clock.
//!
//! Between polls the session extrapolates `now - game_start`. The drift
//! refresh pulls that mapping back toward the transport, and the play-state
//! poll infers pauses the host made on its own.

use crate::state::game::Phase;

/// Drift above this re-anchors the mapping outright.
pub const HARD_RESYNC_THRESHOLD_MS: f64 = 80.0;
/// Drift above this is corrected gradually.
pub const SOFT_RESYNC_THRESHOLD_MS: f64 = 5.0;
/// Fraction of the drift applied per refresh when correcting gradually.
pub const SOFT_RESYNC_FACTOR: f64 = 0.05;

/// A play-state transition the engine has to follow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayStateChange {
    Paused,
    Resumed,
}

#[derive(Clone, Debug, Default)]
pub struct ClockSync {
    /// Local time matching transport position 0 for this attempt.
    game_start_ms: f64,
    /// Last measured `progress - corrected`.
    last_offset_ms: f64,
    last_playing: Option<bool>,
    /// Corrected time captured when the transport paused.
    frozen_at_ms: Option<f64>,
}

impl ClockSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anchors a new attempt with the transport at `progress_ms` and playing.
    pub fn start(&mut self, now_ms: f64, progress_ms: f64) {
        self.game_start_ms = now_ms - progress_ms;
        self.last_offset_ms = 0.0;
        self.last_playing = Some(true);
        self.frozen_at_ms = None;
    }

    /// Playback time estimate used for judgement, never negative.
    pub fn corrected_time(&self, now_ms: f64) -> f64 {
        self.frozen_at_ms
            .unwrap_or(now_ms - self.game_start_ms)
            .max(0.0)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen_at_ms.is_some()
    }

    pub fn last_offset_ms(&self) -> f64 {
        self.last_offset_ms
    }

    /// Compares the transport position against the local estimate and
    /// corrects the mapping. Returns the measured offset.
    pub fn refresh_drift(&mut self, now_ms: f64, progress_ms: f64) -> f64 {
        if self.is_frozen() {
            return self.last_offset_ms;
        }

        let offset = progress_ms - (now_ms - self.game_start_ms);
        self.last_offset_ms = offset;

        if offset.abs() > HARD_RESYNC_THRESHOLD_MS {
            self.game_start_ms = now_ms - progress_ms;
            log::info!("CLOCK: Hard resync ({:+.1}ms drift)", offset);
        } else if offset.abs() > SOFT_RESYNC_THRESHOLD_MS {
            self.game_start_ms -= offset * SOFT_RESYNC_FACTOR;
            log::trace!("CLOCK: Nudged by {:+.2}ms", offset * SOFT_RESYNC_FACTOR);
        }
        offset
    }

    /// Feeds one play-state observation. Only transitions matter: seeing the
    /// same state again is a no-op.
    pub fn observe_play_state(
        &mut self,
        is_playing: bool,
        phase: Phase,
        now_ms: f64,
        progress_ms: f64,
    ) -> Option<PlayStateChange> {
        if self.last_playing.replace(is_playing) == Some(is_playing) {
            return None;
        }

        match (is_playing, phase) {
            (true, Phase::Paused) => {
                self.game_start_ms = now_ms - progress_ms;
                self.frozen_at_ms = None;
                log::info!("CLOCK: Transport resumed at {:.0}ms", progress_ms);
                Some(PlayStateChange::Resumed)
            }
            (false, Phase::Running) => {
                self.frozen_at_ms = Some(self.corrected_time(now_ms));
                log::info!("CLOCK: Transport paused at {:.0}ms", progress_ms);
                Some(PlayStateChange::Paused)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(now_ms: f64) -> ClockSync {
        let mut clock = ClockSync::new();
        clock.start(now_ms, 0.0);
        clock
    }

    #[test]
    fn corrected_time_extrapolates_locally() {
        let clock = started(10_000.0);
        assert_eq!(clock.corrected_time(10_000.0), 0.0);
        assert_eq!(clock.corrected_time(12_500.0), 2500.0);
    }

    #[test]
    fn corrected_time_is_clamped_to_zero() {
        let clock = started(10_000.0);
        assert_eq!(clock.corrected_time(9_000.0), 0.0);
    }

    #[test]
    fn small_drift_is_left_alone() {
        let mut clock = started(0.0);
        assert_eq!(clock.refresh_drift(1000.0, 1004.0), 4.0);
        assert_eq!(clock.corrected_time(1000.0), 1000.0);
    }

    #[test]
    fn moderate_drift_is_nudged() {
        let mut clock = started(0.0);
        clock.refresh_drift(1000.0, 1040.0);
        assert_eq!(clock.last_offset_ms(), 40.0);
        assert!((clock.corrected_time(1000.0) - 1002.0).abs() < 1e-9);
    }

    #[test]
    fn large_drift_reanchors() {
        let mut clock = started(0.0);
        clock.refresh_drift(1000.0, 1200.0);
        assert_eq!(clock.corrected_time(1000.0), 1200.0);
        assert_eq!(clock.corrected_time(1100.0), 1300.0);

        clock.refresh_drift(2000.0, 1800.0);
        assert_eq!(clock.corrected_time(2000.0), 1800.0);
    }

    #[test]
    fn pause_freezes_and_resume_reanchors() {
        let mut clock = started(0.0);

        let change = clock.observe_play_state(false, Phase::Running, 3000.0, 3000.0);
        assert_eq!(change, Some(PlayStateChange::Paused));
        assert_eq!(clock.corrected_time(3000.0), 3000.0);
        assert_eq!(clock.corrected_time(8000.0), 3000.0);

        // Drift refreshes do not move a frozen clock.
        clock.refresh_drift(8000.0, 3000.0);
        assert_eq!(clock.corrected_time(8000.0), 3000.0);

        let change = clock.observe_play_state(true, Phase::Paused, 9000.0, 3000.0);
        assert_eq!(change, Some(PlayStateChange::Resumed));
        assert_eq!(clock.corrected_time(9000.0), 3000.0);
        assert_eq!(clock.corrected_time(9500.0), 3500.0);
    }

    #[test]
    fn repeated_state_is_a_noop() {
        let mut clock = started(0.0);
        assert_eq!(
            clock.observe_play_state(true, Phase::Running, 100.0, 100.0),
            None
        );

        clock.observe_play_state(false, Phase::Running, 200.0, 200.0);
        assert_eq!(
            clock.observe_play_state(false, Phase::Paused, 300.0, 200.0),
            None
        );
        assert_eq!(clock.corrected_time(5000.0), 200.0);
    }

    #[test]
    fn transitions_outside_matching_phase_are_ignored() {
        let mut clock = started(0.0);
        assert_eq!(
            clock.observe_play_state(false, Phase::Ended, 100.0, 100.0),
            None
        );
        assert!(!clock.is_frozen());
    }
}
