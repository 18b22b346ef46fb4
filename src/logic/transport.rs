//! Host media transport seen by a session.
//!
//! The transport is only ever polled: progress and play state are read on
//! fixed intervals, never pushed.

use crate::models::timeline::TrackInfo;
use std::time::Instant;

/// Playback control and state of the external media player.
pub trait Transport {
    /// Current playback position in milliseconds.
    fn progress_ms(&self) -> f64;

    fn is_playing(&self) -> bool;

    fn seek(&mut self, position_ms: f64);

    fn play(&mut self);

    fn pause(&mut self);

    /// Identity of the loaded track, if the host reports one.
    fn track_id(&self) -> Option<String>;

    /// Track metadata from the host. `None` defers to the feature timeline.
    fn track_info(&self) -> Option<TrackInfo> {
        None
    }
}

/// Wall-clock driven stand-in for a media player.
///
/// `rate` scales how fast the reported position moves relative to real
/// time, which lets the drift correction be exercised without real audio.
pub struct SimulatedTransport {
    track_id: String,
    track: TrackInfo,
    rate: f64,
    anchor: Instant,
    anchor_progress_ms: f64,
    playing: bool,
}

impl SimulatedTransport {
    pub fn new(track_id: impl Into<String>, track: TrackInfo, rate: f64) -> Self {
        Self {
            track_id: track_id.into(),
            track,
            rate: if rate > 0.0 { rate } else { 1.0 },
            anchor: Instant::now(),
            anchor_progress_ms: 0.0,
            playing: false,
        }
    }

    fn raw_progress_ms(&self) -> f64 {
        if self.playing {
            self.anchor_progress_ms + self.anchor.elapsed().as_secs_f64() * 1000.0 * self.rate
        } else {
            self.anchor_progress_ms
        }
    }

    fn duration_ms(&self) -> Option<f64> {
        let duration = self.track.duration_ms();
        (duration > 0.0).then_some(duration)
    }

    fn reanchor(&mut self, position_ms: f64) {
        self.anchor = Instant::now();
        self.anchor_progress_ms = position_ms;
    }
}

impl Transport for SimulatedTransport {
    fn progress_ms(&self) -> f64 {
        let progress = self.raw_progress_ms();
        match self.duration_ms() {
            Some(duration) => progress.min(duration),
            None => progress,
        }
    }

    fn is_playing(&self) -> bool {
        self.playing
            && self
                .duration_ms()
                .is_none_or(|duration| self.raw_progress_ms() < duration)
    }

    fn seek(&mut self, position_ms: f64) {
        self.reanchor(position_ms.max(0.0));
    }

    fn play(&mut self) {
        if !self.playing {
            let position = self.progress_ms();
            self.reanchor(position);
            self.playing = true;
        }
    }

    fn pause(&mut self) {
        if self.playing {
            let position = self.progress_ms();
            self.reanchor(position);
            self.playing = false;
        }
    }

    fn track_id(&self) -> Option<String> {
        Some(self.track_id.clone())
    }

    fn track_info(&self) -> Option<TrackInfo> {
        Some(self.track)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> SimulatedTransport {
        SimulatedTransport::new(
            "demo",
            TrackInfo {
                tempo: Some(120.0),
                duration: 60.0,
            },
            1.0,
        )
    }

    #[test]
    fn starts_stopped_at_zero() {
        let transport = transport();
        assert!(!transport.is_playing());
        assert_eq!(transport.progress_ms(), 0.0);
        assert_eq!(transport.track_id().as_deref(), Some("demo"));
    }

    #[test]
    fn seek_moves_position_while_stopped() {
        let mut transport = transport();
        transport.seek(5000.0);
        assert_eq!(transport.progress_ms(), 5000.0);

        transport.seek(-10.0);
        assert_eq!(transport.progress_ms(), 0.0);
    }

    #[test]
    fn pause_holds_position() {
        let mut transport = transport();
        transport.seek(2000.0);
        transport.play();
        assert!(transport.is_playing());
        assert!(transport.progress_ms() >= 2000.0);

        transport.pause();
        let frozen = transport.progress_ms();
        assert!(!transport.is_playing());
        assert_eq!(transport.progress_ms(), frozen);
    }

    #[test]
    fn position_is_capped_at_track_end() {
        let mut transport = transport();
        transport.seek(90_000.0);
        assert_eq!(transport.progress_ms(), 60_000.0);

        transport.play();
        assert!(!transport.is_playing());
    }
}
