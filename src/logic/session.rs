//! One playable session: chart, engine, clock and transport together.

use super::clock::{ClockSync, PlayStateChange};
use super::time::TimeSource;
use super::transport::Transport;
use crate::chart;
use crate::error::SessionError;
use crate::input::{GameAction, InputManager, RawInputEvent};
use crate::models::config::GameConfig;
use crate::models::stats::Judgement;
use crate::models::timeline::{FeatureTimeline, TrackInfo};
use crate::shared::result::{SessionResult, storage_key};
use crate::shared::snapshot::GameplaySnapshot;
use crate::state::game::{GameEngine, Phase};

pub struct GameSession<T: Transport, C: TimeSource> {
    engine: GameEngine,
    clock: ClockSync,
    input: InputManager,
    transport: T,
    time: C,
    track_id: Option<String>,
    storage_key: String,
}

impl<T: Transport, C: TimeSource> GameSession<T, C> {
    /// Generates the chart and prepares a session that has not started yet.
    pub fn new(
        timeline: &FeatureTimeline,
        config: &GameConfig,
        transport: T,
        time: C,
    ) -> Result<Self, SessionError> {
        config.validate()?;
        if timeline.beats.is_empty() {
            return Err(SessionError::NoBeats);
        }

        let track = merge_track_info(transport.track_info(), timeline.track);
        let notes = if track == timeline.track {
            chart::generate(timeline, config)
        } else {
            let timeline = FeatureTimeline {
                track,
                ..timeline.clone()
            };
            chart::generate(&timeline, config)
        };

        let track_id = transport.track_id();
        let storage_key = storage_key(
            track_id.as_deref().unwrap_or_default(),
            &config.difficulty.name,
        );

        log::info!(
            "SESSION: {} notes for {:?} ({}, {} lanes)",
            notes.len(),
            track_id,
            config.difficulty.name,
            config.lane_count
        );

        Ok(Self {
            engine: GameEngine::new(notes, config, track.duration_ms()),
            clock: ClockSync::new(),
            input: InputManager::new(config),
            transport,
            time,
            track_id,
            storage_key,
        })
    }

    /// Rewinds the transport, starts playback and the engine.
    pub fn start(&mut self) {
        self.transport.seek(0.0);
        self.transport.play();
        self.clock.start(self.time.now_ms(), 0.0);
        self.engine.start();
        log::info!("SESSION: Started");
    }

    pub fn corrected_time(&self) -> f64 {
        self.clock.corrected_time(self.time.now_ms())
    }

    /// Routes one raw key event. Returns the judgement of a lane press.
    pub fn handle_input(&mut self, event: RawInputEvent) -> Option<Judgement> {
        match self.input.process(event)? {
            GameAction::Hit { lane } => {
                let now = self.corrected_time();
                self.engine.on_lane_press(lane, now)
            }
            GameAction::Release { lane } => {
                self.engine.on_lane_release(lane);
                None
            }
            GameAction::TogglePause => {
                self.toggle_pause();
                None
            }
            GameAction::Restart => {
                self.restart();
                None
            }
            GameAction::Back => {
                self.abort("left by player");
                None
            }
        }
    }

    /// One engine tick at the current corrected time.
    pub fn tick(&mut self) -> Option<SessionResult> {
        let now = self.corrected_time();
        self.engine.tick(now)
    }

    /// Play-state poll: follows host pauses/resumes and track changes.
    pub fn poll_play_state(&mut self) {
        if self.engine.is_ended() {
            return;
        }
        if self.poll_track() {
            return;
        }

        let change = self.clock.observe_play_state(
            self.transport.is_playing(),
            self.engine.phase(),
            self.time.now_ms(),
            self.transport.progress_ms(),
        );
        match change {
            Some(PlayStateChange::Paused) => self.engine.pause(),
            Some(PlayStateChange::Resumed) => self.engine.resume(),
            None => {}
        }
    }

    /// Drift poll: pulls the local clock toward the transport position.
    pub fn poll_drift(&mut self) {
        if self.engine.phase() != Phase::Running {
            return;
        }
        let offset = self
            .clock
            .refresh_drift(self.time.now_ms(), self.transport.progress_ms());
        log::trace!("SESSION: Drift {:+.2}ms", offset);
    }

    /// Aborts when the host switched tracks. Returns `true` if it did.
    pub fn poll_track(&mut self) -> bool {
        let current = self.transport.track_id();
        if current == self.track_id {
            return false;
        }
        log::warn!(
            "SESSION: Track changed from {:?} to {:?}",
            self.track_id,
            current
        );
        self.abort("track changed");
        true
    }

    /// Asks the transport to pause or play. The engine follows on the next
    /// play-state poll.
    pub fn toggle_pause(&mut self) {
        match self.engine.phase() {
            Phase::Running => self.transport.pause(),
            Phase::Paused => self.transport.play(),
            _ => {}
        }
    }

    /// New attempt on the same chart.
    pub fn restart(&mut self) {
        if self.engine.phase() == Phase::NotStarted {
            return;
        }
        self.transport.seek(0.0);
        self.transport.play();
        self.clock.start(self.time.now_ms(), 0.0);
        self.input.clear_held();
        self.engine.restart();
    }

    pub fn abort(&mut self, reason: &str) {
        if !self.engine.is_ended() {
            log::warn!("SESSION: Aborted ({})", reason);
            self.engine.abort();
        }
    }

    pub fn snapshot(&self) -> GameplaySnapshot {
        self.engine.snapshot(self.corrected_time())
    }

    pub fn is_ended(&self) -> bool {
        self.engine.is_ended()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.engine.result()
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn input(&self) -> &InputManager {
        &self.input
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn time_source(&self) -> &C {
        &self.time
    }
}

/// Host metadata wins; the timeline fills in what the host does not know.
fn merge_track_info(host: Option<TrackInfo>, timeline: TrackInfo) -> TrackInfo {
    let Some(host) = host else {
        return timeline;
    };
    TrackInfo {
        tempo: host.tempo.filter(|t| *t > 0.0).or(timeline.tempo),
        duration: if host.duration > 0.0 {
            host.duration
        } else {
            timeline.duration
        },
    }
}
