//! Session thread and the timing pieces it is built from.
//!
//! The runner multiplexes raw input, the frame tick and the two transport
//! polls on one thread, so every engine mutation happens in one place.

pub mod clock;
pub mod session;
pub mod time;
pub mod transport;

use crate::shared::result::SessionResult;
use crate::system::bus::{SessionBus, SystemEvent};
use crossbeam_channel::{select, tick};
use session::GameSession;
use std::thread;
use std::time::Duration;
use time::TimeSource;
use transport::Transport;

/// Engine tick and snapshot cadence (~60 Hz).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);
/// Play/pause inference cadence.
pub const PLAY_STATE_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Drift correction cadence.
pub const DRIFT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Spawns the session thread. The handle yields the result if the attempt
/// ended normally, `None` if it was aborted.
pub fn start_thread<T, C>(
    bus: SessionBus,
    mut session: GameSession<T, C>,
) -> thread::JoinHandle<Option<SessionResult>>
where
    T: Transport + Send + 'static,
    C: TimeSource + Send + 'static,
{
    thread::Builder::new()
        .name("Session Thread".to_string())
        .spawn(move || {
            log::info!("RUNNER: Thread started");
            let result = run(&bus, &mut session);
            log::info!("RUNNER: Thread stopped");
            result
        })
        .expect("Failed to spawn Session thread")
}

/// Drives `session` until it ends, is aborted or a quit arrives.
pub fn run<T: Transport, C: TimeSource>(
    bus: &SessionBus,
    session: &mut GameSession<T, C>,
) -> Option<SessionResult> {
    let frame = tick(FRAME_INTERVAL);
    let play_state_poll = tick(PLAY_STATE_POLL_INTERVAL);
    let drift_poll = tick(DRIFT_POLL_INTERVAL);

    session.start();

    loop {
        select! {
            recv(bus.raw_input_rx) -> raw => {
                match raw {
                    Ok(event) => {
                        session.handle_input(event);
                    }
                    Err(_) => {
                        log::warn!("RUNNER: Input channel closed");
                        session.abort("input closed");
                    }
                }
            }
            recv(frame) -> _ => {
                if let Some(result) = session.tick() {
                    let _ = bus.snapshot_tx.try_send(session.snapshot());
                    if let Err(e) = bus.result_tx.send(result.clone()) {
                        log::error!("RUNNER: Failed to publish result: {}", e);
                    }
                    return Some(result);
                }
                // Renderer behind: drop the frame.
                let _ = bus.snapshot_tx.try_send(session.snapshot());
            }
            recv(play_state_poll) -> _ => session.poll_play_state(),
            recv(drift_poll) -> _ => session.poll_drift(),
            recv(bus.sys_rx) -> evt => {
                match evt {
                    Ok(SystemEvent::Quit) | Err(_) => {
                        log::info!("RUNNER: Quit received");
                        session.abort("quit");
                    }
                }
            }
        }

        if session.is_ended() {
            return session.result().cloned();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RawInputEvent;
    use crate::logic::time::SystemTimeSource;
    use crate::logic::transport::SimulatedTransport;
    use crate::models::config::GameConfig;
    use crate::models::timeline::{FeatureTimeline, TimeInterval, TrackInfo};
    use winit::keyboard::KeyCode;

    fn session(duration_secs: f64) -> GameSession<SimulatedTransport, SystemTimeSource> {
        let track = TrackInfo {
            tempo: None,
            duration: duration_secs,
        };
        let timeline = FeatureTimeline {
            beats: vec![TimeInterval {
                start: 20.0,
                duration: 0.5,
                confidence: 1.0,
            }],
            track,
            ..Default::default()
        };
        let transport = SimulatedTransport::new("runner-test", track, 1.0);
        GameSession::new(
            &timeline,
            &GameConfig::default(),
            transport,
            SystemTimeSource::new(),
        )
        .unwrap()
    }

    #[test]
    fn quit_aborts_without_result() {
        let bus = SessionBus::new();
        bus.sys_tx.send(SystemEvent::Quit).unwrap();

        let handle = start_thread(bus.clone(), session(60.0));
        assert_eq!(handle.join().unwrap(), None);
        assert!(bus.result_rx.try_recv().is_err());
    }

    #[test]
    fn back_key_aborts_without_result() {
        let bus = SessionBus::new();
        bus.raw_input_tx
            .send(RawInputEvent::pressed(KeyCode::Backspace))
            .unwrap();

        let handle = start_thread(bus.clone(), session(60.0));
        assert_eq!(handle.join().unwrap(), None);
    }

    #[test]
    fn short_track_ends_with_one_result() {
        // Ends at duration - 1s = 100ms of playback.
        let bus = SessionBus::new();
        let handle = start_thread(bus.clone(), session(1.1));

        let result = handle.join().unwrap().unwrap();
        assert_eq!(result.accuracy, 0.0);
        assert!(!result.is_dead);
        assert_eq!(bus.result_rx.try_recv().unwrap(), result);
        assert!(bus.result_rx.try_recv().is_err());
    }
}
