//! Shared channel infrastructure between threads.
//!
//! The `SessionBus` connects the input source, the session thread and
//! whatever renders or stores its output.

use crate::input::events::RawInputEvent;
use crate::shared::result::SessionResult;
use crate::shared::snapshot::GameplaySnapshot;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

/// System-level events for the session thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    /// Application shutdown requested.
    Quit,
}

/// Aggregates the cross-thread communication channels.
#[derive(Clone)]
pub struct SessionBus {
    /// Input source → Session: raw keyboard events.
    pub raw_input_tx: Sender<RawInputEvent>,
    pub raw_input_rx: Receiver<RawInputEvent>,

    /// Session → Render: gameplay snapshots.
    pub snapshot_tx: Sender<GameplaySnapshot>,
    pub snapshot_rx: Receiver<GameplaySnapshot>,

    /// Session → Persistence: the one-shot result.
    pub result_tx: Sender<SessionResult>,
    pub result_rx: Receiver<SessionResult>,

    /// Main → Session: system events.
    pub sys_tx: Sender<SystemEvent>,
    pub sys_rx: Receiver<SystemEvent>,
}

impl SessionBus {
    pub fn new() -> Self {
        let (raw_input_tx, raw_input_rx) = unbounded();
        // Small buffer: a slow renderer drops frames instead of stalling judgement.
        let (snapshot_tx, snapshot_rx) = bounded(2);
        let (result_tx, result_rx) = unbounded();
        let (sys_tx, sys_rx) = unbounded();

        Self {
            raw_input_tx,
            raw_input_rx,
            snapshot_tx,
            snapshot_rx,
            result_tx,
            result_rx,
            sys_tx,
            sys_rx,
        }
    }
}

impl Default for SessionBus {
    fn default() -> Self {
        Self::new()
    }
}
