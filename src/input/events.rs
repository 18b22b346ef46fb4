use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A physical key transition from the input source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawInputEvent {
    pub keycode: KeyCode,
    pub state: ElementState,
    /// OS key-repeat; never a new press.
    pub repeat: bool,
}

impl RawInputEvent {
    pub fn pressed(keycode: KeyCode) -> Self {
        Self {
            keycode,
            state: ElementState::Pressed,
            repeat: false,
        }
    }

    pub fn released(keycode: KeyCode) -> Self {
        Self {
            keycode,
            state: ElementState::Released,
            repeat: false,
        }
    }

    pub fn from_winit(event: &WindowEvent) -> Option<Self> {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(keycode),
                    state,
                    repeat,
                    ..
                },
            ..
        } = event
        {
            Some(Self {
                keycode: *keycode,
                state: *state,
                repeat: *repeat,
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    // Gameplay
    Hit { lane: usize },
    Release { lane: usize },
    Restart,

    // Session
    TogglePause,
    Back,
}
