//! Raw key events, lane bindings and the autoplay input source.

pub mod autoplay;
pub mod events;
pub mod keycode;
pub mod manager;

pub use events::{GameAction, RawInputEvent};
pub use manager::InputManager;
