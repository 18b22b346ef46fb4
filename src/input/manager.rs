use super::events::{GameAction, RawInputEvent};
use super::keycode::parse_keycode;
use crate::models::config::GameConfig;
use std::collections::{HashMap, HashSet};
use winit::event::ElementState;
use winit::keyboard::KeyCode;

/// Maps raw key events to session actions through the configured lane keys.
pub struct InputManager {
    bindings: HashMap<KeyCode, GameAction>,
    lane_keys: Vec<Option<KeyCode>>,
    held_keys: HashSet<KeyCode>,
}

impl InputManager {
    pub fn new(config: &GameConfig) -> Self {
        let mut manager = Self {
            bindings: HashMap::new(),
            lane_keys: Vec::new(),
            held_keys: HashSet::new(),
        };
        manager.load_default_bindings();
        manager.bind_lanes(&config.lane_keys(), config.lane_count);
        manager
    }

    pub fn process(&mut self, event: RawInputEvent) -> Option<GameAction> {
        if event.repeat {
            return None;
        }

        // A second press without a release in between counts as a repeat.
        match event.state {
            ElementState::Pressed => {
                if !self.held_keys.insert(event.keycode) {
                    return None;
                }
            }
            ElementState::Released => {
                self.held_keys.remove(&event.keycode);
            }
        }

        match (event.state, *self.bindings.get(&event.keycode)?) {
            (ElementState::Pressed, GameAction::Hit { lane }) => Some(GameAction::Hit { lane }),
            (ElementState::Released, GameAction::Hit { lane }) => {
                Some(GameAction::Release { lane })
            }
            (ElementState::Pressed, action) => Some(action),
            _ => None,
        }
    }

    /// Key bound to `lane`, if any.
    pub fn key_for_lane(&self, lane: usize) -> Option<KeyCode> {
        self.lane_keys.get(lane).copied().flatten()
    }

    /// Forgets held keys, e.g. after a restart.
    pub fn clear_held(&mut self) {
        self.held_keys.clear();
    }

    fn bind_lanes(&mut self, names: &[String], lane_count: usize) {
        self.bindings
            .retain(|_, action| !matches!(action, GameAction::Hit { .. }));
        self.lane_keys.clear();

        for (lane, name) in names.iter().take(lane_count).enumerate() {
            match parse_keycode(name) {
                Some(code) => {
                    // Lane keys take precedence over control keys.
                    self.bindings.insert(code, GameAction::Hit { lane });
                    self.lane_keys.push(Some(code));
                }
                None => {
                    log::warn!("INPUT: Unknown key name {:?} for lane {}", name, lane);
                    self.lane_keys.push(None);
                }
            }
        }

        let bound = self.lane_keys.iter().flatten().count();
        if bound < lane_count {
            log::warn!("INPUT: Only {} of {} lanes have a key", bound, lane_count);
        }
    }

    fn load_default_bindings(&mut self) {
        self.bindings.insert(KeyCode::F5, GameAction::Restart);
        self.bindings.insert(KeyCode::Escape, GameAction::TogglePause);
        self.bindings.insert(KeyCode::Backspace, GameAction::Back);
    }
}
