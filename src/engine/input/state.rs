// Held-key state for the controlled character

use super::action::{Key, DOWN_KEYS, LEFT_KEYS, MOVEMENT_KEYS, RIGHT_KEYS, UP_KEYS};
use std::collections::HashSet;

/// Which logical keys are currently held
///
/// Pure data: edge-triggered key events write into it, the physics pass
/// reads it once per tick. The first key press of any kind flips
/// `started`, which gates the physics pass.
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down
    held: HashSet<Key>,

    /// Whether any key has ever been pressed
    started: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key edge. Last writer wins per key.
    pub fn set_key(&mut self, key: Key, pressed: bool) {
        if pressed {
            self.note_activity();
            self.held.insert(key);
        } else {
            self.held.remove(&key);
        }
    }

    /// A key was pressed that maps to no logical key; it still starts the game
    pub fn note_activity(&mut self) {
        if !self.started {
            log::info!("First input received, simulation started");
            self.started = true;
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn any_of(&self, keys: &[Key]) -> bool {
        keys.iter().any(|k| self.held.contains(k))
    }

    pub fn has_started(&self) -> bool {
        self.started
    }

    pub fn is_shift_held(&self) -> bool {
        self.is_held(Key::Shift)
    }

    pub fn is_any_movement_held(&self) -> bool {
        self.any_of(&MOVEMENT_KEYS)
    }

    pub fn up(&self) -> bool {
        self.any_of(&UP_KEYS)
    }

    pub fn down(&self) -> bool {
        self.any_of(&DOWN_KEYS)
    }

    pub fn left(&self) -> bool {
        self.any_of(&LEFT_KEYS)
    }

    pub fn right(&self) -> bool {
        self.any_of(&RIGHT_KEYS)
    }

    /// Release every key (window lost focus). `started` is kept.
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}
