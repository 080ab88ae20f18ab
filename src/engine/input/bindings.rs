// Keyboard bindings: physical winit keys -> logical keys

use super::action::{default_bindings, Key};
use std::collections::HashMap;
use winit::event::{ElementState, KeyEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// A translated key edge. `key` is `None` for keys with no binding;
/// those still count as activity for the start gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEdge {
    pub key: Option<Key>,
    pub pressed: bool,
}

/// Mapping from physical keys to logical keys
#[derive(Debug, Clone)]
pub struct KeyBindings {
    bindings: HashMap<KeyCode, Key>,
}

impl KeyBindings {
    /// Create an empty binding table
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create a binding table from a list of bindings
    pub fn from_bindings(bindings: Vec<(KeyCode, Key)>) -> Self {
        let mut table = Self::empty();
        for (code, key) in bindings {
            table.bind(code, key);
        }
        table
    }

    /// Bind a physical key to a logical key. A physical key drives exactly
    /// one logical key, so this replaces any previous binding.
    pub fn bind(&mut self, code: KeyCode, key: Key) {
        self.bindings.insert(code, key);
    }

    pub fn get(&self, code: KeyCode) -> Option<Key> {
        self.bindings.get(&code).copied()
    }

    /// Translate a physical key edge. OS auto-repeat presses are dropped.
    pub fn translate_code(&self, code: KeyCode, pressed: bool, repeat: bool) -> Option<KeyEdge> {
        if pressed && repeat {
            return None;
        }
        Some(KeyEdge {
            key: self.get(code),
            pressed,
        })
    }

    /// Translate a winit keyboard event
    pub fn translate(&self, event: &KeyEvent) -> Option<KeyEdge> {
        let PhysicalKey::Code(code) = event.physical_key else {
            return None;
        };
        self.translate_code(code, event.state == ElementState::Pressed, event.repeat)
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::from_bindings(default_bindings())
    }
}
