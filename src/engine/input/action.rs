// Logical keys and their default physical bindings

use winit::keyboard::KeyCode;

/// Logical keys the simulation understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Movement (WASD)
    W,
    A,
    S,
    D,

    // Movement (arrows)
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    /// Stance modifier (crouch / sneak)
    Shift,
    /// Kick trigger
    Space,
}

/// Every key that counts as movement input
pub const MOVEMENT_KEYS: [Key; 8] = [
    Key::W,
    Key::A,
    Key::S,
    Key::D,
    Key::ArrowUp,
    Key::ArrowDown,
    Key::ArrowLeft,
    Key::ArrowRight,
];

pub const UP_KEYS: [Key; 2] = [Key::W, Key::ArrowUp];
pub const DOWN_KEYS: [Key; 2] = [Key::S, Key::ArrowDown];
pub const LEFT_KEYS: [Key; 2] = [Key::A, Key::ArrowLeft];
pub const RIGHT_KEYS: [Key; 2] = [Key::D, Key::ArrowRight];

impl Key {
    /// Parse a lowercase browser-style key name ("w", "arrowleft", "shift", " ")
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "w" => Self::W,
            "a" => Self::A,
            "s" => Self::S,
            "d" => Self::D,
            "arrowup" => Self::ArrowUp,
            "arrowdown" => Self::ArrowDown,
            "arrowleft" => Self::ArrowLeft,
            "arrowright" => Self::ArrowRight,
            "shift" => Self::Shift,
            " " | "space" => Self::Space,
            _ => return None,
        };
        Some(key)
    }

    #[allow(dead_code)]
    pub fn name(&self) -> &'static str {
        match self {
            Self::W => "w",
            Self::A => "a",
            Self::S => "s",
            Self::D => "d",
            Self::ArrowUp => "arrowup",
            Self::ArrowDown => "arrowdown",
            Self::ArrowLeft => "arrowleft",
            Self::ArrowRight => "arrowright",
            Self::Shift => "shift",
            Self::Space => " ",
        }
    }
}

/// Default keyboard bindings
pub fn default_bindings() -> Vec<(KeyCode, Key)> {
    vec![
        (KeyCode::KeyW, Key::W),
        (KeyCode::KeyA, Key::A),
        (KeyCode::KeyS, Key::S),
        (KeyCode::KeyD, Key::D),
        (KeyCode::ArrowUp, Key::ArrowUp),
        (KeyCode::ArrowDown, Key::ArrowDown),
        (KeyCode::ArrowLeft, Key::ArrowLeft),
        (KeyCode::ArrowRight, Key::ArrowRight),
        (KeyCode::ShiftLeft, Key::Shift),
        (KeyCode::ShiftRight, Key::Shift),
        (KeyCode::Space, Key::Space),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name_roundtrips_names() {
        for key in MOVEMENT_KEYS.iter().chain([Key::Shift, Key::Space].iter()) {
            assert_eq!(Key::from_name(key.name()), Some(*key));
        }
    }

    #[test]
    fn test_from_name_is_case_insensitive() {
        assert_eq!(Key::from_name("ArrowLeft"), Some(Key::ArrowLeft));
        assert_eq!(Key::from_name("Shift"), Some(Key::Shift));
        assert_eq!(Key::from_name("q"), None);
    }

    #[test]
    fn test_no_duplicate_physical_keys() {
        let bindings = default_bindings();
        let mut seen = std::collections::HashSet::new();
        for (code, _) in bindings {
            assert!(seen.insert(code), "Duplicate physical key in default bindings");
        }
    }

    #[test]
    fn test_both_shift_keys_bound() {
        let bindings = default_bindings();
        assert!(bindings.contains(&(KeyCode::ShiftLeft, Key::Shift)));
        assert!(bindings.contains(&(KeyCode::ShiftRight, Key::Shift)));
    }
}
