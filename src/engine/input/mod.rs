// Input handling system
//
// Keyboard events arrive from winit as physical key codes. They are
// translated into logical keys and written into an `InputState`, which the
// simulation reads once per tick.
//
// ## Architecture
//
// - `action`: Logical keys, key groups and default bindings
// - `bindings`: Physical-to-logical key mapping and winit event translation
// - `state`: Held-key state plus the "started" flag
//
// ## Usage Example
//
// ```rust
// use engine::input::{InputState, Key, KeyBindings};
//
// let bindings = KeyBindings::default();
// let mut input = InputState::new();
//
// // In your event loop
// if let Some(edge) = bindings.translate(&key_event) {
//     match edge.key {
//         Some(key) => input.set_key(key, edge.pressed),
//         None if edge.pressed => input.note_activity(),
//         None => {}
//     }
// }
//
// if input.is_shift_held() && input.is_any_movement_held() {
//     // sneaking
// }
// ```

pub mod action;
pub mod bindings;
pub mod state;

// Re-export commonly used types
pub use action::Key;
pub use bindings::{KeyBindings, KeyEdge};
pub use state::InputState;
