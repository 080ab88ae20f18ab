// Presentation boundary
//
// The simulation never draws anything. It reports through a `RenderSink`:
// state changes for the animation driver, health and damage for the HUD,
// and it asks the sink for the world size once per tick.

use super::characters::{CharacterState, Facing};
use super::status::DinoSkin;

/// Size of the playable area
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldBounds {
    pub width: f32,
    pub height: f32,
}

impl WorldBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<glam::Vec2> for WorldBounds {
    fn from(v: glam::Vec2) -> Self {
        Self::new(v.x, v.y)
    }
}

/// Everything outside the core: animation driver, HUD, window.
///
/// All methods except `on_state_changed` have no-op defaults.
pub trait RenderSink {
    /// Called exactly once per accepted transition
    fn on_state_changed(&mut self, state: CharacterState);

    /// A kick cycle ran its full length. `repeating` is true when another
    /// cycle starts immediately because the trigger is still held.
    fn on_kick_cycle_complete(&mut self, repeating: bool) {
        let _ = repeating;
    }

    /// The skin changed; redraw the current state with it
    fn on_skin_changed(&mut self, skin: DinoSkin, state: CharacterState) {
        let _ = (skin, state);
    }

    fn on_facing_changed(&mut self, facing: Facing) {
        let _ = facing;
    }

    /// Advance any frame timers the sink runs itself
    fn advance(&mut self, dt: std::time::Duration) {
        let _ = dt;
    }

    /// Current world size, or `None` to use the configured default
    fn world_bounds(&self) -> Option<WorldBounds> {
        None
    }

    fn notify_health_changed(&mut self, health: i32) {
        let _ = health;
    }

    fn notify_damage(&mut self, amount: i32) {
        let _ = amount;
    }
}
