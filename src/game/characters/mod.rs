// Character system
//
// This module contains everything related to the controlled dino:
// - Kinematic body (position, velocity, facing)
// - State machine for character behavior
// - Animation driver for the sprite strip

pub mod animation;
pub mod body;
pub mod state;

// Re-export commonly used types
pub use animation::{AnimationFrameData, SpriteAnimator};
pub use body::{Facing, PlayerBody};
pub use state::{CharacterState, CharacterStateMachine, StateEvent, TimedExit, Transition};
