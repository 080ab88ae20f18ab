// Per-tick movement integration
//
// The pass is split into three steps so the simulation can feed state
// changes back in between them:
//
// 1. `stance_request` turns shift + movement keys into Crouch/Sneak requests
// 2. `integrate` moves the body, using the state that step 1 produced
// 3. `motion_request` switches between Idle and Move from the new velocity

use super::characters::{CharacterState, Facing, PlayerBody, StateEvent};
use super::config::MovementTuning;
use super::sink::WorldBounds;
use crate::core::math::{clamp_axes, clamp_with_margin};
use crate::engine::input::InputState;
use glam::Vec2;

/// What the physics pass observed this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MovementFacts {
    pub is_moving: bool,
    pub is_shift_held: bool,
    pub is_any_movement_held: bool,
    pub is_sneaking: bool,
}

#[derive(Debug, Clone)]
pub struct PhysicsEngine {
    tuning: MovementTuning,
    /// Half-sprite margin kept from each world edge
    bound_margin: f32,
}

impl PhysicsEngine {
    pub fn new(tuning: MovementTuning, bound_margin: f32) -> Self {
        Self {
            tuning,
            bound_margin,
        }
    }

    /// Shift arbitration. Kick and Hurt are never interrupted.
    pub fn stance_request(&self, input: &InputState, state: CharacterState) -> Option<StateEvent> {
        if state.is_locked() {
            return None;
        }

        let shift = input.is_shift_held();
        let movement = input.is_any_movement_held();

        if shift {
            if movement && state != CharacterState::Sneak {
                Some(StateEvent::Sneak)
            } else if !movement && state != CharacterState::Crouch {
                Some(StateEvent::Crouch)
            } else {
                None
            }
        } else if state.is_stance() {
            Some(StateEvent::settle(movement))
        } else {
            None
        }
    }

    /// Integrate input into velocity and position.
    ///
    /// Friction applies every tick, then each axis is clamped to the
    /// (sneak-scaled) cap before the position moves.
    pub fn integrate(
        &self,
        body: &mut PlayerBody,
        input: &InputState,
        state: CharacterState,
        bounds: WorldBounds,
    ) -> MovementFacts {
        let t = &self.tuning;
        let is_sneaking = state == CharacterState::Sneak;
        let factor = if is_sneaking { t.sneak_factor } else { 1.0 };
        let step = t.acceleration * factor;

        let mut accel = Vec2::ZERO;
        if input.up() {
            accel.y -= step;
        }
        if input.down() {
            accel.y += step;
        }
        // Only horizontal input changes facing
        if input.left() {
            accel.x -= step;
            body.facing = Facing::Left;
        }
        if input.right() {
            accel.x += step;
            body.facing = Facing::Right;
        }

        body.velocity = (body.velocity + accel) * t.friction;
        body.velocity = clamp_axes(body.velocity, t.max_velocity * factor);

        let next = body.position + body.velocity;
        body.position = Vec2::new(
            clamp_with_margin(next.x, self.bound_margin, bounds.width),
            clamp_with_margin(next.y, self.bound_margin, bounds.height),
        );

        MovementFacts {
            is_moving: body.is_moving(t.moving_threshold),
            is_shift_held: input.is_shift_held(),
            is_any_movement_held: input.is_any_movement_held(),
            is_sneaking,
        }
    }

    /// Idle/Move auto rule. Only applies to Idle and Move without shift.
    pub fn motion_request(&self, state: CharacterState, facts: &MovementFacts) -> Option<StateEvent> {
        if !state.follows_motion() || facts.is_shift_held {
            return None;
        }
        match (facts.is_moving, state) {
            (true, CharacterState::Idle) => Some(StateEvent::Move),
            (false, CharacterState::Move) => Some(StateEvent::Idle),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Key;
    use approx::assert_relative_eq;

    const BOUNDS: WorldBounds = WorldBounds {
        width: 800.0,
        height: 600.0,
    };

    fn engine() -> PhysicsEngine {
        PhysicsEngine::new(MovementTuning::default(), 12.0)
    }

    fn input_with(keys: &[Key]) -> InputState {
        let mut input = InputState::new();
        for key in keys {
            input.set_key(*key, true);
        }
        input
    }

    #[test]
    fn test_shift_with_movement_requests_sneak() {
        let input = input_with(&[Key::Shift, Key::D]);
        assert_eq!(
            engine().stance_request(&input, CharacterState::Move),
            Some(StateEvent::Sneak)
        );
        assert_eq!(engine().stance_request(&input, CharacterState::Sneak), None);
    }

    #[test]
    fn test_shift_alone_requests_crouch() {
        let input = input_with(&[Key::Shift]);
        assert_eq!(
            engine().stance_request(&input, CharacterState::Idle),
            Some(StateEvent::Crouch)
        );
        assert_eq!(
            engine().stance_request(&input, CharacterState::Sneak),
            Some(StateEvent::Crouch)
        );
        assert_eq!(engine().stance_request(&input, CharacterState::Crouch), None);
    }

    #[test]
    fn test_shift_release_leaves_stance() {
        let moving = input_with(&[Key::ArrowLeft]);
        let still = InputState::new();
        assert_eq!(
            engine().stance_request(&moving, CharacterState::Crouch),
            Some(StateEvent::Move)
        );
        assert_eq!(
            engine().stance_request(&still, CharacterState::Sneak),
            Some(StateEvent::Idle)
        );
        assert_eq!(engine().stance_request(&still, CharacterState::Idle), None);
    }

    #[test]
    fn test_locked_states_ignore_stance() {
        let input = input_with(&[Key::Shift, Key::W]);
        assert_eq!(engine().stance_request(&input, CharacterState::Kick), None);
        assert_eq!(engine().stance_request(&input, CharacterState::Hurt), None);
    }

    #[test]
    fn test_acceleration_then_friction() {
        let mut body = PlayerBody::new(Vec2::new(400.0, 300.0));
        let input = input_with(&[Key::D, Key::W]);
        let facts = engine().integrate(&mut body, &input, CharacterState::Move, BOUNDS);

        assert_relative_eq!(body.velocity.x, 0.36, epsilon = 1e-6);
        assert_relative_eq!(body.velocity.y, -0.36, epsilon = 1e-6);
        assert_relative_eq!(body.position.x, 400.36, epsilon = 1e-4);
        assert_eq!(body.facing, Facing::Right);
        assert!(facts.is_moving);
        assert!(facts.is_any_movement_held);
    }

    #[test]
    fn test_vertical_input_keeps_facing() {
        let mut body = PlayerBody::new(Vec2::new(400.0, 300.0));
        body.facing = Facing::Left;
        engine().integrate(&mut body, &input_with(&[Key::S]), CharacterState::Move, BOUNDS);
        assert_eq!(body.facing, Facing::Left);
    }

    #[test]
    fn test_left_sets_facing() {
        let mut body = PlayerBody::new(Vec2::new(400.0, 300.0));
        engine().integrate(&mut body, &input_with(&[Key::A]), CharacterState::Idle, BOUNDS);
        assert_eq!(body.facing, Facing::Left);
        assert!(body.velocity.x < 0.0);
    }

    #[test]
    fn test_friction_without_input() {
        let mut body = PlayerBody::new(Vec2::new(400.0, 300.0));
        body.velocity = Vec2::new(2.0, -1.0);
        engine().integrate(&mut body, &InputState::new(), CharacterState::Move, BOUNDS);
        assert_relative_eq!(body.velocity.x, 1.8, epsilon = 1e-6);
        assert_relative_eq!(body.velocity.y, -0.9, epsilon = 1e-6);
    }

    #[test]
    fn test_velocity_cap() {
        let mut body = PlayerBody::new(Vec2::new(400.0, 300.0));
        body.velocity = Vec2::new(10.0, -10.0);
        engine().integrate(&mut body, &InputState::new(), CharacterState::Move, BOUNDS);
        assert_eq!(body.velocity, Vec2::new(6.0, -6.0));

        body.velocity = Vec2::new(10.0, 0.0);
        let facts = engine().integrate(&mut body, &InputState::new(), CharacterState::Sneak, BOUNDS);
        assert_eq!(body.velocity.x, 3.0);
        assert!(facts.is_sneaking);
    }

    #[test]
    fn test_sneak_halves_acceleration() {
        let mut body = PlayerBody::new(Vec2::new(400.0, 300.0));
        engine().integrate(&mut body, &input_with(&[Key::D]), CharacterState::Sneak, BOUNDS);
        assert_relative_eq!(body.velocity.x, 0.18, epsilon = 1e-6);
    }

    #[test]
    fn test_position_clamped_to_bounds() {
        let mut body = PlayerBody::new(Vec2::new(790.0, 5.0));
        body.velocity = Vec2::new(6.0, -6.0);
        engine().integrate(&mut body, &InputState::new(), CharacterState::Move, BOUNDS);
        assert_eq!(body.position, Vec2::new(788.0, 12.0));
    }

    #[test]
    fn test_motion_auto_rule() {
        let e = engine();
        let moving = MovementFacts {
            is_moving: true,
            ..Default::default()
        };
        let still = MovementFacts::default();

        assert_eq!(e.motion_request(CharacterState::Idle, &moving), Some(StateEvent::Move));
        assert_eq!(e.motion_request(CharacterState::Move, &still), Some(StateEvent::Idle));
        assert_eq!(e.motion_request(CharacterState::Move, &moving), None);
        assert_eq!(e.motion_request(CharacterState::Idle, &still), None);
    }

    #[test]
    fn test_motion_rule_skips_special_states_and_shift() {
        let e = engine();
        let still = MovementFacts::default();
        for state in [
            CharacterState::Crouch,
            CharacterState::Sneak,
            CharacterState::Kick,
            CharacterState::Hurt,
        ] {
            assert_eq!(e.motion_request(state, &still), None);
        }

        let shifted = MovementFacts {
            is_moving: false,
            is_shift_held: true,
            ..Default::default()
        };
        assert_eq!(e.motion_request(CharacterState::Move, &shifted), None);
    }
}
