// Player kinematics

use glam::Vec2;

/// Horizontal facing of the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// -1 for left, +1 for right
    pub fn sign(&self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// Position, velocity and facing of the controlled character.
/// Mutated only by the physics pass and collision bounces.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerBody {
    pub position: Vec2,
    pub velocity: Vec2,
    pub facing: Facing,
}

impl PlayerBody {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            facing: Facing::Right,
        }
    }

    /// Moving means either axis is above `threshold`
    pub fn is_moving(&self, threshold: f32) -> bool {
        self.velocity.x.abs() > threshold || self.velocity.y.abs() > threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_body_at_rest() {
        let body = PlayerBody::new(Vec2::new(400.0, 300.0));
        assert_eq!(body.velocity, Vec2::ZERO);
        assert_eq!(body.facing, Facing::Right);
        assert!(!body.is_moving(0.1));
    }

    #[test]
    fn test_is_moving_checks_each_axis() {
        let mut body = PlayerBody::new(Vec2::ZERO);
        body.velocity = Vec2::new(0.0, -0.11);
        assert!(body.is_moving(0.1));
        body.velocity = Vec2::new(0.1, 0.1);
        assert!(!body.is_moving(0.1));
    }

    #[test]
    fn test_facing_sign() {
        assert_eq!(Facing::Left.sign(), -1.0);
        assert_eq!(Facing::Right.sign(), 1.0);
    }
}
