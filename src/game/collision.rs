// Obstacle collision checks

use super::characters::{CharacterState, PlayerBody};
use super::config::CombatTuning;
use crate::core::math::Aabb;
use glam::Vec2;

/// A static obstacle. Immutable once placed; replaced only as a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Top-left corner of the visual rectangle
    pub position: Vec2,
    /// Visual size
    pub size: Vec2,
    /// Damage box offset from `position`
    pub hitbox_offset: Vec2,
    pub hitbox_size: Vec2,
}

impl Obstacle {
    pub fn new(position: Vec2, size: Vec2, hitbox_offset: Vec2, hitbox_size: Vec2) -> Self {
        Self {
            position,
            size,
            hitbox_offset,
            hitbox_size,
        }
    }

    pub fn hitbox(&self) -> Aabb {
        Aabb::new(self.position + self.hitbox_offset, self.hitbox_size)
    }

    /// Centre of the visual rectangle
    pub fn center(&self) -> Vec2 {
        self.position + self.size * 0.5
    }
}

/// Outcome of a tick's collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    /// Index of the obstacle, in creation order
    pub obstacle: usize,
    pub damage: i32,
    /// Velocity added to the player
    pub impulse: Vec2,
}

#[derive(Debug, Clone)]
pub struct CollisionResolver {
    obstacles: Vec<Obstacle>,
    player_hitbox: Vec2,
    damage: i32,
    bounce: f32,
}

impl CollisionResolver {
    pub fn new(tuning: &CombatTuning) -> Self {
        Self {
            obstacles: Vec::new(),
            player_hitbox: tuning.player_hitbox,
            damage: tuning.obstacle_damage,
            bounce: tuning.collision_bounce,
        }
    }

    /// Replace the whole obstacle set
    pub fn set_obstacles(&mut self, obstacles: Vec<Obstacle>) {
        log::debug!("Obstacle set replaced ({} obstacles)", obstacles.len());
        self.obstacles = obstacles;
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// First obstacle (creation order) overlapping a player at `position`
    pub fn first_overlap(&self, position: Vec2) -> Option<usize> {
        let player = Aabb::centered(position, self.player_hitbox);
        self.obstacles
            .iter()
            .position(|o| player.overlaps(&o.hitbox()))
    }

    /// Push away from the obstacle centre, scaled by the bounce constant.
    /// A player exactly on the centre gets no push.
    pub fn bounce_impulse(&self, position: Vec2, obstacle: &Obstacle) -> Vec2 {
        (position - obstacle.center()).normalize_or_zero() * self.bounce
    }

    /// Check the player against every obstacle.
    ///
    /// Only the first overlapping obstacle counts, and nothing happens while
    /// the character is already hurt. The bounce is applied to the body
    /// here; damage and the hurt transition are left to the caller.
    pub fn resolve(&self, body: &mut PlayerBody, state: CharacterState) -> Option<Hit> {
        if state == CharacterState::Hurt {
            return None;
        }

        let index = self.first_overlap(body.position)?;
        let impulse = self.bounce_impulse(body.position, &self.obstacles[index]);
        body.velocity += impulse;

        Some(Hit {
            obstacle: index,
            damage: self.damage,
            impulse,
        })
    }
}
