// Random obstacle placement

use super::collision::Obstacle;
use super::config::WorldTuning;
use super::sink::WorldBounds;
use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Attempts per obstacle before giving up on finding a free spot
const MAX_PLACEMENT_ATTEMPTS: u32 = 1000;

/// Generates obstacle batches away from the player
#[derive(Debug)]
pub struct ObstacleField {
    rng: StdRng,
}

impl ObstacleField {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic placement, for tests and replays
    #[allow(dead_code)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Place `tuning.obstacle_count` obstacles inside `bounds`.
    ///
    /// Each top-left corner is drawn from `[margin, extent - margin)` on both
    /// axes and rejected while it sits inside the avoid box around `player`.
    /// Obstacles that find no free spot are skipped.
    pub fn generate(&mut self, tuning: &WorldTuning, bounds: WorldBounds, player: Vec2) -> Vec<Obstacle> {
        let margin = tuning.spawn_margin;
        let (Some(xs), Some(ys)) = (
            spawn_range(margin, bounds.width),
            spawn_range(margin, bounds.height),
        ) else {
            log::warn!(
                "World {}x{} too small for obstacles",
                bounds.width,
                bounds.height
            );
            return Vec::new();
        };

        let mut obstacles = Vec::with_capacity(tuning.obstacle_count);
        for _ in 0..tuning.obstacle_count {
            let spot = (0..MAX_PLACEMENT_ATTEMPTS)
                .map(|_| Vec2::new(self.rng.gen_range(xs.0..xs.1), self.rng.gen_range(ys.0..ys.1)))
                .find(|p| {
                    (p.x - player.x).abs() >= tuning.spawn_avoid
                        || (p.y - player.y).abs() >= tuning.spawn_avoid
                });

            match spot {
                Some(position) => obstacles.push(Obstacle::new(
                    position,
                    tuning.obstacle_size,
                    tuning.obstacle_hitbox_offset,
                    tuning.obstacle_hitbox_size,
                )),
                None => log::warn!("No free spot for obstacle, skipping"),
            }
        }

        obstacles
    }
}

impl Default for ObstacleField {
    fn default() -> Self {
        Self::new()
    }
}

fn spawn_range(margin: f32, extent: f32) -> Option<(f32, f32)> {
    let (lo, hi) = (margin, extent - margin);
    (hi > lo).then_some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: WorldBounds = WorldBounds {
        width: 800.0,
        height: 600.0,
    };

    #[test]
    fn test_generates_requested_count() {
        let tuning = WorldTuning::default();
        let obstacles = ObstacleField::with_seed(7).generate(&tuning, BOUNDS, tuning.spawn_position);
        assert_eq!(obstacles.len(), tuning.obstacle_count);
    }

    #[test]
    fn test_obstacles_avoid_player_and_edges() {
        let tuning = WorldTuning::default();
        let player = tuning.spawn_position;
        let mut field = ObstacleField::with_seed(42);

        for _ in 0..20 {
            for o in field.generate(&tuning, BOUNDS, player) {
                let p = o.position;
                assert!(p.x >= 30.0 && p.x < 770.0);
                assert!(p.y >= 30.0 && p.y < 570.0);
                assert!((p.x - player.x).abs() >= 100.0 || (p.y - player.y).abs() >= 100.0);
                assert_eq!(o.hitbox_size, tuning.obstacle_hitbox_size);
            }
        }
    }

    #[test]
    fn test_same_seed_same_layout() {
        let tuning = WorldTuning::default();
        let a = ObstacleField::with_seed(3).generate(&tuning, BOUNDS, tuning.spawn_position);
        let b = ObstacleField::with_seed(3).generate(&tuning, BOUNDS, tuning.spawn_position);
        assert_eq!(a, b);
    }

    #[test]
    fn test_tiny_world_yields_nothing() {
        let tuning = WorldTuning::default();
        let tiny = WorldBounds {
            width: 50.0,
            height: 50.0,
        };
        assert!(ObstacleField::with_seed(1)
            .generate(&tuning, tiny, Vec2::new(25.0, 25.0))
            .is_empty());
    }

    #[test]
    fn test_fully_blocked_world_skips_obstacles() {
        let tuning = WorldTuning::default();
        // Every spot lies inside the avoid box around the centre
        let small = WorldBounds {
            width: 200.0,
            height: 200.0,
        };
        let obstacles = ObstacleField::with_seed(1).generate(&tuning, small, Vec2::new(100.0, 100.0));
        assert!(obstacles.is_empty());
    }
}
