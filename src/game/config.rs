// Simulation tuning
//
// Every constant the simulation uses lives here. The defaults are the
// shipped tuning; a RON file can override any subset of fields.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("Invalid config value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Movement integration constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    /// Velocity added per tick per held direction
    pub acceleration: f32,
    /// Per-tick velocity multiplier, applied every tick
    pub friction: f32,
    /// Per-axis velocity cap
    pub max_velocity: f32,
    /// Multiplier on acceleration and cap while sneaking
    pub sneak_factor: f32,
    /// Per-axis speed above which the character counts as moving
    pub moving_threshold: f32,
    /// Nominal cruise speed. Kept for HUD display, not used by integration.
    pub cruise_speed: f32,
    /// Nudge applied by a direct Move request when standing still
    pub move_request_nudge: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            acceleration: 0.4,
            friction: 0.9,
            max_velocity: 6.0,
            sneak_factor: 0.5,
            moving_threshold: 0.1,
            cruise_speed: 4.0,
            move_request_nudge: 0.2,
        }
    }
}

/// Damage and hitbox constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    pub obstacle_damage: i32,
    pub collision_bounce: f32,
    pub max_health: i32,
    /// Size of the box centred on the player position
    pub player_hitbox: Vec2,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            obstacle_damage: 10,
            collision_bounce: 2.0,
            max_health: 100,
            player_hitbox: Vec2::new(24.0, 24.0),
        }
    }
}

/// Timer lengths, in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingTuning {
    pub kick_cycle_ms: u64,
    pub hurt_window_ms: u64,
    pub stance_timeout_ms: u64,
    pub animation_frame_ms: u64,
    pub asset_fallback_ms: u64,
}

impl Default for TimingTuning {
    fn default() -> Self {
        Self {
            kick_cycle_ms: 300,
            hurt_window_ms: 1000,
            stance_timeout_ms: 2000,
            animation_frame_ms: 100,
            asset_fallback_ms: 5000,
        }
    }
}

impl TimingTuning {
    pub fn kick_cycle(&self) -> Duration {
        Duration::from_millis(self.kick_cycle_ms)
    }

    pub fn hurt_window(&self) -> Duration {
        Duration::from_millis(self.hurt_window_ms)
    }

    pub fn stance_timeout(&self) -> Duration {
        Duration::from_millis(self.stance_timeout_ms)
    }

    pub fn animation_frame(&self) -> Duration {
        Duration::from_millis(self.animation_frame_ms)
    }

    pub fn asset_fallback(&self) -> Duration {
        Duration::from_millis(self.asset_fallback_ms)
    }
}

/// World layout and obstacle generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldTuning {
    /// Bounds used when no presentation layer reports any
    pub default_bounds: Vec2,
    /// Half-sprite margin kept between the player centre and the edges
    pub bound_margin: f32,
    pub spawn_position: Vec2,
    pub obstacle_count: usize,
    pub obstacle_size: Vec2,
    pub obstacle_hitbox_offset: Vec2,
    pub obstacle_hitbox_size: Vec2,
    /// Obstacles never spawn inside this box around the player
    pub spawn_avoid: f32,
    /// Obstacles spawn at least this far from the world edges
    pub spawn_margin: f32,
}

impl Default for WorldTuning {
    fn default() -> Self {
        Self {
            default_bounds: Vec2::new(800.0, 600.0),
            bound_margin: 12.0,
            spawn_position: Vec2::new(400.0, 300.0),
            obstacle_count: 8,
            obstacle_size: Vec2::new(40.0, 60.0),
            obstacle_hitbox_offset: Vec2::new(10.0, 15.0),
            obstacle_hitbox_size: Vec2::new(20.0, 40.0),
            spawn_avoid: 100.0,
            spawn_margin: 30.0,
        }
    }
}

/// Full simulation configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub movement: MovementTuning,
    pub combat: CombatTuning,
    pub timing: TimingTuning,
    pub world: WorldTuning,
}

impl SimConfig {
    /// Load and validate a RON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&text)
    }

    /// Parse and validate RON text. Missing fields keep their defaults.
    pub fn from_ron_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the simulation cannot run with. NaN fails every check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let m = &self.movement;
        for (field, value) in [
            ("movement.friction", m.friction),
            ("movement.sneak_factor", m.sneak_factor),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(invalid(field, "must be in (0, 1]"));
            }
        }
        if !(m.max_velocity > 0.0) {
            return Err(invalid("movement.max_velocity", "must be positive"));
        }
        for (field, value) in [
            ("movement.acceleration", m.acceleration),
            ("movement.moving_threshold", m.moving_threshold),
            ("movement.move_request_nudge", m.move_request_nudge),
        ] {
            if !(value >= 0.0) {
                return Err(invalid(field, "must not be negative"));
            }
        }

        let c = &self.combat;
        if c.max_health <= 0 {
            return Err(invalid("combat.max_health", "must be positive"));
        }
        if c.obstacle_damage < 0 {
            return Err(invalid("combat.obstacle_damage", "must not be negative"));
        }
        if !(c.collision_bounce >= 0.0) {
            return Err(invalid("combat.collision_bounce", "must not be negative"));
        }
        if !is_positive(c.player_hitbox) {
            return Err(invalid("combat.player_hitbox", "must be positive"));
        }

        let t = &self.timing;
        for (field, value) in [
            ("timing.kick_cycle_ms", t.kick_cycle_ms),
            ("timing.hurt_window_ms", t.hurt_window_ms),
            ("timing.stance_timeout_ms", t.stance_timeout_ms),
            ("timing.animation_frame_ms", t.animation_frame_ms),
        ] {
            if value == 0 {
                return Err(invalid(field, "must be at least 1ms"));
            }
        }

        let w = &self.world;
        if !is_positive(w.default_bounds) {
            return Err(invalid("world.default_bounds", "must be positive"));
        }
        if !(w.bound_margin >= 0.0) {
            return Err(invalid("world.bound_margin", "must not be negative"));
        }
        if !is_positive(w.obstacle_hitbox_size) {
            return Err(invalid("world.obstacle_hitbox_size", "must be positive"));
        }

        Ok(())
    }
}

fn is_positive(v: Vec2) -> bool {
    v.x > 0.0 && v.y > 0.0
}

fn invalid(field: &'static str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.to_string(),
    }
}
