//! Block Devourer - A 2D arena survival game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, AI, spawning, world growth)
//! - `game`: Match lifecycle, input snapshotting and fixed-step driving
//! - `input`: Virtual joystick and discrete key state
//! - `render`: Read-only render snapshot for a presentation layer
//! - `settings`: Data-driven game balance

pub mod game;
pub mod input;
pub mod render;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{Difficulty, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, one tick per display refresh)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Smallest viable body (player/enemy) edge length
    pub const MIN_BODY_SIZE: f32 = 25.0;
    /// Smallest viable body area (MIN_BODY_SIZE²)
    pub const MIN_BODY_AREA: f32 = MIN_BODY_SIZE * MIN_BODY_SIZE;

    /// Player starting edge length
    pub const PLAYER_START_SIZE: f32 = 40.0;
    /// Food particle edge length (fixed)
    pub const FOOD_SIZE: f32 = 12.0;
    /// Food particle area
    pub const FOOD_AREA: f32 = FOOD_SIZE * FOOD_SIZE;

    /// Velocity decay per tick
    pub const FRICTION: f32 = 0.88;
    /// Fraction of the remaining size gap closed per tick
    pub const SIZE_SMOOTHING: f32 = 0.1;
    /// Pop amplitude applied when a body loses mass
    pub const BOUNCE_POP: f32 = 10.0;

    /// Player acceleration per tick at full input
    pub const PLAYER_ACCEL: f32 = 1.0;
    /// Player speed = clamp(PLAYER_SPEED_FACTOR / size, min, max)
    pub const PLAYER_SPEED_FACTOR: f32 = 400.0;
    pub const PLAYER_MIN_SPEED: f32 = 2.0;
    pub const PLAYER_MAX_SPEED: f32 = 6.0;

    /// Velocity kept when bouncing off the world boundary
    pub const WALL_RESTITUTION: f32 = 0.6;
    /// Velocity kept by solid bodies bouncing off obstacles
    pub const OBSTACLE_RESTITUTION: f32 = 0.5;
    /// Velocity kept by food particles bouncing off walls and obstacles
    pub const PARTICLE_RESTITUTION: f32 = 0.25;

    /// Obstacle geometry as fractions of the world size
    pub const OBSTACLE_MARGIN_FRAC: f32 = 0.1;
    pub const OBSTACLE_THICKNESS_FRAC: f32 = 0.15;
    pub const OBSTACLE_ARM_FRAC: f32 = 0.35;
    /// Gap left between a pushed-out body and the obstacle face
    pub const OBSTACLE_SKIN: f32 = 0.01;

    /// Total separation speed handed out on a bump
    pub const BUMP_IMPULSE: f32 = 16.0;
    /// Drop particle launch speed range
    pub const DROP_MIN_SPEED: f32 = 8.0;
    pub const DROP_SPEED_JITTER: f32 = 6.0;
    /// Maximum sideways spread of drop particles relative to launch speed
    pub const DROP_SPREAD: f32 = 0.75;
    /// Share of the victim's velocity inherited by its drop particles
    pub const DROP_REBOUND: f32 = 0.3;
    /// Most particles a single bump can eject
    pub const MAX_DROP_PARTICLES: usize = 10;

    /// Enemy wander speed = clamp(ENEMY_SPEED_FACTOR / size, min, max)
    pub const ENEMY_SPEED_FACTOR: f32 = 300.0;
    pub const ENEMY_MIN_SPEED: f32 = 1.5;
    pub const ENEMY_MAX_SPEED: f32 = 5.0;
    /// Speed multiplier while chasing or fleeing
    pub const ENEMY_PURSUIT_BOOST: f32 = 1.2;
    /// Chance that a decision looks at the player at all
    pub const ENEMY_TARGETING_CHANCE: f32 = 0.3;
    /// Awareness radius at the initial world size
    pub const ENEMY_AWARENESS: f32 = 500.0;
    /// Decision interval range in ticks
    pub const ENEMY_DECISION_MIN_TICKS: f32 = 30.0;
    pub const ENEMY_DECISION_JITTER_TICKS: f32 = 60.0;
    /// Fraction of the velocity gap closed per tick
    pub const ENEMY_STEERING: f32 = 0.1;
    /// Enemy size cap relative to the player, loosening with match progress
    pub const ENEMY_CAP_BASE: f32 = 2.5;
    pub const ENEMY_CAP_GROWTH: f32 = 1.5;
    /// Fraction of excess area shed per tick by oversized enemies
    pub const ENEMY_CAP_DECAY: f32 = 0.01;

    /// Safe spawn radius = SAFE_SPAWN_BASE + SAFE_SPAWN_SIZE_FACTOR * player size
    pub const SAFE_SPAWN_BASE: f32 = 600.0;
    pub const SAFE_SPAWN_SIZE_FACTOR: f32 = 2.0;
    /// Rejection sampling budget
    pub const SAFE_SPAWN_ATTEMPTS: u32 = 20;
    /// Expansions until difficulty saturates
    pub const DIFFICULTY_RAMP_EXPANSIONS: f32 = 5.0;
    /// Enemies and food injected per unit of expansion factor
    pub const EXPANSION_BURST_ENEMIES: f32 = 10.0;
    pub const EXPANSION_BURST_FOOD: f32 = 20.0;

    /// Camera follow smoothing per tick
    pub const CAMERA_FOLLOW: f32 = 0.1;
    /// Camera zoom smoothing per tick
    pub const CAMERA_ZOOM: f32 = 0.05;
    /// On-screen edge length the player is kept near (pixels)
    pub const PLAYER_SCREEN_SIZE: f32 = 40.0;
    /// Default viewport before the first resize
    pub const DEFAULT_VIEWPORT: (f32, f32) = (1280.0, 720.0);

    /// Virtual joystick knob travel radius (pixels)
    pub const JOYSTICK_RADIUS: f32 = 50.0;
}

/// Linear interpolation from `start` toward `end` by `amt`
#[inline]
pub fn lerp(start: f32, end: f32, amt: f32) -> f32 {
    (1.0 - amt) * start + amt * end
}

/// Normalize `v`, or return `fallback` if `v` has no usable length
#[inline]
pub fn normalize_or(v: Vec2, fallback: Vec2) -> Vec2 {
    let len = v.length();
    if len > f32::EPSILON && len.is_finite() {
        v / len
    } else {
        fallback
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.1), 1.0);
        assert_eq!(lerp(5.0, 5.0, 0.5), 5.0);
    }

    #[test]
    fn test_normalize_or_zero_length() {
        let fallback = Vec2::X;
        assert_eq!(normalize_or(Vec2::ZERO, fallback), fallback);
        let n = normalize_or(Vec2::new(3.0, 4.0), fallback);
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
