//! Enemy decision loop
//!
//! Each enemy re-rolls its intent whenever its decision timer runs out:
//! wander by default, and sometimes look at the player to chase or flee.
//! Velocity always eases toward the chosen target velocity.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::entity::Entity;
use super::state::GameState;
use crate::consts::*;

/// Outcome of a targeting check
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    /// Keep the random heading
    Wander,
    /// Head toward the player (unit direction)
    Chase(Vec2),
    /// Head away from the player (unit direction)
    Flee(Vec2),
}

/// Per-tick parameters shared by every enemy
#[derive(Debug, Clone, Copy)]
pub struct AiContext {
    pub absorb_threshold: f32,
    /// Awareness radius in current world units
    pub awareness: f32,
    /// Largest edge length an enemy may keep
    pub size_cap: f32,
}

impl AiContext {
    pub fn from_state(state: &GameState) -> Self {
        let cap_multiplier = ENEMY_CAP_BASE + ENEMY_CAP_GROWTH * state.clock.progress();
        Self {
            absorb_threshold: state.settings.absorb_threshold,
            awareness: ENEMY_AWARENESS * state.world.scale(),
            size_cap: state.player.target_size() * cap_multiplier,
        }
    }
}

/// Wander speed for a body of `size`; bigger bodies are slower
#[inline]
pub fn base_speed(size: f32) -> f32 {
    (ENEMY_SPEED_FACTOR / size).clamp(ENEMY_MIN_SPEED, ENEMY_MAX_SPEED)
}

/// Decide whether to chase or flee the player
///
/// Only a markedly smaller player is chased and only a markedly larger one
/// is fled; anything in between (or out of range) keeps wandering.
pub fn assess(enemy: &Entity, player: &Entity, ctx: &AiContext) -> Intent {
    if player.is_dead {
        return Intent::Wander;
    }
    let delta = player.center() - enemy.center();
    let dist = delta.length();
    if dist >= ctx.awareness || dist <= f32::EPSILON {
        return Intent::Wander;
    }
    let dir = delta / dist;
    let ratio = player.size / enemy.size;
    if ratio < 1.0 / ctx.absorb_threshold {
        Intent::Chase(dir)
    } else if ratio > ctx.absorb_threshold {
        Intent::Flee(-dir)
    } else {
        Intent::Wander
    }
}

/// Advance one enemy's decision timer, steering and size cap
pub fn update_enemy(enemy: &mut Entity, player: &Entity, ctx: &AiContext, rng: &mut impl Rng) {
    if enemy.ai_timer > 0.0 {
        enemy.ai_timer -= 1.0;
    } else {
        enemy.ai_timer = ENEMY_DECISION_MIN_TICKS + rng.random::<f32>() * ENEMY_DECISION_JITTER_TICKS;

        let speed = base_speed(enemy.size);
        let angle = rng.random_range(0.0..TAU);
        enemy.target_vel = Vec2::from_angle(angle) * speed;

        if rng.random::<f32>() < ENEMY_TARGETING_CHANCE {
            match assess(enemy, player, ctx) {
                Intent::Chase(dir) | Intent::Flee(dir) => {
                    enemy.target_vel = dir * speed * ENEMY_PURSUIT_BOOST;
                }
                Intent::Wander => {}
            }
        }
    }

    enemy.vel += (enemy.target_vel - enemy.vel) * ENEMY_STEERING;

    // Oversized enemies shed mass back toward the cap
    if enemy.target_size() > ctx.size_cap {
        let excess = enemy.area() - ctx.size_cap * ctx.size_cap;
        enemy.shed_area(excess * ENEMY_CAP_DECAY);
    }
}

/// Run the decision loop for every live enemy
pub fn update_enemies(state: &mut GameState) {
    let ctx = AiContext::from_state(state);
    for enemy in state.enemies.iter_mut() {
        if enemy.is_dead {
            continue;
        }
        update_enemy(enemy, &state.player, &ctx, &mut state.rng);
    }
}
