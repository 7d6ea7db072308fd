//! Enemy and food spawning
//!
//! Spawns land at rejection-sampled positions away from obstacles and out
//! of the player's view. Population floors rise with each world expansion;
//! a tick below a floor spawns exactly one replacement.

use glam::Vec2;
use rand::Rng;

use super::arena::EntityId;
use super::camera::Camera;
use super::entity::Entity;
use super::state::GameState;
use super::world::World;
use crate::consts::*;
use crate::lerp;

/// Difficulty in 0..=1 derived from the expansion counter
pub fn difficulty(expansions: u32) -> f32 {
    (expansions as f32 / DIFFICULTY_RAMP_EXPANSIONS).min(1.0)
}

/// Minimum spawn distance from the player's center
///
/// Never smaller than the visible half-diagonal, so spawns stay off-screen
/// however far the camera has zoomed out.
pub fn safe_radius(player: &Entity, camera: &Camera) -> f32 {
    (SAFE_SPAWN_BASE + SAFE_SPAWN_SIZE_FACTOR * player.size).max(camera.visible_radius())
}

/// Rejection-sample a spawn point
///
/// Gives up after `SAFE_SPAWN_ATTEMPTS` and returns the last sample, which
/// may be unsafe.
pub fn sample_safe_position(
    world: &World,
    player: &Entity,
    camera: &Camera,
    rng: &mut impl Rng,
) -> Vec2 {
    let safe = safe_radius(player, camera);
    let center = player.center();

    let mut p = Vec2::ZERO;
    for _ in 0..SAFE_SPAWN_ATTEMPTS {
        p = Vec2::new(
            rng.random::<f32>() * world.size,
            rng.random::<f32>() * world.size,
        );
        if !world.blocked(p) && p.distance(center) >= safe {
            return p;
        }
    }

    log::debug!(
        "No safe spawn after {} attempts, using ({:.0}, {:.0})",
        SAFE_SPAWN_ATTEMPTS,
        p.x,
        p.y
    );
    p
}

/// Enemy edge length as a power-shaped random scale of the player's size
///
/// Early on the low exponent skews spawns small; as difficulty rises the
/// exponent flattens and the range shifts up, so late enemies are larger
/// and more uniformly so.
pub fn enemy_size(player_size: f32, difficulty: f32, rng: &mut impl Rng) -> f32 {
    let exponent = lerp(1.6, 0.8, difficulty);
    let lo = lerp(0.5, 0.7, difficulty);
    let hi = lerp(2.0, 2.4, difficulty);
    let u: f32 = rng.random();
    (player_size * (lo + (hi - lo) * u.powf(exponent))).max(MIN_BODY_SIZE)
}

pub fn spawn_enemy(state: &mut GameState) -> EntityId {
    let p = sample_safe_position(&state.world, &state.player, &state.camera, &mut state.rng);
    let size = enemy_size(
        state.player.target_size(),
        difficulty(state.world.expansions),
        &mut state.rng,
    );
    let mut enemy = Entity::enemy(p, size);
    // Only the corner was sampled clear; the square may still poke into a barrier
    state.world.constrain(&mut enemy);
    state.enemies.spawn(enemy)
}

pub fn spawn_food(state: &mut GameState) -> EntityId {
    let p = sample_safe_position(&state.world, &state.player, &state.camera, &mut state.rng);
    let mut food = Entity::food(p);
    state.world.constrain(&mut food);
    state.particles.spawn(food)
}

/// Initial population for a new match
pub fn populate(state: &mut GameState) {
    for _ in 0..state.settings.initial_enemies {
        spawn_enemy(state);
    }
    for _ in 0..state.settings.initial_food {
        spawn_food(state);
    }
}

/// Top up below-floor populations by one spawn each
pub fn maintain_population(state: &mut GameState) {
    let expansions = state.world.expansions;
    let enemies = state.enemies.live_count();
    if enemies < state.settings.enemy_target(expansions) {
        let id = spawn_enemy(state);
        log::debug!("Enemy top-up at slot {} ({} live)", id.index, enemies + 1);
    }
    let food = state.particles.live_count();
    if food < state.settings.food_target(expansions) {
        spawn_food(state);
        log::debug!("Food top-up ({} live)", food + 1);
    }
}

/// Refill after an expansion, proportional to the growth factor
pub fn spawn_burst(state: &mut GameState, factor: f32) {
    let enemies = (EXPANSION_BURST_ENEMIES * factor).round() as usize;
    let food = (EXPANSION_BURST_FOOD * factor).round() as usize;
    for _ in 0..enemies {
        spawn_enemy(state);
    }
    for _ in 0..food {
        spawn_food(state);
    }
    log::debug!("Expansion burst: {} enemies, {} food", enemies, food);
}
