//! Collision detection and mass transfer between blocks
//!
//! Two overlapping bodies either absorb (size ratio at or above the absorb
//! threshold: the larger takes the smaller's whole area) or bump (separate,
//! exchange impulses, and the smaller sheds part of its area as food).
//!
//! Pairs are resolved in index order, not simultaneously. Three-way
//! overlaps can therefore depend on iteration order.

use glam::Vec2;
use rand::Rng;

use super::arena::EntityArena;
use super::entity::Entity;
use super::state::GameState;
use crate::consts::*;
use crate::normalize_or;

/// Which member of a pair an outcome refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    A,
    B,
}

/// Result of resolving one pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PairOutcome {
    /// No contact
    Miss,
    /// `winner` took the other body's whole area; the other is dead
    Absorbed { winner: Side },
    /// Bodies separated; `victim` lost `lost` area as ejected food
    Bumped { victim: Side, lost: f32 },
}

impl PairOutcome {
    /// Whether side `side`'s area changed
    pub fn changed_area_of(&self, side: Side) -> bool {
        match *self {
            PairOutcome::Miss => false,
            PairOutcome::Absorbed { winner } => winner == side,
            PairOutcome::Bumped { victim, .. } => victim == side,
        }
    }
}

/// Collision tuning
#[derive(Debug, Clone, Copy)]
pub struct CollisionParams {
    pub absorb_threshold: f32,
    pub bump_penalty: f32,
}

/// Axis-aligned square intersection (touching edges do not count)
#[inline]
pub fn overlaps(a: &Entity, b: &Entity) -> bool {
    a.pos.x < b.pos.x + b.size
        && a.pos.x + a.size > b.pos.x
        && a.pos.y < b.pos.y + b.size
        && a.pos.y + a.size > b.pos.y
}

/// Resolve contact between two bodies
///
/// Ejected food particles are appended to `drops`; the caller owns
/// inserting them into the world.
pub fn resolve_pair(
    a: &mut Entity,
    b: &mut Entity,
    params: &CollisionParams,
    rng: &mut impl Rng,
    drops: &mut Vec<Entity>,
) -> PairOutcome {
    if a.is_dead || b.is_dead || !overlaps(a, b) {
        return PairOutcome::Miss;
    }

    let delta = b.center() - a.center();
    let half_sum = (a.size + b.size) / 2.0;
    let overlap_x = half_sum - delta.x.abs();
    let overlap_y = half_sum - delta.y.abs();
    if overlap_x <= 0.0 || overlap_y <= 0.0 {
        return PairOutcome::Miss;
    }

    // Equal sizes: `a` counts as the smaller
    let a_is_small = a.size <= b.size;
    let ratio = if a_is_small { b.size / a.size } else { a.size / b.size };
    let (small_side, big_side) = if a_is_small { (Side::A, Side::B) } else { (Side::B, Side::A) };

    if ratio >= params.absorb_threshold {
        absorb(a, b, big_side);
        return PairOutcome::Absorbed { winner: big_side };
    }

    // Bump: split the separation by the other body's share of the total
    // area, so the heavier body moves less
    let total = a.area() + b.area();
    let share_a = b.area() / total;
    let share_b = a.area() / total;

    let axis = if overlap_x < overlap_y {
        let dir = if delta.x < 0.0 { -1.0 } else { 1.0 };
        a.pos.x -= overlap_x * share_a * dir;
        b.pos.x += overlap_x * share_b * dir;
        Vec2::new(dir, 0.0)
    } else {
        let dir = if delta.y < 0.0 { -1.0 } else { 1.0 };
        a.pos.y -= overlap_y * share_a * dir;
        b.pos.y += overlap_y * share_b * dir;
        Vec2::new(0.0, dir)
    };
    a.vel -= axis * BUMP_IMPULSE * share_a;
    b.vel += axis * BUMP_IMPULSE * share_b;

    let small_area = if a_is_small { a.area() } else { b.area() };
    let lost = small_area * params.bump_penalty;
    if small_area - lost < MIN_BODY_AREA {
        // Too small to survive the loss: swallowed whole instead
        absorb(a, b, big_side);
        return PairOutcome::Absorbed { winner: big_side };
    }

    let (small, big, small_push) = match small_side {
        Side::A => (a, &*b, -axis),
        Side::B => (b, &*a, axis),
    };
    small.remove_area(lost);
    drop_particles(small, big, lost, small_push, rng, drops);

    PairOutcome::Bumped {
        victim: small_side,
        lost,
    }
}

fn absorb(a: &mut Entity, b: &mut Entity, winner: Side) {
    let (big, small) = match winner {
        Side::A => (a, b),
        Side::B => (b, a),
    };
    big.add_area(small.area());
    small.is_dead = true;
}

/// Eject lost mass as food flying away from the hitter
///
/// At least one particle is always ejected so the bump is visible.
fn drop_particles(
    source: &Entity,
    hitter: &Entity,
    lost: f32,
    push: Vec2,
    rng: &mut impl Rng,
    drops: &mut Vec<Entity>,
) {
    let count = ((lost / FOOD_AREA).floor() as usize).clamp(1, MAX_DROP_PARTICLES);
    let away = normalize_or(source.center() - hitter.center(), push);
    let side = away.perp();
    let origin = source.center() - Vec2::splat(FOOD_SIZE / 2.0);

    for _ in 0..count {
        let speed = DROP_MIN_SPEED + rng.random::<f32>() * DROP_SPEED_JITTER;
        let spread = (rng.random::<f32>() - 0.5) * 2.0 * DROP_SPREAD;
        let mut p = Entity::food(origin);
        p.vel = away * speed + side * (speed * spread) + source.vel * DROP_REBOUND;
        drops.push(p);
    }
}

/// Let `eater` swallow every eligible overlapping food particle
///
/// Particles younger than `grace_ticks` are skipped. Returns the area eaten.
pub fn eat_food(eater: &mut Entity, particles: &mut EntityArena, grace_ticks: u32) -> f32 {
    if eater.is_dead {
        return 0.0;
    }
    let mut eaten = 0.0;
    for p in particles.iter_mut() {
        if p.is_dead || p.age < grace_ticks {
            continue;
        }
        if overlaps(eater, p) {
            eater.add_area(p.area());
            p.is_dead = true;
            eaten += p.area();
        }
    }
    eaten
}

/// Resolve every body pair and food pickup for this tick
///
/// The player goes first, then enemies in slot order; each body checks the
/// bodies after it, then its food. Returns whether the player's area changed.
pub fn resolve_collisions(state: &mut GameState) -> bool {
    let params = CollisionParams {
        absorb_threshold: state.settings.absorb_threshold,
        bump_penalty: state.settings.bump_penalty,
    };
    let grace = state.settings.food_grace_ticks;
    let order = state.enemies.live_indices();
    let mut drops = Vec::new();
    let mut score_changed = false;

    for &j in &order {
        if state.player.is_dead {
            break;
        }
        if let Some(enemy) = state.enemies.get_mut_by_index(j) {
            let outcome = resolve_pair(&mut state.player, enemy, &params, &mut state.rng, &mut drops);
            score_changed |= outcome.changed_area_of(Side::A);
        }
    }
    if eat_food(&mut state.player, &mut state.particles, grace) > 0.0 {
        score_changed = true;
    }

    for (n, &i) in order.iter().enumerate() {
        for &j in &order[n + 1..] {
            if let Some((a, b)) = state.enemies.pair_mut(i, j) {
                resolve_pair(a, b, &params, &mut state.rng, &mut drops);
            }
        }
        if let Some(enemy) = state.enemies.get_mut_by_index(i) {
            eat_food(enemy, &mut state.particles, grace);
        }
    }

    for p in drops {
        state.particles.spawn(p);
    }

    score_changed
}
