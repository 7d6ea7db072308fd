//! Arena bounds, corner obstacles and world expansion
//!
//! The world is a square `[0, size]²`. Four L-shaped barriers sit inset from
//! the corners; they redirect motion but never take part in mass transfer.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::spawn;
use super::state::GameState;
use crate::consts::*;

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Strict overlap with a square at `pos` (top-left) of edge `size`
    #[inline]
    pub fn overlaps_square(&self, pos: Vec2, size: f32) -> bool {
        pos.x < self.max.x && pos.x + size > self.min.x && pos.y < self.max.y && pos.y + size > self.min.y
    }

    /// Mirror across the vertical center line of a world of edge `world`
    fn mirror_x(&self, world: f32) -> Self {
        Self::new(
            Vec2::new(world - self.max.x, self.min.y),
            Vec2::new(world - self.min.x, self.max.y),
        )
    }

    /// Mirror across the horizontal center line of a world of edge `world`
    fn mirror_y(&self, world: f32) -> Self {
        Self::new(
            Vec2::new(self.min.x, world - self.max.y),
            Vec2::new(self.max.x, world - self.min.y),
        )
    }
}

/// Square arena with corner barriers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// Edge length
    pub size: f32,
    /// Corner barriers, regenerated whenever `size` changes
    pub obstacles: Vec<Rect>,
    /// Number of expansions so far
    pub expansions: u32,
    /// Player target size that triggers the next expansion
    pub next_expansion_size: f32,
    /// Edge length at match start (for scale-relative distances)
    base_size: f32,
}

impl World {
    pub fn new(size: f32, first_expansion_size: f32) -> Self {
        Self {
            size,
            obstacles: generate_obstacles(size),
            expansions: 0,
            next_expansion_size: first_expansion_size,
            base_size: size,
        }
    }

    /// Current size relative to the starting size
    #[inline]
    pub fn scale(&self) -> f32 {
        self.size / self.base_size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::splat(self.size / 2.0)
    }

    /// Whether a point lies inside any obstacle
    pub fn blocked(&self, p: Vec2) -> bool {
        self.obstacles.iter().any(|r| r.contains_point(p))
    }

    /// Whether the player has grown enough to trigger an expansion
    pub fn should_expand(&self, player_target_size: f32) -> bool {
        player_target_size >= self.next_expansion_size
    }

    /// Grow the world geometry by `factor` (entities are rescaled by `expand`)
    pub fn grow(&mut self, factor: f32) {
        self.size *= factor;
        self.next_expansion_size *= factor;
        self.expansions += 1;
        self.obstacles = generate_obstacles(self.size);
    }

    /// Keep an entity inside the arena and outside every obstacle
    pub fn constrain(&self, e: &mut Entity) {
        let particle = e.is_particle();
        let wall_restitution = if particle { PARTICLE_RESTITUTION } else { WALL_RESTITUTION };
        let obstacle_restitution = if particle { PARTICLE_RESTITUTION } else { OBSTACLE_RESTITUTION };
        let limit = (self.size - e.size).max(0.0);

        // Boundary walls: clamp and reflect with partial energy loss
        if e.pos.x < 0.0 {
            e.pos.x = 0.0;
            e.vel.x = e.vel.x.abs() * wall_restitution;
            e.target_vel.x = e.target_vel.x.abs();
        } else if e.pos.x > limit {
            e.pos.x = limit;
            e.vel.x = -e.vel.x.abs() * wall_restitution;
            e.target_vel.x = -e.target_vel.x.abs();
        }
        if e.pos.y < 0.0 {
            e.pos.y = 0.0;
            e.vel.y = e.vel.y.abs() * wall_restitution;
            e.target_vel.y = e.target_vel.y.abs();
        } else if e.pos.y > limit {
            e.pos.y = limit;
            e.vel.y = -e.vel.y.abs() * wall_restitution;
            e.target_vel.y = -e.target_vel.y.abs();
        }

        // Obstacles: take the shortest escape that lands clear of them all
        for _ in 0..3 {
            let Some(rect) = self
                .obstacles
                .iter()
                .find(|r| r.overlaps_square(e.pos, e.size))
                .copied()
            else {
                break;
            };
            self.push_out_of(&rect, e, obstacle_restitution);
        }

        self.clamp_inside(e);
    }

    /// Position-only clamp to `[0, size - e.size]`, velocity untouched
    #[inline]
    pub fn clamp_inside(&self, e: &mut Entity) {
        let limit = (self.size - e.size).max(0.0);
        e.pos = e.pos.clamp(Vec2::ZERO, Vec2::splat(limit));
    }

    /// Whether a square at `pos` lies inside the bounds and clear of every obstacle
    pub fn is_clear(&self, pos: Vec2, size: f32) -> bool {
        let limit = (self.size - size).max(0.0);
        pos.x >= 0.0
            && pos.y >= 0.0
            && pos.x <= limit
            && pos.y <= limit
            && !self.obstacles.iter().any(|r| r.overlaps_square(pos, size))
    }

    /// Move a square out of `rect` through one of its four faces
    ///
    /// The two arms of an L touch, so the nearest face can lead straight
    /// into the other arm. Faces whose exit is clear are preferred; the
    /// nearest exit overall is the fallback.
    fn push_out_of(&self, rect: &Rect, e: &mut Entity, restitution: f32) {
        let (pos, size) = (e.pos, e.size);
        let exits = [
            (Vec2::new(rect.min.x - size - OBSTACLE_SKIN, pos.y), Vec2::NEG_X),
            (Vec2::new(rect.max.x + OBSTACLE_SKIN, pos.y), Vec2::X),
            (Vec2::new(pos.x, rect.min.y - size - OBSTACLE_SKIN), Vec2::NEG_Y),
            (Vec2::new(pos.x, rect.max.y + OBSTACLE_SKIN), Vec2::Y),
        ];
        let nearest = |a: &&(Vec2, Vec2), b: &&(Vec2, Vec2)| {
            a.0.distance_squared(pos).total_cmp(&b.0.distance_squared(pos))
        };
        let Some(&(exit, normal)) = exits
            .iter()
            .filter(|(p, _)| self.is_clear(*p, size))
            .min_by(nearest)
            .or_else(|| exits.iter().min_by(nearest))
        else {
            return;
        };

        e.pos = exit;
        if normal.x != 0.0 {
            e.vel.x = e.vel.x.abs() * restitution * normal.x;
            e.target_vel.x = e.target_vel.x.abs() * normal.x;
        } else {
            e.vel.y = e.vel.y.abs() * restitution * normal.y;
            e.target_vel.y = e.target_vel.y.abs() * normal.y;
        }
    }
}

/// Symmetric L-shaped barriers in all four corners
///
/// Each L has a horizontal and a vertical arm meeting at the corner nearest
/// the world corner; the arms do not overlap each other.
pub fn generate_obstacles(world: f32) -> Vec<Rect> {
    let margin = world * OBSTACLE_MARGIN_FRAC;
    let thickness = world * OBSTACLE_THICKNESS_FRAC;
    let arm = world * OBSTACLE_ARM_FRAC;

    let horizontal = Rect::new(
        Vec2::new(margin, margin),
        Vec2::new(margin + arm, margin + thickness),
    );
    let vertical = Rect::new(
        Vec2::new(margin, margin + thickness),
        Vec2::new(margin + thickness, margin + arm),
    );

    let mut obstacles = Vec::with_capacity(8);
    for base in [horizontal, vertical] {
        obstacles.push(base);
        obstacles.push(base.mirror_x(world));
        obstacles.push(base.mirror_y(world));
        obstacles.push(base.mirror_x(world).mirror_y(world));
    }
    obstacles
}

/// Enlarge the world by `factor`, rescaling every entity and the camera
///
/// Positions, velocities and steering targets are multiplied by `factor` so
/// relative layout is preserved while absolute distances grow. The camera
/// keeps the player at the same screen-relative offset. A burst of enemies
/// and food refills the new space.
pub fn expand(state: &mut GameState, factor: f32) {
    let old_size = state.world.size;
    let camera_offset = state.player.center() - state.camera.pos;

    state.world.grow(factor);

    rescale(&mut state.player, factor);
    for e in state.enemies.iter_mut() {
        rescale(e, factor);
    }
    for p in state.particles.iter_mut() {
        rescale(p, factor);
    }

    state.camera.pos = state.player.center() - camera_offset;

    log::info!(
        "World expansion #{}: {:.0} -> {:.0} (next at size {:.1})",
        state.world.expansions,
        old_size,
        state.world.size,
        state.world.next_expansion_size
    );

    spawn::spawn_burst(state, factor);
}

fn rescale(e: &mut Entity, factor: f32) {
    e.pos *= factor;
    e.vel *= factor;
    e.target_vel *= factor;
}
