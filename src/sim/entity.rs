//! Kinematic block entity
//!
//! Every player, enemy and food particle is an axis-aligned square whose
//! mass is its area. Growth and shrinkage always go through area so that
//! absorbing an equal body grows the edge by √2, not 2.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::lerp;

/// What an entity is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Enemy,
    Particle,
}

/// A square block in world space
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Entity {
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub vel: Vec2,
    /// Rendered edge length, eases toward `target_size`
    pub size: f32,
    /// Authoritative edge length (√area)
    target_size: f32,
    /// Mass
    area: f32,
    /// Tombstone: excluded from interactions, reaped at end of tick
    pub is_dead: bool,
    /// Ticks since creation
    pub age: u32,
    /// Enemy steering goal
    pub target_vel: Vec2,
    /// Ticks until the next enemy decision
    pub ai_timer: f32,
    /// Cosmetic pop amplitude, decays to zero
    pub bounce_z: f32,
}

impl Entity {
    pub fn new(kind: EntityKind, pos: Vec2, size: f32) -> Self {
        Self {
            kind,
            pos,
            vel: Vec2::ZERO,
            size,
            target_size: size,
            area: size * size,
            is_dead: false,
            age: 0,
            target_vel: Vec2::ZERO,
            ai_timer: 0.0,
            bounce_z: 0.0,
        }
    }

    pub fn player(pos: Vec2) -> Self {
        Self::new(EntityKind::Player, pos, PLAYER_START_SIZE)
    }

    pub fn enemy(pos: Vec2, size: f32) -> Self {
        Self::new(EntityKind::Enemy, pos, size.max(MIN_BODY_SIZE))
    }

    pub fn food(pos: Vec2) -> Self {
        Self::new(EntityKind::Particle, pos, FOOD_SIZE)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.area
    }

    #[inline]
    pub fn target_size(&self) -> f32 {
        self.target_size
    }

    #[inline]
    pub fn is_particle(&self) -> bool {
        self.kind == EntityKind::Particle
    }

    /// Center of the rendered square
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Smallest area this entity may shrink to
    #[inline]
    fn min_area(&self) -> f32 {
        if self.is_particle() { FOOD_AREA } else { MIN_BODY_AREA }
    }

    /// Gain mass
    pub fn add_area(&mut self, amount: f32) {
        self.set_area(self.area.max(0.0) + amount);
    }

    /// Lose mass (floored at the minimum viable area) with a visual pop
    pub fn remove_area(&mut self, amount: f32) {
        self.set_area(self.area - amount);
        self.bounce_z = BOUNCE_POP;
    }

    /// Lose mass silently (continuous decay, no pop)
    pub fn shed_area(&mut self, amount: f32) {
        self.set_area(self.area - amount);
    }

    fn set_area(&mut self, area: f32) {
        self.area = area.max(self.min_area());
        self.target_size = self.area.sqrt();
    }

    /// Advance one tick: move, apply friction, ease size, decay pop, age
    pub fn integrate(&mut self) {
        self.pos += self.vel;
        self.vel *= FRICTION;

        self.size = lerp(self.size, self.target_size, SIZE_SMOOTHING);

        if self.bounce_z > 0.0 {
            self.bounce_z = (self.bounce_z - 1.0).max(0.0);
        }

        self.age = self.age.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_area_grows_by_area() {
        let mut e = Entity::enemy(Vec2::ZERO, 40.0);
        e.add_area(1600.0);
        assert_eq!(e.area(), 3200.0);
        assert!((e.target_size() - 3200f32.sqrt()).abs() < 1e-4);
        // Rendered size has not snapped yet
        assert_eq!(e.size, 40.0);
    }

    #[test]
    fn test_remove_area_floors_at_minimum() {
        let mut e = Entity::enemy(Vec2::ZERO, 30.0);
        e.remove_area(10_000.0);
        assert_eq!(e.area(), MIN_BODY_AREA);
        assert_eq!(e.target_size(), MIN_BODY_SIZE);
        assert_eq!(e.bounce_z, BOUNCE_POP);
    }

    #[test]
    fn test_shed_area_does_not_pop() {
        let mut e = Entity::enemy(Vec2::ZERO, 100.0);
        e.shed_area(100.0);
        assert_eq!(e.area(), 9900.0);
        assert_eq!(e.bounce_z, 0.0);
    }

    #[test]
    fn test_enemy_size_floor() {
        let e = Entity::enemy(Vec2::ZERO, 10.0);
        assert_eq!(e.area(), MIN_BODY_AREA);
    }

    #[test]
    fn test_integrate() {
        let mut e = Entity::player(Vec2::new(100.0, 100.0));
        e.vel = Vec2::new(10.0, 0.0);
        e.add_area(900.0); // 2500 -> target 50
        e.bounce_z = 0.5;

        e.integrate();

        assert_eq!(e.pos, Vec2::new(110.0, 100.0));
        assert!((e.vel.x - 8.8).abs() < 1e-5);
        assert!((e.size - 41.0).abs() < 1e-4);
        assert_eq!(e.bounce_z, 0.0);
        assert_eq!(e.age, 1);
    }

    #[test]
    fn test_size_converges_without_snapping() {
        let mut e = Entity::player(Vec2::ZERO);
        e.add_area(2500.0 - 1600.0);
        e.integrate();
        assert!(e.size > 40.0 && e.size < 50.0);
        for _ in 0..100 {
            e.integrate();
        }
        assert!((e.size - 50.0).abs() < 0.01);
    }
}
