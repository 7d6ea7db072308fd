//! Input devices feeding the simulation
//!
//! Both devices only produce a direction; the `Game` copies them into a
//! `TickInput` snapshot at the start of each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::JOYSTICK_RADIUS;

/// Held movement keys (debouncing happens in the shell)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

/// Virtual on-screen joystick driven by a single touch
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Joystick {
    pub active: bool,
    /// Identifier of the owning touch
    pub id: Option<u64>,
    /// Where the touch started (screen pixels)
    pub base: Vec2,
    /// Knob position, clamped to `radius` around `base`
    pub knob: Vec2,
    /// Direction scaled by deflection, inside the unit disk
    pub dir: Vec2,
    pub radius: f32,
}

impl Default for Joystick {
    fn default() -> Self {
        Self {
            active: false,
            id: None,
            base: Vec2::ZERO,
            knob: Vec2::ZERO,
            dir: Vec2::ZERO,
            radius: JOYSTICK_RADIUS,
        }
    }
}

impl Joystick {
    /// Begin tracking a touch; ignored while another touch owns the stick
    pub fn start(&mut self, x: f32, y: f32, id: u64) {
        if self.active {
            return;
        }
        let p = Vec2::new(x, y);
        self.active = true;
        self.id = Some(id);
        self.base = p;
        self.knob = p;
        self.dir = Vec2::ZERO;
    }

    pub fn move_to(&mut self, x: f32, y: f32, id: u64) {
        if !self.owns(id) {
            return;
        }
        let delta = Vec2::new(x, y) - self.base;
        let dist = delta.length();
        if !dist.is_finite() {
            return;
        }

        self.knob = if dist > self.radius {
            self.base + delta / dist * self.radius
        } else {
            Vec2::new(x, y)
        };

        // A touch resting on the base keeps the last heading
        if dist > 0.0 {
            self.dir = delta / dist * (dist.min(self.radius) / self.radius);
        }
    }

    pub fn end(&mut self, id: u64) {
        if self.owns(id) {
            *self = Self {
                radius: self.radius,
                ..Self::default()
            };
        }
    }

    /// Direction to feed the tick, if a touch is active
    pub fn direction(&self) -> Option<Vec2> {
        self.active.then_some(self.dir)
    }

    fn owns(&self, id: u64) -> bool {
        self.active && self.id == Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_knob_clamped_to_radius() {
        let mut stick = Joystick::default();
        stick.start(100.0, 100.0, 1);
        stick.move_to(300.0, 100.0, 1);
        assert_eq!(stick.knob, Vec2::new(150.0, 100.0));
        assert_eq!(stick.direction(), Some(Vec2::X));
    }

    #[test]
    fn test_partial_deflection() {
        let mut stick = Joystick::default();
        stick.start(0.0, 0.0, 1);
        stick.move_to(0.0, 25.0, 1);
        let dir = stick.direction().unwrap();
        assert!((dir - Vec2::new(0.0, 0.5)).length() < 1e-6);
    }

    #[test]
    fn test_zero_move_keeps_direction() {
        let mut stick = Joystick::default();
        stick.start(0.0, 0.0, 1);
        stick.move_to(-10.0, 0.0, 1);
        let before = stick.dir;
        stick.move_to(0.0, 0.0, 1);
        assert_eq!(stick.dir, before);
        assert_eq!(stick.knob, Vec2::ZERO);
    }

    #[test]
    fn test_single_owner() {
        let mut stick = Joystick::default();
        stick.start(0.0, 0.0, 7);
        stick.start(500.0, 500.0, 8);
        assert_eq!(stick.base, Vec2::ZERO);

        stick.move_to(40.0, 0.0, 8);
        assert_eq!(stick.dir, Vec2::ZERO, "foreign touch ignored");

        stick.end(8);
        assert!(stick.active);
        stick.end(7);
        assert!(!stick.active);
        assert_eq!(stick.direction(), None);
        assert_eq!(stick.radius, JOYSTICK_RADIUS);
    }
}
