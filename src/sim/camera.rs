//! Smoothly following, size-aware camera
//!
//! `pos` is the world point shown at the center of the viewport. The zoom
//! keeps the player's on-screen footprint near `PLAYER_SCREEN_SIZE` pixels,
//! so growth reads as the world shrinking around the player.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use crate::consts::*;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    /// World point at the viewport center
    pub pos: Vec2,
    /// Pixels per world unit
    pub scale: f32,
    /// Viewport in pixels
    pub viewport: Vec2,
}

impl Camera {
    pub fn new(target: Vec2) -> Self {
        Self {
            pos: target,
            scale: 1.0,
            viewport: Vec2::new(DEFAULT_VIEWPORT.0, DEFAULT_VIEWPORT.1),
        }
    }

    /// Viewport change only; world coordinates are unaffected
    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport = Vec2::new(width.max(1.0), height.max(1.0));
    }

    /// Zoom that keeps a body of `size` at the constant screen footprint
    #[inline]
    pub fn target_scale(size: f32) -> f32 {
        PLAYER_SCREEN_SIZE / size.max(1.0)
    }

    /// Ease position toward the player's center and zoom toward its target
    pub fn follow(&mut self, player: &Entity) {
        self.pos += (player.center() - self.pos) * CAMERA_FOLLOW;
        self.scale += (Self::target_scale(player.size) - self.scale) * CAMERA_ZOOM;
    }

    /// Half the viewport diagonal in world units
    pub fn visible_radius(&self) -> f32 {
        (self.viewport / 2.0).length() / self.scale
    }

    pub fn world_to_screen(&self, p: Vec2) -> Vec2 {
        (p - self.pos) * self.scale + self.viewport / 2.0
    }

    pub fn screen_to_world(&self, p: Vec2) -> Vec2 {
        (p - self.viewport / 2.0) / self.scale + self.pos
    }
}
