//! Render snapshot
//!
//! Copies everything a 2D renderer needs out of the simulation so drawing
//! never touches `GameState` internals. Colours are packed `0xRRGGBB`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::input::Joystick;
use crate::sim::entity::{Entity, EntityKind};
use crate::sim::state::{GamePhase, GameState};
use crate::sim::world::Rect;

pub const PLAYER_COLOR: u32 = 0x3b82f6;
pub const FOOD_COLOR: u32 = 0x86efac;
/// Enemy the player can absorb
pub const EDIBLE_COLOR: u32 = 0x22c55e;
/// Enemy that bounces off the player
pub const BUMP_COLOR: u32 = 0xeab308;
/// Enemy that can absorb the player
pub const DANGER_COLOR: u32 = 0xef4444;
pub const BACKGROUND_COLOR: u32 = 0x0f172a;
pub const GRID_COLOR: u32 = 0x1e293b;
pub const BOUNDARY_COLOR: u32 = 0xef4444;
/// Outline darkening in percent
pub const OUTLINE_SHADE: i32 = -40;
pub const OUTLINE_WIDTH_FRAC: f32 = 0.05;
pub const MIN_OUTLINE_WIDTH: f32 = 2.0;

/// How an enemy compares to the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Threat {
    Edible,
    Bump,
    Danger,
}

impl Threat {
    /// Classify by edge ratio against the absorb threshold
    pub fn classify(enemy_size: f32, player_size: f32, absorb_threshold: f32) -> Self {
        let ratio = enemy_size / player_size;
        if ratio < 1.0 / absorb_threshold {
            Threat::Edible
        } else if ratio > absorb_threshold {
            Threat::Danger
        } else {
            Threat::Bump
        }
    }

    pub fn color(&self) -> u32 {
        match self {
            Threat::Edible => EDIBLE_COLOR,
            Threat::Bump => BUMP_COLOR,
            Threat::Danger => DANGER_COLOR,
        }
    }
}

/// Lighten (positive) or darken (negative) a colour by `percent`
pub fn shade_color(color: u32, percent: i32) -> u32 {
    let scale = |channel: u32| -> u32 {
        let v = (channel as f32 * (100 + percent) as f32 / 100.0).round();
        v.clamp(0.0, 255.0) as u32
    };
    let r = scale((color >> 16) & 0xff);
    let g = scale((color >> 8) & 0xff);
    let b = scale(color & 0xff);
    (r << 16) | (g << 8) | b
}

/// One square to draw, in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Drawable {
    pub kind: EntityKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: f32,
    pub color: u32,
    pub outline: u32,
    /// Outline stroke width, 5% of the edge but at least 2
    pub border: f32,
    /// Pop amplitude: the drawn square grows by `pop` and its corner moves
    /// up and left by `pop / 2`, so it swells around its center
    pub pop: f32,
}

impl Drawable {
    fn new(e: &Entity, color: u32) -> Self {
        Self {
            kind: e.kind,
            pos: e.pos,
            size: e.size,
            color,
            outline: shade_color(color, OUTLINE_SHADE),
            border: outline_width(e.size),
            pop: e.bounce_z,
        }
    }

    /// Top-left corner and edge of the square as drawn, with pop applied
    pub fn drawn_square(&self) -> (Vec2, f32) {
        (self.pos - Vec2::splat(self.pop * 0.5), self.size + self.pop)
    }
}

/// Outline stroke width for a block of edge `size`
pub fn outline_width(size: f32) -> f32 {
    (size * OUTLINE_WIDTH_FRAC).max(MIN_OUTLINE_WIDTH)
}

/// On-screen joystick, present only while a touch is held
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JoystickVisual {
    pub base: Vec2,
    pub knob: Vec2,
    pub radius: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderFrame {
    /// World point at the viewport center
    pub camera_pos: Vec2,
    /// Pixels per world unit
    pub camera_scale: f32,
    pub viewport: Vec2,
    pub world_size: f32,
    pub obstacles: Vec<Rect>,
    /// Back to front (sorted by bottom edge)
    pub drawables: Vec<Drawable>,
    pub joystick: Option<JoystickVisual>,
    pub score: u64,
    pub time_remaining: String,
    pub phase: GamePhase,
}

/// Snapshot the state for drawing
pub fn build_render_frame(state: &GameState, joystick: &Joystick) -> RenderFrame {
    let threshold = state.settings.absorb_threshold;
    let player_size = state.player.size;

    let mut drawables = Vec::with_capacity(1 + state.enemies.live_count() + state.particles.live_count());

    for (_, p) in state.particles.iter_alive() {
        drawables.push(Drawable::new(p, FOOD_COLOR));
    }
    for (_, e) in state.enemies.iter_alive() {
        let threat = Threat::classify(e.size, player_size, threshold);
        drawables.push(Drawable::new(e, threat.color()));
    }
    if !state.player.is_dead {
        drawables.push(Drawable::new(&state.player, PLAYER_COLOR));
    }

    // Lower blocks overlap higher ones
    drawables.sort_by(|a, b| (a.pos.y + a.size).total_cmp(&(b.pos.y + b.size)));

    let joystick = joystick.active.then(|| JoystickVisual {
        base: joystick.base,
        knob: joystick.knob,
        radius: joystick.radius,
    });

    RenderFrame {
        camera_pos: state.camera.pos,
        camera_scale: state.camera.scale,
        viewport: state.camera.viewport,
        world_size: state.world.size,
        obstacles: state.world.obstacles.clone(),
        drawables,
        joystick,
        score: state.score(),
        time_remaining: state.clock.display(),
        phase: state.phase,
    }
}
