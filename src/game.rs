//! Match lifecycle and frame driving
//!
//! `Game` is what a shell talks to: it owns the current `GameState`, the
//! input devices and the fixed-step accumulator. Input callbacks only touch
//! the devices; each tick consumes a copied `TickInput` snapshot.

use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::input::{Joystick, KeyState};
use crate::render::{RenderFrame, build_render_frame};
use crate::settings::Settings;
use crate::sim::state::{GameEvent, GameState};
use crate::sim::tick::{TickInput, tick};

/// Largest frame delta accepted before clamping (avoids a burst after a stall)
const MAX_FRAME_DT: f32 = 0.1;

pub struct Game {
    state: GameState,
    settings: Settings,
    keys: KeyState,
    joystick: Joystick,
    accumulator: f32,
    seed: u64,
}

impl Game {
    pub fn new(settings: Settings, seed: u64) -> Self {
        let settings = settings.validated();
        Self {
            state: GameState::new(seed, settings.clone()),
            settings,
            keys: KeyState::default(),
            joystick: Joystick::default(),
            accumulator: 0.0,
            seed,
        }
    }

    /// Discard the current match and build a fresh one from `seed`
    pub fn start(&mut self, seed: u64) {
        let viewport = self.state.camera.viewport;
        self.seed = seed;
        self.state = GameState::new(seed, self.settings.clone());
        self.state.camera.resize(viewport.x, viewport.y);
        self.accumulator = 0.0;
        self.keys = KeyState::default();
        self.joystick = Joystick::default();
    }

    /// New match with a seed derived from the previous one
    pub fn restart(&mut self) {
        let seed = self.seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        log::info!("Restarting match (seed {})", seed);
        self.start(seed);
    }

    /// Viewport change only; world coordinates are unaffected
    pub fn resize(&mut self, width: f32, height: f32) {
        self.state.camera.resize(width, height);
    }

    pub fn set_keys(&mut self, keys: KeyState) {
        self.keys = keys;
    }

    pub fn touch_start(&mut self, x: f32, y: f32, id: u64) {
        self.joystick.start(x, y, id);
    }

    pub fn touch_move(&mut self, x: f32, y: f32, id: u64) {
        self.joystick.move_to(x, y, id);
    }

    pub fn touch_end(&mut self, id: u64) {
        self.joystick.end(id);
    }

    /// Input snapshot for the next tick
    pub fn input(&self) -> TickInput {
        TickInput {
            up: self.keys.up,
            down: self.keys.down,
            left: self.keys.left,
            right: self.keys.right,
            joystick: self.joystick.direction(),
        }
    }

    /// Run as many fixed ticks as `frame_dt` allows and return their events
    pub fn update(&mut self, frame_dt: f32) -> Vec<GameEvent> {
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let mut events = self.state.drain_events();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        if substeps == MAX_SUBSTEPS {
            // Drop the backlog rather than fall further behind
            self.accumulator = self.accumulator.min(SIM_DT);
        }
        events
    }

    /// Advance exactly one tick
    pub fn step(&mut self) -> Vec<GameEvent> {
        let input = self.input();
        tick(&mut self.state, &input, SIM_DT);
        self.state.drain_events()
    }

    pub fn render_frame(&self) -> RenderFrame {
        build_render_frame(&self.state, &self.joystick)
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }
}
