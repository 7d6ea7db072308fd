//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (player first, then arena slot order)
//! - No rendering or platform dependencies

pub mod ai;
pub mod arena;
pub mod camera;
pub mod clock;
pub mod collision;
pub mod entity;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod world;

pub use arena::{EntityArena, EntityId};
pub use camera::Camera;
pub use clock::{MatchClock, format_mmss};
pub use collision::{PairOutcome, Side, resolve_collisions, resolve_pair};
pub use entity::{Entity, EntityKind};
pub use state::{EndReason, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, tick};
pub use world::{Rect, World};
