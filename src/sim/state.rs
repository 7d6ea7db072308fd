//! Game state and core simulation types
//!
//! A match owns everything it simulates: world, entities, camera, clock and
//! the seeded RNG. Restarting a match builds a fresh `GameState`.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arena::EntityArena;
use super::camera::Camera;
use super::clock::MatchClock;
use super::entity::Entity;
use super::spawn;
use super::world::World;
use crate::settings::Settings;

/// Why a match ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndReason {
    /// A larger block absorbed the player
    Devoured,
    /// The countdown ran out with the player alive
    TimeUp,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            EndReason::Devoured => "DEVOURED",
            EndReason::TimeUp => "TIMEUP",
        }
    }
}

/// Current phase of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    Playing,
    /// Terminal; further ticks are no-ops
    GameOver { reason: EndReason },
}

/// Output of a tick, drained by the caller after `tick` returns
///
/// Each kind is emitted at most once per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Player area changed through an interaction
    ScoreChanged { score: u64 },
    /// Displayed countdown changed (`MM:SS`)
    TimeChanged { remaining: String },
    /// Match is over
    MatchEnded { reason: EndReason, score: u64 },
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub settings: Settings,
    pub rng: Pcg32,
    pub world: World,
    /// The single player; signals death via `is_dead` but is never removed
    pub player: Entity,
    pub enemies: EntityArena,
    /// Food particles
    pub particles: EntityArena,
    pub camera: Camera,
    pub clock: MatchClock,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Pending events for the current tick
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match with the given seed and populate it
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut state = Self::empty(seed, settings);
        spawn::populate(&mut state);

        log::info!(
            "Match started (seed {}, {} enemies, {} food)",
            seed,
            state.enemies.len(),
            state.particles.len()
        );

        state.events.push(GameEvent::ScoreChanged {
            score: state.score(),
        });
        state.events.push(GameEvent::TimeChanged {
            remaining: state.clock.display(),
        });
        state
    }

    /// A match with only the player in it
    pub fn empty(seed: u64, settings: Settings) -> Self {
        let settings = settings.validated();
        let world = World::new(settings.initial_world_size, settings.first_expansion_size);
        let mut player = Entity::player(Vec2::ZERO);
        player.pos = world.center() - Vec2::splat(player.size / 2.0);

        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            camera: Camera::new(player.center()),
            clock: MatchClock::new(settings.match_duration_secs),
            settings,
            world,
            player,
            enemies: EntityArena::with_capacity(128),
            particles: EntityArena::with_capacity(256),
            phase: GamePhase::Playing,
            time_ticks: 0,
            events: Vec::new(),
        }
    }

    /// Current score: the player's area
    pub fn score(&self) -> u64 {
        self.player.area().floor() as u64
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver { .. })
    }

    /// Take this tick's events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Enter the terminal phase and report the final score
    pub fn end_match(&mut self, reason: EndReason) {
        if self.is_over() {
            return;
        }
        let score = self.score();
        self.phase = GamePhase::GameOver { reason };
        log::info!(
            "Match ended: {} with score {} after {} ticks",
            reason.as_str(),
            score,
            self.time_ticks
        );
        self.events.push(GameEvent::MatchEnded { reason, score });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_match() {
        let state = GameState::new(12345, Settings::default());
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score(), 1600);
        assert_eq!(state.enemies.len(), 60);
        assert_eq!(state.particles.len(), 100);
        assert_eq!(
            state.events,
            vec![
                GameEvent::ScoreChanged { score: 1600 },
                GameEvent::TimeChanged {
                    remaining: "03:00".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_player_starts_centered() {
        let state = GameState::empty(1, Settings::default());
        assert_eq!(state.player.center(), Vec2::splat(1500.0));
        assert_eq!(state.camera.pos, state.player.center());
    }

    #[test]
    fn test_end_match_once() {
        let mut state = GameState::empty(1, Settings::default());
        state.end_match(EndReason::TimeUp);
        state.end_match(EndReason::Devoured);
        assert_eq!(state.phase, GamePhase::GameOver { reason: EndReason::TimeUp });
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::MatchEnded {
                reason: EndReason::TimeUp,
                score: 1600
            }]
        );
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_same_seed_same_population() {
        let a = GameState::new(99, Settings::default());
        let b = GameState::new(99, Settings::default());
        let pa: Vec<_> = a.enemies.iter_alive().map(|(_, e)| (e.pos, e.size)).collect();
        let pb: Vec<_> = b.enemies.iter_alive().map(|(_, e)| (e.pos, e.size)).collect();
        assert_eq!(pa, pb);
    }
}
