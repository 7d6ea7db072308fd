//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EndReason, GameEvent, GameState};
use super::{ai, collision, spawn, world};
use crate::consts::*;
use crate::normalize_or;

/// Input commands for a single tick (a copied snapshot, never shared)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Active virtual joystick direction; overrides the keys when present
    pub joystick: Option<Vec2>,
}

impl TickInput {
    /// Movement intent, at most unit length
    pub fn direction(&self) -> Vec2 {
        if let Some(dir) = self.joystick {
            return if dir.is_finite() {
                dir.clamp_length_max(1.0)
            } else {
                Vec2::ZERO
            };
        }

        let mut dir = Vec2::ZERO;
        if self.left {
            dir.x -= 1.0;
        }
        if self.right {
            dir.x += 1.0;
        }
        if self.up {
            dir.y -= 1.0;
        }
        if self.down {
            dir.y += 1.0;
        }
        normalize_or(dir, Vec2::ZERO)
    }
}

/// Player top speed; bigger is slower
#[inline]
pub fn player_max_speed(size: f32) -> f32 {
    (PLAYER_SPEED_FACTOR / size).clamp(PLAYER_MIN_SPEED, PLAYER_MAX_SPEED)
}

/// Advance the game state by one fixed timestep
///
/// `dt` only drives the match clock; motion constants are per tick.
/// Events produced by this tick are left in `state.events`.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.is_over() {
        return;
    }

    state.time_ticks += 1;

    // Clock
    if let Some(remaining) = state.clock.advance(dt) {
        state.events.push(GameEvent::TimeChanged { remaining });
    }

    // Player steering
    let player = &mut state.player;
    player.vel += input.direction() * PLAYER_ACCEL;
    let max_speed = player_max_speed(player.size);
    if player.vel.length() > max_speed {
        player.vel = player.vel.normalize() * max_speed;
    }

    // Integrate everything
    state.player.integrate();
    for e in state.enemies.iter_mut().chain(state.particles.iter_mut()) {
        if !e.is_dead {
            e.integrate();
        }
    }

    ai::update_enemies(state);

    // Bounds and obstacles shape the space before contacts resolve
    state.world.constrain(&mut state.player);
    for e in state.enemies.iter_mut().chain(state.particles.iter_mut()) {
        if !e.is_dead {
            state.world.constrain(e);
        }
    }

    let score_changed = collision::resolve_collisions(state);

    // Bump separation and fresh drops can land in a wall or a barrier
    if !state.player.is_dead {
        state.world.constrain(&mut state.player);
    }
    for e in state.enemies.iter_mut().chain(state.particles.iter_mut()) {
        if !e.is_dead {
            state.world.constrain(e);
        }
    }

    if !state.player.is_dead && state.world.should_expand(state.player.target_size()) {
        let factor = state.settings.expansion_factor;
        world::expand(state, factor);
    }

    state.enemies.sweep_dead();
    state.particles.sweep_dead();

    spawn::maintain_population(state);

    state.camera.follow(&state.player);

    if score_changed {
        state.events.push(GameEvent::ScoreChanged {
            score: state.score(),
        });
    }

    // Terminal conditions; death takes precedence over time-up
    if state.player.is_dead {
        state.end_match(EndReason::Devoured);
    } else if state.clock.is_expired() {
        state.end_match(EndReason::TimeUp);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::entity::Entity;
    use crate::sim::state::GamePhase;

    fn quiet_settings() -> Settings {
        Settings {
            initial_enemies: 0,
            initial_food: 0,
            min_enemies: 0,
            min_food: 0,
            ..Default::default()
        }
    }

    #[test]
    fn test_input_direction() {
        let keys = TickInput {
            up: true,
            right: true,
            ..Default::default()
        };
        let d = keys.direction();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.x > 0.0 && d.y < 0.0);

        let opposed = TickInput {
            left: true,
            right: true,
            ..Default::default()
        };
        assert_eq!(opposed.direction(), Vec2::ZERO);

        let stick = TickInput {
            down: true,
            joystick: Some(Vec2::new(3.0, 0.0)),
            ..Default::default()
        };
        assert_eq!(stick.direction(), Vec2::X, "joystick overrides keys and is clamped");
    }

    #[test]
    fn test_player_moves_and_speed_is_capped() {
        let mut state = GameState::new(1, quiet_settings());
        state.drain_events();
        let start = state.player.pos;
        let input = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..30 {
            tick(&mut state, &input, SIM_DT);
            assert!(state.player.vel.length() <= player_max_speed(state.player.size) + 1e-4);
        }
        assert!(state.player.pos.x > start.x);
        assert_eq!(state.player.pos.y, start.y);
    }

    #[test]
    fn test_time_up_reports_final_area() {
        let settings = Settings {
            match_duration_secs: 1.0,
            ..quiet_settings()
        };
        let mut state = GameState::new(5, settings);
        state.player.add_area(400.0);
        state.drain_events();

        let mut events = Vec::new();
        for _ in 0..70 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            events.extend(state.drain_events());
        }

        assert_eq!(state.phase, GamePhase::GameOver { reason: EndReason::TimeUp });
        assert!(events.contains(&GameEvent::TimeChanged {
            remaining: "00:00".to_string()
        }));
        assert_eq!(
            events.last(),
            Some(&GameEvent::MatchEnded {
                reason: EndReason::TimeUp,
                score: 2000
            })
        );
        // Ticks after the end change nothing
        let ticks = state.time_ticks;
        tick(&mut state, &TickInput::default(), SIM_DT);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_devoured_ends_match() {
        let mut state = GameState::new(5, quiet_settings());
        state.drain_events();
        let pos = state.player.pos - Vec2::splat(20.0);
        // Under the AI size cap (2.5x player), so no decay interferes
        state.enemies.spawn(Entity::enemy(pos, 90.0));

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert!(state.player.is_dead);
        assert_eq!(state.phase, GamePhase::GameOver { reason: EndReason::Devoured });
        let events = state.drain_events();
        assert_eq!(
            events.last(),
            Some(&GameEvent::MatchEnded {
                reason: EndReason::Devoured,
                score: 1600
            })
        );
        // Absorber is still there with the player's mass added
        let (_, e) = state.enemies.iter_alive().next().unwrap();
        assert_eq!(e.area(), 8100.0 + 1600.0);
    }

    #[test]
    fn test_eating_food_emits_one_score_event() {
        let mut state = GameState::new(5, quiet_settings());
        state.drain_events();
        for offset in [0.0, 10.0, 20.0] {
            let mut food = Entity::food(state.player.pos + Vec2::new(offset, 5.0));
            food.age = 30;
            state.particles.spawn(food);
        }

        tick(&mut state, &TickInput::default(), SIM_DT);

        let scores: Vec<_> = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::ScoreChanged { .. }))
            .collect();
        assert_eq!(scores, vec![GameEvent::ScoreChanged { score: 1600 + 3 * 144 }]);
        assert_eq!(state.particles.len(), 0, "eaten food is reaped");
    }

    #[test]
    fn test_expansion_triggers_on_threshold() {
        let mut state = GameState::new(5, quiet_settings());
        state.player.add_area(120.0 * 120.0 - 1600.0);

        tick(&mut state, &TickInput::default(), SIM_DT);

        assert_eq!(state.world.expansions, 1);
        assert_eq!(state.world.size, 4500.0);
        assert_eq!(state.enemies.len(), 15);
        assert!(state.particles.len() >= 30);
    }

    #[test]
    fn test_bump_never_leaves_body_in_obstacle() {
        let mut state = GameState::new(5, quiet_settings());
        let face = state.world.obstacles[0].max.y;
        // A sits just under the barrier; B hits it from below
        state.enemies.spawn(Entity::enemy(Vec2::new(1000.0, face + 2.0), 40.0));
        state.enemies.spawn(Entity::enemy(Vec2::new(1005.0, face + 35.0), 38.0));

        tick(&mut state, &TickInput::default(), SIM_DT);

        let obstacles = &state.world.obstacles;
        for (_, e) in state.enemies.iter_alive().chain(state.particles.iter_alive()) {
            for r in obstacles {
                assert!(!r.overlaps_square(e.pos, e.size), "{:?} inside {:?}", e.pos, r);
            }
        }
        // The bump did happen
        assert!(state.particles.live_count() > 0);
    }

    #[test]
    fn test_population_tops_up_one_per_tick() {
        let settings = Settings {
            min_enemies: 5,
            min_food: 5,
            ..quiet_settings()
        };
        let mut state = GameState::new(9, settings);
        let mut last = 0;
        for _ in 0..20 {
            tick(&mut state, &TickInput::default(), SIM_DT);
            let n = state.enemies.len();
            assert!(n <= last + 1, "at most one spawn per tick");
            assert!(n <= 5);
            last = n;
        }
        assert!(state.enemies.len() >= 4);
        assert!(state.particles.len() >= 4);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(99999, Settings::default());
        let mut b = GameState::new(99999, Settings::default());
        let inputs = [
            TickInput {
                up: true,
                ..Default::default()
            },
            TickInput {
                joystick: Some(Vec2::new(0.3, 0.7)),
                ..Default::default()
            },
            TickInput::default(),
        ];

        for i in 0..300 {
            let input = inputs[i % inputs.len()];
            tick(&mut a, &input, SIM_DT);
            tick(&mut b, &input, SIM_DT);
        }

        assert_eq!(a.time_ticks, b.time_ticks);
        assert_eq!(a.player.pos, b.player.pos);
        assert_eq!(a.enemies.len(), b.enemies.len());
        assert_eq!(a.particles.len(), b.particles.len());
        assert_eq!(a.drain_events(), b.drain_events());
    }

    #[test]
    fn test_invariants_hold_over_a_match() {
        let mut state = GameState::new(2024, Settings::default());
        let input = TickInput {
            joystick: Some(Vec2::new(0.6, -0.8)),
            ..Default::default()
        };
        for _ in 0..600 {
            tick(&mut state, &input, SIM_DT);
            if state.is_over() {
                break;
            }
            let size = state.world.size;
            for (_, e) in state.enemies.iter_alive().chain(state.particles.iter_alive()) {
                assert!(!e.is_particle() || e.area() == 144.0);
                if !e.is_particle() {
                    assert!(e.area() >= 625.0);
                }
                assert!(e.pos.x >= 0.0 && e.pos.x <= size - e.size + 1e-3);
                assert!(e.pos.y >= 0.0 && e.pos.y <= size - e.size + 1e-3);
                assert!(e.pos.is_finite() && e.vel.is_finite());
                for r in &state.world.obstacles {
                    assert!(!r.overlaps_square(e.pos, e.size), "{:?} inside {:?}", e.pos, r);
                }
            }
            assert!(state.player.area() >= 625.0);
        }
    }
}
