//! Block Devourer - headless native runner
//!
//! Plays one match with a simple autopilot and logs the events.
//!
//! Usage: `block-devourer [seed] [difficulty] [settings.json]`

use block_devourer::consts::SIM_DT;
use block_devourer::input::KeyState;
use block_devourer::sim::{EndReason, GameEvent, GameState};
use block_devourer::{Difficulty, Game, Settings};
use glam::Vec2;
use std::path::PathBuf;

/// Hard stop in ticks, well past any configured match length
const TICK_LIMIT: u64 = 60 * 60 * 30;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse().unwrap_or_else(|_| {
            log::warn!("Invalid seed '{}', using 0", s);
            0
        }),
        None => 0,
    };
    // An explicit preset overrides the file; otherwise the file decides
    let preset = args.next().and_then(|d| {
        let parsed = Difficulty::from_str(&d);
        if parsed.is_none() {
            log::warn!("Unknown difficulty '{}', ignoring", d);
        }
        parsed
    });
    let path = args.next().map(PathBuf::from);
    let settings = Settings::resolve(path.as_deref(), preset);

    log::info!(
        "Block Devourer (headless) seed {} difficulty {}",
        seed,
        settings.difficulty.as_str()
    );

    let mut game = Game::new(settings, seed);
    let mut outcome = None;

    while outcome.is_none() && game.state().time_ticks < TICK_LIMIT {
        game.set_keys(autopilot(game.state()));
        for event in game.update(SIM_DT) {
            match event {
                GameEvent::ScoreChanged { score } => log::debug!("score {}", score),
                GameEvent::TimeChanged { remaining } => log::info!("time {}", remaining),
                GameEvent::MatchEnded { reason, score } => outcome = Some((reason, score)),
            }
        }
    }

    match outcome {
        Some((reason, score)) => {
            let label = match reason {
                EndReason::Devoured => "Devoured",
                EndReason::TimeUp => "Time up",
            };
            println!(
                "{}! Final score {} after {} ticks ({} expansions)",
                label,
                score,
                game.state().time_ticks,
                game.state().world.expansions
            );
        }
        None => println!("Stopped after {} ticks", game.state().time_ticks),
    }
}

/// Steer toward the nearest edible block and away from threats
fn autopilot(state: &GameState) -> KeyState {
    let player = &state.player;
    let center = player.center();
    let threshold = state.settings.absorb_threshold;
    let sight = state.camera.visible_radius();

    let mut pull = Vec2::ZERO;
    let mut best = f32::MAX;
    let mut push = Vec2::ZERO;

    for (_, e) in state.enemies.iter_alive() {
        let delta = e.center() - center;
        let dist = delta.length();
        if dist <= f32::EPSILON || dist > sight {
            continue;
        }
        if e.size * threshold > player.size && player.size * threshold > e.size {
            continue;
        }
        if e.size > player.size {
            push -= delta / dist * (sight / dist);
        } else if dist < best {
            best = dist;
            pull = delta / dist;
        }
    }
    if best == f32::MAX {
        for (_, p) in state.particles.iter_alive() {
            let delta = p.center() - center;
            let dist = delta.length();
            if dist > f32::EPSILON && dist < best {
                best = dist;
                pull = delta / dist;
            }
        }
    }

    let dir = pull + push;
    let dead_zone = 0.3 * dir.length();
    KeyState {
        up: dir.y < -dead_zone,
        down: dir.y > dead_zone,
        left: dir.x < -dead_zone,
        right: dir.x > dead_zone,
    }
}
