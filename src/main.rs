//! Space Shooter headless runner
//!
//! Drives the simulation without a window: an autopilot turns toward the
//! nearest asteroid and holds fire, events are logged, and the session is
//! restarted once after the first game over.
//!
//! Usage: `space-shooter [CONFIG.json|-] [TICKS] [SEED]`
//!        `space-shooter --print-config` dumps the built-in config as JSON

use std::process::ExitCode;

use glam::Vec2;

use space_shooter::GameConfig;
use space_shooter::consts::NOMINAL_DT;
use space_shooter::sim::{Aabb, GameEvent, GamePhase, GameState, TickInput, Viewport, aabb_overlap, step};

const VIEWPORT: Viewport = Viewport {
    width: 1280.0,
    height: 720.0,
};
const DEFAULT_TICKS: u64 = 10_000;
/// Half size of the box around the ship the autopilot keeps clear
const DANGER_HALF_EXTENT: f32 = 150.0;

struct Args {
    config: Option<String>,
    ticks: u64,
    seed: u64,
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let config = args.next().filter(|a| a != "-");
    let ticks = match args.next() {
        Some(t) => t.parse().map_err(|e| format!("invalid tick count {t:?}: {e}"))?,
        None => DEFAULT_TICKS,
    };
    let seed = match args.next() {
        Some(s) => s.parse().map_err(|e| format!("invalid seed {s:?}: {e}"))?,
        None => rand::random(),
    };
    Ok(Args { config, ticks, seed })
}

/// Aim at the closest live asteroid, firing whenever one is on screen
fn autopilot(state: &GameState) -> TickInput {
    let Some(ship) = state.registry.ship() else {
        return TickInput::default();
    };
    let live: Vec<_> = state
        .registry
        .asteroids()
        .into_iter()
        .filter(|a| !a.is_destroyed() && VIEWPORT.contains(a.pos))
        .collect();
    let target = live
        .iter()
        .map(|a| a.pos)
        .min_by(|a, b| a.distance_squared(ship.pos).total_cmp(&b.distance_squared(ship.pos)));

    let danger = Aabb::from_center(ship.pos, Vec2::splat(DANGER_HALF_EXTENT));
    let threatened = live.iter().any(|a| aabb_overlap(a.hit_circle().bounds(), danger));

    match target {
        Some(pointer) => TickInput {
            fire_primary: true,
            // Back away from anything that gets close
            move_down: threatened,
            pointer: Some(pointer),
            ..Default::default()
        },
        None => TickInput {
            pointer: Some(ship.pos + Vec2::new(0.0, -100.0)),
            ..Default::default()
        },
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if std::env::args().nth(1).as_deref() == Some("--print-config") {
        return match GameConfig::default().to_json_pretty() {
            Ok(json) => {
                println!("{json}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("Failed to serialize config: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let args = match parse_args() {
        Ok(args) => args,
        Err(e) => {
            log::error!("{e}");
            return ExitCode::FAILURE;
        }
    };

    let config = match &args.config {
        Some(path) => match GameConfig::load(path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => GameConfig::default(),
    };

    log::info!("Space Shooter (headless) starting...");
    let mut state = match GameState::new(config, args.seed) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Invalid config: {e}");
            return ExitCode::FAILURE;
        }
    };
    state.start(VIEWPORT);

    let mut restarted = false;
    for _ in 0..args.ticks {
        let input = autopilot(&state);
        step(&mut state, &input, NOMINAL_DT, VIEWPORT);

        for event in state.drain_events() {
            match event {
                GameEvent::GameOverShown { score } => log::info!("Final score: {score}"),
                other => log::debug!("{other:?}"),
            }
        }
        // Bolts have no renderer here; just acknowledge them
        state.take_unrendered_projectiles();

        if state.phase() == GamePhase::GameOver {
            if restarted {
                break;
            }
            restarted = state.restart(VIEWPORT);
        }
    }

    log::info!(
        "Finished after {} ticks in phase {:?} with score {}",
        state.time_ticks,
        state.phase(),
        state.score()
    );
    println!("{}", state.score());
    ExitCode::SUCCESS
}
