//! Tank Fighter entry point
//!
//! Runs a headless match: loads the configuration given as the first
//! argument (defaults otherwise), lets the autopilot drive the player and
//! logs the outcome. `RUST_LOG=info` shows the match events.

use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use tank_fighter::{GameConfig, GameEngine, HeadlessSurface};

/// Stop the match if it has not ended by then
const MATCH_TIME_LIMIT: Duration = Duration::from_secs(120);
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Tank Fighter (headless) starting...");

    let mut config = match std::env::args().nth(1) {
        Some(path) => match GameConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("Failed to load config {}: {}", path, e);
                return ExitCode::FAILURE;
            }
        },
        None => {
            log::warn!("No config file given, using defaults");
            GameConfig::default()
        }
    };
    // Nobody is at the controls in headless mode
    config.autopilot = true;

    let surface = HeadlessSurface::new(config.resolution);
    let engine = match GameEngine::new(config, surface) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let handle = match engine.start() {
        Ok(handle) => handle,
        Err(e) => {
            log::error!("Failed to start game loop: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let deadline = Instant::now() + MATCH_TIME_LIMIT;
    while !handle.is_finished() && Instant::now() < deadline {
        thread::sleep(POLL_INTERVAL);
    }
    if !handle.is_finished() {
        log::warn!("Match still running after {:?}, stopping", MATCH_TIME_LIMIT);
    }
    handle.stop();

    match handle.join() {
        Ok((summary, engine)) => {
            log::info!(
                "{:?}: {:?} after {} ticks, {} enemies left, {} overruns (worst {:?}), {} frames presented",
                summary.state,
                summary.phase,
                summary.ticks,
                summary.enemies_left,
                summary.pacing.overruns,
                summary.pacing.worst_overrun,
                engine.surface().presented()
            );
            ExitCode::SUCCESS
        }
        Err(_) => {
            log::error!("Game loop panicked");
            ExitCode::FAILURE
        }
    }
}
