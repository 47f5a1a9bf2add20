//! Threaded fixed-rate game loop
//!
//! INIT -> RUNNING -> (collisions, update, draw, present, pace)* -> FINISHED | STOPPED
//!
//! The loop thread is the only owner of the [`GameState`]. Enemy AI workers
//! and outside callers reach it through the intent inbox.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Instant;

use super::pacer::{Pacer, PacingStats};
use crate::consts::MAX_PRESENT_ATTEMPTS;
use crate::error::ConfigError;
use crate::renderer::{Frame, PresentStatus, Surface};
use crate::settings::GameConfig;
use crate::sim::{
    AiWorker, Autopilot, EnemyAi, Entity, GamePhase, GameState, IntentInbox, IntentSender,
    TickReport, tick,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Built, not yet running
    Init,
    Running,
    /// The match reached a terminal phase
    Finished,
    /// Stopped from outside before the match ended
    Stopped,
}

/// What a run of the loop achieved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub ticks: u64,
    pub pacing: PacingStats,
    /// Frames abandoned after repeated content loss
    pub frames_dropped: u64,
    pub state: LoopState,
    pub phase: GamePhase,
    pub enemies_left: usize,
}

pub struct GameEngine<S: Surface> {
    state: GameState,
    surface: S,
    frame: Frame,
    pacer: Pacer,
    inbox: IntentInbox,
    workers: Vec<AiWorker>,
    config: GameConfig,
    loop_state: LoopState,
    frames_dropped: u64,
}

impl<S: Surface> GameEngine<S> {
    /// Build the match and bind it to a surface. Frames are drawn at the
    /// surface resolution.
    pub fn new(config: GameConfig, surface: S) -> Result<Self, ConfigError> {
        let state = GameState::new(&config)?;
        let resolution = surface.resolution();
        if resolution != config.resolution {
            log::warn!(
                "Surface resolution {} differs from play field {}",
                resolution,
                config.resolution
            );
        }

        Ok(Self {
            state,
            surface,
            frame: Frame::new(resolution),
            pacer: Pacer::new(config.frame_interval()),
            inbox: IntentInbox::new(),
            workers: Vec::new(),
            config,
            loop_state: LoopState::Init,
            frames_dropped: 0,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Post intents for any tank; applied at the next tick
    pub fn intent_sender(&self) -> IntentSender {
        self.inbox.sender()
    }

    pub fn loop_state(&self) -> LoopState {
        self.loop_state
    }

    pub fn pacing(&self) -> PacingStats {
        self.pacer.stats()
    }

    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Number of enemy AI workers alive
    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// One AI worker per enemy tank. A worker that fails to spawn leaves its
    /// tank idle.
    pub fn spawn_workers(&mut self) {
        let interval = self.config.enemy_think_interval();
        for enemy in self.state.enemy_tanks() {
            let id = enemy.id();
            if self.workers.iter().any(|w| w.tank() == id) {
                continue;
            }
            let ai = EnemyAi::new(
                id,
                self.config.seed.wrapping_add(u64::from(id)),
                enemy.direction(),
                self.config.enemy_fire_chance,
            );
            match AiWorker::spawn(ai, self.inbox.sender(), interval) {
                Ok(worker) => self.workers.push(worker),
                Err(e) => log::error!("Failed to spawn AI for enemy {}: {}", id, e),
            }
        }
    }

    /// Single tick: drain intents, simulate, then draw and present
    pub fn run_tick(&mut self) -> TickReport {
        let mut intents = self.inbox.drain();
        if self.config.autopilot {
            intents.extend(Autopilot::decide(&self.state));
        }

        let report = tick(&mut self.state, &intents);
        self.reap_workers();
        self.present();
        report
    }

    /// Stop workers whose tank is gone
    fn reap_workers(&mut self) {
        let enemies = &self.state.enemies;
        self.workers.retain(|worker| enemies.contains(worker.tank()));
    }

    /// Draw and present, redrawing while the surface reports lost contents
    fn present(&mut self) -> bool {
        for attempt in 1..=MAX_PRESENT_ATTEMPTS {
            self.state.draw(&mut self.frame);
            match self.surface.present(&self.frame) {
                PresentStatus::Presented => return true,
                PresentStatus::ContentsLost => {
                    log::debug!("Surface contents lost, redrawing (attempt {})", attempt);
                }
            }
        }
        self.frames_dropped += 1;
        log::warn!("Dropped frame after {} lost presents", MAX_PRESENT_ATTEMPTS);
        false
    }

    /// Run until the match finishes or `stop` fires. A disconnected stop
    /// channel counts as a stop.
    pub fn run(&mut self, stop: &Receiver<()>) -> RunSummary {
        self.spawn_workers();
        self.loop_state = LoopState::Running;
        log::info!(
            "Game loop running: {} enemies at {:?} per tick",
            self.state.enemies.len(),
            self.pacer.target()
        );

        let start_tick = self.state.time_ticks;
        loop {
            let started = Instant::now();
            self.run_tick();
            let sleep = self.pacer.record(started.elapsed());

            if self.state.is_finished() {
                self.loop_state = LoopState::Finished;
                break;
            }
            match stop.recv_timeout(sleep) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    self.loop_state = LoopState::Stopped;
                    break;
                }
            }
        }

        self.workers.clear();
        let summary = RunSummary {
            ticks: self.state.time_ticks - start_tick,
            pacing: self.pacer.stats(),
            frames_dropped: self.frames_dropped,
            state: self.loop_state,
            phase: self.state.phase,
            enemies_left: self.state.enemies.len(),
        };
        log::info!(
            "Game loop {:?} after {} ticks ({:?}, {} enemies left)",
            summary.state,
            summary.ticks,
            summary.phase,
            summary.enemies_left
        );
        summary
    }

    /// Run the loop on its own thread
    pub fn start(mut self) -> std::io::Result<EngineHandle<S>>
    where
        S: Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel();
        let intents = self.intent_sender();
        let join = thread::Builder::new()
            .name("game-loop".to_string())
            .spawn(move || {
                let summary = self.run(&stop_rx);
                (summary, self)
            })?;
        Ok(EngineHandle {
            stop_tx,
            join,
            intents,
        })
    }
}

/// Control side of a started engine
pub struct EngineHandle<S: Surface> {
    stop_tx: Sender<()>,
    join: JoinHandle<(RunSummary, GameEngine<S>)>,
    intents: IntentSender,
}

impl<S: Surface> EngineHandle<S> {
    /// Ask the loop to stop; it wakes from its pacing sleep immediately
    pub fn stop(&self) {
        if self.stop_tx.send(()).is_err() {
            log::debug!("Game loop already exited, stop ignored");
        }
    }

    /// The loop thread has exited
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    pub fn intent_sender(&self) -> IntentSender {
        self.intents.clone()
    }

    /// Wait for the loop and get the engine back
    pub fn join(self) -> thread::Result<(RunSummary, GameEngine<S>)> {
        self.join.join()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HeadlessSurface;
    use crate::sim::{Action, Direction, Intent};
    use glam::{IVec2, UVec2};
    use std::time::Duration;

    fn engine(config: GameConfig) -> GameEngine<HeadlessSurface> {
        let surface = HeadlessSurface::new(config.resolution);
        GameEngine::new(config, surface).unwrap()
    }

    fn small_config(enemies: usize) -> GameConfig {
        let mut config = GameConfig::with_enemy_row(UVec2::new(400, 300), enemies);
        config.frame_rate = 200;
        config.enemy_think_ms = 5;
        config
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = small_config(1);
        config.tank_size = 0;
        let surface = HeadlessSurface::new(config.resolution);
        assert!(GameEngine::new(config, surface).is_err());
    }

    #[test]
    fn test_run_tick_presents_one_frame() {
        let mut engine = engine(small_config(2));
        let report = engine.run_tick();
        assert_eq!(report.tick, 1);
        assert_eq!(engine.surface().presented(), 1);
        assert_eq!(engine.surface().last_frame().len(), 400 * 300 * 4);
        assert_eq!(engine.loop_state(), LoopState::Init);
    }

    #[test]
    fn test_contents_lost_redraws_and_presents_again() {
        let mut engine = engine(small_config(2));
        engine.surface_mut().lose_contents(2);
        engine.run_tick();
        assert_eq!(engine.surface().lost(), 2);
        assert_eq!(engine.surface().presented(), 1);
        assert_eq!(engine.frames_dropped(), 0);
    }

    #[test]
    fn test_frame_dropped_after_max_attempts() {
        let mut engine = engine(small_config(2));
        engine.surface_mut().lose_contents(MAX_PRESENT_ATTEMPTS);
        engine.run_tick();
        assert_eq!(engine.surface().presented(), 0);
        assert_eq!(engine.frames_dropped(), 1);

        engine.run_tick();
        assert_eq!(engine.surface().presented(), 1);
    }

    #[test]
    fn test_intents_from_sender_applied_next_tick() {
        let mut engine = engine(small_config(1));
        let player = engine.state().player_id().unwrap();
        let start = engine.state().player_tank().unwrap().pos();
        engine
            .intent_sender()
            .send(Intent::new(player, Action::Move(Direction::Down)))
            .unwrap();
        engine.run_tick();
        assert_eq!(engine.state().player_tank().unwrap().pos(), start + IVec2::new(0, 5));
    }

    #[test]
    fn test_run_without_enemies_finishes_immediately() {
        let mut engine = engine(small_config(0));
        let (_stop_tx, stop_rx) = mpsc::channel();
        let summary = engine.run(&stop_rx);
        assert_eq!(summary.ticks, 1);
        assert_eq!(summary.state, LoopState::Finished);
        assert_eq!(summary.phase, GamePhase::Victory);
        assert_eq!(summary.enemies_left, 0);
    }

    #[test]
    fn test_autopilot_wins_a_duel() {
        let mut config = small_config(1);
        config.enemies[0].position = IVec2::new(100, 40);
        config.player.position = IVec2::new(200, 200);
        config.autopilot = true;
        let mut engine = engine(config);
        for _ in 0..200 {
            engine.run_tick();
            if engine.state().is_finished() {
                break;
            }
        }
        assert_eq!(engine.state().phase, GamePhase::Victory);
    }

    #[test]
    fn test_workers_spawned_and_reaped() {
        let mut config = small_config(1);
        config.enemies[0].position = IVec2::new(100, 40);
        config.player.position = IVec2::new(100, 200);
        let mut engine = engine(config);
        engine.spawn_workers();
        assert_eq!(engine.worker_count(), 1);

        let enemy = engine.state().enemy_tanks()[0].id();
        let grid = &mut engine.state.grid;
        let removed = engine.state.enemies.remove(enemy);
        assert!(removed.is_some());
        if let Some(mut tank) = removed {
            tank.destroy(grid);
        }
        engine.run_tick();
        assert_eq!(engine.worker_count(), 0);
    }

    #[test]
    fn test_stop_after_loop_exit_is_harmless() {
        let handle = engine(small_config(0)).start().unwrap();
        while !handle.is_finished() {
            thread::sleep(Duration::from_millis(1));
        }
        handle.stop();
        let (summary, _) = handle.join().unwrap();
        assert_eq!(summary.state, LoopState::Finished);
    }

    #[test]
    fn test_start_and_stop() {
        let engine = engine(small_config(2));
        let handle = engine.start().unwrap();
        thread::sleep(Duration::from_millis(30));
        handle.stop();
        let (summary, engine) = handle.join().unwrap();
        assert_eq!(summary.state, LoopState::Stopped);
        assert!(summary.ticks >= 1);
        assert_eq!(engine.loop_state(), LoopState::Stopped);
        assert_eq!(engine.worker_count(), 0);
        assert_eq!(engine.surface().presented(), summary.ticks);
    }
}
