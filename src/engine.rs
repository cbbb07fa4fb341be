//! Engine loop driver
//!
//! Called once per display refresh. Converts wall-clock time into fixed
//! simulation ticks, routes game events to audio and persistence, then hands a
//! snapshot to the renderer. Commands from input callbacks are applied
//! immediately and never run a tick themselves.

use crate::audio::{AudioManager, Cue};
use crate::consts::{MAX_FRAME_MS, MAX_SUBSTEPS, TICK_MS};
use crate::highscores::HighScoreRecord;
use crate::persistence::KeyValueStore;
use crate::renderer::{Renderer, Snapshot};
use crate::sim::{
    Command, GameEvent, GamePhase, GameState, RunnerConfig, TickInput, autopilot, end_run,
    handle_command, tick,
};

/// Game instance holding all state and collaborators
pub struct Engine {
    state: GameState,
    high_scores: HighScoreRecord,
    audio: AudioManager,
    input: TickInput,
    autopilot: bool,
    running: bool,
    /// Bumped on every start/stop so stale host callbacks can detect it
    epoch: u64,
    last_time_ms: Option<f64>,
    accumulator_ms: f32,
}

impl Engine {
    /// Build a session in the menu phase. The stored high score is read here.
    /// An invalid config is replaced by the defaults.
    pub fn new(
        config: RunnerConfig,
        seed: u64,
        store: Box<dyn KeyValueStore>,
        audio: AudioManager,
    ) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                log::warn!("Invalid runner config ({}); using defaults", e);
                RunnerConfig::default()
            }
        };
        let high_scores = HighScoreRecord::new(store);
        let high_score = high_scores.load();
        log::info!("Engine created (seed {}, high score {})", seed, high_score);
        Self {
            state: GameState::new(config, seed, high_score),
            high_scores,
            audio,
            input: TickInput::default(),
            autopilot: false,
            running: false,
            epoch: 0,
            last_time_ms: None,
            accumulator_ms: 0.0,
        }
    }

    /// Begin accepting frames. No-op while already running; after a stop the
    /// session restarts from the menu. Returns whether a new epoch began, i.e.
    /// whether the host needs to schedule a frame loop.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.state.return_to_menu();
        self.input = TickInput::default();
        self.last_time_ms = None;
        self.accumulator_ms = 0.0;
        self.running = true;
        self.epoch += 1;
        log::info!("Engine started (epoch {})", self.epoch);
        true
    }

    /// Stop accepting frames. No-op while already stopped.
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        self.epoch += 1;
        log::info!("Engine stopped (epoch {})", self.epoch);
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Changes whenever the engine starts or stops
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Apply a player command now. Held-duck tracking is idempotent; only
    /// edges matter.
    pub fn command(&mut self, command: Command) {
        match command {
            Command::DuckHold => self.input.duck_held = true,
            Command::DuckRelease => self.input.duck_held = false,
            Command::Start | Command::Jump => {}
        }
        if !self.running {
            return;
        }
        self.audio.resume();
        if let Some(event) = handle_command(&mut self.state, command) {
            self.dispatch(event);
        }
    }

    /// Advance to host time `now_ms` and render. Returns the number of ticks run.
    pub fn frame(&mut self, now_ms: f64, renderer: &mut dyn Renderer) -> u32 {
        if !self.running {
            return 0;
        }

        let dt = match self.last_time_ms {
            Some(last) => ((now_ms - last) as f32).clamp(0.0, MAX_FRAME_MS),
            None => TICK_MS,
        };
        self.last_time_ms = Some(now_ms);
        self.accumulator_ms += dt;

        let mut substeps = 0;
        while self.accumulator_ms >= TICK_MS && substeps < MAX_SUBSTEPS {
            if self.autopilot {
                if let Some(command) = autopilot(&self.state) {
                    self.command(command);
                }
            }
            for event in tick(&mut self.state, &self.input, TICK_MS) {
                self.dispatch(event);
            }
            self.accumulator_ms -= TICK_MS;
            substeps += 1;
        }

        renderer.render(&self.snapshot());
        substeps
    }

    /// End a run in progress so its score is settled against the high score
    pub fn end_run(&mut self) {
        for event in end_run(&mut self.state) {
            self.dispatch(event);
        }
    }

    /// Headless session: play `frames` frames with the autopilot at the fixed
    /// tick rate, then end whatever run is in progress and stop.
    pub fn play_session(&mut self, frames: u32, renderer: &mut dyn Renderer) {
        self.set_autopilot(true);
        self.start();
        let frame_ms = TICK_MS as f64;
        for frame in 0..frames {
            self.frame(frame as f64 * frame_ms, renderer);
        }
        self.end_run();
        self.stop();
    }

    /// Route a game event to its collaborator
    fn dispatch(&mut self, event: GameEvent) {
        match event {
            GameEvent::RunStarted { .. } => {}
            GameEvent::Jumped => self.audio.play(Cue::Jump),
            GameEvent::ScoreMilestone { .. } => self.audio.play(Cue::Score),
            GameEvent::Hit { .. } => self.audio.play(Cue::Hit),
            GameEvent::NewHighScore { score } => self.high_scores.save(score),
        }
    }

    /// Floored current score
    pub fn score(&self) -> u64 {
        self.state.score_floor()
    }

    pub fn high_score(&self) -> u64 {
        self.state.high_score
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(&self.state)
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
        log::info!("Autopilot: {}", enabled);
    }

    pub fn autopilot_enabled(&self) -> bool {
        self.autopilot
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager {
        &mut self.audio
    }
}
