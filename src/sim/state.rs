//! Game state and core simulation types
//!
//! Everything the tick mutates lives in [`GameState`]. Entities are plain data
//! with small helpers; orchestration happens in `tick`.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::config::{CharacterConfig, CloudConfig, RunnerConfig};
use crate::consts::CLOUD_COUNT;

/// Score is kept as fixed-point thousandths so floor/multiple checks are exact
pub const SCORE_SCALE: u64 = 1000;

/// Salt separating the cloud stream from the spawn stream
const CLOUD_STREAM_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Title screen, waiting for a start command
    Menu,
    /// Active run
    Playing,
    /// Run ended, waiting for a start command
    GameOver,
}

/// What the character is doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterMode {
    Running,
    Jumping,
    Ducking,
    /// Terminal for the run
    Dead,
}

/// The player character
#[derive(Debug, Clone, PartialEq)]
pub struct Character {
    pub x: f32,
    /// Top of the sprite (screen space, y grows downward)
    pub y: f32,
    /// Vertical velocity in pixels per tick (negative = up)
    pub vy: f32,
    pub mode: CharacterMode,
    pub animation_frame: u32,
    pub animation_elapsed_ms: f32,
}

impl Character {
    /// A grounded, running character
    pub fn new(config: &CharacterConfig) -> Self {
        Self {
            x: config.x,
            y: config.ground_y,
            vy: 0.0,
            mode: CharacterMode::Running,
            animation_frame: 0,
            animation_elapsed_ms: 0.0,
        }
    }

    /// Switch mode, restarting the animation cycle if it changed
    pub fn set_mode(&mut self, mode: CharacterMode) {
        if self.mode != mode {
            self.mode = mode;
            self.animation_frame = 0;
            self.animation_elapsed_ms = 0.0;
        }
    }

    pub fn is_grounded(&self, config: &CharacterConfig) -> bool {
        self.y >= config.ground_y
    }

    /// Sprite height for the current mode
    pub fn height(&self, config: &CharacterConfig) -> f32 {
        config.profile(self.mode).height
    }

    /// Launch upward if standing on the ground. Returns whether the jump happened.
    pub fn try_jump(&mut self, config: &CharacterConfig) -> bool {
        if self.mode == CharacterMode::Dead || !self.is_grounded(config) {
            return false;
        }
        self.vy = config.jump_impulse;
        self.set_mode(CharacterMode::Jumping);
        true
    }

    /// Crouch if standing on the ground. Returns whether the duck happened.
    pub fn try_duck(&mut self, config: &CharacterConfig) -> bool {
        if self.mode == CharacterMode::Dead || !self.is_grounded(config) {
            return false;
        }
        self.set_mode(CharacterMode::Ducking);
        true
    }

    /// Gravity, integration and ground clamp for one tick
    pub fn apply_physics(&mut self, config: &CharacterConfig) {
        self.vy = (self.vy + config.gravity).min(config.max_fall_speed);
        self.y += self.vy;

        if self.y >= config.ground_y {
            self.y = config.ground_y;
            self.vy = 0.0;
            if self.mode == CharacterMode::Jumping {
                self.set_mode(CharacterMode::Running);
            }
        }
    }

    /// Advance the sprite frame by `dt_ms` of elapsed time
    pub fn advance_animation(&mut self, dt_ms: f32, config: &CharacterConfig) {
        let profile = config.profile(self.mode);
        if profile.frame_ms <= 0.0 {
            return;
        }
        self.animation_elapsed_ms += dt_ms;
        if self.animation_elapsed_ms >= profile.frame_ms {
            self.animation_elapsed_ms = 0.0;
            self.animation_frame = (self.animation_frame + 1) % profile.frames.max(1);
        }
    }
}

/// Obstacle variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    CactusSmall,
    CactusLarge,
    BirdHigh,
    BirdLow,
}

impl ObstacleKind {
    /// All kinds, in draw order for uniform selection
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::CactusSmall,
        ObstacleKind::CactusLarge,
        ObstacleKind::BirdHigh,
        ObstacleKind::BirdLow,
    ];

    pub fn is_bird(&self) -> bool {
        matches!(self, ObstacleKind::BirdHigh | ObstacleKind::BirdLow)
    }
}

/// A scrolling obstacle
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Obstacle {
    /// Create an obstacle of `kind` with its left edge at `x`
    pub fn new(kind: ObstacleKind, x: f32, config: &RunnerConfig) -> Self {
        let (size, y) = config.obstacle_geometry(kind);
        Self {
            kind,
            pos: Vec2::new(x, y),
            size,
        }
    }

    /// True once the right edge has left the field
    pub fn is_off_screen(&self) -> bool {
        self.pos.x + self.size.x <= 0.0
    }
}

/// Decorative background cloud
#[derive(Debug, Clone, PartialEq)]
pub struct Cloud {
    pub pos: Vec2,
    pub speed: f32,
}

impl Cloud {
    /// A cloud at `x` with random altitude and drift speed
    pub fn random(rng: &mut Pcg32, x: f32, config: &CloudConfig) -> Self {
        Self {
            pos: Vec2::new(x, config.min_y + rng.random::<f32>() * config.y_range),
            speed: config.min_speed + rng.random::<f32>() * config.speed_range,
        }
    }
}

/// Complete game state for one play session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub config: RunnerConfig,
    pub phase: GamePhase,
    /// Fixed-point score, see [`SCORE_SCALE`]
    pub score_units: u64,
    pub high_score: u64,
    pub speed: f32,
    /// Rendering-only scroll offset for the ground texture
    pub ground_offset: f32,
    /// Scrolled distance left before the next obstacle appears
    pub distance_to_next_spawn: f32,
    pub character: Character,
    /// Live obstacles in spawn order
    pub obstacles: Vec<Obstacle>,
    pub clouds: Vec<Cloud>,
    /// Number of runs started this session
    pub run: u32,
    /// Ticks simulated in the current run
    pub ticks: u64,
    pub spawn_rng: Pcg32,
    pub cloud_rng: Pcg32,
}

impl GameState {
    /// Create a new session in the menu phase
    pub fn new(config: RunnerConfig, seed: u64, high_score: u64) -> Self {
        let mut cloud_rng = Pcg32::seed_from_u64(seed ^ CLOUD_STREAM_SALT);
        let clouds = (0..CLOUD_COUNT)
            .map(|_| {
                let x = cloud_rng.random::<f32>() * config.field.width;
                Cloud::random(&mut cloud_rng, x, &config.clouds)
            })
            .collect();

        Self {
            seed,
            phase: GamePhase::Menu,
            score_units: 0,
            high_score,
            speed: config.difficulty.initial_speed,
            ground_offset: 0.0,
            distance_to_next_spawn: config.obstacles.min_gap,
            character: Character::new(&config.character),
            obstacles: Vec::new(),
            clouds,
            run: 0,
            ticks: 0,
            spawn_rng: Pcg32::seed_from_u64(seed),
            cloud_rng,
            config,
        }
    }

    /// Current score as a real number
    pub fn score(&self) -> f64 {
        self.score_units as f64 / SCORE_SCALE as f64
    }

    /// Current score rounded down
    pub fn score_floor(&self) -> u64 {
        self.score_units / SCORE_SCALE
    }

    /// Fixed-point score gained per tick
    pub fn score_step_units(&self) -> u64 {
        (self.config.difficulty.score_per_tick * SCORE_SCALE as f64).round() as u64
    }

    /// Reset everything a run owns and enter the playing phase
    pub fn start_run(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Playing;
        self.run += 1;
    }

    /// Drop back to the menu with a clean run (high score and clouds survive)
    pub fn return_to_menu(&mut self) {
        self.reset_run();
        self.phase = GamePhase::Menu;
    }

    fn reset_run(&mut self) {
        self.score_units = 0;
        self.speed = self.config.difficulty.initial_speed;
        self.ground_offset = 0.0;
        self.character = Character::new(&self.config.character);
        self.obstacles.clear();
        self.distance_to_next_spawn = self.config.obstacles.min_gap;
        self.ticks = 0;
    }
}
