//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable (insertion) iteration order for obstacles
//! - No rendering, audio or storage dependencies

pub mod autopilot;
pub mod collision;
pub mod config;
pub mod spawner;
pub mod state;
pub mod tick;

pub use autopilot::autopilot;
pub use collision::{Aabb, character_hitbox, find_collision, obstacle_hitbox};
pub use config::{CharacterConfig, ConfigError, ModeProfile, RunnerConfig};
pub use spawner::{SpawnDecision, next_spawn};
pub use state::{
    Character, CharacterMode, Cloud, GamePhase, GameState, Obstacle, ObstacleKind, SCORE_SCALE,
};
pub use tick::{Command, GameEvent, TickInput, end_run, handle_command, tick};
