//! Dino Runner - side-scrolling runner engine core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, spawning, collisions, game state)
//! - `engine`: Fixed-step loop driver and collaborator dispatch
//! - `renderer`: Read-only snapshot consumers
//! - `platform`: Browser/native platform abstraction
//! - `persistence`: Durable key-value storage
//! - `audio`: Fire-and-forget sound cues

pub mod audio;
pub mod engine;
pub mod highscores;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use audio::{AudioManager, AudioSink, Cue};
pub use engine::Engine;
pub use highscores::HighScoreRecord;
pub use persistence::{KeyValueStore, MemoryStore, StoreError};
pub use renderer::{Renderer, Snapshot};
pub use sim::{Command, GamePhase, GameState, RunnerConfig};

/// Loop driver constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz)
    pub const TICK_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will account for (tab switches, breakpoints)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Number of background clouds kept alive
    pub const CLOUD_COUNT: usize = 5;
}
