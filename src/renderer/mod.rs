//! Rendering
//!
//! Renderers receive a read-only [`Snapshot`] once per frame and draw it.
//! They never touch engine state.

pub mod ascii;
#[cfg(target_arch = "wasm32")]
pub mod canvas;

pub use ascii::AsciiRenderer;
#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use crate::sim::{Character, Cloud, GamePhase, GameState, Obstacle, RunnerConfig};

/// Borrowed view of everything a frame needs
#[derive(Debug, Clone)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    /// Floored score
    pub score: u64,
    pub high_score: u64,
    pub speed: f32,
    pub run: u32,
    pub character: &'a Character,
    pub obstacles: &'a [Obstacle],
    pub clouds: &'a [Cloud],
    pub ground_offset: f32,
    pub config: &'a RunnerConfig,
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            phase: state.phase,
            score: state.score_floor(),
            high_score: state.high_score,
            speed: state.speed,
            run: state.run,
            character: &state.character,
            obstacles: &state.obstacles,
            clouds: &state.clouds,
            ground_offset: state.ground_offset,
            config: &state.config,
        }
    }
}

/// Frame consumer
pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot<'_>);
}

/// Renderer that draws nothing
#[derive(Debug, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _snapshot: &Snapshot<'_>) {}
}
