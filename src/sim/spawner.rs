//! Procedural obstacle generation
//!
//! The draw is a pure function of the RNG state so a seed fully determines the
//! sequence of kinds and gaps.

use rand::Rng;
use rand_pcg::Pcg32;

use super::config::RunnerConfig;
use super::state::{GameState, Obstacle, ObstacleKind};

/// Outcome of one spawn draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnDecision {
    pub kind: ObstacleKind,
    /// Countdown until the following spawn
    pub gap: f32,
}

/// Draw the next obstacle kind and gap, returning the advanced RNG
pub fn next_spawn(mut rng: Pcg32, config: &RunnerConfig) -> (SpawnDecision, Pcg32) {
    let kind = ObstacleKind::ALL[rng.random_range(0..ObstacleKind::ALL.len())];
    let o = &config.obstacles;
    // Unvalidated configs may carry the bounds swapped
    let (low, high) = (o.min_gap.min(o.max_gap), o.min_gap.max(o.max_gap));
    let gap = rng.random_range(low..=high);
    (SpawnDecision { kind, gap }, rng)
}

/// Scroll, prune and spawn obstacles for one tick
pub fn update_obstacles(state: &mut GameState) {
    let speed = state.speed;
    state.obstacles.retain_mut(|obstacle| {
        obstacle.pos.x -= speed;
        !obstacle.is_off_screen()
    });

    state.distance_to_next_spawn -= speed;
    if state.distance_to_next_spawn <= 0.0 {
        let (decision, rng) = next_spawn(state.spawn_rng.clone(), &state.config);
        state.spawn_rng = rng;
        state
            .obstacles
            .push(Obstacle::new(decision.kind, state.config.field.width, &state.config));
        state.distance_to_next_spawn = decision.gap;
        log::debug!(
            "Spawned {:?} at tick {}, next in {:.0}px",
            decision.kind,
            state.ticks,
            decision.gap
        );
    }
}
