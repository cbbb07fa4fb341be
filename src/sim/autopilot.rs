//! Demo-mode player
//!
//! Starts runs and jumps over approaching cacti. Birds are left alone: the
//! low and high flight lanes both clear a running character.

use super::collision::{character_hitbox, obstacle_hitbox};
use super::state::{GamePhase, GameState};
use super::tick::Command;

/// Jump once the gap to the next cactus is within this many ticks of travel
const JUMP_LEAD_TICKS: f32 = 10.0;

/// Pick the command the demo player would issue this tick, if any
pub fn autopilot(state: &GameState) -> Option<Command> {
    match state.phase {
        GamePhase::Menu | GamePhase::GameOver => Some(Command::Start),
        GamePhase::Playing => {
            if !state.character.is_grounded(&state.config.character) {
                return None;
            }
            let reach = character_hitbox(&state.character, &state.config).max.x;
            let lead = state.speed * JUMP_LEAD_TICKS;
            let threat = state
                .obstacles
                .iter()
                .filter(|o| !o.kind.is_bird())
                .map(|o| obstacle_hitbox(o, &state.config).min.x - reach)
                .any(|gap| gap > 0.0 && gap <= lead);
            threat.then_some(Command::Jump)
        }
    }
}
