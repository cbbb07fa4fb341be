//! Platform abstraction layer
//!
//! Maps host input to [`Command`]s and provides browser-only backends:
//! - Key codes and pointer taps
//! - Web Audio output (wasm32)

#[cfg(target_arch = "wasm32")]
pub mod web_audio;

#[cfg(target_arch = "wasm32")]
pub use web_audio::WebAudioSink;

use crate::sim::Command;

/// Map a `KeyboardEvent.code` press or release to a command
pub fn command_for_key(code: &str, pressed: bool) -> Option<Command> {
    match (code, pressed) {
        ("Space", true) => Some(Command::Start),
        ("ArrowUp", true) => Some(Command::Jump),
        ("ArrowDown", true) => Some(Command::DuckHold),
        ("ArrowDown", false) => Some(Command::DuckRelease),
        _ => None,
    }
}

/// A click or touch acts like Space
pub fn command_for_tap() -> Command {
    Command::Start
}

/// Whether the browser default for this key should be suppressed (page scroll)
pub fn suppress_default(code: &str) -> bool {
    matches!(code, "Space" | "ArrowUp" | "ArrowDown")
}
