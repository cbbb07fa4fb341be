//! Sound cues
//!
//! The engine fires named cues at a relative volume and never waits on or
//! hears back from the backend. Backends swallow their own failures.

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cue {
    /// Character left the ground
    Jump,
    /// Score milestone reached
    Score,
    /// Character hit an obstacle
    Hit,
}

impl Cue {
    /// Stable cue id
    pub fn id(&self) -> &'static str {
        match self {
            Cue::Jump => "jump",
            Cue::Score => "score",
            Cue::Hit => "hit",
        }
    }

    /// Relative volume the cue is mixed at
    pub fn default_volume(&self) -> f32 {
        match self {
            Cue::Jump => 0.3,
            Cue::Score => 0.2,
            Cue::Hit => 0.5,
        }
    }
}

/// Fire-and-forget audio backend
pub trait AudioSink {
    /// Play `cue` at `volume` in [0, 1]. Must not block or panic.
    fn play(&mut self, cue: Cue, volume: f32);

    /// Unlock output after a user gesture (browsers start suspended)
    fn resume(&mut self) {}
}

/// Backend that drops every cue
#[derive(Debug, Default)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, _cue: Cue, _volume: f32) {}
}

/// Backend that only logs cues (headless native runs)
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, cue: Cue, volume: f32) {
        log::debug!("cue {} @ {:.2}", cue.id(), volume);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    master_volume: f32,
    muted: bool,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>) -> Self {
        Self {
            sink,
            master_volume: 1.0,
            muted: false,
        }
    }

    /// Manager that plays nothing
    pub fn silent() -> Self {
        Self::new(Box::new(NullSink))
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn master_volume(&self) -> f32 {
        self.master_volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.master_volume }
    }

    pub fn resume(&mut self) {
        self.sink.resume();
    }

    /// Play a cue at its default mix level
    pub fn play(&mut self, cue: Cue) {
        let vol = (cue.default_volume() * self.effective_volume()).clamp(0.0, 1.0);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(cue, vol);
    }
}
