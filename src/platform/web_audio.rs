//! Web Audio backend
//!
//! Procedurally generated cues, no sample files.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::audio::{AudioSink, Cue};

/// Oscillator-based sink. Silently does nothing if no context could be made.
pub struct WebAudioSink {
    ctx: Option<AudioContext>,
}

impl Default for WebAudioSink {
    fn default() -> Self {
        Self::new()
    }
}

impl WebAudioSink {
    pub fn new() -> Self {
        // May fail outside a secure context
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self { ctx }
    }

    /// Oscillator routed through a gain node to the output
    fn voice(
        ctx: &AudioContext,
        freq: f32,
        osc_type: OscillatorType,
    ) -> Option<(OscillatorNode, GainNode)> {
        let osc = ctx.create_oscillator().ok()?;
        let gain = ctx.create_gain().ok()?;

        osc.set_type(osc_type);
        osc.frequency().set_value(freq);
        osc.connect_with_audio_node(&gain).ok()?;
        gain.connect_with_audio_node(&ctx.destination()).ok()?;

        Some((osc, gain))
    }

    /// Pitch sweep with an exponential fade
    fn sweep(
        ctx: &AudioContext,
        vol: f32,
        osc_type: OscillatorType,
        from_hz: f32,
        to_hz: f32,
        duration: f64,
        start_offset: f64,
    ) {
        let Some((osc, gain)) = Self::voice(ctx, from_hz, osc_type) else {
            return;
        };
        let t = ctx.current_time() + start_offset;

        gain.gain().set_value_at_time(vol, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + duration)
            .ok();
        osc.frequency().set_value_at_time(from_hz, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(to_hz, t + duration)
            .ok();

        osc.start_with_when(t).ok();
        osc.stop_with_when(t + duration + 0.02).ok();
    }

    /// Jump - short rising chirp
    fn play_jump(ctx: &AudioContext, vol: f32) {
        Self::sweep(ctx, vol, OscillatorType::Square, 300.0, 600.0, 0.1, 0.0);
    }

    /// Score - two quick rising blips
    fn play_score(ctx: &AudioContext, vol: f32) {
        Self::sweep(ctx, vol, OscillatorType::Sine, 660.0, 660.0, 0.08, 0.0);
        Self::sweep(ctx, vol, OscillatorType::Sine, 880.0, 880.0, 0.1, 0.09);
    }

    /// Hit - low falling buzz
    fn play_hit(ctx: &AudioContext, vol: f32) {
        Self::sweep(ctx, vol, OscillatorType::Sawtooth, 200.0, 50.0, 0.3, 0.0);
    }
}

impl AudioSink for WebAudioSink {
    fn play(&mut self, cue: Cue, volume: f32) {
        let Some(ctx) = &self.ctx else { return };

        // Browsers keep the context suspended until a user gesture
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match cue {
            Cue::Jump => Self::play_jump(ctx, volume),
            Cue::Score => Self::play_score(ctx, volume),
            Cue::Hit => Self::play_hit(ctx, volume),
        }
    }

    fn resume(&mut self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }
}
