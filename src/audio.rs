//! Audio cues using Web Audio API
//!
//! Procedurally generated - no sound sheet to download.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::AudioCue;

/// Shine pad fade-in time (seconds)
const SHINE_FADE_IN: f64 = 2.0;
/// Shine pad fade-out time (seconds)
const SHINE_FADE_OUT: f64 = 0.3;
/// Shine pad level relative to effect volume
const SHINE_LEVEL: f32 = 0.3;

/// Audio manager for the clicker
pub struct AudioManager {
    ctx: Option<AudioContext>,
    volume: f32,
    /// Running shine pad oscillators and their shared gain
    shine: Option<(Vec<OscillatorNode>, GainNode)>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        // Try to create audio context (may fail if not in secure context)
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            volume: 0.8,
            shine: None,
        }
    }

    /// Set effect volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
    }

    /// Play a cue
    pub fn play(&mut self, cue: AudioCue) {
        let Some(ctx) = self.ctx.clone() else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        // Stopping must work even at zero volume
        if cue == AudioCue::ShineStop {
            self.stop_shine(&ctx);
            return;
        }

        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }

        match cue {
            AudioCue::Tap => self.play_tap(&ctx, vol),
            AudioCue::Crack => self.play_crack(&ctx, vol),
            AudioCue::Rarity(tier) => self.play_rarity(&ctx, vol, tier),
            AudioCue::ShineStart => self.start_shine(&ctx, vol),
            AudioCue::ShineStop => {}
        }
    }

    // === Sound generators ===

    /// Create an oscillator routed through a gain node to the speakers
    fn create_osc(
        &self,
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

    /// Tap - short wooden knock
    fn play_tap(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 700.0, OscillatorType::Triangle) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.06)
            .ok();
        osc.frequency().set_value_at_time(700.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(300.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.08).ok();
    }

    /// Crack - shell splitting, noisy sweep over a thump
    fn play_crack(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        if let Some((osc, gain)) = self.create_osc(ctx, 2500.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.3, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.2)
                .ok();
            osc.frequency().set_value_at_time(2500.0, t).ok();
            osc.frequency().set_value_at_time(300.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(1800.0, t + 0.04).ok();
            osc.frequency().set_value_at_time(200.0, t + 0.07).ok();
            osc.frequency().set_value_at_time(1200.0, t + 0.1).ok();
            osc.frequency().set_value_at_time(100.0, t + 0.14).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.22).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }

    /// Rarity jingle - one more rising note per tier
    fn play_rarity(&self, ctx: &AudioContext, vol: f32, tier: u32) {
        const SCALE: [f32; 8] = [523.0, 659.0, 784.0, 1047.0, 1319.0, 1568.0, 2093.0, 2637.0];
        let notes = (tier as usize + 2).min(SCALE.len());
        for (i, freq) in SCALE.iter().take(notes).enumerate() {
            let delay = i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                let t = ctx.current_time() + delay;
                gain.gain().set_value_at_time(vol * 0.3, t).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                    .ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.5).ok();
            }
        }
    }

    /// Shine - soft looping pad, fades in
    fn start_shine(&mut self, ctx: &AudioContext, vol: f32) {
        self.stop_shine(ctx);

        let Ok(gain) = ctx.create_gain() else { return };
        if gain.connect_with_audio_node(&ctx.destination()).is_err() {
            return;
        }
        let t = ctx.current_time();
        gain.gain().set_value_at_time(0.0, t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(vol * SHINE_LEVEL, t + SHINE_FADE_IN)
            .ok();

        let mut oscs = Vec::new();
        for freq in [880.0, 1320.0, 1760.5] {
            let Ok(osc) = ctx.create_oscillator() else { continue };
            osc.set_type(OscillatorType::Sine);
            osc.frequency().set_value(freq);
            if osc.connect_with_audio_node(&gain).is_ok() {
                osc.start().ok();
                oscs.push(osc);
            }
        }
        self.shine = Some((oscs, gain));
    }

    /// Fade the shine pad out and stop it
    fn stop_shine(&mut self, ctx: &AudioContext) {
        let Some((oscs, gain)) = self.shine.take() else { return };
        let t = ctx.current_time();
        gain.gain().cancel_scheduled_values(t).ok();
        gain.gain().set_value_at_time(gain.gain().value(), t).ok();
        gain.gain()
            .linear_ramp_to_value_at_time(0.0, t + SHINE_FADE_OUT)
            .ok();
        for osc in oscs {
            osc.stop_with_when(t + SHINE_FADE_OUT).ok();
        }
    }
}
