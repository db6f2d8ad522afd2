//! Audio system using Web Audio API
//!
//! Procedurally generated 8-bit style sound effects - no external files
//! needed. The engine drone is a persistent looping voice whose pitch
//! follows the current scroll speed.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

use crate::sim::EngineRate;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Bullet fired
    Bullet,
    /// Plane or enemy explosion
    Explosion,
    /// Preload screen jingle
    GameStart,
    /// Finish line reached
    Winner,
    /// Out of lives
    GameOver,
}

/// Base frequency of the engine drone at normal rate
const ENGINE_BASE_HZ: f32 = 75.0;

/// The persistent engine voice
struct EngineVoice {
    osc: OscillatorNode,
    gain: GainNode,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    engine: Option<EngineVoice>,
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
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            engine: None,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        if let Some(engine) = &self.engine {
            let vol = if muted { 0.0 } else { self.effective_volume() * 0.2 };
            engine.gain.gain().set_value(vol);
        }
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Start the looping engine drone if it isn't already playing
    pub fn start_engine(&mut self) {
        if self.engine.is_some() {
            return;
        }
        let Some(ctx) = &self.ctx else { return };
        let Some((osc, gain)) = self.create_osc(ctx, ENGINE_BASE_HZ, OscillatorType::Sawtooth)
        else {
            return;
        };
        gain.gain().set_value(self.effective_volume() * 0.2);
        if osc.start().is_ok() {
            self.engine = Some(EngineVoice { osc, gain });
        }
    }

    /// Stop the engine drone (leaving the Play screen)
    pub fn stop_engine(&mut self) {
        if let Some(engine) = self.engine.take() {
            let _ = engine.osc.stop();
        }
    }

    /// Match the engine pitch to the current scroll speed
    pub fn set_engine_rate(&self, rate: EngineRate) {
        let Some(ctx) = &self.ctx else { return };
        if let Some(engine) = &self.engine {
            let t = ctx.current_time();
            let _ = engine
                .osc
                .frequency()
                .linear_ramp_to_value_at_time(ENGINE_BASE_HZ * rate.rate(), t + 0.1);
        }
    }

    /// Play a sound effect
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume context if suspended (browsers require user gesture)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Bullet => self.play_bullet(ctx, vol),
            SoundEffect::Explosion => self.play_explosion(ctx, vol),
            SoundEffect::GameStart => self.play_game_start(ctx, vol),
            SoundEffect::Winner => self.play_winner(ctx, vol),
            SoundEffect::GameOver => self.play_game_over(ctx, vol),
        }
    }

    // === Sound generators ===

    /// Create an oscillator with gain envelope
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

    /// Bullet - short rising chirp
    fn play_bullet(&self, ctx: &AudioContext, vol: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 800.0, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();

        gain.gain().set_value_at_time(vol * 0.25, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + 0.08)
            .ok();
        osc.frequency().set_value_at_time(800.0, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(1600.0, t + 0.06)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + 0.1).ok();
    }

    /// Explosion - noise-ish rumble with a bass thump
    fn play_explosion(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();

        // Crackle: fast frequency jumps on a sawtooth
        if let Some((osc, gain)) = self.create_osc(ctx, 120.0, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.35)
                .ok();
            osc.frequency().set_value_at_time(120.0, t).ok();
            osc.frequency().set_value_at_time(900.0, t + 0.02).ok();
            osc.frequency().set_value_at_time(200.0, t + 0.05).ok();
            osc.frequency().set_value_at_time(700.0, t + 0.08).ok();
            osc.frequency().set_value_at_time(90.0, t + 0.12).ok();
            osc.frequency().set_value_at_time(400.0, t + 0.18).ok();
            osc.frequency().set_value_at_time(60.0, t + 0.25).ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.4).ok();
        }

        // Bass thump
        if let Some((osc, gain)) = self.create_osc(ctx, 70.0, OscillatorType::Sine) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.25)
                .ok();
            osc.frequency().set_value_at_time(70.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(35.0, t + 0.2)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.3).ok();
        }
    }

    /// Game start - rising three-note arpeggio
    fn play_game_start(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [440.0, 554.0, 659.0].iter().enumerate() {
            let start = t + i as f64 * 0.12;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.2, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.1)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.12).ok();
            }
        }
    }

    /// Winner - triumphant ascending run
    fn play_winner(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [523.0, 659.0, 784.0, 1046.0].iter().enumerate() {
            let start = t + i as f64 * 0.15;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                gain.gain().set_value_at_time(vol * 0.3, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.25)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.3).ok();
            }
        }
    }

    /// Game over - descending minor phrase
    fn play_game_over(&self, ctx: &AudioContext, vol: f32) {
        let t = ctx.current_time();
        for (i, freq) in [392.0, 330.0, 262.0, 196.0].iter().enumerate() {
            let start = t + i as f64 * 0.2;
            if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Square) {
                gain.gain().set_value_at_time(vol * 0.25, start).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, start + 0.3)
                    .ok();
                osc.start_with_when(start).ok();
                osc.stop_with_when(start + 0.35).ok();
            }
        }
    }
}
