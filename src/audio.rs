//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed. Audio is
//! strictly best-effort: a missing or blocked AudioContext disables sound
//! without touching gameplay. The context is explicit state with a defined
//! init (construction) and teardown (`close`), not an ambient singleton.

use crate::sim::GameEvent;

#[cfg(target_arch = "wasm32")]
use web_sys::{AudioContext, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player left the ground
    Jump,
    /// Player touched down
    Land,
    /// Power-up collected
    Pickup,
    /// A timed power ran out
    PowerExpired,
    /// Obstacle contact cost a life
    Hit,
    /// Shield soaked a hit
    ShieldAbsorb,
    /// Pusher shove
    Knockback,
    /// Player dropped off the course
    Fall,
    /// Finish line crossed
    Win,
    /// Out of lives
    GameOver,
}

impl SoundEffect {
    /// Which sound a simulation event makes, if any
    pub fn for_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::Jumped => Some(SoundEffect::Jump),
            GameEvent::Landed => Some(SoundEffect::Land),
            GameEvent::Collected(_) => Some(SoundEffect::Pickup),
            GameEvent::PowerExpired(_) => Some(SoundEffect::PowerExpired),
            GameEvent::Hit => Some(SoundEffect::Hit),
            GameEvent::ShieldAbsorbed => Some(SoundEffect::ShieldAbsorb),
            GameEvent::Knocked => Some(SoundEffect::Knockback),
            GameEvent::Fell => Some(SoundEffect::Fall),
            GameEvent::Won => Some(SoundEffect::Win),
            GameEvent::Lost => Some(SoundEffect::GameOver),
        }
    }
}

/// Audio manager for the game
pub struct AudioManager {
    #[cfg(target_arch = "wasm32")]
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            // May fail outside a secure context; sound is then disabled
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.8,
                sfx_volume: 1.0,
                muted: false,
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Explicit teardown at session/page end
    pub fn close(&mut self) {
        #[cfg(target_arch = "wasm32")]
        if let Some(ctx) = self.ctx.take() {
            let _ = ctx.close();
        }
    }

    /// Resume the audio context (required after a user gesture)
    pub fn resume(&self) {
        #[cfg(target_arch = "wasm32")]
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
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_muted(&mut self) {
        self.muted = !self.muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play every sound a batch of tick events calls for
    pub fn play_events(&self, events: &[GameEvent]) {
        for event in events {
            if let Some(effect) = SoundEffect::for_event(*event) {
                self.play(effect);
            }
        }
    }

    /// Play a sound effect
    #[cfg(target_arch = "wasm32")]
    pub fn play(&self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        // Resume if suspended (browsers require a user gesture first)
        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Jump => {
                self.tone(ctx, 440.0, 0.0, 0.1, OscillatorType::Sine, 0.08 * vol);
                self.tone(ctx, 660.0, 0.05, 0.08, OscillatorType::Sine, 0.06 * vol);
            }
            SoundEffect::Land => {
                self.tone(ctx, 220.0, 0.0, 0.06, OscillatorType::Triangle, 0.05 * vol);
            }
            SoundEffect::Pickup => {
                self.tone(ctx, 523.0, 0.0, 0.1, OscillatorType::Sine, 0.08 * vol);
                self.tone(ctx, 659.0, 0.1, 0.1, OscillatorType::Sine, 0.08 * vol);
                self.tone(ctx, 784.0, 0.2, 0.15, OscillatorType::Sine, 0.08 * vol);
            }
            SoundEffect::PowerExpired => {
                self.tone(ctx, 400.0, 0.0, 0.1, OscillatorType::Sine, 0.05 * vol);
                self.tone(ctx, 300.0, 0.1, 0.12, OscillatorType::Sine, 0.05 * vol);
            }
            SoundEffect::Hit => {
                self.tone(ctx, 150.0, 0.0, 0.2, OscillatorType::Sawtooth, 0.1 * vol);
                self.tone(ctx, 100.0, 0.05, 0.15, OscillatorType::Square, 0.08 * vol);
            }
            SoundEffect::ShieldAbsorb => {
                self.tone(ctx, 880.0, 0.0, 0.08, OscillatorType::Triangle, 0.08 * vol);
                self.tone(ctx, 660.0, 0.06, 0.1, OscillatorType::Triangle, 0.06 * vol);
            }
            SoundEffect::Knockback => {
                self.tone(ctx, 250.0, 0.0, 0.08, OscillatorType::Square, 0.06 * vol);
            }
            SoundEffect::Fall => {
                // Descending whistle
                self.tone(ctx, 600.0, 0.0, 0.1, OscillatorType::Sine, 0.08 * vol);
                self.tone(ctx, 450.0, 0.1, 0.1, OscillatorType::Sine, 0.08 * vol);
                self.tone(ctx, 300.0, 0.2, 0.2, OscillatorType::Sine, 0.08 * vol);
            }
            SoundEffect::Win => {
                self.tone(ctx, 523.0, 0.0, 0.12, OscillatorType::Sine, 0.12 * vol);
                self.tone(ctx, 659.0, 0.1, 0.12, OscillatorType::Sine, 0.12 * vol);
                self.tone(ctx, 784.0, 0.2, 0.12, OscillatorType::Sine, 0.12 * vol);
                self.tone(ctx, 1047.0, 0.3, 0.25, OscillatorType::Sine, 0.15 * vol);
            }
            SoundEffect::GameOver => {
                self.tone(ctx, 300.0, 0.0, 0.2, OscillatorType::Sawtooth, 0.1 * vol);
                self.tone(ctx, 200.0, 0.2, 0.25, OscillatorType::Sawtooth, 0.1 * vol);
                self.tone(ctx, 120.0, 0.45, 0.4, OscillatorType::Sawtooth, 0.1 * vol);
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn play(&self, _effect: SoundEffect) {}

    /// Schedule one oscillator tone `start` seconds from now. Failures are
    /// swallowed; sound must never block gameplay.
    #[cfg(target_arch = "wasm32")]
    fn tone(
        &self,
        ctx: &AudioContext,
        freq: f32,
        start: f64,
        duration: f64,
        shape: OscillatorType,
        volume: f32,
    ) {
        let result: Result<(), wasm_bindgen::JsValue> = (|| {
            let osc = ctx.create_oscillator()?;
            let gain = ctx.create_gain()?;
            osc.connect_with_audio_node(&gain)?;
            gain.connect_with_audio_node(&ctx.destination())?;

            osc.set_type(shape);
            osc.frequency().set_value(freq);

            let t0 = ctx.current_time() + start;
            gain.gain().set_value_at_time(volume, t0)?;
            gain.gain()
                .exponential_ramp_to_value_at_time(0.001, t0 + duration)?;

            osc.start_with_when(t0)?;
            osc.stop_with_when(t0 + duration)?;
            Ok(())
        })();
        if result.is_err() {
            log::debug!("tone scheduling failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::PowerKind;

    #[test]
    fn test_every_event_maps_to_a_sound() {
        let events = [
            GameEvent::Jumped,
            GameEvent::Landed,
            GameEvent::Fell,
            GameEvent::Hit,
            GameEvent::ShieldAbsorbed,
            GameEvent::Knocked,
            GameEvent::Collected(PowerKind::Speed),
            GameEvent::PowerExpired(PowerKind::Freeze),
            GameEvent::Won,
            GameEvent::Lost,
        ];
        for event in events {
            assert!(SoundEffect::for_event(event).is_some());
        }
    }

    #[test]
    fn test_muted_volume_is_zero() {
        let mut audio = AudioManager::new();
        assert!(audio.effective_volume() > 0.0);
        audio.set_muted(true);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.toggle_muted();
        assert!(audio.effective_volume() > 0.0);
    }

    #[test]
    fn test_volumes_clamped() {
        let mut audio = AudioManager::new();
        audio.set_master_volume(5.0);
        audio.set_sfx_volume(-1.0);
        assert_eq!(audio.effective_volume(), 0.0);
        audio.set_sfx_volume(0.5);
        assert_eq!(audio.effective_volume(), 0.5);
    }
}
