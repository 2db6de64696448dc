//! Audio system using Web Audio API
//!
//! Procedurally generated sound effects - no external files needed!
//! The simulation never calls in here; the host maps drained `GameEvent`s
//! to effects. Without Web Audio every call is a no-op.

use crate::sim::{GameEvent, WeaponKind};

/// Gain applied on the master bus when unmuted
pub const DEFAULT_MASTER_VOLUME: f32 = 0.35;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Weapon fired
    Shoot(WeaponKind),
    /// Bullet struck an enemy
    Hit,
    /// Player took damage
    Hurt,
    /// Two-note descending sting
    GameOver,
    /// Power-up collected
    Pickup,
    /// Rocket splash
    Boom,
    /// Plasma chain crackle
    Zap,
}

/// Which effect, if any, an event should sound
pub fn sound_for_event(event: GameEvent) -> Option<SoundEffect> {
    match event {
        GameEvent::Shot(kind) => Some(SoundEffect::Shoot(kind)),
        GameEvent::EnemyHit | GameEvent::EnemyDestroyed => Some(SoundEffect::Hit),
        GameEvent::Splash => Some(SoundEffect::Boom),
        GameEvent::ChainZap => Some(SoundEffect::Zap),
        GameEvent::PowerUpCollected(_) => Some(SoundEffect::Pickup),
        GameEvent::PlayerHurt => Some(SoundEffect::Hurt),
        GameEvent::GameOver => Some(SoundEffect::GameOver),
        GameEvent::WeaponExpired => None,
    }
}

/// Oscillator shapes used by the tone generator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Sawtooth,
}

/// One enveloped oscillator note with a linear pitch slide
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub wave: Waveform,
    pub start_freq: f32,
    pub end_freq: f32,
    /// Slide length (s)
    pub duration: f64,
    pub attack: f64,
    pub release: f64,
    /// Peak gain before the master bus
    pub volume: f32,
    /// Cents
    pub detune: f32,
    /// Offset from "now" (s)
    pub delay: f64,
}

impl Tone {
    const fn new(wave: Waveform, start_freq: f32, end_freq: f32, duration: f64) -> Self {
        Self {
            wave,
            start_freq,
            end_freq,
            duration,
            attack: 0.005,
            release: 0.08,
            volume: 1.0,
            detune: 0.0,
            delay: 0.0,
        }
    }

    const fn env(mut self, attack: f64, release: f64) -> Self {
        self.attack = attack;
        self.release = release;
        self
    }

    const fn vol(mut self, volume: f32) -> Self {
        self.volume = volume;
        self
    }

    /// Seconds from start until the oscillator can be stopped
    pub fn total_length(&self) -> f64 {
        self.duration + self.release + 0.01
    }
}

/// Tonal notes for an effect. `Zap` is noise-based and has none.
pub fn tones(effect: SoundEffect) -> Vec<Tone> {
    use Waveform::*;
    match effect {
        SoundEffect::Shoot(WeaponKind::Laser) => {
            vec![Tone::new(Sine, 1200.0, 1000.0, 0.06).env(0.002, 0.05).vol(0.35)]
        }
        SoundEffect::Shoot(WeaponKind::Spread) => {
            vec![Tone::new(Triangle, 900.0, 700.0, 0.07).env(0.003, 0.06).vol(0.4)]
        }
        SoundEffect::Shoot(WeaponKind::Rocket) => {
            vec![Tone::new(Sawtooth, 300.0, 260.0, 0.12).env(0.006, 0.1).vol(0.32)]
        }
        SoundEffect::Shoot(WeaponKind::Plasma) => {
            vec![Tone::new(Sine, 700.0, 600.0, 0.08).env(0.004, 0.07).vol(0.38)]
        }
        SoundEffect::Shoot(WeaponKind::Normal) => {
            vec![Tone::new(Sine, 850.0, 720.0, 0.06).env(0.003, 0.05).vol(0.35)]
        }
        SoundEffect::Hit => vec![Tone::new(Sine, 600.0, 420.0, 0.09).env(0.004, 0.08)],
        SoundEffect::Hurt => {
            let mut t = Tone::new(Sawtooth, 300.0, 180.0, 0.14).env(0.006, 0.12);
            t.detune = -10.0;
            vec![t]
        }
        SoundEffect::GameOver => {
            let mut second = Tone::new(Sine, 360.0, 240.0, 0.22).env(0.01, 0.16);
            second.delay = 0.12;
            vec![Tone::new(Sine, 520.0, 380.0, 0.18).env(0.01, 0.12), second]
        }
        SoundEffect::Pickup => {
            vec![Tone::new(Triangle, 700.0, 1000.0, 0.12).env(0.005, 0.08).vol(0.6)]
        }
        SoundEffect::Boom => {
            vec![Tone::new(Sine, 220.0, 140.0, 0.18).env(0.008, 0.18).vol(0.45)]
        }
        SoundEffect::Zap => Vec::new(),
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(not(target_arch = "wasm32"))]
pub use native::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioBuffer, AudioContext, BiquadFilterType, GainNode, OscillatorNode, OscillatorType,
    };

    use super::{DEFAULT_MASTER_VOLUME, SoundEffect, Tone, Waveform, sound_for_event, tones};
    use crate::sim::GameEvent;

    /// Length of the zap noise burst (s)
    const ZAP_NOISE_SECS: f32 = 0.08;

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master: Option<GainNode>,
        noise: Option<AudioBuffer>,
        master_volume: f32,
        muted: bool,
    }

    impl AudioManager {
        /// Nothing is created until `unlock`; browsers only allow audio
        /// after a user gesture.
        pub fn new(master_volume: f32, muted: bool) -> Self {
            Self {
                ctx: None,
                master: None,
                noise: None,
                master_volume: master_volume.clamp(0.0, 1.0),
                muted,
            }
        }

        /// Create the context and master bus on first call (from a gesture
        /// handler). Resumes a suspended context on later calls.
        pub fn unlock(&mut self) {
            if let Some(ctx) = &self.ctx {
                if ctx.state() == web_sys::AudioContextState::Suspended {
                    let _ = ctx.resume();
                }
                return;
            }

            let Ok(ctx) = AudioContext::new() else {
                log::warn!("Failed to create AudioContext - audio disabled");
                return;
            };
            let master = ctx.create_gain().ok().and_then(|g| {
                g.connect_with_audio_node(&ctx.destination()).ok()?;
                Some(g)
            });
            if master.is_none() {
                log::warn!("Failed to create master gain - audio disabled");
                return;
            }
            self.ctx = Some(ctx);
            self.master = master;
            self.apply_master_gain();
            log::info!("Audio unlocked");
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            self.apply_master_gain();
        }

        /// Flip mute. Returns the new state.
        pub fn toggle_muted(&mut self) -> bool {
            self.set_muted(!self.muted);
            self.muted
        }

        fn apply_master_gain(&self) {
            if let Some(master) = &self.master {
                let v = if self.muted { 0.0 } else { self.master_volume };
                master.gain().set_value(v);
            }
        }

        /// Play the cue for every event that has one
        pub fn play_events(&mut self, events: &[GameEvent]) {
            for &event in events {
                if let Some(effect) = sound_for_event(event) {
                    self.play(effect);
                }
            }
        }

        /// Play a sound effect
        pub fn play(&mut self, effect: SoundEffect) {
            if self.muted || self.ctx.is_none() {
                return;
            }
            if effect == SoundEffect::Zap {
                self.play_zap();
                return;
            }
            for tone in tones(effect) {
                self.play_tone(&tone);
            }
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope routed to the master bus
        fn create_osc(&self, wave: Waveform) -> Option<(OscillatorNode, GainNode)> {
            let ctx = self.ctx.as_ref()?;
            let master = self.master.as_ref()?;
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(match wave {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Triangle => OscillatorType::Triangle,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
            });
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(master).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, tone: &Tone) {
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = self.create_osc(tone.wave) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;

            osc.frequency().set_value_at_time(tone.start_freq, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(tone.end_freq, t + tone.duration)
                .ok();
            if tone.detune != 0.0 {
                osc.detune().set_value_at_time(tone.detune, t).ok();
            }

            gain.gain().set_value_at_time(0.0, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(tone.volume, t + tone.attack)
                .ok();
            gain.gain()
                .linear_ramp_to_value_at_time(0.0, t + tone.duration + tone.release)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(t + tone.total_length()).ok();
        }

        /// Rising noise ramp, built once and reused
        fn noise_buffer(&mut self) -> Option<AudioBuffer> {
            if let Some(buf) = &self.noise {
                return Some(buf.clone());
            }
            let ctx = self.ctx.as_ref()?;
            let rate = ctx.sample_rate();
            let len = (rate * ZAP_NOISE_SECS) as u32;
            let buf = ctx.create_buffer(1, len.max(1), rate).ok()?;
            let mut data: Vec<f32> = (0..len)
                .map(|i| (rand::random::<f32>() * 2.0 - 1.0) * (i as f32 / len as f32))
                .collect();
            buf.copy_to_channel(&mut data, 0).ok()?;
            self.noise = Some(buf.clone());
            Some(buf)
        }

        /// Band-passed noise crackle plus a falling sine
        fn play_zap(&mut self) {
            let Some(noise) = self.noise_buffer() else {
                return;
            };
            let (Some(ctx), Some(master)) = (&self.ctx, &self.master) else {
                return;
            };
            let t = ctx.current_time();

            let crackle = (|| {
                let src = ctx.create_buffer_source().ok()?;
                src.set_buffer(Some(&noise));
                let bp = ctx.create_biquad_filter().ok()?;
                bp.set_type(BiquadFilterType::Bandpass);
                bp.frequency().set_value_at_time(2200.0, t).ok()?;
                bp.q().set_value_at_time(6.0, t).ok()?;
                let g = ctx.create_gain().ok()?;
                g.gain().set_value_at_time(0.0, t).ok()?;
                g.gain().linear_ramp_to_value_at_time(0.45, t + 0.01).ok()?;
                g.gain().linear_ramp_to_value_at_time(0.0, t + 0.1).ok()?;

                src.connect_with_audio_node(&bp).ok()?;
                bp.connect_with_audio_node(&g).ok()?;
                g.connect_with_audio_node(master).ok()?;
                src.start_with_when(t).ok()?;
                src.stop_with_when(t + 0.12).ok()
            })();
            if crackle.is_none() {
                log::debug!("Zap noise unavailable");
            }

            if let Some((osc, gain)) = self.create_osc(Waveform::Sine) {
                osc.frequency().set_value_at_time(1400.0, t).ok();
                osc.frequency()
                    .exponential_ramp_to_value_at_time(800.0, t + 0.11)
                    .ok();
                gain.gain().set_value_at_time(0.15, t).ok();
                gain.gain().linear_ramp_to_value_at_time(0.0, t + 0.12).ok();
                osc.start_with_when(t).ok();
                osc.stop_with_when(t + 0.13).ok();
            }
        }
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(DEFAULT_MASTER_VOLUME, false)
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use super::{DEFAULT_MASTER_VOLUME, SoundEffect, sound_for_event};
    use crate::sim::GameEvent;

    /// Silent stand-in with the same surface as the browser manager.
    /// Counts what would have played.
    #[derive(Debug)]
    pub struct AudioManager {
        master_volume: f32,
        muted: bool,
        played: usize,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new(DEFAULT_MASTER_VOLUME, false)
        }
    }

    impl AudioManager {
        pub fn new(master_volume: f32, muted: bool) -> Self {
            Self {
                master_volume: master_volume.clamp(0.0, 1.0),
                muted,
                played: 0,
            }
        }

        pub fn unlock(&mut self) {}

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        pub fn toggle_muted(&mut self) -> bool {
            self.muted = !self.muted;
            self.muted
        }

        pub fn play_events(&mut self, events: &[GameEvent]) {
            for &event in events {
                if let Some(effect) = sound_for_event(event) {
                    self.play(effect);
                }
            }
        }

        pub fn play(&mut self, _effect: SoundEffect) {
            if !self.muted && self.master_volume > 0.0 {
                self.played += 1;
            }
        }

        /// Effects that would have been audible so far
        pub fn played(&self) -> usize {
            self.played
        }
    }
}
