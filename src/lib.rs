//! Nova Strike - A vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, spawning, collisions, weapons)
//! - `renderer`: WebGPU rendering pipeline and procedural vector shapes
//! - `platform`: Browser/native platform abstraction (input, frame clock)
//! - `audio`: Synthesized sound cues driven by simulation events
//! - `tuning`: Data-driven game balance (weighted tables)
//! - `ui`: HUD text and overlay state

pub mod audio;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use error::StartupError;
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (steps per second)
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / SIM_HZ as f64;
    /// Largest real frame delta fed to the accumulator (ms)
    pub const MAX_FRAME_DELTA_MS: f64 = 250.0;

    /// Player ship defaults
    pub const PLAYER_SIZE: f32 = 36.0;
    pub const PLAYER_SPEED: f32 = 360.0;
    pub const PLAYER_BOTTOM_MARGIN: f32 = 20.0;
    pub const PLAYER_LIVES: u8 = 3;
    pub const INVINCIBILITY_MS: u32 = 1500;

    /// Timed weapon duration after a pickup
    pub const WEAPON_DURATION_MS: u32 = 10_000;

    /// Enemy spawn cadence: interval = max(FLOOR, BASE - score * PER_POINT)
    pub const SPAWN_INTERVAL_BASE_MS: u32 = 900;
    pub const SPAWN_INTERVAL_FLOOR_MS: u32 = 280;
    pub const SPAWN_INTERVAL_PER_POINT_MS: u32 = 2;

    /// Enemy geometry
    pub const ENEMY_MIN_SIZE: f32 = 26.0;
    pub const ENEMY_SIZE_RANGE: f32 = 22.0;
    pub const ENEMY_HEAVY_SIZE: f32 = 40.0;
    pub const ENEMY_SPEED_JITTER: f32 = 15.0;
    pub const ENEMY_SPAWN_DEPTH: f32 = 100.0;
    /// Lateral wobble amplitude, pixels per step
    pub const ENEMY_WOBBLE: f32 = 0.6;
    /// Enemies are culled this far below the field
    pub const ENEMY_CULL_MARGIN: f32 = 40.0;

    /// Points per enemy destroyed
    pub const SCORE_PER_KILL: u64 = 10;

    /// Power-up defaults
    pub const POWERUP_SIZE: f32 = 18.0;
    pub const POWERUP_FALL_SPEED: f32 = 120.0;
    pub const POWERUP_SWAY: f32 = 0.6;
    pub const POWERUP_SWAY_PERIOD_MS: f32 = 250.0;
    pub const POWERUP_CULL_MARGIN: f32 = 20.0;

    /// Bullets leaving the sides by more than this are culled
    pub const BULLET_SIDE_MARGIN: f32 = 20.0;

    /// Rocket splash
    pub const SPLASH_DAMAGE: f32 = 2.0;
    pub const EXPLOSION_LIFE_MS: f32 = 220.0;

    /// Plasma chain
    pub const CHAIN_RANGE: f32 = 120.0;
    pub const CHAIN_MAX_TARGETS: usize = 3;
    pub const CHAIN_DAMAGE: f32 = 1.5;
    pub const ARC_LIFE_MS: f32 = 120.0;

    /// One star per this many square pixels of field
    pub const STAR_AREA_PER_STAR: f32 = 12_000.0;
}

/// Convert a millisecond duration to whole simulation steps, rounding up.
///
/// A timer decremented once per step reaches zero on the same step the
/// equivalent millisecond countdown would cross zero.
#[inline]
pub const fn ms_to_ticks(ms: u32) -> u32 {
    (ms * consts::SIM_HZ).div_ceil(1000)
}
