//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers counted in whole steps
//! - No rendering or platform dependencies

pub mod collision;
pub mod combat;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod weapon;

pub use collision::Rect;
pub use state::{
    Bullet, ChainArc, Enemy, Explosion, GameEvent, GamePhase, GameState, Player, PowerUp, Star,
    fade,
};
pub use tick::{TickInput, tick, toggle_pause};
pub use weapon::{WeaponKind, WeaponState};
