//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame timing (fixed-step accumulator)
//! - Input events (key mapping, held state, touch tracking)

pub mod input;
pub mod time;

pub use input::{InputState, KeyAction, key_action};
pub use time::FixedStepClock;
