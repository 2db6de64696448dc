//! Fixed-step frame clock
//!
//! Turns irregular animation-frame timestamps into a whole number of
//! simulation steps. Leftover time carries over to the next frame.

use crate::consts::{MAX_FRAME_DELTA_MS, SIM_DT_MS};

/// Accumulates real elapsed time and drains it in `SIM_DT_MS` quanta
#[derive(Debug, Clone, Default)]
pub struct FixedStepClock {
    last_ms: Option<f64>,
    accumulator_ms: f64,
}

impl FixedStepClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a frame timestamp (ms). Returns how many steps to run.
    ///
    /// The first call after construction or `reset_baseline` only records
    /// the timestamp. A single frame contributes at most
    /// `MAX_FRAME_DELTA_MS`.
    pub fn advance(&mut self, now_ms: f64) -> u32 {
        let Some(last) = self.last_ms.replace(now_ms) else {
            return 0;
        };
        let delta = (now_ms - last).clamp(0.0, MAX_FRAME_DELTA_MS);
        self.accumulator_ms += delta;

        let mut steps = 0;
        while self.accumulator_ms >= SIM_DT_MS {
            self.accumulator_ms -= SIM_DT_MS;
            steps += 1;
        }
        steps
    }

    /// Forget the previous timestamp so time spent paused is not replayed
    pub fn reset_baseline(&mut self) {
        self.last_ms = None;
        self.accumulator_ms = 0.0;
    }
}
