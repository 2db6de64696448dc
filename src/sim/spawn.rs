//! Enemy, power-up and star field spawning

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, PowerUp, Star};
use crate::consts::*;
use crate::ms_to_ticks;
use crate::tuning::{ENEMY_TEMPLATES, POWERUP_DROP, POWERUP_PAYLOADS, enemy_hp};

/// Spawn interval for the current score, in milliseconds.
///
/// Shrinks linearly with score down to a floor.
pub fn spawn_interval_ms(score: u64) -> u32 {
    let reduction = score.saturating_mul(SPAWN_INTERVAL_PER_POINT_MS as u64);
    let interval = (SPAWN_INTERVAL_BASE_MS as u64).saturating_sub(reduction);
    interval.max(SPAWN_INTERVAL_FLOOR_MS as u64) as u32
}

/// Spawn interval for the current score, in simulation steps
pub fn spawn_interval_ticks(score: u64) -> u32 {
    ms_to_ticks(spawn_interval_ms(score))
}

/// Roll a new enemy above the visible field
pub fn spawn_enemy(rng: &mut impl Rng, id: u32, field_w: f32) -> Enemy {
    let size = ENEMY_MIN_SIZE + rng.random::<f32>() * ENEMY_SIZE_RANGE;
    let x = rng.random::<f32>() * (field_w - size).max(0.0);
    let y = -size - rng.random::<f32>() * ENEMY_SPAWN_DEPTH;
    let wobble_phase = rng.random::<f32>() * std::f32::consts::TAU;
    let template = ENEMY_TEMPLATES.pick(rng);
    let hp = enemy_hp(size, &template);
    let jitter = rng.random::<f32>() * 2.0 * ENEMY_SPEED_JITTER - ENEMY_SPEED_JITTER;
    let speed = template.speed + jitter;

    Enemy {
        id,
        pos: Vec2::new(x, y),
        size: Vec2::splat(size),
        speed,
        hp,
        kind: template.kind,
        alive: true,
        wobble_phase,
    }
}

/// Maybe drop a power-up centred on a destroyed enemy
pub fn roll_powerup_drop(rng: &mut impl Rng, enemy: &Enemy) -> Option<PowerUp> {
    if !POWERUP_DROP.pick(rng) {
        return None;
    }
    let kind = POWERUP_PAYLOADS.pick(rng);
    let pos = enemy.center() - Vec2::splat(POWERUP_SIZE / 2.0);
    Some(PowerUp::new(pos, kind))
}

/// Populate the background star field for a field size
pub fn generate_stars(rng: &mut impl Rng, field_w: f32, field_h: f32) -> Vec<Star> {
    let count = ((field_w * field_h) / STAR_AREA_PER_STAR).floor().max(0.0) as usize;
    (0..count)
        .map(|_| Star {
            pos: Vec2::new(rng.random::<f32>() * field_w, rng.random::<f32>() * field_h),
            radius: rng.random::<f32>() * 1.8 + 0.2,
            speed: rng.random::<f32>() * 30.0 + 20.0,
        })
        .collect()
}
