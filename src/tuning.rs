//! Data-driven game balance
//!
//! Every random choice the simulation makes goes through one of the tables
//! here, so tuning values can be checked without running a session.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::sim::weapon::WeaponKind;

/// A table of `(weight, value)` entries sampled proportionally to weight
#[derive(Debug, Clone, Copy)]
pub struct WeightedTable<T: 'static> {
    entries: &'static [(u32, T)],
}

impl<T: Copy> WeightedTable<T> {
    pub const fn new(entries: &'static [(u32, T)]) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &'static [(u32, T)] {
        self.entries
    }

    pub fn total_weight(&self) -> u32 {
        self.entries.iter().map(|(w, _)| *w).sum()
    }

    /// Pick the entry whose cumulative weight range contains `roll`.
    ///
    /// `roll` is taken modulo the total weight.
    pub fn pick_with_roll(&self, roll: u32) -> T {
        let total = self.total_weight().max(1);
        let mut remaining = roll % total;
        for &(weight, value) in self.entries {
            if remaining < weight {
                return value;
            }
            remaining -= weight;
        }
        // Zero-weight tail; fall back to the last entry
        self.entries[self.entries.len() - 1].1
    }

    pub fn pick(&self, rng: &mut impl Rng) -> T {
        let total = self.total_weight().max(1);
        self.pick_with_roll(rng.random_range(0..total))
    }
}

/// Enemy archetype: colour plus speed and hit-point multipliers
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyTemplate {
    pub kind: EnemyKind,
    /// Base descent speed (pixels/sec)
    pub speed: f32,
    /// Hit-point multiplier applied to the size-based base
    pub hp_mul: f32,
}

impl EnemyTemplate {
    const fn new(kind: EnemyKind, speed: f32, hp_mul: f32) -> Self {
        Self {
            kind,
            speed,
            hp_mul,
        }
    }
}

/// Enemy colour/type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Fast
    Green,
    /// Standard
    Red,
    /// Heavy armour
    Purple,
    /// Agile
    Yellow,
    /// Balanced
    Cyan,
}

impl EnemyKind {
    /// Fill colour (linear RGBA)
    pub fn color(&self) -> [f32; 4] {
        match self {
            EnemyKind::Green => [0.416, 1.0, 0.561, 1.0],
            EnemyKind::Red => [1.0, 0.420, 0.420, 1.0],
            EnemyKind::Purple => [0.757, 0.486, 1.0, 1.0],
            EnemyKind::Yellow => [1.0, 0.820, 0.400, 1.0],
            EnemyKind::Cyan => [0.467, 0.800, 1.0, 1.0],
        }
    }
}

/// The five enemy templates, equally weighted
pub const ENEMY_TEMPLATES: WeightedTable<EnemyTemplate> = WeightedTable::new(&[
    (1, EnemyTemplate::new(EnemyKind::Green, 120.0, 0.8)),
    (1, EnemyTemplate::new(EnemyKind::Red, 90.0, 1.0)),
    (1, EnemyTemplate::new(EnemyKind::Purple, 70.0, 1.6)),
    (1, EnemyTemplate::new(EnemyKind::Yellow, 100.0, 1.2)),
    (1, EnemyTemplate::new(EnemyKind::Cyan, 85.0, 1.3)),
]);

/// Weapon payload of a dropped power-up
pub const POWERUP_PAYLOADS: WeightedTable<WeaponKind> = WeightedTable::new(&[
    (15, WeaponKind::Laser),
    (30, WeaponKind::Spread),
    (25, WeaponKind::Rocket),
    (30, WeaponKind::Plasma),
]);

/// Whether a killed enemy drops a power-up (25%)
pub const POWERUP_DROP: WeightedTable<bool> = WeightedTable::new(&[(1, true), (3, false)]);

/// Base hit points before the template multiplier
pub fn base_hp_for_size(size: f32) -> f32 {
    if size > crate::consts::ENEMY_HEAVY_SIZE { 3.0 } else { 2.0 }
}

/// Spawned hit points: `max(1, round(base * mul))`
pub fn enemy_hp(size: f32, template: &EnemyTemplate) -> f32 {
    (base_hp_for_size(size) * template.hp_mul).round().max(1.0)
}
