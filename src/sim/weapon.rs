//! Weapon definitions and fire patterns

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Bullet, Player};
use crate::ms_to_ticks;

/// The five weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WeaponKind {
    #[default]
    Normal,
    Spread,
    Laser,
    Rocket,
    Plasma,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 5] = [
        WeaponKind::Normal,
        WeaponKind::Spread,
        WeaponKind::Laser,
        WeaponKind::Rocket,
        WeaponKind::Plasma,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            WeaponKind::Normal => "Normal",
            WeaponKind::Spread => "Spread",
            WeaponKind::Laser => "Laser",
            WeaponKind::Rocket => "Rocket",
            WeaponKind::Plasma => "Plasma",
        }
    }

    /// Letter shown on the power-up tile
    pub fn glyph(&self) -> char {
        match self {
            WeaponKind::Normal => 'N',
            WeaponKind::Spread => 'S',
            WeaponKind::Laser => 'L',
            WeaponKind::Rocket => 'R',
            WeaponKind::Plasma => 'P',
        }
    }

    pub fn spec(&self) -> &'static WeaponSpec {
        match self {
            WeaponKind::Normal => &NORMAL,
            WeaponKind::Spread => &SPREAD,
            WeaponKind::Laser => &LASER,
            WeaponKind::Rocket => &ROCKET,
            WeaponKind::Plasma => &PLASMA,
        }
    }
}

/// One projectile emitted per shot, relative to the muzzle
#[derive(Debug, Clone, Copy)]
pub struct Muzzle {
    /// Offset from `player centre x - 2`
    pub dx: f32,
    /// Offset from the player's top edge
    pub dy: f32,
    /// Horizontal drift (pixels/sec)
    pub vx: f32,
}

impl Muzzle {
    const fn new(dx: f32, dy: f32, vx: f32) -> Self {
        Self { dx, dy, vx }
    }
}

/// Fixed fire parameters for a weapon
#[derive(Debug, Clone, Copy)]
pub struct WeaponSpec {
    pub cooldown_ms: u32,
    pub muzzles: &'static [Muzzle],
    pub size: Vec2,
    /// Upward speed (pixels/sec)
    pub speed: f32,
    pub damage: f32,
    /// Extra enemies a piercing bullet may pass through
    pub pierce: Option<u32>,
    /// Splash radius on impact
    pub aoe: Option<f32>,
}

impl WeaponSpec {
    pub fn cooldown_ticks(&self) -> u32 {
        ms_to_ticks(self.cooldown_ms)
    }
}

const NORMAL: WeaponSpec = WeaponSpec {
    cooldown_ms: 120,
    muzzles: &[Muzzle::new(0.0, -8.0, 0.0)],
    size: Vec2::new(4.0, 10.0),
    speed: 600.0,
    damage: 1.0,
    pierce: None,
    aoe: None,
};

const SPREAD: WeaponSpec = WeaponSpec {
    cooldown_ms: 160,
    muzzles: &[
        Muzzle::new(0.0, -8.0, 0.0),
        Muzzle::new(0.0, -8.0, -220.0),
        Muzzle::new(0.0, -8.0, 220.0),
    ],
    size: Vec2::new(4.0, 10.0),
    speed: 600.0,
    damage: 1.0,
    pierce: None,
    aoe: None,
};

const LASER: WeaponSpec = WeaponSpec {
    cooldown_ms: 40,
    muzzles: &[Muzzle::new(1.0, -10.0, 0.0)],
    size: Vec2::new(2.0, 22.0),
    speed: 1200.0,
    damage: 1.0,
    pierce: Some(3),
    aoe: None,
};

const ROCKET: WeaponSpec = WeaponSpec {
    cooldown_ms: 200,
    muzzles: &[Muzzle::new(-3.0, -12.0, 0.0)],
    size: Vec2::new(10.0, 18.0),
    speed: 520.0,
    damage: 3.5,
    pierce: None,
    aoe: Some(40.0),
};

const PLASMA: WeaponSpec = WeaponSpec {
    cooldown_ms: 110,
    muzzles: &[
        Muzzle::new(-3.0, -8.0, 0.0),
        Muzzle::new(3.0, -8.0, 0.0),
    ],
    size: Vec2::new(3.0, 14.0),
    speed: 800.0,
    damage: 1.5,
    pierce: None,
    aoe: None,
};

/// Build the bullets for one trigger pull of `kind` from `player`
pub fn fire_pattern(kind: WeaponKind, player: &Player) -> Vec<Bullet> {
    let spec = kind.spec();
    let cx = player.pos.x + player.size.x / 2.0 - 2.0;
    spec.muzzles
        .iter()
        .map(|m| Bullet {
            pos: Vec2::new(cx + m.dx, player.pos.y + m.dy),
            size: spec.size,
            speed: spec.speed,
            vx: m.vx,
            damage: spec.damage,
            kind,
            pierce: spec.pierce,
            aoe: spec.aoe,
            alive: true,
        })
        .collect()
}

/// Active weapon plus its remaining duration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponState {
    pub kind: WeaponKind,
    /// Steps until reverting to Normal (0 = untimed)
    pub remaining_ticks: u32,
}

impl WeaponState {
    /// Equip a timed weapon, replacing whatever was active
    pub fn equip(&mut self, kind: WeaponKind, duration_ms: u32) {
        self.kind = kind;
        self.remaining_ticks = ms_to_ticks(duration_ms);
    }

    /// Count down one step. Returns true on the step the weapon expires.
    pub fn tick(&mut self) -> bool {
        if self.remaining_ticks == 0 {
            return false;
        }
        self.remaining_ticks -= 1;
        if self.remaining_ticks == 0 {
            self.kind = WeaponKind::Normal;
            return true;
        }
        false
    }

    pub fn is_timed(&self) -> bool {
        self.remaining_ticks > 0
    }

    /// Remaining duration in whole seconds, rounded up
    pub fn remaining_secs(&self) -> u32 {
        self.remaining_ticks.div_ceil(crate::consts::SIM_HZ)
    }
}
