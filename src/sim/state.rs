//! Game state and core simulation types
//!
//! The whole session lives in one `GameState`; nothing in the simulation
//! reaches outside it.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::spawn::generate_stars;
use super::weapon::{WeaponKind, WeaponState};
use crate::consts::*;
use crate::tuning::EnemyKind;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title overlay, waiting for start
    #[default]
    Menu,
    /// Active gameplay
    Playing,
    /// Simulation frozen
    Paused,
    /// Lives ran out
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Horizontal speed (pixels/sec)
    pub speed: f32,
    /// Steps until the next shot is allowed
    pub fire_timer: u32,
    pub lives: u8,
    /// Steps of remaining invincibility
    pub invincible_ticks: u32,
}

impl Player {
    /// New ship centred at the bottom of a field
    pub fn new(field_w: f32, field_h: f32) -> Self {
        let size = Vec2::splat(PLAYER_SIZE);
        Self {
            pos: Vec2::new(
                field_w / 2.0 - size.x / 2.0,
                field_h - size.y - PLAYER_BOTTOM_MARGIN,
            ),
            size,
            speed: PLAYER_SPEED,
            fire_timer: 0,
            lives: PLAYER_LIVES,
            invincible_ticks: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    /// Clamp horizontally into `[0, field_w - w]`
    pub fn clamp_to_field(&mut self, field_w: f32) {
        self.pos.x = self.pos.x.clamp(0.0, (field_w - self.size.x).max(0.0));
    }
}

/// A player projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Upward speed (pixels/sec)
    pub speed: f32,
    /// Horizontal drift (pixels/sec)
    pub vx: f32,
    pub damage: f32,
    pub kind: WeaponKind,
    /// Remaining extra hits for piercing bullets
    pub pierce: Option<u32>,
    /// Splash radius for explosive bullets
    pub aoe: Option<f32>,
    pub alive: bool,
}

impl Bullet {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    /// Consume one hit: piercing bullets spend a charge, others die
    pub fn register_hit(&mut self) {
        match self.pierce {
            Some(n) if n > 0 => self.pierce = Some(n - 1),
            _ => self.alive = false,
        }
    }
}

/// A descending enemy ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Descent speed (pixels/sec)
    pub speed: f32,
    pub hp: f32,
    pub kind: EnemyKind,
    pub alive: bool,
    /// Phase offset for lateral wobble (radians)
    pub wobble_phase: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Half of the larger side, used for splash reach
    pub fn half_extent(&self) -> f32 {
        self.size.x.max(self.size.y) / 2.0
    }

    /// Apply damage. Returns true if this hit killed the enemy.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        self.hp -= amount;
        if self.hp <= 0.0 {
            self.alive = false;
            return true;
        }
        false
    }
}

/// A falling weapon pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    /// Fall speed (pixels/sec)
    pub vy: f32,
    pub kind: WeaponKind,
    pub alive: bool,
    /// Age in milliseconds (drives sway and tile rotation)
    pub age_ms: f32,
}

impl PowerUp {
    pub fn new(pos: Vec2, kind: WeaponKind) -> Self {
        Self {
            pos,
            size: Vec2::splat(POWERUP_SIZE),
            vy: POWERUP_FALL_SPEED,
            kind,
            alive: true,
            age_ms: 0.0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.size)
    }
}

/// Rocket impact flash (cosmetic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
    pub life_ms: f32,
    pub age_ms: f32,
}

/// Plasma chain bolt between two enemies (cosmetic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainArc {
    pub from: Vec2,
    pub to: Vec2,
    pub life_ms: f32,
    pub age_ms: f32,
}

/// Fade factor shared by cosmetic effects: 1 at birth, 0 at end of life
#[inline]
pub fn fade(age_ms: f32, life_ms: f32) -> f32 {
    1.0 - (age_ms / life_ms).min(1.0)
}

/// Background star
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub radius: f32,
    /// Scroll speed (pixels/sec)
    pub speed: f32,
}

/// Things that happened during a step, drained by the host for audio/HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A volley was fired
    Shot(WeaponKind),
    /// An enemy was hit by a bullet but survived
    EnemyHit,
    /// An enemy was destroyed by a bullet
    EnemyDestroyed,
    /// Rocket splash detonated
    Splash,
    /// Plasma chained to at least one target
    ChainZap,
    /// Power-up collected
    PowerUpCollected(WeaponKind),
    /// Timed weapon ran out
    WeaponExpired,
    /// Player took a hit
    PlayerHurt,
    /// Lives reached zero
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Session seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Play field size in CSS pixels
    pub field: Vec2,
    pub score: u64,
    /// Simulation step counter
    pub time_ticks: u64,
    /// Steps until the next enemy spawn
    pub spawn_timer: u32,
    pub player: Player,
    pub weapon: WeaponState,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    pub powerups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub arcs: Vec<ChainArc>,
    pub stars: Vec<Star>,
    /// Events raised since the host last drained them
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session in the menu phase for a field of the given size
    pub fn new(seed: u64, field_w: f32, field_h: f32) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = generate_stars(&mut rng, field_w, field_h);
        Self {
            seed,
            rng,
            phase: GamePhase::Menu,
            field: Vec2::new(field_w, field_h),
            score: 0,
            time_ticks: 0,
            spawn_timer: 0,
            player: Player::new(field_w, field_h),
            weapon: WeaponState::default(),
            bullets: Vec::new(),
            enemies: Vec::new(),
            powerups: Vec::new(),
            explosions: Vec::new(),
            arcs: Vec::new(),
            stars,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Simulated time in seconds
    pub fn time_secs(&self) -> f32 {
        self.time_ticks as f32 * SIM_DT
    }

    /// Reset everything gameplay-related and enter `Playing`.
    ///
    /// The star field and RNG stream carry over.
    pub fn start(&mut self) {
        self.score = 0;
        self.time_ticks = 0;
        self.spawn_timer = 0;
        self.player = Player::new(self.field.x, self.field.y);
        self.weapon = WeaponState::default();
        self.bullets.clear();
        self.enemies.clear();
        self.powerups.clear();
        self.explosions.clear();
        self.arcs.clear();
        self.events.clear();
        self.phase = GamePhase::Playing;
    }

    /// Adapt to a new canvas size: regenerate stars and keep the ship on screen
    pub fn resize(&mut self, field_w: f32, field_h: f32) {
        self.field = Vec2::new(field_w, field_h);
        self.stars = generate_stars(&mut self.rng, field_w, field_h);
        self.player.pos.y = field_h - self.player.size.y - PLAYER_BOTTOM_MARGIN;
        self.player.clamp_to_field(field_w);
    }

    /// Take the pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Award points for a kill
    pub fn award_kill(&mut self) {
        self.score += SCORE_PER_KILL;
    }
}
