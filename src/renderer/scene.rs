//! Scene assembly: game state in, triangle list out
//!
//! Pure with respect to the simulation. Coordinates are field pixels with y
//! pointing down; the pipeline maps them to clip space.

use glam::Vec2;

use super::shapes::{
    circle, glyph_strokes, gradient_rect, line, polygon_fan, polyline, radial_gradient,
    rounded_rect_outline, transform,
};
use super::vertex::{Vertex, colors, rgb, with_alpha};
use crate::settings::QualityPreset;
use crate::sim::state::{Bullet, ChainArc, Explosion, GameState, PowerUp, fade};
use crate::sim::weapon::WeaponKind;

/// Invincibility blink half-period
const BLINK_MS: f64 = 100.0;
/// Power-up tile corner radius
const TILE_RADIUS: f32 = 4.0;
/// Power-up rock: angle = sin(age / period) * amplitude
const TILE_ROCK_PERIOD_MS: f32 = 180.0;
const TILE_ROCK_AMPLITUDE: f32 = 0.2;
/// Chain arc look
const ARC_SEGMENTS: u32 = 6;
const ARC_WIDTH: f32 = 2.2;
const ARC_JITTER: f32 = 6.0;
/// Explosion radius grows by this fraction over its life
const EXPLOSION_GROWTH: f32 = 0.25;

/// Build every triangle for one frame.
///
/// `time_ms` is the wall clock, used only for the invincibility blink.
pub fn build_scene(state: &GameState, time_ms: f64, quality: QualityPreset) -> Vec<Vertex> {
    let segments = quality.circle_segments();
    let mut vertices = Vec::with_capacity(4096);

    for star in state.stars.iter().step_by(quality.star_stride()) {
        vertices.extend(circle(star.pos, star.radius, colors::STAR, segments));
    }

    let player = &state.player;
    if !(player.is_invincible() && blink_hidden(time_ms)) {
        vertices.extend(ship(player.pos, player.size, colors::PLAYER, false));
    }

    for bullet in &state.bullets {
        vertices.extend(bullet_quad(bullet));
    }

    for enemy in &state.enemies {
        vertices.extend(ship(enemy.pos, enemy.size, enemy.kind.color(), true));
    }

    for powerup in &state.powerups {
        vertices.extend(powerup_tile(powerup, quality));
    }

    for explosion in &state.explosions {
        vertices.extend(explosion_flash(explosion, segments * 2));
    }

    for arc in &state.arcs {
        vertices.extend(chain_bolt(arc));
    }

    vertices
}

/// Blink phase: hidden on even 100 ms windows
fn blink_hidden(time_ms: f64) -> bool {
    (time_ms / BLINK_MS).floor() as i64 % 2 == 0
}

/// Ship silhouette in a `size` box at `pos`. Enemies are flipped vertically.
pub fn ship_outline(pos: Vec2, size: Vec2, invert: bool) -> Vec<Vec2> {
    const OUTLINE: [(f32, f32); 7] = [
        (0.5, 0.0),
        (1.0, 0.7),
        (0.65, 0.7),
        (0.55, 1.0),
        (0.45, 1.0),
        (0.35, 0.7),
        (0.0, 0.7),
    ];
    OUTLINE
        .iter()
        .map(|&(u, v)| {
            let v = if invert { 1.0 - v } else { v };
            pos + Vec2::new(u, v) * size
        })
        .collect()
}

fn ship(pos: Vec2, size: Vec2, color: [f32; 4], invert: bool) -> Vec<Vertex> {
    let pivot_v = if invert { 0.4 } else { 0.6 };
    let pivot = pos + Vec2::new(0.5, pivot_v) * size;
    polygon_fan(&ship_outline(pos, size, invert), pivot, color)
}

/// Head-to-tail color stops per weapon
fn bullet_stops(kind: WeaponKind) -> &'static [(f32, [f32; 4])] {
    const NORMAL: [(f32, [f32; 4]); 2] = [(0.0, rgb(0xfff7b8)), (1.0, rgb(0xffcf33))];
    const SPREAD: [(f32, [f32; 4]); 3] = [
        (0.0, rgb(0xfff2a8)),
        (0.5, rgb(0xffc23b)),
        (1.0, rgb(0xff7b00)),
    ];
    const LASER: [(f32, [f32; 4]); 3] = [
        (0.0, rgb(0xffffff)),
        (0.35, rgb(0xd8fbff)),
        (1.0, rgb(0x44b6ff)),
    ];
    const ROCKET: [(f32, [f32; 4]); 3] = [
        (0.0, rgb(0xffd6a0)),
        (0.5, rgb(0xff8a3b)),
        (1.0, rgb(0xc14600)),
    ];
    const PLASMA: [(f32, [f32; 4]); 3] = [
        (0.0, rgb(0xe0f7ff)),
        (0.5, rgb(0x99ccff)),
        (1.0, rgb(0x6ad1ff)),
    ];

    match kind {
        WeaponKind::Normal => &NORMAL,
        WeaponKind::Spread => &SPREAD,
        WeaponKind::Laser => &LASER,
        WeaponKind::Rocket => &ROCKET,
        WeaponKind::Plasma => &PLASMA,
    }
}

fn bullet_quad(bullet: &Bullet) -> Vec<Vertex> {
    gradient_rect(bullet.pos, bullet.size, bullet_stops(bullet.kind))
}

fn powerup_tile(p: &PowerUp, quality: QualityPreset) -> Vec<Vertex> {
    let angle = (p.age_ms / TILE_ROCK_PERIOD_MS).sin() * TILE_ROCK_AMPLITUDE;
    let half = p.size / 2.0;
    let fill = if p.kind == WeaponKind::Laser {
        colors::POWERUP_LASER
    } else {
        colors::POWERUP_OTHER
    };

    let radius = if quality.rounded_tiles() { TILE_RADIUS } else { 0.0 };
    let mut outline = rounded_rect_outline(p.size, radius, 3);
    transform(&mut outline, half, angle, p.pos);

    let mut vertices = polygon_fan(&outline, p.pos + half, fill);
    let mut closed = outline.clone();
    closed.push(outline[0]);
    vertices.extend(polyline(&closed, 1.0, colors::POWERUP_OUTLINE));

    // Letter sits in an 8x10 box in the middle of the tile
    let glyph_size = Vec2::new(8.0, 10.0);
    let glyph_origin = half - glyph_size / 2.0;
    for [a, b] in glyph_strokes(p.kind.glyph()) {
        let mut seg = [glyph_origin + *a * glyph_size, glyph_origin + *b * glyph_size];
        transform(&mut seg, half, angle, p.pos);
        vertices.extend(line(seg[0], seg[1], 1.4, colors::POWERUP_GLYPH));
    }
    vertices
}

/// Radius an explosion is drawn at for its age
pub fn explosion_radius(x: &Explosion) -> f32 {
    let k = fade(x.age_ms, x.life_ms);
    x.radius * (1.0 + EXPLOSION_GROWTH * (1.0 - k))
}

fn explosion_flash(x: &Explosion, segments: u32) -> Vec<Vertex> {
    let k = fade(x.age_ms, x.life_ms);
    let stops = [
        (0.0, with_alpha(colors::EXPLOSION_CORE, k)),
        (0.5, with_alpha(colors::EXPLOSION_MID, k)),
        (1.0, colors::EXPLOSION_EDGE),
    ];
    radial_gradient(x.center, explosion_radius(x), &stops, segments)
}

/// Deterministic jitter in [-0.5, 0.5)
fn jitter(seed: u32) -> f32 {
    let h = seed.wrapping_mul(2654435761) ^ (seed >> 15);
    let h = h.wrapping_mul(2246822519);
    (h >> 8) as f32 / (1u32 << 24) as f32 - 0.5
}

/// Bolt path: endpoints fixed, interior points jittered, jitter shrinking
/// as the arc fades
pub fn chain_points(arc: &ChainArc) -> Vec<Vec2> {
    let k = fade(arc.age_ms, arc.life_ms);
    let step = (arc.to - arc.from) / ARC_SEGMENTS as f32;
    let base = (arc.age_ms as u32)
        .wrapping_mul(31)
        .wrapping_add(arc.from.x.to_bits() ^ arc.to.y.to_bits());

    let mut points = Vec::with_capacity(ARC_SEGMENTS as usize + 1);
    points.push(arc.from);
    for i in 1..ARC_SEGMENTS {
        let seed = base.wrapping_add(i * 2);
        let offset = Vec2::new(jitter(seed), jitter(seed.wrapping_add(1))) * ARC_JITTER * k;
        points.push(arc.from + step * i as f32 + offset);
    }
    points.push(arc.to);
    points
}

fn chain_bolt(arc: &ChainArc) -> Vec<Vertex> {
    let k = fade(arc.age_ms, arc.life_ms);
    polyline(&chain_points(arc), ARC_WIDTH, with_alpha(colors::ARC, k))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::weapon::fire_pattern;

    fn state() -> GameState {
        let mut s = GameState::new(1, 480.0, 720.0);
        s.start();
        s
    }

    fn star_vertices(s: &GameState, q: QualityPreset) -> usize {
        s.stars.iter().step_by(q.star_stride()).count() * q.circle_segments() as usize * 3
    }

    #[test]
    fn test_stars_and_player() {
        let s = state();
        let q = QualityPreset::Medium;
        let verts = build_scene(&s, 0.0, q);
        assert_eq!(verts.len(), star_vertices(&s, q) + 21);
    }

    #[test]
    fn test_invincible_player_blinks() {
        let mut s = state();
        s.player.invincible_ticks = 30;
        let q = QualityPreset::Low;
        let stars = star_vertices(&s, q);
        assert_eq!(build_scene(&s, 50.0, q).len(), stars);
        assert_eq!(build_scene(&s, 150.0, q).len(), stars + 21);
    }

    #[test]
    fn test_enemy_outline_is_flipped() {
        let pos = Vec2::new(10.0, 20.0);
        let size = Vec2::splat(30.0);
        let up = ship_outline(pos, size, false);
        let down = ship_outline(pos, size, true);
        // Nose at the top for the player, at the bottom for enemies
        assert_eq!(up[0], Vec2::new(25.0, 20.0));
        assert_eq!(down[0], Vec2::new(25.0, 50.0));
    }

    #[test]
    fn test_bullet_uses_weapon_gradient() {
        let mut s = state();
        s.bullets = fire_pattern(WeaponKind::Laser, &s.player);
        let q = QualityPreset::Medium;
        let verts = build_scene(&s, 0.0, q);
        let bullet = &verts[star_vertices(&s, q) + 21..];
        assert_eq!(bullet.len(), 12);
        assert_eq!(bullet[0].color, rgb(0xffffff));
        assert_eq!(bullet[11].color, rgb(0x44b6ff));
    }

    #[test]
    fn test_explosion_grows_while_fading() {
        let mut x = Explosion {
            center: Vec2::ZERO,
            radius: 40.0,
            life_ms: 220.0,
            age_ms: 0.0,
        };
        assert_eq!(explosion_radius(&x), 40.0);
        x.age_ms = 220.0;
        assert_eq!(explosion_radius(&x), 50.0);
    }

    #[test]
    fn test_chain_points_are_stable() {
        let arc = ChainArc {
            from: Vec2::new(0.0, 0.0),
            to: Vec2::new(60.0, 0.0),
            life_ms: 120.0,
            age_ms: 30.0,
        };
        let a = chain_points(&arc);
        let b = chain_points(&arc);
        assert_eq!(a, b);
        assert_eq!(a.len(), 7);
        assert_eq!(a[0], arc.from);
        assert_eq!(a[6], arc.to);
        // Interior points stay within the jitter envelope
        for (i, p) in a.iter().enumerate().skip(1).take(5) {
            let ideal = Vec2::new(10.0 * i as f32, 0.0);
            assert!((*p - ideal).abs().max_element() <= ARC_JITTER * 0.75 / 2.0 + 1e-4);
        }
    }

    #[test]
    fn test_faded_arc_is_straight() {
        let arc = ChainArc {
            from: Vec2::ZERO,
            to: Vec2::new(0.0, 60.0),
            life_ms: 120.0,
            age_ms: 120.0,
        };
        for (i, p) in chain_points(&arc).iter().enumerate() {
            assert_eq!(*p, Vec2::new(0.0, 10.0 * i as f32));
        }
    }

    #[test]
    fn test_jitter_range() {
        for seed in 0..10_000 {
            let j = jitter(seed);
            assert!((-0.5..0.5).contains(&j));
        }
    }

    #[test]
    fn test_powerup_tile_draws_glyph() {
        let mut s = state();
        s.powerups
            .push(PowerUp::new(Vec2::new(100.0, 100.0), WeaponKind::Rocket));
        let q = QualityPreset::High;
        let base = build_scene(&state(), 0.0, q).len();
        let with_tile = build_scene(&s, 0.0, q).len();
        // Fan plus outline plus five glyph strokes
        let outline = 4 * 4;
        assert_eq!(with_tile - base, outline * 3 + outline * 6 + 5 * 6);
    }
}
