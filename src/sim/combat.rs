//! Bullet-enemy resolution and weapon secondary effects
//!
//! A quadratic scan of live bullets against live enemies. Secondary effects
//! (rocket splash, plasma chain) fire in the same pass, right after the
//! primary hit they belong to.

use glam::Vec2;

use super::collision::within_splash;
use super::spawn::roll_powerup_drop;
use super::state::{ChainArc, Enemy, Explosion, GameEvent, GameState};
use super::weapon::WeaponKind;
use crate::consts::*;

/// Resolve every bullet-enemy overlap for this step.
///
/// Dead bullets and enemies are skipped but left in place; the caller culls
/// them before the step ends.
pub fn resolve_bullet_hits(state: &mut GameState) {
    for ei in 0..state.enemies.len() {
        for bi in 0..state.bullets.len() {
            if !state.enemies[ei].alive {
                break;
            }
            if !state.bullets[bi].alive {
                continue;
            }
            if !state.enemies[ei].rect().overlaps(&state.bullets[bi].rect()) {
                continue;
            }

            let bullet = &mut state.bullets[bi];
            bullet.register_hit();
            let (damage, kind, aoe) = (bullet.damage, bullet.kind, bullet.aoe);

            let impact = state.enemies[ei].center();
            if state.enemies[ei].take_damage(damage) {
                state.award_kill();
                state.events.push(GameEvent::EnemyDestroyed);
                let dropped = roll_powerup_drop(&mut state.rng, &state.enemies[ei]);
                if let Some(powerup) = dropped {
                    log::debug!(
                        "Enemy {} dropped {}",
                        state.enemies[ei].id,
                        powerup.kind.name()
                    );
                    state.powerups.push(powerup);
                }
            } else {
                state.events.push(GameEvent::EnemyHit);
            }

            if let Some(radius) = aoe {
                apply_splash(state, impact, radius);
            } else if kind == WeaponKind::Plasma {
                apply_chain(state, ei, impact);
            }
        }
    }
}

/// Detonate a splash at `impact`. Every living enemy within reach takes
/// fixed damage. Returns the number of kills.
pub fn apply_splash(state: &mut GameState, impact: Vec2, radius: f32) -> usize {
    state.explosions.push(Explosion {
        center: impact,
        radius,
        life_ms: EXPLOSION_LIFE_MS,
        age_ms: 0.0,
    });
    state.events.push(GameEvent::Splash);

    let mut kills = 0;
    for enemy in state.enemies.iter_mut().filter(|e| e.alive) {
        if within_splash(impact, radius, enemy.center(), enemy.half_extent())
            && enemy.take_damage(SPLASH_DAMAGE)
        {
            kills += 1;
        }
    }
    for _ in 0..kills {
        state.award_kill();
    }
    kills
}

/// Indices of the enemies a chain from `source` would jump to: living, not
/// the source itself, strictly inside chain range, nearest first, at most
/// `CHAIN_MAX_TARGETS`.
pub fn chain_targets(enemies: &[Enemy], source_idx: usize, source: Vec2) -> Vec<usize> {
    let mut candidates: Vec<(usize, f32)> = enemies
        .iter()
        .enumerate()
        .filter(|(i, e)| *i != source_idx && e.alive)
        .map(|(i, e)| (i, e.center().distance(source)))
        .filter(|(_, d)| *d < CHAIN_RANGE)
        .collect();
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
    candidates.truncate(CHAIN_MAX_TARGETS);
    candidates.into_iter().map(|(i, _)| i).collect()
}

/// Chain from the struck enemy to its nearest neighbours. Returns the number
/// of kills.
pub fn apply_chain(state: &mut GameState, source_idx: usize, source: Vec2) -> usize {
    let targets = chain_targets(&state.enemies, source_idx, source);
    if targets.is_empty() {
        return 0;
    }

    let mut kills = 0;
    for idx in targets {
        let target = &mut state.enemies[idx];
        state.arcs.push(ChainArc {
            from: source,
            to: target.center(),
            life_ms: ARC_LIFE_MS,
            age_ms: 0.0,
        });
        if target.take_damage(CHAIN_DAMAGE) {
            kills += 1;
        }
    }
    for _ in 0..kills {
        state.award_kill();
    }
    state.events.push(GameEvent::ChainZap);
    kills
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Bullet;
    use crate::sim::weapon::fire_pattern;
    use crate::tuning::EnemyKind;

    fn enemy(id: u32, x: f32, y: f32, size: f32, hp: f32) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::splat(size),
            speed: 0.0,
            hp,
            kind: EnemyKind::Red,
            alive: true,
            wobble_phase: 0.0,
        }
    }

    fn bullet_at(kind: WeaponKind, center: Vec2) -> Bullet {
        let mut state = GameState::new(0, 800.0, 600.0);
        state.player.pos = Vec2::ZERO;
        let mut b = fire_pattern(kind, &state.player).remove(0);
        b.pos = center - b.size * 0.5;
        b
    }

    fn playing_state() -> GameState {
        let mut state = GameState::new(5, 800.0, 600.0);
        state.start();
        state
    }

    #[test]
    fn test_normal_hit_damages_and_consumes_bullet() {
        let mut state = playing_state();
        state.enemies.push(enemy(1, 100.0, 100.0, 30.0, 2.0));
        state.bullets.push(bullet_at(WeaponKind::Normal, Vec2::new(115.0, 115.0)));

        resolve_bullet_hits(&mut state);

        assert_eq!(state.enemies[0].hp, 1.0);
        assert!(state.enemies[0].alive);
        assert!(!state.bullets[0].alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.events, vec![GameEvent::EnemyHit]);
    }

    #[test]
    fn test_dead_bullet_does_not_hit_twice() {
        let mut state = playing_state();
        state.enemies.push(enemy(1, 100.0, 100.0, 30.0, 5.0));
        state.enemies.push(enemy(2, 100.0, 100.0, 30.0, 5.0));
        state.bullets.push(bullet_at(WeaponKind::Normal, Vec2::new(115.0, 115.0)));

        resolve_bullet_hits(&mut state);

        let total: f32 = state.enemies.iter().map(|e| 5.0 - e.hp).sum();
        assert_eq!(total, 1.0);
    }

    #[test]
    fn test_score_is_ten_per_kill() {
        let mut state = playing_state();
        for i in 0..7 {
            let x = 20.0 + i as f32 * 60.0;
            state.enemies.push(enemy(i, x, 100.0, 30.0, 1.0));
            state.bullets.push(bullet_at(WeaponKind::Normal, Vec2::new(x + 15.0, 115.0)));
        }

        resolve_bullet_hits(&mut state);

        assert!(state.enemies.iter().all(|e| !e.alive));
        assert_eq!(state.score, 70);
    }

    #[test]
    fn test_rocket_splash_radius_rule() {
        let mut state = playing_state();
        // Struck enemy, centre (115, 115), survives the 3.5 primary damage
        state.enemies.push(enemy(1, 100.0, 100.0, 30.0, 10.0));
        // Centre 55 px right: reach is 40 + 15 = 55, inside
        state.enemies.push(enemy(2, 155.0, 100.0, 30.0, 10.0));
        // Centre 56 px right: outside
        state.enemies.push(enemy(3, 156.0, 160.0 - 60.0, 30.0, 10.0));
        // Far away
        state.enemies.push(enemy(4, 400.0, 400.0, 30.0, 10.0));
        state.bullets.push(bullet_at(WeaponKind::Rocket, Vec2::new(115.0, 125.0)));

        resolve_bullet_hits(&mut state);

        // Primary 3.5 plus splash 2
        assert_eq!(state.enemies[0].hp, 4.5);
        assert_eq!(state.enemies[1].hp, 8.0);
        assert_eq!(state.enemies[2].hp, 10.0);
        assert_eq!(state.enemies[3].hp, 10.0);
        assert_eq!(state.explosions.len(), 1);
        assert_eq!(state.explosions[0].center, Vec2::new(115.0, 115.0));
        assert_eq!(state.explosions[0].radius, 40.0);
        assert!(state.events.contains(&GameEvent::Splash));
    }

    #[test]
    fn test_splash_kills_score_without_drops() {
        let mut state = playing_state();
        state.enemies.push(enemy(1, 100.0, 100.0, 30.0, 2.0));
        state.enemies.push(enemy(2, 130.0, 100.0, 30.0, 2.0));
        let kills = apply_splash(&mut state, Vec2::new(115.0, 115.0), 40.0);
        assert_eq!(kills, 2);
        assert_eq!(state.score, 20);
        assert!(state.powerups.is_empty());
    }

    #[test]
    fn test_chain_targets_nearest_first_within_range() {
        let mut enemies = vec![enemy(0, 0.0, 0.0, 20.0, 5.0)];
        // Centres 80, 50, 130, 70, 60 px to the right of the source centre
        for (id, dx) in [(1, 80.0), (2, 50.0), (3, 130.0), (4, 70.0), (5, 60.0)] {
            enemies.push(enemy(id, dx, 0.0, 20.0, 5.0));
        }
        // A dead enemy right next to the source is ignored
        let mut dead = enemy(6, 5.0, 0.0, 20.0, 5.0);
        dead.alive = false;
        enemies.push(dead);

        let source = enemies[0].center();
        let targets = chain_targets(&enemies, 0, source);
        let ids: Vec<u32> = targets.iter().map(|&i| enemies[i].id).collect();
        assert_eq!(ids, vec![2, 5, 4]);
    }

    #[test]
    fn test_chain_excludes_range_boundary() {
        let enemies = vec![enemy(0, 0.0, 0.0, 20.0, 5.0), enemy(1, 120.0, 0.0, 20.0, 5.0)];
        let targets = chain_targets(&enemies, 0, enemies[0].center());
        assert!(targets.is_empty());
    }

    #[test]
    fn test_plasma_hit_chains_damage_and_arcs() {
        let mut state = playing_state();
        state.enemies.push(enemy(1, 100.0, 100.0, 30.0, 5.0));
        state.enemies.push(enemy(2, 160.0, 100.0, 30.0, 1.5));
        state.enemies.push(enemy(3, 100.0, 170.0, 30.0, 5.0));
        state.enemies.push(enemy(4, 400.0, 100.0, 30.0, 5.0));
        state.bullets.push(bullet_at(WeaponKind::Plasma, Vec2::new(115.0, 115.0)));

        resolve_bullet_hits(&mut state);

        assert_eq!(state.enemies[0].hp, 3.5);
        assert!(!state.enemies[1].alive);
        assert_eq!(state.enemies[2].hp, 3.5);
        assert_eq!(state.enemies[3].hp, 5.0);
        assert_eq!(state.arcs.len(), 2);
        assert_eq!(state.score, 10);
        assert!(state.events.contains(&GameEvent::ChainZap));
    }

    #[test]
    fn test_chain_without_targets_is_silent() {
        let mut state = playing_state();
        state.enemies.push(enemy(1, 100.0, 100.0, 30.0, 5.0));
        let source = state.enemies[0].center();
        let kills = apply_chain(&mut state, 0, source);
        assert_eq!(kills, 0);
        assert!(state.arcs.is_empty());
        assert!(!state.events.contains(&GameEvent::ChainZap));
    }
}
