//! Collision detection and resolution
//!
//! Rules run in a fixed order, each against the collections the previous rule
//! left behind, so a bullet consumed by an enemy can never also hit a boss in
//! the same tick. Entity counts are capped low enough that brute-force pairwise
//! tests stay cheap.

use super::effects::{apply_power_up, PowerUpKind};
use super::events::SoundCue;
use super::registry::extract_where;
use super::state::{Boss, GameState, Projectile};
use crate::circles_overlap;

/// Run every collision rule for this tick
pub fn resolve(state: &mut GameState) {
    bullets_vs_enemies(state);
    bullets_vs_bosses(state);
    laser_sweep(state);
    enemies_vs_player(state);
    fireballs_vs_player(state);
    pickups_vs_player(state);
}

fn bullet_hits_boss(bullet: &Projectile, boss: &Boss) -> bool {
    circles_overlap(bullet.pos, bullet.radius, boss.center(), boss.hit_radius())
}

/// Rule 1: player bullets damage enemies
pub fn bullets_vs_enemies(state: &mut GameState) {
    let mut spent = vec![false; state.entities.bullets.len()];
    let enemies = &mut state.entities.enemies;

    for (bullet, spent) in state.entities.bullets.iter_mut().zip(spent.iter_mut()) {
        for enemy in enemies.iter_mut().filter(|e| e.health > 0) {
            if bullet.piercing && bullet.hits.contains(&enemy.id) {
                continue;
            }
            if !circles_overlap(bullet.pos, bullet.radius, enemy.pos, enemy.radius) {
                continue;
            }
            enemy.damage(bullet.damage);
            if bullet.piercing {
                bullet.hits.push(enemy.id);
            } else {
                *spent = true;
                break;
            }
        }
    }

    let mut flags = spent.into_iter();
    state.entities.bullets.retain(|_| !flags.next().unwrap_or(false));

    let killed = extract_where(&mut state.entities.enemies, |e| e.health == 0);
    for enemy in &killed {
        state.reward_enemy_kill(enemy);
    }
}

/// Rule 2: surviving bullets damage bosses
pub fn bullets_vs_bosses(state: &mut GameState) {
    if state.entities.bosses.is_empty() {
        return;
    }
    let mut spent = vec![false; state.entities.bullets.len()];
    let bosses = &mut state.entities.bosses;

    for (bullet, spent) in state.entities.bullets.iter().zip(spent.iter_mut()) {
        if let Some(boss) = bosses
            .iter_mut()
            .find(|b| b.health > 0 && bullet_hits_boss(bullet, b))
        {
            boss.damage(bullet.damage);
            *spent = true;
        }
    }

    let mut flags = spent.into_iter();
    state.entities.bullets.retain(|_| !flags.next().unwrap_or(false));

    let defeated = extract_where(&mut state.entities.bosses, |b| b.health == 0);
    for boss in &defeated {
        state.reward_boss_kill(boss);
    }
}

/// Laser beam: a vertical strip above the player pulses damage while firing
pub fn laser_sweep(state: &mut GameState) {
    if !state.player.firing || !state.effects.is_active(PowerUpKind::Laser) {
        return;
    }
    if state.time_ticks % state.tuning.laser_interval.max(1) as u64 != 0 {
        return;
    }

    let beam_x = state.player.pos.x;
    let beam_top = state.player.pos.y;
    let half_width = state.tuning.laser_half_width;

    for enemy in &mut state.entities.enemies {
        if (enemy.pos.x - beam_x).abs() < half_width + enemy.radius && enemy.pos.y < beam_top {
            enemy.damage(1);
        }
    }
    for boss in &mut state.entities.bosses {
        let overlaps = beam_x + half_width > boss.pos.x && beam_x - half_width < boss.pos.x + boss.width;
        if overlaps && boss.pos.y < beam_top {
            boss.damage(1);
        }
    }

    let killed = extract_where(&mut state.entities.enemies, |e| e.health == 0);
    for enemy in &killed {
        state.reward_enemy_kill(enemy);
    }
    let defeated = extract_where(&mut state.entities.bosses, |b| b.health == 0);
    for boss in &defeated {
        state.reward_boss_kill(boss);
    }
}

/// What happens when something hostile reaches the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Impact {
    /// Invincible shield: attacker destroyed, no penalty
    Absorbed,
    /// One-shot shield consumed
    Blocked,
    /// A life lost
    Hit,
}

fn player_impact(state: &mut GameState) -> Impact {
    if state.effects.is_active(PowerUpKind::ShieldPlus) {
        Impact::Absorbed
    } else if state.player.shield {
        state.player.shield = false;
        state.sound(SoundCue::Shield);
        Impact::Blocked
    } else {
        state.lose_life();
        Impact::Hit
    }
}

/// Rule 3: enemies ramming the player
pub fn enemies_vs_player(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    let (pos, radius) = (state.player.pos, state.player.radius);
    let colliding = extract_where(&mut state.entities.enemies, |e| {
        circles_overlap(pos, radius, e.pos, e.radius)
    });

    for enemy in &colliding {
        if state.is_game_over() {
            break;
        }
        if player_impact(state) == Impact::Absorbed {
            state.reward_enemy_kill(enemy);
        }
    }
}

/// Rule 4: boss fireballs hitting the player (never scored)
pub fn fireballs_vs_player(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    let (pos, radius) = (state.player.pos, state.player.radius);
    let colliding = extract_where(&mut state.entities.fireballs, |f| {
        circles_overlap(pos, radius, f.pos, f.radius)
    });

    for _ in &colliding {
        if state.is_game_over() {
            break;
        }
        player_impact(state);
    }
}

/// Rule 5: collecting pickups
pub fn pickups_vs_player(state: &mut GameState) {
    if state.is_game_over() {
        return;
    }
    let (pos, radius) = (state.player.pos, state.player.radius);
    let collected = extract_where(&mut state.entities.pickups, |p| {
        circles_overlap(pos, radius, p.pos, p.radius)
    });

    for pickup in collected {
        apply_power_up(state, pickup.kind);
    }
}
