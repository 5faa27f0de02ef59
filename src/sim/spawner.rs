//! Enemy, boss and power-up spawning
//!
//! Each spawner runs once per tick while the session is running outside a
//! level transition. Timers are re-armed every time their gate opens, spawn
//! or not, so a long pause never releases a burst of catch-up spawns.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::archetypes::{boss_for_level, eligible_enemies, EnemyArchetype};
use super::effects::PowerUpKind;
use super::events::{NotifyKind, SoundCue};
use super::state::{Boss, Enemy, GameState, Pickup};
use rand_pcg::Pcg32;

/// Tick of the last evaluation of each time-gated spawner
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub last_enemy_tick: u64,
    pub last_power_up_tick: u64,
}

/// Spawn an enemy if the interval elapsed and the cap allows it
pub fn try_spawn_enemy(state: &mut GameState) -> bool {
    let now = state.time_ticks;
    let wave = state.progression.wave;
    let level = state.progression.level;

    let interval = state.tuning.enemy_spawn_interval(wave, level) as u64;
    if now.saturating_sub(state.spawn_timers.last_enemy_tick) <= interval {
        return false;
    }
    state.spawn_timers.last_enemy_tick = now;

    if state.entities.enemies.len() >= state.tuning.enemy_cap(wave, level) {
        return false;
    }

    let pool = eligible_enemies(level);
    if pool.is_empty() {
        return false;
    }
    let archetype = pool[state.rng.random_range(0..pool.len())];
    let Some(params) = EnemyArchetype::get(archetype) else {
        return false;
    };

    let x = random_x(&mut state.rng, state.tuning.spawn_margin, state.tuning.playfield_width);
    let pos = Vec2::new(x, state.tuning.enemy_spawn_y);
    let id = state.entities.next_entity_id();
    state.entities.enemies.push(Enemy::new(id, archetype, params, pos));
    log::debug!("Spawned {} #{} at x={:.0}", params.name, id, x);
    true
}

/// Spawn a boss on boss waves when none is alive.
///
/// The ultimate boss is checked first so the two triggers never both fire.
pub fn try_spawn_boss(state: &mut GameState) -> bool {
    if state.entities.has_boss() {
        return false;
    }

    let wave = state.progression.wave;
    let level = state.progression.level;
    let tuning = &state.tuning;

    let ultimate = wave % tuning.ultimate_wave_cadence.max(1) == 0 && wave > tuning.ultimate_min_wave;
    let regular = wave % tuning.boss_wave_cadence.max(1) == 0;
    if !ultimate && !regular {
        return false;
    }

    let id = state.entities.next_entity_id();
    let boss = if ultimate {
        Boss::ultimate(id, level, tuning)
    } else {
        let (archetype, params) = boss_for_level(level);
        Boss::regular(id, archetype, params, level, tuning)
    };

    let message = if ultimate {
        format!("SPECIAL EVENT: {}!", boss.name())
    } else {
        format!("BOSS WAVE: {} appears!", boss.name())
    };
    log::info!("{} spawned at wave {} with {} health", boss.name(), wave, boss.health);
    state.entities.bosses.push(boss);
    state.notify(message, NotifyKind::Boss);
    state.sound(SoundCue::BossIntro);
    true
}

/// Roll for a falling power-up each time the gate opens
pub fn try_spawn_power_up(state: &mut GameState) -> bool {
    let now = state.time_ticks;
    if now.saturating_sub(state.spawn_timers.last_power_up_tick) <= state.tuning.power_up_gate_ticks as u64 {
        return false;
    }
    state.spawn_timers.last_power_up_tick = now;

    let chance = state.tuning.power_up_chance;
    let chance = if chance.is_nan() { 0.0 } else { chance.clamp(0.0, 1.0) };
    if !state.rng.random_bool(chance) {
        return false;
    }

    let mut pool: Vec<PowerUpKind> = PowerUpKind::BASIC.to_vec();
    if premium_unlocked(state) {
        pool.extend_from_slice(&PowerUpKind::PREMIUM);
    }
    let kind = pool[state.rng.random_range(0..pool.len())];

    let radius = state.tuning.power_up_radius;
    let x = random_x(&mut state.rng, radius, state.tuning.playfield_width);
    let id = state.entities.next_entity_id();
    state.entities.pickups.push(Pickup {
        id,
        kind,
        pos: Vec2::new(x, -20.0),
        radius,
        fall_speed: state.tuning.power_up_fall_speed,
    });
    log::debug!("Spawned {:?} pickup #{}", kind, id);
    true
}

/// Random x keeping `margin` clear of both walls. Degenerate playfields
/// collapse to the centre line.
fn random_x(rng: &mut Pcg32, margin: f32, width: f32) -> f32 {
    let lo = margin.max(0.0).min(width / 2.0);
    let hi = width - lo;
    if lo < hi && hi.is_finite() {
        rng.random_range(lo..hi)
    } else if width.is_finite() {
        width / 2.0
    } else {
        0.0
    }
}

/// Premium pickups drop for subscribers and for everyone past the threshold level
pub fn premium_unlocked(state: &GameState) -> bool {
    state.subscribed || state.progression.level >= state.tuning.premium_power_up_level
}
