//! Fixed timestep simulation tick
//!
//! Core game loop that advances the simulation one step. Subsystems run to
//! completion in a fixed order: player, movement, spawning, collisions,
//! power-up expiry, progression.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision;
use super::effects::PowerUpKind;
use super::events::SoundCue;
use super::progression;
use super::spawner;
use super::state::{GameState, Owner, Projectile, ProjectileKind};
use crate::profile::Entitlement;

/// Normalized horizontal movement intent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MoveIntent {
    Left,
    Right,
    #[default]
    None,
}

impl MoveIntent {
    pub fn axis(&self) -> f32 {
        match self {
            MoveIntent::Left => -1.0,
            MoveIntent::Right => 1.0,
            MoveIntent::None => 0.0,
        }
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub movement: MoveIntent,
    /// Fire button held
    pub fire: bool,
    /// Idle/demo mode - AI plays the game
    pub autopilot: bool,
}

/// Multi-shot fan, degrees from straight up
const MULTI_SHOT_ANGLES: [f32; 8] = [-45.0, -30.0, -15.0, 0.0, 15.0, 30.0, 45.0, 90.0];
/// Purchased diagonal shots, degrees from straight up
const DIAGONAL_ANGLES: [f32; 4] = [45.0, 135.0, 225.0, 315.0];
/// Horizontal spacing between bullets of one volley
const VOLLEY_SPACING: f32 = 8.0;
/// Bullets leave from just above the player's centre
const MUZZLE_OFFSET: f32 = 20.0;

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, entitlement: &dyn Entitlement) {
    // Don't tick if paused, shopping, not started or game over
    if !state.is_simulating() {
        return;
    }

    state.time_ticks += 1;

    let input = if input.autopilot {
        autopilot(state)
    } else {
        input.clone()
    };

    update_player(state, &input);
    advance_entities(state);

    // Spawning and collisions are suspended during a level transition
    if !state.progression.is_transitioning() {
        spawner::try_spawn_enemy(state);
        spawner::try_spawn_boss(state);
        spawner::try_spawn_power_up(state);
        collision::resolve(state);
    }

    if state.is_game_over() {
        return;
    }

    let expired = state.effects.expire(state.time_ticks);
    for kind in expired {
        log::debug!("{:?} expired", kind);
    }

    progression::advance(state, entitlement);

    // Ensure deterministic ordering
    state.entities.normalize_order();
}

/// Move the craft and fire if the cooldown allows
fn update_player(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    player.pos.x += input.movement.axis() * player.speed;
    player.clamp_to(state.tuning.playfield_width);
    player.firing = input.fire;

    if player.fire_cooldown > 0 {
        player.fire_cooldown -= 1;
    }
    if input.fire && player.fire_cooldown == 0 {
        shoot(state);
        state.player.fire_cooldown = state.tuning.fire_cooldown_ticks;
    }
}

/// Fire one volley: the multi-shot fan, or the forward volley plus diagonals
pub fn shoot(state: &mut GameState) {
    let player = &state.player;
    let origin = player.pos - Vec2::new(0.0, MUZZLE_OFFSET);
    let speed = player.bullet_speed;
    let size = player.bullet_size;
    let piercing = player.piercing_shots;

    let mut volley: Vec<(Vec2, ProjectileKind)> = Vec::new();
    if state.effects.is_active(PowerUpKind::MultiShot) {
        for angle in MULTI_SHOT_ANGLES {
            volley.push((origin, ProjectileKind::Spread(angled_velocity(angle, speed))));
        }
    } else {
        let count = player.bullets_per_volley;
        for i in 0..count {
            let spread = (i as f32 - (count as f32 - 1.0) / 2.0) * VOLLEY_SPACING;
            volley.push((origin + Vec2::new(spread, 0.0), ProjectileKind::Straight { speed }));
        }
        if player.diagonal_shots {
            for angle in DIAGONAL_ANGLES {
                volley.push((origin, ProjectileKind::Angled(angled_velocity(angle, speed))));
            }
        }
    }

    let room = state
        .tuning
        .max_live_bullets
        .saturating_sub(state.entities.bullets.len());
    if room < volley.len() {
        log::debug!("Bullet cap reached, volley trimmed to {}", room);
    }
    for (pos, kind) in volley.into_iter().take(room) {
        let id = state.entities.next_entity_id();
        let mut bullet = Projectile::new(id, Owner::Player, kind, pos, size);
        bullet.piercing = piercing;
        state.entities.bullets.push(bullet);
    }
    state.sound(SoundCue::Shoot);
}

/// Velocity for a shot `degrees` clockwise from straight up
fn angled_velocity(degrees: f32, speed: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.sin() * speed, -rad.cos() * speed)
}

/// Move every entity and let bosses fire, then drop what left the playfield
fn advance_entities(state: &mut GameState) {
    let width = state.tuning.playfield_width;
    let height = state.tuning.playfield_height;
    let slow = state.effects.enemy_speed_factor(&state.tuning);

    for bullet in &mut state.entities.bullets {
        bullet.advance();
    }
    for enemy in &mut state.entities.enemies {
        enemy.pos.y += enemy.speed * slow;
    }
    for fireball in &mut state.entities.fireballs {
        fireball.advance();
    }
    for pickup in &mut state.entities.pickups {
        pickup.pos.y += pickup.fall_speed;
    }

    // Boss patrol and fire
    let mut muzzles: Vec<Vec2> = Vec::new();
    for boss in &mut state.entities.bosses {
        boss.pos.x += boss.speed * boss.direction;
        if boss.pos.x <= 0.0 || boss.pos.x + boss.width >= width {
            boss.direction = -boss.direction;
            boss.pos.x = boss.pos.x.clamp(0.0, (width - boss.width).max(0.0));
        }
        if boss.fire_cooldown == 0 {
            muzzles.push(Vec2::new(boss.pos.x + boss.width / 2.0, boss.pos.y + boss.height));
            boss.fire_cooldown = boss.fire_rate;
        } else {
            boss.fire_cooldown -= 1;
        }
    }
    for pos in muzzles {
        let id = state.entities.next_entity_id();
        state.entities.fireballs.push(Projectile::new(
            id,
            Owner::Boss,
            ProjectileKind::Straight {
                speed: state.tuning.fireball_speed,
            },
            pos,
            state.tuning.fireball_radius,
        ));
    }

    state.entities.cull_offscreen(width, height);
}

/// Demo-mode pilot: grab safe pickups, dodge fireballs, otherwise line up
/// under the lowest threat. Always fires.
fn autopilot(state: &GameState) -> TickInput {
    let player = &state.player;
    let danger_zone = player.pos.y - 150.0;

    // Dodge the nearest incoming fireball
    let incoming = state
        .entities
        .fireballs
        .iter()
        .filter(|f| f.pos.y > danger_zone && f.pos.y < player.pos.y)
        .min_by(|a, b| {
            (a.pos.x - player.pos.x)
                .abs()
                .partial_cmp(&(b.pos.x - player.pos.x).abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    let target_x = if let Some(fireball) = incoming.filter(|f| (f.pos.x - player.pos.x).abs() < player.radius * 1.5) {
        // Step away from it
        if fireball.pos.x < player.pos.x {
            player.pos.x + player.radius * 2.0
        } else {
            player.pos.x - player.radius * 2.0
        }
    } else if let Some(pickup) = state.entities.pickups.iter().max_by(|a, b| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        pickup.pos.x
    } else if let Some(enemy) = state.entities.enemies.iter().max_by(|a, b| {
        a.pos
            .y
            .partial_cmp(&b.pos.y)
            .unwrap_or(std::cmp::Ordering::Equal)
    }) {
        enemy.pos.x
    } else if let Some(boss) = state.entities.bosses.first() {
        boss.center().x
    } else {
        state.tuning.playfield_width / 2.0
    };

    let delta = target_x - player.pos.x;
    let movement = if delta.abs() <= player.speed {
        MoveIntent::None
    } else if delta < 0.0 {
        MoveIntent::Left
    } else {
        MoveIntent::Right
    };

    TickInput {
        movement,
        fire: true,
        autopilot: true,
    }
}
