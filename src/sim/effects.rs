//! Power-up effects
//!
//! Heal, shield and nuke resolve instantly. The rest are timed buffs tracked
//! in `ActiveEffects`, at most one entry per kind.

use serde::{Deserialize, Serialize};

use super::events::{NotifyKind, SoundCue};
use super::registry::extract_where;
use super::state::GameState;
use crate::tuning::Tuning;

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerUpKind {
    Heal,
    Shield,
    Laser,
    /// Invincible shield
    ShieldPlus,
    TimeSlow,
    Nuke,
    MultiShot,
}

impl PowerUpKind {
    pub const BASIC: [PowerUpKind; 2] = [PowerUpKind::Heal, PowerUpKind::Shield];
    pub const PREMIUM: [PowerUpKind; 5] = [
        PowerUpKind::Laser,
        PowerUpKind::ShieldPlus,
        PowerUpKind::TimeSlow,
        PowerUpKind::Nuke,
        PowerUpKind::MultiShot,
    ];

    pub fn is_premium(&self) -> bool {
        !matches!(self, PowerUpKind::Heal | PowerUpKind::Shield)
    }

    /// Buff length in ticks; `None` for instantaneous effects
    pub fn duration(&self, tuning: &Tuning) -> Option<u32> {
        match self {
            PowerUpKind::Laser => Some(tuning.laser_ticks),
            PowerUpKind::ShieldPlus => Some(tuning.shield_plus_ticks),
            PowerUpKind::TimeSlow => Some(tuning.time_slow_ticks),
            PowerUpKind::MultiShot => Some(tuning.multi_shot_ticks),
            PowerUpKind::Heal | PowerUpKind::Shield | PowerUpKind::Nuke => None,
        }
    }

    /// Toast shown on pickup
    pub fn pickup_message(&self) -> &'static str {
        match self {
            PowerUpKind::Heal => "Health Restored!",
            PowerUpKind::Shield => "Shield Activated!",
            PowerUpKind::Laser => "LASER MODE ACTIVATED!",
            PowerUpKind::ShieldPlus => "INVINCIBLE SHIELD!",
            PowerUpKind::TimeSlow => "TIME SLOW ACTIVATED!",
            PowerUpKind::Nuke => "NUKE DETONATED!",
            PowerUpKind::MultiShot => "MULTI-SHOT MODE!",
        }
    }
}

/// A running timed buff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub started_tick: u64,
    pub duration: u32,
}

impl ActivePowerUp {
    pub fn is_expired(&self, now: u64) -> bool {
        now.saturating_sub(self.started_tick) >= self.duration as u64
    }

    /// Ticks left before expiry
    pub fn remaining(&self, now: u64) -> u64 {
        (self.duration as u64).saturating_sub(now.saturating_sub(self.started_tick))
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffects {
    entries: Vec<ActivePowerUp>,
}

impl ActiveEffects {
    /// Start a buff. Returns false (and changes nothing) if one is running.
    pub fn activate(&mut self, kind: PowerUpKind, now: u64, duration: u32) -> bool {
        if self.is_active(kind) {
            return false;
        }
        self.entries.push(ActivePowerUp {
            kind,
            started_tick: now,
            duration,
        });
        true
    }

    /// Drop every buff whose duration has elapsed
    pub fn expire(&mut self, now: u64) -> Vec<PowerUpKind> {
        extract_where(&mut self.entries, |e| e.is_expired(now))
            .into_iter()
            .map(|e| e.kind)
            .collect()
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.entries.iter().any(|e| e.kind == kind)
    }

    pub fn get(&self, kind: PowerUpKind) -> Option<&ActivePowerUp> {
        self.entries.iter().find(|e| e.kind == kind)
    }

    pub fn entries(&self) -> &[ActivePowerUp] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Vertical speed multiplier for enemies
    pub fn enemy_speed_factor(&self, tuning: &Tuning) -> f32 {
        if self.is_active(PowerUpKind::TimeSlow) {
            tuning.time_slow_factor
        } else {
            1.0
        }
    }
}

/// Apply a collected pickup to the game
pub fn apply_power_up(state: &mut GameState, kind: PowerUpKind) {
    match kind {
        PowerUpKind::Heal => {
            state.player.lives = state.player.lives.saturating_add(1);
            state.sound(SoundCue::Regen);
        }
        PowerUpKind::Shield => {
            state.player.shield = true;
            state.sound(SoundCue::Shield);
        }
        PowerUpKind::Nuke => detonate_nuke(state),
        timed => {
            if let Some(duration) = timed.duration(&state.tuning) {
                let now = state.time_ticks;
                if !state.effects.activate(timed, now, duration) {
                    log::debug!("{:?} already active, pickup ignored", timed);
                }
            }
        }
    }
    state.notify(kind.pickup_message(), NotifyKind::PowerUp);
}

/// Destroy every enemy (scored) and hit every boss for a flat amount
fn detonate_nuke(state: &mut GameState) {
    let enemies = std::mem::take(&mut state.entities.enemies);
    for enemy in &enemies {
        state.reward_enemy_kill(enemy);
    }

    let damage = state.tuning.nuke_boss_damage;
    for boss in &mut state.entities.bosses {
        boss.damage(damage);
    }
    let defeated = extract_where(&mut state.entities.bosses, |b| b.health == 0);
    for boss in &defeated {
        state.reward_boss_kill(boss);
    }
    log::debug!("Nuke destroyed {} enemies and {} bosses", enemies.len(), defeated.len());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::archetypes::{BOSS_ARCHETYPES, ENEMY_ARCHETYPES};
    use crate::sim::state::{Boss, Enemy};
    use glam::Vec2;

    fn running_state() -> GameState {
        let mut state = GameState::new(3, Tuning::default(), false);
        state.start();
        state
    }

    #[test]
    fn test_activate_is_idempotent() {
        let mut fx = ActiveEffects::default();
        assert!(fx.activate(PowerUpKind::ShieldPlus, 10, 900));
        assert!(!fx.activate(PowerUpKind::ShieldPlus, 50, 900));
        assert_eq!(fx.len(), 1);
        assert_eq!(fx.get(PowerUpKind::ShieldPlus).unwrap().started_tick, 10);
    }

    #[test]
    fn test_expire_at_exact_duration() {
        let mut fx = ActiveEffects::default();
        fx.activate(PowerUpKind::Laser, 100, 600);
        fx.activate(PowerUpKind::TimeSlow, 100, 480);
        assert!(fx.expire(579).is_empty());
        assert_eq!(fx.expire(580), vec![PowerUpKind::TimeSlow]);
        assert!(fx.is_active(PowerUpKind::Laser));
        assert_eq!(fx.get(PowerUpKind::Laser).unwrap().remaining(600), 100);
        fx.expire(700);
        assert!(fx.is_empty());
    }

    #[test]
    fn test_time_slow_factor() {
        let tuning = Tuning::default();
        let mut fx = ActiveEffects::default();
        assert_eq!(fx.enemy_speed_factor(&tuning), 1.0);
        fx.activate(PowerUpKind::TimeSlow, 0, 480);
        assert_eq!(fx.enemy_speed_factor(&tuning), 0.3);
    }

    #[test]
    fn test_instant_effects_not_tracked() {
        let mut state = running_state();
        let lives = state.player.lives;
        apply_power_up(&mut state, PowerUpKind::Heal);
        apply_power_up(&mut state, PowerUpKind::Shield);
        assert_eq!(state.player.lives, lives + 1);
        assert!(state.player.shield);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_premium_classification() {
        assert!(PowerUpKind::BASIC.iter().all(|k| !k.is_premium()));
        assert!(PowerUpKind::PREMIUM.iter().all(|k| k.is_premium()));
    }

    #[test]
    fn test_nuke_scores_enemies_and_damages_bosses() {
        let mut state = running_state();
        for (i, params) in ENEMY_ARCHETYPES[..2].iter().enumerate() {
            let id = state.entities.next_entity_id();
            state
                .entities
                .enemies
                .push(Enemy::new(id, i as u8, params, Vec2::new(100.0, 100.0)));
        }
        let id = state.entities.next_entity_id();
        let tuning = state.tuning.clone();
        state
            .entities
            .bosses
            .push(Boss::regular(id, 0, &BOSS_ARCHETYPES[0], 1, &tuning));

        apply_power_up(&mut state, PowerUpKind::Nuke);

        assert!(state.entities.enemies.is_empty());
        assert_eq!(state.economy.score, 30);
        assert_eq!(state.economy.coins, 3);
        // 50 + 10 health, 50 damage
        assert_eq!(state.entities.bosses[0].health, 10);
        assert!(state.effects.is_empty());
    }

    #[test]
    fn test_nuke_removes_bosses_it_kills() {
        let mut state = running_state();
        let id = state.entities.next_entity_id();
        let tuning = state.tuning.clone();
        let mut boss = Boss::regular(id, 0, &BOSS_ARCHETYPES[0], 1, &tuning);
        boss.health = 20;
        state.entities.bosses.push(boss);

        apply_power_up(&mut state, PowerUpKind::Nuke);

        assert!(state.entities.bosses.is_empty());
        assert_eq!(state.economy.score, tuning.boss_kill_score);
        assert_eq!(state.economy.coins, tuning.boss_kill_coins);
    }
}
