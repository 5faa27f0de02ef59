//! Data-driven game balance
//!
//! Every time value is expressed in simulation ticks and every speed in
//! pixels per tick, so pausing can never skew a timer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_LEVEL, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::secs_to_ticks;

/// Rejected tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// Game balance constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Playfield ===
    pub playfield_width: f32,
    pub playfield_height: f32,

    // === Player ===
    pub starting_lives: u32,
    pub player_radius: f32,
    pub player_speed: f32,
    /// Distance of the player from the bottom edge
    pub player_bottom_offset: f32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    /// Bullets per forward volley
    pub bullets_per_volley: u32,
    pub fire_cooldown_ticks: u32,
    /// Live player bullets allowed at once
    pub max_live_bullets: usize,

    // === Enemy spawning ===
    pub enemy_spawn_base_ticks: u32,
    pub enemy_spawn_wave_decay: u32,
    pub enemy_spawn_level_decay: u32,
    pub enemy_spawn_floor_ticks: u32,
    pub enemy_cap_base: u32,
    pub enemy_cap_max: u32,
    /// Horizontal margin kept free on either side when spawning
    pub spawn_margin: f32,
    /// Spawn height (negative = above the visible top edge)
    pub enemy_spawn_y: f32,

    // === Bosses ===
    pub boss_wave_cadence: u32,
    pub boss_health_per_level: u32,
    pub boss_base_size: f32,
    pub boss_y: f32,
    pub boss_kill_score: u64,
    pub boss_kill_coins: u64,
    pub ultimate_wave_cadence: u32,
    /// Ultimate boss only appears after this wave
    pub ultimate_min_wave: u32,
    pub ultimate_base_health: u32,
    pub ultimate_health_per_level: u32,
    pub ultimate_scale: f32,
    pub ultimate_speed: f32,
    pub ultimate_fire_rate: u32,
    pub fireball_speed: f32,
    pub fireball_radius: f32,

    // === Power-ups ===
    pub power_up_gate_ticks: u32,
    pub power_up_chance: f64,
    pub power_up_fall_speed: f32,
    pub power_up_radius: f32,
    /// Level from which premium pickups drop for everyone
    pub premium_power_up_level: u32,
    pub laser_ticks: u32,
    pub shield_plus_ticks: u32,
    pub time_slow_ticks: u32,
    pub multi_shot_ticks: u32,
    pub time_slow_factor: f32,
    pub nuke_boss_damage: u32,
    pub laser_half_width: f32,
    /// Ticks between laser damage pulses
    pub laser_interval: u32,

    // === Progression ===
    pub wave_interval_ticks: u32,
    pub waves_per_level: u32,
    pub max_level: u32,
    pub level_transition_ticks: u32,
    pub level_bonus_coins: u64,
    pub rapid_fire_wave_every: u32,
    pub boss_rush_wave_every: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            starting_lives: 4,
            player_radius: 30.0,
            player_speed: 8.0,
            player_bottom_offset: 100.0,
            bullet_speed: 12.0,
            bullet_size: 4.0,
            bullets_per_volley: 3,
            fire_cooldown_ticks: secs_to_ticks(0.25),
            max_live_bullets: 120,

            // 2s base, -100ms per wave, -50ms per level, 800ms floor
            enemy_spawn_base_ticks: secs_to_ticks(2.0),
            enemy_spawn_wave_decay: 6,
            enemy_spawn_level_decay: 3,
            enemy_spawn_floor_ticks: secs_to_ticks(0.8),
            enemy_cap_base: 3,
            enemy_cap_max: 8,
            spawn_margin: 30.0,
            enemy_spawn_y: -50.0,

            boss_wave_cadence: 5,
            boss_health_per_level: 10,
            boss_base_size: 120.0,
            boss_y: 30.0,
            boss_kill_score: 100,
            boss_kill_coins: 10,
            ultimate_wave_cadence: 15,
            ultimate_min_wave: 5,
            ultimate_base_health: 300,
            ultimate_health_per_level: 20,
            ultimate_scale: 2.0,
            ultimate_speed: 0.8,
            ultimate_fire_rate: 20,
            fireball_speed: 4.0,
            fireball_radius: 8.0,

            power_up_gate_ticks: secs_to_ticks(10.0),
            power_up_chance: 0.3,
            power_up_fall_speed: 2.0,
            power_up_radius: 15.0,
            premium_power_up_level: 3,
            laser_ticks: secs_to_ticks(10.0),
            shield_plus_ticks: secs_to_ticks(15.0),
            time_slow_ticks: secs_to_ticks(8.0),
            multi_shot_ticks: secs_to_ticks(12.0),
            time_slow_factor: 0.3,
            nuke_boss_damage: 50,
            laser_half_width: 10.0,
            laser_interval: 6,

            wave_interval_ticks: secs_to_ticks(30.0),
            waves_per_level: 10,
            max_level: MAX_LEVEL,
            level_transition_ticks: secs_to_ticks(1.5),
            level_bonus_coins: 25,
            rapid_fire_wave_every: 7,
            boss_rush_wave_every: 9,
        }
    }
}

impl Tuning {
    /// Parse and validate a tuning file. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would stall or divide the simulation by zero
    pub fn validate(&self) -> Result<(), TuningError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), TuningError> {
            Err(TuningError::Invalid { field, reason })
        }

        let floats = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("player_bottom_offset", self.player_bottom_offset),
            ("bullet_speed", self.bullet_speed),
            ("bullet_size", self.bullet_size),
            ("spawn_margin", self.spawn_margin),
            ("enemy_spawn_y", self.enemy_spawn_y),
            ("boss_base_size", self.boss_base_size),
            ("boss_y", self.boss_y),
            ("ultimate_scale", self.ultimate_scale),
            ("ultimate_speed", self.ultimate_speed),
            ("fireball_speed", self.fireball_speed),
            ("fireball_radius", self.fireball_radius),
            ("power_up_fall_speed", self.power_up_fall_speed),
            ("power_up_radius", self.power_up_radius),
            ("time_slow_factor", self.time_slow_factor),
            ("laser_half_width", self.laser_half_width),
        ];
        if let Some((field, _)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return invalid(*field, "must be a finite number");
        }
        if self.playfield_width <= self.spawn_margin * 2.0 {
            return invalid("playfield_width", "must exceed twice the spawn margin");
        }
        if self.playfield_height <= self.player_bottom_offset {
            return invalid("playfield_height", "must exceed the player bottom offset");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        if self.wave_interval_ticks == 0 {
            return invalid("wave_interval_ticks", "must be non-zero");
        }
        if self.waves_per_level == 0 {
            return invalid("waves_per_level", "must be non-zero");
        }
        if self.boss_wave_cadence == 0 || self.ultimate_wave_cadence == 0 {
            return invalid("boss_wave_cadence", "boss cadences must be non-zero");
        }
        if self.rapid_fire_wave_every == 0 || self.boss_rush_wave_every == 0 {
            return invalid("rapid_fire_wave_every", "milestone cadences must be non-zero");
        }
        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return invalid("max_level", "must be between 1 and 50");
        }
        if !(0.0..=1.0).contains(&self.power_up_chance) {
            return invalid("power_up_chance", "must be a probability");
        }
        if self.enemy_spawn_floor_ticks == 0 || self.power_up_gate_ticks == 0 {
            return invalid("enemy_spawn_floor_ticks", "spawn gates must be non-zero");
        }
        if self.laser_interval == 0 {
            return invalid("laser_interval", "must be non-zero");
        }
        if !(0.0..=1.0).contains(&self.time_slow_factor) {
            return invalid("time_slow_factor", "must be between 0 and 1");
        }
        Ok(())
    }

    /// Enemy spawn interval for the given wave and level
    pub fn enemy_spawn_interval(&self, wave: u32, level: u32) -> u32 {
        self.enemy_spawn_base_ticks
            .saturating_sub(wave.saturating_mul(self.enemy_spawn_wave_decay))
            .saturating_sub(level.saturating_mul(self.enemy_spawn_level_decay))
            .max(self.enemy_spawn_floor_ticks)
    }

    /// Maximum concurrent enemies for the given wave and level
    pub fn enemy_cap(&self, wave: u32, level: u32) -> usize {
        (self.enemy_cap_base + wave / 3 + level / 2).min(self.enemy_cap_max) as usize
    }

    /// Player's resting y coordinate
    pub fn player_y(&self) -> f32 {
        self.playfield_height - self.player_bottom_offset
    }
}
