//! Game state and core simulation types
//!
//! Everything one session needs lives in `GameState`; there are no
//! free-floating counters or flags anywhere else.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::archetypes::{BossArchetype, EnemyArchetype, ULTIMATE_BOSS_NAME, BOSS_ARCHETYPES};
use super::effects::ActiveEffects;
use super::events::{GameEvent, NotifyKind, SoundCue};
use super::progression::Progression;
use super::registry::EntityRegistry;
use super::spawner::SpawnTimers;
use crate::tuning::Tuning;

pub type EntityId = u32;

/// Session status. Exactly one applies at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionStatus {
    #[default]
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// The player's craft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Horizontal speed in pixels per tick
    pub speed: f32,
    /// Ticks until the next volley may fire
    pub fire_cooldown: u32,
    /// Fire input held this tick (drives the laser beam)
    pub firing: bool,
    /// One-shot shield
    pub shield: bool,
    pub lives: u32,
    pub bullet_speed: f32,
    pub bullet_size: f32,
    pub bullets_per_volley: u32,
    pub diagonal_shots: bool,
    pub piercing_shots: bool,
}

impl Player {
    pub fn new(tuning: &Tuning, subscribed: bool) -> Self {
        let mut player = Self {
            pos: Vec2::new(tuning.playfield_width / 2.0, tuning.player_y()),
            radius: tuning.player_radius,
            speed: tuning.player_speed,
            fire_cooldown: 0,
            firing: false,
            shield: false,
            lives: tuning.starting_lives,
            bullet_speed: tuning.bullet_speed,
            bullet_size: tuning.bullet_size,
            bullets_per_volley: tuning.bullets_per_volley,
            diagonal_shots: false,
            piercing_shots: false,
        };
        // Subscriber perks
        if subscribed {
            player.speed += 2.0;
            player.bullet_speed += 3.0;
            player.bullets_per_volley += 1;
        }
        player
    }

    /// Keep the craft fully inside the playfield
    pub fn clamp_to(&mut self, width: f32) {
        let min_x = self.radius.max(0.0);
        let max_x = (width - min_x).max(min_x);
        self.pos.x = self.pos.x.clamp(min_x, max_x);
    }
}

/// A descending enemy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    /// Index into the enemy archetype table
    pub archetype: u8,
    pub pos: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub points: u64,
    pub health: u32,
    pub max_health: u32,
}

impl Enemy {
    pub fn new(id: EntityId, archetype: u8, params: &EnemyArchetype, pos: Vec2) -> Self {
        Self {
            id,
            archetype,
            pos,
            speed: params.speed,
            radius: params.radius,
            points: params.points,
            health: params.health,
            max_health: params.health,
        }
    }

    pub fn name(&self) -> &'static str {
        EnemyArchetype::get(self.archetype).map_or("Unknown", |a| a.name)
    }

    /// Apply damage; returns true when this hit killed the enemy
    pub fn damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        was_alive && self.health == 0
    }
}

/// Regular bosses appear on the short cadence; the ultimate one on the long one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossTier {
    Regular { archetype: u8 },
    Ultimate,
}

/// A patrolling, fireball-spitting boss. `pos` is the top-left of its box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub id: EntityId,
    pub tier: BossTier,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub health: u32,
    pub max_health: u32,
    pub speed: f32,
    /// Patrol direction (+1 right, -1 left)
    pub direction: f32,
    pub fire_cooldown: u32,
    pub fire_rate: u32,
}

impl Boss {
    pub fn regular(id: EntityId, archetype: u8, params: &BossArchetype, level: u32, tuning: &Tuning) -> Self {
        let size = tuning.boss_base_size * params.scale;
        let health = params.health + level.saturating_mul(tuning.boss_health_per_level);
        Self {
            id,
            tier: BossTier::Regular { archetype },
            pos: Vec2::new(tuning.playfield_width / 2.0 - size / 2.0, tuning.boss_y),
            width: size,
            height: size,
            health,
            max_health: health,
            speed: params.speed,
            direction: 1.0,
            fire_cooldown: 0,
            fire_rate: params.fire_rate,
        }
    }

    pub fn ultimate(id: EntityId, level: u32, tuning: &Tuning) -> Self {
        let size = tuning.boss_base_size * tuning.ultimate_scale;
        let health = tuning.ultimate_base_health + level.saturating_mul(tuning.ultimate_health_per_level);
        Self {
            id,
            tier: BossTier::Ultimate,
            pos: Vec2::new(tuning.playfield_width / 2.0 - size / 2.0, tuning.boss_y),
            width: size,
            height: size,
            health,
            max_health: health,
            speed: tuning.ultimate_speed,
            direction: 1.0,
            fire_cooldown: 0,
            fire_rate: tuning.ultimate_fire_rate,
        }
    }

    pub fn name(&self) -> &'static str {
        match self.tier {
            BossTier::Regular { archetype } => BOSS_ARCHETYPES
                .get(archetype as usize)
                .map_or("Mother Dino", |b| b.name),
            BossTier::Ultimate => ULTIMATE_BOSS_NAME,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Circle used for hit tests
    pub fn hit_radius(&self) -> f32 {
        self.width.max(self.height) / 2.0
    }

    /// Health bar fill (0-1)
    pub fn health_ratio(&self) -> f32 {
        if self.max_health == 0 {
            0.0
        } else {
            self.health as f32 / self.max_health as f32
        }
    }

    pub fn damage(&mut self, amount: u32) -> bool {
        let was_alive = self.health > 0;
        self.health = self.health.saturating_sub(amount);
        was_alive && self.health == 0
    }
}

/// Which side fired a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Boss,
}

/// Flight pattern of a projectile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Straight away from the owner (up for the player, down for bosses)
    Straight { speed: f32 },
    /// Purchased diagonal shot
    Angled(Vec2),
    /// One ray of the multi-shot fan
    Spread(Vec2),
}

/// A bullet or fireball
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub owner: Owner,
    pub kind: ProjectileKind,
    pub pos: Vec2,
    pub radius: f32,
    pub damage: u32,
    /// Passes through enemies instead of being consumed
    pub piercing: bool,
    /// Enemies a piercing projectile already damaged
    #[serde(skip)]
    pub hits: Vec<EntityId>,
}

impl Projectile {
    pub fn new(id: EntityId, owner: Owner, kind: ProjectileKind, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            owner,
            kind,
            pos,
            radius,
            damage: 1,
            piercing: false,
            hits: Vec::new(),
        }
    }

    /// Velocity in pixels per tick
    pub fn velocity(&self) -> Vec2 {
        match self.kind {
            ProjectileKind::Straight { speed } => match self.owner {
                Owner::Player => Vec2::new(0.0, -speed),
                Owner::Boss => Vec2::new(0.0, speed),
            },
            ProjectileKind::Angled(vel) | ProjectileKind::Spread(vel) => vel,
        }
    }

    pub fn advance(&mut self) {
        self.pos += self.velocity();
    }
}

/// A falling power-up pickup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    pub id: EntityId,
    pub kind: super::effects::PowerUpKind,
    pub pos: Vec2,
    pub radius: f32,
    pub fall_speed: f32,
}

/// Score and coin purse
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub score: u64,
    pub coins: u64,
}

impl Economy {
    /// Kill reward: full points, a tenth as coins
    pub fn award_kill(&mut self, points: u64) {
        self.score = self.score.saturating_add(points);
        self.coins = self.coins.saturating_add(points / 10);
    }

    pub fn award(&mut self, score: u64, coins: u64) {
        self.score = self.score.saturating_add(score);
        self.coins = self.coins.saturating_add(coins);
    }

    /// Spend coins if affordable
    pub fn spend(&mut self, cost: u64) -> bool {
        if self.coins < cost {
            return false;
        }
        self.coins -= cost;
        true
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Profile subscription flag, fixed for the session
    pub subscribed: bool,
    pub status: SessionStatus,
    /// Shop overlay; only reachable while running and freezes the simulation
    pub shop_open: bool,
    /// Ticks simulated while running (the clock every timer uses)
    pub time_ticks: u64,
    pub player: Player,
    pub entities: EntityRegistry,
    pub effects: ActiveEffects,
    pub progression: Progression,
    pub economy: Economy,
    pub spawn_timers: SpawnTimers,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh, not yet started game state
    pub fn new(seed: u64, tuning: Tuning, subscribed: bool) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: Player::new(&tuning, subscribed),
            tuning,
            subscribed,
            status: SessionStatus::NotStarted,
            shop_open: false,
            time_ticks: 0,
            entities: EntityRegistry::default(),
            effects: ActiveEffects::default(),
            progression: Progression::default(),
            economy: Economy::default(),
            spawn_timers: SpawnTimers::default(),
            events: Vec::new(),
        }
    }

    /// Reset every counter and collection and begin running
    pub fn start(&mut self) {
        let tuning = self.tuning.clone();
        *self = Self::new(self.seed, tuning, self.subscribed);
        self.status = SessionStatus::Running;
        log::info!("Session started (seed {})", self.seed);
    }

    /// True when the simulation should advance this tick
    pub fn is_simulating(&self) -> bool {
        self.status == SessionStatus::Running && !self.shop_open
    }

    pub fn pause(&mut self) {
        if self.status == SessionStatus::Running {
            self.status = SessionStatus::Paused;
            self.shop_open = false;
        }
    }

    pub fn resume(&mut self) {
        match self.status {
            SessionStatus::Paused => self.status = SessionStatus::Running,
            SessionStatus::Running => self.shop_open = false,
            _ => {}
        }
    }

    /// Open/close the shop. Ignored unless running.
    pub fn toggle_shop(&mut self) {
        if self.status == SessionStatus::Running {
            self.shop_open = !self.shop_open;
        }
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn notify(&mut self, message: impl Into<String>, kind: NotifyKind) {
        self.events.push(GameEvent::Notify {
            message: message.into(),
            kind,
        });
    }

    pub fn sound(&mut self, cue: SoundCue) {
        self.events.push(GameEvent::Sound(cue));
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Score a destroyed enemy and signal its explosion
    pub fn reward_enemy_kill(&mut self, enemy: &Enemy) {
        self.economy.award_kill(enemy.points);
        self.emit(GameEvent::EnemyKilled {
            id: enemy.id,
            pos: enemy.pos,
            points: enemy.points,
        });
        self.sound(SoundCue::Hit);
    }

    /// Fixed boss bounty
    pub fn reward_boss_kill(&mut self, boss: &Boss) {
        self.economy
            .award(self.tuning.boss_kill_score, self.tuning.boss_kill_coins);
        self.emit(GameEvent::BossDefeated {
            id: boss.id,
            pos: boss.center(),
        });
        self.sound(SoundCue::Hit);
        log::info!("{} defeated", boss.name());
    }

    /// Take one life; the last one ends the run
    pub fn lose_life(&mut self) {
        if self.status == SessionStatus::GameOver {
            return;
        }
        self.player.lives = self.player.lives.saturating_sub(1);
        if self.player.lives == 0 {
            self.status = SessionStatus::GameOver;
            self.shop_open = false;
            let score = self.economy.score;
            let level = self.progression.level;
            self.sound(SoundCue::GameOver);
            self.emit(GameEvent::GameOver { score, level });
            log::info!("Game over: score {} at level {}", score, level);
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.status == SessionStatus::GameOver
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_state() -> GameState {
        let mut state = GameState::new(7, Tuning::default(), false);
        state.start();
        state
    }

    #[test]
    fn test_new_state_not_started() {
        let state = GameState::new(1, Tuning::default(), false);
        assert_eq!(state.status, SessionStatus::NotStarted);
        assert!(!state.is_simulating());
        assert_eq!(state.player.lives, 4);
        assert_eq!(state.progression.level, 1);
        assert_eq!(state.progression.wave, 1);
    }

    #[test]
    fn test_subscriber_perks() {
        let t = Tuning::default();
        let free = Player::new(&t, false);
        let sub = Player::new(&t, true);
        assert_eq!(sub.speed, free.speed + 2.0);
        assert_eq!(sub.bullet_speed, free.bullet_speed + 3.0);
        assert_eq!(sub.bullets_per_volley, free.bullets_per_volley + 1);
    }

    #[test]
    fn test_pause_resume_and_shop() {
        let mut state = running_state();
        state.toggle_shop();
        assert!(state.shop_open);
        assert!(!state.is_simulating());
        assert_eq!(state.status, SessionStatus::Running);

        state.pause();
        assert_eq!(state.status, SessionStatus::Paused);
        assert!(!state.shop_open);

        // Shop unreachable while paused
        state.toggle_shop();
        assert!(!state.shop_open);

        state.resume();
        assert!(state.is_simulating());
    }

    #[test]
    fn test_lose_life_to_game_over() {
        let mut state = running_state();
        for _ in 0..4 {
            state.lose_life();
        }
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.status, SessionStatus::GameOver);
        assert!(state.events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));

        // Sticky, and lives never underflow
        state.lose_life();
        state.resume();
        state.toggle_shop();
        assert_eq!(state.player.lives, 0);
        assert_eq!(state.status, SessionStatus::GameOver);
        assert!(!state.shop_open);
    }

    #[test]
    fn test_start_resets_everything() {
        let mut state = running_state();
        state.economy.award(500, 50);
        state.player.shield = true;
        state.time_ticks = 999;
        state.start();
        assert_eq!(state.economy, Economy::default());
        assert!(!state.player.shield);
        assert_eq!(state.time_ticks, 0);
        assert_eq!(state.status, SessionStatus::Running);
    }

    #[test]
    fn test_enemy_damage_saturates() {
        let params = EnemyArchetype::get(1).copied().unwrap();
        let mut enemy = Enemy::new(1, 1, &params, Vec2::ZERO);
        assert!(!enemy.damage(1));
        assert!(enemy.damage(5));
        assert_eq!(enemy.health, 0);
        // Already dead: no second kill
        assert!(!enemy.damage(1));
    }

    #[test]
    fn test_economy_spend() {
        let mut econ = Economy::default();
        econ.award_kill(25);
        assert_eq!(econ.score, 25);
        assert_eq!(econ.coins, 2);
        assert!(!econ.spend(3));
        assert_eq!(econ.coins, 2);
        assert!(econ.spend(2));
        assert_eq!(econ.coins, 0);
    }

    #[test]
    fn test_projectile_velocity_by_owner() {
        let up = Projectile::new(1, Owner::Player, ProjectileKind::Straight { speed: 5.0 }, Vec2::ZERO, 2.0);
        let down = Projectile::new(2, Owner::Boss, ProjectileKind::Straight { speed: 5.0 }, Vec2::ZERO, 2.0);
        assert_eq!(up.velocity(), Vec2::new(0.0, -5.0));
        assert_eq!(down.velocity(), Vec2::new(0.0, 5.0));
    }
}
