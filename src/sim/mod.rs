//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, timers counted in ticks
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, audio or platform dependencies

pub mod archetypes;
pub mod collision;
pub mod effects;
pub mod events;
pub mod progression;
pub mod registry;
pub mod snapshot;
pub mod spawner;
pub mod state;
pub mod tick;

pub use archetypes::{BOSS_ARCHETYPES, BossArchetype, ENEMY_ARCHETYPES, EnemyArchetype};
pub use effects::{ActiveEffects, ActivePowerUp, PowerUpKind, apply_power_up};
pub use events::{GameEvent, NotifyKind, SoundCue};
pub use progression::{Milestone, Phase, Progression, level_theme};
pub use registry::EntityRegistry;
pub use snapshot::Snapshot;
pub use state::{
    Boss, BossTier, Economy, Enemy, EntityId, GameState, Owner, Pickup, Player, Projectile,
    ProjectileKind, SessionStatus,
};
pub use tick::{MoveIntent, TickInput, shoot, tick};
