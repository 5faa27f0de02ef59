//! Dino Warfare - A wave-based arcade shooter simulation core
//!
//! Core modules:
//! - `sim`: Deterministic fixed-step simulation (spawning, collisions, progression)
//! - `session`: Command surface and outbound hooks for UI/audio/render collaborators
//! - `tuning`: Data-driven game balance
//! - `shop`: Coin shop catalog and purchases
//! - `profile`: Player profile and level entitlement
//! - `highscores`: Top-10 leaderboard

pub mod highscores;
pub mod profile;
pub mod session;
pub mod shop;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use profile::{Entitlement, PlayerProfile, SubscriptionEntitlement};
pub use session::{GameHooks, NoHooks, Session};
pub use shop::{PurchaseError, ShopCatalog, ShopEffect, ShopItem};
pub use tuning::{Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate (display refresh cadence)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;

    /// Default playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 960.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Hard ceiling on the level counter
    pub const MAX_LEVEL: u32 = 50;
    /// Levels playable without a subscription
    pub const FREE_LEVELS: u32 = 3;
}

/// Convert a duration in seconds to whole simulation ticks
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs * consts::TICKS_PER_SECOND as f32).round().max(0.0) as u32
}

/// True when two circles overlap (touching does not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance_squared(b) < (ra + rb) * (ra + rb)
}
