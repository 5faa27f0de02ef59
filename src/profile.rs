//! Player profile and level entitlement
//!
//! The profile is owned by the account layer and handed to the core as
//! read-only configuration when a session starts.

use serde::{Deserialize, Serialize};

use crate::consts::FREE_LEVELS;

/// Player profile record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    /// Active subscription unlocks levels past the free tier
    #[serde(default)]
    pub subscription: bool,
    /// Avatar image reference (opaque to the core)
    #[serde(default)]
    pub avatar: Option<String>,
}

impl PlayerProfile {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn subscribed(mut self) -> Self {
        self.subscription = true;
        self
    }
}

/// Decides whether progression may advance to a level.
///
/// Called synchronously from inside a tick, so implementations must not block.
pub trait Entitlement {
    fn allows(&self, level: u32) -> bool;
}

impl<F> Entitlement for F
where
    F: Fn(u32) -> bool,
{
    fn allows(&self, level: u32) -> bool {
        self(level)
    }
}

/// Free tier plus subscription flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionEntitlement {
    pub free_levels: u32,
    pub subscribed: bool,
}

impl SubscriptionEntitlement {
    pub fn for_profile(profile: &PlayerProfile) -> Self {
        Self {
            free_levels: FREE_LEVELS,
            subscribed: profile.subscription,
        }
    }
}

impl Entitlement for SubscriptionEntitlement {
    fn allows(&self, level: u32) -> bool {
        level <= self.free_levels || self.subscribed
    }
}
