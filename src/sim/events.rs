//! Events raised during a tick for the presentation collaborators
//!
//! The simulation only queues these; the session drains them once per update
//! and routes them to the UI, audio and render hooks.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::EntityId;

/// Category of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotifyKind {
    LevelComplete,
    /// Level locked behind the entitlement check
    Locked,
    Milestone,
    Boss,
    PowerUp,
    Purchase,
    Failure,
}

/// Named audio cue (playback is the audio layer's job)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SoundCue {
    Shoot,
    Hit,
    Shield,
    Regen,
    BossIntro,
    Purchase,
    GameOver,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Shoot => "shoot",
            SoundCue::Hit => "hit",
            SoundCue::Shield => "shield",
            SoundCue::Regen => "regen",
            SoundCue::BossIntro => "boss_intro",
            SoundCue::Purchase => "purchase",
            SoundCue::GameOver => "game_over",
        }
    }
}

/// Something the outside world should hear about
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Notify { message: String, kind: NotifyKind },
    Sound(SoundCue),
    EnemyKilled { id: EntityId, pos: Vec2, points: u64 },
    BossDefeated { id: EntityId, pos: Vec2 },
    GameOver { score: u64, level: u32 },
}
