//! Read-only view handed to the render layer each tick

use serde::Serialize;

use super::effects::ActivePowerUp;
use super::state::{Boss, Economy, Enemy, GameState, Pickup, Player, Projectile, SessionStatus};

/// Borrowed snapshot of everything drawable
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Snapshot<'a> {
    pub status: SessionStatus,
    pub shop_open: bool,
    pub time_ticks: u64,
    pub wave: u32,
    pub level: u32,
    pub transitioning: bool,
    pub economy: Economy,
    pub player: &'a Player,
    pub enemies: &'a [Enemy],
    pub bosses: &'a [Boss],
    pub bullets: &'a [Projectile],
    pub fireballs: &'a [Projectile],
    pub pickups: &'a [Pickup],
    pub effects: &'a [ActivePowerUp],
}

impl<'a> Snapshot<'a> {
    pub fn of(state: &'a GameState) -> Self {
        Self {
            status: state.status,
            shop_open: state.shop_open,
            time_ticks: state.time_ticks,
            wave: state.progression.wave,
            level: state.progression.level,
            transitioning: state.progression.is_transitioning(),
            economy: state.economy,
            player: &state.player,
            enemies: &state.entities.enemies,
            bosses: &state.entities.bosses,
            bullets: &state.entities.bullets,
            fireballs: &state.entities.fireballs,
            pickups: &state.entities.pickups,
            effects: state.effects.entries(),
        }
    }

    /// Laser beam is drawn while the buff is up and the trigger held
    pub fn laser_beam(&self) -> bool {
        self.player.firing
            && self
                .effects
                .iter()
                .any(|e| e.kind == super::effects::PowerUpKind::Laser)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_snapshot_mirrors_state() {
        let mut state = GameState::new(9, Tuning::default(), false);
        state.start();
        state.economy.score = 42;
        let snap = Snapshot::of(&state);
        assert_eq!(snap.status, SessionStatus::Running);
        assert_eq!(snap.economy.score, 42);
        assert_eq!(snap.wave, 1);
        assert!(!snap.laser_beam());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(9, Tuning::default(), false);
        state.start();
        let json = Snapshot::of(&state).to_json().unwrap();
        assert!(json.contains("\"status\":\"Running\""));
        assert!(json.contains("\"lives\":4"));
    }
}
