//! Wave clock and level progression
//!
//! Waves advance on a fixed tick cadence. Every `waves_per_level` waves the
//! controller asks the entitlement predicate for the next level; granted
//! levels open a short transition that wipes the board.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::events::NotifyKind;
use super::state::GameState;
use crate::consts::FREE_LEVELS;
use crate::profile::Entitlement;

/// Wave-boundary triggers, each allowed once per wave value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Milestone {
    LevelUp,
    RapidFire,
    BossRush,
}

/// Last wave each milestone fired on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestones {
    last_fired: BTreeMap<Milestone, u32>,
}

impl Milestones {
    /// Mark `milestone` as fired for `wave`. False if it already fired for it.
    pub fn try_fire(&mut self, milestone: Milestone, wave: u32) -> bool {
        if self.last_fired.get(&milestone) == Some(&wave) {
            return false;
        }
        self.last_fired.insert(milestone, wave);
        true
    }

    pub fn last_fired(&self, milestone: Milestone) -> Option<u32> {
        self.last_fired.get(&milestone).copied()
    }
}

/// Progression phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Normal,
    /// Spawning and collisions suspended while the countdown runs
    Transitioning { ticks_left: u32 },
}

/// Wave/level counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub wave: u32,
    pub level: u32,
    /// Ticks accumulated toward the next wave
    pub wave_clock: u32,
    pub phase: Phase,
    pub milestones: Milestones,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            wave: 1,
            level: 1,
            wave_clock: 0,
            phase: Phase::Normal,
            milestones: Milestones::default(),
        }
    }
}

impl Progression {
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Transitioning { .. })
    }
}

const LEVEL_THEMES: [&str; 11] = [
    "Love",
    "Joy",
    "Peace",
    "Patience",
    "Kindness",
    "Goodness",
    "Faithfulness",
    "Gentleness",
    "Self-Control",
    "Faith",
    "Hope",
];

/// Display name for a level; themes repeat in numbered cycles
pub fn level_theme(level: u32) -> String {
    let index = level.saturating_sub(1) as usize;
    let theme = LEVEL_THEMES[index % LEVEL_THEMES.len()];
    let cycle = index / LEVEL_THEMES.len() + 1;
    if cycle > 1 {
        format!("{} (Cycle {})", theme, cycle)
    } else {
        theme.to_string()
    }
}

/// Run the progression step for one tick
pub fn advance(state: &mut GameState, entitlement: &dyn Entitlement) {
    if let Phase::Transitioning { ticks_left } = state.progression.phase {
        let ticks_left = ticks_left.saturating_sub(1);
        if ticks_left > 0 {
            state.progression.phase = Phase::Transitioning { ticks_left };
            return;
        }
        state.progression.phase = Phase::Normal;
        log::debug!("Level {} transition finished", state.progression.level);
    }

    advance_wave_clock(state);
    check_level_up(state, entitlement);
    if !state.progression.is_transitioning() {
        check_wave_milestones(state);
    }
}

fn advance_wave_clock(state: &mut GameState) {
    let progression = &mut state.progression;
    progression.wave_clock += 1;
    if progression.wave_clock >= state.tuning.wave_interval_ticks {
        progression.wave_clock = 0;
        progression.wave = progression.wave.saturating_add(1);
        log::debug!("Wave {}", progression.wave);
    }
}

fn check_level_up(state: &mut GameState, entitlement: &dyn Entitlement) {
    let wave = state.progression.wave;
    if wave == 0 || wave % state.tuning.waves_per_level.max(1) != 0 {
        return;
    }
    // Consumed whatever the outcome, so a denial is retried only on the next boundary
    if !state.progression.milestones.try_fire(Milestone::LevelUp, wave) {
        return;
    }

    let next_level = (state.progression.level + 1).min(state.tuning.max_level);
    if !entitlement.allows(next_level) {
        log::info!("Level {} locked at wave {}", next_level, wave);
        state.notify(
            format!("Subscribe to continue to Level {}", next_level),
            NotifyKind::Locked,
        );
        return;
    }

    state.progression.phase = Phase::Transitioning {
        ticks_left: state.tuning.level_transition_ticks.max(1),
    };
    state.progression.level = next_level;
    state.entities.clear_hostiles();

    let bonus = state.tuning.level_bonus_coins.saturating_mul(next_level as u64);
    state.economy.coins = state.economy.coins.saturating_add(bonus);

    log::info!("Level {} reached at wave {} (+{} coins)", next_level, wave, bonus);
    state.notify(
        format!("LEVEL {}: {} COMPLETE! +{} coins", next_level, level_theme(next_level), bonus),
        NotifyKind::LevelComplete,
    );
    if next_level == FREE_LEVELS + 1 {
        state.notify(
            "Free trial completed! Subscribe for unlimited access!",
            NotifyKind::LevelComplete,
        );
    }
}

fn check_wave_milestones(state: &mut GameState) {
    let wave = state.progression.wave;
    if wave <= 1 {
        return;
    }

    if wave % state.tuning.rapid_fire_wave_every.max(1) == 0
        && state.progression.milestones.try_fire(Milestone::RapidFire, wave)
    {
        state.notify("RAPID FIRE WAVE - Enemies spawn faster!", NotifyKind::Milestone);
    }

    if wave % state.tuning.boss_rush_wave_every.max(1) == 0
        && state.progression.milestones.try_fire(Milestone::BossRush, wave)
    {
        state.notify("BOSS RUSH - Multiple bosses may appear!", NotifyKind::Milestone);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::events::GameEvent;
    use crate::tuning::Tuning;

    fn running_state() -> GameState {
        let mut state = GameState::new(11, Tuning::default(), false);
        state.start();
        state
    }

    fn notifications(state: &GameState, kind: NotifyKind) -> usize {
        state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Notify { kind: k, .. } if *k == kind))
            .count()
    }

    #[test]
    fn test_wave_advances_on_interval() {
        let mut state = running_state();
        let allow = |_: u32| true;
        for _ in 0..1799 {
            advance(&mut state, &allow);
        }
        assert_eq!(state.progression.wave, 1);
        advance(&mut state, &allow);
        assert_eq!(state.progression.wave, 2);
        assert_eq!(state.progression.wave_clock, 0);
    }

    #[test]
    fn test_level_up_enters_transition() {
        let mut state = running_state();
        state.progression.wave = 10;
        advance(&mut state, &|_: u32| true);
        assert_eq!(state.progression.level, 2);
        assert!(state.progression.is_transitioning());
        assert_eq!(state.economy.coins, 50);
        assert_eq!(notifications(&state, NotifyKind::LevelComplete), 1);

        for _ in 0..89 {
            advance(&mut state, &|_: u32| true);
        }
        assert!(state.progression.is_transitioning());
        advance(&mut state, &|_: u32| true);
        assert!(!state.progression.is_transitioning());
    }

    #[test]
    fn test_denied_level_fires_once_per_wave() {
        let mut state = running_state();
        state.progression.wave = 10;
        for _ in 0..5 {
            advance(&mut state, &|_: u32| false);
        }
        assert_eq!(state.progression.level, 1);
        assert!(!state.progression.is_transitioning());
        assert_eq!(notifications(&state, NotifyKind::Locked), 1);
        assert_eq!(state.progression.milestones.last_fired(Milestone::LevelUp), Some(10));
    }

    #[test]
    fn test_level_saturates_at_max() {
        let mut state = running_state();
        state.progression.level = state.tuning.max_level;
        state.progression.wave = 20;
        advance(&mut state, &|_: u32| true);
        assert_eq!(state.progression.level, state.tuning.max_level);
    }

    #[test]
    fn test_free_trial_message_on_level_four() {
        let mut state = running_state();
        state.progression.level = 3;
        state.progression.wave = 30;
        advance(&mut state, &|_: u32| true);
        assert_eq!(state.progression.level, 4);
        assert_eq!(notifications(&state, NotifyKind::LevelComplete), 2);
    }

    #[test]
    fn test_milestones_once_per_wave() {
        let mut state = running_state();
        state.progression.wave = 63; // multiple of 7 and 9
        for _ in 0..10 {
            advance(&mut state, &|_: u32| true);
        }
        assert_eq!(notifications(&state, NotifyKind::Milestone), 2);
    }

    #[test]
    fn test_milestones_wait_for_transition() {
        let mut state = running_state();
        state.progression.wave = 70; // level-up and rapid fire share the wave
        advance(&mut state, &|_: u32| true);
        assert_eq!(notifications(&state, NotifyKind::Milestone), 0);
        for _ in 0..90 {
            advance(&mut state, &|_: u32| true);
        }
        assert_eq!(notifications(&state, NotifyKind::Milestone), 1);
    }

    #[test]
    fn test_level_theme_cycles() {
        assert_eq!(level_theme(1), "Love");
        assert_eq!(level_theme(11), "Hope");
        assert_eq!(level_theme(12), "Love (Cycle 2)");
    }
}
