//! Session: the command surface for UI, audio and render collaborators
//!
//! Inbound commands only record intent or flip flags; `update` runs one
//! fixed tick and then fans the queued events out to the hooks.

use glam::Vec2;

use crate::highscores::{HighScoreEntry, HighScores};
use crate::profile::{Entitlement, PlayerProfile, SubscriptionEntitlement};
use crate::shop::{self, PurchaseError, ShopCatalog};
use crate::sim::{
    GameEvent, GameState, MoveIntent, NotifyKind, SessionStatus, Snapshot, SoundCue, TickInput, tick,
};
use crate::tuning::Tuning;

/// Outbound callbacks. Every method defaults to a no-op.
pub trait GameHooks {
    /// Entity sets changed this tick
    fn on_entities_changed(&mut self, _snapshot: &Snapshot<'_>) {}
    fn on_notify(&mut self, _message: &str, _kind: NotifyKind) {}
    fn on_sound_cue(&mut self, _cue: SoundCue) {}
    /// Explosion at `pos`; `boss` picks the large effect
    fn on_kill_effect(&mut self, _pos: Vec2, _boss: bool) {}
    fn on_game_over(&mut self, _score: u64, _level: u32) {}
}

/// Hooks that ignore everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl GameHooks for NoHooks {}

/// One player's run plus the configuration it was started with
pub struct Session {
    state: GameState,
    profile: PlayerProfile,
    catalog: ShopCatalog,
    entitlement: Box<dyn Entitlement>,
    movement: MoveIntent,
    firing: bool,
    autopilot: bool,
    high_scores: HighScores,
    base_seed: u64,
    /// Runs started so far; run `n` is seeded with `base_seed + n`
    runs: u64,
}

impl Session {
    /// Build a session gated by the profile's subscription.
    ///
    /// An invalid `tuning` is logged and still accepted; the tick loop
    /// clamps degenerate values instead of failing.
    pub fn new(profile: PlayerProfile, tuning: Tuning, catalog: ShopCatalog, seed: u64) -> Self {
        if let Err(e) = tuning.validate() {
            log::warn!("Session started with questionable tuning: {}", e);
        }
        let entitlement = SubscriptionEntitlement::for_profile(&profile);
        Self {
            state: GameState::new(seed, tuning, profile.subscription),
            profile,
            catalog,
            entitlement: Box::new(entitlement),
            movement: MoveIntent::None,
            firing: false,
            autopilot: false,
            high_scores: HighScores::new(),
            base_seed: seed,
            runs: 0,
        }
    }

    /// Replace the entitlement check (e.g. a closure backed by an account service)
    pub fn with_entitlement(mut self, entitlement: impl Entitlement + 'static) -> Self {
        self.entitlement = Box::new(entitlement);
        self
    }

    pub fn with_high_scores(mut self, high_scores: HighScores) -> Self {
        self.high_scores = high_scores;
        self
    }

    /// Begin a run. Ignored while one is already in progress.
    pub fn start(&mut self) {
        if self.state.status == SessionStatus::NotStarted {
            self.begin_run();
        }
    }

    /// Reset everything and start a new run
    pub fn restart(&mut self) {
        self.begin_run();
    }

    fn begin_run(&mut self) {
        let seed = self.base_seed.wrapping_add(self.runs);
        self.state = GameState::new(seed, self.state.tuning.clone(), self.profile.subscription);
        self.state.start();
        self.runs += 1;
        self.movement = MoveIntent::None;
        self.firing = false;
    }

    pub fn set_movement_intent(&mut self, intent: MoveIntent) {
        self.movement = intent;
    }

    pub fn set_firing(&mut self, firing: bool) {
        self.firing = firing;
    }

    /// Let the built-in pilot play (demo mode)
    pub fn set_autopilot(&mut self, on: bool) {
        self.autopilot = on;
    }

    pub fn request_pause(&mut self) {
        self.state.pause();
    }

    pub fn request_resume(&mut self) {
        self.state.resume();
    }

    pub fn request_shop_toggle(&mut self) {
        self.state.toggle_shop();
    }

    /// Buy a catalog item. Notifications are delivered on the next `update`.
    pub fn purchase(&mut self, item_id: &str) -> Result<(), PurchaseError> {
        shop::purchase(&mut self.state, &self.catalog, item_id)
    }

    /// Advance one fixed tick and dispatch everything it produced
    pub fn update(&mut self, hooks: &mut dyn GameHooks) {
        let simulating = self.state.is_simulating();
        let input = TickInput {
            movement: self.movement,
            fire: self.firing,
            autopilot: self.autopilot,
        };
        tick(&mut self.state, &input, self.entitlement.as_ref());

        for event in self.state.drain_events() {
            self.dispatch(event, hooks);
        }
        if simulating {
            hooks.on_entities_changed(&Snapshot::of(&self.state));
        }
    }

    fn dispatch(&mut self, event: GameEvent, hooks: &mut dyn GameHooks) {
        match event {
            GameEvent::Notify { message, kind } => hooks.on_notify(&message, kind),
            GameEvent::Sound(cue) => hooks.on_sound_cue(cue),
            GameEvent::EnemyKilled { pos, .. } => hooks.on_kill_effect(pos, false),
            GameEvent::BossDefeated { pos, .. } => hooks.on_kill_effect(pos, true),
            GameEvent::GameOver { score, level } => {
                let entry = HighScoreEntry {
                    name: self.profile.name.clone(),
                    score,
                    level,
                    wave: self.state.progression.wave,
                    ticks: self.state.time_ticks,
                };
                if let Some(rank) = self.high_scores.add(entry) {
                    log::info!("New high score #{}: {}", rank, score);
                }
                hooks.on_game_over(score, level);
            }
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(&self.state)
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn catalog(&self) -> &ShopCatalog {
        &self.catalog
    }

    pub fn high_scores(&self) -> &HighScores {
        &self.high_scores
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Enemy, EnemyArchetype};

    #[derive(Default)]
    struct Recorder {
        notes: Vec<(String, NotifyKind)>,
        cues: Vec<SoundCue>,
        snapshots: usize,
        kills: usize,
        game_over: Option<(u64, u32)>,
    }

    impl GameHooks for Recorder {
        fn on_entities_changed(&mut self, _snapshot: &Snapshot<'_>) {
            self.snapshots += 1;
        }
        fn on_notify(&mut self, message: &str, kind: NotifyKind) {
            self.notes.push((message.to_string(), kind));
        }
        fn on_sound_cue(&mut self, cue: SoundCue) {
            self.cues.push(cue);
        }
        fn on_kill_effect(&mut self, _pos: Vec2, _boss: bool) {
            self.kills += 1;
        }
        fn on_game_over(&mut self, score: u64, level: u32) {
            self.game_over = Some((score, level));
        }
    }

    fn session() -> Session {
        Session::new(PlayerProfile::new("Ada"), Tuning::default(), ShopCatalog::default(), 3)
    }

    #[test]
    fn test_update_before_start_is_inert() {
        let mut s = session();
        let mut hooks = Recorder::default();
        s.update(&mut hooks);
        assert_eq!(s.state().status, SessionStatus::NotStarted);
        assert_eq!(s.state().time_ticks, 0);
        assert_eq!(hooks.snapshots, 0);
    }

    #[test]
    fn test_firing_reaches_hooks() {
        let mut s = session();
        s.start();
        s.set_firing(true);
        let mut hooks = Recorder::default();
        s.update(&mut hooks);
        assert_eq!(s.state().time_ticks, 1);
        assert_eq!(hooks.snapshots, 1);
        assert!(hooks.cues.contains(&SoundCue::Shoot));
        assert!(!s.state().entities.bullets.is_empty());
    }

    #[test]
    fn test_purchase_flow_through_session() {
        let mut s = session();
        s.start();
        assert_eq!(s.purchase("extra_life"), Err(PurchaseError::ShopClosed));

        s.request_shop_toggle();
        assert_eq!(
            s.purchase("extra_life"),
            Err(PurchaseError::InsufficientFunds {
                item: "Extra Life".into(),
                cost: 50,
                coins: 0
            })
        );
        let mut hooks = Recorder::default();
        s.update(&mut hooks);
        // Shop freezes the clock
        assert_eq!(s.state().time_ticks, 0);
        assert!(hooks.notes.iter().any(|(m, k)| *k == NotifyKind::Failure && m == "Not enough coins for Extra Life"));
    }

    #[test]
    fn test_game_over_records_high_score() {
        let mut s = session();
        s.start();
        s.state.economy.score = 120;
        s.state.player.lives = 1;
        let params = EnemyArchetype::get(0).copied().unwrap();
        let pos = s.state.player.pos;
        let id = s.state.entities.next_entity_id();
        s.state.entities.enemies.push(Enemy::new(id, 0, &params, pos));

        let mut hooks = Recorder::default();
        s.update(&mut hooks);
        assert_eq!(s.state().status, SessionStatus::GameOver);
        assert_eq!(hooks.game_over, Some((120, 1)));
        assert!(hooks.cues.contains(&SoundCue::GameOver));
        assert_eq!(s.high_scores().top_score(), Some(120));

        // Terminal until restart
        s.start();
        assert_eq!(s.state().status, SessionStatus::GameOver);
        s.restart();
        assert_eq!(s.state().status, SessionStatus::Running);
        assert_eq!(s.state().player.lives, 4);
        assert_eq!(s.state().economy.score, 0);
    }

    #[test]
    fn test_degenerate_tuning_never_panics() {
        let bad = [
            Tuning {
                spawn_margin: 480.0,
                ..Tuning::default()
            },
            Tuning {
                power_up_chance: f64::NAN,
                power_up_gate_ticks: 1,
                ..Tuning::default()
            },
            Tuning {
                playfield_width: f32::NAN,
                player_radius: f32::NAN,
                power_up_radius: 5000.0,
                power_up_chance: 1.0,
                power_up_gate_ticks: 1,
                enemy_spawn_floor_ticks: 0,
                enemy_spawn_base_ticks: 0,
                laser_interval: 0,
                waves_per_level: 0,
                wave_interval_ticks: 0,
                boss_wave_cadence: 0,
                ultimate_wave_cadence: 0,
                rapid_fire_wave_every: 0,
                boss_rush_wave_every: 0,
                ..Tuning::default()
            },
        ];
        for tuning in bad {
            let mut s = Session::new(PlayerProfile::new("Ada"), tuning, ShopCatalog::default(), 11);
            s.set_autopilot(true);
            s.start();
            for _ in 0..200 {
                s.update(&mut NoHooks);
            }
            assert!(s.state().time_ticks > 0);
        }
    }

    #[test]
    fn test_custom_entitlement_closure() {
        let s = session().with_entitlement(|level: u32| level < 2);
        assert!(s.entitlement.allows(1));
        assert!(!s.entitlement.allows(2));
    }
}
