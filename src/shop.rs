//! Coin shop
//!
//! The catalog is configuration supplied at session start; purchases are
//! commands that either apply in full or leave the state untouched.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::{GameState, NotifyKind, SoundCue};

/// Stat change granted by a shop item
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ShopEffect {
    Lives(u32),
    BulletSpeed(f32),
    /// Extra bullets per forward volley
    MaxBullets(u32),
    BulletSize(f32),
    Speed(f32),
    DiagonalShooting,
    PiercingShots,
}

/// A purchasable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: String,
    pub name: String,
    pub cost: u64,
    pub effect: ShopEffect,
}

impl ShopItem {
    pub fn new(id: &str, name: &str, cost: u64, effect: ShopEffect) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            effect,
        }
    }
}

/// Rejected purchase
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("unknown shop item `{0}`")]
    UnknownItem(String),
    #[error("not enough coins for {item}: costs {cost}, have {coins}")]
    InsufficientFunds { item: String, cost: u64, coins: u64 },
    #[error("the shop is closed")]
    ShopClosed,
}

/// Rejected catalog file
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate shop item id `{0}`")]
    DuplicateId(String),
}

/// Shop catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopCatalog {
    pub items: Vec<ShopItem>,
}

impl Default for ShopCatalog {
    fn default() -> Self {
        Self {
            items: vec![
                ShopItem::new("extra_life", "Extra Life", 50, ShopEffect::Lives(1)),
                ShopItem::new("faster_bullets", "Faster Bullets", 30, ShopEffect::BulletSpeed(2.0)),
                ShopItem::new("more_bullets", "More Bullets", 40, ShopEffect::MaxBullets(1)),
                ShopItem::new("bigger_bullets", "Bigger Bullets", 25, ShopEffect::BulletSize(1.0)),
                ShopItem::new("faster_movement", "Faster Movement", 35, ShopEffect::Speed(1.0)),
                ShopItem::new("diagonal_bullets", "Extra Diagonal Bullets", 60, ShopEffect::DiagonalShooting),
                ShopItem::new("piercing_rounds", "Piercing Rounds", 80, ShopEffect::PiercingShots),
            ],
        }
    }
}

impl ShopCatalog {
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: ShopCatalog = serde_json::from_str(json)?;
        for (i, item) in catalog.items.iter().enumerate() {
            if catalog.items[..i].iter().any(|other| other.id == item.id) {
                return Err(CatalogError::DuplicateId(item.id.clone()));
            }
        }
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&ShopItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

/// Apply a stat effect to the player
pub fn apply_effect(state: &mut GameState, effect: ShopEffect) {
    let player = &mut state.player;
    match effect {
        ShopEffect::Lives(n) => player.lives = player.lives.saturating_add(n),
        ShopEffect::BulletSpeed(v) => player.bullet_speed += v.max(0.0),
        ShopEffect::MaxBullets(n) => player.bullets_per_volley = player.bullets_per_volley.saturating_add(n),
        ShopEffect::BulletSize(v) => player.bullet_size += v.max(0.0),
        ShopEffect::Speed(v) => player.speed += v.max(0.0),
        ShopEffect::DiagonalShooting => player.diagonal_shots = true,
        ShopEffect::PiercingShots => player.piercing_shots = true,
    }
}

/// Buy `item_id` with coins. Failures are also announced as notifications.
pub fn purchase(state: &mut GameState, catalog: &ShopCatalog, item_id: &str) -> Result<(), PurchaseError> {
    let result = try_purchase(state, catalog, item_id);
    match &result {
        Ok(()) => {}
        Err(PurchaseError::InsufficientFunds { item, .. }) => {
            state.notify(format!("Not enough coins for {}", item), NotifyKind::Failure);
        }
        Err(err) => state.notify(err.to_string(), NotifyKind::Failure),
    }
    result
}

fn try_purchase(state: &mut GameState, catalog: &ShopCatalog, item_id: &str) -> Result<(), PurchaseError> {
    if !state.shop_open {
        return Err(PurchaseError::ShopClosed);
    }
    let item = catalog
        .get(item_id)
        .ok_or_else(|| PurchaseError::UnknownItem(item_id.to_string()))?;

    if !state.economy.spend(item.cost) {
        return Err(PurchaseError::InsufficientFunds {
            item: item.name.clone(),
            cost: item.cost,
            coins: state.economy.coins,
        });
    }

    apply_effect(state, item.effect);
    log::debug!("Purchased {} for {} coins", item.name, item.cost);
    state.sound(SoundCue::Purchase);
    state.notify(format!("Purchased: {}", item.name), NotifyKind::Purchase);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    fn shopping_state(coins: u64) -> GameState {
        let mut state = GameState::new(1, Tuning::default(), false);
        state.start();
        state.toggle_shop();
        state.economy.coins = coins;
        state
    }

    #[test]
    fn test_purchase_applies_and_charges() {
        let mut state = shopping_state(100);
        let catalog = ShopCatalog::default();
        purchase(&mut state, &catalog, "extra_life").unwrap();
        assert_eq!(state.economy.coins, 50);
        assert_eq!(state.player.lives, 5);

        purchase(&mut state, &catalog, "more_bullets").unwrap();
        assert_eq!(state.economy.coins, 10);
        assert_eq!(state.player.bullets_per_volley, 4);
    }

    #[test]
    fn test_insufficient_funds_changes_nothing() {
        let mut state = shopping_state(20);
        let before = state.player.clone();
        let err = purchase(&mut state, &ShopCatalog::default(), "diagonal_bullets").unwrap_err();
        assert!(matches!(err, PurchaseError::InsufficientFunds { cost: 60, coins: 20, .. }));
        assert_eq!(state.economy.coins, 20);
        assert_eq!(state.player, before);
        assert!(state.events.iter().any(|e| matches!(
            e,
            crate::sim::GameEvent::Notify { kind: NotifyKind::Failure, .. }
        )));
    }

    #[test]
    fn test_closed_shop_and_unknown_item() {
        let mut state = shopping_state(500);
        let catalog = ShopCatalog::default();
        assert_eq!(
            purchase(&mut state, &catalog, "rocket_boots"),
            Err(PurchaseError::UnknownItem("rocket_boots".into()))
        );
        state.toggle_shop();
        assert_eq!(purchase(&mut state, &catalog, "extra_life"), Err(PurchaseError::ShopClosed));
        assert_eq!(state.economy.coins, 500);
    }

    #[test]
    fn test_catalog_json() {
        let json = r#"{ "items": [
            { "id": "a", "name": "A", "cost": 5, "effect": { "kind": "speed", "value": 2.0 } },
            { "id": "b", "name": "B", "cost": 9, "effect": { "kind": "diagonal_shooting" } }
        ] }"#;
        let catalog = ShopCatalog::from_json(json).unwrap();
        assert_eq!(catalog.get("a").unwrap().effect, ShopEffect::Speed(2.0));
        assert_eq!(catalog.get("b").unwrap().effect, ShopEffect::DiagonalShooting);
    }

    #[test]
    fn test_catalog_rejects_duplicates() {
        let json = r#"{ "items": [
            { "id": "a", "name": "A", "cost": 5, "effect": { "kind": "lives", "value": 1 } },
            { "id": "a", "name": "A2", "cost": 7, "effect": { "kind": "lives", "value": 2 } }
        ] }"#;
        assert!(matches!(ShopCatalog::from_json(json), Err(CatalogError::DuplicateId(id)) if id == "a"));
    }
}
