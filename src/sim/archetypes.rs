//! Enemy and boss parameter tables
//!
//! Behavior is data-driven: an archetype is looked up once at spawn time and
//! its parameters are copied onto the entity.

/// Enemy parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyArchetype {
    pub name: &'static str,
    /// Vertical speed in pixels per tick
    pub speed: f32,
    pub health: u32,
    pub points: u64,
    pub radius: f32,
    /// First level at which this enemy may spawn
    pub unlock_level: u32,
}

pub static ENEMY_ARCHETYPES: [EnemyArchetype; 9] = [
    EnemyArchetype { name: "Raptor",             speed: 2.0, health: 1, points: 10, radius: 25.0, unlock_level: 1 },
    EnemyArchetype { name: "T-Rex",              speed: 1.5, health: 2, points: 20, radius: 30.0, unlock_level: 1 },
    EnemyArchetype { name: "Velociraptor",       speed: 3.0, health: 1, points: 15, radius: 20.0, unlock_level: 2 },
    EnemyArchetype { name: "Triceratops",        speed: 1.0, health: 3, points: 25, radius: 35.0, unlock_level: 2 },
    EnemyArchetype { name: "Stegosaurus",        speed: 0.8, health: 4, points: 30, radius: 40.0, unlock_level: 3 },
    EnemyArchetype { name: "Pterodactyl",        speed: 4.0, health: 1, points: 20, radius: 25.0, unlock_level: 3 },
    EnemyArchetype { name: "Spinosaurus",        speed: 1.2, health: 5, points: 40, radius: 45.0, unlock_level: 4 },
    EnemyArchetype { name: "Ankylosaurus",       speed: 0.6, health: 6, points: 35, radius: 35.0, unlock_level: 4 },
    EnemyArchetype { name: "Pachycephalosaurus", speed: 2.5, health: 3, points: 30, radius: 30.0, unlock_level: 5 },
];

impl EnemyArchetype {
    pub fn get(id: u8) -> Option<&'static EnemyArchetype> {
        ENEMY_ARCHETYPES.get(id as usize)
    }
}

/// Archetype ids unlocked at `level`
pub fn eligible_enemies(level: u32) -> Vec<u8> {
    ENEMY_ARCHETYPES
        .iter()
        .enumerate()
        .filter(|(_, a)| a.unlock_level <= level)
        .map(|(i, _)| i as u8)
        .collect()
}

/// Boss parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BossArchetype {
    pub name: &'static str,
    /// Base health before the per-level bonus
    pub health: u32,
    /// Horizontal patrol speed in pixels per tick
    pub speed: f32,
    /// Ticks between fireballs
    pub fire_rate: u32,
    pub unlock_level: u32,
    /// Size multiplier over the base boss box
    pub scale: f32,
}

pub static BOSS_ARCHETYPES: [BossArchetype; 5] = [
    BossArchetype { name: "Mother Dino",         health: 50,  speed: 1.2, fire_rate: 60, unlock_level: 1, scale: 1.0 },
    BossArchetype { name: "Mother Dino Elite",   health: 75,  speed: 1.5, fire_rate: 45, unlock_level: 2, scale: 1.2 },
    BossArchetype { name: "Mother Dino Alpha",   health: 100, speed: 1.8, fire_rate: 40, unlock_level: 3, scale: 1.4 },
    BossArchetype { name: "Mother Dino Supreme", health: 150, speed: 1.0, fire_rate: 30, unlock_level: 4, scale: 1.6 },
    BossArchetype { name: "Mother Dino Legend",  health: 200, speed: 1.3, fire_rate: 25, unlock_level: 5, scale: 1.8 },
];

pub const ULTIMATE_BOSS_NAME: &str = "Mother Dino Ultimate";

/// Strongest boss archetype unlocked at `level`
pub fn boss_for_level(level: u32) -> (u8, &'static BossArchetype) {
    BOSS_ARCHETYPES
        .iter()
        .enumerate()
        .rev()
        .find(|(_, b)| b.unlock_level <= level)
        .map(|(i, b)| (i as u8, b))
        .unwrap_or((0, &BOSS_ARCHETYPES[0]))
}
