//! Cosmic anomaly site definitions and the special loot table.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::catalog::ores::OreKind;
use crate::util::rng::int_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnomalyCategory {
    Combat,
    Mining,
    Data,
    Relic,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Inclusive integer range rolled per site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub min: u32,
    pub max: u32,
}

impl Span {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        int_between(rng, self.min, self.max)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PocketDefenders {
    pub count: Span,
    /// Multiplies every defense pool of a spawned NPC
    pub difficulty: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PocketBelt {
    pub count: Span,
    pub ores: &'static [OreKind],
    /// Visual size scale for pocket rocks
    pub size_multiplier: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Rewards {
    pub bounty: Option<Span>,
    pub metal_scrap: Option<Span>,
    pub ore: Option<Span>,
    /// Probability of a special loot drop
    pub special_loot: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnomalyType {
    pub name: &'static str,
    pub category: AnomalyCategory,
    pub difficulty: Difficulty,
    pub description: &'static str,
    pub requires_scanning: bool,
    pub npcs: Option<PocketDefenders>,
    pub asteroids: Option<PocketBelt>,
    pub containers: Option<Span>,
    pub rewards: Rewards,
    pub respawn_ms: u32,
}

pub static ANOMALY_TYPES: &[AnomalyType] = &[
    AnomalyType {
        name: "Guristas Hideout",
        category: AnomalyCategory::Combat,
        difficulty: Difficulty::Easy,
        description: "A small pirate hideout with light resistance",
        requires_scanning: true,
        npcs: Some(PocketDefenders { count: Span::new(3, 5), difficulty: 1.2 }),
        asteroids: None,
        containers: None,
        rewards: Rewards {
            bounty: Some(Span::new(15_000, 25_000)),
            metal_scrap: Some(Span::new(5, 8)),
            ore: Some(Span::new(3, 6)),
            special_loot: 0.2,
        },
        respawn_ms: 1_800_000,
    },
    AnomalyType {
        name: "Blood Raider Outpost",
        category: AnomalyCategory::Combat,
        difficulty: Difficulty::Medium,
        description: "A fortified pirate base with moderate defenses",
        requires_scanning: true,
        npcs: Some(PocketDefenders { count: Span::new(5, 8), difficulty: 1.5 }),
        asteroids: None,
        containers: None,
        rewards: Rewards {
            bounty: Some(Span::new(35_000, 50_000)),
            metal_scrap: Some(Span::new(8, 12)),
            ore: Some(Span::new(5, 10)),
            special_loot: 0.3,
        },
        respawn_ms: 2_400_000,
    },
    AnomalyType {
        name: "Serpentis Stronghold",
        category: AnomalyCategory::Combat,
        difficulty: Difficulty::Hard,
        description: "A heavily defended stronghold with elite pirates",
        requires_scanning: true,
        npcs: Some(PocketDefenders { count: Span::new(8, 12), difficulty: 2.0 }),
        asteroids: None,
        containers: None,
        rewards: Rewards {
            bounty: Some(Span::new(70_000, 100_000)),
            metal_scrap: Some(Span::new(15, 20)),
            ore: Some(Span::new(10, 15)),
            special_loot: 0.5,
        },
        respawn_ms: 3_600_000,
    },
    AnomalyType {
        name: "Ordinary Perimeter Deposit",
        category: AnomalyCategory::Mining,
        difficulty: Difficulty::Easy,
        description: "A small asteroid cluster with common ores",
        requires_scanning: false,
        npcs: None,
        asteroids: Some(PocketBelt {
            count: Span::new(8, 12),
            ores: &[OreKind::Veldspar, OreKind::Scordite, OreKind::Pyroxeres],
            size_multiplier: 1.5,
        }),
        containers: None,
        rewards: Rewards {
            bounty: None,
            metal_scrap: None,
            ore: None,
            special_loot: 0.0,
        },
        respawn_ms: 1_800_000,
    },
    AnomalyType {
        name: "Common Perimeter Deposit",
        category: AnomalyCategory::Mining,
        difficulty: Difficulty::Medium,
        description: "A rich asteroid field with uncommon ores",
        requires_scanning: true,
        npcs: None,
        asteroids: Some(PocketBelt {
            count: Span::new(10, 15),
            ores: &[
                OreKind::Scordite,
                OreKind::Pyroxeres,
                OreKind::Plagioclase,
                OreKind::Omber,
            ],
            size_multiplier: 2.0,
        }),
        containers: None,
        rewards: Rewards {
            bounty: None,
            metal_scrap: None,
            ore: None,
            special_loot: 0.1,
        },
        respawn_ms: 2_400_000,
    },
    AnomalyType {
        name: "Exceptional Core Deposit",
        category: AnomalyCategory::Mining,
        difficulty: Difficulty::Hard,
        description: "A dense asteroid field with rare ores",
        requires_scanning: true,
        npcs: None,
        asteroids: Some(PocketBelt {
            count: Span::new(12, 18),
            ores: &[OreKind::Plagioclase, OreKind::Omber, OreKind::Kernite],
            size_multiplier: 2.5,
        }),
        containers: None,
        rewards: Rewards {
            bounty: None,
            metal_scrap: None,
            ore: None,
            special_loot: 0.2,
        },
        respawn_ms: 3_600_000,
    },
    AnomalyType {
        name: "Forgotten Data Cache",
        category: AnomalyCategory::Data,
        difficulty: Difficulty::Easy,
        description: "An abandoned data facility with hackable containers",
        requires_scanning: true,
        npcs: None,
        asteroids: None,
        containers: Some(Span::new(3, 5)),
        rewards: Rewards {
            bounty: Some(Span::new(20_000, 35_000)),
            metal_scrap: Some(Span::new(3, 5)),
            ore: None,
            special_loot: 0.4,
        },
        respawn_ms: 2_400_000,
    },
    AnomalyType {
        name: "Ruined Relic Site",
        category: AnomalyCategory::Relic,
        difficulty: Difficulty::Medium,
        description: "Ancient ruins containing valuable artifacts",
        requires_scanning: true,
        npcs: None,
        asteroids: None,
        containers: Some(Span::new(4, 6)),
        rewards: Rewards {
            bounty: Some(Span::new(40_000, 60_000)),
            metal_scrap: Some(Span::new(5, 8)),
            ore: None,
            special_loot: 0.6,
        },
        respawn_ms: 3_000_000,
    },
    AnomalyType {
        name: "Sleeper Cache",
        category: AnomalyCategory::Data,
        difficulty: Difficulty::Hard,
        description: "A mysterious Sleeper facility with advanced technology",
        requires_scanning: true,
        npcs: Some(PocketDefenders { count: Span::new(2, 4), difficulty: 1.8 }),
        asteroids: None,
        containers: Some(Span::new(5, 8)),
        rewards: Rewards {
            bounty: Some(Span::new(80_000, 120_000)),
            metal_scrap: Some(Span::new(10, 15)),
            ore: None,
            special_loot: 0.8,
        },
        respawn_ms: 4_200_000,
    },
];

pub fn find(name: &str) -> Option<&'static AnomalyType> {
    ANOMALY_TYPES.iter().find(|a| a.name == name)
}

/// Pick a site type uniformly
pub fn roll_type<R: Rng + ?Sized>(rng: &mut R) -> &'static AnomalyType {
    &ANOMALY_TYPES[rng.gen_range(0..ANOMALY_TYPES.len())]
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LootGroup {
    Blueprint,
    Module,
    Material,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecialLoot {
    pub name: &'static str,
    pub group: LootGroup,
    pub price: u64,
}

const fn loot(name: &'static str, group: LootGroup, price: u64) -> SpecialLoot {
    SpecialLoot { name, group, price }
}

pub static BLUEPRINTS: &[SpecialLoot] = &[
    loot("Small Shield Booster Blueprint", LootGroup::Blueprint, 50_000),
    loot("Afterburner Blueprint", LootGroup::Blueprint, 75_000),
    loot("Damage Control Blueprint", LootGroup::Blueprint, 100_000),
    loot("Tracking Enhancer Blueprint", LootGroup::Blueprint, 85_000),
];

pub static LOOT_MODULES: &[SpecialLoot] = &[
    loot("Prototype Shield Booster", LootGroup::Module, 45_000),
    loot("Experimental Afterburner", LootGroup::Module, 65_000),
    loot("Salvager Module", LootGroup::Module, 35_000),
];

pub static MATERIALS: &[SpecialLoot] = &[
    loot("Melted Nanoribbons", LootGroup::Material, 150),
    loot("Scorched Telemetry Processor", LootGroup::Material, 300),
    loot("Burned Logic Circuit", LootGroup::Material, 250),
    loot("Tangled Power Conduit", LootGroup::Material, 400),
];

/// Roll the special loot table: `chance` to drop at all, then 40% blueprints,
/// 30% modules, 30% materials.
pub fn roll_special_loot<R: Rng + ?Sized>(chance: f64, rng: &mut R) -> Option<&'static SpecialLoot> {
    if chance <= 0.0 || rng.gen::<f64>() >= chance {
        return None;
    }
    let group_roll: f64 = rng.gen();
    let table = if group_roll < 0.4 {
        BLUEPRINTS
    } else if group_roll < 0.7 {
        LOOT_MODULES
    } else {
        MATERIALS
    };
    Some(&table[rng.gen_range(0..table.len())])
}

pub fn find_special_loot(name: &str) -> Option<&'static SpecialLoot> {
    BLUEPRINTS
        .iter()
        .chain(LOOT_MODULES)
        .chain(MATERIALS)
        .find(|l| l.name == name)
}
