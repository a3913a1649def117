//! High-slot hardware: turrets, launchers and mining lasers.

/// What a high-slot item does when cycled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponCategory {
    Turret,
    Missile,
    Mining,
}

/// Hit chance by range bracket, relative to optimal range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accuracy {
    pub close: f32,
    pub medium: f32,
    pub long: f32,
}

impl Accuracy {
    /// Missiles never miss
    pub const CERTAIN: Accuracy = Accuracy {
        close: 1.0,
        medium: 1.0,
        long: 1.0,
    };
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSpec {
    pub name: &'static str,
    pub category: WeaponCategory,
    pub description: &'static str,
    pub damage: f32,
    /// Frames between cycles
    pub fire_rate: f32,
    pub max_range: f32,
    pub optimal_range: f32,
    /// Capacitor per cycle
    pub capacitor_use: f32,
    pub accuracy: Accuracy,
    /// Ore units per cycle (mining lasers only)
    pub mining_yield: u32,
    pub powergrid: u32,
    pub cpu: u32,
    pub price: u64,
}

impl WeaponSpec {
    pub fn is_mining(&self) -> bool {
        self.category == WeaponCategory::Mining
    }
}

pub static WEAPONS: &[WeaponSpec] = &[
    WeaponSpec {
        name: "125mm Railgun I",
        category: WeaponCategory::Turret,
        description: "Basic hybrid turret with good range",
        damage: 15.0,
        fire_rate: 20.0,
        max_range: 500.0,
        optimal_range: 350.0,
        capacitor_use: 5.0,
        accuracy: Accuracy { close: 0.90, medium: 0.70, long: 0.35 },
        mining_yield: 0,
        powergrid: 2,
        cpu: 15,
        price: 5000,
    },
    WeaponSpec {
        name: "150mm Railgun I",
        category: WeaponCategory::Turret,
        description: "Upgraded railgun with better damage",
        damage: 22.0,
        fire_rate: 22.0,
        max_range: 600.0,
        optimal_range: 400.0,
        capacitor_use: 7.0,
        accuracy: Accuracy { close: 0.92, medium: 0.75, long: 0.40 },
        mining_yield: 0,
        powergrid: 3,
        cpu: 20,
        price: 15_000,
    },
    WeaponSpec {
        name: "Light Neutron Blaster I",
        category: WeaponCategory::Turret,
        description: "Close-range blaster with high damage",
        damage: 28.0,
        fire_rate: 16.0,
        max_range: 350.0,
        optimal_range: 250.0,
        capacitor_use: 8.0,
        accuracy: Accuracy { close: 0.95, medium: 0.60, long: 0.20 },
        mining_yield: 0,
        powergrid: 4,
        cpu: 18,
        price: 12_000,
    },
    WeaponSpec {
        name: "Light Beam Laser I",
        category: WeaponCategory::Turret,
        description: "Energy weapon with good range and accuracy",
        damage: 18.0,
        fire_rate: 18.0,
        max_range: 550.0,
        optimal_range: 400.0,
        capacitor_use: 10.0,
        accuracy: Accuracy { close: 0.93, medium: 0.80, long: 0.45 },
        mining_yield: 0,
        powergrid: 3,
        cpu: 12,
        price: 10_000,
    },
    WeaponSpec {
        name: "200mm AutoCannon I",
        category: WeaponCategory::Turret,
        description: "Projectile weapon with no capacitor usage",
        damage: 20.0,
        fire_rate: 14.0,
        max_range: 400.0,
        optimal_range: 280.0,
        capacitor_use: 0.0,
        accuracy: Accuracy { close: 0.88, medium: 0.65, long: 0.30 },
        mining_yield: 0,
        powergrid: 2,
        cpu: 8,
        price: 8000,
    },
    WeaponSpec {
        name: "Rocket Launcher I",
        category: WeaponCategory::Missile,
        description: "Short-range missile launcher - always hits",
        damage: 25.0,
        fire_rate: 30.0,
        max_range: 450.0,
        optimal_range: 450.0,
        capacitor_use: 6.0,
        accuracy: Accuracy::CERTAIN,
        mining_yield: 0,
        powergrid: 1,
        cpu: 25,
        price: 18_000,
    },
    WeaponSpec {
        name: "Miner I",
        category: WeaponCategory::Mining,
        description: "Basic mining laser",
        damage: 0.0,
        fire_rate: 300.0,
        max_range: 200.0,
        optimal_range: 200.0,
        capacitor_use: 3.0,
        accuracy: Accuracy::CERTAIN,
        mining_yield: 1,
        powergrid: 1,
        cpu: 10,
        price: 3000,
    },
    WeaponSpec {
        name: "Miner II",
        category: WeaponCategory::Mining,
        description: "Improved mining laser with better yield",
        damage: 0.0,
        fire_rate: 400.0,
        max_range: 350.0,
        optimal_range: 350.0,
        capacitor_use: 4.0,
        accuracy: Accuracy::CERTAIN,
        mining_yield: 4,
        powergrid: 2,
        cpu: 15,
        price: 20_000,
    },
];

pub fn find(name: &str) -> Option<&'static WeaponSpec> {
    WEAPONS.iter().find(|w| w.name == name)
}
