//! Read-only game data: hulls, weapons, modules, ores, anomaly sites and
//! the star map. Everything here is `'static` and never mutated.

pub mod anomalies;
pub mod modules;
pub mod ores;
pub mod ships;
pub mod systems;
pub mod weapons;

use std::sync::OnceLock;

use hashbrown::HashMap;

use crate::game::fitting::SlotClass;
use modules::{ModuleSpec, MODULES};
use weapons::{WeaponSpec, WEAPONS};

/// Anything that can be fitted to a slot
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Equipment {
    Weapon(&'static WeaponSpec),
    Module(&'static ModuleSpec),
}

impl Equipment {
    pub fn name(&self) -> &'static str {
        match self {
            Equipment::Weapon(w) => w.name,
            Equipment::Module(m) => m.name,
        }
    }

    /// Weapons always go high; modules declare their slot
    pub fn slot(&self) -> SlotClass {
        match self {
            Equipment::Weapon(_) => SlotClass::High,
            Equipment::Module(m) => m.slot,
        }
    }

    pub fn powergrid(&self) -> u32 {
        match self {
            Equipment::Weapon(w) => w.powergrid,
            Equipment::Module(m) => m.powergrid,
        }
    }

    pub fn cpu(&self) -> u32 {
        match self {
            Equipment::Weapon(w) => w.cpu,
            Equipment::Module(m) => m.cpu,
        }
    }

    pub fn price(&self) -> u64 {
        match self {
            Equipment::Weapon(w) => w.price,
            Equipment::Module(m) => m.price,
        }
    }

    pub fn is_activatable(&self) -> bool {
        matches!(self, Equipment::Module(m) if m.effect.is_active())
    }

    pub fn as_weapon(&self) -> Option<&'static WeaponSpec> {
        match self {
            Equipment::Weapon(w) => Some(w),
            Equipment::Module(_) => None,
        }
    }

    pub fn as_module(&self) -> Option<&'static ModuleSpec> {
        match self {
            Equipment::Module(m) => Some(m),
            Equipment::Weapon(_) => None,
        }
    }
}

fn registry() -> &'static HashMap<&'static str, Equipment> {
    static REGISTRY: OnceLock<HashMap<&'static str, Equipment>> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut map = HashMap::with_capacity(WEAPONS.len() + MODULES.len());
        for w in WEAPONS {
            map.insert(w.name, Equipment::Weapon(w));
        }
        for m in MODULES {
            map.insert(m.name, Equipment::Module(m));
        }
        map
    })
}

/// Resolve a fittable item by its display name
pub fn lookup(name: &str) -> Option<Equipment> {
    registry().get(name).copied()
}

/// Every fittable item, weapons first
pub fn all_equipment() -> impl Iterator<Item = Equipment> {
    WEAPONS
        .iter()
        .map(Equipment::Weapon)
        .chain(MODULES.iter().map(Equipment::Module))
}
