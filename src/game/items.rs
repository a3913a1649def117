//! Cargo items and volume accounting.
//!
//! Used volume is never stored: it is always the sum of item sizes in the
//! list, so it cannot drift from the contents.

use crate::game::catalog::anomalies::SpecialLoot;
use crate::game::catalog::ores::{MetalKind, OreKind};
use crate::game::catalog::Equipment;
use crate::game::constants::combat::EQUIPMENT_STACK_SIZE;

#[derive(Debug, Clone, PartialEq)]
pub enum ItemKind {
    Ore(OreKind),
    Metal(MetalKind),
    /// Unfitted weapon or module
    Equipment(Equipment),
    /// Anomaly special loot
    Loot(&'static SpecialLoot),
}

/// One unit in a cargo hold, station hangar or wreck
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub kind: ItemKind,
    /// Volume this unit occupies
    pub size: f32,
}

impl Item {
    pub fn ore(ore: OreKind) -> Self {
        Self {
            kind: ItemKind::Ore(ore),
            size: ore.size(),
        }
    }

    pub fn metal(metal: MetalKind) -> Self {
        Self {
            kind: ItemKind::Metal(metal),
            size: metal.size(),
        }
    }

    pub fn equipment(equipment: Equipment) -> Self {
        Self {
            kind: ItemKind::Equipment(equipment),
            size: EQUIPMENT_STACK_SIZE,
        }
    }

    pub fn loot(loot: &'static SpecialLoot) -> Self {
        Self {
            kind: ItemKind::Loot(loot),
            size: EQUIPMENT_STACK_SIZE,
        }
    }

    pub fn name(&self) -> &'static str {
        match &self.kind {
            ItemKind::Ore(o) => o.name(),
            ItemKind::Metal(m) => m.name(),
            ItemKind::Equipment(e) => e.name(),
            ItemKind::Loot(l) => l.name,
        }
    }

    /// Catalog price of one unit
    pub fn base_price(&self) -> u64 {
        match &self.kind {
            ItemKind::Ore(o) => o.price(),
            ItemKind::Metal(m) => m.price(),
            ItemKind::Equipment(e) => e.price(),
            ItemKind::Loot(l) => l.price,
        }
    }

    pub fn as_equipment(&self) -> Option<Equipment> {
        match &self.kind {
            ItemKind::Equipment(e) => Some(*e),
            _ => None,
        }
    }

    pub fn is_ore(&self) -> bool {
        matches!(self.kind, ItemKind::Ore(_))
    }

    pub fn is_metal(&self) -> bool {
        matches!(self.kind, ItemKind::Metal(_))
    }
}

/// Total volume of a list of items
pub fn volume(items: &[Item]) -> f32 {
    items.iter().map(|i| i.size).sum()
}

/// Free volume left in a hold of `capacity`
pub fn free_volume(items: &[Item], capacity: f32) -> f32 {
    (capacity - volume(items)).max(0.0)
}

/// Tolerance for float accumulation when comparing against capacity
pub const VOLUME_EPSILON: f32 = 1e-4;

/// Would `size` more volume fit into a hold of `capacity`?
pub fn has_room(items: &[Item], capacity: f32, size: f32) -> bool {
    volume(items) + size <= capacity + VOLUME_EPSILON
}

/// Drop items from the end of the list until it fits `capacity`.
/// Returns the removed items, last removed first.
pub fn trim_to_capacity(items: &mut Vec<Item>, capacity: f32) -> Vec<Item> {
    let mut removed = Vec::new();
    while volume(items) > capacity + VOLUME_EPSILON {
        match items.pop() {
            Some(item) => removed.push(item),
            None => break,
        }
    }
    removed
}
