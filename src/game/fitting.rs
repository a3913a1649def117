//! Slot fitting, passive bonuses and module activation.
//!
//! Each slot is a record holding its equipment together with its activation
//! state, so removing a slot can never leave activation flags misaligned.
//! Powergrid and CPU usage are derived from the fitted items on demand.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

use crate::game::catalog::modules::ModuleEffect;
use crate::game::catalog::ships::ShipTemplate;
use crate::game::catalog::weapons::WeaponSpec;
use crate::game::catalog::{self, Equipment};
use crate::game::state::Ship;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotClass {
    High,
    Medium,
    Low,
}

impl SlotClass {
    pub const ALL: [SlotClass; 3] = [SlotClass::High, SlotClass::Medium, SlotClass::Low];
}

#[derive(Debug, Clone, PartialEq)]
pub struct FittedSlot {
    pub equipment: Equipment,
    pub active: bool,
    /// Frames until the next cycle of a cycling module
    pub cycle_timer: f32,
}

pub type SlotArray = SmallVec<[FittedSlot; 4]>;

#[derive(Debug, Clone, Default)]
pub struct Fitting {
    high: SlotArray,
    medium: SlotArray,
    low: SlotArray,
}

impl Fitting {
    pub fn slots(&self, class: SlotClass) -> &SlotArray {
        match class {
            SlotClass::High => &self.high,
            SlotClass::Medium => &self.medium,
            SlotClass::Low => &self.low,
        }
    }

    pub fn slots_mut(&mut self, class: SlotClass) -> &mut SlotArray {
        match class {
            SlotClass::High => &mut self.high,
            SlotClass::Medium => &mut self.medium,
            SlotClass::Low => &mut self.low,
        }
    }

    /// All fitted slots, high first
    pub fn iter(&self) -> impl Iterator<Item = &FittedSlot> {
        self.high.iter().chain(self.medium.iter()).chain(self.low.iter())
    }

    pub fn powergrid_used(&self) -> u32 {
        self.iter().map(|s| s.equipment.powergrid()).sum()
    }

    pub fn cpu_used(&self) -> u32 {
        self.iter().map(|s| s.equipment.cpu()).sum()
    }

    /// Fitted combat weapons (turrets and launchers), in slot order
    pub fn combat_weapons(&self) -> impl Iterator<Item = &'static WeaponSpec> + '_ {
        self.high
            .iter()
            .filter_map(|s| s.equipment.as_weapon())
            .filter(|w| !w.is_mining())
    }

    /// Fitted mining lasers, in slot order
    pub fn mining_lasers(&self) -> impl Iterator<Item = &'static WeaponSpec> + '_ {
        self.high
            .iter()
            .filter_map(|s| s.equipment.as_weapon())
            .filter(|w| w.is_mining())
    }

    /// Remove every fitted item, high slots first
    pub fn drain(&mut self) -> Vec<Equipment> {
        let mut out = Vec::new();
        for class in SlotClass::ALL {
            out.extend(self.slots_mut(class).drain(..).map(|s| s.equipment));
        }
        out
    }
}

impl ShipTemplate {
    pub fn slot_capacity(&self, class: SlotClass) -> usize {
        match class {
            SlotClass::High => self.high_slots,
            SlotClass::Medium => self.medium_slots,
            SlotClass::Low => self.low_slots,
        }
    }
}

/// Lowest fraction of base speed that stacked penalties can leave
const MIN_SPEED_FACTOR: f32 = 0.1;
/// Lowest fraction of the warp cooldown that stabilizers can leave
const MIN_WARP_COOLDOWN_FACTOR: f32 = 0.1;

/// Effective hull stats: template values plus every fitted passive module
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShipStats {
    pub max_speed: f32,
    pub max_shield: f32,
    pub shield_regen: f32,
    pub max_armor: f32,
    pub max_hull: f32,
    pub max_cap: f32,
    pub cap_regen: f32,
    pub cargo_capacity: f32,
    /// `1 + Σ damage bonuses`
    pub damage_multiplier: f32,
    /// Scales the post-warp cooldown
    pub warp_cooldown_multiplier: f32,
}

impl ShipStats {
    pub fn compute(template: &ShipTemplate, fitting: &Fitting) -> Self {
        let mut stats = Self {
            max_speed: template.max_speed,
            max_shield: template.max_shield,
            shield_regen: template.shield_regen,
            max_armor: template.max_armor,
            max_hull: template.max_hull,
            max_cap: template.max_cap,
            cap_regen: template.cap_regen,
            cargo_capacity: template.cargo_capacity,
            damage_multiplier: 1.0,
            warp_cooldown_multiplier: 1.0,
        };
        let mut speed_factor = 1.0_f32;
        let mut warp_reduction = 0.0_f32;

        for module in fitting.iter().filter_map(|s| s.equipment.as_module()) {
            match module.effect {
                ModuleEffect::ShieldExtender { shield } => stats.max_shield += shield,
                ModuleEffect::ShieldRecharger { regen } => stats.shield_regen += regen,
                ModuleEffect::ArmorPlate {
                    armor,
                    speed_penalty,
                } => {
                    stats.max_armor += armor;
                    speed_factor -= speed_penalty;
                }
                ModuleEffect::OverdriveInjector { speed_bonus } => speed_factor += speed_bonus,
                ModuleEffect::CapacitorRecharger { regen } => stats.cap_regen += regen,
                ModuleEffect::CapacitorBattery { capacitor } => stats.max_cap += capacitor,
                ModuleEffect::DamageAmplifier { bonus } => stats.damage_multiplier += bonus,
                ModuleEffect::CargoExpander { cargo } => stats.cargo_capacity += cargo,
                ModuleEffect::WarpCoreStabilizer { cooldown_reduction } => {
                    warp_reduction += cooldown_reduction
                }
                ModuleEffect::ShieldBooster { .. }
                | ModuleEffect::ArmorRepairer { .. }
                | ModuleEffect::Afterburner { .. } => {}
            }
        }

        stats.max_speed = template.max_speed * speed_factor.max(MIN_SPEED_FACTOR);
        stats.warp_cooldown_multiplier = (1.0 - warp_reduction).max(MIN_WARP_COOLDOWN_FACTOR);
        stats
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("unknown item '{0}'")]
    UnknownItem(String),
    #[error("no free {0:?} slot")]
    NoFreeSlot(SlotClass),
    #[error("insufficient powergrid: need {required}, {available} available")]
    InsufficientPowergrid { required: u32, available: u32 },
    #[error("insufficient CPU: need {required}, {available} available")]
    InsufficientCpu { required: u32, available: u32 },
    #[error("no {class:?} slot at index {index}")]
    InvalidSlot { class: SlotClass, index: usize },
    #[error("{0} has no active mode")]
    NotActivatable(&'static str),
}

impl Ship {
    /// Fit `equipment` into the next free slot of its class
    pub fn fit(&mut self, equipment: Equipment) -> Result<(), FitError> {
        let class = equipment.slot();
        if self.fitting.slots(class).len() >= self.template.slot_capacity(class) {
            return Err(FitError::NoFreeSlot(class));
        }

        let pg_free = self
            .template
            .powergrid
            .saturating_sub(self.fitting.powergrid_used());
        if equipment.powergrid() > pg_free {
            return Err(FitError::InsufficientPowergrid {
                required: equipment.powergrid(),
                available: pg_free,
            });
        }

        let cpu_free = self.template.cpu.saturating_sub(self.fitting.cpu_used());
        if equipment.cpu() > cpu_free {
            return Err(FitError::InsufficientCpu {
                required: equipment.cpu(),
                available: cpu_free,
            });
        }

        self.fitting.slots_mut(class).push(FittedSlot {
            equipment,
            active: false,
            cycle_timer: 0.0,
        });
        self.refresh_stats();
        Ok(())
    }

    /// Fit an item by catalog name
    pub fn fit_item(&mut self, name: &str) -> Result<(), FitError> {
        let equipment =
            catalog::lookup(name).ok_or_else(|| FitError::UnknownItem(name.to_string()))?;
        self.fit(equipment)
    }

    /// Remove the item in `class[index]`. Later slots shift down by one.
    pub fn unfit(&mut self, class: SlotClass, index: usize) -> Result<Equipment, FitError> {
        let slots = self.fitting.slots_mut(class);
        if index >= slots.len() {
            return Err(FitError::InvalidSlot { class, index });
        }
        let slot = slots.remove(index);
        self.refresh_stats();
        Ok(slot.equipment)
    }

    /// Flip the activation state of an active module. Returns the new state.
    pub fn toggle_activation(&mut self, class: SlotClass, index: usize) -> Result<bool, FitError> {
        let slot = self
            .fitting
            .slots_mut(class)
            .get_mut(index)
            .ok_or(FitError::InvalidSlot { class, index })?;
        if !slot.equipment.is_activatable() {
            return Err(FitError::NotActivatable(slot.equipment.name()));
        }
        slot.active = !slot.active;
        Ok(slot.active)
    }

    /// Recompute effective stats after a fitting change. Current pools move
    /// by the same amount their maximum moved, then clamp into range.
    pub(crate) fn refresh_stats(&mut self) {
        let old = self.stats;
        let new = ShipStats::compute(self.template, &self.fitting);

        self.defense.shield =
            (self.defense.shield + new.max_shield - old.max_shield).clamp(0.0, new.max_shield);
        self.defense.armor =
            (self.defense.armor + new.max_armor - old.max_armor).clamp(0.0, new.max_armor);
        self.defense.hull = self.defense.hull.clamp(0.0, new.max_hull);
        self.cap = (self.cap + new.max_cap - old.max_cap).clamp(0.0, new.max_cap);
        self.stats = new;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::modules::ModuleSpec;
    use crate::game::catalog::ships;
    use crate::game::catalog::weapons::{Accuracy, WeaponCategory};
    use crate::util::vec2::Vec2;

    static HEAVY_GUN: WeaponSpec = WeaponSpec {
        name: "Heavy Test Gun",
        category: WeaponCategory::Turret,
        description: "",
        damage: 10.0,
        fire_rate: 10.0,
        max_range: 500.0,
        optimal_range: 300.0,
        capacitor_use: 1.0,
        accuracy: Accuracy::CERTAIN,
        mining_yield: 0,
        powergrid: 20,
        cpu: 10,
        price: 1,
    };

    static HEAVY_MODULE: ModuleSpec = ModuleSpec {
        name: "Heavy Test Extender",
        description: "",
        slot: SlotClass::Medium,
        effect: ModuleEffect::ShieldExtender { shield: 10.0 },
        powergrid: 35,
        cpu: 10,
        price: 1,
    };

    fn velator() -> Ship {
        Ship::new(ships::find("Velator").unwrap(), Vec2::new(0.0, 0.0))
    }

    #[test]
    fn test_powergrid_limit_rejects_fit() {
        let mut ship = velator();
        assert_eq!(ship.template.powergrid, 50);
        ship.fit(Equipment::Weapon(&HEAVY_GUN)).unwrap();

        let err = ship.fit(Equipment::Module(&HEAVY_MODULE)).unwrap_err();
        assert_eq!(
            err,
            FitError::InsufficientPowergrid {
                required: 35,
                available: 30
            }
        );
        assert_eq!(ship.fitting.powergrid_used(), 20);
        assert!(ship.fitting.slots(SlotClass::Medium).is_empty());
    }

    #[test]
    fn test_cpu_limit_rejects_fit() {
        let mut ship = velator();
        // 15 + 15 + 20 + 20 + 18 = 88 CPU, leaving 12
        for name in ["125mm Railgun I", "125mm Railgun I"] {
            ship.fit_item(name).unwrap();
        }
        ship.fit_item("Small Shield Booster I").unwrap();
        ship.fit_item("1MN Afterburner I").unwrap();
        ship.fit_item("Magnetic Field Stabilizer I").unwrap();
        assert_eq!(ship.fitting.cpu_used(), 88);
        let err = ship.fit_item("Heat Sink I").unwrap_err();
        assert!(matches!(err, FitError::InsufficientCpu { required: 18, .. }));
    }

    #[test]
    fn test_no_free_slot() {
        let mut ship = velator();
        for _ in 0..3 {
            ship.fit_item("Miner I").unwrap();
        }
        assert_eq!(
            ship.fit_item("Miner I").unwrap_err(),
            FitError::NoFreeSlot(SlotClass::High)
        );
    }

    #[test]
    fn test_unknown_item() {
        let mut ship = velator();
        assert!(matches!(
            ship.fit_item("Warp Disruptor II"),
            Err(FitError::UnknownItem(_))
        ));
    }

    #[test]
    fn test_passive_bonus_applies_and_reverts() {
        let mut ship = velator();
        let base_max = ship.stats.max_shield;
        let base_shield = ship.defense.shield;

        ship.fit_item("Small Shield Extender I").unwrap();
        assert_eq!(ship.stats.max_shield, base_max + 50.0);
        assert_eq!(ship.defense.shield, base_shield + 50.0);

        let removed = ship.unfit(SlotClass::Medium, 0).unwrap();
        assert_eq!(removed.name(), "Small Shield Extender I");
        assert_eq!(ship.stats.max_shield, base_max);
        assert_eq!(ship.defense.shield, base_shield);
    }

    #[test]
    fn test_unfit_clamps_current_pool() {
        let mut ship = velator();
        ship.fit_item("Capacitor Battery I").unwrap();
        ship.cap = 10.0;
        ship.unfit(SlotClass::Medium, 0).unwrap();
        assert_eq!(ship.cap, 0.0);
    }

    #[test]
    fn test_unfit_keeps_activation_aligned() {
        let mut ship = velator();
        ship.fit_item("Small Shield Booster I").unwrap();
        ship.fit_item("1MN Afterburner I").unwrap();
        assert!(ship.toggle_activation(SlotClass::Medium, 1).unwrap());

        ship.unfit(SlotClass::Medium, 0).unwrap();
        let remaining = &ship.fitting.slots(SlotClass::Medium)[0];
        assert_eq!(remaining.equipment.name(), "1MN Afterburner I");
        assert!(remaining.active);
    }

    #[test]
    fn test_toggle_passive_is_rejected() {
        let mut ship = velator();
        ship.fit_item("Heat Sink I").unwrap();
        assert_eq!(
            ship.toggle_activation(SlotClass::Low, 0),
            Err(FitError::NotActivatable("Heat Sink I"))
        );
        assert!(matches!(
            ship.toggle_activation(SlotClass::Low, 3),
            Err(FitError::InvalidSlot { .. })
        ));
    }

    #[test]
    fn test_damage_bonuses_sum() {
        let mut ship = velator();
        ship.fit_item("Heat Sink I").unwrap();
        ship.fit_item("Gyrostabilizer I").unwrap();
        assert!((ship.stats.damage_multiplier - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_speed_modifiers() {
        let mut ship = velator();
        let base = ship.template.max_speed;
        ship.fit_item("Overdrive Injector I").unwrap();
        assert!((ship.stats.max_speed - base * 1.3).abs() < 1e-5);
        ship.fit_item("200mm Armor Plate I").unwrap();
        assert!((ship.stats.max_speed - base * 1.2).abs() < 1e-5);
    }

    fn assert_stats_close(a: &ShipStats, b: &ShipStats, name: &str) {
        let pairs = [
            (a.max_speed, b.max_speed),
            (a.max_shield, b.max_shield),
            (a.shield_regen, b.shield_regen),
            (a.max_armor, b.max_armor),
            (a.max_hull, b.max_hull),
            (a.max_cap, b.max_cap),
            (a.cap_regen, b.cap_regen),
            (a.cargo_capacity, b.cargo_capacity),
            (a.damage_multiplier, b.damage_multiplier),
            (a.warp_cooldown_multiplier, b.warp_cooldown_multiplier),
        ];
        for (x, y) in pairs {
            assert!((x - y).abs() < 1e-4, "{name}: {x} != {y}");
        }
    }

    #[test]
    fn test_fit_unfit_round_trip_for_every_item() {
        for equipment in catalog::all_equipment() {
            let mut ship = velator();
            ship.defense.shield = ship.stats.max_shield * 0.5;
            ship.defense.armor = ship.stats.max_armor * 0.5;
            ship.defense.hull = ship.stats.max_hull * 0.5;
            ship.cap = ship.stats.max_cap * 0.5;
            let stats = ship.stats;
            let pools = (ship.defense.shield, ship.defense.armor, ship.defense.hull, ship.cap);

            let name = equipment.name();
            ship.fit(equipment).unwrap();
            ship.unfit(equipment.slot(), 0).unwrap();

            assert_stats_close(&ship.stats, &stats, name);
            let after = (ship.defense.shield, ship.defense.armor, ship.defense.hull, ship.cap);
            for (x, y) in [(after.0, pools.0), (after.1, pools.1), (after.2, pools.2), (after.3, pools.3)] {
                assert!((x - y).abs() < 1e-4, "{name}: pool {x} != {y}");
            }
        }
    }

    #[test]
    fn test_capacitor_battery_shifts_partial_pool() {
        let mut ship = velator();
        let base_max = ship.stats.max_cap;
        ship.cap = base_max * 0.5;

        ship.fit_item("Capacitor Battery I").unwrap();
        let bonus = ship.stats.max_cap - base_max;
        assert!(bonus > 0.0);
        assert!((ship.cap - (base_max * 0.5 + bonus)).abs() < 1e-4);

        ship.unfit(SlotClass::Medium, 0).unwrap();
        assert_eq!(ship.stats.max_cap, base_max);
        assert!((ship.cap - base_max * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_fitting_resources_never_exceed_totals() {
        let mut ship = velator();
        for equipment in catalog::all_equipment() {
            let _ = ship.fit(equipment);
            assert!(ship.fitting.powergrid_used() <= ship.template.powergrid);
            assert!(ship.fitting.cpu_used() <= ship.template.cpu);
        }
    }
}
