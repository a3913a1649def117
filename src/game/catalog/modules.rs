//! Medium and low slot subsystems.

use crate::game::fitting::SlotClass;

/// Effect of a module. Active variants cycle while switched on; passive
/// variants apply for as long as the module is fitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ModuleEffect {
    ShieldBooster {
        amount: f32,
        cycle_frames: f32,
        capacitor_use: f32,
    },
    ArmorRepairer {
        amount: f32,
        cycle_frames: f32,
        capacitor_use: f32,
    },
    /// Multiplies max speed; drains `capacitor_per_second / 60` per frame
    Afterburner {
        speed_multiplier: f32,
        capacitor_per_second: f32,
    },
    ShieldExtender { shield: f32 },
    ShieldRecharger { regen: f32 },
    ArmorPlate { armor: f32, speed_penalty: f32 },
    OverdriveInjector { speed_bonus: f32 },
    CapacitorRecharger { regen: f32 },
    CapacitorBattery { capacitor: f32 },
    DamageAmplifier { bonus: f32 },
    CargoExpander { cargo: f32 },
    WarpCoreStabilizer { cooldown_reduction: f32 },
}

impl ModuleEffect {
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            ModuleEffect::ShieldBooster { .. }
                | ModuleEffect::ArmorRepairer { .. }
                | ModuleEffect::Afterburner { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ModuleSpec {
    pub name: &'static str,
    pub description: &'static str,
    pub slot: SlotClass,
    pub effect: ModuleEffect,
    pub powergrid: u32,
    pub cpu: u32,
    pub price: u64,
}

pub static MODULES: &[ModuleSpec] = &[
    ModuleSpec {
        name: "Small Shield Booster I",
        description: "Repairs shield when activated",
        slot: SlotClass::Medium,
        effect: ModuleEffect::ShieldBooster {
            amount: 30.0,
            cycle_frames: 60.0,
            capacitor_use: 20.0,
        },
        powergrid: 2,
        cpu: 20,
        price: 8000,
    },
    ModuleSpec {
        name: "Small Shield Extender I",
        description: "Increases maximum shield capacity",
        slot: SlotClass::Medium,
        effect: ModuleEffect::ShieldExtender { shield: 50.0 },
        powergrid: 1,
        cpu: 15,
        price: 6000,
    },
    ModuleSpec {
        name: "Shield Recharger I",
        description: "Increases shield regeneration rate",
        slot: SlotClass::Medium,
        effect: ModuleEffect::ShieldRecharger { regen: 0.3 },
        powergrid: 1,
        cpu: 12,
        price: 7000,
    },
    ModuleSpec {
        name: "Small Armor Repairer I",
        description: "Repairs armor when activated",
        slot: SlotClass::Low,
        effect: ModuleEffect::ArmorRepairer {
            amount: 25.0,
            cycle_frames: 90.0,
            capacitor_use: 15.0,
        },
        powergrid: 3,
        cpu: 18,
        price: 9000,
    },
    ModuleSpec {
        name: "200mm Armor Plate I",
        description: "Increases armor hit points but reduces speed",
        slot: SlotClass::Low,
        effect: ModuleEffect::ArmorPlate {
            armor: 60.0,
            speed_penalty: 0.1,
        },
        powergrid: 2,
        cpu: 8,
        price: 5000,
    },
    ModuleSpec {
        name: "1MN Afterburner I",
        description: "Increases speed while active",
        slot: SlotClass::Medium,
        effect: ModuleEffect::Afterburner {
            speed_multiplier: 1.5,
            capacitor_per_second: 8.0,
        },
        powergrid: 1,
        cpu: 20,
        price: 12_000,
    },
    ModuleSpec {
        name: "Overdrive Injector I",
        description: "Permanently increases maximum speed",
        slot: SlotClass::Low,
        effect: ModuleEffect::OverdriveInjector { speed_bonus: 0.3 },
        powergrid: 1,
        cpu: 10,
        price: 8000,
    },
    ModuleSpec {
        name: "Capacitor Recharger I",
        description: "Increases capacitor recharge rate",
        slot: SlotClass::Medium,
        effect: ModuleEffect::CapacitorRecharger { regen: 0.5 },
        powergrid: 0,
        cpu: 15,
        price: 7000,
    },
    ModuleSpec {
        name: "Capacitor Battery I",
        description: "Increases maximum capacitor capacity",
        slot: SlotClass::Medium,
        effect: ModuleEffect::CapacitorBattery { capacitor: 40.0 },
        powergrid: 1,
        cpu: 12,
        price: 6000,
    },
    ModuleSpec {
        name: "Magnetic Field Stabilizer I",
        description: "Increases hybrid turret damage",
        slot: SlotClass::Low,
        effect: ModuleEffect::DamageAmplifier { bonus: 0.10 },
        powergrid: 1,
        cpu: 18,
        price: 10_000,
    },
    ModuleSpec {
        name: "Heat Sink I",
        description: "Increases laser damage",
        slot: SlotClass::Low,
        effect: ModuleEffect::DamageAmplifier { bonus: 0.10 },
        powergrid: 1,
        cpu: 18,
        price: 10_000,
    },
    ModuleSpec {
        name: "Gyrostabilizer I",
        description: "Increases projectile weapon damage",
        slot: SlotClass::Low,
        effect: ModuleEffect::DamageAmplifier { bonus: 0.10 },
        powergrid: 1,
        cpu: 18,
        price: 10_000,
    },
    ModuleSpec {
        name: "Ballistic Control System I",
        description: "Increases missile damage",
        slot: SlotClass::Low,
        effect: ModuleEffect::DamageAmplifier { bonus: 0.10 },
        powergrid: 1,
        cpu: 18,
        price: 10_000,
    },
    ModuleSpec {
        name: "Cargo Expander I",
        description: "Increases cargo capacity",
        slot: SlotClass::Low,
        effect: ModuleEffect::CargoExpander { cargo: 50.0 },
        powergrid: 0,
        cpu: 8,
        price: 5000,
    },
    ModuleSpec {
        name: "Warp Core Stabilizer I",
        description: "Reduces warp cooldown time",
        slot: SlotClass::Low,
        effect: ModuleEffect::WarpCoreStabilizer {
            cooldown_reduction: 0.2,
        },
        powergrid: 1,
        cpu: 15,
        price: 15_000,
    },
];

pub fn find(name: &str) -> Option<&'static ModuleSpec> {
    MODULES.iter().find(|m| m.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_module_claims_high_slot() {
        for m in MODULES {
            assert_ne!(m.slot, SlotClass::High, "{} sits in a weapon slot", m.name);
        }
    }

    #[test]
    fn test_active_modules() {
        let active: Vec<_> = MODULES
            .iter()
            .filter(|m| m.effect.is_active())
            .map(|m| m.name)
            .collect();
        assert_eq!(
            active,
            vec!["Small Shield Booster I", "Small Armor Repairer I", "1MN Afterburner I"]
        );
    }
}
