//! Per-tick processing of activated modules.
//!
//! Afterburners drain capacitor continuously and stack multiplicatively.
//! Boosters and repairers cycle: each time the timer runs out they pay
//! their capacitor cost and land a lump of repair. Any module that cannot
//! pay switches itself off.

use tracing::debug;

use crate::game::catalog::modules::ModuleEffect;
use crate::game::constants::time::FRAME_RATE;
use crate::game::events::GameEvent;
use crate::game::fitting::SlotClass;
use crate::game::state::{Ship, WorldState};

/// Run every active module for one step
pub fn update(world: &mut WorldState, dt: f32) {
    for name in process(&mut world.player, dt) {
        world.emit(GameEvent::ModuleDeactivated {
            module: name.to_string(),
        });
    }
}

/// Apply module effects to `ship`. Returns the modules that ran dry.
pub fn process(ship: &mut Ship, dt: f32) -> Vec<&'static str> {
    let mut speed_multiplier = 1.0_f32;
    let mut shut_down = Vec::new();
    let max_shield = ship.stats.max_shield;
    let max_armor = ship.stats.max_armor;

    for class in SlotClass::ALL {
        let Ship {
            fitting,
            cap,
            defense,
            ..
        } = &mut *ship;
        for slot in fitting.slots_mut(class).iter_mut().filter(|s| s.active) {
            let Some(module) = slot.equipment.as_module() else {
                continue;
            };
            match module.effect {
                ModuleEffect::Afterburner {
                    speed_multiplier: bonus,
                    capacitor_per_second,
                } => {
                    let drain = capacitor_per_second / FRAME_RATE as f32 * dt;
                    if *cap >= drain {
                        *cap -= drain;
                        speed_multiplier *= bonus;
                    } else {
                        slot.active = false;
                        shut_down.push(module.name);
                    }
                }
                ModuleEffect::ShieldBooster {
                    amount,
                    cycle_frames,
                    capacitor_use,
                } => {
                    slot.cycle_timer -= dt;
                    if slot.cycle_timer <= 0.0 {
                        if *cap >= capacitor_use {
                            *cap -= capacitor_use;
                            defense.shield = (defense.shield + amount).min(max_shield);
                            slot.cycle_timer = cycle_frames;
                        } else {
                            slot.active = false;
                            shut_down.push(module.name);
                        }
                    }
                }
                ModuleEffect::ArmorRepairer {
                    amount,
                    cycle_frames,
                    capacitor_use,
                } => {
                    slot.cycle_timer -= dt;
                    if slot.cycle_timer <= 0.0 {
                        if *cap >= capacitor_use {
                            *cap -= capacitor_use;
                            defense.armor = (defense.armor + amount).min(max_armor);
                            slot.cycle_timer = cycle_frames;
                        } else {
                            slot.active = false;
                            shut_down.push(module.name);
                        }
                    }
                }
                _ => {}
            }
        }
    }

    ship.speed_multiplier = speed_multiplier;
    for name in &shut_down {
        debug!(module = name, "module deactivated, capacitor empty");
    }
    shut_down
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::ships;
    use crate::util::vec2::Vec2;

    fn ship() -> Ship {
        Ship::new(ships::find("Atron").unwrap(), Vec2::ZERO)
    }

    #[test]
    fn test_afterburner_drains_per_second_rate() {
        let mut s = ship();
        s.fit_item("1MN Afterburner I").unwrap();
        s.toggle_activation(SlotClass::Medium, 0).unwrap();
        let before = s.cap;
        process(&mut s, 1.0);
        assert!((s.speed_multiplier - 1.5).abs() < 1e-6);
        assert!((before - s.cap - 8.0 / 60.0).abs() < 1e-5);
    }

    #[test]
    fn test_afterburners_stack_multiplicatively() {
        let mut s = ship();
        s.fit_item("1MN Afterburner I").unwrap();
        s.fit_item("1MN Afterburner I").unwrap();
        s.toggle_activation(SlotClass::Medium, 0).unwrap();
        s.toggle_activation(SlotClass::Medium, 1).unwrap();
        process(&mut s, 1.0);
        assert!((s.speed_multiplier - 2.25).abs() < 1e-5);
    }

    #[test]
    fn test_inactive_module_has_no_effect() {
        let mut s = ship();
        s.fit_item("1MN Afterburner I").unwrap();
        let before = s.cap;
        process(&mut s, 1.0);
        assert_eq!(s.speed_multiplier, 1.0);
        assert_eq!(s.cap, before);
    }

    #[test]
    fn test_booster_cycles_and_clamps() {
        let mut s = ship();
        s.fit_item("Small Shield Booster I").unwrap();
        s.toggle_activation(SlotClass::Medium, 0).unwrap();
        s.defense.shield = s.stats.max_shield - 10.0;
        let cap = s.cap;

        // First cycle lands immediately
        process(&mut s, 1.0);
        assert_eq!(s.defense.shield, s.stats.max_shield);
        assert_eq!(s.cap, cap - 20.0);

        // Nothing until the cycle timer runs out
        s.defense.shield = 0.0;
        for _ in 0..59 {
            process(&mut s, 1.0);
        }
        assert_eq!(s.defense.shield, 0.0);
        process(&mut s, 1.0);
        assert_eq!(s.defense.shield, 30.0);
    }

    #[test]
    fn test_repairer_shuts_down_without_cap() {
        let mut s = ship();
        s.fit_item("Small Armor Repairer I").unwrap();
        s.toggle_activation(SlotClass::Low, 0).unwrap();
        s.defense.armor = 10.0;
        s.cap = 5.0;
        let off = process(&mut s, 1.0);
        assert_eq!(off, vec!["Small Armor Repairer I"]);
        assert!(!s.fitting.slots(SlotClass::Low)[0].active);
        assert_eq!(s.defense.armor, 10.0);
        assert_eq!(s.cap, 5.0);
    }

    #[test]
    fn test_afterburner_shuts_down_without_cap() {
        let mut s = ship();
        s.fit_item("1MN Afterburner I").unwrap();
        s.toggle_activation(SlotClass::Medium, 0).unwrap();
        s.cap = 0.0;
        process(&mut s, 1.0);
        assert_eq!(s.speed_multiplier, 1.0);
        assert!(!s.fitting.slots(SlotClass::Medium)[0].active);
    }
}
