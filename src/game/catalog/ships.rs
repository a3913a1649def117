//! Hull templates available at stations.

/// Ship size class. Drives which metals a wreck of this class carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShipClass {
    Frigate,
    Destroyer,
    Cruiser,
    Battlecruiser,
    Battleship,
    Capital,
}

impl ShipClass {
    pub fn label(&self) -> &'static str {
        match self {
            ShipClass::Frigate => "Frigate",
            ShipClass::Destroyer => "Destroyer",
            ShipClass::Cruiser => "Cruiser",
            ShipClass::Battlecruiser => "Battlecruiser",
            ShipClass::Battleship => "Battleship",
            ShipClass::Capital => "Capital",
        }
    }
}

/// Fixed stats of a hull. Current pools are seeded from the maxima.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipTemplate {
    pub name: &'static str,
    pub class: ShipClass,
    pub description: &'static str,
    pub faction: &'static str,

    pub max_speed: f32,
    pub accel: f32,
    pub turn_rate: f32,
    /// Multiplicative velocity retention per frame
    pub drag: f32,

    pub max_shield: f32,
    pub shield_regen: f32,
    pub max_armor: f32,
    pub max_hull: f32,

    pub max_cap: f32,
    pub cap_regen: f32,
    pub cargo_capacity: f32,

    pub powergrid: u32,
    pub cpu: u32,
    pub high_slots: usize,
    pub medium_slots: usize,
    pub low_slots: usize,

    pub price: u64,
}

/// Hull every new pilot starts in
pub const STARTER_SHIP: &str = "Velator";

pub static SHIPS: &[ShipTemplate] = &[
    ShipTemplate {
        name: "Atron",
        class: ShipClass::Frigate,
        description: "A versatile Gallente frigate with balanced stats",
        faction: "Gallente",
        max_speed: 3.5,
        accel: 0.12,
        turn_rate: 0.05,
        drag: 0.98,
        max_shield: 120.0,
        shield_regen: 0.6,
        max_armor: 90.0,
        max_hull: 70.0,
        max_cap: 120.0,
        cap_regen: 1.4,
        cargo_capacity: 120.0,
        powergrid: 50,
        cpu: 100,
        high_slots: 3,
        medium_slots: 3,
        low_slots: 2,
        price: 50_000,
    },
    ShipTemplate {
        name: "Tristan",
        class: ShipClass::Frigate,
        description: "A drone-focused frigate with strong capacitor",
        faction: "Gallente",
        max_speed: 3.2,
        accel: 0.10,
        turn_rate: 0.05,
        drag: 0.98,
        max_shield: 140.0,
        shield_regen: 0.7,
        max_armor: 100.0,
        max_hull: 80.0,
        max_cap: 150.0,
        cap_regen: 1.8,
        cargo_capacity: 100.0,
        powergrid: 50,
        cpu: 100,
        high_slots: 3,
        medium_slots: 3,
        low_slots: 3,
        price: 55_000,
    },
    ShipTemplate {
        name: "Rifter",
        class: ShipClass::Frigate,
        description: "A nimble Minmatar frigate focused on speed",
        faction: "Minmatar",
        max_speed: 4.0,
        accel: 0.15,
        turn_rate: 0.06,
        drag: 0.98,
        max_shield: 100.0,
        shield_regen: 0.5,
        max_armor: 80.0,
        max_hull: 60.0,
        max_cap: 100.0,
        cap_regen: 1.2,
        cargo_capacity: 110.0,
        powergrid: 50,
        cpu: 100,
        high_slots: 4,
        medium_slots: 3,
        low_slots: 2,
        price: 48_000,
    },
    ShipTemplate {
        name: "Velator",
        class: ShipClass::Frigate,
        description: "A basic starter frigate - cheap and reliable",
        faction: "Gallente",
        max_speed: 3.0,
        accel: 0.10,
        turn_rate: 0.04,
        drag: 0.98,
        max_shield: 100.0,
        shield_regen: 0.5,
        max_armor: 80.0,
        max_hull: 60.0,
        max_cap: 100.0,
        cap_regen: 1.2,
        cargo_capacity: 100.0,
        powergrid: 50,
        cpu: 100,
        high_slots: 3,
        medium_slots: 2,
        low_slots: 2,
        price: 0,
    },
];

pub fn find(name: &str) -> Option<&'static ShipTemplate> {
    SHIPS.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_ship_exists_and_is_free() {
        let ship = find(STARTER_SHIP).expect("starter hull");
        assert_eq!(ship.price, 0);
    }

    #[test]
    fn test_every_hull_has_a_high_slot() {
        for ship in SHIPS {
            assert!(ship.high_slots >= 1, "{} has no weapon slot", ship.name);
            assert!(ship.drag > 0.0 && ship.drag < 1.0);
        }
    }

    #[test]
    fn test_unknown_hull() {
        assert!(find("Catalyst").is_none());
    }
}
