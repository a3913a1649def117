//! Minable ores and salvageable metal scrap.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::game::catalog::ships::ShipClass;
use crate::util::rng::int_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OreKind {
    Veldspar,
    Scordite,
    Pyroxeres,
    Plagioclase,
    Omber,
    Kernite,
}

pub struct OreSpec {
    pub price: u64,
    /// Cargo volume per unit
    pub size: f32,
    /// Relative belt abundance
    pub rarity: f32,
}

impl OreKind {
    pub const ALL: [OreKind; 6] = [
        OreKind::Veldspar,
        OreKind::Scordite,
        OreKind::Pyroxeres,
        OreKind::Plagioclase,
        OreKind::Omber,
        OreKind::Kernite,
    ];

    /// Ores a pirate wreck may carry
    pub const WRECK_LOOT: [OreKind; 4] = [
        OreKind::Veldspar,
        OreKind::Scordite,
        OreKind::Pyroxeres,
        OreKind::Plagioclase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OreKind::Veldspar => "Veldspar",
            OreKind::Scordite => "Scordite",
            OreKind::Pyroxeres => "Pyroxeres",
            OreKind::Plagioclase => "Plagioclase",
            OreKind::Omber => "Omber",
            OreKind::Kernite => "Kernite",
        }
    }

    pub fn spec(&self) -> OreSpec {
        let (price, size, rarity) = match self {
            OreKind::Veldspar => (12, 1.0, 0.4),
            OreKind::Scordite => (18, 1.2, 0.3),
            OreKind::Pyroxeres => (25, 1.5, 0.15),
            OreKind::Plagioclase => (32, 1.8, 0.1),
            OreKind::Omber => (45, 2.0, 0.04),
            OreKind::Kernite => (70, 2.5, 0.01),
        };
        OreSpec { price, size, rarity }
    }

    pub fn size(&self) -> f32 {
        self.spec().size
    }

    pub fn price(&self) -> u64 {
        self.spec().price
    }

    pub fn from_name(name: &str) -> Option<OreKind> {
        OreKind::ALL.into_iter().find(|o| o.name() == name)
    }

    /// Roll a belt ore for a system; richer ores only appear in lower security
    pub fn roll_for_security<R: Rng + ?Sized>(security: f32, rng: &mut R) -> OreKind {
        let roll: f32 = rng.gen();
        let table: &[(f32, OreKind)] = if security > 0.5 {
            &[(0.7, OreKind::Veldspar), (0.9, OreKind::Scordite)]
        } else if security > 0.2 {
            &[
                (0.4, OreKind::Veldspar),
                (0.65, OreKind::Scordite),
                (0.85, OreKind::Pyroxeres),
                (0.95, OreKind::Plagioclase),
            ]
        } else {
            &[
                (0.2, OreKind::Veldspar),
                (0.4, OreKind::Scordite),
                (0.6, OreKind::Pyroxeres),
                (0.8, OreKind::Plagioclase),
                (0.95, OreKind::Omber),
            ]
        };
        let fallback = if security > 0.5 {
            OreKind::Pyroxeres
        } else if security > 0.2 {
            OreKind::Omber
        } else {
            OreKind::Kernite
        };
        table
            .iter()
            .find(|(threshold, _)| roll < *threshold)
            .map(|(_, ore)| *ore)
            .unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetalKind {
    Tritanium,
    Pyerite,
    Mexallon,
    Isogen,
}

impl MetalKind {
    pub const ALL: [MetalKind; 4] = [
        MetalKind::Tritanium,
        MetalKind::Pyerite,
        MetalKind::Mexallon,
        MetalKind::Isogen,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            MetalKind::Tritanium => "Tritanium Scrap",
            MetalKind::Pyerite => "Pyerite Scrap",
            MetalKind::Mexallon => "Mexallon Scrap",
            MetalKind::Isogen => "Isogen Scrap",
        }
    }

    pub fn price(&self) -> u64 {
        match self {
            MetalKind::Tritanium => 35,
            MetalKind::Pyerite => 55,
            MetalKind::Mexallon => 85,
            MetalKind::Isogen => 120,
        }
    }

    pub fn size(&self) -> f32 {
        match self {
            MetalKind::Tritanium => 0.5,
            MetalKind::Pyerite => 0.6,
            MetalKind::Mexallon => 0.7,
            MetalKind::Isogen => 0.8,
        }
    }

    /// Hull classes whose wrecks yield this metal
    pub fn drops_from(&self, class: ShipClass) -> bool {
        use ShipClass::*;
        match self {
            MetalKind::Tritanium => matches!(class, Frigate | Destroyer),
            MetalKind::Pyerite => matches!(class, Cruiser | Battlecruiser),
            MetalKind::Mexallon | MetalKind::Isogen => matches!(class, Battleship | Capital),
        }
    }

    pub fn from_name(name: &str) -> Option<MetalKind> {
        MetalKind::ALL.into_iter().find(|m| m.name() == name)
    }

    /// Pick a salvage metal appropriate for a destroyed hull
    pub fn roll_for_class<R: Rng + ?Sized>(class: ShipClass, rng: &mut R) -> MetalKind {
        let candidates: Vec<MetalKind> = MetalKind::ALL
            .into_iter()
            .filter(|m| m.drops_from(class))
            .collect();
        if candidates.is_empty() {
            return MetalKind::Tritanium;
        }
        candidates[rng.gen_range(0..candidates.len())]
    }

    /// Number of scrap units a destroyed hull leaves behind
    pub fn roll_amount<R: Rng + ?Sized>(class: ShipClass, rng: &mut R) -> u32 {
        let (min, max) = match class {
            ShipClass::Capital => (20, 29),
            ShipClass::Battleship => (12, 19),
            ShipClass::Battlecruiser => (8, 13),
            ShipClass::Cruiser => (5, 9),
            ShipClass::Destroyer => (3, 6),
            ShipClass::Frigate => (2, 4),
        };
        int_between(rng, min, max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::rng::seeded;

    #[test]
    fn test_high_sec_belts_stay_common() {
        let mut rng = seeded(Some(11));
        for _ in 0..500 {
            let ore = OreKind::roll_for_security(0.9, &mut rng);
            assert!(matches!(
                ore,
                OreKind::Veldspar | OreKind::Scordite | OreKind::Pyroxeres
            ));
        }
    }

    #[test]
    fn test_only_null_sec_rolls_kernite() {
        let mut rng = seeded(Some(12));
        let mut saw_kernite = false;
        for _ in 0..2000 {
            assert_ne!(OreKind::roll_for_security(0.3, &mut rng), OreKind::Kernite);
            if OreKind::roll_for_security(0.0, &mut rng) == OreKind::Kernite {
                saw_kernite = true;
            }
        }
        assert!(saw_kernite);
    }

    #[test]
    fn test_frigate_salvage() {
        let mut rng = seeded(Some(5));
        for _ in 0..100 {
            assert_eq!(MetalKind::roll_for_class(ShipClass::Frigate, &mut rng), MetalKind::Tritanium);
            let n = MetalKind::roll_amount(ShipClass::Frigate, &mut rng);
            assert!((2..=4).contains(&n));
        }
    }

    #[test]
    fn test_capital_salvage_is_rich() {
        let mut rng = seeded(Some(6));
        let metal = MetalKind::roll_for_class(ShipClass::Capital, &mut rng);
        assert!(matches!(metal, MetalKind::Mexallon | MetalKind::Isogen));
        assert!(MetalKind::roll_amount(ShipClass::Capital, &mut rng) >= 20);
    }

    #[test]
    fn test_name_lookup() {
        assert_eq!(OreKind::from_name("Omber"), Some(OreKind::Omber));
        assert_eq!(MetalKind::from_name("Isogen Scrap"), Some(MetalKind::Isogen));
        assert_eq!(OreKind::from_name("Unobtainium"), None);
    }
}
