//! Procedural population of the fixed star map.
//!
//! Topology, stations and security levels come from the static system table.
//! Belts, pirates and anomaly sites are rolled per system: lower security
//! means more rocks, more pirates and more sites.

use rand::Rng;
use tracing::debug;

use crate::game::catalog::anomalies;
use crate::game::catalog::ores::OreKind;
use crate::game::catalog::systems::{SystemData, SYSTEMS};
use crate::game::constants::{anomaly, mining, universe};
use crate::game::state::{Anomaly, Asteroid, IdGen, Npc, StarSystem, Stargate, Station};
use crate::util::rng::{float_between, int_between};
use crate::util::vec2::Vec2;

/// Security band of a system
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecurityBand {
    High,
    Low,
    Null,
}

impl SecurityBand {
    pub fn of(security: f32) -> Self {
        if security >= universe::HIGH_SEC {
            SecurityBand::High
        } else if security >= universe::LOW_SEC {
            SecurityBand::Low
        } else {
            SecurityBand::Null
        }
    }

    pub fn asteroid_count(&self) -> u32 {
        match self {
            SecurityBand::High => 8,
            SecurityBand::Low => 12,
            SecurityBand::Null => 16,
        }
    }

    pub fn roll_npc_count<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        match self {
            SecurityBand::High => int_between(rng, 1, 3),
            SecurityBand::Low => int_between(rng, 3, 7),
            SecurityBand::Null => int_between(rng, 5, 12),
        }
    }

    pub fn roll_anomaly_count<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let count = match self {
            SecurityBand::High => int_between(rng, 2, 3),
            SecurityBand::Low => int_between(rng, 2, 4),
            SecurityBand::Null => anomaly::MAX_PER_SYSTEM as u32,
        };
        (count as usize).min(anomaly::MAX_PER_SYSTEM)
    }
}

/// Random point in the populated interior of a system
pub fn scatter<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    Vec2::new(
        float_between(rng, universe::SCATTER_MIN, universe::SCATTER_MAX),
        float_between(rng, universe::SCATTER_MIN, universe::SCATTER_MAX),
    )
}

/// Build every system on the map with its gates, station and rolled content
pub fn generate<R: Rng + ?Sized>(rng: &mut R, ids: &mut IdGen) -> Vec<StarSystem> {
    SYSTEMS
        .iter()
        .map(|data| {
            let mut system = build_system(data, ids);
            populate(&mut system, rng, ids);
            debug!(
                system = system.name,
                asteroids = system.asteroids.len(),
                npcs = system.npcs.len(),
                anomalies = system.anomalies.len(),
                "system generated"
            );
            system
        })
        .collect()
}

/// Fixed structures: gates on a ring around the centre, one station at the centre
fn build_system(data: &'static SystemData, ids: &mut IdGen) -> StarSystem {
    let mut system = StarSystem::empty(data.name, data.security);
    system.map_position = Vec2::new(data.map.0, data.map.1);

    let center = universe::STATION_POSITION;
    let gate_count = data.gates.len().max(1) as f32;
    for (n, &destination) in data.gates.iter().enumerate() {
        let angle = n as f32 / gate_count * std::f32::consts::TAU;
        let position = center + Vec2::new(angle.cos(), angle.sin()) * universe::GATE_RING_RADIUS;
        system.stargates.push(Stargate {
            id: ids.next(),
            name: format!("Gate to {}", SYSTEMS[destination].name),
            position,
            destination,
        });
    }

    system.stations.push(Station {
        id: ids.next(),
        name: data.station,
        position: center,
        inventory: Vec::new(),
    });
    system
}

fn populate<R: Rng + ?Sized>(system: &mut StarSystem, rng: &mut R, ids: &mut IdGen) {
    let band = SecurityBand::of(system.security);

    for _ in 0..band.asteroid_count() {
        let ore = OreKind::roll_for_security(system.security, rng);
        let amount = float_between(rng, mining::BELT_AMOUNT_MIN, mining::BELT_AMOUNT_MAX).round();
        let position = scatter(rng);
        system
            .asteroids
            .push(Asteroid::new(ids.next(), position, amount as u32, ore));
    }

    for _ in 0..band.roll_npc_count(rng) {
        let position = scatter(rng);
        system.npcs.push(Npc::spawn(ids.next(), position, rng));
    }

    for slot in 0..band.roll_anomaly_count(rng) {
        let kind = anomalies::roll_type(rng);
        let marker = scatter(rng);
        system.anomalies.push(Anomaly::spawn(
            ids.next(),
            kind,
            marker,
            anomaly::POCKET_SLOTS[slot],
            rng,
        ));
    }
}
