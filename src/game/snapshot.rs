//! Read-only view of what the pilot can see, for renderers and UI panels.
//!
//! Only entities visible from the player's current space are included:
//! pocket content while inside an anomaly, system content otherwise.
//! Stations, gates and discovered anomaly markers are always listed.

use serde::{Deserialize, Serialize};

use crate::game::state::{visible_to, EntityId, Shooter, WorldState};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub ship: String,
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading: f32,
    pub shield: f32,
    pub max_shield: f32,
    pub armor: f32,
    pub max_armor: f32,
    pub hull: f32,
    pub max_hull: f32,
    pub cap: f32,
    pub max_cap: f32,
    pub cargo_used: f32,
    pub cargo_capacity: f32,
    pub credits: u64,
    /// Travel phase label, e.g. "aligning" or "warping"
    pub travel: String,
    pub in_anomaly: Option<String>,
    pub jump_flash: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Npc,
    Asteroid,
    Wreck,
    Station,
    Stargate,
    Anomaly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub name: String,
    pub position: Vec2,
    pub radius: f32,
    /// Health or ore fraction in [0, 1] where it applies
    pub fill: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamSnapshot {
    pub from: Vec2,
    pub to: Vec2,
    /// Remaining life in [0, 1]
    pub alpha: f32,
    pub hit: bool,
    pub hostile: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub tick: u64,
    pub system: String,
    pub security: f32,
    pub player: PlayerSnapshot,
    pub selected: Option<EntityId>,
    pub entities: Vec<EntitySnapshot>,
    pub beams: Vec<BeamSnapshot>,
}

impl RenderSnapshot {
    pub fn from_world(world: &WorldState) -> Self {
        let sys = world.system();
        let ship = &world.player;
        let viewer = ship.pocket_id();

        let player = PlayerSnapshot {
            ship: ship.template.name.to_string(),
            position: ship.position,
            velocity: ship.velocity,
            heading: ship.heading,
            shield: ship.defense.shield,
            max_shield: ship.stats.max_shield,
            armor: ship.defense.armor,
            max_armor: ship.stats.max_armor,
            hull: ship.defense.hull,
            max_hull: ship.stats.max_hull,
            cap: ship.cap,
            max_cap: ship.stats.max_cap,
            cargo_used: ship.cargo_used(),
            cargo_capacity: ship.stats.cargo_capacity,
            credits: ship.credits,
            travel: ship.travel.label().to_string(),
            in_anomaly: viewer
                .and_then(|id| sys.anomaly(id))
                .map(|a| a.kind.name.to_string()),
            jump_flash: ship.jump_flash,
        };

        let mut entities = Vec::new();
        for s in &sys.stations {
            entities.push(EntitySnapshot {
                id: s.id,
                kind: EntityKind::Station,
                name: s.name.to_string(),
                position: s.position,
                radius: 60.0,
                fill: None,
            });
        }
        for g in &sys.stargates {
            entities.push(EntitySnapshot {
                id: g.id,
                kind: EntityKind::Stargate,
                name: g.name.clone(),
                position: g.position,
                radius: 40.0,
                fill: None,
            });
        }
        for a in sys.anomalies.iter().filter(|a| a.discovered && viewer != Some(a.id)) {
            entities.push(EntitySnapshot {
                id: a.id,
                kind: EntityKind::Anomaly,
                name: a.kind.name.to_string(),
                position: a.marker,
                radius: 30.0,
                fill: None,
            });
        }
        for n in sys.npcs.iter().filter(|n| visible_to(n.pocket, viewer)) {
            let max = n.max_shield + n.max_armor + n.max_hull;
            let current = n.defense.shield + n.defense.armor + n.defense.hull;
            entities.push(EntitySnapshot {
                id: n.id,
                kind: EntityKind::Npc,
                name: "Pirate Frigate".to_string(),
                position: n.position,
                radius: 12.0,
                fill: Some(if max > 0.0 { current / max } else { 0.0 }),
            });
        }
        for r in sys.asteroids.iter().filter(|r| visible_to(r.pocket, viewer)) {
            entities.push(EntitySnapshot {
                id: r.id,
                kind: EntityKind::Asteroid,
                name: r.ore.name().to_string(),
                position: r.position,
                radius: r.radius,
                fill: Some(r.amount as f32 / r.max_amount.max(1) as f32),
            });
        }
        for w in sys.wrecks.iter().filter(|w| visible_to(w.pocket, viewer)) {
            entities.push(EntitySnapshot {
                id: w.id,
                kind: EntityKind::Wreck,
                name: w.name.to_string(),
                position: w.position,
                radius: 10.0,
                fill: None,
            });
        }

        let beams = world
            .effects
            .iter()
            .map(|e| BeamSnapshot {
                from: e.from,
                to: e.to,
                alpha: if e.max_life > 0.0 { (e.life / e.max_life).clamp(0.0, 1.0) } else { 0.0 },
                hit: e.hit,
                hostile: e.owner == Shooter::Npc,
            })
            .collect();

        Self {
            tick: world.tick,
            system: sys.name.to_string(),
            security: sys.security,
            player,
            selected: world.selection.map(|t| t.id),
            entities,
            beams,
        }
    }

    /// Entities within `radius` of the player, nearest first
    pub fn nearby(&self, radius: f32) -> Vec<&EntitySnapshot> {
        let origin = self.player.position;
        let mut near: Vec<_> = self
            .entities
            .iter()
            .filter(|e| e.position.distance_to(origin) <= radius)
            .collect();
        near.sort_by(|a, b| {
            a.position
                .distance_to(origin)
                .total_cmp(&b.position.distance_to(origin))
        });
        near
    }
}

/// Encode a snapshot for an out-of-process renderer
pub fn encode(snapshot: &RenderSnapshot) -> Result<Vec<u8>, EncodeError> {
    bincode::serde::encode_to_vec(snapshot, bincode::config::legacy())
        .map_err(|e| EncodeError(e.to_string()))
}

pub fn decode(data: &[u8]) -> Result<RenderSnapshot, DecodeError> {
    bincode::serde::decode_from_slice(data, bincode::config::legacy())
        .map(|(snapshot, _)| snapshot)
        .map_err(|e| DecodeError(e.to_string()))
}

#[derive(Debug, thiserror::Error)]
#[error("Encode error: {0}")]
pub struct EncodeError(String);

#[derive(Debug, thiserror::Error)]
#[error("Decode error: {0}")]
pub struct DecodeError(String);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::anomalies;
    use crate::game::catalog::ores::OreKind;
    use crate::game::constants::anomaly;
    use crate::game::state::{Anomaly, Asteroid, WorldOptions};
    use crate::game::systems::anomaly as pockets;

    fn world_with_site() -> (WorldState, EntityId, EntityId) {
        let mut world = WorldState::sandbox(12);
        world.player.position = Vec2::new(6000.0, 6000.0);
        let rock = world.next_id();
        world
            .system_mut()
            .asteroids
            .push(Asteroid::new(rock, Vec2::new(6100.0, 6000.0), 200, OreKind::Veldspar));
        let site = world.next_id();
        world.system_mut().anomalies.push(Anomaly {
            id: site,
            kind: anomalies::find("Ordinary Perimeter Deposit").unwrap(),
            discovered: true,
            marker: Vec2::new(7000.0, 7000.0),
            pocket_center: anomaly::POCKET_SLOTS[2],
            reward_claimed: false,
        });
        (world, rock, site)
    }

    fn has(snapshot: &RenderSnapshot, id: EntityId) -> bool {
        snapshot.entities.iter().any(|e| e.id == id)
    }

    #[test]
    fn test_system_view() {
        let (world, rock, site) = world_with_site();
        let snap = RenderSnapshot::from_world(&world);
        assert!(has(&snap, rock));
        assert!(has(&snap, site));
        assert_eq!(snap.player.travel, "idle");
        assert!(snap.player.in_anomaly.is_none());
        assert_eq!(snap.system, "Sandbox");
    }

    #[test]
    fn test_pocket_view_hides_system_content() {
        let (mut world, rock, site) = world_with_site();
        pockets::enter(&mut world, site).unwrap();
        let snap = RenderSnapshot::from_world(&world);
        assert!(!has(&snap, rock));
        assert!(!has(&snap, site));
        assert!(snap
            .entities
            .iter()
            .any(|e| e.kind == EntityKind::Asteroid));
        assert!(snap.entities.iter().any(|e| e.kind == EntityKind::Station));
        assert_eq!(
            snap.player.in_anomaly.as_deref(),
            Some("Ordinary Perimeter Deposit")
        );
    }

    #[test]
    fn test_nearby_sorted() {
        let (world, rock, _) = world_with_site();
        let snap = RenderSnapshot::from_world(&world);
        let near = snap.nearby(2000.0);
        assert_eq!(near[0].id, rock);
        assert!(near.iter().all(|e| e.kind != EntityKind::Station));
    }

    #[test]
    fn test_encode_generated_world() {
        let world = WorldState::new(WorldOptions {
            seed: Some(3),
            ..Default::default()
        })
        .unwrap();
        let snap = RenderSnapshot::from_world(&world);
        let bytes = encode(&snap).unwrap();
        assert_eq!(decode(&bytes).unwrap(), snap);
    }
}
