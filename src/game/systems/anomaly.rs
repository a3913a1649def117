//! Cosmic anomaly pockets: entry, content generation, completion, rewards
//! and exit.
//!
//! A pocket lives at fixed coordinates far outside the system rectangle.
//! Everything spawned for it carries the anomaly id as its pocket tag, and is
//! removed again when the pilot leaves. A completed site is removed on exit
//! and comes back at the same pocket after its respawn delay.

use rand::Rng;
use thiserror::Error;
use tracing::{debug, info};

use crate::game::catalog::anomalies::{self, AnomalyCategory, AnomalyType};
use crate::game::catalog::ores::{MetalKind, OreKind};
use crate::game::constants::{anomaly, mining, time};
use crate::game::events::GameEvent;
use crate::game::items::{self, Item};
use crate::game::state::{
    AnomalyRespawn, Asteroid, EntityId, Npc, PocketEntry, WorldState, Wreck,
};
use crate::util::rng::{float_between, signed_offset};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnomalyError {
    #[error("no anomaly {0} in this system")]
    Unknown(EntityId),
    #[error("anomaly {0} has not been scanned down")]
    NotDiscovered(EntityId),
    #[error("anomaly {0} already completed")]
    Completed(EntityId),
    #[error("already inside an anomaly")]
    AlreadyInside,
    #[error("not inside an anomaly")]
    NotInside,
}

/// What a completed site paid out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardSummary {
    pub bounty: u64,
    pub metal_units: u32,
    pub ore_units: u32,
    pub special_loot: Option<&'static str>,
    /// Items that did not fit in cargo and went to the station hangar
    pub overflow: usize,
}

/// Mark a site as found so it can be selected and warped to
pub fn scan(world: &mut WorldState, id: EntityId) -> Result<(), AnomalyError> {
    let site = world
        .system_mut()
        .anomaly_mut(id)
        .ok_or(AnomalyError::Unknown(id))?;
    if !site.discovered {
        site.discovered = true;
        debug!(site = site.kind.name, "anomaly scanned down");
    }
    Ok(())
}

/// Move the pilot into a site's pocket and spawn its content
pub fn enter(world: &mut WorldState, id: EntityId) -> Result<(), AnomalyError> {
    if world.player.pocket.is_some() {
        return Err(AnomalyError::AlreadyInside);
    }
    let site = world.system().anomaly(id).ok_or(AnomalyError::Unknown(id))?;
    if !site.discovered {
        return Err(AnomalyError::NotDiscovered(id));
    }
    if site.reward_claimed {
        return Err(AnomalyError::Completed(id));
    }
    let kind = site.kind;
    let center = site.pocket_center;

    world.player.pocket = Some(PocketEntry {
        anomaly: id,
        center,
        return_position: world.player.position,
        return_velocity: world.player.velocity,
    });
    world.player.position = center;
    world.player.velocity = Vec2::ZERO;

    generate_content(world, id, kind, center);
    world.validate_selection();

    info!(site = kind.name, "entered anomaly");
    world.emit(GameEvent::AnomalyEntered {
        name: kind.name.to_string(),
    });
    Ok(())
}

/// Spawn the pocket population for a site
pub fn generate_content(
    world: &mut WorldState,
    id: EntityId,
    kind: &'static AnomalyType,
    center: Vec2,
) {
    clear_content(world, id);

    if let Some(defenders) = &kind.npcs {
        let count = defenders.count.roll(&mut world.rng);
        for _ in 0..count {
            let position = center
                + signed_offset(
                    &mut world.rng,
                    anomaly::NPC_OFFSET_MIN,
                    anomaly::NPC_OFFSET_MAX,
                );
            let npc_id = world.next_id();
            let mut npc = Npc::spawn(npc_id, position, &mut world.rng);
            npc.scale_defenses(defenders.difficulty);
            npc.pocket = Some(id);
            world.system_mut().npcs.push(npc);
        }
    }

    if kind.category == AnomalyCategory::Mining {
        if let Some(belt) = &kind.asteroids {
            let count = belt.count.roll(&mut world.rng);
            for _ in 0..count {
                let ore = pick(&mut world.rng, belt.ores).unwrap_or(OreKind::Veldspar);
                let amount = float_between(
                    &mut world.rng,
                    mining::POCKET_AMOUNT_MIN,
                    mining::POCKET_AMOUNT_MAX,
                )
                .floor() as u32;
                let position = center
                    + signed_offset(
                        &mut world.rng,
                        anomaly::ASTEROID_OFFSET_MIN,
                        anomaly::ASTEROID_OFFSET_MAX,
                    );
                let rock_id = world.next_id();
                let mut rock = Asteroid::new(rock_id, position, amount, ore);
                rock.radius *= belt.size_multiplier;
                rock.pocket = Some(id);
                world.system_mut().asteroids.push(rock);
            }
        }
    }

    if let Some(containers) = kind.containers {
        let label = match kind.category {
            AnomalyCategory::Relic => "Relic Container",
            _ => "Data Container",
        };
        let count = containers.roll(&mut world.rng);
        for _ in 0..count {
            let position = center
                + signed_offset(
                    &mut world.rng,
                    anomaly::CONTAINER_OFFSET_MIN,
                    anomaly::CONTAINER_OFFSET_MAX,
                );
            let loot = anomalies::roll_special_loot(1.0, &mut world.rng)
                .map(Item::loot)
                .into_iter()
                .collect();
            let box_id = world.next_id();
            let mut container = Wreck::new(box_id, label, position, loot);
            container.despawn_timer = None;
            container.pocket = Some(id);
            world.system_mut().wrecks.push(container);
        }
    }

    let sys = world.system();
    debug!(
        site = kind.name,
        npcs = sys.npcs.iter().filter(|n| n.pocket == Some(id)).count(),
        asteroids = sys.asteroids.iter().filter(|a| a.pocket == Some(id)).count(),
        containers = sys.wrecks.iter().filter(|w| w.pocket == Some(id)).count(),
        "pocket populated"
    );
}

fn pick<R: Rng + ?Sized, T: Copy>(rng: &mut R, options: &[T]) -> Option<T> {
    if options.is_empty() {
        None
    } else {
        Some(options[rng.gen_range(0..options.len())])
    }
}

/// Remove everything spawned for a pocket
pub fn clear_content(world: &mut WorldState, id: EntityId) {
    let sys = world.system_mut();
    sys.npcs.retain(|n| n.pocket != Some(id));
    sys.asteroids.retain(|a| a.pocket != Some(id));
    sys.wrecks.retain(|w| w.pocket != Some(id));
}

/// Leave the current pocket, restoring position and velocity from entry
pub fn exit(world: &mut WorldState) -> Result<(), AnomalyError> {
    let entry = world.player.pocket.take().ok_or(AnomalyError::NotInside)?;
    clear_content(world, entry.anomaly);
    world.player.position = entry.return_position;
    world.player.velocity = entry.return_velocity;

    let mut name = String::new();
    let claimed = world
        .system()
        .anomaly(entry.anomaly)
        .filter(|a| a.reward_claimed)
        .map(|a| AnomalyRespawn {
            kind: a.kind,
            marker: a.marker,
            pocket_center: a.pocket_center,
        });
    if let Some(site) = world.system().anomaly(entry.anomaly) {
        name = site.kind.name.to_string();
    }
    if let Some(respawn) = claimed {
        let delay = time::ms_to_frames(respawn.kind.respawn_ms);
        let sys = world.system_mut();
        sys.anomalies.retain(|a| a.id != entry.anomaly);
        sys.anomaly_respawns.push(respawn, delay);
        debug!(site = %name, delay, "completed anomaly queued for respawn");
    }

    world.validate_selection();
    info!(site = %name, "left anomaly");
    world.emit(GameEvent::AnomalyExited { name });
    Ok(())
}

/// Has the objective of the site been met?
pub fn is_complete(world: &WorldState, id: EntityId, category: AnomalyCategory) -> bool {
    let sys = world.system();
    match category {
        AnomalyCategory::Combat => !sys.npcs.iter().any(|n| n.pocket == Some(id)),
        AnomalyCategory::Mining => !sys
            .asteroids
            .iter()
            .any(|a| a.pocket == Some(id) && !a.is_depleted()),
        AnomalyCategory::Data | AnomalyCategory::Relic => !sys
            .wrecks
            .iter()
            .any(|w| w.pocket == Some(id) && w.despawn_timer.is_none()),
    }
}

/// Check the current pocket's objective, paying out the first time it is met.
/// Returns whether the site is complete.
pub fn check_completion(world: &mut WorldState) -> bool {
    let Some(id) = world.player.pocket_id() else {
        return false;
    };
    let Some(site) = world.system().anomaly(id) else {
        return false;
    };
    let (kind, claimed) = (site.kind, site.reward_claimed);
    if !is_complete(world, id, kind.category) {
        return false;
    }
    if !claimed {
        if let Some(site) = world.system_mut().anomaly_mut(id) {
            site.reward_claimed = true;
        }
        award_rewards(world, kind);
    }
    true
}

/// Pay out a site's bounty, salvage, ore and special loot
pub fn award_rewards(world: &mut WorldState, kind: &'static AnomalyType) -> RewardSummary {
    let rewards = &kind.rewards;
    let mut summary = RewardSummary::default();
    let mut items = Vec::new();

    if let Some(bounty) = rewards.bounty {
        summary.bounty = u64::from(bounty.roll(&mut world.rng));
        world.player.credits = world.player.credits.saturating_add(summary.bounty);
    }
    if let Some(scrap) = rewards.metal_scrap {
        summary.metal_units = scrap.roll(&mut world.rng);
        for _ in 0..summary.metal_units {
            let metal = pick(&mut world.rng, &MetalKind::ALL).unwrap_or(MetalKind::Tritanium);
            items.push(Item::metal(metal));
        }
    }
    if let Some(ore) = rewards.ore {
        let premium: Vec<OreKind> = OreKind::ALL
            .into_iter()
            .filter(|o| o.price() > anomaly::PREMIUM_ORE_PRICE)
            .collect();
        summary.ore_units = ore.roll(&mut world.rng);
        for _ in 0..summary.ore_units {
            let kind = pick(&mut world.rng, &premium).unwrap_or(OreKind::Kernite);
            items.push(Item::ore(kind));
        }
    }
    if let Some(loot) = anomalies::roll_special_loot(rewards.special_loot, &mut world.rng) {
        summary.special_loot = Some(loot.name);
        items.push(Item::loot(loot));
        world.emit(GameEvent::SpecialLoot {
            name: loot.name.to_string(),
        });
    }

    let capacity = world.player.stats.cargo_capacity;
    for item in items {
        if items::has_room(&world.player.cargo, capacity, item.size) {
            world.player.cargo.push(item);
        } else if let Some(station) = world.system_mut().stations.first_mut() {
            station.inventory.push(item);
            summary.overflow += 1;
        }
    }

    info!(
        site = kind.name,
        bounty = summary.bounty,
        metal = summary.metal_units,
        ore = summary.ore_units,
        "anomaly completed"
    );
    world.emit(GameEvent::AnomalyCompleted {
        name: kind.name.to_string(),
        bounty: summary.bounty,
    });
    summary
}
