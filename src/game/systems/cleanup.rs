//! End-of-tick bookkeeping: dead NPCs become wrecks, depleted rocks leave
//! the belt, respawn queues fire, and timers on wrecks and effects run down.

use rand::Rng;
use tracing::debug;

use crate::game::catalog::ores::{MetalKind, OreKind};
use crate::game::catalog::ships::ShipClass;
use crate::game::constants::{npc, respawn};
use crate::game::events::GameEvent;
use crate::game::items::Item;
use crate::game::state::{Anomaly, Asteroid, AsteroidRespawn, Npc, NpcRespawn, WorldState, Wreck};
use crate::game::universe;
use crate::util::rng::int_between;

/// Run every cleanup pass for one step
pub fn update(world: &mut WorldState, dt: f32) {
    reap_npcs(world);
    reap_asteroids(world);
    fire_respawns(world, dt);
    expire_wrecks(world, dt);
    expire_effects(world, dt);
    if world.player.jump_flash > 0.0 {
        world.player.jump_flash = (world.player.jump_flash - dt).max(0.0);
    }
    world.validate_selection();
}

/// Roll the contents of a pirate wreck: one ore stack plus hull salvage
pub fn pirate_loot<R: Rng + ?Sized>(class: ShipClass, rng: &mut R) -> Vec<Item> {
    let ore = OreKind::WRECK_LOOT[rng.gen_range(0..OreKind::WRECK_LOOT.len())];
    let ore_units = int_between(rng, npc::WRECK_ORE_MIN, npc::WRECK_ORE_MAX);
    let metal = MetalKind::roll_for_class(class, rng);
    let metal_units = MetalKind::roll_amount(class, rng);

    let mut items = Vec::with_capacity((ore_units + metal_units) as usize);
    items.extend(std::iter::repeat_with(|| Item::ore(ore)).take(ore_units as usize));
    items.extend(std::iter::repeat_with(|| Item::metal(metal)).take(metal_units as usize));
    items
}

/// Pay bounties for destroyed NPCs and leave wrecks behind
pub fn reap_npcs(world: &mut WorldState) {
    let (dead, alive): (Vec<Npc>, Vec<Npc>) = std::mem::take(&mut world.system_mut().npcs)
        .into_iter()
        .partition(|n| n.defense.is_destroyed());
    world.system_mut().npcs = alive;

    for n in dead {
        let items = pirate_loot(n.class, &mut world.rng);
        let id = world.next_id();
        let mut wreck = Wreck::new(id, "Pirate Wreckage", n.position, items);
        wreck.pocket = n.pocket;
        world.system_mut().wrecks.push(wreck);

        // Replacements spawn in open space, pocket kills included
        world
            .system_mut()
            .npc_respawns
            .push(NpcRespawn, respawn::NPC_FRAMES);
        world.player.credits = world.player.credits.saturating_add(npc::BOUNTY);
        debug!(npc = n.id, pocket = ?n.pocket, "npc destroyed");
        world.emit(GameEvent::Explosion { position: n.position });
        world.emit(GameEvent::NpcDestroyed { bounty: npc::BOUNTY });
    }
}

/// Clear mined-out asteroids. Belt rocks come back later, pocket rocks do not.
pub fn reap_asteroids(world: &mut WorldState) {
    let sys = world.system_mut();
    let mut i = 0;
    while i < sys.asteroids.len() {
        if !sys.asteroids[i].is_depleted() {
            i += 1;
            continue;
        }
        let rock = sys.asteroids.swap_remove(i);
        if rock.pocket.is_none() {
            sys.asteroid_respawns.push(
                AsteroidRespawn {
                    position: rock.position,
                    max_amount: rock.max_amount,
                    ore: rock.ore,
                },
                respawn::ASTEROID_FRAMES,
            );
        }
    }
}

/// Release whatever has come due on the three respawn queues
pub fn fire_respawns(world: &mut WorldState, dt: f32) {
    let npcs = world.system_mut().npc_respawns.tick(dt);
    for _ in npcs {
        let position = universe::scatter(&mut world.rng);
        let id = world.next_id();
        let n = Npc::spawn(id, position, &mut world.rng);
        world.system_mut().npcs.push(n);
    }

    let rocks = world.system_mut().asteroid_respawns.tick(dt);
    for r in rocks {
        let id = world.next_id();
        world
            .system_mut()
            .asteroids
            .push(Asteroid::new(id, r.position, r.max_amount, r.ore));
    }

    let sites = world.system_mut().anomaly_respawns.tick(dt);
    for s in sites {
        let id = world.next_id();
        let site = Anomaly::spawn(id, s.kind, s.marker, s.pocket_center, &mut world.rng);
        debug!(site = s.kind.name, "anomaly respawned");
        world.system_mut().anomalies.push(site);
    }
}

/// Count down wreck lifetimes; drop expired and emptied wrecks
pub fn expire_wrecks(world: &mut WorldState, dt: f32) {
    world.system_mut().wrecks.retain_mut(|w| {
        if let Some(timer) = w.despawn_timer.as_mut() {
            *timer -= dt;
            if *timer <= 0.0 {
                return false;
            }
        }
        !w.items.is_empty()
    });
}

pub fn expire_effects(world: &mut WorldState, dt: f32) {
    world.effects.retain_mut(|e| {
        e.life -= dt;
        e.life > 0.0
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::anomalies;
    use crate::game::state::{AnomalyRespawn, FireEffect, Shooter, Target, TargetKind};
    use crate::util::rng;
    use crate::util::vec2::Vec2;

    fn world_with_dead_npc(pocket: Option<u64>) -> WorldState {
        let mut world = WorldState::sandbox(5);
        world.player.credits = 0;
        let id = world.next_id();
        let mut r = rng::seeded(Some(1));
        let mut n = Npc::spawn(id, Vec2::new(3000.0, 3000.0), &mut r);
        n.defense.hull = 0.0;
        n.defense.armor = 0.0;
        n.defense.shield = 0.0;
        n.pocket = pocket;
        world.system_mut().npcs.push(n);
        world
    }

    #[test]
    fn test_pirate_loot_contents() {
        let mut r = rng::seeded(Some(9));
        for _ in 0..50 {
            let items = pirate_loot(ShipClass::Frigate, &mut r);
            let ore: Vec<_> = items.iter().filter(|i| i.is_ore()).collect();
            let metal: Vec<_> = items.iter().filter(|i| i.is_metal()).collect();
            assert!(ore.len() >= 3 && ore.len() <= 8);
            assert!(ore.iter().all(|i| i.name() == ore[0].name()));
            assert!(metal.len() >= 2 && metal.len() <= 4);
            assert!(metal.iter().all(|i| i.name() == "Tritanium Scrap"));
        }
    }

    #[test]
    fn test_dead_npc_leaves_wreck_and_bounty() {
        let mut world = world_with_dead_npc(None);
        update(&mut world, 1.0);

        assert!(world.system().npcs.is_empty());
        assert_eq!(world.player.credits, 150);
        let wreck = &world.system().wrecks[0];
        assert_eq!(wreck.name, "Pirate Wreckage");
        assert_eq!(wreck.position, Vec2::new(3000.0, 3000.0));
        assert_eq!(wreck.despawn_timer, Some(18_000.0 - 1.0));
        assert_eq!(world.system().npc_respawns.len(), 1);
        let events = world.drain_events();
        assert!(events.contains(&GameEvent::NpcDestroyed { bounty: 150 }));
    }

    #[test]
    fn test_npc_respawn_delay() {
        let mut world = world_with_dead_npc(None);
        update(&mut world, 1.0);
        for _ in 0..1799 {
            fire_respawns(&mut world, 2.0);
        }
        assert!(world.system().npcs.is_empty());
        fire_respawns(&mut world, 2.0);
        assert_eq!(world.system().npcs.len(), 1);
        let p = world.system().npcs[0].position;
        assert!(p.x >= 3000.0 && p.x < 17_000.0);
    }

    #[test]
    fn test_pocket_npc_respawns_in_open_space() {
        let mut world = world_with_dead_npc(Some(77));
        update(&mut world, 1.0);
        assert_eq!(world.system().npc_respawns.len(), 1);
        assert_eq!(world.system().wrecks[0].pocket, Some(77));
        assert_eq!(world.player.credits, 150);

        fire_respawns(&mut world, respawn::NPC_FRAMES);
        let back = &world.system().npcs[0];
        assert!(back.pocket.is_none());
        assert!(back.position.x >= 3000.0 && back.position.x < 17_000.0);
    }

    #[test]
    fn test_depleted_asteroid_queued_with_original_amount() {
        let mut world = WorldState::sandbox(5);
        let id = world.next_id();
        let mut rock = Asteroid::new(id, Vec2::new(5000.0, 6000.0), 300, OreKind::Scordite);
        rock.amount = 0;
        world.system_mut().asteroids.push(rock);
        update(&mut world, 1.0);
        assert!(world.system().asteroids.is_empty());
        assert_eq!(world.system().asteroid_respawns.len(), 1);

        fire_respawns(&mut world, respawn::ASTEROID_FRAMES);
        let back = &world.system().asteroids[0];
        assert_eq!(back.amount, 300);
        assert_eq!(back.ore, OreKind::Scordite);
        assert_eq!(back.position, Vec2::new(5000.0, 6000.0));
        assert_ne!(back.id, id);
    }

    #[test]
    fn test_depleted_pocket_asteroid_just_removed() {
        let mut world = WorldState::sandbox(5);
        let id = world.next_id();
        let mut rock = Asteroid::new(id, Vec2::new(5000.0, 6000.0), 300, OreKind::Omber);
        rock.amount = 0;
        rock.pocket = Some(3);
        world.system_mut().asteroids.push(rock);
        update(&mut world, 1.0);
        assert!(world.system().asteroids.is_empty());
        assert!(world.system().asteroid_respawns.is_empty());
    }

    #[test]
    fn test_anomaly_respawn_keeps_pocket() {
        let mut world = WorldState::sandbox(5);
        let kind = anomalies::find("Ordinary Perimeter Deposit").unwrap();
        world.system_mut().anomaly_respawns.push(
            AnomalyRespawn {
                kind,
                marker: Vec2::new(4000.0, 4000.0),
                pocket_center: Vec2::new(50_000.0, 10_000.0),
            },
            10.0,
        );
        fire_respawns(&mut world, 10.0);
        let site = &world.system().anomalies[0];
        assert_eq!(site.pocket_center, Vec2::new(50_000.0, 10_000.0));
        assert!(site.discovered);
        assert!(!site.reward_claimed);
    }

    #[test]
    fn test_wreck_expiry_and_empty_removal() {
        let mut world = WorldState::sandbox(5);
        let a = world.next_id();
        let b = world.next_id();
        let c = world.next_id();
        let mut old = Wreck::new(a, "Pirate Wreckage", Vec2::ZERO, vec![Item::ore(OreKind::Veldspar)]);
        old.despawn_timer = Some(1.0);
        let empty = Wreck::new(b, "Pirate Wreckage", Vec2::ZERO, Vec::new());
        let mut container = Wreck::new(c, "Data Container", Vec2::ZERO, vec![Item::ore(OreKind::Veldspar)]);
        container.despawn_timer = None;
        world.system_mut().wrecks.extend([old, empty, container]);
        assert!(world.select(Target {
            kind: TargetKind::Wreck,
            id: a
        }));

        update(&mut world, 1.0);
        let ids: Vec<_> = world.system().wrecks.iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![c]);
        assert!(world.selection.is_none());
    }

    #[test]
    fn test_effects_and_flash_run_down() {
        let mut world = WorldState::sandbox(5);
        world.effects.push(FireEffect {
            from: Vec2::ZERO,
            to: Vec2::ZERO,
            life: 2.0,
            max_life: 12.0,
            hit: true,
            owner: Shooter::Player,
            weapon: "Light Beam Laser I",
        });
        world.player.jump_flash = 1.5;
        update(&mut world, 1.0);
        assert_eq!(world.effects.len(), 1);
        assert_eq!(world.player.jump_flash, 0.5);
        update(&mut world, 1.0);
        assert!(world.effects.is_empty());
        assert_eq!(world.player.jump_flash, 0.0);
    }
}
