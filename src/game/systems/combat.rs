//! Weapon fire, layered damage absorption and player death.

use rand::Rng;
use thiserror::Error;
use tracing::info;

use crate::game::catalog::weapons::Accuracy;
use crate::game::constants::{combat, death, universe};
use crate::game::events::GameEvent;
use crate::game::state::{Defense, FireEffect, Shooter, TargetKind, TravelState, WorldState};
use crate::game::systems::anomaly;
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FireError {
    #[error("weapons cycling")]
    Cooldown,
    #[error("no combat weapons fitted")]
    NoWeapons,
    #[error("insufficient capacitor: need {required:.1}, have {available:.1}")]
    InsufficientCapacitor { required: f32, available: f32 },
    #[error("weapons offline inside station safe zone")]
    SafeZone,
    #[error("no hostile target selected")]
    NoTarget,
}

/// Distance bracket relative to a weapon's reference range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBand {
    Close,
    Medium,
    Long,
}

impl RangeBand {
    pub fn of(distance: f32, reference: f32) -> Self {
        if distance <= reference * combat::CLOSE_RANGE_FRACTION {
            RangeBand::Close
        } else if distance <= reference * combat::MEDIUM_RANGE_FRACTION {
            RangeBand::Medium
        } else {
            RangeBand::Long
        }
    }

    pub fn hit_chance(&self, accuracy: &Accuracy) -> f32 {
        match self {
            RangeBand::Close => accuracy.close,
            RangeBand::Medium => accuracy.medium,
            RangeBand::Long => accuracy.long,
        }
    }
}

/// Draw `amount` through shield, armor and hull in that order, carrying
/// overflow. Pools never go negative. Returns the damage absorbed.
pub fn apply_damage(defense: &mut Defense, amount: f32) -> f32 {
    if amount <= 0.0 {
        return 0.0;
    }
    let mut remaining = amount;
    for pool in [&mut defense.shield, &mut defense.armor, &mut defense.hull] {
        if remaining <= 0.0 {
            break;
        }
        let taken = remaining.min(pool.max(0.0));
        *pool -= taken;
        remaining -= taken;
    }
    amount - remaining
}

/// Outcome of one trigger pull
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Volley {
    pub shots: u32,
    pub hits: u32,
    pub damage: f32,
}

fn player_in_safe_zone(world: &WorldState) -> bool {
    world.player.pocket.is_none() && world.system().in_safe_zone(world.player.position)
}

/// Fire every fitted combat weapon at the selected NPC
pub fn fire(world: &mut WorldState) -> Result<Volley, FireError> {
    if world.player.fire_cooldown > 0.0 {
        return Err(FireError::Cooldown);
    }
    let weapons: Vec<_> = world.player.fitting.combat_weapons().collect();
    let Some(first) = weapons.first() else {
        return Err(FireError::NoWeapons);
    };
    let cooldown = first.fire_rate;

    let cap_needed: f32 = weapons.iter().map(|w| w.capacitor_use).sum();
    if world.player.cap < cap_needed {
        return Err(FireError::InsufficientCapacitor {
            required: cap_needed,
            available: world.player.cap,
        });
    }
    if player_in_safe_zone(world) {
        return Err(FireError::SafeZone);
    }

    let target_id = match world.selection {
        Some(t) if t.kind == TargetKind::Npc && world.target_visible(t) => t.id,
        _ => return Err(FireError::NoTarget),
    };
    let current = world.current;
    let from = world.player.position;
    let multiplier = world.player.stats.damage_multiplier;

    let mut volley = Volley::default();
    let WorldState {
        systems,
        rng,
        effects,
        events,
        ..
    } = &mut *world;
    let Some(npc) = systems[current].npcs.iter_mut().find(|n| n.id == target_id) else {
        return Err(FireError::NoTarget);
    };
    let distance = from.distance_to(npc.position);

    for weapon in &weapons {
        if distance > weapon.max_range {
            continue;
        }
        let chance = RangeBand::of(distance, weapon.optimal_range).hit_chance(&weapon.accuracy);
        let hit = rng.gen::<f32>() < chance;
        effects.push(FireEffect {
            from,
            to: npc.position,
            life: combat::FIRE_EFFECT_FRAMES,
            max_life: combat::FIRE_EFFECT_FRAMES,
            hit,
            owner: Shooter::Player,
            weapon: weapon.name,
        });
        events.push(GameEvent::WeaponFired {
            weapon: weapon.name.to_string(),
            hit,
        });
        volley.shots += 1;
        if hit {
            volley.hits += 1;
            volley.damage += apply_damage(&mut npc.defense, weapon.damage * multiplier);
        }
    }

    world.player.fire_cooldown = cooldown;
    world.player.cap -= cap_needed;
    Ok(volley)
}

/// Respawn the pilot at the first station, minus a cut of their wallet
pub fn handle_player_death(world: &mut WorldState) {
    if world.player.pocket.is_some() {
        let _ = anomaly::exit(world);
    }

    let spawn = world
        .system()
        .stations
        .first()
        .map(|s| s.position)
        .unwrap_or(universe::STATION_POSITION);

    let penalty = (world.player.credits as f64 * death::CREDIT_PENALTY).floor() as u64;
    let ship = &mut world.player;
    ship.position = spawn + Vec2::new(death::RESPAWN_OFFSET, 0.0);
    ship.velocity = Vec2::ZERO;
    ship.travel = TravelState::Idle;
    ship.command = None;
    ship.auto_jump = false;
    ship.restore();
    ship.credits = ship.credits.saturating_sub(penalty);
    world.selection = None;
    world.auto_fire = false;

    info!(credits_lost = penalty, "player ship destroyed");
    world.emit(GameEvent::PlayerDestroyed {
        credits_lost: penalty,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::weapons;
    use crate::game::state::{Npc, Target};
    use crate::util::rng;

    fn pools(shield: f32, armor: f32, hull: f32) -> Defense {
        Defense {
            shield,
            armor,
            hull,
        }
    }

    #[test]
    fn test_damage_absorbed_layer_by_layer() {
        let mut d = pools(50.0, 30.0, 20.0);
        assert_eq!(apply_damage(&mut d, 30.0), 30.0);
        assert_eq!(d, pools(20.0, 30.0, 20.0));

        // Overflow carries into armor then hull in the same step
        assert_eq!(apply_damage(&mut d, 55.0), 55.0);
        assert_eq!(d, pools(0.0, 0.0, 15.0));
    }

    #[test]
    fn test_damage_conserved_and_never_negative() {
        let mut rng = rng::seeded(Some(4));
        for _ in 0..200 {
            let mut d = pools(
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
                rng.gen_range(0.0..100.0),
            );
            let total = d.shield + d.armor + d.hull;
            let amount = rng.gen_range(0.0..total);
            let absorbed = apply_damage(&mut d, amount);
            assert!((absorbed - amount).abs() < 1e-3);
            assert!(d.shield >= 0.0 && d.armor >= 0.0 && d.hull >= 0.0);
            assert!((d.shield + d.armor + d.hull - (total - amount)).abs() < 1e-3);
        }
    }

    #[test]
    fn test_overkill_clamps_hull() {
        let mut d = pools(10.0, 10.0, 10.0);
        assert_eq!(apply_damage(&mut d, 100.0), 30.0);
        assert_eq!(d, pools(0.0, 0.0, 0.0));
        assert!(d.is_destroyed());
    }

    #[test]
    fn test_range_bands() {
        let railgun = weapons::find("125mm Railgun I").unwrap();
        assert_eq!(railgun.optimal_range, 350.0);
        assert_eq!(RangeBand::of(200.0, 350.0), RangeBand::Close);
        assert_eq!(RangeBand::of(290.0, 350.0), RangeBand::Medium);
        assert_eq!(RangeBand::of(340.0, 350.0), RangeBand::Long);
        assert_eq!(RangeBand::of(200.0, 350.0).hit_chance(&railgun.accuracy), 0.90);
        assert_eq!(RangeBand::of(290.0, 350.0).hit_chance(&railgun.accuracy), 0.70);
        assert_eq!(RangeBand::of(340.0, 350.0).hit_chance(&railgun.accuracy), 0.35);
    }

    fn armed_world() -> (WorldState, u64) {
        let mut world = WorldState::sandbox(21);
        world.player.position = Vec2::new(5000.0, 5000.0);
        world.player.fit_item("Rocket Launcher I").unwrap();
        let id = world.next_id();
        let mut rng = rng::seeded(Some(2));
        world
            .system_mut()
            .npcs
            .push(Npc::spawn(id, Vec2::new(5200.0, 5000.0), &mut rng));
        assert!(world.select(Target {
            kind: TargetKind::Npc,
            id
        }));
        (world, id)
    }

    #[test]
    fn test_rocket_always_hits() {
        let (mut world, id) = armed_world();
        let cap = world.player.cap;
        let volley = fire(&mut world).unwrap();
        assert_eq!(volley.hits, 1);
        assert_eq!(volley.damage, 25.0);
        assert_eq!(world.system().npc(id).unwrap().defense.shield, 25.0);
        assert_eq!(world.player.fire_cooldown, 30.0);
        assert_eq!(world.player.cap, cap - 6.0);
        assert_eq!(world.effects.len(), 1);
        assert_eq!(fire(&mut world), Err(FireError::Cooldown));
    }

    #[test]
    fn test_damage_mods_scale_hits() {
        let (mut world, _) = armed_world();
        world.player.fit_item("Ballistic Control System I").unwrap();
        let volley = fire(&mut world).unwrap();
        assert!((volley.damage - 27.5).abs() < 1e-4);
    }

    #[test]
    fn test_out_of_range_weapon_skipped() {
        let (mut world, id) = armed_world();
        world.system_mut().npcs[0].position = Vec2::new(5600.0, 5000.0);
        let volley = fire(&mut world).unwrap();
        assert_eq!(volley.shots, 0);
        assert_eq!(world.system().npc(id).unwrap().defense.shield, 50.0);
        // Cycle still consumed
        assert!(world.player.fire_cooldown > 0.0);
    }

    #[test]
    fn test_fire_preconditions() {
        let mut world = WorldState::sandbox(1);
        assert_eq!(fire(&mut world), Err(FireError::NoWeapons));

        world.player.fit_item("Miner I").unwrap();
        assert_eq!(fire(&mut world), Err(FireError::NoWeapons));

        world.player.fit_item("Light Beam Laser I").unwrap();
        world.player.cap = 5.0;
        assert!(matches!(
            fire(&mut world),
            Err(FireError::InsufficientCapacitor { .. })
        ));

        world.player.cap = 100.0;
        // Still docked at the sandbox station
        assert_eq!(fire(&mut world), Err(FireError::SafeZone));

        world.player.position = Vec2::new(2000.0, 2000.0);
        assert_eq!(fire(&mut world), Err(FireError::NoTarget));
    }

    #[test]
    fn test_player_death_penalty_and_respawn() {
        let mut world = WorldState::sandbox(1);
        world.player.credits = 1005;
        world.player.position = Vec2::new(3000.0, 3000.0);
        world.player.velocity = Vec2::new(2.0, 0.0);
        world.player.defense.hull = 0.0;
        world.player.cap = 0.0;
        world.player.travel = TravelState::Cooldown { remaining: 10.0 };
        handle_player_death(&mut world);

        assert_eq!(world.player.credits, 905);
        assert_eq!(world.player.position, Vec2::new(10_100.0, 10_000.0));
        assert_eq!(world.player.velocity, Vec2::ZERO);
        assert_eq!(world.player.travel, TravelState::Idle);
        assert_eq!(world.player.defense.hull, world.player.stats.max_hull);
        assert_eq!(world.player.cap, world.player.stats.max_cap);
        assert!(world.selection.is_none());
        assert_eq!(
            world.drain_events(),
            vec![GameEvent::PlayerDestroyed { credits_lost: 100 }]
        );
    }
}
