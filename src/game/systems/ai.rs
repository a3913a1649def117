//! Pirate NPC behaviour: drift, chase a nearby player, shoot when in range.

use rand::Rng;

use crate::game::catalog::weapons::Accuracy;
use crate::game::constants::{combat as combat_consts, npc, physics, station, REGEN_SCALE};
use crate::game::events::GameEvent;
use crate::game::state::{visible_to, FireEffect, Shooter, WorldState};
use crate::game::systems::combat::{self, RangeBand};

const PIRATE_ACCURACY: Accuracy = Accuracy {
    close: npc::ACCURACY_CLOSE,
    medium: npc::ACCURACY_MEDIUM,
    long: npc::ACCURACY_LONG,
};

/// Advance every NPC in the current system
pub fn update(world: &mut WorldState, dt: f32) {
    let current = world.current;
    let player_pocket = world.player.pocket_id();
    let player_safe = player_pocket.is_none()
        && world.systems[current].in_safe_zone(world.player.position);

    let WorldState {
        systems,
        player,
        rng,
        effects,
        events,
        ..
    } = &mut *world;
    let system = &mut systems[current];
    let (width, height) = (system.width, system.height);
    let stations: Vec<_> = system.stations.iter().map(|s| s.position).collect();

    for n in system.npcs.iter_mut() {
        n.position += n.velocity * dt;
        if n.pocket.is_none() {
            n.position = n.position.clamp_components(
                physics::BOUNDS_MARGIN,
                width - physics::BOUNDS_MARGIN,
                height - physics::BOUNDS_MARGIN,
            );
        }

        let npc_safe = n.pocket.is_none()
            && stations
                .iter()
                .any(|s| s.distance_to(n.position) < station::SAFE_ZONE_RADIUS);
        let engaged = visible_to(n.pocket, player_pocket);
        let to_player = player.position - n.position;
        let distance = to_player.length();

        if engaged && distance < npc::AGGRO_RADIUS && !npc_safe {
            n.velocity += to_player.normalize() * npc::PURSUIT_ACCEL * dt;
        }
        n.velocity = n.velocity.clamp_length(npc::MAX_SPEED);

        n.fire_cooldown -= dt;
        // Nobody shoots a wreck; death is resolved once the loop ends
        if engaged
            && distance <= npc::WEAPON_RANGE
            && n.fire_cooldown <= 0.0
            && !npc_safe
            && !player_safe
            && !player.defense.is_destroyed()
        {
            let chance = RangeBand::of(distance, npc::WEAPON_RANGE).hit_chance(&PIRATE_ACCURACY);
            let hit = rng.gen::<f32>() < chance;
            effects.push(FireEffect {
                from: n.position,
                to: player.position,
                life: combat_consts::FIRE_EFFECT_FRAMES,
                max_life: combat_consts::FIRE_EFFECT_FRAMES,
                hit,
                owner: Shooter::Npc,
                weapon: "Pirate Turret",
            });
            events.push(GameEvent::NpcFired { hit });
            if hit {
                combat::apply_damage(&mut player.defense, npc::WEAPON_DAMAGE);
            }
            n.fire_cooldown = npc::FIRE_COOLDOWN_FRAMES;
        }

        n.defense.shield =
            (n.defense.shield + npc::SHIELD_REGEN * dt * REGEN_SCALE).min(n.max_shield);
    }

    if world.player.defense.is_destroyed() {
        combat::handle_player_death(world);
    }
}
