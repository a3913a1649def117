//! Mining lasers against the selected asteroid.

use thiserror::Error;

use crate::game::constants::mining;
use crate::game::events::GameEvent;
use crate::game::items::{Item, VOLUME_EPSILON};
use crate::game::state::{FireEffect, Shooter, TargetKind, WorldState};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MineError {
    #[error("mining lasers cycling")]
    Cooldown,
    #[error("no mining lasers fitted")]
    NoLasers,
    #[error("insufficient capacitor: need {required:.1}, have {available:.1}")]
    InsufficientCapacitor { required: f32, available: f32 },
    #[error("no asteroid selected")]
    NoTarget,
    #[error("asteroid out of range ({distance:.0} > {max:.0})")]
    OutOfRange { distance: f32, max: f32 },
    #[error("asteroid depleted")]
    Depleted,
    #[error("cargo hold full")]
    CargoFull,
}

/// Run one mining cycle. Returns the number of ore units moved into cargo.
pub fn mine(world: &mut WorldState) -> Result<u32, MineError> {
    if world.player.mining_cooldown > 0.0 {
        return Err(MineError::Cooldown);
    }
    let lasers: Vec<_> = world.player.fitting.mining_lasers().collect();
    let Some(first) = lasers.first() else {
        return Err(MineError::NoLasers);
    };
    let cycle = first.fire_rate;

    let cap_needed: f32 = lasers.iter().map(|l| l.capacitor_use).sum();
    if world.player.cap < cap_needed {
        return Err(MineError::InsufficientCapacitor {
            required: cap_needed,
            available: world.player.cap,
        });
    }

    let target_id = match world.selection {
        Some(t) if t.kind == TargetKind::Asteroid && world.target_visible(t) => t.id,
        _ => return Err(MineError::NoTarget),
    };
    let current = world.current;
    let from = world.player.position;
    let free = world.player.cargo_free();
    let total_yield: u32 = lasers.iter().map(|l| l.mining_yield).sum();

    let Some(asteroid) = world.systems[current]
        .asteroids
        .iter_mut()
        .find(|a| a.id == target_id)
    else {
        return Err(MineError::NoTarget);
    };
    let distance = from.distance_to(asteroid.position);
    if distance > mining::RANGE {
        return Err(MineError::OutOfRange {
            distance,
            max: mining::RANGE,
        });
    }
    if asteroid.is_depleted() {
        return Err(MineError::Depleted);
    }
    let room = ((free + VOLUME_EPSILON) / asteroid.ore.size()).floor() as u32;
    if room == 0 {
        return Err(MineError::CargoFull);
    }

    let units = asteroid.amount.min(total_yield).min(room);
    asteroid.amount -= units;
    let ore = asteroid.ore;
    let to = asteroid.position;

    world
        .player
        .cargo
        .extend(std::iter::repeat_with(|| Item::ore(ore)).take(units as usize));
    world.player.cap -= cap_needed;
    world.player.mining_cooldown = cycle;

    for laser in &lasers {
        world.effects.push(FireEffect {
            from,
            to,
            life: laser.fire_rate,
            max_life: laser.fire_rate,
            hit: true,
            owner: Shooter::Player,
            weapon: laser.name,
        });
    }
    world.emit(GameEvent::MiningCycle {
        ore: ore.name().to_string(),
        units,
    });
    Ok(units)
}
