//! Warp drive and stargate state machine.
//!
//! `Idle -> WarpWarmup -> Cruising -> Cooldown -> Idle` for warp;
//! `Idle | Cooldown -> JumpWarmup -> (new system) Idle` for gates.

use thiserror::Error;
use tracing::{debug, info};

use crate::game::constants::{jump, physics, universe, warp};
use crate::game::events::GameEvent;
use crate::game::state::{EntityId, MoveCommand, Target, TargetKind, TravelState, WorldState};
use crate::game::systems::anomaly;
use crate::util::vec2::{turn_toward, Vec2};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WarpError {
    #[error("warp drive busy ({0})")]
    Busy(&'static str),
    #[error("no target selected")]
    NoTarget,
    #[error("cannot warp to objects inside an anomaly")]
    TargetInPocket,
    #[error("target too close to warp ({distance:.0} < {min:.0})")]
    TooClose { distance: f32, min: f32 },
    #[error("anomaly {0} is not on scan")]
    UnknownAnomaly(EntityId),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JumpError {
    #[error("no stargate {0} in this system")]
    UnknownGate(EntityId),
    #[error("stargate too far ({distance:.0} > {max:.0})")]
    TooFar { distance: f32, max: f32 },
    #[error("cannot jump while {0}")]
    Busy(&'static str),
}

/// What a jump request set in motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpOrder {
    /// Gate activation started
    Warmup,
    /// Approaching the gate; activation starts once in range
    Approach,
}

/// Start aligning for warp to the selected target
pub fn start_warp(world: &mut WorldState) -> Result<(), WarpError> {
    if world.player.travel != TravelState::Idle {
        return Err(WarpError::Busy(world.player.travel.label()));
    }
    let target = world.selection.ok_or(WarpError::NoTarget)?;
    if !world.target_visible(target) {
        return Err(WarpError::NoTarget);
    }
    if target_in_pocket(world, target) {
        return Err(WarpError::TargetInPocket);
    }
    let destination = world.target_position(target).ok_or(WarpError::NoTarget)?;
    let distance = world.player.position.distance_to(destination);
    if distance < warp::MIN_DISTANCE {
        return Err(WarpError::TooClose {
            distance,
            min: warp::MIN_DISTANCE,
        });
    }
    begin_warmup(world, destination);
    Ok(())
}

/// Warp straight to a discovered anomaly marker from the scanner.
/// The minimum distance does not apply.
pub fn warp_to_anomaly(world: &mut WorldState, id: EntityId) -> Result<(), WarpError> {
    if world.player.travel != TravelState::Idle {
        return Err(WarpError::Busy(world.player.travel.label()));
    }
    let marker = world
        .system()
        .anomaly(id)
        .filter(|a| a.discovered)
        .map(|a| a.marker)
        .ok_or(WarpError::UnknownAnomaly(id))?;
    begin_warmup(world, marker);
    Ok(())
}

fn begin_warmup(world: &mut WorldState, destination: Vec2) {
    world.player.travel = TravelState::WarpWarmup {
        target: destination,
        remaining: warp::WARMUP_FRAMES,
    };
    world.player.command = None;
    world.emit(GameEvent::WarpStarted);
    debug!(x = destination.x, y = destination.y, "warp warmup started");
}

fn target_in_pocket(world: &WorldState, target: Target) -> bool {
    if target.kind.is_celestial() {
        return false;
    }
    let sys = world.system();
    let tag = match target.kind {
        TargetKind::Npc => sys.npc(target.id).and_then(|n| n.pocket),
        TargetKind::Asteroid => sys.asteroid(target.id).and_then(|a| a.pocket),
        TargetKind::Wreck => sys.wreck(target.id).and_then(|w| w.pocket),
        TargetKind::Station | TargetKind::Stargate | TargetKind::Anomaly => None,
    };
    tag.is_some()
}

/// Ask to jump through a gate. Close enough starts the warmup; within
/// request range queues an approach that triggers the warmup on arrival.
pub fn request_jump(world: &mut WorldState, gate_id: EntityId) -> Result<JumpOrder, JumpError> {
    let gate_pos = world
        .system()
        .stargates
        .iter()
        .find(|g| g.id == gate_id)
        .map(|g| g.position)
        .ok_or(JumpError::UnknownGate(gate_id))?;
    check_can_jump(world)?;

    let distance = world.player.position.distance_to(gate_pos);
    if distance > jump::MAX_REQUEST_DISTANCE {
        return Err(JumpError::TooFar {
            distance,
            max: jump::MAX_REQUEST_DISTANCE,
        });
    }
    if distance < jump::ACTIVATION_DISTANCE {
        begin_jump_warmup(world, gate_id)?;
        return Ok(JumpOrder::Warmup);
    }

    world.select(Target {
        kind: TargetKind::Stargate,
        id: gate_id,
    });
    world.player.command = Some(MoveCommand::Approach {
        distance: jump::APPROACH_DISTANCE,
    });
    world.player.auto_jump = true;
    Ok(JumpOrder::Approach)
}

fn check_can_jump(world: &WorldState) -> Result<(), JumpError> {
    match world.player.travel {
        TravelState::Idle | TravelState::Cooldown { .. } => Ok(()),
        other => Err(JumpError::Busy(other.label())),
    }
}

/// Start activating a gate
pub fn begin_jump_warmup(world: &mut WorldState, gate_id: EntityId) -> Result<(), JumpError> {
    check_can_jump(world)?;
    let destination = world
        .system()
        .stargates
        .iter()
        .find(|g| g.id == gate_id)
        .map(|g| g.destination)
        .ok_or(JumpError::UnknownGate(gate_id))?;

    world.player.travel = TravelState::JumpWarmup {
        destination,
        remaining: jump::WARMUP_FRAMES,
    };
    world.player.command = None;
    world.player.auto_jump = false;
    let name = world
        .systems
        .get(destination)
        .map(|s| s.name.to_string())
        .unwrap_or_default();
    world.emit(GameEvent::JumpWarmup { destination: name });
    Ok(())
}

/// Advance the jump countdown, then the warp state machine
pub fn update(world: &mut WorldState, dt: f32) {
    if let TravelState::JumpWarmup {
        destination,
        remaining,
    } = world.player.travel
    {
        let remaining = remaining - dt;
        if remaining <= 0.0 {
            complete_jump(world, destination);
        } else {
            world.player.travel = TravelState::JumpWarmup {
                destination,
                remaining,
            };
        }
        return;
    }

    if let TravelState::WarpWarmup { target, remaining } = world.player.travel {
        let from = world.player.system_position();
        let wanted = (target - from).heading();
        world.player.heading =
            turn_toward(world.player.heading, wanted, physics::STEER_RATE * dt);

        let remaining = remaining - dt;
        if remaining > 0.0 {
            world.player.travel = TravelState::WarpWarmup { target, remaining };
            return;
        }
        if world.player.pocket.is_some() {
            let _ = anomaly::exit(world);
        }
        world.player.travel = TravelState::Cruising { target };
        world.emit(GameEvent::WarpEntered);
    }

    match world.player.travel {
        TravelState::Cruising { target } => cruise(world, target),
        TravelState::Cooldown { remaining } => {
            let remaining = remaining - dt;
            world.player.travel = if remaining <= 0.0 {
                TravelState::Idle
            } else {
                TravelState::Cooldown { remaining }
            };
        }
        _ => {}
    }
}

fn cruise(world: &mut WorldState, target: Vec2) {
    let offset = target - world.player.position;
    let distance = offset.length();
    if distance >= warp::ARRIVAL_DISTANCE {
        world.player.velocity = offset * (warp::SPEED / distance);
        return;
    }

    world.player.velocity = Vec2::ZERO;
    world.player.travel = TravelState::Cooldown {
        remaining: warp::COOLDOWN_FRAMES * world.player.stats.warp_cooldown_multiplier,
    };
    world.emit(GameEvent::WarpExited);
    debug!(
        x = world.player.position.x,
        y = world.player.position.y,
        "warp complete"
    );

    if world.player.pocket.is_some() {
        return;
    }
    let position = world.player.position;
    let arrived_at = world
        .system()
        .anomalies
        .iter()
        .find(|a| {
            a.discovered
                && !a.reward_claimed
                && a.marker.distance_to(position) < warp::ANOMALY_CAPTURE_RADIUS
        })
        .map(|a| a.id);
    if let Some(id) = arrived_at {
        let _ = anomaly::enter(world, id);
    }
}

/// Move the player into `destination`, at the gate leading back if it has one
pub fn complete_jump(world: &mut WorldState, destination: usize) {
    if world.player.pocket.is_some() {
        let _ = anomaly::exit(world);
    }
    let origin = world.current;
    if destination >= world.systems.len() {
        world.player.travel = TravelState::Idle;
        return;
    }
    world.current = destination;

    let sys = world.system();
    let arrival = sys
        .stargates
        .iter()
        .find(|g| g.destination == origin)
        .map(|g| g.position + Vec2::new(jump::ARRIVAL_OFFSET, jump::ARRIVAL_OFFSET))
        .or_else(|| sys.stations.first().map(|s| s.position))
        .unwrap_or(universe::STATION_POSITION);

    let from = world.systems[origin].name;
    let to = world.systems[destination].name;

    let ship = &mut world.player;
    ship.position = arrival;
    ship.velocity = Vec2::ZERO;
    ship.travel = TravelState::Idle;
    ship.command = None;
    ship.auto_jump = false;
    ship.jump_flash = jump::FLASH_FRAMES;
    world.selection = None;
    world.auto_fire = false;
    world.effects.clear();

    info!(from, to, "gate jump");
    world.emit(GameEvent::GateJumped {
        from: from.to_string(),
        to: to.to_string(),
    });
}

/// Can the selected target be warped to right now?
pub fn can_warp(world: &WorldState) -> bool {
    let Some(target) = world.selection else {
        return false;
    };
    world.player.travel == TravelState::Idle
        && world.target_visible(target)
        && !target_in_pocket(world, target)
        && world
            .target_position(target)
            .is_some_and(|p| p.distance_to(world.player.position) >= warp::MIN_DISTANCE)
}
