//! Sub-light flight: manual thrust and turning, orbit and approach
//! commands, drag, speed cap, integration and bounds.

use crate::game::constants::{anomaly, jump, physics, warp};
use crate::game::state::{Controls, MoveCommand, Ship, TargetKind, TravelState, WorldState};
use crate::game::systems::travel;
use crate::util::vec2::{turn_toward, Vec2};

/// Advance the player ship one step
pub fn update(world: &mut WorldState, dt: f32) {
    if !world.player.travel.is_cruising() {
        apply_controls(&mut world.player, world.controls, dt);
        follow_command(world, dt);
    }

    integrate(&mut world.player, dt);

    let (width, height) = (world.system().width, world.system().height);
    confine(&mut world.player, width, height);
}

/// WASD-style thrust and turning
pub fn apply_controls(ship: &mut Ship, controls: Controls, dt: f32) {
    let forward = Vec2::from_heading(ship.heading);
    let accel = ship.template.accel;
    if controls.thrust {
        ship.velocity += forward * accel * dt;
    }
    if controls.reverse {
        ship.velocity -= forward * accel * physics::REVERSE_THRUST_RATIO * dt;
    }
    if controls.turn_left {
        ship.heading -= ship.template.turn_rate * dt;
    }
    if controls.turn_right {
        ship.heading += ship.template.turn_rate * dt;
    }
}

/// Steer and thrust toward the selected target per the active command
fn follow_command(world: &mut WorldState, dt: f32) {
    let Some(command) = world.player.command else {
        return;
    };
    let Some(target) = world.selection else {
        return;
    };
    let Some(target_pos) = world.target_position(target) else {
        return;
    };

    let ship = &mut world.player;
    let offset = target_pos - ship.position;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return;
    }
    let dir = offset * (1.0 / distance);
    let accel = ship.template.accel;

    ship.heading = turn_toward(ship.heading, offset.heading(), physics::STEER_RATE * dt);

    match command {
        MoveCommand::Orbit { distance: wanted } => {
            if distance > wanted + physics::ORBIT_BAND {
                ship.velocity += dir * accel * dt;
            } else if distance < wanted - physics::ORBIT_BAND {
                ship.velocity -= dir * accel * physics::REVERSE_THRUST_RATIO * dt;
            }
            ship.velocity += dir.perpendicular() * accel * physics::ORBIT_TANGENTIAL_RATIO * dt;
        }
        MoveCommand::Approach { distance: wanted } => {
            if distance > wanted {
                ship.velocity += dir * accel * dt;
            } else if ship.auto_jump
                && target.kind == TargetKind::Stargate
                && distance < jump::ACTIVATION_DISTANCE
                && !matches!(ship.travel, TravelState::JumpWarmup { .. })
            {
                // Reached the gate with a pending jump order
                let _ = travel::begin_jump_warmup(world, target.id);
            }
        }
    }
}

/// Drag, speed cap and position integration
pub fn integrate(ship: &mut Ship, dt: f32) {
    ship.velocity *= ship.template.drag;
    let cap = if ship.travel.is_cruising() {
        warp::SPEED
    } else {
        ship.stats.max_speed * ship.speed_multiplier
    };
    ship.velocity = ship.velocity.clamp_length(cap);
    ship.position += ship.velocity * dt;
}

/// Keep the ship inside the system rectangle, or inside its pocket
pub fn confine(ship: &mut Ship, width: f32, height: f32) {
    match ship.pocket {
        None => {
            ship.position = ship.position.clamp_components(
                physics::BOUNDS_MARGIN,
                width - physics::BOUNDS_MARGIN,
                height - physics::BOUNDS_MARGIN,
            );
        }
        Some(entry) if !ship.travel.is_warping() => {
            let offset = ship.position - entry.center;
            if offset.length() > anomaly::POCKET_RADIUS {
                ship.position = entry.center + offset.normalize() * anomaly::POCKET_RADIUS;
                ship.velocity = Vec2::ZERO;
            }
        }
        Some(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::state::{PocketEntry, Target};

    fn world() -> WorldState {
        let mut world = WorldState::sandbox(1);
        world.player.position = Vec2::new(5000.0, 5000.0);
        world
    }

    #[test]
    fn test_thrust_along_heading() {
        let mut world = world();
        world.player.heading = 0.0;
        world.controls.thrust = true;
        update(&mut world, 1.0);
        // Heading 0 faces -y
        assert!(world.player.velocity.y < 0.0);
        assert!(world.player.velocity.x.abs() < 1e-6);
        assert!(world.player.position.y < 5000.0);
    }

    #[test]
    fn test_reverse_is_half_thrust() {
        let mut fwd = world();
        fwd.controls.thrust = true;
        update(&mut fwd, 1.0);
        let mut rev = world();
        rev.controls.reverse = true;
        update(&mut rev, 1.0);
        assert!((rev.player.velocity.length() * 2.0 - fwd.player.velocity.length()).abs() < 1e-5);
    }

    #[test]
    fn test_drag_and_speed_cap() {
        let mut world = world();
        world.player.velocity = Vec2::new(100.0, 0.0);
        update(&mut world, 1.0);
        assert!((world.player.velocity.length() - world.player.stats.max_speed).abs() < 1e-4);

        world.player.velocity = Vec2::new(1.0, 0.0);
        update(&mut world, 1.0);
        assert!((world.player.velocity.x - 0.98).abs() < 1e-5);
    }

    #[test]
    fn test_afterburner_raises_cap() {
        let mut world = world();
        world.player.speed_multiplier = 2.0;
        world.player.velocity = Vec2::new(100.0, 0.0);
        update(&mut world, 1.0);
        assert!((world.player.velocity.length() - world.player.stats.max_speed * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_system_bounds() {
        let mut world = world();
        world.player.position = Vec2::new(5.0, 30_000.0);
        update(&mut world, 1.0);
        assert_eq!(world.player.position.x, physics::BOUNDS_MARGIN);
        assert_eq!(world.player.position.y, world.system().height - physics::BOUNDS_MARGIN);
    }

    #[test]
    fn test_pocket_edge_snaps_and_stops() {
        let mut world = world();
        let center = Vec2::new(10_000.0, -40_000.0);
        world.player.pocket = Some(PocketEntry {
            anomaly: 9,
            center,
            return_position: Vec2::new(5000.0, 5000.0),
            return_velocity: Vec2::ZERO,
        });
        world.player.position = center + Vec2::new(6000.0, 0.0);
        world.player.velocity = Vec2::new(1.0, 0.0);
        update(&mut world, 1.0);
        assert!((world.player.position.distance_to(center) - anomaly::POCKET_RADIUS).abs() < 1e-2);
        assert_eq!(world.player.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_pocket_clamp_skipped_while_warping() {
        let mut world = world();
        let center = Vec2::new(10_000.0, -40_000.0);
        world.player.pocket = Some(PocketEntry {
            anomaly: 9,
            center,
            return_position: Vec2::new(5000.0, 5000.0),
            return_velocity: Vec2::ZERO,
        });
        world.player.travel = TravelState::WarpWarmup {
            target: Vec2::ZERO,
            remaining: 100.0,
        };
        world.player.position = center + Vec2::new(6000.0, 0.0);
        update(&mut world, 1.0);
        assert!(world.player.position.distance_to(center) > anomaly::POCKET_RADIUS);
    }

    #[test]
    fn test_approach_closes_distance() {
        let mut world = world();
        let station = world.system().stations[0].id;
        world.select(Target {
            kind: TargetKind::Station,
            id: station,
        });
        world.player.command = Some(MoveCommand::Approach { distance: 100.0 });
        let start = world.player.position.distance_to(world.system().stations[0].position);
        for _ in 0..120 {
            update(&mut world, 1.0);
        }
        let end = world.player.position.distance_to(world.system().stations[0].position);
        assert!(end < start);
    }

    #[test]
    fn test_orbit_adds_tangential_motion() {
        let mut world = world();
        let station_pos = world.system().stations[0].position;
        world.player.position = station_pos + Vec2::new(500.0, 0.0);
        let station = world.system().stations[0].id;
        world.select(Target {
            kind: TargetKind::Station,
            id: station,
        });
        world.player.command = Some(MoveCommand::Orbit { distance: 500.0 });
        update(&mut world, 1.0);
        // Inside the band only the tangential push applies
        assert!(world.player.velocity.x.abs() < 1e-6);
        assert!(world.player.velocity.y.abs() > 0.0);
    }

    #[test]
    fn test_controls_ignored_in_warp() {
        let mut world = world();
        world.player.travel = TravelState::Cruising {
            target: Vec2::new(15_000.0, 5000.0),
        };
        world.controls.turn_left = true;
        update(&mut world, 1.0);
        assert_eq!(world.player.heading, 0.0);
    }
}
