//! Headless pilot for the runner: mines the nearest belt, flies home when the
//! hold is full, sells the ore and goes back out.
//!
//! The autopilot only uses the same entry points a player would (select,
//! warp, approach, auto-mine, cargo and market calls), one decision per frame.

use tracing::{debug, info, warn};

use crate::game::constants::{mining, station};
use crate::game::market;
use crate::game::state::{EntityId, MoveCommand, Target, TargetKind, WorldState};
use crate::game::systems::{anomaly as pockets, cargo, travel};

/// Laser bought when the pilot has none to fit
const REPLACEMENT_LASER: &str = "Miner I";

/// Why a flight leg was started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    Mine(EntityId),
    Dock,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// At a station: unload, sell, make sure a laser is fitted
    Docked,
    /// Pick the nearest asteroid with ore left
    SeekOre,
    /// Flying toward the target of `goal`
    Transit { target: Target, goal: Goal },
    /// Auto-mining the selected asteroid
    Mining(EntityId),
    /// Nothing left to do
    Stalled,
}

/// Running totals for the stats log
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AutopilotStats {
    pub trips: u32,
    pub ore_sold: u64,
    pub credits_earned: u64,
}

pub struct Autopilot {
    phase: Phase,
    stats: AutopilotStats,
}

impl Autopilot {
    /// New pilots start docked
    pub fn new() -> Self {
        Self {
            phase: Phase::Docked,
            stats: AutopilotStats::default(),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn stats(&self) -> AutopilotStats {
        self.stats
    }

    /// Make one decision. Call once per frame after the world tick.
    pub fn step(&mut self, world: &mut WorldState) {
        // A warp can land on a discovered site and pull the ship into its pocket
        if world.player.pocket.is_some() {
            world.auto_mine = false;
            if let Err(e) = pockets::exit(world) {
                warn!("Autopilot could not leave pocket: {}", e);
            }
            self.phase = Phase::SeekOre;
            return;
        }

        let phase = self.phase;
        let next = match phase {
            Phase::Docked => self.docked(world),
            Phase::SeekOre => seek_ore(world),
            Phase::Transit { target, goal } => transit(world, target, goal),
            Phase::Mining(rock) => mine(world, rock),
            Phase::Stalled => Phase::Stalled,
        };
        if next != phase {
            debug!(from = ?phase, to = ?next, "autopilot");
            self.phase = next;
        }
    }

    fn docked(&mut self, world: &mut WorldState) -> Phase {
        if world.docked_station().is_none() {
            return head_home(world);
        }

        if let Err(e) = cargo::unload_all(world) {
            warn!("Autopilot unload failed: {}", e);
            return Phase::Stalled;
        }
        let ore_units = world
            .docked_station()
            .map(|s| world.system().stations[s].inventory.iter().filter(|i| i.is_ore()).count())
            .unwrap_or(0);
        match market::sell_all_ore(world) {
            Ok(earned) if ore_units > 0 => {
                self.stats.trips += 1;
                self.stats.ore_sold += ore_units as u64;
                self.stats.credits_earned = self.stats.credits_earned.saturating_add(earned);
                info!(
                    trip = self.stats.trips,
                    ore_units, earned, "autopilot sold haul"
                );
            }
            Ok(_) => {}
            Err(e) => warn!("Autopilot sale failed: {}", e),
        }

        if !ensure_laser(world) {
            warn!("Autopilot has no mining laser and cannot buy one");
            return Phase::Stalled;
        }
        Phase::SeekOre
    }
}

impl Default for Autopilot {
    fn default() -> Self {
        Self::new()
    }
}

/// Fit a mining laser from the hangar, buying one if needed
fn ensure_laser(world: &mut WorldState) -> bool {
    if world.player.fitting.mining_lasers().next().is_some() {
        return true;
    }
    let Some(station) = world.docked_station() else {
        return false;
    };

    let in_hangar = |world: &WorldState| {
        world.system().stations[station].inventory.iter().position(|i| {
            i.as_equipment()
                .and_then(|e| e.as_weapon())
                .is_some_and(|w| w.is_mining())
        })
    };
    let index = match in_hangar(world) {
        Some(i) => i,
        None => {
            if market::buy(world, REPLACEMENT_LASER, 1).is_err() {
                return false;
            }
            match in_hangar(world) {
                Some(i) => i,
                None => return false,
            }
        }
    };
    cargo::fit_from_station(world, index).is_ok()
}

fn seek_ore(world: &mut WorldState) -> Phase {
    let from = world.player.position;
    let nearest = world
        .system()
        .asteroids
        .iter()
        .filter(|a| a.pocket.is_none() && !a.is_depleted())
        .min_by(|a, b| {
            a.position
                .distance_to(from)
                .total_cmp(&b.position.distance_to(from))
        })
        .map(|a| a.id);

    let Some(rock) = nearest else {
        return if world.player.cargo.iter().any(|i| i.is_ore()) {
            head_home(world)
        } else {
            Phase::Stalled
        };
    };
    let target = Target {
        kind: TargetKind::Asteroid,
        id: rock,
    };
    if !world.select(target) {
        return Phase::SeekOre;
    }
    Phase::Transit {
        target,
        goal: Goal::Mine(rock),
    }
}

fn head_home(world: &mut WorldState) -> Phase {
    world.auto_mine = false;
    let Some(id) = world.system().stations.first().map(|s| s.id) else {
        return Phase::Stalled;
    };
    let target = Target {
        kind: TargetKind::Station,
        id,
    };
    world.select(target);
    Phase::Transit {
        target,
        goal: Goal::Dock,
    }
}

fn transit(world: &mut WorldState, target: Target, goal: Goal) -> Phase {
    if world.player.travel.is_warping() {
        return Phase::Transit { target, goal };
    }
    if world.selection != Some(target) && !world.select(target) {
        // Target vanished, start over
        return match goal {
            Goal::Mine(_) => Phase::SeekOre,
            Goal::Dock => Phase::Stalled,
        };
    }
    let Some(position) = world.target_position(target) else {
        return Phase::SeekOre;
    };

    let distance = world.player.position.distance_to(position);
    let stand_off = match goal {
        Goal::Mine(_) => mining::RANGE,
        Goal::Dock => station::DOCKING_RANGE,
    };
    if distance <= stand_off {
        world.player.command = None;
        return match goal {
            Goal::Mine(rock) => Phase::Mining(rock),
            Goal::Dock => Phase::Docked,
        };
    }

    if travel::can_warp(world) {
        if let Err(e) = travel::start_warp(world) {
            debug!("autopilot warp refused: {}", e);
        }
        return Phase::Transit { target, goal };
    }
    world.player.command = Some(MoveCommand::Approach {
        distance: stand_off * 0.5,
    });
    Phase::Transit { target, goal }
}

fn mine(world: &mut WorldState, rock: EntityId) -> Phase {
    let ore_size = world
        .system()
        .asteroid(rock)
        .filter(|a| !a.is_depleted())
        .map(|a| a.ore.size());
    let Some(ore_size) = ore_size else {
        world.auto_mine = false;
        return Phase::SeekOre;
    };
    if world.player.cargo_free() < ore_size {
        return head_home(world);
    }

    let target = Target {
        kind: TargetKind::Asteroid,
        id: rock,
    };
    let in_range = world
        .target_position(target)
        .is_some_and(|p| p.distance_to(world.player.position) <= mining::RANGE);
    if world.selection != Some(target) || !in_range {
        world.auto_mine = false;
        return Phase::Transit {
            target,
            goal: Goal::Mine(rock),
        };
    }
    world.auto_mine = true;
    Phase::Mining(rock)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::ores::OreKind;
    use crate::game::game_loop::{GameLoop, GameLoopConfig};
    use crate::game::state::{Asteroid, WorldOptions};
    use crate::util::vec2::Vec2;

    fn run(game: &mut GameLoop, pilot: &mut Autopilot, frames: usize) {
        for _ in 0..frames {
            game.tick(1.0);
            pilot.step(game.state_mut());
        }
    }

    #[test]
    fn test_fits_starting_laser() {
        let mut world = WorldState::sandbox(3);
        let mut pilot = Autopilot::new();
        assert_eq!(world.player.fitting.mining_lasers().count(), 0);
        pilot.step(&mut world);
        assert_eq!(world.player.fitting.mining_lasers().count(), 1);
        assert_eq!(pilot.phase(), Phase::SeekOre);
    }

    #[test]
    fn test_buys_laser_when_hangar_empty() {
        let mut world = WorldState::sandbox(3);
        world.player.cargo.clear();
        let credits = world.player.credits;
        let mut pilot = Autopilot::new();
        pilot.step(&mut world);
        assert_eq!(world.player.fitting.mining_lasers().count(), 1);
        assert!(world.player.credits < credits);
    }

    #[test]
    fn test_stalls_without_credits_or_laser() {
        let mut world = WorldState::sandbox(3);
        world.player.cargo.clear();
        world.player.credits = 0;
        let mut pilot = Autopilot::new();
        pilot.step(&mut world);
        assert_eq!(pilot.phase(), Phase::Stalled);
    }

    #[test]
    fn test_picks_nearest_rock() {
        let mut world = WorldState::sandbox(3);
        let home = world.player.position;
        let far = world.next_id();
        let near = world.next_id();
        world.system_mut().asteroids.extend([
            Asteroid::new(far, home + Vec2::new(3000.0, 0.0), 100, OreKind::Veldspar),
            Asteroid::new(near, home + Vec2::new(900.0, 0.0), 100, OreKind::Veldspar),
        ]);
        let mut pilot = Autopilot::new();
        pilot.step(&mut world);
        pilot.step(&mut world);
        assert_eq!(
            pilot.phase(),
            Phase::Transit {
                target: Target {
                    kind: TargetKind::Asteroid,
                    id: near
                },
                goal: Goal::Mine(near)
            }
        );
        assert_eq!(world.selection.map(|t| t.id), Some(near));
    }

    #[test]
    fn test_mines_and_sells_a_haul() {
        let mut world = WorldState::sandbox(8);
        let home = world.player.position;
        let rock = world.next_id();
        world.system_mut().asteroids.push(Asteroid::new(
            rock,
            home + Vec2::new(600.0, 0.0),
            5000,
            OreKind::Veldspar,
        ));
        world.player.cargo.clear();
        world.player.fit_item("Miner I").unwrap();
        // Small hold so one haul finishes quickly
        world.player.stats.cargo_capacity = 2.0;
        world.player.credits = 1_000;

        let mut game = GameLoop::new(world, GameLoopConfig::default());
        let mut pilot = Autopilot::new();
        let mut mined = false;
        for _ in 0..40 {
            run(&mut game, &mut pilot, 500);
            mined |= matches!(pilot.phase(), Phase::Mining(_));
            if pilot.stats().trips > 0 {
                break;
            }
        }
        assert!(mined);
        assert_eq!(pilot.stats().trips, 1);
        assert!(pilot.stats().ore_sold > 0);
        assert!(game.state().player.credits > 1_000);
    }

    #[test]
    fn test_generated_world_keeps_working() {
        let mut game = GameLoop::generate(
            WorldOptions {
                seed: Some(21),
                ..Default::default()
            },
            GameLoopConfig::default(),
        )
        .unwrap();
        let mut pilot = Autopilot::new();
        run(&mut game, &mut pilot, 3000);
        assert_ne!(pilot.phase(), Phase::Stalled);
        assert_eq!(game.state().player.fitting.mining_lasers().count(), 1);
    }
}
