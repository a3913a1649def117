//! Frame driver. One call to [`GameLoop::tick`] advances the whole world by
//! `dt` frames in a fixed system order and hands back the events raised.

use tracing::debug;

use crate::game::constants::{anomaly, time, REGEN_SCALE};
use crate::game::events::GameEvent;
use crate::game::state::{TargetKind, WorldOptions, WorldError, WorldState};
use crate::game::systems::{ai, anomaly as pockets, cleanup, combat, mining, modules, movement, travel};

/// Game loop configuration
#[derive(Debug, Clone, Copy)]
pub struct GameLoopConfig {
    /// Largest step a single tick may advance, in frames
    pub max_frame_step: f32,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            max_frame_step: time::MAX_FRAME_STEP,
        }
    }
}

pub struct GameLoop {
    state: WorldState,
    config: GameLoopConfig,
}

impl GameLoop {
    pub fn new(state: WorldState, config: GameLoopConfig) -> Self {
        Self { state, config }
    }

    /// Generate a fresh universe and wrap it
    pub fn generate(options: WorldOptions, config: GameLoopConfig) -> Result<Self, WorldError> {
        Ok(Self::new(WorldState::new(options)?, config))
    }

    pub fn state(&self) -> &WorldState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut WorldState {
        &mut self.state
    }

    pub fn config(&self) -> &GameLoopConfig {
        &self.config
    }

    /// Advance by a wall-clock interval
    pub fn advance_ms(&mut self, elapsed_ms: f32) -> Vec<GameEvent> {
        self.tick(elapsed_ms / time::FRAME_MS)
    }

    /// Run one frame step. `dt` is clamped into `[0, max_frame_step]`.
    pub fn tick(&mut self, dt: f32) -> Vec<GameEvent> {
        let dt = if dt.is_finite() {
            dt.clamp(0.0, self.config.max_frame_step)
        } else {
            0.0
        };
        let world = &mut self.state;

        travel::update(world, dt);
        movement::update(world, dt);
        auto_actions(world);
        cooldowns_and_regen(world, dt);
        modules::update(world, dt);
        ai::update(world, dt);
        cleanup::update(world, dt);

        if world.player.pocket.is_some() && world.tick % anomaly::COMPLETION_CHECK_INTERVAL == 0 {
            pockets::check_completion(world);
        }

        world.tick += 1;
        let events = world.drain_events();
        if !events.is_empty() {
            debug!(tick = world.tick, count = events.len(), "tick events");
        }
        events
    }
}

/// Auto-fire and auto-mine retry every frame; failures such as a cycling
/// weapon are expected and ignored.
fn auto_actions(world: &mut WorldState) {
    let Some(target) = world.selection else {
        return;
    };
    if world.auto_fire && target.kind == TargetKind::Npc {
        let _ = combat::fire(world);
    }
    if world.auto_mine && target.kind == TargetKind::Asteroid {
        let _ = mining::mine(world);
    }
}

fn cooldowns_and_regen(world: &mut WorldState, dt: f32) {
    let ship = &mut world.player;
    ship.fire_cooldown = (ship.fire_cooldown - dt).max(0.0);
    ship.mining_cooldown = (ship.mining_cooldown - dt).max(0.0);
    ship.defense.shield =
        (ship.defense.shield + ship.stats.shield_regen * dt * REGEN_SCALE).min(ship.stats.max_shield);
    ship.cap = (ship.cap + ship.stats.cap_regen * dt * REGEN_SCALE).min(ship.stats.max_cap);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::catalog::anomalies;
    use crate::game::catalog::ores::OreKind;
    use crate::game::state::{Anomaly, Asteroid, Npc, Target};
    use crate::util::rng;
    use crate::util::vec2::Vec2;

    fn sandbox_loop() -> GameLoop {
        GameLoop::new(WorldState::sandbox(31), GameLoopConfig::default())
    }

    #[test]
    fn test_tick_counts_frames() {
        let mut game = sandbox_loop();
        for _ in 0..5 {
            game.tick(1.0);
        }
        assert_eq!(game.state().tick, 5);
    }

    #[test]
    fn test_dt_clamped() {
        let mut game = sandbox_loop();
        game.state_mut().player.position = Vec2::new(5000.0, 5000.0);
        game.state_mut().player.velocity = Vec2::new(1.0, 0.0);
        let drag = game.state().player.template.drag;
        game.tick(50.0);
        let moved = game.state().player.position.x - 5000.0;
        assert!((moved - drag * 2.0).abs() < 1e-4);

        game.tick(f32::NAN);
        game.tick(-3.0);
        assert_eq!(game.state().tick, 3);
    }

    #[test]
    fn test_advance_ms_converts_to_frames() {
        let mut game = sandbox_loop();
        game.state_mut().player.position = Vec2::new(5000.0, 5000.0);
        game.state_mut().player.fire_cooldown = 10.0;
        game.advance_ms(16.666);
        assert!((game.state().player.fire_cooldown - 9.0).abs() < 1e-4);
    }

    #[test]
    fn test_regen_scaled() {
        let mut game = sandbox_loop();
        let ship = &mut game.state_mut().player;
        ship.defense.shield = 10.0;
        ship.cap = 10.0;
        let (shield_regen, cap_regen) = (ship.stats.shield_regen, ship.stats.cap_regen);
        game.tick(1.0);
        let ship = &game.state().player;
        assert!((ship.defense.shield - (10.0 + shield_regen * 0.1)).abs() < 1e-5);
        assert!((ship.cap - (10.0 + cap_regen * 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_auto_mine_fills_cargo_over_cycles() {
        let mut game = sandbox_loop();
        let world = game.state_mut();
        world.player.cargo.clear();
        world.player.position = Vec2::new(4000.0, 4000.0);
        world.player.fit_item("Miner I").unwrap();
        let id = world.next_id();
        world
            .system_mut()
            .asteroids
            .push(Asteroid::new(id, Vec2::new(4040.0, 4000.0), 500, OreKind::Veldspar));
        assert!(world.select(Target {
            kind: TargetKind::Asteroid,
            id
        }));
        world.auto_mine = true;

        let mut cycles = 0;
        for _ in 0..1000 {
            let events = game.tick(1.0);
            cycles += events
                .iter()
                .filter(|e| matches!(e, GameEvent::MiningCycle { .. }))
                .count();
        }
        assert!(cycles >= 2);
        assert!(!game.state().player.cargo.is_empty());
    }

    #[test]
    fn test_auto_fire_kills_and_pays_bounty() {
        let mut game = sandbox_loop();
        let world = game.state_mut();
        world.player.position = Vec2::new(4000.0, 4000.0);
        world.player.credits = 0;
        world.player.fit_item("Rocket Launcher I").unwrap();
        world.player.fit_item("Rocket Launcher I").unwrap();
        let id = world.next_id();
        let mut r = rng::seeded(Some(6));
        let mut n = Npc::spawn(id, Vec2::new(4300.0, 4000.0), &mut r);
        n.velocity = Vec2::ZERO;
        world.system_mut().npcs.push(n);
        assert!(world.select(Target {
            kind: TargetKind::Npc,
            id
        }));
        world.auto_fire = true;

        let mut destroyed = false;
        for _ in 0..600 {
            let events = game.tick(1.0);
            if events.contains(&GameEvent::NpcDestroyed { bounty: 150 }) {
                destroyed = true;
                break;
            }
        }
        assert!(destroyed);
        assert!(game.state().player.credits >= 150);
        assert_eq!(game.state().system().wrecks.len(), 1);
        assert!(game.state().selection.is_none());
    }

    #[test]
    fn test_pocket_completion_checked_while_inside() {
        let mut game = sandbox_loop();
        let world = game.state_mut();
        world.player.position = Vec2::new(6000.0, 6000.0);
        let id = world.next_id();
        world.system_mut().anomalies.push(Anomaly {
            id,
            kind: anomalies::find("Ordinary Perimeter Deposit").unwrap(),
            discovered: true,
            marker: Vec2::new(6000.0, 6000.0),
            pocket_center: anomaly::POCKET_SLOTS[0],
            reward_claimed: false,
        });
        pockets::enter(world, id).unwrap();
        for rock in world.system_mut().asteroids.iter_mut() {
            rock.amount = 0;
        }

        let mut completed = false;
        for _ in 0..20 {
            let events = game.tick(1.0);
            completed |= events
                .iter()
                .any(|e| matches!(e, GameEvent::AnomalyCompleted { .. }));
        }
        assert!(completed);
        assert!(game.state().system().anomaly(id).unwrap().reward_claimed);
    }
}
