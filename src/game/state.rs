//! World state: the player ship, every star system and its entities.
//!
//! All simulation mutation flows through a single `WorldState` value; there
//! are no globals. Entities inside an anomaly pocket carry the anomaly id in
//! their `pocket` tag and are only visible to a player in that same pocket.

use rand::rngs::StdRng;
use rand::Rng;
use thiserror::Error;

use crate::game::catalog::anomalies::AnomalyType;
use crate::game::catalog::ores::OreKind;
use crate::game::catalog::ships::{self, ShipClass, ShipTemplate};
use crate::game::catalog::{self, systems};
use crate::game::constants::{anomaly, npc, station, universe};
use crate::game::events::GameEvent;
use crate::game::fitting::{Fitting, ShipStats};
use crate::game::items::{self, Item};
use crate::game::universe as generator;
use crate::util::rng;
use crate::util::vec2::Vec2;

/// Identifier for every non-player entity
pub type EntityId = u64;

/// Monotonic entity id source
#[derive(Debug, Clone)]
pub struct IdGen(EntityId);

impl IdGen {
    pub fn new() -> Self {
        Self(1)
    }

    pub fn next(&mut self) -> EntityId {
        let id = self.0;
        self.0 += 1;
        id
    }
}

impl Default for IdGen {
    fn default() -> Self {
        Self::new()
    }
}

/// Layered defense pools, drawn down shield first, then armor, then hull
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Defense {
    pub shield: f32,
    pub armor: f32,
    pub hull: f32,
}

impl Defense {
    pub fn is_destroyed(&self) -> bool {
        self.hull <= 0.0
    }
}

/// Warp drive state machine. Jumps share it so that warp and gate
/// activation can never overlap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TravelState {
    Idle,
    /// Aligning toward `target`
    WarpWarmup { target: Vec2, remaining: f32 },
    /// In warp toward `target`
    Cruising { target: Vec2 },
    /// Drive recharging after a warp
    Cooldown { remaining: f32 },
    /// Stargate activating; the ship moves to `destination` when it expires
    JumpWarmup { destination: usize, remaining: f32 },
}

impl TravelState {
    pub fn is_warping(&self) -> bool {
        matches!(self, TravelState::WarpWarmup { .. } | TravelState::Cruising { .. })
    }

    pub fn is_cruising(&self) -> bool {
        matches!(self, TravelState::Cruising { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            TravelState::Idle => "idle",
            TravelState::WarpWarmup { .. } => "aligning",
            TravelState::Cruising { .. } => "warping",
            TravelState::Cooldown { .. } => "warp cooldown",
            TravelState::JumpWarmup { .. } => "jumping",
        }
    }
}

/// Steering command against the selected target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveCommand {
    Orbit { distance: f32 },
    Approach { distance: f32 },
}

/// Where the ship was before it entered a pocket
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PocketEntry {
    pub anomaly: EntityId,
    pub center: Vec2,
    pub return_position: Vec2,
    pub return_velocity: Vec2,
}

/// Held flight keys
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Controls {
    pub thrust: bool,
    pub reverse: bool,
    pub turn_left: bool,
    pub turn_right: bool,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub template: &'static ShipTemplate,
    pub position: Vec2,
    pub velocity: Vec2,
    /// Radians; 0 faces -y
    pub heading: f32,
    pub stats: ShipStats,
    pub defense: Defense,
    pub cap: f32,
    pub cargo: Vec<Item>,
    pub fitting: Fitting,
    pub travel: TravelState,
    pub pocket: Option<PocketEntry>,
    pub command: Option<MoveCommand>,
    /// Start the gate jump automatically once an approach gets in range
    pub auto_jump: bool,
    pub fire_cooldown: f32,
    pub mining_cooldown: f32,
    /// Afterburner multiplier set by the module processor each tick
    pub speed_multiplier: f32,
    pub jump_flash: f32,
    pub credits: u64,
}

impl Ship {
    pub fn new(template: &'static ShipTemplate, position: Vec2) -> Self {
        let fitting = Fitting::default();
        let stats = ShipStats::compute(template, &fitting);
        Self {
            template,
            position,
            velocity: Vec2::ZERO,
            heading: 0.0,
            stats,
            defense: Defense {
                shield: stats.max_shield,
                armor: stats.max_armor,
                hull: stats.max_hull,
            },
            cap: stats.max_cap,
            cargo: Vec::new(),
            fitting,
            travel: TravelState::Idle,
            pocket: None,
            command: None,
            auto_jump: false,
            fire_cooldown: 0.0,
            mining_cooldown: 0.0,
            speed_multiplier: 1.0,
            jump_flash: 0.0,
            credits: 0,
        }
    }

    pub fn cargo_used(&self) -> f32 {
        items::volume(&self.cargo)
    }

    pub fn cargo_free(&self) -> f32 {
        items::free_volume(&self.cargo, self.stats.cargo_capacity)
    }

    pub fn pocket_id(&self) -> Option<EntityId> {
        self.pocket.map(|p| p.anomaly)
    }

    /// Position the ship will be at once outside any pocket
    pub fn system_position(&self) -> Vec2 {
        self.pocket
            .map(|p| p.return_position)
            .unwrap_or(self.position)
    }

    /// Restore every pool to its maximum
    pub fn restore(&mut self) {
        self.defense = Defense {
            shield: self.stats.max_shield,
            armor: self.stats.max_armor,
            hull: self.stats.max_hull,
        };
        self.cap = self.stats.max_cap;
    }
}

/// Pirate frigate
#[derive(Debug, Clone)]
pub struct Npc {
    pub id: EntityId,
    pub position: Vec2,
    pub velocity: Vec2,
    pub defense: Defense,
    pub max_shield: f32,
    pub max_armor: f32,
    pub max_hull: f32,
    pub fire_cooldown: f32,
    pub class: ShipClass,
    pub pocket: Option<EntityId>,
}

impl Npc {
    /// Spawn a frigate drifting in a random direction
    pub fn spawn<R: Rng + ?Sized>(id: EntityId, position: Vec2, rng: &mut R) -> Self {
        let velocity = Vec2::new(
            rng::float_between(rng, -npc::WANDER_SPEED, npc::WANDER_SPEED),
            rng::float_between(rng, -npc::WANDER_SPEED, npc::WANDER_SPEED),
        );
        Self {
            id,
            position,
            velocity,
            defense: Defense {
                shield: npc::BASE_SHIELD,
                armor: npc::BASE_ARMOR,
                hull: npc::BASE_HULL,
            },
            max_shield: npc::BASE_SHIELD,
            max_armor: npc::BASE_ARMOR,
            max_hull: npc::BASE_HULL,
            fire_cooldown: 0.0,
            class: ShipClass::Frigate,
            pocket: None,
        }
    }

    /// Scale every pool and its maximum
    pub fn scale_defenses(&mut self, factor: f32) {
        self.max_shield *= factor;
        self.max_armor *= factor;
        self.max_hull *= factor;
        self.defense = Defense {
            shield: self.max_shield,
            armor: self.max_armor,
            hull: self.max_hull,
        };
    }
}

#[derive(Debug, Clone)]
pub struct Asteroid {
    pub id: EntityId,
    pub position: Vec2,
    pub amount: u32,
    pub max_amount: u32,
    pub ore: OreKind,
    pub radius: f32,
    pub pocket: Option<EntityId>,
}

impl Asteroid {
    pub fn new(id: EntityId, position: Vec2, amount: u32, ore: OreKind) -> Self {
        Self {
            id,
            position,
            amount,
            max_amount: amount,
            ore,
            radius: 8.0 + (amount as f32 / 10.0).sqrt(),
            pocket: None,
        }
    }

    pub fn is_depleted(&self) -> bool {
        self.amount == 0
    }
}

/// Lootable container: a pirate wreck or an anomaly site cache
#[derive(Debug, Clone)]
pub struct Wreck {
    pub id: EntityId,
    pub name: &'static str,
    pub position: Vec2,
    pub items: Vec<Item>,
    /// Frames left before the wreck vanishes; `None` never expires
    pub despawn_timer: Option<f32>,
    pub pocket: Option<EntityId>,
}

impl Wreck {
    pub fn new(id: EntityId, name: &'static str, position: Vec2, items: Vec<Item>) -> Self {
        Self {
            id,
            name,
            position,
            items,
            despawn_timer: Some(crate::game::constants::respawn::WRECK_DESPAWN_FRAMES),
            pocket: None,
        }
    }

    /// Any interaction restarts the despawn countdown
    pub fn touch(&mut self) {
        if self.despawn_timer.is_some() {
            self.despawn_timer = Some(crate::game::constants::respawn::WRECK_DESPAWN_FRAMES);
        }
    }
}

#[derive(Debug, Clone)]
pub struct Station {
    pub id: EntityId,
    pub name: &'static str,
    pub position: Vec2,
    pub inventory: Vec<Item>,
}

#[derive(Debug, Clone)]
pub struct Stargate {
    pub id: EntityId,
    pub name: String,
    pub position: Vec2,
    pub destination: usize,
}

/// A cosmic anomaly: a marker in system space leading to a pocket
#[derive(Debug, Clone)]
pub struct Anomaly {
    pub id: EntityId,
    pub kind: &'static AnomalyType,
    pub discovered: bool,
    pub marker: Vec2,
    pub pocket_center: Vec2,
    pub reward_claimed: bool,
}

impl Anomaly {
    /// Scan-only sites start hidden unless a free discovery roll succeeds
    pub fn spawn<R: Rng + ?Sized>(
        id: EntityId,
        kind: &'static AnomalyType,
        marker: Vec2,
        pocket_center: Vec2,
        rng: &mut R,
    ) -> Self {
        let discovered =
            !kind.requires_scanning || rng.gen_bool(anomaly::FREE_DISCOVERY_CHANCE);
        Self {
            id,
            kind,
            discovered,
            marker,
            pocket_center,
            reward_claimed: false,
        }
    }
}

/// Countdown until a payload is released
#[derive(Debug, Clone)]
pub struct Pending<T> {
    pub payload: T,
    pub timer: f32,
}

/// Deferred respawns, released once their countdown runs out
#[derive(Debug, Clone)]
pub struct RespawnQueue<T> {
    entries: Vec<Pending<T>>,
}

impl<T> RespawnQueue<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push(&mut self, payload: T, frames: f32) {
        self.entries.push(Pending {
            payload,
            timer: frames,
        });
    }

    /// Advance every countdown and return the payloads that came due
    pub fn tick(&mut self, dt: f32) -> Vec<T> {
        let mut ready = Vec::new();
        let mut i = 0;
        while i < self.entries.len() {
            self.entries[i].timer -= dt;
            if self.entries[i].timer <= 0.0 {
                ready.push(self.entries.swap_remove(i).payload);
            } else {
                i += 1;
            }
        }
        ready
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Pending<T>> {
        self.entries.iter()
    }
}

impl<T> Default for RespawnQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// NPCs respawn somewhere random in the system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NpcRespawn;

/// Asteroids come back where they were, full
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AsteroidRespawn {
    pub position: Vec2,
    pub max_amount: u32,
    pub ore: OreKind,
}

/// Anomalies come back at the same marker and pocket with a fresh discovery roll
#[derive(Debug, Clone)]
pub struct AnomalyRespawn {
    pub kind: &'static AnomalyType,
    pub marker: Vec2,
    pub pocket_center: Vec2,
}

#[derive(Debug, Clone)]
pub struct StarSystem {
    pub name: &'static str,
    pub security: f32,
    pub map_position: Vec2,
    pub width: f32,
    pub height: f32,
    pub stations: Vec<Station>,
    pub stargates: Vec<Stargate>,
    pub asteroids: Vec<Asteroid>,
    pub npcs: Vec<Npc>,
    pub wrecks: Vec<Wreck>,
    pub anomalies: Vec<Anomaly>,
    pub npc_respawns: RespawnQueue<NpcRespawn>,
    pub asteroid_respawns: RespawnQueue<AsteroidRespawn>,
    pub anomaly_respawns: RespawnQueue<AnomalyRespawn>,
}

impl StarSystem {
    /// A system with no content yet
    pub fn empty(name: &'static str, security: f32) -> Self {
        Self {
            name,
            security,
            map_position: Vec2::ZERO,
            width: universe::SYSTEM_WIDTH,
            height: universe::SYSTEM_HEIGHT,
            stations: Vec::new(),
            stargates: Vec::new(),
            asteroids: Vec::new(),
            npcs: Vec::new(),
            wrecks: Vec::new(),
            anomalies: Vec::new(),
            npc_respawns: RespawnQueue::new(),
            asteroid_respawns: RespawnQueue::new(),
            anomaly_respawns: RespawnQueue::new(),
        }
    }

    pub fn npc(&self, id: EntityId) -> Option<&Npc> {
        self.npcs.iter().find(|n| n.id == id)
    }

    pub fn asteroid(&self, id: EntityId) -> Option<&Asteroid> {
        self.asteroids.iter().find(|a| a.id == id)
    }

    pub fn wreck(&self, id: EntityId) -> Option<&Wreck> {
        self.wrecks.iter().find(|w| w.id == id)
    }

    pub fn anomaly(&self, id: EntityId) -> Option<&Anomaly> {
        self.anomalies.iter().find(|a| a.id == id)
    }

    pub fn anomaly_mut(&mut self, id: EntityId) -> Option<&mut Anomaly> {
        self.anomalies.iter_mut().find(|a| a.id == id)
    }

    /// Is `position` inside any station's safe zone?
    pub fn in_safe_zone(&self, position: Vec2) -> bool {
        self.stations
            .iter()
            .any(|s| s.position.distance_to(position) < station::SAFE_ZONE_RADIUS)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
    Npc,
    Asteroid,
    Wreck,
    Station,
    Stargate,
    Anomaly,
}

impl TargetKind {
    /// Stations, gates and anomaly markers can be selected from anywhere,
    /// including from inside a pocket, so the pilot can warp back out
    pub fn is_celestial(&self) -> bool {
        matches!(self, TargetKind::Station | TargetKind::Stargate | TargetKind::Anomaly)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Target {
    pub kind: TargetKind,
    pub id: EntityId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shooter {
    Player,
    Npc,
}

/// Beam or tracer drawn between two points for a few frames
#[derive(Debug, Clone)]
pub struct FireEffect {
    pub from: Vec2,
    pub to: Vec2,
    pub life: f32,
    pub max_life: f32,
    pub hit: bool,
    pub owner: Shooter,
    pub weapon: &'static str,
}

/// Is an entity with pocket tag `tag` visible to a viewer in `viewer`?
/// Tagged entities show only in their own pocket, untagged ones only outside.
pub fn visible_to(tag: Option<EntityId>, viewer: Option<EntityId>) -> bool {
    tag == viewer
}

#[derive(Debug, Clone)]
pub struct WorldOptions {
    pub seed: Option<u64>,
    pub start_system: usize,
    pub start_ship: String,
    pub starting_credits: u64,
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            seed: None,
            start_system: 0,
            start_ship: ships::STARTER_SHIP.to_string(),
            starting_credits: 500_000_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("unknown ship '{0}'")]
    UnknownShip(String),
    #[error("start system {0} out of range")]
    UnknownSystem(usize),
}

pub struct WorldState {
    pub systems: Vec<StarSystem>,
    pub current: usize,
    pub player: Ship,
    /// Hulls the pilot owns
    pub hangar: Vec<&'static ShipTemplate>,
    pub selection: Option<Target>,
    pub auto_fire: bool,
    pub auto_mine: bool,
    pub controls: Controls,
    pub effects: Vec<FireEffect>,
    pub events: Vec<GameEvent>,
    pub tick: u64,
    pub ids: IdGen,
    pub rng: StdRng,
}

impl WorldState {
    /// Generate the full star map and put a fresh pilot at the start station
    pub fn new(options: WorldOptions) -> Result<Self, WorldError> {
        let template = ships::find(&options.start_ship)
            .ok_or_else(|| WorldError::UnknownShip(options.start_ship.clone()))?;
        if options.start_system >= systems::SYSTEMS.len() {
            return Err(WorldError::UnknownSystem(options.start_system));
        }

        let mut rng = rng::seeded(options.seed);
        let mut ids = IdGen::new();
        let systems = generator::generate(&mut rng, &mut ids);
        Ok(Self::assemble(
            systems,
            options.start_system,
            template,
            options.starting_credits,
            ids,
            rng,
        ))
    }

    /// One empty high-sec system with a single station. Content is added by
    /// the caller; used by tooling and tests that need full control.
    pub fn sandbox(seed: u64) -> Self {
        let mut ids = IdGen::new();
        let mut system = StarSystem::empty("Sandbox", 1.0);
        system.stations.push(Station {
            id: ids.next(),
            name: "Sandbox Station",
            position: universe::STATION_POSITION,
            inventory: Vec::new(),
        });
        let template = ships::find(ships::STARTER_SHIP).unwrap_or(&ships::SHIPS[0]);
        Self::assemble(
            vec![system],
            0,
            template,
            WorldOptions::default().starting_credits,
            ids,
            rng::seeded(Some(seed)),
        )
    }

    fn assemble(
        systems: Vec<StarSystem>,
        current: usize,
        template: &'static ShipTemplate,
        credits: u64,
        ids: IdGen,
        rng: StdRng,
    ) -> Self {
        let spawn = systems[current]
            .stations
            .first()
            .map(|s| s.position)
            .unwrap_or(universe::STATION_POSITION);
        let mut player = Ship::new(template, spawn);
        player.credits = credits;
        if let Some(miner) = catalog::lookup("Miner I") {
            player.cargo.push(Item::equipment(miner));
        }

        let mut hangar = vec![template];
        if let Some(starter) = ships::find(ships::STARTER_SHIP) {
            if starter.name != template.name {
                hangar.insert(0, starter);
            }
        }

        Self {
            systems,
            current,
            player,
            hangar,
            selection: None,
            auto_fire: false,
            auto_mine: false,
            controls: Controls::default(),
            effects: Vec::new(),
            events: Vec::new(),
            tick: 0,
            ids,
            rng,
        }
    }

    pub fn system(&self) -> &StarSystem {
        &self.systems[self.current]
    }

    pub fn system_mut(&mut self) -> &mut StarSystem {
        &mut self.systems[self.current]
    }

    pub fn next_id(&mut self) -> EntityId {
        self.ids.next()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Index of the station the player is docked at, if any
    pub fn docked_station(&self) -> Option<usize> {
        if self.player.pocket.is_some() {
            return None;
        }
        self.system().stations.iter().position(|s| {
            s.position.distance_to(self.player.position) <= station::DOCKING_RANGE
        })
    }

    /// Is the selected target still present and visible to the player?
    pub fn target_visible(&self, target: Target) -> bool {
        let viewer = self.player.pocket_id();
        let sys = self.system();
        match target.kind {
            TargetKind::Npc => sys.npc(target.id).is_some_and(|n| visible_to(n.pocket, viewer)),
            TargetKind::Asteroid => sys
                .asteroid(target.id)
                .is_some_and(|a| visible_to(a.pocket, viewer)),
            TargetKind::Wreck => sys.wreck(target.id).is_some_and(|w| visible_to(w.pocket, viewer)),
            TargetKind::Station => sys.stations.iter().any(|s| s.id == target.id),
            TargetKind::Stargate => sys.stargates.iter().any(|g| g.id == target.id),
            TargetKind::Anomaly => sys
                .anomaly(target.id)
                .is_some_and(|a| a.discovered && viewer != Some(a.id)),
        }
    }

    /// World position of a target, ignoring visibility
    pub fn target_position(&self, target: Target) -> Option<Vec2> {
        let sys = self.system();
        match target.kind {
            TargetKind::Npc => sys.npc(target.id).map(|n| n.position),
            TargetKind::Asteroid => sys.asteroid(target.id).map(|a| a.position),
            TargetKind::Wreck => sys.wreck(target.id).map(|w| w.position),
            TargetKind::Station => sys
                .stations
                .iter()
                .find(|s| s.id == target.id)
                .map(|s| s.position),
            TargetKind::Stargate => sys
                .stargates
                .iter()
                .find(|g| g.id == target.id)
                .map(|g| g.position),
            TargetKind::Anomaly => sys.anomaly(target.id).map(|a| a.marker),
        }
    }

    /// Select a target if it is visible. Changing target cancels any movement command.
    pub fn select(&mut self, target: Target) -> bool {
        if !self.target_visible(target) {
            return false;
        }
        if self.selection != Some(target) {
            self.player.command = None;
            self.player.auto_jump = false;
        }
        self.selection = Some(target);
        true
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
        self.player.command = None;
        self.player.auto_jump = false;
    }

    /// Drop the selection if its entity is gone or no longer visible
    pub fn validate_selection(&mut self) {
        if let Some(target) = self.selection {
            if !self.target_visible(target) {
                self.clear_selection();
            }
        }
    }

    /// Number of live entities in the current system, for diagnostics
    pub fn entity_count(&self) -> usize {
        let sys = self.system();
        sys.npcs.len() + sys.asteroids.len() + sys.wrecks.len() + sys.anomalies.len()
    }
}
