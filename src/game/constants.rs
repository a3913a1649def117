//! Tuning constants. Every duration and rate is in frames of a nominal 60 Hz
//! display; speeds are world units per frame.

/// Frame clock
pub mod time {
    /// Nominal frames per second the rates are tuned against
    pub const FRAME_RATE: u32 = 60;
    /// Milliseconds in one nominal frame
    pub const FRAME_MS: f32 = 16.666;
    /// Largest step a single tick may advance, in frames
    pub const MAX_FRAME_STEP: f32 = 2.0;

    /// Convert a millisecond duration into frames
    pub fn ms_to_frames(ms: u32) -> f32 {
        ms as f32 / FRAME_MS
    }
}

/// Sub-light flight
pub mod physics {
    /// Reverse thrust as a fraction of forward acceleration
    pub const REVERSE_THRUST_RATIO: f32 = 0.5;
    /// Heading change per frame while steering toward a point (one degree)
    pub const STEER_RATE: f32 = 0.01745;
    /// Tangential thrust while orbiting, as a fraction of acceleration
    pub const ORBIT_TANGENTIAL_RATIO: f32 = 0.6;
    /// Orbit holds within this band around the requested distance
    pub const ORBIT_BAND: f32 = 20.0;
    /// Inset from the system edges for the bounds clamp
    pub const BOUNDS_MARGIN: f32 = 20.0;
    /// Default orbit and approach distance for movement commands
    pub const DEFAULT_COMMAND_DISTANCE: f32 = 500.0;
}

/// Warp drive
pub mod warp {
    /// Cruise speed while in warp
    pub const SPEED: f32 = 30.0;
    /// Shortest distance a warp may cover
    pub const MIN_DISTANCE: f32 = 4000.0;
    /// Alignment time before the jump to warp
    pub const WARMUP_FRAMES: f32 = 180.0;
    /// Drop out of warp once this close to the target
    pub const ARRIVAL_DISTANCE: f32 = 500.0;
    /// Drive recharge after each warp
    pub const COOLDOWN_FRAMES: f32 = 600.0;
    /// Arriving this close to a discovered anomaly marker enters its pocket
    pub const ANOMALY_CAPTURE_RADIUS: f32 = 1000.0;
}

/// Stargate jumps
pub mod jump {
    /// Gates farther than this refuse a jump request outright
    pub const MAX_REQUEST_DISTANCE: f32 = 1000.0;
    /// Close enough to start the jump sequence
    pub const ACTIVATION_DISTANCE: f32 = 200.0;
    /// Approach distance used when auto-jumping from out of range
    pub const APPROACH_DISTANCE: f32 = 150.0;
    /// Gate activation time
    pub const WARMUP_FRAMES: f32 = 600.0;
    /// Arrival offset from the reciprocal gate on both axes
    pub const ARRIVAL_OFFSET: f32 = 100.0;
    /// Length of the arrival flash
    pub const FLASH_FRAMES: f32 = 20.0;
}

/// Stations
pub mod station {
    /// No weapons fire and no NPC aggression inside this radius
    pub const SAFE_ZONE_RADIUS: f32 = 500.0;
    /// Station services need the ship within this radius
    pub const DOCKING_RANGE: f32 = 300.0;
}

/// Player weapons and damage
pub mod combat {
    /// Accuracy bucket thresholds as fractions of optimal range
    pub const CLOSE_RANGE_FRACTION: f32 = 0.65;
    pub const MEDIUM_RANGE_FRACTION: f32 = 0.85;
    /// Lifetime of a drawn beam or tracer
    pub const FIRE_EFFECT_FRAMES: f32 = 12.0;
    /// Cargo volume of an unfitted equipment item
    pub const EQUIPMENT_STACK_SIZE: f32 = 0.1;
    /// Wreck loot reach
    pub const LOOT_RANGE: f32 = 200.0;
}

/// NPC pirate frigates
pub mod npc {
    pub const BASE_SHIELD: f32 = 50.0;
    pub const BASE_ARMOR: f32 = 30.0;
    pub const BASE_HULL: f32 = 20.0;
    /// Shield regeneration per frame before the 0.1 regen scale
    pub const SHIELD_REGEN: f32 = 0.3;
    /// Initial drift speed bound on each axis
    pub const WANDER_SPEED: f32 = 0.3;
    /// NPCs pursue the player inside this radius
    pub const AGGRO_RADIUS: f32 = 250.0;
    /// Pursuit acceleration per frame
    pub const PURSUIT_ACCEL: f32 = 0.015;
    pub const MAX_SPEED: f32 = 2.0;
    pub const WEAPON_RANGE: f32 = 500.0;
    pub const WEAPON_DAMAGE: f32 = 12.0;
    pub const FIRE_COOLDOWN_FRAMES: f32 = 40.0;
    pub const ACCURACY_CLOSE: f32 = 0.90;
    pub const ACCURACY_MEDIUM: f32 = 0.70;
    pub const ACCURACY_LONG: f32 = 0.35;
    /// Credits paid for each kill
    pub const BOUNTY: u64 = 150;
    /// Ore units in a pirate wreck
    pub const WRECK_ORE_MIN: u32 = 3;
    pub const WRECK_ORE_MAX: u32 = 8;
}

/// Mining lasers
pub mod mining {
    /// Laser reach to the asteroid centre
    pub const RANGE: f32 = 80.0;
    /// Ore amount bounds for belt asteroids
    pub const BELT_AMOUNT_MIN: f32 = 100.0;
    pub const BELT_AMOUNT_MAX: f32 = 800.0;
    /// Ore amount bounds for pocket asteroids
    pub const POCKET_AMOUNT_MIN: f32 = 500.0;
    pub const POCKET_AMOUNT_MAX: f32 = 1500.0;
}

/// Respawn and despawn timers
pub mod respawn {
    pub const NPC_FRAMES: f32 = 3600.0;
    pub const ASTEROID_FRAMES: f32 = 18_000.0;
    /// Wrecks vanish after this long without interaction
    pub const WRECK_DESPAWN_FRAMES: f32 = 18_000.0;
}

/// Anomaly pockets
pub mod anomaly {
    use crate::util::vec2::Vec2;

    /// Pocket space radius around the pocket centre
    pub const POCKET_RADIUS: f32 = 5000.0;
    /// Maximum anomalies per system, one per pocket slot
    pub const MAX_PER_SYSTEM: usize = 4;
    /// Pocket centres, far outside any system rectangle
    pub const POCKET_SLOTS: [Vec2; MAX_PER_SYSTEM] = [
        Vec2::new(10_000.0, -40_000.0),
        Vec2::new(-40_000.0, 10_000.0),
        Vec2::new(10_000.0, 50_000.0),
        Vec2::new(50_000.0, 10_000.0),
    ];
    /// Chance that a scan-only anomaly starts out discovered
    pub const FREE_DISCOVERY_CHANCE: f64 = 0.3;
    /// Completion is evaluated on this tick interval while inside a pocket
    pub const COMPLETION_CHECK_INTERVAL: u64 = 10;
    /// Pocket NPC spawn offset from the entry point
    pub const NPC_OFFSET_MIN: f32 = 1000.0;
    pub const NPC_OFFSET_MAX: f32 = 3000.0;
    /// Pocket asteroid spawn offset from the entry point
    pub const ASTEROID_OFFSET_MIN: f32 = 500.0;
    pub const ASTEROID_OFFSET_MAX: f32 = 2500.0;
    /// Data and relic container spawn offset from the entry point
    pub const CONTAINER_OFFSET_MIN: f32 = 800.0;
    pub const CONTAINER_OFFSET_MAX: f32 = 2000.0;
    /// Ore rewards only pay out ores worth more than this per unit
    pub const PREMIUM_ORE_PRICE: u64 = 50;
}

/// System layout
pub mod universe {
    use crate::util::vec2::Vec2;

    pub const SYSTEM_WIDTH: f32 = 20_000.0;
    pub const SYSTEM_HEIGHT: f32 = 20_000.0;
    pub const STATION_POSITION: Vec2 = Vec2::new(10_000.0, 10_000.0);
    /// Stargates ring the station at this distance
    pub const GATE_RING_RADIUS: f32 = 7000.0;
    /// Belts, NPC spawns and anomaly markers stay inside this square
    pub const SCATTER_MIN: f32 = 3000.0;
    pub const SCATTER_MAX: f32 = 17_000.0;
    /// Security at or above this is high-sec
    pub const HIGH_SEC: f32 = 0.5;
    /// Security at or above this (and below high-sec) is low-sec
    pub const LOW_SEC: f32 = 0.1;
}

/// Player death
pub mod death {
    /// Fraction of credits lost on destruction
    pub const CREDIT_PENALTY: f64 = 0.10;
    /// Respawn offset along +x from the first station
    pub const RESPAWN_OFFSET: f32 = 100.0;
}

/// Station market
pub mod market {
    /// Fraction of catalog price paid when selling ore
    pub const ORE_SELL_RATIO: f64 = 0.85;
    /// Fraction of catalog price paid when selling metal scrap
    pub const METAL_SELL_RATIO: f64 = 0.90;
    /// Fraction of catalog price paid when selling fitted equipment
    pub const EQUIPMENT_SELL_RATIO: f64 = 0.50;
    /// Credits per missing shield, armor or hull point
    pub const REPAIR_COST_PER_POINT: f64 = 100.0;
}

/// Pool regeneration scale applied to every per-frame regen stat
pub const REGEN_SCALE: f32 = 0.1;
