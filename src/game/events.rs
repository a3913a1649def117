//! Fire-and-forget notifications for the audio and UI layers.

use serde::{Deserialize, Serialize};

use crate::util::vec2::Vec2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    WeaponFired { weapon: String, hit: bool },
    NpcFired { hit: bool },
    Explosion { position: Vec2 },
    MiningCycle { ore: String, units: u32 },
    WarpStarted,
    WarpEntered,
    WarpExited,
    JumpWarmup { destination: String },
    GateJumped { from: String, to: String },
    NpcDestroyed { bounty: u64 },
    PlayerDestroyed { credits_lost: u64 },
    ModuleDeactivated { module: String },
    AnomalyEntered { name: String },
    AnomalyExited { name: String },
    AnomalyCompleted { name: String, bounty: u64 },
    SpecialLoot { name: String },
}
