pub mod ai;
pub mod anomaly;
pub mod cargo;
pub mod cleanup;
pub mod combat;
pub mod mining;
pub mod modules;
pub mod movement;
pub mod travel;
