//! Nullsec Sim Library
//!
//! Frame-stepped simulation core for a single-player space trading and
//! combat game: star map, fitting, combat, mining, warp and gate travel,
//! anomaly pockets and the station market. Rendering and input live outside
//! this crate and talk to it through [`game::game_loop::GameLoop`] and
//! [`game::snapshot::RenderSnapshot`].

pub mod config;
pub mod game;
pub mod util;
