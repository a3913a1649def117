pub mod autopilot;
pub mod catalog;
pub mod constants;
pub mod events;
pub mod fitting;
pub mod game_loop;
pub mod items;
pub mod market;
pub mod performance;
pub mod snapshot;
pub mod state;
pub mod systems;
pub mod universe;
