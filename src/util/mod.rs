pub mod rng;
pub mod vec2;
