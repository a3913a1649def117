//! Random helpers shared by universe generation, loot rolls and combat.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::util::vec2::Vec2;

/// Build the simulation RNG. A fixed seed makes a run reproducible.
pub fn seeded(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform integer in `[min, max]`, tolerant of `min > max`
pub fn int_between<R: Rng + ?Sized>(rng: &mut R, min: u32, max: u32) -> u32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..=max)
    }
}

/// Uniform float in `[min, max)`
pub fn float_between<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        min
    } else {
        rng.gen_range(min..max)
    }
}

/// Offset of random sign on each axis with magnitude in `[min, max)`
pub fn signed_offset<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> Vec2 {
    let sx = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    let sy = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
    Vec2::new(
        sx * float_between(rng, min, max),
        sy * float_between(rng, min, max),
    )
}
