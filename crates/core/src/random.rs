//! Seeded random number generator for scene placement.
//!
//! xorshift32: fast, tiny state, and the same sequence for the same seed, so
//! placement tests can pin a seed and replay it.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    /// Seed of 0 is treated as 1; xorshift never leaves the zero state.
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }

    /// Uniform float in [0, 1).
    pub fn next_unit(&mut self) -> f32 {
        // Top 24 bits keep the result exactly representable and below 1.0.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }

    /// Uniform float in [min, max).
    pub fn next_range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_unit() * (max - min)
    }

    /// Uniform point in the rectangle `[min, max)`.
    pub fn next_in_rect(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        let x = self.next_range(min.x, max.x);
        let y = self.next_range(min.y, max.y);
        Vec2::new(x, y)
    }

    /// Random facing on the ground plane with components in [-1, 1).
    ///
    /// Not normalized; callers decide how to treat the (rare) zero vector.
    pub fn next_planar_direction(&mut self) -> Vec3 {
        let x = self.next_range(-1.0, 1.0);
        let y = self.next_range(-1.0, 1.0);
        Vec3::new(x, y, 0.0)
    }

    /// Current internal state.
    pub fn seed(&self) -> u32 {
        self.state
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(1)
    }
}
