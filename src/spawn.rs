//! Spawn context for particle initialization.
//!
//! Owns the store's random source and turns an [`EngineConfig`] into fresh
//! particles scattered across the current bounds.
//!
//! ```ignore
//! let mut ctx = SpawnContext::new(Some(42));
//! ctx.begin(60, Vec2::new(1920.0, 1080.0));
//! let particles: Vec<Particle> = (0..60).map(|_| ctx.particle(&config)).collect();
//! ```

use crate::config::EngineConfig;
use crate::particle::Particle;
use glam::Vec2;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::cmp::Ordering;

/// Random source plus the bookkeeping of one spawn pass.
#[derive(Debug)]
pub struct SpawnContext {
    /// Index of the next particle to spawn (0 to count-1).
    pub index: u32,
    /// Total number of particles in this pass.
    pub count: u32,
    /// Width and height particles are scattered across.
    pub bounds: Vec2,
    rng: SmallRng,
}

impl SpawnContext {
    /// Create a context with a fixed seed, or from entropy when `seed` is `None`.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            index: 0,
            count: 0,
            bounds: Vec2::ZERO,
            rng,
        }
    }

    /// Start a new spawn pass of `count` particles inside `bounds`.
    pub(crate) fn begin(&mut self, count: u32, bounds: Vec2) {
        self.index = 0;
        self.count = count;
        self.bounds = bounds;
    }

    /// Normalized progress through the pass (0.0 to 1.0).
    #[inline]
    pub fn progress(&self) -> f32 {
        if self.count == 0 {
            return 1.0;
        }
        self.index as f32 / self.count as f32
    }

    // ========== Random primitives ==========

    /// Random f32 in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen()
    }

    /// Random f32 in `[min, max]`. An empty or degenerate range yields `min`.
    #[inline]
    pub fn random_range(&mut self, min: f32, max: f32) -> f32 {
        match max.partial_cmp(&min) {
            Some(Ordering::Greater) => self.rng.gen_range(min..=max),
            _ => min,
        }
    }

    // ========== Position / velocity helpers ==========

    /// Random point in the rectangle `[0, size.x] × [0, size.y]`.
    pub fn random_in_rect(&mut self, size: Vec2) -> Vec2 {
        Vec2::new(self.random() * size.x, self.random() * size.y)
    }

    /// Random point within the current bounds.
    pub fn random_in_bounds(&mut self) -> Vec2 {
        self.random_in_rect(self.bounds)
    }

    /// Random velocity with each axis in `[-max_speed, max_speed]`.
    pub fn random_velocity(&mut self, max_speed: f32) -> Vec2 {
        Vec2::new(
            (self.random() - 0.5) * 2.0 * max_speed,
            (self.random() - 0.5) * 2.0 * max_speed,
        )
    }

    /// Spawn the next particle of the pass.
    pub fn particle(&mut self, config: &EngineConfig) -> Particle {
        let position = self.random_in_bounds();
        let velocity = self.random_velocity(config.max_speed);
        let radius = self.random_range(config.radius[0], config.radius[1]);
        let opacity = self.random_range(config.opacity[0], config.opacity[1]);
        self.index += 1;

        Particle::new(position, velocity, radius, opacity)
    }
}
