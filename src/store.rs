//! The particle store and its physics step.
//!
//! Particles never interact, so the model is just straight-line drift
//! inside a rectangle:
//!
//! 1. draw the particle where it is,
//! 2. move it by one velocity step (no delta-time scaling),
//! 3. flip each velocity component whose coordinate has left the bounds.
//!
//! The boundary check runs after the move, so a particle may overshoot by
//! at most one step before the flipped velocity brings it back.

use crate::config::EngineConfig;
use crate::particle::Particle;
use crate::spawn::SpawnContext;
use crate::surface::DrawingSurface;
use crate::viewport::Viewport;
use tracing::debug;

/// All live particles plus the bounds they bounce inside.
#[derive(Debug, Clone, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    bounds: Viewport,
    color: [u8; 3],
}

impl ParticleStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every particle with a fresh population inside `bounds`.
    ///
    /// The count follows [`EngineConfig::particle_count`]; positions are
    /// uniform over the rectangle.
    pub fn init(&mut self, bounds: Viewport, config: &EngineConfig, spawn: &mut SpawnContext) {
        let bounds = bounds.sanitized();
        let count = config.particle_count(bounds.width);

        spawn.begin(count as u32, bounds.size());
        self.particles = (0..count).map(|_| spawn.particle(config)).collect();
        self.bounds = bounds;
        self.color = config.color;

        debug!(
            count,
            width = bounds.width,
            height = bounds.height,
            "particle store reinitialized"
        );
    }

    /// Draw every particle, then advance and reflect it.
    pub fn step<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        let Viewport { width, height } = self.bounds;

        for p in &mut self.particles {
            surface.fill_circle(p.position, p.radius, p.color(self.color));

            p.position += p.velocity;

            if p.position.x < 0.0 || p.position.x > width {
                p.velocity.x = -p.velocity.x;
            }
            if p.position.y < 0.0 || p.position.y > height {
                p.velocity.y = -p.velocity.y;
            }
        }
    }

    /// Particles in draw order.
    #[inline]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that seed particles themselves.
    #[inline]
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Bounds used by the last [`init`](Self::init).
    #[inline]
    pub fn bounds(&self) -> Viewport {
        self.bounds
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}
