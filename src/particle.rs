//! The simulated point light.

use crate::surface::Rgba;
use glam::Vec2;

/// One free-floating mote.
///
/// Only `position` and the sign of each `velocity` component change after
/// spawning. `radius` and `opacity` are fixed for the particle's lifetime.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Current position in surface pixels.
    pub position: Vec2,
    /// Displacement applied once per accepted frame.
    pub velocity: Vec2,
    /// Disc radius in pixels.
    pub radius: f32,
    /// Alpha used when drawing.
    pub opacity: f32,
}

impl Particle {
    pub fn new(position: Vec2, velocity: Vec2, radius: f32, opacity: f32) -> Self {
        Self {
            position,
            velocity,
            radius,
            opacity,
        }
    }

    /// Draw color for this particle given the configured base RGB.
    #[inline]
    pub fn color(&self, [r, g, b]: [u8; 3]) -> Rgba {
        Rgba::new(r, g, b, self.opacity)
    }

    /// Whether every field is finite.
    pub fn is_finite(&self) -> bool {
        self.position.is_finite()
            && self.velocity.is_finite()
            && self.radius.is_finite()
            && self.opacity.is_finite()
    }
}
