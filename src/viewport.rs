//! Viewport dimensions and their source.

use crate::subscription::{Listener, Subscription};
use glam::Vec2;

/// Usable drawing area in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Dimensions as a vector, `(width, height)`.
    #[inline]
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    /// Whether `point` lies in `[0, width] × [0, height]`.
    pub fn contains(&self, point: Vec2) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }

    /// Whole-pixel dimensions for the drawing surface. Negative or non-finite
    /// sizes collapse to zero.
    pub fn pixel_size(&self) -> (u32, u32) {
        (to_pixels(self.width), to_pixels(self.height))
    }

    /// The same viewport with non-finite or negative sides replaced by zero.
    pub fn sanitized(self) -> Self {
        let side = |v: f32| if v.is_finite() && v > 0.0 { v } else { 0.0 };
        Self::new(side(self.width), side(self.height))
    }
}

fn to_pixels(v: f32) -> u32 {
    if v.is_finite() && v > 0.0 {
        v as u32
    } else {
        0
    }
}

/// Read-only query for the current viewport plus a "size changed" feed.
pub trait ViewportSource {
    /// Current usable width and height.
    fn size(&self) -> Viewport;

    /// Call `listener` on every size-change event, including events that
    /// report an unchanged size.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_is_inclusive() {
        let vp = Viewport::new(100.0, 50.0);
        assert!(vp.contains(Vec2::ZERO));
        assert!(vp.contains(Vec2::new(100.0, 50.0)));
        assert!(!vp.contains(Vec2::new(-0.1, 10.0)));
        assert!(!vp.contains(Vec2::new(10.0, 50.1)));
    }

    #[test]
    fn test_pixel_size_truncates() {
        assert_eq!(Viewport::new(1920.6, 1080.2).pixel_size(), (1920, 1080));
        assert_eq!(Viewport::new(-5.0, f32::NAN).pixel_size(), (0, 0));
    }

    #[test]
    fn test_sanitized() {
        let vp = Viewport::new(f32::INFINITY, -3.0).sanitized();
        assert_eq!(vp, Viewport::new(0.0, 0.0));
    }
}
