//! The drawing surface port.
//!
//! The engine needs exactly three things from whatever it paints on:
//! pixel dimensions, a way to wipe it, and filled circles. It owns no other
//! state on the surface.
//!
//! | Implementation | Backing |
//! |----------------|---------|
//! | [`RasterSurface`](crate::RasterSurface) | CPU RGBA buffer |
//! | [`RecordingSurface`](crate::headless::RecordingSurface) | draw call log |
//! | `web::CanvasSurface` | `<canvas>` 2D context (wasm32) |

use glam::Vec2;
use std::fmt;

/// Straight (non-premultiplied) color with a fractional alpha.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Alpha in `0.0..=1.0`.
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS color string, e.g. `rgba(255, 255, 255, 0.2)`.
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// A raster target the engine paints particles onto.
pub trait DrawingSurface {
    /// Commit new pixel dimensions. Existing contents may be discarded.
    fn set_size(&mut self, width: u32, height: u32);

    /// Clear every pixel to transparent.
    fn clear(&mut self);

    /// Fill a circle centered at `center`.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);
}

impl<S: DrawingSurface + ?Sized> DrawingSurface for Box<S> {
    fn set_size(&mut self, width: u32, height: u32) {
        (**self).set_size(width, height)
    }

    fn clear(&mut self) {
        (**self).clear()
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        (**self).fill_circle(center, radius, color)
    }
}
